//! Paint bundles derived from a `ComplicationStyle`.
//!
//! A `PaintSet` is built once per (style, ambient, low-bit, burn-in) tuple and
//! reused across frames. `PaintSetManager` owns the four bundles a renderer
//! can draw with and rebuilds ambient ones only when the device
//! capabilities observed at draw time change.

use complication_types::{BorderStyle, Color, ComplicationStyle};

use crate::canvas::{ColorFilter, Paint, TextPaint};

/// Paints for one style in one display mode
#[derive(Debug, Clone, PartialEq)]
pub struct PaintSet {
    pub style: ComplicationStyle,
    pub is_ambient: bool,
    pub low_bit_ambient: bool,
    pub burn_in_protection: bool,
    pub background: Paint,
    pub border: Paint,
    pub highlight: Paint,
    pub primary_text: TextPaint,
    pub secondary_text: TextPaint,
    pub in_progress: Paint,
    pub remaining: Paint,
    pub icon_filter: ColorFilter,
}

impl PaintSet {
    pub fn new(
        style: ComplicationStyle,
        is_ambient: bool,
        low_bit_ambient: bool,
        burn_in_protection: bool,
    ) -> Self {
        // Low-bit screens cannot show intermediate shades
        let anti_alias = !(is_ambient && low_bit_ambient);

        let background = Paint::fill(style.background_color).with_anti_alias(anti_alias);

        let border_dash = match style.border_style {
            BorderStyle::Dashed => Some((style.border_dash_width, style.border_dash_gap)),
            BorderStyle::Solid | BorderStyle::None => None,
        };
        let border_color = match style.border_style {
            BorderStyle::None => Color::TRANSPARENT,
            BorderStyle::Solid | BorderStyle::Dashed => style.border_color,
        };
        let border = Paint::stroke(border_color, style.border_width)
            .with_anti_alias(anti_alias)
            .with_dash(border_dash);

        let highlight = Paint::fill(style.highlight_color).with_anti_alias(anti_alias);

        let primary_text = TextPaint {
            color: style.text_color,
            size: style.text_size,
            font_family: style.text_font.clone(),
            anti_alias,
        };
        let secondary_text = TextPaint {
            color: style.title_color,
            size: style.title_size,
            font_family: style.title_font.clone(),
            anti_alias,
        };

        let in_progress =
            Paint::stroke(style.ranged_value_primary_color, style.ranged_value_ring_width)
                .with_anti_alias(anti_alias);
        let remaining =
            Paint::stroke(style.ranged_value_secondary_color, style.ranged_value_ring_width)
                .with_anti_alias(anti_alias);

        let icon_filter = ColorFilter::Tint(style.icon_color);

        Self {
            style,
            is_ambient,
            low_bit_ambient,
            burn_in_protection,
            background,
            border,
            highlight,
            primary_text,
            secondary_text,
            in_progress,
            remaining,
            icon_filter,
        }
    }

    /// Burn-in protection only applies while ambient
    pub fn is_in_burn_in_protection_mode(&self) -> bool {
        self.is_ambient && self.burn_in_protection
    }

    /// Whether this bundle was built for the given device capabilities
    pub fn matches_capabilities(&self, low_bit_ambient: bool, burn_in_protection: bool) -> bool {
        self.low_bit_ambient == low_bit_ambient && self.burn_in_protection == burn_in_protection
    }

    pub fn has_border(&self) -> bool {
        self.style.border_style != BorderStyle::None
    }
}

/// Style drawn when the tap action was lost: every color recolored towards `tint`
pub fn degraded_variant(style: &ComplicationStyle, tint: Color) -> ComplicationStyle {
    style.tinted(tint)
}

/// Owns the active, ambient and degraded bundles of one renderer
#[derive(Debug, Clone)]
pub struct PaintSetManager {
    active_style: ComplicationStyle,
    ambient_style: ComplicationStyle,
    tap_action_lost_tint: Color,
    active: PaintSet,
    active_degraded: PaintSet,
    ambient: PaintSet,
    ambient_degraded: PaintSet,
    ambient_rebuilds: u64,
}

impl PaintSetManager {
    pub fn new(
        active_style: ComplicationStyle,
        ambient_style: ComplicationStyle,
        tap_action_lost_tint: Color,
    ) -> Self {
        let active = PaintSet::new(active_style.clone(), false, false, false);
        let active_degraded = PaintSet::new(
            degraded_variant(&active_style, tap_action_lost_tint),
            false,
            false,
            false,
        );
        let ambient = PaintSet::new(ambient_style.clone(), true, false, false);
        let ambient_degraded = PaintSet::new(
            degraded_variant(&ambient_style, tap_action_lost_tint),
            true,
            false,
            false,
        );
        Self {
            active_style,
            ambient_style,
            tap_action_lost_tint,
            active,
            active_degraded,
            ambient,
            ambient_degraded,
            ambient_rebuilds: 0,
        }
    }

    /// Replace both styles, keeping the ambient capabilities already observed
    pub fn update_style(
        &mut self,
        active_style: ComplicationStyle,
        ambient_style: ComplicationStyle,
    ) {
        let low_bit = self.ambient.low_bit_ambient;
        let burn_in = self.ambient.burn_in_protection;
        *self = Self {
            ambient_rebuilds: self.ambient_rebuilds,
            ..Self::new(active_style, ambient_style, self.tap_action_lost_tint)
        };
        if low_bit || burn_in {
            self.rebuild_ambient(low_bit, burn_in);
        }
    }

    pub fn active_style(&self) -> &ComplicationStyle {
        &self.active_style
    }

    pub fn ambient_style(&self) -> &ComplicationStyle {
        &self.ambient_style
    }

    /// Bundle for this frame.
    ///
    /// Both ambient bundles are rebuilt when the capability pair differs from
    /// the one they were built with, so the degraded variant never lags.
    pub fn select(
        &mut self,
        in_ambient: bool,
        tap_action_lost: bool,
        low_bit_ambient: bool,
        burn_in_protection: bool,
    ) -> &PaintSet {
        if !in_ambient {
            return if tap_action_lost {
                &self.active_degraded
            } else {
                &self.active
            };
        }

        if !self
            .ambient
            .matches_capabilities(low_bit_ambient, burn_in_protection)
        {
            self.rebuild_ambient(low_bit_ambient, burn_in_protection);
        }

        if tap_action_lost {
            &self.ambient_degraded
        } else {
            &self.ambient
        }
    }

    fn rebuild_ambient(&mut self, low_bit_ambient: bool, burn_in_protection: bool) {
        log::debug!(
            "Rebuilding ambient paints (low_bit={}, burn_in={})",
            low_bit_ambient,
            burn_in_protection
        );
        self.ambient = PaintSet::new(
            self.ambient_style.clone(),
            true,
            low_bit_ambient,
            burn_in_protection,
        );
        self.ambient_degraded = PaintSet::new(
            degraded_variant(&self.ambient_style, self.tap_action_lost_tint),
            true,
            low_bit_ambient,
            burn_in_protection,
        );
        self.ambient_rebuilds += 1;
    }

    /// How many times the ambient bundles were rebuilt after construction
    pub fn ambient_rebuilds(&self) -> u64 {
        self.ambient_rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PaintStyle;

    fn manager() -> PaintSetManager {
        PaintSetManager::new(
            ComplicationStyle::default(),
            ComplicationStyle {
                background_color: Color::TRANSPARENT,
                ..Default::default()
            },
            Color::DARK_GRAY,
        )
    }

    #[test]
    fn test_low_bit_ambient_disables_anti_alias() {
        let set = PaintSet::new(ComplicationStyle::default(), true, true, false);
        assert!(!set.background.anti_alias);
        assert!(!set.primary_text.anti_alias);
        assert!(!set.in_progress.anti_alias);

        let interactive = PaintSet::new(ComplicationStyle::default(), false, true, false);
        assert!(interactive.border.anti_alias);
    }

    #[test]
    fn test_border_paints() {
        let dashed = PaintSet::new(
            ComplicationStyle {
                border_style: BorderStyle::Dashed,
                border_dash_width: 5.0,
                border_dash_gap: 2.0,
                ..Default::default()
            },
            false,
            false,
            false,
        );
        assert_eq!(dashed.border.style, PaintStyle::Stroke);
        assert_eq!(dashed.border.dash, Some((5.0, 2.0)));

        let none = PaintSet::new(
            ComplicationStyle {
                border_style: BorderStyle::None,
                ..Default::default()
            },
            false,
            false,
            false,
        );
        assert!(!none.has_border());
        assert_eq!(none.border.color, Color::TRANSPARENT);
    }

    #[test]
    fn test_burn_in_mode_requires_ambient() {
        assert!(PaintSet::new(ComplicationStyle::default(), true, false, true)
            .is_in_burn_in_protection_mode());
        assert!(!PaintSet::new(ComplicationStyle::default(), false, false, true)
            .is_in_burn_in_protection_mode());
    }

    #[test]
    fn test_ambient_rebuilt_only_on_capability_change() {
        let mut manager = manager();
        manager.select(true, false, false, false);
        assert_eq!(manager.ambient_rebuilds(), 0);

        let set = manager.select(true, false, true, false);
        assert!(set.low_bit_ambient);
        assert_eq!(manager.ambient_rebuilds(), 1);

        manager.select(true, false, true, false);
        manager.select(true, true, true, false);
        assert_eq!(manager.ambient_rebuilds(), 1);

        // Interactive frames never rebuild
        manager.select(false, false, false, true);
        assert_eq!(manager.ambient_rebuilds(), 1);
    }

    #[test]
    fn test_degraded_bundles_follow_capabilities() {
        let mut manager = manager();
        let degraded = manager.select(true, true, false, true).clone();
        assert!(degraded.burn_in_protection);
        assert_eq!(
            degraded.style,
            degraded_variant(manager.ambient_style(), Color::DARK_GRAY)
        );
    }

    #[test]
    fn test_select_picks_bundle_by_mode() {
        let mut manager = manager();
        assert!(!manager.select(false, false, false, false).is_ambient);
        assert!(manager.select(true, false, false, false).is_ambient);
        let degraded = manager.select(false, true, false, false);
        assert_ne!(degraded.primary_text.color, Color::WHITE);
    }

    #[test]
    fn test_update_style_keeps_observed_capabilities() {
        let mut manager = manager();
        manager.select(true, false, true, true);
        manager.update_style(
            ComplicationStyle {
                border_radius: 3,
                ..Default::default()
            },
            ComplicationStyle::default(),
        );
        assert_eq!(manager.active_style().border_radius, 3);
        let rebuilds = manager.ambient_rebuilds();
        let set = manager.select(true, false, true, true);
        assert!(set.low_bit_ambient && set.burn_in_protection);
        assert_eq!(manager.ambient_rebuilds(), rebuilds);
    }
}
