//! Per-kind layout strategies.
//!
//! Each strategy answers "where does this element go" for a bounds rectangle
//! and a handful of content facts. Elements a strategy does not place come
//! back empty. Strategies are stateless unit structs picked from a static
//! table by `LayoutStrategyKind`.

use std::f64::consts::FRAC_1_SQRT_2;

use complication_types::{ComplicationData, ContentKind, Rect};

use super::utils::{
    bottom_half, central_square, is_wide_rectangle, left_square, right_part, scaled_around_center,
    top_half,
};
use crate::canvas::{Gravity, TextAlignment};

/// Which strategy lays out a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutStrategyKind {
    /// Places nothing
    #[default]
    Default,
    Icon,
    SmallImage,
    LargeImage,
    ShortText,
    LongText,
    RangedValue,
}

impl LayoutStrategyKind {
    /// Pick the strategy for `data`.
    ///
    /// NoData with a placeholder lays out as the placeholder kind. A hidden
    /// ranged value falls back to short text, or to icon when there is no
    /// short text. Content missing its required fields gets the default.
    pub fn select(data: &ComplicationData, ranged_value_progress_hidden: bool) -> Self {
        if !data.is_well_formed() {
            log::debug!(
                "Complication of kind {:?} lacks required fields, using default layout",
                data.kind
            );
            return LayoutStrategyKind::Default;
        }

        match data.kind.layout_kind() {
            ContentKind::Icon => LayoutStrategyKind::Icon,
            ContentKind::SmallImage => LayoutStrategyKind::SmallImage,
            ContentKind::LargeImage => LayoutStrategyKind::LargeImage,
            ContentKind::ShortText | ContentKind::NoPermission => LayoutStrategyKind::ShortText,
            ContentKind::LongText => LayoutStrategyKind::LongText,
            ContentKind::RangedValue => {
                if !ranged_value_progress_hidden {
                    LayoutStrategyKind::RangedValue
                } else if data.short_text.is_none() {
                    LayoutStrategyKind::Icon
                } else {
                    LayoutStrategyKind::ShortText
                }
            }
            ContentKind::Empty | ContentKind::NotConfigured | ContentKind::NoData { .. } => {
                LayoutStrategyKind::Default
            }
        }
    }

    pub fn strategy(self) -> &'static dyn LayoutStrategy {
        match self {
            LayoutStrategyKind::Default => &DEFAULT_LAYOUT,
            LayoutStrategyKind::Icon => &ICON_LAYOUT,
            LayoutStrategyKind::SmallImage => &SMALL_IMAGE_LAYOUT,
            LayoutStrategyKind::LargeImage => &LARGE_IMAGE_LAYOUT,
            LayoutStrategyKind::ShortText => &SHORT_TEXT_LAYOUT,
            LayoutStrategyKind::LongText => &LONG_TEXT_LAYOUT,
            LayoutStrategyKind::RangedValue => &RANGED_VALUE_LAYOUT,
        }
    }

    /// Whether the main and sub text come from the long text fields
    pub fn uses_long_text(self) -> bool {
        self == LayoutStrategyKind::LongText
    }
}

static DEFAULT_LAYOUT: DefaultLayout = DefaultLayout;
static ICON_LAYOUT: IconLayout = IconLayout;
static SMALL_IMAGE_LAYOUT: SmallImageLayout = SmallImageLayout;
static LARGE_IMAGE_LAYOUT: LargeImageLayout = LargeImageLayout;
static SHORT_TEXT_LAYOUT: ShortTextLayout = ShortTextLayout;
static LONG_TEXT_LAYOUT: LongTextLayout = LongTextLayout;
static RANGED_VALUE_LAYOUT: RangedValueLayout = RangedValueLayout;

/// Facts about the content that drive placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutContext {
    pub bounds: Rect,
    pub has_icon: bool,
    pub has_small_image: bool,
    pub has_short_text: bool,
    pub has_short_title: bool,
    pub has_long_title: bool,
}

impl LayoutContext {
    pub fn new(data: &ComplicationData, bounds: Rect) -> Self {
        Self {
            bounds,
            has_icon: data.icon.is_some(),
            has_small_image: data.small_image.is_some(),
            has_short_text: data.short_text.is_some(),
            has_short_title: data.short_title.is_some(),
            has_long_title: data.long_title.is_some(),
        }
    }

    fn is_wide(&self) -> bool {
        is_wide_rectangle(self.bounds)
    }
}

/// Alignment and gravity of a text box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextPlacement {
    pub alignment: TextAlignment,
    pub gravity: Gravity,
}

impl TextPlacement {
    pub const CENTERED: TextPlacement =
        TextPlacement::new(TextAlignment::Center, Gravity::CenterVertical);

    pub const fn new(alignment: TextAlignment, gravity: Gravity) -> Self {
        Self { alignment, gravity }
    }
}

pub trait LayoutStrategy: Sync {
    fn icon_bounds(&self, _cx: &LayoutContext) -> Rect {
        Rect::EMPTY
    }

    fn small_image_bounds(&self, _cx: &LayoutContext) -> Rect {
        Rect::EMPTY
    }

    fn large_image_bounds(&self, _cx: &LayoutContext) -> Rect {
        Rect::EMPTY
    }

    fn ranged_value_bounds(&self, _cx: &LayoutContext) -> Rect {
        Rect::EMPTY
    }

    fn short_text_bounds(&self, _cx: &LayoutContext) -> Rect {
        Rect::EMPTY
    }

    fn short_title_bounds(&self, _cx: &LayoutContext) -> Rect {
        Rect::EMPTY
    }

    fn short_text_placement(&self, _cx: &LayoutContext) -> TextPlacement {
        TextPlacement::CENTERED
    }

    fn short_title_placement(&self, _cx: &LayoutContext) -> TextPlacement {
        TextPlacement::CENTERED
    }

    fn long_text_bounds(&self, _cx: &LayoutContext) -> Rect {
        Rect::EMPTY
    }

    fn long_title_bounds(&self, _cx: &LayoutContext) -> Rect {
        Rect::EMPTY
    }

    fn long_text_placement(&self, _cx: &LayoutContext) -> TextPlacement {
        TextPlacement::CENTERED
    }

    fn long_title_placement(&self, _cx: &LayoutContext) -> TextPlacement {
        TextPlacement::CENTERED
    }
}

/// Text box split by an optional title: text on top, title below
fn split_for_title(area: Rect, has_title: bool) -> (Rect, Rect) {
    if has_title {
        (top_half(area), bottom_half(area))
    } else {
        (area, Rect::EMPTY)
    }
}

fn text_gravity(title_shown: bool) -> Gravity {
    if title_shown {
        Gravity::Bottom
    } else {
        Gravity::CenterVertical
    }
}

pub struct DefaultLayout;

impl LayoutStrategy for DefaultLayout {}

pub struct IconLayout;

impl LayoutStrategy for IconLayout {
    fn icon_bounds(&self, cx: &LayoutContext) -> Rect {
        central_square(cx.bounds)
    }
}

pub struct SmallImageLayout;

impl LayoutStrategy for SmallImageLayout {
    fn small_image_bounds(&self, cx: &LayoutContext) -> Rect {
        central_square(cx.bounds)
    }
}

pub struct LargeImageLayout;

impl LayoutStrategy for LargeImageLayout {
    fn large_image_bounds(&self, cx: &LayoutContext) -> Rect {
        cx.bounds
    }
}

/// Short text with an optional icon and title.
///
/// Wide bounds put the icon on the left and the text beside it. Otherwise
/// the icon sits above the text and there is no room for a title.
pub struct ShortTextLayout;

impl ShortTextLayout {
    fn title_shown(cx: &LayoutContext) -> bool {
        cx.has_short_title && (!cx.has_icon || cx.is_wide())
    }

    fn text_and_title(cx: &LayoutContext) -> (Rect, Rect) {
        if !cx.has_icon {
            split_for_title(cx.bounds, cx.has_short_title)
        } else if cx.is_wide() {
            split_for_title(right_part(cx.bounds), cx.has_short_title)
        } else {
            (bottom_half(cx.bounds), Rect::EMPTY)
        }
    }

    fn alignment(cx: &LayoutContext) -> TextAlignment {
        if cx.has_icon && cx.is_wide() {
            TextAlignment::Start
        } else {
            TextAlignment::Center
        }
    }
}

impl LayoutStrategy for ShortTextLayout {
    fn icon_bounds(&self, cx: &LayoutContext) -> Rect {
        if !cx.has_icon {
            Rect::EMPTY
        } else if cx.is_wide() {
            left_square(cx.bounds)
        } else {
            central_square(top_half(cx.bounds))
        }
    }

    fn short_text_bounds(&self, cx: &LayoutContext) -> Rect {
        Self::text_and_title(cx).0
    }

    fn short_title_bounds(&self, cx: &LayoutContext) -> Rect {
        Self::text_and_title(cx).1
    }

    fn short_text_placement(&self, cx: &LayoutContext) -> TextPlacement {
        TextPlacement::new(Self::alignment(cx), text_gravity(Self::title_shown(cx)))
    }

    fn short_title_placement(&self, cx: &LayoutContext) -> TextPlacement {
        TextPlacement::new(Self::alignment(cx), Gravity::Top)
    }
}

/// Long text with an optional leading image and title
pub struct LongTextLayout;

impl LongTextLayout {
    fn has_image(cx: &LayoutContext) -> bool {
        cx.has_icon || cx.has_small_image
    }

    fn text_area(cx: &LayoutContext) -> Rect {
        if Self::has_image(cx) {
            right_part(cx.bounds)
        } else {
            cx.bounds
        }
    }

    fn alignment(cx: &LayoutContext) -> TextAlignment {
        if Self::has_image(cx) {
            TextAlignment::Start
        } else {
            TextAlignment::Center
        }
    }
}

impl LayoutStrategy for LongTextLayout {
    fn icon_bounds(&self, cx: &LayoutContext) -> Rect {
        if cx.has_icon {
            left_square(cx.bounds)
        } else {
            Rect::EMPTY
        }
    }

    // The icon wins when both are present
    fn small_image_bounds(&self, cx: &LayoutContext) -> Rect {
        if !cx.has_icon && cx.has_small_image {
            left_square(cx.bounds)
        } else {
            Rect::EMPTY
        }
    }

    fn long_text_bounds(&self, cx: &LayoutContext) -> Rect {
        split_for_title(Self::text_area(cx), cx.has_long_title).0
    }

    fn long_title_bounds(&self, cx: &LayoutContext) -> Rect {
        split_for_title(Self::text_area(cx), cx.has_long_title).1
    }

    fn long_text_placement(&self, cx: &LayoutContext) -> TextPlacement {
        TextPlacement::new(Self::alignment(cx), text_gravity(cx.has_long_title))
    }

    fn long_title_placement(&self, cx: &LayoutContext) -> TextPlacement {
        TextPlacement::new(Self::alignment(cx), Gravity::Top)
    }
}

/// Progress ring with icon and text inside it, or beside it on wide bounds
pub struct RangedValueLayout;

impl RangedValueLayout {
    fn ring(cx: &LayoutContext) -> Rect {
        if cx.is_wide() {
            left_square(cx.bounds)
        } else {
            central_square(cx.bounds)
        }
    }

    /// Square inscribed in the ring's circle
    fn inner_square(cx: &LayoutContext) -> Rect {
        scaled_around_center(Self::ring(cx), FRAC_1_SQRT_2)
    }
}

impl LayoutStrategy for RangedValueLayout {
    fn ranged_value_bounds(&self, cx: &LayoutContext) -> Rect {
        Self::ring(cx)
    }

    fn icon_bounds(&self, cx: &LayoutContext) -> Rect {
        if !cx.has_icon {
            return Rect::EMPTY;
        }
        let inner = Self::inner_square(cx);
        if cx.is_wide() || !cx.has_short_text {
            inner
        } else {
            central_square(top_half(inner))
        }
    }

    fn short_text_bounds(&self, cx: &LayoutContext) -> Rect {
        if cx.is_wide() {
            return split_for_title(right_part(cx.bounds), cx.has_short_title).0;
        }
        if !cx.has_short_text {
            return Rect::EMPTY;
        }
        let inner = Self::inner_square(cx);
        if cx.has_icon {
            bottom_half(inner)
        } else {
            inner
        }
    }

    fn short_title_bounds(&self, cx: &LayoutContext) -> Rect {
        if cx.is_wide() {
            split_for_title(right_part(cx.bounds), cx.has_short_title).1
        } else {
            Rect::EMPTY
        }
    }

    fn short_text_placement(&self, cx: &LayoutContext) -> TextPlacement {
        if cx.is_wide() {
            TextPlacement::new(TextAlignment::Start, text_gravity(cx.has_short_title))
        } else {
            TextPlacement::CENTERED
        }
    }

    fn short_title_placement(&self, cx: &LayoutContext) -> TextPlacement {
        if cx.is_wide() {
            TextPlacement::new(TextAlignment::Start, Gravity::Top)
        } else {
            TextPlacement::CENTERED
        }
    }
}
