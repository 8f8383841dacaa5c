//! Complication content model.
//!
//! A `ComplicationData` is an immutable snapshot supplied by a data provider.
//! It carries a closed `ContentKind` tag, explicitly optional fields and an
//! activity window. Renderers compare snapshots by value to skip redundant
//! work, so everything here derives `PartialEq`.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Kinds a NoData snapshot can stand in for while real data is pending
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    Icon,
    ShortText,
    LongText,
    SmallImage,
    LargeImage,
    RangedValue,
}

impl PlaceholderKind {
    pub fn as_content_kind(self) -> ContentKind {
        match self {
            PlaceholderKind::Icon => ContentKind::Icon,
            PlaceholderKind::ShortText => ContentKind::ShortText,
            PlaceholderKind::LongText => ContentKind::LongText,
            PlaceholderKind::SmallImage => ContentKind::SmallImage,
            PlaceholderKind::LargeImage => ContentKind::LargeImage,
            PlaceholderKind::RangedValue => ContentKind::RangedValue,
        }
    }
}

/// Closed set of content variants
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentKind {
    Empty,
    NotConfigured,
    NoData {
        #[serde(default)]
        placeholder: Option<PlaceholderKind>,
    },
    Icon,
    ShortText,
    LongText,
    SmallImage,
    LargeImage,
    RangedValue,
    NoPermission,
}

impl ContentKind {
    /// Kind used for layout: NoData with a placeholder lays out as the placeholder kind
    pub fn layout_kind(self) -> ContentKind {
        match self {
            ContentKind::NoData {
                placeholder: Some(kind),
            } => kind.as_content_kind(),
            other => other,
        }
    }

    pub fn placeholder(self) -> Option<PlaceholderKind> {
        match self {
            ContentKind::NoData { placeholder } => placeholder,
            _ => None,
        }
    }
}

/// Style of a small image
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImageStyle {
    /// A photo: rounded corners and the style's color filter apply
    #[default]
    Photo,
    /// An icon: drawn square, unfiltered and without rounding
    Icon,
}

/// Opaque reference to an image, resolved by an image loader
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageHandle {
    /// Image file on disk
    File { path: PathBuf },
    /// Named resource known to the loader
    Resource { name: String },
    /// Marks an image that is still pending
    Placeholder,
}

impl ImageHandle {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ImageHandle::File { path: path.into() }
    }

    pub fn resource(name: impl Into<String>) -> Self {
        ImageHandle::Resource { name: name.into() }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageHandle::Placeholder)
    }
}

/// How a time difference is rendered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeDifferenceStyle {
    /// Largest unit only, rounded up: "now", "5m", "3h", "2d"
    #[default]
    ShortSingleUnit,
    /// "M:SS" under an hour, "H:MM" under a day, days beyond
    Stopwatch,
}

/// Text whose value may depend on the current time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComplicationText {
    Plain {
        text: String,
    },
    /// Text that is still pending; renders as an empty string
    Placeholder,
    TimeDifference {
        reference: DateTime<Utc>,
        #[serde(default)]
        style: TimeDifferenceStyle,
    },
    /// strftime pattern evaluated at the draw instant
    TimeFormat {
        format: String,
        #[serde(default)]
        utc_offset_minutes: i32,
    },
}

impl ComplicationText {
    pub fn plain(text: impl Into<String>) -> Self {
        ComplicationText::Plain { text: text.into() }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ComplicationText::Placeholder)
    }

    /// Resolve the text at `now`
    pub fn text_at(&self, now: DateTime<Utc>) -> Cow<'_, str> {
        match self {
            ComplicationText::Plain { text } => Cow::Borrowed(text.as_str()),
            ComplicationText::Placeholder => Cow::Borrowed(""),
            ComplicationText::TimeDifference { reference, style } => {
                let millis = (now - *reference).num_milliseconds().unsigned_abs();
                Cow::Owned(format_time_difference(millis, *style))
            }
            ComplicationText::TimeFormat {
                format,
                utc_offset_minutes,
            } => Cow::Owned(format_time(now, format, *utc_offset_minutes)),
        }
    }
}

const MINUTE_MS: u64 = 60 * 1000;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

fn format_time_difference(millis: u64, style: TimeDifferenceStyle) -> String {
    match style {
        TimeDifferenceStyle::ShortSingleUnit => {
            if millis < MINUTE_MS {
                "now".to_string()
            } else if millis < HOUR_MS {
                format!("{}m", millis.div_ceil(MINUTE_MS))
            } else if millis < DAY_MS {
                format!("{}h", millis.div_ceil(HOUR_MS))
            } else {
                format!("{}d", millis.div_ceil(DAY_MS))
            }
        }
        TimeDifferenceStyle::Stopwatch => {
            let seconds = millis / 1000;
            if millis < HOUR_MS {
                format!("{}:{:02}", seconds / 60, seconds % 60)
            } else if millis < DAY_MS {
                format!("{}:{:02}", seconds / 3600, (seconds / 60) % 60)
            } else {
                format!("{}d", millis / DAY_MS)
            }
        }
    }
}

fn format_time(now: DateTime<Utc>, pattern: &str, utc_offset_minutes: i32) -> String {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        log::warn!("Invalid time format pattern {:?}, showing it verbatim", pattern);
        return pattern.to_string();
    }

    let offset = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60)).unwrap_or(Utc.fix());
    let local = now.with_timezone(&offset);

    let mut out = String::new();
    if write!(out, "{}", local.format_with_items(items.iter())).is_err() {
        return pattern.to_string();
    }
    out
}

/// Numeric payload of a ranged-value complication.
///
/// Equality is bitwise so that a snapshot holding NaN still equals itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RangedValue {
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

impl PartialEq for RangedValue {
    fn eq(&self, other: &Self) -> bool {
        self.value.to_bits() == other.value.to_bits()
            && self.min.to_bits() == other.min.to_bits()
            && self.max.to_bits() == other.max.to_bits()
    }
}

impl RangedValue {
    /// Sentinel value marking a pending ranged value
    pub const PLACEHOLDER: f32 = f32::MAX;

    pub fn new(value: f32, min: f32, max: f32) -> Self {
        Self { value, min, max }
    }

    pub fn placeholder() -> Self {
        Self {
            value: Self::PLACEHOLDER,
            min: 0.0,
            max: 100.0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value == Self::PLACEHOLDER
    }
}

/// Interval during which the content should be shown (both ends inclusive)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ActivityWindow {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl ActivityWindow {
    /// Window that is always active
    pub const ALWAYS: ActivityWindow = ActivityWindow {
        start: None,
        end: None,
    };

    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| now >= start) && self.end.map_or(true, |end| now <= end)
    }
}

/// Immutable snapshot of complication data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplicationData {
    pub kind: ContentKind,
    #[serde(default)]
    pub short_text: Option<ComplicationText>,
    #[serde(default)]
    pub short_title: Option<ComplicationText>,
    #[serde(default)]
    pub long_text: Option<ComplicationText>,
    #[serde(default)]
    pub long_title: Option<ComplicationText>,
    #[serde(default)]
    pub icon: Option<ImageHandle>,
    #[serde(default)]
    pub burn_in_icon: Option<ImageHandle>,
    #[serde(default)]
    pub small_image: Option<ImageHandle>,
    #[serde(default)]
    pub small_image_style: ImageStyle,
    #[serde(default)]
    pub burn_in_small_image: Option<ImageHandle>,
    #[serde(default)]
    pub large_image: Option<ImageHandle>,
    #[serde(default)]
    pub ranged_value: Option<RangedValue>,
    #[serde(default)]
    pub activity: ActivityWindow,
    /// Set by the platform when the tap action did not survive serialization
    #[serde(default)]
    pub tap_action_lost: bool,
}

impl ComplicationData {
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            short_text: None,
            short_title: None,
            long_text: None,
            long_title: None,
            icon: None,
            burn_in_icon: None,
            small_image: None,
            small_image_style: ImageStyle::default(),
            burn_in_small_image: None,
            large_image: None,
            ranged_value: None,
            activity: ActivityWindow::ALWAYS,
            tap_action_lost: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(ContentKind::Empty)
    }

    pub fn not_configured() -> Self {
        Self::new(ContentKind::NotConfigured)
    }

    pub fn no_data() -> Self {
        Self::new(ContentKind::NoData { placeholder: None })
    }

    pub fn placeholder(kind: PlaceholderKind) -> Self {
        Self::new(ContentKind::NoData {
            placeholder: Some(kind),
        })
    }

    pub fn short_text(text: ComplicationText) -> Self {
        Self::new(ContentKind::ShortText).with_short_text(text)
    }

    pub fn long_text(text: ComplicationText) -> Self {
        Self::new(ContentKind::LongText).with_long_text(text)
    }

    pub fn icon(icon: ImageHandle) -> Self {
        Self::new(ContentKind::Icon).with_icon(icon)
    }

    pub fn small_image(image: ImageHandle, style: ImageStyle) -> Self {
        Self::new(ContentKind::SmallImage).with_small_image(image, style)
    }

    pub fn large_image(image: ImageHandle) -> Self {
        Self::new(ContentKind::LargeImage).with_large_image(image)
    }

    pub fn ranged_value(value: f32, min: f32, max: f32) -> Self {
        Self::new(ContentKind::RangedValue).with_ranged_value(RangedValue::new(value, min, max))
    }

    pub fn with_short_text(mut self, text: ComplicationText) -> Self {
        self.short_text = Some(text);
        self
    }

    pub fn with_short_title(mut self, title: ComplicationText) -> Self {
        self.short_title = Some(title);
        self
    }

    pub fn with_long_text(mut self, text: ComplicationText) -> Self {
        self.long_text = Some(text);
        self
    }

    pub fn with_long_title(mut self, title: ComplicationText) -> Self {
        self.long_title = Some(title);
        self
    }

    pub fn with_icon(mut self, icon: ImageHandle) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_burn_in_icon(mut self, icon: ImageHandle) -> Self {
        self.burn_in_icon = Some(icon);
        self
    }

    pub fn with_small_image(mut self, image: ImageHandle, style: ImageStyle) -> Self {
        self.small_image = Some(image);
        self.small_image_style = style;
        self
    }

    pub fn with_burn_in_small_image(mut self, image: ImageHandle) -> Self {
        self.burn_in_small_image = Some(image);
        self
    }

    pub fn with_large_image(mut self, image: ImageHandle) -> Self {
        self.large_image = Some(image);
        self
    }

    pub fn with_ranged_value(mut self, ranged: RangedValue) -> Self {
        self.ranged_value = Some(ranged);
        self
    }

    pub fn with_activity(mut self, activity: ActivityWindow) -> Self {
        self.activity = activity;
        self
    }

    pub fn with_tap_action_lost(mut self, lost: bool) -> Self {
        self.tap_action_lost = lost;
        self
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.activity.is_active_at(now)
    }

    /// Whether the fields required by the layout kind are present
    pub fn is_well_formed(&self) -> bool {
        match self.kind.layout_kind() {
            ContentKind::Icon => self.icon.is_some(),
            ContentKind::ShortText => self.short_text.is_some(),
            ContentKind::LongText => self.long_text.is_some(),
            ContentKind::SmallImage => self.small_image.is_some(),
            ContentKind::LargeImage => self.large_image.is_some(),
            ContentKind::RangedValue => self.ranged_value.is_some(),
            ContentKind::Empty
            | ContentKind::NotConfigured
            | ContentKind::NoData { .. }
            | ContentKind::NoPermission => true,
        }
    }
}

/// Per-field placeholder markers, derived once when content is assigned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaceholderFlags {
    pub icon: bool,
    pub small_image: bool,
    pub large_image: bool,
    pub ranged_value: bool,
    pub title: bool,
    pub text: bool,
}

impl PlaceholderFlags {
    /// Flags are only raised for NoData content carrying a placeholder kind
    pub fn derive(data: &ComplicationData) -> Self {
        let Some(kind) = data.kind.placeholder() else {
            return Self::default();
        };

        let is_placeholder_image =
            |image: &Option<ImageHandle>| image.as_ref().is_some_and(ImageHandle::is_placeholder);
        let is_placeholder_text = |text: &Option<ComplicationText>| {
            text.as_ref().is_some_and(ComplicationText::is_placeholder)
        };

        let (title, text) = if kind == PlaceholderKind::LongText {
            (&data.long_title, &data.long_text)
        } else {
            (&data.short_title, &data.short_text)
        };

        Self {
            icon: is_placeholder_image(&data.icon),
            small_image: is_placeholder_image(&data.small_image),
            large_image: is_placeholder_image(&data.large_image),
            ranged_value: data.ranged_value.is_some_and(|r| r.is_placeholder()),
            title: is_placeholder_text(title),
            text: is_placeholder_text(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_layout_kind_substitutes_placeholder() {
        let kind = ContentKind::NoData {
            placeholder: Some(PlaceholderKind::RangedValue),
        };
        assert_eq!(kind.layout_kind(), ContentKind::RangedValue);
        assert_eq!(
            ContentKind::NoData { placeholder: None }.layout_kind(),
            ContentKind::NoData { placeholder: None }
        );
    }

    #[test]
    fn test_activity_window_is_inclusive() {
        let window = ActivityWindow::new(Some(at(10, 0, 0)), Some(at(11, 0, 0)));
        assert!(window.is_active_at(at(10, 0, 0)));
        assert!(window.is_active_at(at(11, 0, 0)));
        assert!(!window.is_active_at(at(9, 59, 59)));
        assert!(!window.is_active_at(at(11, 0, 1)));
        assert!(ActivityWindow::ALWAYS.is_active_at(at(0, 0, 0)));
    }

    #[test]
    fn test_placeholder_flags_only_for_placeholder_no_data() {
        let real = ComplicationData::short_text(ComplicationText::Placeholder);
        assert_eq!(PlaceholderFlags::derive(&real), PlaceholderFlags::default());

        let pending = ComplicationData::placeholder(PlaceholderKind::ShortText)
            .with_short_text(ComplicationText::Placeholder)
            .with_short_title(ComplicationText::plain("Steps"))
            .with_icon(ImageHandle::Placeholder);
        let flags = PlaceholderFlags::derive(&pending);
        assert!(flags.text);
        assert!(!flags.title);
        assert!(flags.icon);
        assert!(!flags.ranged_value);
    }

    #[test]
    fn test_long_text_placeholder_reads_long_fields() {
        let pending = ComplicationData::placeholder(PlaceholderKind::LongText)
            .with_long_text(ComplicationText::Placeholder)
            .with_short_title(ComplicationText::Placeholder);
        let flags = PlaceholderFlags::derive(&pending);
        assert!(flags.text);
        assert!(!flags.title);
    }

    #[test]
    fn test_time_difference_short_single_unit() {
        let text = ComplicationText::TimeDifference {
            reference: at(10, 0, 0),
            style: TimeDifferenceStyle::ShortSingleUnit,
        };
        assert_eq!(text.text_at(at(10, 0, 30)), "now");
        assert_eq!(text.text_at(at(10, 4, 1)), "5m");
        assert_eq!(text.text_at(at(12, 0, 0)), "2h");
        assert_eq!(text.text_at(at(9, 0, 0)), "1h");
    }

    #[test]
    fn test_time_difference_stopwatch() {
        let text = ComplicationText::TimeDifference {
            reference: at(10, 0, 0),
            style: TimeDifferenceStyle::Stopwatch,
        };
        assert_eq!(text.text_at(at(10, 2, 5)), "2:05");
        assert_eq!(text.text_at(at(13, 7, 0)), "3:07");
    }

    #[test]
    fn test_time_format_with_offset() {
        let text = ComplicationText::TimeFormat {
            format: "%H:%M".to_string(),
            utc_offset_minutes: 90,
        };
        assert_eq!(text.text_at(at(10, 0, 0)), "11:30");
    }

    #[test]
    fn test_invalid_time_format_is_verbatim() {
        let text = ComplicationText::TimeFormat {
            format: "%Q".to_string(),
            utc_offset_minutes: 0,
        };
        assert_eq!(text.text_at(at(10, 0, 0)), "%Q");
    }

    #[test]
    fn test_nan_ranged_value_equals_itself() {
        let data = ComplicationData::ranged_value(f32::NAN, 0.0, 10.0);
        assert_eq!(data, data.clone());
        assert_ne!(
            RangedValue::new(1.0, 0.0, 10.0),
            RangedValue::new(2.0, 0.0, 10.0)
        );
    }

    #[test]
    fn test_well_formed() {
        assert!(!ComplicationData::new(ContentKind::RangedValue).is_well_formed());
        assert!(ComplicationData::ranged_value(1.0, 0.0, 2.0).is_well_formed());
        assert!(ComplicationData::empty().is_well_formed());
    }

    #[test]
    fn test_content_serialization() {
        let data = ComplicationData::placeholder(PlaceholderKind::ShortText)
            .with_short_text(ComplicationText::Placeholder);
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"type\":\"no_data\""));
        let back: ComplicationData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
