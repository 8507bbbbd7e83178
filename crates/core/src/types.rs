use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Seconds east of UTC for Malaysia time (MYT, UTC+8, no DST).
const MYT_OFFSET_SECS: i32 = 8 * 3600;

/// Malaysia time zone offset.
pub fn myt() -> FixedOffset {
    FixedOffset::east_opt(MYT_OFFSET_SECS).unwrap()
}

/// Convert a Unix timestamp to a local MYT datetime.
pub fn to_myt(ts: i64) -> Option<DateTime<FixedOffset>> {
    myt().timestamp_opt(ts, 0).single()
}

/// Render a Unix timestamp as a clock time in MYT, e.g. "05:42 AM".
pub fn myt_time_str(ts: i64) -> String {
    match to_myt(ts) {
        Some(dt) => dt.format("%I:%M %p").to_string(),
        None => "-".to_string(),
    }
}

/// A JAKIM prayer zone code, e.g. SGR01 or WLY01.
///
/// Normalized to uppercase with surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone(String);

impl Zone {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let code = raw.trim().to_uppercase();
        if code.is_empty() {
            return Err(ApiError::InvalidArgument("zone code is empty".to_string()));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ApiError::InvalidArgument(format!(
                "zone code '{}' contains invalid characters",
                code
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The six daily prayer entries published for Malaysian zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Syuruk,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// All prayers in daily order.
    pub const ORDER: [PrayerName; 6] = [
        PrayerName::Fajr,
        PrayerName::Syuruk,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    /// Bilingual label following Malaysian convention.
    pub fn label(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Subuh/Fajr",
            PrayerName::Syuruk => "Syuruk/Sunrise",
            PrayerName::Dhuhr => "Zohor/Dhuhr",
            PrayerName::Asr => "Asar/Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isyak/Isha",
        }
    }

    /// Short label used as a table column header.
    pub fn short_label(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Subuh",
            PrayerName::Syuruk => "Syuruk",
            PrayerName::Dhuhr => "Zohor",
            PrayerName::Asr => "Asar",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isyak",
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One day's prayer schedule as published upstream.
///
/// Prayer fields are Unix timestamps in seconds. Individual entries may be
/// absent in upstream data, so each is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrayerDay {
    pub day: u32,
    #[serde(default)]
    pub hijri: Option<String>,
    #[serde(default)]
    pub fajr: Option<i64>,
    #[serde(default)]
    pub syuruk: Option<i64>,
    #[serde(default)]
    pub dhuhr: Option<i64>,
    #[serde(default)]
    pub asr: Option<i64>,
    #[serde(default)]
    pub maghrib: Option<i64>,
    #[serde(default)]
    pub isha: Option<i64>,
}

impl PrayerDay {
    /// Timestamp for a named prayer, if published.
    pub fn time_of(&self, name: PrayerName) -> Option<i64> {
        match name {
            PrayerName::Fajr => self.fajr,
            PrayerName::Syuruk => self.syuruk,
            PrayerName::Dhuhr => self.dhuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }
}

/// One zone's prayer schedule across a calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrayerMonth {
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    /// Month label as published upstream, e.g. "FEB".
    #[serde(default)]
    pub month: Option<String>,
    pub prayers: Vec<PrayerDay>,
}

impl PrayerMonth {
    /// Entry for a given day of the month.
    pub fn day(&self, day: u32) -> Option<&PrayerDay> {
        self.prayers.iter().find(|p| p.day == day)
    }
}

/// A zone listing entry: code plus state and district labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneInfo {
    #[serde(rename = "jakimCode")]
    pub code: String,
    #[serde(default)]
    pub negeri: String,
    #[serde(default)]
    pub daerah: String,
}

/// The soonest upcoming prayer relative to some wall-clock instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextPrayer {
    pub name: PrayerName,
    /// Unix timestamp of the prayer.
    pub timestamp: i64,
    /// Whether the prayer falls on the next calendar day in MYT.
    pub tomorrow: bool,
}
