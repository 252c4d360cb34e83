use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Tempo day colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayType {
    Blue,
    White,
    Red,
}

impl DayType {
    pub const ALL: [DayType; 3] = [DayType::Blue, DayType::White, DayType::Red];

    /// Parse an upstream label; anything but the three exact tags is unknown
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "BLUE" => Some(Self::Blue),
            "WHITE" => Some(Self::White),
            "RED" => Some(Self::Red),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "BLUE",
            Self::White => "WHITE",
            Self::Red => "RED",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colour assignment for one calendar day, as sent by the upstream API
///
/// `value` stays a raw string and a missing or null one decodes as empty:
/// unknown colours are dropped during expansion instead of failing the whole
/// response. `end_date` is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTypeRecord {
    pub start_date: DateTime<FixedOffset>,
    #[serde(default)]
    pub end_date: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl DayTypeRecord {
    pub fn day_type(&self) -> Option<DayType> {
        DayType::from_label(&self.value)
    }
}

/// A half-open time range with its price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub value: f64,
}

/// OAuth access token, valid for a single request
#[derive(Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Calendar response envelope: `{"tempo_like_calendars": {"values": [...]}}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CalendarResponse {
    pub tempo_like_calendars: CalendarValues,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CalendarValues {
    pub values: Vec<DayTypeRecord>,
}
