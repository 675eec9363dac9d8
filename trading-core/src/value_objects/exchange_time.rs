//! Exchange timestamp parsing
//!
//! The feed reports times as `YYYY-MM-DDTHH:MM:SS[.fraction][Z]`. Only the
//! first 19 characters are significant; the instant they name is UTC and is
//! carried in the exchange's fixed local offset.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use thiserror::Error;

use super::Timestamp;

/// UTC offset of the exchange's local time (Asia/Tokyo, no DST)
pub const EXCHANGE_UTC_OFFSET_SECS: i32 = 9 * 60 * 60;

const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const WIRE_PREFIX_LEN: usize = 19;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("timestamp {0:?} is shorter than {WIRE_PREFIX_LEN} characters")]
    TooShort(String),

    #[error("invalid timestamp {raw:?}: {reason}")]
    Invalid { raw: String, reason: String },

    #[error("invalid UTC offset: {0} seconds")]
    InvalidOffset(i32),
}

/// Parses exchange timestamps into instants carried in a fixed offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeTime {
    offset: FixedOffset,
}

impl ExchangeTime {
    pub fn new(offset_secs: i32) -> Result<Self, TimestampError> {
        FixedOffset::east_opt(offset_secs)
            .map(|offset| ExchangeTime { offset })
            .ok_or(TimestampError::InvalidOffset(offset_secs))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Parse a raw exchange timestamp
    pub fn parse(&self, raw: &str) -> Result<DateTime<FixedOffset>, TimestampError> {
        let prefix = raw
            .get(..WIRE_PREFIX_LEN)
            .ok_or_else(|| TimestampError::TooShort(raw.to_string()))?;

        let naive = NaiveDateTime::parse_from_str(prefix, WIRE_FORMAT).map_err(|e| {
            TimestampError::Invalid {
                raw: raw.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(naive.and_utc().with_timezone(&self.offset))
    }

    /// Express an instant in the exchange offset
    pub fn localize(&self, timestamp: Timestamp) -> DateTime<FixedOffset> {
        timestamp.with_timezone(&self.offset)
    }
}

impl Default for ExchangeTime {
    fn default() -> Self {
        ExchangeTime::new(EXCHANGE_UTC_OFFSET_SECS).expect("UTC+9 is a valid offset")
    }
}
