//! Temporal value kinds
//!
//! - `Instant`: absolute point on the timeline (UTC, nanosecond resolution)
//! - `LegacyDate`: epoch milliseconds, nothing else
//! - `LocalDateTime`: wall-clock date and time without a zone
//! - `ZonedDateTime`: wall-clock date and time bound to a zone and offset
//! - `CalendarDate`: a day, no time of day

use crate::error::DateTimeError;
use crate::zone::{offset_id, Zone};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Instant = DateTime<Utc>;
pub type LocalDateTime = NaiveDateTime;
pub type CalendarDate = NaiveDate;

/// Build an instant from epoch milliseconds, failing outside chrono's range
pub fn instant_of_epoch_millis(millis: i64) -> Result<Instant, DateTimeError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        DateTimeError::invalid_argument(format!(
            "epoch milliseconds {} outside the representable range",
            millis
        ))
    })
}

// ============================================================================
// LegacyDate
// ============================================================================

/// Epoch-millisecond value with no zone attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LegacyDate {
    epoch_millis: i64,
}

impl LegacyDate {
    pub fn from_epoch_millis(epoch_millis: i64) -> Self {
        Self { epoch_millis }
    }

    /// Truncates (floors) to millisecond resolution
    pub fn from_instant(instant: &Instant) -> Self {
        Self { epoch_millis: instant.timestamp_millis() }
    }

    pub fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }

    pub fn to_instant(&self) -> Result<Instant, DateTimeError> {
        instant_of_epoch_millis(self.epoch_millis)
    }
}

impl fmt::Display for LegacyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_instant() {
            Ok(instant) => write!(f, "{}", instant.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            Err(_) => write!(f, "{}ms", self.epoch_millis),
        }
    }
}

// ============================================================================
// ZonedDateTime
// ============================================================================

/// Point on the timeline seen through a zone's wall clock.
///
/// The offset is always the one the zone uses at the stored instant.
/// Deserializing rebuilds it from the zone and rejects a stored offset that
/// disagrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ZonedParts")]
pub struct ZonedDateTime {
    instant: Instant,
    #[serde(serialize_with = "offset_seconds::serialize")]
    offset: FixedOffset,
    zone: Zone,
}

impl ZonedDateTime {
    /// Project an instant onto the zone's wall clock
    pub fn from_instant(instant: &Instant, zone: Zone) -> Self {
        Self { instant: *instant, offset: zone.offset_at(instant), zone }
    }

    /// Bind a wall-clock time to a zone.
    ///
    /// Gaps and overlaps resolve per `Zone::offset_for_local`; in a gap the
    /// local time moves forward by the length of the gap.
    pub fn from_local(local: &NaiveDateTime, zone: Zone) -> Result<Self, DateTimeError> {
        Self::from_local_with_offset(local, zone.offset_for_local(local), zone)
    }

    /// Place a wall-clock time on the timeline with an explicit offset, then
    /// view it from `zone`. A valid offset is kept as is.
    pub fn from_local_with_offset(
        local: &NaiveDateTime,
        offset: FixedOffset,
        zone: Zone,
    ) -> Result<Self, DateTimeError> {
        let utc = local
            .checked_sub_signed(TimeDelta::seconds(offset.local_minus_utc() as i64))
            .ok_or_else(|| DateTimeError::invalid_argument(format!("{} is outside the representable range", local)))?;
        Ok(Self::from_instant(&utc.and_utc(), zone))
    }

    pub fn instant(&self) -> Instant {
        self.instant
    }

    pub fn local(&self) -> NaiveDateTime {
        self.instant.with_timezone(&self.offset).naive_local()
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Same instant seen from another zone
    pub fn with_zone_same_instant(&self, zone: Zone) -> Self {
        Self::from_instant(&self.instant, zone)
    }
}

#[derive(Deserialize)]
struct ZonedParts {
    instant: Instant,
    #[serde(default)]
    offset: Option<i32>,
    zone: Zone,
}

impl TryFrom<ZonedParts> for ZonedDateTime {
    type Error = DateTimeError;

    fn try_from(parts: ZonedParts) -> Result<Self, Self::Error> {
        let zdt = Self::from_instant(&parts.instant, parts.zone);
        match parts.offset {
            Some(secs) if secs != zdt.offset.local_minus_utc() => Err(DateTimeError::invalid_argument(format!(
                "offset {} seconds is not used by {} at {}",
                secs,
                parts.zone,
                parts.instant.to_rfc3339()
            ))),
            _ => Ok(zdt),
        }
    }
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.local().format("%Y-%m-%dT%H:%M:%S%.f"), offset_id(self.offset))?;
        if let Zone::Region(_) = self.zone {
            write!(f, "[{}]", self.zone.id())?;
        }
        Ok(())
    }
}

// ============================================================================
// Durations
// ============================================================================

/// ISO-8601 rendering: `PT24H`, `PT1H30M`, `PT-0.5S`, `PT0S`
pub fn format_duration(duration: &TimeDelta) -> String {
    const NANOS: i64 = 1_000_000_000;
    // Floor seconds with non-negative nanos
    let mut seconds = duration.num_seconds();
    let mut nanos = duration.subsec_nanos() as i64;
    if nanos < 0 {
        seconds -= 1;
        nanos += NANOS;
    }
    if seconds == 0 && nanos == 0 {
        return "PT0S".to_string();
    }

    let effective = if seconds < 0 && nanos > 0 { seconds + 1 } else { seconds };
    let (hours, minutes, secs) = (effective / 3600, (effective % 3600) / 60, effective % 60);
    let mut out = String::from("PT");
    if hours != 0 {
        out.push_str(&format!("{}H", hours));
    }
    if minutes != 0 {
        out.push_str(&format!("{}M", minutes));
    }
    if secs == 0 && nanos == 0 {
        return out;
    }
    if seconds < 0 && nanos > 0 && secs == 0 {
        out.push_str("-0");
    } else {
        out.push_str(&secs.to_string());
    }
    if nanos > 0 {
        let fraction = if seconds < 0 { NANOS - nanos } else { nanos };
        let digits = format!("{:09}", fraction);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out.push('S');
    out
}

mod offset_seconds {
    use chrono::FixedOffset;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(offset: &FixedOffset, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(offset.local_minus_utc())
    }
}
