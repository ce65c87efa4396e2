//! Time zones: IANA regions and fixed UTC offsets
//!
//! Regions come from the database bundled with `chrono-tz`. A zone turns an
//! instant into a wall-clock offset, and turns a wall-clock local time into
//! the offset used to place it on the timeline.

use crate::error::DateTimeError;
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Largest offset accepted, in seconds (±18:00)
pub const MAX_OFFSET_SECONDS: i32 = 18 * 3600;

/// Classic three-letter zone aliases and the ids they stand for.
pub const SHORT_IDS: [(&str, &str); 28] = [
    ("ACT", "Australia/Darwin"),
    ("AET", "Australia/Sydney"),
    ("AGT", "America/Argentina/Buenos_Aires"),
    ("ART", "Africa/Cairo"),
    ("AST", "America/Anchorage"),
    ("BET", "America/Sao_Paulo"),
    ("BST", "Asia/Dhaka"),
    ("CAT", "Africa/Harare"),
    ("CNT", "America/St_Johns"),
    ("CST", "America/Chicago"),
    ("CTT", "Asia/Shanghai"),
    ("EAT", "Africa/Addis_Ababa"),
    ("ECT", "Europe/Paris"),
    ("EST", "-05:00"),
    ("HST", "-10:00"),
    ("IET", "America/Indiana/Indianapolis"),
    ("IST", "Asia/Kolkata"),
    ("JST", "Asia/Tokyo"),
    ("MIT", "Pacific/Apia"),
    ("MST", "-07:00"),
    ("NET", "Asia/Yerevan"),
    ("NST", "Pacific/Auckland"),
    ("PLT", "Asia/Karachi"),
    ("PNT", "America/Phoenix"),
    ("PRT", "America/Puerto_Rico"),
    ("PST", "America/Los_Angeles"),
    ("SST", "Pacific/Guadalcanal"),
    ("VST", "Asia/Ho_Chi_Minh"),
];

/// Region ids that are only a zero offset; they all resolve to `Zone::utc()`
const UTC_ALIASES: [&str; 16] = [
    "Z", "UTC", "GMT", "UT", "UCT", "GMT0", "Zulu", "Universal", "Greenwich",
    "Etc/UTC", "Etc/GMT", "Etc/UCT", "Etc/GMT0", "Etc/Zulu", "Etc/Universal", "Etc/Greenwich",
];

/// A time zone: a region with offset rules, or a fixed offset.
///
/// UTC has a single representation, the zero fixed offset, so every
/// spelling of it compares equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Region(Tz),
    Fixed(FixedOffset),
}

impl Zone {
    /// UTC as a fixed zero offset
    pub fn utc() -> Self {
        Zone::Fixed(Utc.fix())
    }

    /// Parse a zone id.
    ///
    /// Accepts `Z`, offsets (`+05:30`, `-08`, `+0530`, `+05:30:15`),
    /// prefixed offsets (`UTC+3`, `GMT-08:00`) and IANA ids
    /// (`America/New_York`). `UTC` and its aliases give `Zone::utc()`.
    pub fn parse(id: &str) -> Result<Self, DateTimeError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DateTimeError::invalid_argument("zone id is empty"));
        }
        if UTC_ALIASES.contains(&id) {
            return Ok(Self::utc());
        }
        if id.starts_with('+') || id.starts_with('-') {
            return parse_offset_id(id)
                .map(Zone::Fixed)
                .ok_or_else(|| DateTimeError::invalid_argument(format!("Invalid offset id '{}'", id)));
        }
        for prefix in ["UTC", "GMT", "UT"] {
            if let Some(rest) = id.strip_prefix(prefix) {
                if rest.starts_with('+') || rest.starts_with('-') {
                    return parse_offset_id(rest)
                        .map(Zone::Fixed)
                        .ok_or_else(|| DateTimeError::invalid_argument(format!("Invalid offset id '{}'", id)));
                }
            }
        }
        id.parse::<Tz>()
            .map(Zone::from)
            .map_err(|_| DateTimeError::invalid_argument(format!(
                "Unknown time zone '{}'. Use an IANA id like 'America/New_York' or an offset like '+05:30'",
                id
            )))
    }

    /// Resolve a three-letter alias (`PST`, `CST`, ...) before falling back to `parse`.
    pub fn from_short_id(id: &str) -> Result<Self, DateTimeError> {
        let id = id.trim();
        match SHORT_IDS.iter().find(|(short, _)| *short == id) {
            Some((_, target)) => Self::parse(target),
            None => Self::parse(id),
        }
    }

    /// Canonical id (`America/New_York`, `+05:30`, `Z`)
    pub fn id(&self) -> String {
        match self {
            Zone::Region(tz) => tz.name().to_string(),
            Zone::Fixed(offset) => offset_id(*offset),
        }
    }

    /// Offset in effect at an instant
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            Zone::Region(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
            Zone::Fixed(offset) => *offset,
        }
    }

    /// Short display name at an instant (`PST`, `CEST`); fixed zones use their id
    pub fn abbreviation_at(&self, instant: &DateTime<Utc>) -> String {
        match self {
            Zone::Region(tz) => instant.with_timezone(tz).offset().to_string(),
            Zone::Fixed(offset) => offset_id(*offset),
        }
    }

    /// True when `offset` is one of the offsets this zone uses for `local`
    pub fn is_valid_offset(&self, local: &NaiveDateTime, offset: FixedOffset) -> bool {
        match self {
            Zone::Fixed(fixed) => *fixed == offset,
            Zone::Region(tz) => match tz.offset_from_local_datetime(local) {
                LocalResult::Single(o) => o.fix() == offset,
                LocalResult::Ambiguous(a, b) => a.fix() == offset || b.fix() == offset,
                LocalResult::None => false,
            },
        }
    }

    /// Offset used to place a wall-clock time of this zone on the timeline.
    ///
    /// Overlap: the earlier offset, i.e. the one in effect before the
    /// transition. Gap: the offset in effect before the gap, which moves the
    /// resulting wall-clock time forward by the length of the gap.
    pub fn offset_for_local(&self, local: &NaiveDateTime) -> FixedOffset {
        let tz = match self {
            Zone::Fixed(offset) => return *offset,
            Zone::Region(tz) => tz,
        };
        match tz.offset_from_local_datetime(local) {
            LocalResult::Single(offset) => offset.fix(),
            LocalResult::Ambiguous(a, b) => {
                let (a, b) = (a.fix(), b.fix());
                let earlier = if a.local_minus_utc() >= b.local_minus_utc() { a } else { b };
                debug!(zone = tz.name(), %local, offset = %earlier, "local time falls in an overlap, using earlier offset");
                earlier
            }
            LocalResult::None => {
                // Transitions are never a day apart; a day back is before the gap.
                let probe = local.checked_sub_signed(TimeDelta::days(1)).unwrap_or(*local);
                let before = tz.offset_from_utc_datetime(&probe).fix();
                debug!(zone = tz.name(), %local, offset = %before, "local time falls in a gap, shifting forward");
                before
            }
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Zone {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::parse(s)
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        if UTC_ALIASES.contains(&tz.name()) {
            Zone::utc()
        } else {
            Zone::Region(tz)
        }
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Zone::Fixed(offset)
    }
}

impl Serialize for Zone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id())
    }
}

impl<'de> Deserialize<'de> for Zone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Zone::parse(&id).map_err(serde::de::Error::custom)
    }
}

/// `Z` for zero, otherwise `+HH:MM` or `+HH:MM:SS`
pub fn offset_id(offset: FixedOffset) -> String {
    let total = offset.local_minus_utc();
    if total == 0 {
        return "Z".to_string();
    }
    let sign = if total < 0 { '-' } else { '+' };
    let abs = total.abs();
    let (hours, minutes, seconds) = (abs / 3600, (abs % 3600) / 60, abs % 60);
    if seconds == 0 {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
    }
}

/// Parse `±H`, `±HH`, `±HH:MM`, `±HHMM`, `±HH:MM:SS` or `±HHMMSS`
pub fn parse_offset_id(s: &str) -> Option<FixedOffset> {
    let mut chars = s.chars();
    let sign = match chars.next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let body = chars.as_str();
    let digits = |part: &str| -> Option<i32> {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    };

    let (hours, minutes, seconds) = if body.contains(':') {
        let parts: Vec<&str> = body.split(':').collect();
        match parts.as_slice() {
            [h, m] if m.len() == 2 => (digits(h)?, digits(m)?, 0),
            [h, m, sec] if m.len() == 2 && sec.len() == 2 => (digits(h)?, digits(m)?, digits(sec)?),
            _ => return None,
        }
    } else {
        match body.len() {
            1 | 2 => (digits(body)?, 0, 0),
            4 => (digits(&body[..2])?, digits(&body[2..])?, 0),
            6 => (digits(&body[..2])?, digits(&body[2..4])?, digits(&body[4..])?),
            _ => return None,
        }
    };

    if minutes > 59 || seconds > 59 {
        return None;
    }
    let total = hours * 3600 + minutes * 60 + seconds;
    if total > MAX_OFFSET_SECONDS {
        return None;
    }
    FixedOffset::east_opt(sign * total)
}
