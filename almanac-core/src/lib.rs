//! Almanac Core - Fundamental types
//!
//! This crate provides the core types and operations used throughout Almanac:
//! - `Zone`: IANA regions and fixed offsets
//! - `LegacyDate`, `ZonedDateTime` and the chrono aliases `Instant`, `LocalDateTime`, `CalendarDate`
//! - `DateTimePattern`: pattern-driven formatting and strict parsing
//! - `convert`: conversions among all temporal kinds
//! - `calendar`: first/last/nth weekday, election day, day shifting
//! - `Value`, `AlmanacError`: runtime values and structured errors for the registry

mod error;
mod temporal;
mod value;

pub mod calendar;
pub mod convert;
pub mod pattern;
pub mod zone;

pub use error::{codes, AlmanacError, DateTimeError, ErrorContext, Severity};
pub use pattern::{DateTimePattern, Parsed};
pub use temporal::{format_duration, CalendarDate, Instant, LegacyDate, LocalDateTime, ZonedDateTime};
pub use value::Value;
pub use zone::Zone;

pub use chrono::{TimeDelta, Weekday};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{AlmanacError, CalendarDate, DateTimeError, DateTimePattern, Instant, LegacyDate};
    pub use crate::{LocalDateTime, Severity, Value, Zone, ZonedDateTime};
    pub use chrono::{TimeDelta, Weekday};
}
