//! Standard conversion and calendar functions

mod helpers;
mod convert;
mod calendar;

pub use convert::{ToInstant, ToLocalDateTime, ToZonedDateTime, ToDate, ToDuration, Format, ParseCalendarDate, ZoneFn};
pub use calendar::{FirstDay, LastDay, NthDayOfWeekIn, PresidentialElectionDayUsa, NDaysAfter};
