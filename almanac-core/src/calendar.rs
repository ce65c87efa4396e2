//! Calendar arithmetic on proleptic Gregorian dates

use crate::error::DateTimeError;
use crate::temporal::CalendarDate;
use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

fn first_of_month(year: i32, month: u32) -> Result<CalendarDate, DateTimeError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DateTimeError::invalid_argument(format!("No such month: {}-{:02}", year, month)))
}

fn last_of_month(year: i32, month: u32) -> Result<CalendarDate, DateTimeError> {
    first_of_month(year, month)?;
    (28..=31)
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .ok_or_else(|| DateTimeError::invalid_argument(format!("No such month: {}-{:02}", year, month)))
}

fn plus_days(date: CalendarDate, days: i64) -> Result<CalendarDate, DateTimeError> {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| {
            DateTimeError::invalid_argument(format!("{} plus {} days is outside the representable range", date, days))
        })
}

/// Days forward from `from` to the next `target` (0 if already there)
fn days_until(from: Weekday, target: Weekday) -> i64 {
    (target.num_days_from_monday() as i64 - from.num_days_from_monday() as i64).rem_euclid(7)
}

/// First day of the month, or the first `weekday` in it
pub fn first_day(year: i32, month: u32, weekday: Option<Weekday>) -> Result<CalendarDate, DateTimeError> {
    let first = first_of_month(year, month)?;
    match weekday {
        None => Ok(first),
        Some(wd) => plus_days(first, days_until(first.weekday(), wd)),
    }
}

/// Last day of the month, or the last `weekday` in it
pub fn last_day(year: i32, month: u32, weekday: Option<Weekday>) -> Result<CalendarDate, DateTimeError> {
    let last = last_of_month(year, month)?;
    match weekday {
        None => Ok(last),
        Some(wd) => plus_days(last, -days_until(wd, last.weekday())),
    }
}

/// The `week_ordinal`-th `weekday` of the month.
///
/// Positive ordinals count from the start of the month, negative ones from
/// the end (-1 is the last). Zero is the last `weekday` of the previous
/// month. Ordinals are not bounded, so large ones land in other months.
pub fn nth_day_of_week_in(
    year: i32,
    month: u32,
    week_ordinal: i32,
    weekday: Option<Weekday>,
) -> Result<CalendarDate, DateTimeError> {
    let wd = weekday.ok_or_else(|| DateTimeError::invalid_argument("weekday cannot be null"))?;
    let ordinal = week_ordinal as i64;
    if ordinal >= 0 {
        let first = first_of_month(year, month)?;
        plus_days(first, days_until(first.weekday(), wd) + (ordinal - 1) * 7)
    } else {
        let last = last_of_month(year, month)?;
        plus_days(last, -days_until(wd, last.weekday()) - (-ordinal - 1) * 7)
    }
}

/// First Tuesday after the first Monday in November.
///
/// Only `year % 4 == 0` is checked; there is no century rule.
pub fn presidential_election_day_usa(year: i32) -> Result<CalendarDate, DateTimeError> {
    if year % 4 != 0 {
        return Err(DateTimeError::invalid_argument(format!(
            "The specified year: {} is not a U.S. Presidential election year",
            year
        )));
    }
    let first_monday = first_day(year, 11, Some(Weekday::Mon))?;
    plus_days(first_monday, 1)
}

/// `reference` shifted by `number_of_days` (negative goes back)
pub fn n_days_after(number_of_days: i64, reference: CalendarDate) -> Result<CalendarDate, DateTimeError> {
    plus_days(reference, number_of_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_day() {
        assert_eq!(first_day(2021, 9, Some(Weekday::Mon)).unwrap(), date(2021, 9, 6));
        assert_eq!(first_day(2021, 9, None).unwrap(), date(2021, 9, 1));
        // 2021-09-01 is itself a Wednesday
        assert_eq!(first_day(2021, 9, Some(Weekday::Wed)).unwrap(), date(2021, 9, 1));
    }

    #[test]
    fn test_last_day() {
        assert_eq!(last_day(2021, 9, Some(Weekday::Mon)).unwrap(), date(2021, 9, 27));
        assert_eq!(last_day(2021, 9, None).unwrap(), date(2021, 9, 30));
        assert_eq!(last_day(2020, 2, None).unwrap(), date(2020, 2, 29));
        assert_eq!(last_day(2021, 2, None).unwrap(), date(2021, 2, 28));
        // 2021-09-30 is itself a Thursday
        assert_eq!(last_day(2021, 9, Some(Weekday::Thu)).unwrap(), date(2021, 9, 30));
    }

    #[test]
    fn test_nth_day_of_week_in() {
        assert_eq!(nth_day_of_week_in(2018, 7, 3, Some(Weekday::Wed)).unwrap(), date(2018, 7, 18));
        assert_eq!(nth_day_of_week_in(2018, 7, 1, Some(Weekday::Sun)).unwrap(), date(2018, 7, 1));
        assert_eq!(nth_day_of_week_in(2018, 7, -1, Some(Weekday::Tue)).unwrap(), date(2018, 7, 31));
        assert_eq!(nth_day_of_week_in(2018, 7, -2, Some(Weekday::Wed)).unwrap(), date(2018, 7, 18));
    }

    #[test]
    fn test_nth_day_of_week_in_spills_over() {
        // zero is the last Wednesday of June
        assert_eq!(nth_day_of_week_in(2018, 7, 0, Some(Weekday::Wed)).unwrap(), date(2018, 6, 27));
        // there is no 6th Wednesday in July 2018
        assert_eq!(nth_day_of_week_in(2018, 7, 6, Some(Weekday::Wed)).unwrap(), date(2018, 8, 8));
        assert_eq!(nth_day_of_week_in(2018, 7, -6, Some(Weekday::Wed)).unwrap(), date(2018, 6, 20));
    }

    #[test]
    fn test_nth_day_of_week_in_requires_weekday() {
        assert!(matches!(nth_day_of_week_in(2018, 7, 3, None), Err(DateTimeError::InvalidArgument(_))));
    }

    #[test]
    fn test_presidential_election_day_usa() {
        assert_eq!(presidential_election_day_usa(2020).unwrap(), date(2020, 11, 3));
        assert_eq!(presidential_election_day_usa(2024).unwrap(), date(2024, 11, 5));
        // November 1st 2016 was a Tuesday, so the Monday rule pushes it to the 8th
        assert_eq!(presidential_election_day_usa(2016).unwrap(), date(2016, 11, 8));
        assert!(matches!(presidential_election_day_usa(2021), Err(DateTimeError::InvalidArgument(_))));
    }

    #[test]
    fn test_n_days_after() {
        assert_eq!(n_days_after(90, date(2018, 1, 1)).unwrap(), date(2018, 4, 1));
        assert_eq!(n_days_after(-1, date(2018, 1, 1)).unwrap(), date(2017, 12, 31));
        assert_eq!(n_days_after(0, date(2018, 1, 1)).unwrap(), date(2018, 1, 1));
        assert!(n_days_after(i64::MAX, date(2018, 1, 1)).is_err());
        assert!(n_days_after(1, NaiveDate::MAX).is_err());
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(first_day(2021, 13, None), Err(DateTimeError::InvalidArgument(_))));
        assert!(last_day(2021, 0, Some(Weekday::Mon)).is_err());
        assert!(nth_day_of_week_in(2021, 13, 1, Some(Weekday::Mon)).is_err());
    }
}
