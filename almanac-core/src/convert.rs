//! Conversions between temporal representations
//!
//! Every conversion pivots through an `Instant`. Naive local date-times are
//! placed on the timeline with `Zone::offset_for_local`, so gaps move the
//! wall-clock time forward and overlaps take the earlier offset.

use crate::error::DateTimeError;
use crate::pattern::DateTimePattern;
use crate::temporal::{instant_of_epoch_millis, CalendarDate, Instant, LegacyDate, LocalDateTime, ZonedDateTime};
use crate::zone::Zone;
use chrono::TimeDelta;

// ========== To Instant ==========

pub fn instant_from_legacy_date(date: &LegacyDate) -> Result<Instant, DateTimeError> {
    date.to_instant()
}

pub fn instant_from_local(local: &LocalDateTime, zone: Zone) -> Result<Instant, DateTimeError> {
    Ok(ZonedDateTime::from_local(local, zone)?.instant())
}

pub fn instant_from_epoch_millis(millis: i64) -> Result<Instant, DateTimeError> {
    instant_of_epoch_millis(millis)
}

pub fn instant_from_zoned(zoned: &ZonedDateTime) -> Instant {
    zoned.instant()
}

/// Parse text to an instant; text without a zone or offset is read as UTC
pub fn instant_from_text(text: &str, pattern: &DateTimePattern) -> Result<Instant, DateTimeError> {
    instant_from_text_in(text, pattern, Zone::utc())
}

/// Parse text to an instant; text without a zone or offset is read in `default_zone`
pub fn instant_from_text_in(text: &str, pattern: &DateTimePattern, default_zone: Zone) -> Result<Instant, DateTimeError> {
    pattern.parse(text)?.to_instant(default_zone)
}

// ========== To LocalDateTime ==========

pub fn local_from_legacy_date(date: &LegacyDate, zone: Zone) -> Result<LocalDateTime, DateTimeError> {
    Ok(local_from_instant(&date.to_instant()?, zone))
}

pub fn local_from_instant(instant: &Instant, zone: Zone) -> LocalDateTime {
    ZonedDateTime::from_instant(instant, zone).local()
}

pub fn local_from_epoch_millis(millis: i64, zone: Zone) -> Result<LocalDateTime, DateTimeError> {
    Ok(local_from_instant(&instant_of_epoch_millis(millis)?, zone))
}

pub fn local_from_text(text: &str, pattern: &DateTimePattern) -> Result<LocalDateTime, DateTimeError> {
    pattern.parse_local_date_time(text)
}

pub fn local_from_zoned(zoned: &ZonedDateTime) -> LocalDateTime {
    zoned.local()
}

// ========== To ZonedDateTime ==========

pub fn zoned_from_legacy_date(date: &LegacyDate, zone: Zone) -> Result<ZonedDateTime, DateTimeError> {
    Ok(ZonedDateTime::from_instant(&date.to_instant()?, zone))
}

pub fn zoned_from_instant(instant: &Instant, zone: Zone) -> ZonedDateTime {
    ZonedDateTime::from_instant(instant, zone)
}

pub fn zoned_from_local(local: &LocalDateTime, zone: Zone) -> Result<ZonedDateTime, DateTimeError> {
    ZonedDateTime::from_local(local, zone)
}

pub fn zoned_from_epoch_millis(millis: i64, zone: Zone) -> Result<ZonedDateTime, DateTimeError> {
    Ok(ZonedDateTime::from_instant(&instant_of_epoch_millis(millis)?, zone))
}

/// The text must carry a zone id, zone name or offset
pub fn zoned_from_text(text: &str, pattern: &DateTimePattern) -> Result<ZonedDateTime, DateTimeError> {
    pattern.parse_zoned(text)
}

// ========== To LegacyDate ==========

pub fn legacy_date_from_instant(instant: &Instant) -> LegacyDate {
    LegacyDate::from_instant(instant)
}

pub fn legacy_date_from_local(local: &LocalDateTime, zone: Zone) -> Result<LegacyDate, DateTimeError> {
    Ok(LegacyDate::from_instant(&instant_from_local(local, zone)?))
}

pub fn legacy_date_from_epoch_millis(millis: i64) -> LegacyDate {
    LegacyDate::from_epoch_millis(millis)
}

/// Text without a zone or offset is read as UTC
pub fn legacy_date_from_text(text: &str, pattern: &DateTimePattern) -> Result<LegacyDate, DateTimeError> {
    legacy_date_from_text_in(text, pattern, Zone::utc())
}

pub fn legacy_date_from_text_in(text: &str, pattern: &DateTimePattern, default_zone: Zone) -> Result<LegacyDate, DateTimeError> {
    Ok(LegacyDate::from_instant(&instant_from_text_in(text, pattern, default_zone)?))
}

pub fn legacy_date_from_zoned(zoned: &ZonedDateTime) -> LegacyDate {
    LegacyDate::from_instant(&zoned.instant())
}

// ========== Durations (to - from) ==========

pub fn duration_between_legacy_dates(from: &LegacyDate, to: &LegacyDate) -> Result<TimeDelta, DateTimeError> {
    duration_between_epoch_millis(from.epoch_millis(), to.epoch_millis())
}

pub fn duration_between_instants(from: &Instant, to: &Instant) -> TimeDelta {
    to.signed_duration_since(*from)
}

/// Field-wise difference; no zone, so DST is invisible here
pub fn duration_between_locals(from: &LocalDateTime, to: &LocalDateTime) -> TimeDelta {
    to.signed_duration_since(*from)
}

pub fn duration_between_epoch_millis(from: i64, to: i64) -> Result<TimeDelta, DateTimeError> {
    to.checked_sub(from)
        .and_then(TimeDelta::try_milliseconds)
        .ok_or_else(|| DateTimeError::invalid_argument(format!("duration from {} to {} milliseconds overflows", from, to)))
}

pub fn duration_between_zoned(from: &ZonedDateTime, to: &ZonedDateTime) -> TimeDelta {
    duration_between_instants(&from.instant(), &to.instant())
}

// ========== To Text ==========

/// Render the legacy date on `zone`'s wall clock
pub fn format_legacy_date(date: &LegacyDate, zone: Zone, pattern: &DateTimePattern) -> Result<String, DateTimeError> {
    pattern.format_zoned(&zoned_from_legacy_date(date, zone)?)
}

/// Render the local fields as they are; `zone` only feeds zone and offset letters
pub fn format_local(local: &LocalDateTime, zone: Option<Zone>, pattern: &DateTimePattern) -> Result<String, DateTimeError> {
    pattern.format_local(local, zone)
}

pub fn format_zoned(zoned: &ZonedDateTime, pattern: &DateTimePattern) -> Result<String, DateTimeError> {
    pattern.format_zoned(zoned)
}

// ========== To CalendarDate ==========

pub fn calendar_date_from_text(text: &str, pattern: &DateTimePattern) -> Result<CalendarDate, DateTimeError> {
    pattern.parse_calendar_date(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{ISO_LOCAL_DATE, ISO_LOCAL_DATE_TIME, ISO_ZONED_DATE_TIME};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> LocalDateTime {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, 0).unwrap()
    }

    fn zone(id: &str) -> Zone {
        Zone::from_short_id(id).unwrap()
    }

    fn pattern(p: &str) -> DateTimePattern {
        DateTimePattern::compile(p).unwrap()
    }

    #[test]
    fn test_legacy_date_from_instant() {
        let instant = Utc.with_ymd_and_hms(2017, 1, 15, 14, 35, 0).unwrap();
        let date = legacy_date_from_instant(&instant);
        assert_eq!(date.epoch_millis(), 1_484_490_900_000);
        assert_eq!(instant_from_legacy_date(&date).unwrap(), instant);
    }

    #[test]
    fn test_legacy_date_from_local_in_cst() {
        // 2017-02-15 12:00 in Chicago is 18:00 UTC
        let date = legacy_date_from_local(&local(2017, 2, 15, 12, 0), zone("CST")).unwrap();
        let expected = Utc.with_ymd_and_hms(2017, 2, 15, 18, 0, 0).unwrap();
        assert_eq!(date.epoch_millis(), expected.timestamp_millis());
    }

    #[test]
    fn test_legacy_date_from_zoned() {
        let zdt = zoned_from_local(&local(2017, 3, 15, 19, 0), zone("PST")).unwrap();
        let date = legacy_date_from_zoned(&zdt);
        assert_eq!(date.epoch_millis(), Utc.with_ymd_and_hms(2017, 3, 16, 2, 0, 0).unwrap().timestamp_millis());
    }

    #[test]
    fn test_legacy_date_from_text_assumes_utc() {
        let date = legacy_date_from_text("2017-01-15T14:35", &pattern(ISO_LOCAL_DATE_TIME)).unwrap();
        assert_eq!(date.epoch_millis(), 1_484_490_900_000);

        let in_tokyo =
            legacy_date_from_text_in("2017-01-15T14:35", &pattern(ISO_LOCAL_DATE_TIME), zone("Asia/Tokyo")).unwrap();
        assert_eq!(in_tokyo.epoch_millis(), 1_484_490_900_000 - 9 * 3_600_000);
    }

    #[test]
    fn test_epoch_millis_round_trip() {
        for millis in [0i64, 1, -1, 1_484_490_900_123, -62_135_596_800_000] {
            assert_eq!(instant_from_epoch_millis(millis).unwrap().timestamp_millis(), millis);
            assert_eq!(legacy_date_from_epoch_millis(millis).epoch_millis(), millis);
        }
        assert!(matches!(instant_from_epoch_millis(i64::MIN), Err(DateTimeError::InvalidArgument(_))));
        assert!(local_from_epoch_millis(i64::MAX, Zone::utc()).is_err());
        assert!(zoned_from_epoch_millis(i64::MAX, Zone::utc()).is_err());
    }

    #[test]
    fn test_instant_from_local_mst() {
        // MST is a fixed -07:00 all year
        let instant = instant_from_local(&local(2017, 3, 15, 20, 0), zone("MST")).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2017, 3, 16, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_local_from_sources_in_est() {
        let est = zone("EST");
        let instant = Utc.with_ymd_and_hms(2017, 4, 15, 15, 0, 0).unwrap();
        let expected = local(2017, 4, 15, 10, 0);
        assert_eq!(local_from_instant(&instant, est), expected);
        assert_eq!(local_from_legacy_date(&legacy_date_from_instant(&instant), est).unwrap(), expected);
        assert_eq!(local_from_epoch_millis(instant.timestamp_millis(), est).unwrap(), expected);
        assert_eq!(local_from_zoned(&zoned_from_instant(&instant, est)), expected);
    }

    #[test]
    fn test_local_from_text() {
        let ldt = local_from_text("2017-01-15T14:35", &pattern(ISO_LOCAL_DATE_TIME)).unwrap();
        assert_eq!(ldt, local(2017, 1, 15, 14, 35));
        assert!(matches!(
            local_from_text("2017-01-15 14:35", &pattern(ISO_LOCAL_DATE_TIME)),
            Err(DateTimeError::Parse { index: 10, .. })
        ));
    }

    #[test]
    fn test_zoned_from_text_chicago() {
        let zdt = zoned_from_text("2017-06-15T23:00-05:00[America/Chicago]", &pattern(ISO_ZONED_DATE_TIME)).unwrap();
        let expected = zoned_from_local(&local(2017, 6, 15, 23, 0), zone("CST")).unwrap();
        assert_eq!(zdt, expected);
    }

    #[test]
    fn test_zoned_from_text_needs_zone() {
        assert!(zoned_from_text("2017-06-15T23:00", &pattern(ISO_LOCAL_DATE_TIME)).is_err());
    }

    #[test]
    fn test_zoned_round_trip_keeps_instant() {
        let instant = Utc.with_ymd_and_hms(2023, 11, 5, 5, 45, 0).unwrap();
        for id in ["America/New_York", "Europe/Paris", "Asia/Kolkata", "+05:30", "UTC"] {
            let zdt = zoned_from_instant(&instant, zone(id));
            assert_eq!(instant_from_zoned(&zdt), instant);
        }
    }

    #[test]
    fn test_naive_through_other_zone_differs() {
        let instant = Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap();
        let ny_local = local_from_instant(&instant, zone("America/New_York"));
        let back = instant_from_local(&ny_local, zone("Europe/Paris")).unwrap();
        assert_ne!(back, instant);
    }

    #[test]
    fn test_durations_one_day_pst() {
        // 2017-03-15 19:00 to 2017-03-16 19:00 in Los Angeles, no transition
        let la = zone("PST");
        let from = zoned_from_local(&local(2017, 3, 15, 19, 0), la).unwrap();
        let to = zoned_from_local(&local(2017, 3, 16, 19, 0), la).unwrap();
        let day = TimeDelta::days(1);

        assert_eq!(duration_between_zoned(&from, &to), day);
        assert_eq!(duration_between_instants(&from.instant(), &to.instant()), day);
        assert_eq!(duration_between_locals(&from.local(), &to.local()), day);
        let (a, b) = (legacy_date_from_zoned(&from), legacy_date_from_zoned(&to));
        assert_eq!(duration_between_legacy_dates(&a, &b).unwrap(), day);
        assert_eq!(duration_between_epoch_millis(a.epoch_millis(), b.epoch_millis()).unwrap(), day);
        assert_eq!(duration_between_epoch_millis(b.epoch_millis(), a.epoch_millis()).unwrap(), -day);
    }

    #[test]
    fn test_durations_across_dst() {
        // New York springs forward on 2023-03-12
        let ny = zone("America/New_York");
        let from = zoned_from_local(&local(2023, 3, 11, 12, 0), ny).unwrap();
        let to = zoned_from_local(&local(2023, 3, 12, 12, 0), ny).unwrap();
        assert_eq!(duration_between_zoned(&from, &to), TimeDelta::hours(23));
        assert_eq!(duration_between_locals(&from.local(), &to.local()), TimeDelta::hours(24));
    }

    #[test]
    fn test_duration_epoch_overflow() {
        assert!(duration_between_epoch_millis(i64::MIN, i64::MAX).is_err());
    }

    #[test]
    fn test_format_all_sources_cst() {
        // 2017-05-15 03:00 in Chicago (CDT)
        let cst = zone("CST");
        let zdt = zoned_from_local(&local(2017, 5, 15, 3, 0), cst).unwrap();
        let p = pattern("MM/dd/yyyy HH:mm");
        let expected = "05/15/2017 03:00";
        assert_eq!(format_legacy_date(&legacy_date_from_zoned(&zdt), cst, &p).unwrap(), expected);
        assert_eq!(format_local(&zdt.local(), Some(cst), &p).unwrap(), expected);
        assert_eq!(format_local(&zdt.local(), None, &p).unwrap(), expected);
        assert_eq!(format_zoned(&zdt, &p).unwrap(), expected);
    }

    #[test]
    fn test_format_parse_round_trip_millis() {
        let p = pattern("uuuu-MM-dd'T'HH:mm:ss.SSSXXX");
        let date = LegacyDate::from_epoch_millis(1_489_629_600_123);
        let text = format_legacy_date(&date, zone("America/Los_Angeles"), &p).unwrap();
        assert_eq!(text, "2017-03-15T19:00:00.123-07:00");
        assert_eq!(legacy_date_from_text(&text, &p).unwrap(), date);
    }

    #[test]
    fn test_calendar_date_from_text() {
        let date = calendar_date_from_text("2018-01-01", &pattern(ISO_LOCAL_DATE)).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2018, 1, 1).unwrap());
        assert!(calendar_date_from_text("2018-1-01", &pattern(ISO_LOCAL_DATE)).is_err());
    }
}
