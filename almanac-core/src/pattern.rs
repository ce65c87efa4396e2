//! Date-time patterns
//!
//! A pattern is compiled once into a list of items and then used to render
//! values to text or to parse text strictly back into fields.
//!
//! Supported letters:
//! - `G` era, `u` proleptic year, `y` year-of-era, `Q` quarter
//! - `M`/`L` month, `d` day-of-month, `D` day-of-year, `E` weekday
//! - `a` AM/PM, `H` 0-23, `k` 1-24, `K` 0-11, `h` 1-12
//! - `m` minute, `s` second, `S` fraction of second
//! - `VV` zone id, `z` zone name, `X`/`x`/`Z` offsets
//!
//! `'...'` quotes literal text, `''` is a single quote, `[...]` is optional.

use crate::error::DateTimeError;
use crate::temporal::{CalendarDate, Instant, ZonedDateTime};
use crate::zone::Zone;
use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Weekday};
use std::fmt;
use std::fmt::Write as _;
use tracing::trace;

/// `2017-01-15T14:35`, `2017-01-15T14:35:20`, `2017-01-15T14:35:20.125`
pub const ISO_LOCAL_DATE_TIME: &str = "uuuu-MM-dd'T'HH:mm[:ss[.SSS]]";
/// `2017-01-15`
pub const ISO_LOCAL_DATE: &str = "uuuu-MM-dd";
/// `2017-01-15T14:35:00.000+01:00`
pub const ISO_OFFSET_DATE_TIME: &str = "uuuu-MM-dd'T'HH:mm[:ss[.SSS]]XXXXX";
/// `2017-03-15T19:00:00.000-07:00[America/Los_Angeles]`
pub const ISO_ZONED_DATE_TIME: &str = "uuuu-MM-dd'T'HH:mm[:ss[.SSS]]XXXXX['['VV']']";

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const WEEKDAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

const QUARTERS: [&str; 4] = ["1st quarter", "2nd quarter", "3rd quarter", "4th quarter"];

/// Abbreviations accepted when parsing `z`, checked before the alias table
const ZONE_ABBREVIATIONS: [(&str, &str); 20] = [
    ("UTC", "UTC"),
    ("GMT", "UTC"),
    ("PST", "America/Los_Angeles"),
    ("PDT", "America/Los_Angeles"),
    ("MST", "America/Denver"),
    ("MDT", "America/Denver"),
    ("CST", "America/Chicago"),
    ("CDT", "America/Chicago"),
    ("EST", "America/New_York"),
    ("EDT", "America/New_York"),
    ("AKST", "America/Anchorage"),
    ("AKDT", "America/Anchorage"),
    ("HST", "Pacific/Honolulu"),
    ("BST", "Europe/London"),
    ("CET", "Europe/Paris"),
    ("CEST", "Europe/Paris"),
    ("EET", "Europe/Athens"),
    ("EEST", "Europe/Athens"),
    ("JST", "Asia/Tokyo"),
    ("IST", "Asia/Kolkata"),
];

// ============================================================================
// Compiled form
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Era,
    ProlepticYear,
    YearOfEra,
    Quarter,
    Month,
    DayOfMonth,
    DayOfYear,
    DayOfWeek,
    AmPm,
    HourOfDay,
    ClockHourOfDay,
    HourOfAmPm,
    ClockHourOfAmPm,
    Minute,
    Second,
    Fraction,
    ZoneId,
    ZoneName,
    OffsetX,
    OffsetLowerX,
    OffsetZ,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Literal(String),
    Field { field: Field, letter: char, count: usize },
    Optional(Vec<Item>),
}

impl Item {
    fn is_numeric_field(&self) -> bool {
        match self {
            Item::Field { field, count, .. } => match field {
                Field::Quarter | Field::Month => *count <= 2,
                Field::Era | Field::DayOfWeek | Field::AmPm => false,
                Field::ZoneId | Field::ZoneName | Field::OffsetX | Field::OffsetLowerX | Field::OffsetZ => false,
                _ => true,
            },
            _ => false,
        }
    }
}

/// Digits claimed by the numeric fields directly after a field.
///
/// Fixed-width fields claim their width; a one-letter field claims one digit
/// and ends the run.
fn adjacent_width(rest: &[Item]) -> usize {
    let mut width = 0;
    for item in rest {
        match item {
            Item::Field { count, .. } if item.is_numeric_field() => {
                if *count == 1 {
                    return width + 1;
                }
                width += count;
            }
            _ => break,
        }
    }
    width
}

/// Map a run of pattern letters to its field, rejecting bad widths
fn field_for(letter: char, count: usize) -> Result<Field, DateTimeError> {
    let (field, max) = match letter {
        'G' => (Field::Era, 5),
        'u' => (Field::ProlepticYear, 10),
        'y' => (Field::YearOfEra, 10),
        'Q' => (Field::Quarter, 5),
        'M' | 'L' => (Field::Month, 5),
        'd' => (Field::DayOfMonth, 2),
        'D' => (Field::DayOfYear, 3),
        'E' => (Field::DayOfWeek, 5),
        'a' => (Field::AmPm, 1),
        'H' => (Field::HourOfDay, 2),
        'k' => (Field::ClockHourOfDay, 2),
        'K' => (Field::HourOfAmPm, 2),
        'h' => (Field::ClockHourOfAmPm, 2),
        'm' => (Field::Minute, 2),
        's' => (Field::Second, 2),
        'S' => (Field::Fraction, 9),
        'V' => {
            if count != 2 {
                return Err(DateTimeError::format("Pattern letter count must be 2: V"));
            }
            (Field::ZoneId, 2)
        }
        'z' => (Field::ZoneName, 4),
        'X' => (Field::OffsetX, 5),
        'x' => (Field::OffsetLowerX, 5),
        'Z' => (Field::OffsetZ, 5),
        other => return Err(DateTimeError::format(format!("Unknown pattern letter: {}", other))),
    };
    if count > max {
        return Err(DateTimeError::format(format!("Too many pattern letters: {}", letter)));
    }
    Ok(field)
}

/// A compiled date-time pattern, reusable for formatting and parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimePattern {
    source: String,
    items: Vec<Item>,
}

impl DateTimePattern {
    /// Compile a pattern, failing with `DateTimeError::Format` if it is malformed
    pub fn compile(pattern: &str) -> Result<Self, DateTimeError> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut stack: Vec<Vec<Item>> = vec![Vec::new()];
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c.is_ascii_alphabetic() {
                let mut count = 1;
                while i + count < chars.len() && chars[i + count] == c {
                    count += 1;
                }
                let field = field_for(c, count)?;
                current(&mut stack).push(Item::Field { field, letter: c, count });
                i += count;
                continue;
            }
            match c {
                '\'' => {
                    let mut literal = String::new();
                    let mut j = i + 1;
                    loop {
                        match chars.get(j) {
                            None => {
                                return Err(DateTimeError::format(format!(
                                    "Pattern ends with an incomplete string literal: {}",
                                    pattern
                                )))
                            }
                            Some('\'') if chars.get(j + 1) == Some(&'\'') => {
                                literal.push('\'');
                                j += 2;
                            }
                            Some('\'') => break,
                            Some(ch) => {
                                literal.push(*ch);
                                j += 1;
                            }
                        }
                    }
                    // `''` on its own is an escaped quote
                    if j == i + 1 {
                        literal.push('\'');
                    }
                    push_literal(current(&mut stack), &literal);
                    i = j + 1;
                }
                '[' => {
                    stack.push(Vec::new());
                    i += 1;
                }
                ']' => {
                    if stack.len() < 2 {
                        return Err(DateTimeError::format(format!(
                            "Pattern invalid as it contains ] without previous [: {}",
                            pattern
                        )));
                    }
                    let inner = stack.pop().unwrap_or_default();
                    current(&mut stack).push(Item::Optional(inner));
                    i += 1;
                }
                '#' | '{' | '}' => {
                    return Err(DateTimeError::format(format!("Pattern includes reserved character: '{}'", c)));
                }
                _ => {
                    push_literal(current(&mut stack), &c.to_string());
                    i += 1;
                }
            }
        }

        if stack.len() != 1 {
            return Err(DateTimeError::format(format!("Pattern has an unclosed optional section: {}", pattern)));
        }
        let items = stack.pop().unwrap_or_default();
        trace!(pattern, items = items.len(), "compiled date-time pattern");
        Ok(Self { source: pattern.to_string(), items })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render a local date-time. Zone and offset letters use `zone` and fail
    /// when it is `None`.
    pub fn format_local(&self, local: &NaiveDateTime, zone: Option<Zone>) -> Result<String, DateTimeError> {
        let subject = match zone {
            Some(zone) => {
                let offset = zone.offset_for_local(local);
                let instant = local
                    .checked_sub_signed(TimeDelta::seconds(offset.local_minus_utc() as i64))
                    .map(|utc| utc.and_utc());
                Subject { local: *local, zone: instant.map(|i| (zone, offset, i)) }
            }
            None => Subject { local: *local, zone: None },
        };
        self.render(&subject)
    }

    pub fn format_zoned(&self, zoned: &ZonedDateTime) -> Result<String, DateTimeError> {
        let subject = Subject {
            local: zoned.local(),
            zone: Some((zoned.zone(), zoned.offset(), zoned.instant())),
        };
        self.render(&subject)
    }

    pub fn format_calendar_date(&self, date: &CalendarDate) -> Result<String, DateTimeError> {
        self.render(&Subject { local: date.and_time(NaiveTime::MIN), zone: None })
    }

    fn render(&self, subject: &Subject) -> Result<String, DateTimeError> {
        let mut out = String::new();
        render_items(&self.items, subject, &mut out)?;
        Ok(out)
    }

    /// Parse text into raw fields; resolve them with the `Parsed` methods
    pub fn parse(&self, text: &str) -> Result<Parsed, DateTimeError> {
        let chars: Vec<char> = text.chars().collect();
        let mut parsed = Parsed { text: text.to_string(), ..Parsed::default() };
        let cursor = Cursor { text, chars: &chars };
        let end = cursor.parse_items(&self.items, 0, &mut parsed)?;
        if end < chars.len() {
            return Err(DateTimeError::parse(text, end, "Unparsed text found"));
        }
        Ok(parsed)
    }

    pub fn parse_local_date_time(&self, text: &str) -> Result<NaiveDateTime, DateTimeError> {
        self.parse(text)?.to_local_date_time()
    }

    pub fn parse_calendar_date(&self, text: &str) -> Result<CalendarDate, DateTimeError> {
        self.parse(text)?.to_calendar_date()
    }

    /// Parse text that carries its own zone or offset
    pub fn parse_zoned(&self, text: &str) -> Result<ZonedDateTime, DateTimeError> {
        self.parse(text)?.to_zoned(None)
    }
}

impl fmt::Display for DateTimePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::str::FromStr for DateTimePattern {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

fn current(stack: &mut Vec<Vec<Item>>) -> &mut Vec<Item> {
    if stack.is_empty() {
        stack.push(Vec::new());
    }
    let last = stack.len() - 1;
    &mut stack[last]
}

fn push_literal(items: &mut Vec<Item>, text: &str) {
    if let Some(Item::Literal(existing)) = items.last_mut() {
        existing.push_str(text);
    } else {
        items.push(Item::Literal(text.to_string()));
    }
}

// ============================================================================
// Formatting
// ============================================================================

struct Subject {
    local: NaiveDateTime,
    zone: Option<(Zone, FixedOffset, Instant)>,
}

fn render_items(items: &[Item], subject: &Subject, out: &mut String) -> Result<(), DateTimeError> {
    for item in items {
        match item {
            Item::Literal(text) => out.push_str(text),
            // `[VV]` sections are dropped for fixed offsets, which have no region id
            Item::Optional(inner) if zone_id_only(inner) && matches!(subject.zone, Some((Zone::Fixed(_), _, _))) => {}
            Item::Optional(inner) => render_items(inner, subject, out)?,
            Item::Field { field, letter, count } => render_field(*field, *letter, *count, subject, out)?,
        }
    }
    Ok(())
}

/// True when the section's only fields are zone ids
fn zone_id_only(items: &[Item]) -> bool {
    let mut fields = items.iter().filter(|item| !matches!(item, Item::Literal(_))).peekable();
    fields.peek().is_some()
        && fields.all(|item| matches!(item, Item::Field { field: Field::ZoneId, .. }))
}

fn render_field(field: Field, letter: char, count: usize, subject: &Subject, out: &mut String) -> Result<(), DateTimeError> {
    let local = &subject.local;
    let year = local.year();
    let year_of_era = if year >= 1 { year } else { 1 - year };
    let quarter = (local.month() - 1) / 3 + 1;
    let hour = local.hour();

    match field {
        Field::Era => {
            let ad = year >= 1;
            out.push_str(match (count, ad) {
                (4, true) => "Anno Domini",
                (4, false) => "Before Christ",
                (5, true) => "A",
                (5, false) => "B",
                (_, true) => "AD",
                (_, false) => "BC",
            });
        }
        Field::ProlepticYear => push_year(out, year as i64, count),
        Field::YearOfEra => push_year(out, year_of_era as i64, count),
        Field::Quarter => match count {
            1 | 2 => push_padded(out, quarter as i64, count),
            3 => {
                let _ = write!(out, "Q{}", quarter);
            }
            4 => out.push_str(QUARTERS[(quarter - 1) as usize]),
            _ => push_padded(out, quarter as i64, 1),
        },
        Field::Month => {
            let name = MONTHS[local.month0() as usize];
            match count {
                1 | 2 => push_padded(out, local.month() as i64, count),
                3 => out.push_str(&name[..3]),
                4 => out.push_str(name),
                _ => out.push_str(&name[..1]),
            }
        }
        Field::DayOfMonth => push_padded(out, local.day() as i64, count),
        Field::DayOfYear => push_padded(out, local.ordinal() as i64, count),
        Field::DayOfWeek => {
            let name = WEEKDAYS[local.weekday().num_days_from_monday() as usize];
            match count {
                4 => out.push_str(name),
                5 => out.push_str(&name[..1]),
                _ => out.push_str(&name[..3]),
            }
        }
        Field::AmPm => out.push_str(if hour < 12 { "AM" } else { "PM" }),
        Field::HourOfDay => push_padded(out, hour as i64, count),
        Field::ClockHourOfDay => push_padded(out, (if hour == 0 { 24 } else { hour }) as i64, count),
        Field::HourOfAmPm => push_padded(out, (hour % 12) as i64, count),
        Field::ClockHourOfAmPm => {
            let h = hour % 12;
            push_padded(out, (if h == 0 { 12 } else { h }) as i64, count)
        }
        Field::Minute => push_padded(out, local.minute() as i64, count),
        Field::Second => push_padded(out, local.second() as i64, count),
        Field::Fraction => {
            let nanos = format!("{:09}", local.nanosecond() % 1_000_000_000);
            out.push_str(&nanos[..count]);
        }
        Field::ZoneId => out.push_str(&zone_of(subject, letter, count)?.0.id()),
        Field::ZoneName => {
            let (zone, _, instant) = zone_of(subject, letter, count)?;
            if count == 4 {
                out.push_str(&zone.id());
            } else {
                out.push_str(&zone.abbreviation_at(&instant));
            }
        }
        Field::OffsetX | Field::OffsetLowerX | Field::OffsetZ => {
            let offset = zone_of(subject, letter, count)?.1;
            out.push_str(&format_offset(offset, OffsetStyle::of(field, count)));
        }
    }
    Ok(())
}

fn zone_of(subject: &Subject, letter: char, count: usize) -> Result<(Zone, FixedOffset, Instant), DateTimeError> {
    subject.zone.ok_or_else(|| {
        DateTimeError::format(format!(
            "Pattern letters '{}' need a zone, but the value has none",
            letter.to_string().repeat(count)
        ))
    })
}

fn push_padded(out: &mut String, value: i64, width: usize) {
    if value < 0 {
        let _ = write!(out, "-{:0width$}", value.unsigned_abs(), width = width);
    } else {
        let _ = write!(out, "{:0width$}", value, width = width);
    }
}

fn push_year(out: &mut String, year: i64, count: usize) {
    if count == 2 {
        let _ = write!(out, "{:02}", year.rem_euclid(100));
        return;
    }
    let digits = year.unsigned_abs().to_string().len();
    if year >= 0 && count >= 4 && digits > count {
        out.push('+');
    }
    push_padded(out, year, count);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetShape {
    /// `+HH`, minutes only when non-zero
    HourOptMinute,
    /// `+HHMM`
    HourMinute,
    /// `+HH:MM`
    HourColonMinute,
    /// `+HHMM`, seconds only when non-zero
    HourMinuteOptSecond,
    /// `+HH:MM`, seconds only when non-zero
    HourColonMinuteOptSecond,
    /// `GMT+HH:MM`
    Localized,
}

#[derive(Debug, Clone, Copy)]
struct OffsetStyle {
    shape: OffsetShape,
    zero: &'static str,
}

impl OffsetStyle {
    fn of(field: Field, count: usize) -> Self {
        let shape = match (field, count) {
            (Field::OffsetZ, 1..=3) => OffsetShape::HourMinute,
            (Field::OffsetZ, 4) => OffsetShape::Localized,
            (Field::OffsetZ, _) => OffsetShape::HourColonMinuteOptSecond,
            (_, 1) => OffsetShape::HourOptMinute,
            (_, 2) => OffsetShape::HourMinute,
            (_, 3) => OffsetShape::HourColonMinute,
            (_, 4) => OffsetShape::HourMinuteOptSecond,
            _ => OffsetShape::HourColonMinuteOptSecond,
        };
        let zero = match (field, shape) {
            (Field::OffsetX, _) => "Z",
            (Field::OffsetZ, OffsetShape::HourMinute) => "+0000",
            (Field::OffsetZ, OffsetShape::Localized) => "GMT",
            (Field::OffsetZ, _) => "Z",
            (_, OffsetShape::HourOptMinute) => "+00",
            (_, OffsetShape::HourMinute) | (_, OffsetShape::HourMinuteOptSecond) => "+0000",
            _ => "+00:00",
        };
        Self { shape, zero }
    }
}

fn format_offset(offset: FixedOffset, style: OffsetStyle) -> String {
    let total = offset.local_minus_utc();
    if total == 0 {
        return style.zero.to_string();
    }
    let sign = if total < 0 { '-' } else { '+' };
    let abs = total.abs();
    let (h, m, s) = (abs / 3600, (abs % 3600) / 60, abs % 60);
    match style.shape {
        OffsetShape::HourOptMinute if m == 0 => format!("{}{:02}", sign, h),
        OffsetShape::HourOptMinute | OffsetShape::HourMinute => format!("{}{:02}{:02}", sign, h, m),
        OffsetShape::HourColonMinute => format!("{}{:02}:{:02}", sign, h, m),
        OffsetShape::HourMinuteOptSecond if s == 0 => format!("{}{:02}{:02}", sign, h, m),
        OffsetShape::HourMinuteOptSecond => format!("{}{:02}{:02}{:02}", sign, h, m, s),
        OffsetShape::HourColonMinuteOptSecond | OffsetShape::Localized => {
            let prefix = if style.shape == OffsetShape::Localized { "GMT" } else { "" };
            if s == 0 {
                format!("{}{}{:02}:{:02}", prefix, sign, h, m)
            } else {
                format!("{}{}{:02}:{:02}:{:02}", prefix, sign, h, m, s)
            }
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Raw fields read from text, before they are resolved into a value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    text: String,
    era: Option<u32>,
    proleptic_year: Option<i32>,
    year_of_era: Option<i32>,
    quarter: Option<u32>,
    month: Option<u32>,
    day: Option<u32>,
    day_of_year: Option<u32>,
    weekday: Option<Weekday>,
    am_pm: Option<u32>,
    hour_of_day: Option<u32>,
    clock_hour_of_day: Option<u32>,
    hour_of_am_pm: Option<u32>,
    clock_hour_of_am_pm: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    nanosecond: Option<u32>,
    zone: Option<Zone>,
    offset: Option<FixedOffset>,
}

struct Cursor<'a> {
    text: &'a str,
    chars: &'a [char],
}

impl<'a> Cursor<'a> {
    fn error(&self, index: usize, message: impl Into<String>) -> DateTimeError {
        DateTimeError::parse(self.text, index, message)
    }

    fn parse_items(&self, items: &[Item], mut pos: usize, parsed: &mut Parsed) -> Result<usize, DateTimeError> {
        for (i, item) in items.iter().enumerate() {
            pos = match item {
                Item::Literal(literal) => self.expect_literal(literal, pos)?,
                Item::Optional(inner) => {
                    let mut attempt = parsed.clone();
                    match self.parse_items(inner, pos, &mut attempt) {
                        Ok(next) => {
                            *parsed = attempt;
                            next
                        }
                        Err(_) => pos,
                    }
                }
                Item::Field { field, letter, count } => {
                    let reserve = adjacent_width(&items[i + 1..]);
                    self.parse_field(*field, *letter, *count, reserve, pos, parsed)?
                }
            };
        }
        Ok(pos)
    }

    fn expect_literal(&self, literal: &str, pos: usize) -> Result<usize, DateTimeError> {
        let mut p = pos;
        for expected in literal.chars() {
            if self.chars.get(p) != Some(&expected) {
                return Err(self.error(p, format!("Expected '{}'", expected)));
            }
            p += 1;
        }
        Ok(p)
    }

    fn read_number(&self, pos: usize, min: usize, max: usize) -> Result<(i64, usize), DateTimeError> {
        let mut end = pos;
        let mut value: i64 = 0;
        while end < self.chars.len() && end - pos < max {
            match self.chars[end].to_digit(10) {
                Some(d) => {
                    value = value * 10 + d as i64;
                    end += 1;
                }
                None => break,
            }
        }
        if end - pos < min {
            return Err(self.error(pos, format!("Expected {} digit(s)", min)));
        }
        Ok((value, end))
    }

    /// Longest candidate that matches at `pos`
    fn read_text<T: Copy>(&self, pos: usize, candidates: &[(String, T)]) -> Result<(T, usize), DateTimeError> {
        let mut best: Option<(T, usize)> = None;
        for (name, value) in candidates {
            let len = name.chars().count();
            let matches = self.chars.len() >= pos + len
                && name.chars().zip(&self.chars[pos..pos + len]).all(|(a, b)| a == *b);
            if matches && best.map(|(_, l)| len > l).unwrap_or(true) {
                best = Some((*value, len));
            }
        }
        best.map(|(value, len)| (value, pos + len))
            .ok_or_else(|| self.error(pos, "Text does not match any expected name"))
    }

    fn parse_field(
        &self,
        field: Field,
        letter: char,
        count: usize,
        reserve: usize,
        pos: usize,
        parsed: &mut Parsed,
    ) -> Result<usize, DateTimeError> {
        match field {
            Field::Era => {
                let names = match count {
                    4 => ["Before Christ", "Anno Domini"],
                    5 => ["B", "A"],
                    _ => ["BC", "AD"],
                };
                let candidates = [(names[0].to_string(), 0u32), (names[1].to_string(), 1u32)];
                let (era, next) = self.read_text(pos, &candidates)?;
                self.assign(&mut parsed.era, era, pos, "era")?;
                Ok(next)
            }
            Field::ProlepticYear | Field::YearOfEra => {
                let (year, next) = self.read_year(field, count, reserve, pos)?;
                let slot = if field == Field::ProlepticYear { &mut parsed.proleptic_year } else { &mut parsed.year_of_era };
                self.assign(slot, year, pos, "year")?;
                Ok(next)
            }
            Field::Quarter if count <= 2 => {
                let (q, next) = self.read_bounded(pos, count, 1, 1, 4)?;
                self.assign(&mut parsed.quarter, q, pos, "quarter")?;
                Ok(next)
            }
            Field::Quarter => {
                let candidates: Vec<(String, u32)> = (1..=4u32)
                    .map(|q| match count {
                        3 => (format!("Q{}", q), q),
                        4 => (QUARTERS[(q - 1) as usize].to_string(), q),
                        _ => (q.to_string(), q),
                    })
                    .collect();
                let (q, next) = self.read_text(pos, &candidates)?;
                self.assign(&mut parsed.quarter, q, pos, "quarter")?;
                Ok(next)
            }
            Field::Month if count <= 2 => {
                let (m, next) = self.read_bounded(pos, count, 2, 1, 12)?;
                self.assign(&mut parsed.month, m, pos, "month")?;
                Ok(next)
            }
            Field::Month => {
                let candidates: Vec<(String, u32)> = MONTHS
                    .iter()
                    .zip(1u32..)
                    .map(|(name, m)| match count {
                        3 => (name[..3].to_string(), m),
                        4 => (name.to_string(), m),
                        _ => (name[..1].to_string(), m),
                    })
                    .collect();
                let (m, next) = self.read_text(pos, &candidates)?;
                self.assign(&mut parsed.month, m, pos, "month")?;
                Ok(next)
            }
            Field::DayOfMonth => {
                let (d, next) = self.read_bounded(pos, count, 2, 1, 31)?;
                self.assign(&mut parsed.day, d, pos, "day-of-month")?;
                Ok(next)
            }
            Field::DayOfYear => {
                let (d, next) = self.read_bounded(pos, count, 3, 1, 366)?;
                self.assign(&mut parsed.day_of_year, d, pos, "day-of-year")?;
                Ok(next)
            }
            Field::DayOfWeek => {
                let candidates: Vec<(String, Weekday)> = WEEKDAYS
                    .iter()
                    .zip([Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri, Weekday::Sat, Weekday::Sun])
                    .map(|(name, wd)| match count {
                        4 => (name.to_string(), wd),
                        5 => (name[..1].to_string(), wd),
                        _ => (name[..3].to_string(), wd),
                    })
                    .collect();
                let (wd, next) = self.read_text(pos, &candidates)?;
                self.assign(&mut parsed.weekday, wd, pos, "day-of-week")?;
                Ok(next)
            }
            Field::AmPm => {
                let candidates = [("AM".to_string(), 0u32), ("PM".to_string(), 1u32)];
                let (v, next) = self.read_text(pos, &candidates)?;
                self.assign(&mut parsed.am_pm, v, pos, "AM/PM")?;
                Ok(next)
            }
            Field::HourOfDay => {
                let (v, next) = self.read_bounded(pos, count, 2, 0, 23)?;
                self.assign(&mut parsed.hour_of_day, v, pos, "hour-of-day")?;
                Ok(next)
            }
            Field::ClockHourOfDay => {
                let (v, next) = self.read_bounded(pos, count, 2, 1, 24)?;
                self.assign(&mut parsed.clock_hour_of_day, v, pos, "clock-hour-of-day")?;
                Ok(next)
            }
            Field::HourOfAmPm => {
                let (v, next) = self.read_bounded(pos, count, 2, 0, 11)?;
                self.assign(&mut parsed.hour_of_am_pm, v, pos, "hour-of-am-pm")?;
                Ok(next)
            }
            Field::ClockHourOfAmPm => {
                let (v, next) = self.read_bounded(pos, count, 2, 1, 12)?;
                self.assign(&mut parsed.clock_hour_of_am_pm, v, pos, "clock-hour-of-am-pm")?;
                Ok(next)
            }
            Field::Minute => {
                let (v, next) = self.read_bounded(pos, count, 2, 0, 59)?;
                self.assign(&mut parsed.minute, v, pos, "minute")?;
                Ok(next)
            }
            Field::Second => {
                let (v, next) = self.read_bounded(pos, count, 2, 0, 59)?;
                self.assign(&mut parsed.second, v, pos, "second")?;
                Ok(next)
            }
            Field::Fraction => {
                let (v, next) = self.read_number(pos, count, count)?;
                let nanos = v as u32 * 10u32.pow((9 - count) as u32);
                self.assign(&mut parsed.nanosecond, nanos, pos, "fraction")?;
                Ok(next)
            }
            Field::ZoneId | Field::ZoneName => {
                let mut end = pos;
                while end < self.chars.len() && is_zone_char(self.chars[end]) {
                    end += 1;
                }
                let token: String = self.chars[pos..end].iter().collect();
                let zone = if field == Field::ZoneName {
                    resolve_zone_name(&token)
                } else {
                    Zone::parse(&token).ok()
                };
                let zone = zone.ok_or_else(|| {
                    self.error(pos, format!("Unknown zone for pattern letters '{}'", letter.to_string().repeat(count)))
                })?;
                self.assign(&mut parsed.zone, zone, pos, "zone")?;
                Ok(end)
            }
            Field::OffsetX | Field::OffsetLowerX | Field::OffsetZ => {
                let (offset, next) = self.read_offset(pos, OffsetStyle::of(field, count))?;
                self.assign(&mut parsed.offset, offset, pos, "offset")?;
                Ok(next)
            }
        }
    }

    /// Fixed width for two or more letters, otherwise 1 to `natural` digits
    fn read_bounded(&self, pos: usize, count: usize, natural: usize, lo: u32, hi: u32) -> Result<(u32, usize), DateTimeError> {
        let (min, max) = if count == 1 { (1, natural) } else { (count, count.max(natural)) };
        let (value, next) = self.read_number(pos, min, max)?;
        if value < lo as i64 || value > hi as i64 {
            return Err(self.error(pos, format!("Value {} out of range {}-{}", value, lo, hi)));
        }
        Ok((value as u32, next))
    }

    /// `reserve` is the digits the directly following numeric fields need;
    /// a year never eats into them.
    fn read_year(&self, field: Field, count: usize, reserve: usize, pos: usize) -> Result<(i32, usize), DateTimeError> {
        if count == 2 {
            let (yy, next) = self.read_number(pos, 2, 2)?;
            return Ok((2000 + yy as i32, next));
        }
        let mut start = pos;
        let mut negative = false;
        if field == Field::ProlepticYear {
            match self.chars.get(pos) {
                Some('-') => {
                    negative = true;
                    start += 1;
                }
                Some('+') => start += 1,
                _ => {}
            }
        }
        let max = if reserve == 0 {
            10
        } else if count >= 4 {
            count
        } else {
            let run = self.chars[start.min(self.chars.len())..].iter().take_while(|c| c.is_ascii_digit()).count();
            run.saturating_sub(reserve).clamp(count, 10)
        };
        let (value, next) = self.read_number(start, count, max)?;
        let value = if negative { -value } else { value };
        let year = i32::try_from(value).map_err(|_| self.error(pos, "Year out of range"))?;
        Ok((year, next))
    }

    fn read_offset(&self, pos: usize, style: OffsetStyle) -> Result<(FixedOffset, usize), DateTimeError> {
        if self.expect_literal(style.zero, pos).is_ok() {
            let zero_end = pos + style.zero.chars().count();
            // `GMT` may be followed by a signed offset
            if !(style.shape == OffsetShape::Localized && matches!(self.chars.get(zero_end), Some('+') | Some('-'))) {
                return Ok((FixedOffset::east_opt(0).ok_or_else(|| self.error(pos, "Invalid offset"))?, zero_end));
            }
        }
        let mut p = pos;
        if style.shape == OffsetShape::Localized {
            p = self.expect_literal("GMT", p)?;
        }
        let sign = match self.chars.get(p) {
            Some('+') => 1,
            Some('-') => -1,
            _ => return Err(self.error(p, "Expected offset sign")),
        };
        p += 1;
        let colon = matches!(
            style.shape,
            OffsetShape::HourColonMinute | OffsetShape::HourColonMinuteOptSecond | OffsetShape::Localized
        );
        let (hours, next) = self.read_number(p, 2, 2)?;
        p = next;

        let minutes_required = style.shape != OffsetShape::HourOptMinute;
        let mut minutes = 0;
        let mut seconds = 0;
        match self.read_offset_part(p, colon) {
            Some((m, next)) => {
                minutes = m;
                p = next;
            }
            None if minutes_required => return Err(self.error(p, "Expected offset minutes")),
            None => {}
        }
        if matches!(style.shape, OffsetShape::HourMinuteOptSecond | OffsetShape::HourColonMinuteOptSecond | OffsetShape::Localized) {
            if let Some((s, next)) = self.read_offset_part(p, colon) {
                seconds = s;
                p = next;
            }
        }
        if minutes > 59 || seconds > 59 {
            return Err(self.error(pos, "Offset field out of range"));
        }
        let total = hours * 3600 + minutes * 60 + seconds;
        let offset = i32::try_from(sign * total)
            .ok()
            .filter(|t| t.abs() <= crate::zone::MAX_OFFSET_SECONDS)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| self.error(pos, "Offset out of range"))?;
        Ok((offset, p))
    }

    fn read_offset_part(&self, pos: usize, colon: bool) -> Option<(i64, usize)> {
        let start = if colon {
            if self.chars.get(pos) != Some(&':') {
                return None;
            }
            pos + 1
        } else {
            pos
        };
        self.read_number(start, 2, 2).ok()
    }

    fn assign<T: PartialEq + Copy + fmt::Debug>(&self, slot: &mut Option<T>, value: T, pos: usize, name: &str) -> Result<(), DateTimeError> {
        match slot {
            Some(existing) if *existing != value => Err(self.error(
                pos,
                format!("Conflict found: {} {:?} differs from {:?}", name, value, existing),
            )),
            _ => {
                *slot = Some(value);
                Ok(())
            }
        }
    }
}

fn is_zone_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '+' | '-' | ':' | '.' | '~')
}

fn resolve_zone_name(token: &str) -> Option<Zone> {
    ZONE_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == token)
        .and_then(|(_, id)| Zone::parse(id).ok())
        .or_else(|| Zone::from_short_id(token).ok())
}

impl Parsed {
    /// Zone read from the text, if any
    pub fn zone(&self) -> Option<Zone> {
        self.zone
    }

    /// Offset read from the text, if any
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    fn error(&self, message: impl Into<String>) -> DateTimeError {
        DateTimeError::parse(&self.text, 0, message)
    }

    fn year(&self) -> Result<Option<i32>, DateTimeError> {
        let from_era = match self.year_of_era {
            Some(yoe) => Some(if self.era == Some(0) { 1 - yoe } else { yoe }),
            None => None,
        };
        match (self.proleptic_year, from_era) {
            (Some(a), Some(b)) if a != b => Err(self.error(format!("Conflict found: year {} differs from {}", a, b))),
            (Some(a), _) => Ok(Some(a)),
            (None, b) => Ok(b),
        }
    }

    /// Resolve year with month and day, or year with day-of-year
    pub fn to_calendar_date(&self) -> Result<CalendarDate, DateTimeError> {
        let year = self.year()?.ok_or_else(|| self.error("Unable to obtain a date: no year"))?;
        let date = match (self.month, self.day, self.day_of_year) {
            (Some(month), Some(day), _) => NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| self.error(format!("Invalid date '{:04}-{:02}-{:02}'", year, month, day)))?,
            (_, _, Some(doy)) => NaiveDate::from_yo_opt(year, doy)
                .ok_or_else(|| self.error(format!("Invalid day-of-year {} for year {}", doy, year)))?,
            _ => return Err(self.error("Unable to obtain a date: need month and day, or day-of-year")),
        };
        if let Some(doy) = self.day_of_year {
            if date.ordinal() != doy {
                return Err(self.error(format!("Conflict found: day-of-year {} differs from {}", doy, date.ordinal())));
            }
        }
        if let Some(month) = self.month {
            if date.month() != month {
                return Err(self.error(format!("Conflict found: month {} differs from {}", month, date.month())));
            }
        }
        if let Some(weekday) = self.weekday {
            if date.weekday() != weekday {
                return Err(self.error(format!("Conflict found: {} differs from {} derived from {}", weekday, date.weekday(), date)));
            }
        }
        if let Some(quarter) = self.quarter {
            if (date.month() - 1) / 3 + 1 != quarter {
                return Err(self.error(format!("Conflict found: quarter {} does not contain {}", quarter, date)));
            }
        }
        Ok(date)
    }

    fn hour(&self) -> Result<Option<u32>, DateTimeError> {
        let mut candidates = Vec::new();
        if let Some(h) = self.hour_of_day {
            candidates.push(h);
        }
        if let Some(k) = self.clock_hour_of_day {
            candidates.push(k % 24);
        }
        let twelve = self.hour_of_am_pm.or(self.clock_hour_of_am_pm.map(|h| h % 12));
        if let (Some(a), Some(b)) = (self.hour_of_am_pm, self.clock_hour_of_am_pm.map(|h| h % 12)) {
            if a != b {
                return Err(self.error(format!("Conflict found: hour-of-am-pm {} differs from {}", a, b)));
            }
        }
        if let Some(h) = twelve {
            let am_pm = self
                .am_pm
                .ok_or_else(|| self.error("Unable to resolve a 12-hour clock value without AM/PM"))?;
            candidates.push(h + 12 * am_pm);
        }
        match candidates.split_first() {
            None => Ok(None),
            Some((first, rest)) => match rest.iter().find(|h| *h != first) {
                Some(other) => Err(self.error(format!("Conflict found: hour {} differs from {}", first, other))),
                None => Ok(Some(*first)),
            },
        }
    }

    /// Resolve the date plus time of day; minute, second and fraction default to zero
    pub fn to_local_date_time(&self) -> Result<NaiveDateTime, DateTimeError> {
        let date = self.to_calendar_date()?;
        let hour = self.hour()?.ok_or_else(|| self.error("Unable to obtain a date-time: no hour"))?;
        let time = NaiveTime::from_hms_nano_opt(
            hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.nanosecond.unwrap_or(0),
        )
        .ok_or_else(|| self.error("Invalid time of day"))?;
        Ok(date.and_time(time))
    }

    /// Resolve to a zoned value. An offset in the text fixes the instant;
    /// otherwise the local time is placed in the text's zone, then `default_zone`.
    pub fn to_zoned(&self, default_zone: Option<Zone>) -> Result<ZonedDateTime, DateTimeError> {
        let local = self.to_local_date_time()?;
        let to_parse_error = |e: DateTimeError| self.error(e.to_string());
        match (self.zone, self.offset) {
            (Some(zone), Some(offset)) => ZonedDateTime::from_local_with_offset(&local, offset, zone).map_err(to_parse_error),
            (None, Some(offset)) => {
                ZonedDateTime::from_local_with_offset(&local, offset, Zone::Fixed(offset)).map_err(to_parse_error)
            }
            (Some(zone), None) => ZonedDateTime::from_local(&local, zone).map_err(to_parse_error),
            (None, None) => match default_zone {
                Some(zone) => ZonedDateTime::from_local(&local, zone).map_err(to_parse_error),
                None => Err(self.error("Unable to obtain a zoned date-time: text has no zone or offset")),
            },
        }
    }

    pub fn to_instant(&self, default_zone: Zone) -> Result<Instant, DateTimeError> {
        Ok(self.to_zoned(Some(default_zone))?.instant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, s).unwrap()
    }

    fn fmt(pattern: &str, value: &NaiveDateTime) -> String {
        DateTimePattern::compile(pattern).unwrap().format_local(value, None).unwrap()
    }

    #[test]
    fn test_compile_errors() {
        for bad in ["yyyy-bb", "HHH", "dd'T", "[yyyy", "yyyy]", "V", "VVV", "dd#", "{d}", "aa", "SSSSSSSSSS"] {
            let err = DateTimePattern::compile(bad).unwrap_err();
            assert!(matches!(err, DateTimeError::Format(_)), "{} should fail: {:?}", bad, err);
        }
    }

    #[test]
    fn test_quotes() {
        let p = DateTimePattern::compile("'at' HH 'o''clock' ''").unwrap();
        assert_eq!(p.format_local(&local(2017, 1, 15, 9, 0, 0), None).unwrap(), "at 09 o'clock '");
    }

    #[test]
    fn test_format_numeric_fields() {
        let v = NaiveDate::from_ymd_opt(2017, 1, 5).unwrap().and_hms_milli_opt(14, 5, 9, 42).unwrap();
        assert_eq!(fmt("yyyy-MM-dd HH:mm:ss.SSS", &v), "2017-01-05 14:05:09.042");
        assert_eq!(fmt("y/M/d H:m:s", &v), "2017/1/5 14:5:9");
        assert_eq!(fmt("yy DDD D", &v), "17 005 5");
        assert_eq!(fmt("h a K k", &v), "2 PM 2 14");
        assert_eq!(fmt("uuuu'W'Q QQQ QQQQ", &v), "2017W1 Q1 1st quarter");
    }

    #[test]
    fn test_format_text_fields() {
        let v = local(2018, 7, 18, 0, 30, 0);
        assert_eq!(fmt("EEE, MMM d", &v), "Wed, Jul 18");
        assert_eq!(fmt("EEEE MMMM G GGGG", &v), "Wednesday July AD Anno Domini");
        assert_eq!(fmt("EEEEE MMMMM GGGGG", &v), "W J A");
        assert_eq!(fmt("hh:mm a", &v), "12:30 AM");
        assert_eq!(fmt("kk", &v), "24");
    }

    #[test]
    fn test_format_years_outside_four_digits() {
        let bc = local(-43, 3, 15, 0, 0, 0);
        assert_eq!(fmt("uuuu", &bc), "-0043");
        assert_eq!(fmt("yyyy G", &bc), "0044 BC");
        let far = local(12345, 1, 1, 0, 0, 0);
        assert_eq!(fmt("uuuu", &far), "+12345");
    }

    #[test]
    fn test_format_local_zone_letters() {
        let p = DateTimePattern::compile("HH:mm VV").unwrap();
        let v = local(2017, 3, 15, 19, 0, 0);
        assert!(matches!(p.format_local(&v, None), Err(DateTimeError::Format(_))));
        let zone = Zone::parse("America/Los_Angeles").unwrap();
        assert_eq!(p.format_local(&v, Some(zone)).unwrap(), "19:00 America/Los_Angeles");
    }

    #[test]
    fn test_format_zoned_offsets() {
        let zone = Zone::parse("America/Los_Angeles").unwrap();
        let zdt = ZonedDateTime::from_local(&local(2017, 3, 15, 19, 0, 0), zone).unwrap();
        let p = DateTimePattern::compile("X XX XXX XXXXX x Z ZZZZ z zzzz").unwrap();
        assert_eq!(p.format_zoned(&zdt).unwrap(), "-07 -0700 -07:00 -07:00 -07 -0700 GMT-07:00 PDT America/Los_Angeles");

        let utc = ZonedDateTime::from_instant(&Utc.with_ymd_and_hms(2017, 1, 15, 14, 35, 0).unwrap(), Zone::utc());
        let p = DateTimePattern::compile("X|xxx|Z|ZZZZ|ZZZZZ|VV").unwrap();
        assert_eq!(p.format_zoned(&utc).unwrap(), "Z|+00:00|+0000|GMT|Z|Z");
    }

    #[test]
    fn test_format_half_hour_offset() {
        let zone = Zone::parse("Asia/Kolkata").unwrap();
        let zdt = ZonedDateTime::from_local(&local(2020, 5, 1, 12, 0, 0), zone).unwrap();
        let p = DateTimePattern::compile("X|xx|xxx").unwrap();
        assert_eq!(p.format_zoned(&zdt).unwrap(), "+0530|+0530|+05:30");
    }

    #[test]
    fn test_iso_local_date_time_optional_sections() {
        let p = DateTimePattern::compile(ISO_LOCAL_DATE_TIME).unwrap();
        assert_eq!(p.parse_local_date_time("2017-01-15T14:35").unwrap(), local(2017, 1, 15, 14, 35, 0));
        assert_eq!(p.parse_local_date_time("2017-01-15T14:35:20").unwrap(), local(2017, 1, 15, 14, 35, 20));
        let with_millis = p.parse_local_date_time("2017-01-15T14:35:20.125").unwrap();
        assert_eq!(with_millis.nanosecond(), 125_000_000);
        assert_eq!(p.format_local(&with_millis, None).unwrap(), "2017-01-15T14:35:20.125");
    }

    #[test]
    fn test_parse_error_index() {
        let p = DateTimePattern::compile("yyyy-MM-dd HH:mm").unwrap();
        match p.parse_local_date_time("2017-01-x5 10:00") {
            Err(DateTimeError::Parse { index, .. }) => assert_eq!(index, 8),
            other => panic!("unexpected {:?}", other),
        }
        match p.parse_local_date_time("2017-01-15 10:00 extra") {
            Err(DateTimeError::Parse { index, .. }) => assert_eq!(index, 16),
            other => panic!("unexpected {:?}", other),
        }
        assert!(p.parse_local_date_time("2017-13-15 10:00").is_err());
        assert!(p.parse_local_date_time("2017-02-30 10:00").is_err());
    }

    #[test]
    fn test_parse_adjacent_year() {
        let p = DateTimePattern::compile("yyyyMMddHHmm").unwrap();
        assert_eq!(p.parse_local_date_time("201701151435").unwrap(), local(2017, 1, 15, 14, 35, 0));
        let p = DateTimePattern::compile("dd/MM/yy").unwrap();
        assert_eq!(p.parse_calendar_date("15/01/17").unwrap(), NaiveDate::from_ymd_opt(2017, 1, 15).unwrap());
    }

    #[test]
    fn test_format_zoned_iso_skips_region_for_fixed_offsets() {
        let p = DateTimePattern::compile(ISO_ZONED_DATE_TIME).unwrap();
        let fixed = ZonedDateTime::from_local(&local(2017, 3, 15, 19, 0, 0), Zone::parse("+05:30").unwrap()).unwrap();
        assert_eq!(p.format_zoned(&fixed).unwrap(), "2017-03-15T19:00:00.000+05:30");

        let la = ZonedDateTime::from_local(&local(2017, 3, 15, 19, 0, 0), Zone::parse("America/Los_Angeles").unwrap()).unwrap();
        assert_eq!(p.format_zoned(&la).unwrap(), "2017-03-15T19:00:00.000-07:00[America/Los_Angeles]");
        // the formatted text parses back to the same value
        assert_eq!(p.parse_zoned(&p.format_zoned(&fixed).unwrap()).unwrap(), fixed);
    }

    #[test]
    fn test_parse_short_year_leaves_room_for_adjacent_fields() {
        let jan_15 = NaiveDate::from_ymd_opt(2017, 1, 15).unwrap();
        let p = DateTimePattern::compile("yMMdd").unwrap();
        assert_eq!(p.parse_calendar_date("20170115").unwrap(), jan_15);
        let p = DateTimePattern::compile("uuuMMdd").unwrap();
        assert_eq!(p.parse_calendar_date("20170115").unwrap(), jan_15);
        // a lone year still reads greedily
        let p = DateTimePattern::compile("y-MM-dd").unwrap();
        assert_eq!(p.parse_calendar_date("2017-01-15").unwrap(), jan_15);
        assert!(DateTimePattern::compile("yMMdd").unwrap().parse_calendar_date("170115").is_ok());
    }

    #[test]
    fn test_parse_text_fields_case_sensitive() {
        let p = DateTimePattern::compile("EEE, d MMM yyyy").unwrap();
        assert_eq!(p.parse_calendar_date("Wed, 18 Jul 2018").unwrap(), NaiveDate::from_ymd_opt(2018, 7, 18).unwrap());
        assert!(p.parse_calendar_date("wed, 18 jul 2018").is_err());
        // weekday must agree with the date
        assert!(p.parse_calendar_date("Thu, 18 Jul 2018").is_err());
    }

    #[test]
    fn test_parse_twelve_hour_clock() {
        let p = DateTimePattern::compile("yyyy-MM-dd hh:mm a").unwrap();
        assert_eq!(p.parse_local_date_time("2017-01-15 12:05 AM").unwrap(), local(2017, 1, 15, 0, 5, 0));
        assert_eq!(p.parse_local_date_time("2017-01-15 02:05 PM").unwrap(), local(2017, 1, 15, 14, 5, 0));

        let without_am_pm = DateTimePattern::compile("yyyy-MM-dd hh:mm").unwrap();
        assert!(matches!(
            without_am_pm.parse_local_date_time("2017-01-15 02:05"),
            Err(DateTimeError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_day_of_year() {
        let p = DateTimePattern::compile("uuuu-DDD").unwrap();
        assert_eq!(p.parse_calendar_date("2020-366").unwrap(), NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
        assert!(p.parse_calendar_date("2021-366").is_err());
    }

    #[test]
    fn test_parse_missing_fields() {
        let p = DateTimePattern::compile("yyyy-MM-dd").unwrap();
        assert!(p.parse_calendar_date("2017-01-15").is_ok());
        assert!(p.parse_local_date_time("2017-01-15").is_err());
        assert!(p.parse_zoned("2017-01-15").is_err());
    }

    #[test]
    fn test_parse_zoned_with_offset_and_zone() {
        let p = DateTimePattern::compile(ISO_ZONED_DATE_TIME).unwrap();
        let zdt = p.parse_zoned("2017-03-15T19:00:00.000-07:00[America/Los_Angeles]").unwrap();
        assert_eq!(zdt.zone().id(), "America/Los_Angeles");
        assert_eq!(zdt.instant(), Utc.with_ymd_and_hms(2017, 3, 16, 2, 0, 0).unwrap());

        // offset only
        let zdt = p.parse_zoned("2017-03-15T19:00+05:30").unwrap();
        assert_eq!(zdt.zone().id(), "+05:30");
        assert_eq!(zdt.instant(), Utc.with_ymd_and_hms(2017, 3, 15, 13, 30, 0).unwrap());

        // overlap: an explicit later offset wins over the default earlier one
        let later = p.parse_zoned("2023-11-05T01:30-05:00[America/New_York]").unwrap();
        assert_eq!(later.instant(), Utc.with_ymd_and_hms(2023, 11, 5, 6, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_zone_names() {
        let p = DateTimePattern::compile("yyyy-MM-dd HH:mm z").unwrap();
        let zdt = p.parse_zoned("2017-02-15 12:00 CST").unwrap();
        assert_eq!(zdt.zone().id(), "America/Chicago");
        assert_eq!(zdt.instant(), Utc.with_ymd_and_hms(2017, 2, 15, 18, 0, 0).unwrap());
        assert!(p.parse_zoned("2017-02-15 12:00 QQQ").is_err());
    }

    #[test]
    fn test_parse_offsets() {
        let p = DateTimePattern::compile("HH:mm uuuu-MM-dd ZZZZ").unwrap();
        let zdt = p.parse_zoned("10:00 2020-01-01 GMT+08:00").unwrap();
        assert_eq!(zdt.offset().local_minus_utc(), 8 * 3600);
        let zdt = p.parse_zoned("10:00 2020-01-01 GMT").unwrap();
        assert_eq!(zdt.offset().local_minus_utc(), 0);

        let p = DateTimePattern::compile("uuuu-MM-dd HH:mm X").unwrap();
        assert_eq!(p.parse_zoned("2020-01-01 10:00 Z").unwrap().offset().local_minus_utc(), 0);
        assert_eq!(p.parse_zoned("2020-01-01 10:00 -03").unwrap().offset().local_minus_utc(), -3 * 3600);
        assert!(p.parse_zoned("2020-01-01 10:00 +19").is_err());
    }

    #[test]
    fn test_parse_to_instant_uses_default_zone() {
        let p = DateTimePattern::compile(ISO_LOCAL_DATE_TIME).unwrap();
        let parsed = p.parse("2017-01-15T14:35").unwrap();
        assert_eq!(parsed.to_instant(Zone::utc()).unwrap(), Utc.with_ymd_and_hms(2017, 1, 15, 14, 35, 0).unwrap());
        let tokyo = Zone::parse("Asia/Tokyo").unwrap();
        assert_eq!(parsed.to_instant(tokyo).unwrap(), Utc.with_ymd_and_hms(2017, 1, 15, 5, 35, 0).unwrap());
    }

    #[test]
    fn test_format_calendar_date_rejects_zone_letters() {
        let p = DateTimePattern::compile(ISO_LOCAL_DATE).unwrap();
        let date = NaiveDate::from_ymd_opt(2021, 9, 6).unwrap();
        assert_eq!(p.format_calendar_date(&date).unwrap(), "2021-09-06");
        let p = DateTimePattern::compile("uuuu-MM-dd x").unwrap();
        assert!(p.format_calendar_date(&date).is_err());
    }
}
