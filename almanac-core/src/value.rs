//! Runtime values passed through the function registry
//!
//! Every temporal kind has its own variant. Errors travel as values, so a
//! failed call never panics.

use crate::error::{AlmanacError, DateTimeError};
use crate::temporal::{format_duration, CalendarDate, Instant, LegacyDate, LocalDateTime, ZonedDateTime};
use crate::zone::Zone;
use chrono::{TimeDelta, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Runtime value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Integer(i64),
    Text(String),
    Bool(bool),
    Instant(Instant),
    /// Legacy epoch-millisecond date
    Date(LegacyDate),
    LocalDateTime(LocalDateTime),
    ZonedDateTime(ZonedDateTime),
    CalendarDate(CalendarDate),
    Duration(#[serde(with = "duration_parts")] TimeDelta),
    Weekday(Weekday),
    Zone(Zone),
    Object(HashMap<String, Value>),
    List(Vec<Value>),
    Null,
    Error(AlmanacError),
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_instant(&self) -> Option<&Instant> {
        match self {
            Value::Instant(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&LegacyDate> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_local_date_time(&self) -> Option<&LocalDateTime> {
        match self {
            Value::LocalDateTime(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_zoned_date_time(&self) -> Option<&ZonedDateTime> {
        match self {
            Value::ZonedDateTime(z) => Some(z),
            _ => None,
        }
    }

    pub fn as_calendar_date(&self) -> Option<&CalendarDate> {
        match self {
            Value::CalendarDate(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<&TimeDelta> {
        match self {
            Value::Duration(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_weekday(&self) -> Option<Weekday> {
        match self {
            Value::Weekday(w) => Some(*w),
            _ => None,
        }
    }

    pub fn as_zone(&self) -> Option<Zone> {
        match self {
            Value::Zone(z) => Some(*z),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&AlmanacError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get field from object. Returns Error value if not found or not an object.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(map) => map.get(key).cloned().unwrap_or_else(|| {
                Value::Error(AlmanacError::new(crate::error::codes::NOT_FOUND, format!("No field '{}'", key)))
            }),
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(AlmanacError::invalid_argument(format!("expected Object, got {}", self.type_name()))),
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Text(_) => "Text",
            Value::Bool(_) => "Bool",
            Value::Instant(_) => "Instant",
            Value::Date(_) => "Date",
            Value::LocalDateTime(_) => "LocalDateTime",
            Value::ZonedDateTime(_) => "ZonedDateTime",
            Value::CalendarDate(_) => "CalendarDate",
            Value::Duration(_) => "Duration",
            Value::Weekday(_) => "Weekday",
            Value::Zone(_) => "Zone",
            Value::Object(_) => "Object",
            Value::List(_) => "List",
            Value::Null => "Null",
            Value::Error(_) => "Error",
        }
    }

    /// Lift a typed result, turning the error into `Value::Error`
    pub fn from_result<T: Into<Value>>(result: Result<T, DateTimeError>) -> Value {
        match result {
            Ok(v) => v.into(),
            Err(e) => Value::Error(e.into()),
        }
    }

    /// Convert to text (always succeeds)
    pub fn to_text(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Instant(i) => write!(f, "{}", i.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)),
            Value::Date(d) => write!(f, "{}", d),
            Value::LocalDateTime(l) => write!(f, "{}", l.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::ZonedDateTime(z) => write!(f, "{}", z),
            Value::CalendarDate(d) => write!(f, "{}", d),
            Value::Duration(d) => write!(f, "{}", format_duration(d)),
            Value::Weekday(w) => write!(f, "{}", w),
            Value::Zone(z) => write!(f, "{}", z),
            Value::Object(obj) => match obj.get("name") {
                Some(Value::Text(name)) => write!(f, "[{}]", name),
                _ => write!(f, "[Object]"),
            },
            Value::List(items) => {
                // Small lists show their values, large ones a count
                if items.len() <= 5 {
                    let contents: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                    write!(f, "[{}]", contents.join(", "))
                } else {
                    write!(f, "[{}]", items.len())
                }
            }
            Value::Null => write!(f, "null"),
            Value::Error(e) => write!(f, "#ERROR: {}", e.code),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

// From implementations for convenience
impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Instant> for Value {
    fn from(i: Instant) -> Self {
        Value::Instant(i)
    }
}

impl From<LegacyDate> for Value {
    fn from(d: LegacyDate) -> Self {
        Value::Date(d)
    }
}

impl From<LocalDateTime> for Value {
    fn from(l: LocalDateTime) -> Self {
        Value::LocalDateTime(l)
    }
}

impl From<ZonedDateTime> for Value {
    fn from(z: ZonedDateTime) -> Self {
        Value::ZonedDateTime(z)
    }
}

impl From<CalendarDate> for Value {
    fn from(d: CalendarDate) -> Self {
        Value::CalendarDate(d)
    }
}

impl From<TimeDelta> for Value {
    fn from(d: TimeDelta) -> Self {
        Value::Duration(d)
    }
}

impl From<Weekday> for Value {
    fn from(w: Weekday) -> Self {
        Value::Weekday(w)
    }
}

impl From<Zone> for Value {
    fn from(z: Zone) -> Self {
        Value::Zone(z)
    }
}

impl From<AlmanacError> for Value {
    fn from(e: AlmanacError) -> Self {
        Value::Error(e)
    }
}

/// `TimeDelta` as `{ "seconds": i64, "nanos": i32 }`, nanos carrying the same sign
mod duration_parts {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Parts {
        seconds: i64,
        nanos: i32,
    }

    pub fn serialize<S: Serializer>(d: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        Parts { seconds: d.num_seconds(), nanos: d.subsec_nanos() }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let parts = Parts::deserialize(deserializer)?;
        TimeDelta::try_seconds(parts.seconds)
            .and_then(|secs| secs.checked_add(&TimeDelta::nanoseconds(parts.nanos as i64)))
            .ok_or_else(|| serde::de::Error::custom("duration out of range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_type_names() {
        assert_eq!(Value::from(5i64).type_name(), "Integer");
        assert_eq!(Value::from(LegacyDate::from_epoch_millis(0)).type_name(), "Date");
        assert_eq!(Value::from(Weekday::Mon).type_name(), "Weekday");
        assert_eq!(Value::Null.type_name(), "Null");
    }

    #[test]
    fn test_display() {
        let instant = Utc.with_ymd_and_hms(2017, 1, 15, 14, 35, 0).unwrap();
        assert_eq!(Value::from(instant).to_string(), "2017-01-15T14:35:00Z");
        assert_eq!(Value::from(LegacyDate::from_instant(&instant)).to_string(), "2017-01-15T14:35:00.000Z");
        let local = NaiveDate::from_ymd_opt(2017, 2, 15).unwrap().and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(Value::from(local).to_string(), "2017-02-15T12:00:00");
        assert_eq!(Value::from(NaiveDate::from_ymd_opt(2018, 4, 1).unwrap()).to_string(), "2018-04-01");
        assert_eq!(Value::from(TimeDelta::hours(23)).to_string(), "PT23H");
        assert_eq!(Value::from(Weekday::Wed).to_string(), "Wed");
        assert_eq!(Value::from(AlmanacError::invalid_argument("x")).to_string(), "#ERROR: INVALID_ARGUMENT");
    }

    #[test]
    fn test_from_result() {
        let ok: Result<i64, DateTimeError> = Ok(3);
        assert_eq!(Value::from_result(ok), Value::Integer(3));
        let err: Result<i64, DateTimeError> = Err(DateTimeError::format("bad"));
        assert!(Value::from_result(err).as_error().unwrap().is(crate::error::codes::FORMAT_ERROR));
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_value(Value::from(NaiveDate::from_ymd_opt(2020, 11, 3).unwrap())).unwrap();
        assert_eq!(json["type"], "CalendarDate");
        assert_eq!(json["value"], "2020-11-03");

        let d = Value::from(TimeDelta::milliseconds(-1500));
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["value"]["seconds"], -1);
        assert_eq!(json["value"]["nanos"], -500_000_000);
        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_get_field() {
        let mut map = HashMap::new();
        map.insert("name".to_string(), Value::from("firstDay"));
        let obj = Value::Object(map);
        assert_eq!(obj.get("name"), Value::from("firstDay"));
        assert!(obj.get("missing").is_error());
        assert!(Value::from(1i64).get("name").is_error());
        assert_eq!(obj.to_string(), "[firstDay]");
    }
}
