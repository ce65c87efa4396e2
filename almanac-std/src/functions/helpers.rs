//! Argument extraction shared by the standard functions
//!
//! Every helper returns `Err(Value)` ready to hand back from `call`, so
//! plugins read `match get_x(..) { Ok(v) => v, Err(e) => return e }`.

use almanac_core::pattern::{ISO_LOCAL_DATE, ISO_LOCAL_DATE_TIME, ISO_OFFSET_DATE_TIME, ISO_ZONED_DATE_TIME};
use almanac_plugin::prelude::*;

/// Fails with ARG_COUNT unless `min <= args.len() <= max`
pub fn check_arity(args: &[Value], func: &str, min: usize, max: usize) -> Result<(), Value> {
    if args.len() < min || args.len() > max {
        let expected = if args.len() < min { min } else { max };
        return Err(Value::Error(AlmanacError::arg_count(func, expected, args.len())));
    }
    Ok(())
}

pub fn get_i64(value: &Value, func: &str, arg: &str) -> Result<i64, Value> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Error(e) => Err(Value::Error(e.clone())),
        other => Err(Value::Error(AlmanacError::arg_type(func, arg, "Integer", other.type_name()))),
    }
}

pub fn get_i32(value: &Value, func: &str, arg: &str) -> Result<i32, Value> {
    let v = get_i64(value, func, arg)?;
    i32::try_from(v).map_err(|_| {
        Value::Error(AlmanacError::invalid_argument(format!("{} out of range for {}: {}", arg, func, v)))
    })
}

pub fn get_u32(value: &Value, func: &str, arg: &str) -> Result<u32, Value> {
    let v = get_i64(value, func, arg)?;
    u32::try_from(v).map_err(|_| {
        Value::Error(AlmanacError::invalid_argument(format!("{} must be non-negative for {}: {}", arg, func, v)))
    })
}

pub fn get_text<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a str, Value> {
    match value {
        Value::Text(s) => Ok(s.as_str()),
        Value::Error(e) => Err(Value::Error(e.clone())),
        other => Err(Value::Error(AlmanacError::arg_type(func, arg, "Text", other.type_name()))),
    }
}

/// Zone argument at `index`; missing or Null falls back to the context zone.
///
/// Text goes through `Zone::from_short_id`, so `PST` and friends work.
pub fn get_zone(args: &[Value], index: usize, func: &str, ctx: &EvalContext) -> Result<Zone, Value> {
    match get_opt_zone(args, index, func)? {
        Some(zone) => Ok(zone),
        None => Ok(ctx.default_zone),
    }
}

/// Zone argument at `index`, `None` when missing or Null
pub fn get_opt_zone(args: &[Value], index: usize, func: &str) -> Result<Option<Zone>, Value> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Zone(z)) => Ok(Some(*z)),
        Some(Value::Text(id)) => Zone::from_short_id(id)
            .map(Some)
            .map_err(|e| Value::Error(AlmanacError::from(e).in_function(func))),
        Some(Value::Error(e)) => Err(Value::Error(e.clone())),
        Some(other) => Err(Value::Error(AlmanacError::arg_type(func, "zone", "Zone", other.type_name()))),
    }
}

/// Pattern argument at `index`, or `default` when missing or Null.
///
/// The text may be a pattern or one of the ISO names.
pub fn get_pattern(args: &[Value], index: usize, func: &str, default: &str) -> Result<DateTimePattern, Value> {
    let source = match args.get(index) {
        None | Some(Value::Null) => default,
        Some(v) => get_text(v, func, "pattern")?,
    };
    let pattern = match named_pattern(source) {
        Some(named) => named,
        None => source,
    };
    DateTimePattern::compile(pattern)
        .map_err(|e| Value::Error(AlmanacError::from(e).in_function(func)))
}

fn named_pattern(name: &str) -> Option<&'static str> {
    match name {
        "ISO_LOCAL_DATE_TIME" => Some(ISO_LOCAL_DATE_TIME),
        "ISO_LOCAL_DATE" => Some(ISO_LOCAL_DATE),
        "ISO_OFFSET_DATE_TIME" => Some(ISO_OFFSET_DATE_TIME),
        "ISO_ZONED_DATE_TIME" => Some(ISO_ZONED_DATE_TIME),
        _ => None,
    }
}

/// Null means "any day"; text accepts `MONDAY`, `Monday`, `mon`
pub fn get_weekday(value: &Value, func: &str, arg: &str) -> Result<Option<Weekday>, Value> {
    match value {
        Value::Null => Ok(None),
        Value::Weekday(w) => Ok(Some(*w)),
        Value::Text(s) => s.parse::<Weekday>().map(Some).map_err(|_| {
            Value::Error(
                AlmanacError::invalid_argument(format!("'{}' is not a day of the week", s))
                    .with_suggestion("Use a name such as MONDAY or Mon"),
            )
        }),
        Value::Error(e) => Err(Value::Error(e.clone())),
        other => Err(Value::Error(AlmanacError::arg_type(func, arg, "Weekday", other.type_name()))),
    }
}

/// CalendarDate value, or ISO `uuuu-MM-dd` text
pub fn get_calendar_date(value: &Value, func: &str, arg: &str) -> Result<CalendarDate, Value> {
    match value {
        Value::CalendarDate(d) => Ok(*d),
        Value::Text(s) => DateTimePattern::compile(ISO_LOCAL_DATE)
            .and_then(|p| p.parse_calendar_date(s))
            .map_err(|e| Value::Error(AlmanacError::from(e).in_function(func))),
        Value::Error(e) => Err(Value::Error(e.clone())),
        other => Err(Value::Error(AlmanacError::arg_type(func, arg, "CalendarDate", other.type_name()))),
    }
}

/// Lift a core result into a `Value`
pub fn lift<T: Into<Value>>(result: Result<T, DateTimeError>) -> Value {
    Value::from_result(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_arity() {
        assert!(check_arity(&[Value::Integer(1)], "f", 1, 2).is_ok());
        let err = check_arity(&[], "f", 1, 2).unwrap_err();
        assert!(err.as_error().unwrap().is(codes::ARG_COUNT));
        assert!(check_arity(&[Value::Null, Value::Null, Value::Null], "f", 1, 2).is_err());
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(get_i32(&Value::Integer(2021), "f", "year").unwrap(), 2021);
        assert!(get_i32(&Value::Integer(i64::MAX), "f", "year").unwrap_err().as_error().unwrap().is(codes::INVALID_ARGUMENT));
        assert!(get_u32(&Value::Integer(-1), "f", "month").is_err());
        let err = get_i64(&Value::Text("x".to_string()), "f", "n").unwrap_err();
        assert!(err.as_error().unwrap().is(codes::ARG_TYPE));
    }

    #[test]
    fn test_errors_pass_through() {
        let incoming = Value::Error(AlmanacError::parse_error("upstream"));
        let err = get_i64(&incoming, "f", "n").unwrap_err();
        assert!(err.as_error().unwrap().is(codes::PARSE_ERROR));
    }

    #[test]
    fn test_zone_defaults_to_context() {
        let ctx = EvalContext::new().with_default_zone(Zone::parse("Europe/Paris").unwrap());
        assert_eq!(get_zone(&[], 1, "f", &ctx).unwrap().id(), "Europe/Paris");
        assert_eq!(get_zone(&[Value::Null, Value::Null], 1, "f", &ctx).unwrap().id(), "Europe/Paris");
        let pst = [Value::Null, Value::Text("PST".to_string())];
        assert_eq!(get_zone(&pst, 1, "f", &ctx).unwrap().id(), "America/Los_Angeles");
        let bad = [Value::Null, Value::Text("Mars/Olympus".to_string())];
        assert!(get_zone(&bad, 1, "f", &ctx).is_err());
    }

    #[test]
    fn test_pattern_names() {
        let p = get_pattern(&[], 1, "f", "ISO_LOCAL_DATE").unwrap();
        assert_eq!(p.as_str(), ISO_LOCAL_DATE);
        let custom = [Value::Null, Value::Text("dd/MM/uuuu".to_string())];
        assert_eq!(get_pattern(&custom, 1, "f", ISO_LOCAL_DATE).unwrap().as_str(), "dd/MM/uuuu");
        let broken = [Value::Null, Value::Text("uuuu-MM-dd[".to_string())];
        assert!(get_pattern(&broken, 1, "f", ISO_LOCAL_DATE).unwrap_err().as_error().unwrap().is(codes::FORMAT_ERROR));
    }

    #[test]
    fn test_weekday() {
        assert_eq!(get_weekday(&Value::Null, "f", "weekday").unwrap(), None);
        assert_eq!(get_weekday(&Value::Text("MONDAY".to_string()), "f", "weekday").unwrap(), Some(Weekday::Mon));
        assert_eq!(get_weekday(&Value::Text("Wed".to_string()), "f", "weekday").unwrap(), Some(Weekday::Wed));
        assert!(get_weekday(&Value::Text("Someday".to_string()), "f", "weekday").is_err());
    }

    #[test]
    fn test_calendar_date() {
        let d = get_calendar_date(&Value::Text("2018-01-01".to_string()), "f", "date").unwrap();
        assert_eq!(d.to_string(), "2018-01-01");
        assert!(get_calendar_date(&Value::Integer(1), "f", "date").is_err());
    }
}
