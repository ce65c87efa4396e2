//! Conversion functions
//!
//! One function per target kind, dispatching on the kind of the source.
//! An `Integer` source is epoch milliseconds. A `Text` source is parsed with
//! the optional pattern argument.

use super::helpers::*;
use almanac_core::convert;
use almanac_core::pattern::{ISO_LOCAL_DATE, ISO_LOCAL_DATE_TIME, ISO_ZONED_DATE_TIME};
use almanac_plugin::prelude::*;

pub struct ToInstant;
pub struct ToLocalDateTime;
pub struct ToZonedDateTime;
pub struct ToDate;
pub struct ToDuration;
pub struct Format;
pub struct ParseCalendarDate;
pub struct ZoneFn;

// The second argument is a zone for temporal sources and a pattern for text
static ZONE_OR_PATTERN_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("source", "Date | Instant | LocalDateTime | ZonedDateTime | Integer | Text", "Value to convert"),
    ArgMeta::optional("zone_or_pattern", "Zone | Text", "Zone for temporal sources, pattern for text", "context zone / ISO pattern"),
];

static TO_INSTANT_EXAMPLES: [&str; 3] = [
    "toInstant(1484490900000)",
    "toInstant(local, 'America/Chicago')",
    "toInstant('2017-01-15T14:35:00-06:00', 'ISO_OFFSET_DATE_TIME')",
];
static TO_INSTANT_RELATED: [&str; 3] = ["toDate", "toZonedDateTime", "toLocalDateTime"];

static TO_LOCAL_EXAMPLES: [&str; 2] = ["toLocalDateTime(1484490900000, 'America/Chicago')", "toLocalDateTime('2017-01-15T14:35')"];
static TO_LOCAL_RELATED: [&str; 2] = ["toZonedDateTime", "format"];

static TO_ZONED_EXAMPLES: [&str; 2] = [
    "toZonedDateTime(instant, 'PST')",
    "toZonedDateTime('2017-03-15T19:00:00-07:00[America/Los_Angeles]')",
];
static TO_ZONED_RELATED: [&str; 2] = ["toLocalDateTime", "toInstant"];

static TO_DATE_EXAMPLES: [&str; 2] = ["toDate(instant)", "toDate('2017-01-15T14:35', 'ISO_LOCAL_DATE_TIME')"];
static TO_DATE_RELATED: [&str; 2] = ["toInstant", "toDuration"];

static TO_DURATION_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("from", "Date | Instant | LocalDateTime | ZonedDateTime | Integer", "Start"),
    ArgMeta::required("to", "same kind as from", "End"),
];
static TO_DURATION_EXAMPLES: [&str; 1] = ["toDuration(1484490900000, 1484577300000)"];
static TO_DURATION_RELATED: [&str; 1] = ["toInstant"];

static FORMAT_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("value", "Date | Instant | LocalDateTime | ZonedDateTime | CalendarDate | Integer", "Value to render"),
    ArgMeta::required("pattern", "Text", "Pattern or ISO pattern name"),
    ArgMeta::optional("zone", "Zone", "Wall clock zone", "context zone"),
];
static FORMAT_EXAMPLES: [&str; 2] = ["format(date, 'yyyy-MM-dd HH:mm z', 'CST')", "format(local, 'ISO_LOCAL_DATE_TIME')"];
static FORMAT_RELATED: [&str; 2] = ["parseCalendarDate", "toZonedDateTime"];

static PARSE_DATE_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("text", "Text", "Text holding a date"),
    ArgMeta::optional("pattern", "Text", "Pattern or ISO pattern name", "ISO_LOCAL_DATE"),
];
static PARSE_DATE_EXAMPLES: [&str; 2] = ["parseCalendarDate('2018-07-18')", "parseCalendarDate('18/07/2018', 'dd/MM/uuuu')"];
static PARSE_DATE_RELATED: [&str; 2] = ["nDaysAfter", "format"];

static ZONE_ARGS: [ArgMeta; 1] = [ArgMeta::optional("id", "Text", "IANA id, offset or short id", "context zone")];
static ZONE_EXAMPLES: [&str; 3] = ["zone('America/New_York')", "zone('+05:30')", "zone('PST')"];
static ZONE_RELATED: [&str; 2] = ["toZonedDateTime", "format"];

impl FunctionPlugin for ToInstant {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "toInstant",
            description: "Convert to a point on the UTC timeline",
            usage: "toInstant(source, zone_or_pattern?)",
            args: &ZONE_OR_PATTERN_ARGS,
            returns: "Instant",
            examples: &TO_INSTANT_EXAMPLES,
            category: "convert",
            related: &TO_INSTANT_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const F: &str = "toInstant";
        if let Err(e) = check_arity(args, F, 1, 2) {
            return e;
        }
        match &args[0] {
            Value::Instant(i) => Value::Instant(*i),
            Value::Date(d) => lift(convert::instant_from_legacy_date(d)),
            Value::Integer(ms) => lift(convert::instant_from_epoch_millis(*ms)),
            Value::ZonedDateTime(z) => Value::Instant(convert::instant_from_zoned(z)),
            Value::LocalDateTime(l) => match get_zone(args, 1, F, ctx) {
                Ok(zone) => lift(convert::instant_from_local(l, zone)),
                Err(e) => e,
            },
            Value::Text(s) => match get_pattern(args, 1, F, ISO_ZONED_DATE_TIME) {
                Ok(p) => lift(convert::instant_from_text_in(s, &p, ctx.default_zone)),
                Err(e) => e,
            },
            Value::Error(e) => Value::Error(e.clone()),
            other => Value::Error(AlmanacError::arg_type(F, "source", "temporal value", other.type_name())),
        }
    }
}

impl FunctionPlugin for ToLocalDateTime {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "toLocalDateTime",
            description: "Convert to wall-clock fields in a zone",
            usage: "toLocalDateTime(source, zone_or_pattern?)",
            args: &ZONE_OR_PATTERN_ARGS,
            returns: "LocalDateTime",
            examples: &TO_LOCAL_EXAMPLES,
            category: "convert",
            related: &TO_LOCAL_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const F: &str = "toLocalDateTime";
        if let Err(e) = check_arity(args, F, 1, 2) {
            return e;
        }
        if let Value::Text(s) = &args[0] {
            return match get_pattern(args, 1, F, ISO_LOCAL_DATE_TIME) {
                Ok(p) => lift(convert::local_from_text(s, &p)),
                Err(e) => e,
            };
        }
        if let Value::ZonedDateTime(z) = &args[0] {
            return Value::LocalDateTime(convert::local_from_zoned(z));
        }
        if let Value::LocalDateTime(l) = &args[0] {
            return Value::LocalDateTime(*l);
        }

        let zone = match get_zone(args, 1, F, ctx) {
            Ok(z) => z,
            Err(e) => return e,
        };
        match &args[0] {
            Value::Instant(i) => Value::LocalDateTime(convert::local_from_instant(i, zone)),
            Value::Date(d) => lift(convert::local_from_legacy_date(d, zone)),
            Value::Integer(ms) => lift(convert::local_from_epoch_millis(*ms, zone)),
            Value::Error(e) => Value::Error(e.clone()),
            other => Value::Error(AlmanacError::arg_type(F, "source", "temporal value", other.type_name())),
        }
    }
}

impl FunctionPlugin for ToZonedDateTime {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "toZonedDateTime",
            description: "Convert to a date-time bound to a zone",
            usage: "toZonedDateTime(source, zone_or_pattern?)",
            args: &ZONE_OR_PATTERN_ARGS,
            returns: "ZonedDateTime",
            examples: &TO_ZONED_EXAMPLES,
            category: "convert",
            related: &TO_ZONED_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const F: &str = "toZonedDateTime";
        if let Err(e) = check_arity(args, F, 1, 2) {
            return e;
        }
        if let Value::Text(s) = &args[0] {
            return match get_pattern(args, 1, F, ISO_ZONED_DATE_TIME) {
                Ok(p) => lift(convert::zoned_from_text(s, &p)),
                Err(e) => e,
            };
        }

        let zone = match get_zone(args, 1, F, ctx) {
            Ok(z) => z,
            Err(e) => return e,
        };
        match &args[0] {
            Value::Instant(i) => Value::ZonedDateTime(convert::zoned_from_instant(i, zone)),
            Value::Date(d) => lift(convert::zoned_from_legacy_date(d, zone)),
            Value::Integer(ms) => lift(convert::zoned_from_epoch_millis(*ms, zone)),
            Value::LocalDateTime(l) => lift(convert::zoned_from_local(l, zone)),
            // Re-zoning keeps the instant; without a zone argument the value is unchanged
            Value::ZonedDateTime(z) => match args.get(1) {
                None | Some(Value::Null) => Value::ZonedDateTime(z.clone()),
                Some(_) => Value::ZonedDateTime(z.with_zone_same_instant(zone)),
            },
            Value::Error(e) => Value::Error(e.clone()),
            other => Value::Error(AlmanacError::arg_type(F, "source", "temporal value", other.type_name())),
        }
    }
}

impl FunctionPlugin for ToDate {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "toDate",
            description: "Convert to a legacy millisecond date",
            usage: "toDate(source, zone_or_pattern?)",
            args: &ZONE_OR_PATTERN_ARGS,
            returns: "Date",
            examples: &TO_DATE_EXAMPLES,
            category: "convert",
            related: &TO_DATE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const F: &str = "toDate";
        if let Err(e) = check_arity(args, F, 1, 2) {
            return e;
        }
        match &args[0] {
            Value::Date(d) => Value::Date(*d),
            Value::Instant(i) => Value::Date(convert::legacy_date_from_instant(i)),
            Value::Integer(ms) => Value::Date(convert::legacy_date_from_epoch_millis(*ms)),
            Value::ZonedDateTime(z) => Value::Date(convert::legacy_date_from_zoned(z)),
            Value::LocalDateTime(l) => match get_zone(args, 1, F, ctx) {
                Ok(zone) => lift(convert::legacy_date_from_local(l, zone)),
                Err(e) => e,
            },
            Value::Text(s) => match get_pattern(args, 1, F, ISO_ZONED_DATE_TIME) {
                Ok(p) => lift(convert::legacy_date_from_text_in(s, &p, ctx.default_zone)),
                Err(e) => e,
            },
            Value::Error(e) => Value::Error(e.clone()),
            other => Value::Error(AlmanacError::arg_type(F, "source", "temporal value", other.type_name())),
        }
    }
}

impl FunctionPlugin for ToDuration {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "toDuration",
            description: "Elapsed time from one value to another of the same kind",
            usage: "toDuration(from, to)",
            args: &TO_DURATION_ARGS,
            returns: "Duration",
            examples: &TO_DURATION_EXAMPLES,
            category: "convert",
            related: &TO_DURATION_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        const F: &str = "toDuration";
        if args.len() != 2 {
            return Value::Error(AlmanacError::arg_count(F, 2, args.len()));
        }
        match (&args[0], &args[1]) {
            (Value::Date(a), Value::Date(b)) => lift(convert::duration_between_legacy_dates(a, b)),
            (Value::Instant(a), Value::Instant(b)) => Value::Duration(convert::duration_between_instants(a, b)),
            (Value::LocalDateTime(a), Value::LocalDateTime(b)) => {
                Value::Duration(convert::duration_between_locals(a, b))
            }
            (Value::Integer(a), Value::Integer(b)) => lift(convert::duration_between_epoch_millis(*a, *b)),
            (Value::ZonedDateTime(a), Value::ZonedDateTime(b)) => {
                Value::Duration(convert::duration_between_zoned(a, b))
            }
            (Value::Error(e), _) | (_, Value::Error(e)) => Value::Error(e.clone()),
            (a, b) => Value::Error(
                AlmanacError::arg_type(F, "to", a.type_name(), b.type_name())
                    .with_note("from and to must be the same kind"),
            ),
        }
    }
}

impl FunctionPlugin for Format {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "format",
            description: "Render a value with a pattern",
            usage: "format(value, pattern, zone?)",
            args: &FORMAT_ARGS,
            returns: "Text",
            examples: &FORMAT_EXAMPLES,
            category: "convert",
            related: &FORMAT_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const F: &str = "format";
        if let Err(e) = check_arity(args, F, 2, 3) {
            return e;
        }
        let pattern = match get_pattern(args, 1, F, ISO_LOCAL_DATE_TIME) {
            Ok(p) => p,
            Err(e) => return e,
        };
        // Local fields render as they are; the zone only feeds zone letters
        if let Value::LocalDateTime(l) = &args[0] {
            return match get_opt_zone(args, 2, F) {
                Ok(zone) => lift(convert::format_local(l, zone, &pattern)),
                Err(e) => e,
            };
        }

        let zone = match get_zone(args, 2, F, ctx) {
            Ok(z) => z,
            Err(e) => return e,
        };
        match &args[0] {
            Value::Date(d) => lift(convert::format_legacy_date(d, zone, &pattern)),
            Value::ZonedDateTime(z) => lift(convert::format_zoned(z, &pattern)),
            Value::CalendarDate(d) => lift(pattern.format_calendar_date(d)),
            Value::Instant(i) => lift(convert::format_zoned(&convert::zoned_from_instant(i, zone), &pattern)),
            Value::Integer(ms) => lift(
                convert::zoned_from_epoch_millis(*ms, zone).and_then(|z| convert::format_zoned(&z, &pattern)),
            ),
            Value::Error(e) => Value::Error(e.clone()),
            other => Value::Error(AlmanacError::arg_type(F, "value", "temporal value", other.type_name())),
        }
    }
}

impl FunctionPlugin for ParseCalendarDate {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "parseCalendarDate",
            description: "Parse text into a calendar date",
            usage: "parseCalendarDate(text, pattern?)",
            args: &PARSE_DATE_ARGS,
            returns: "CalendarDate",
            examples: &PARSE_DATE_EXAMPLES,
            category: "convert",
            related: &PARSE_DATE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        const F: &str = "parseCalendarDate";
        if let Err(e) = check_arity(args, F, 1, 2) {
            return e;
        }
        let text = match get_text(&args[0], F, "text") {
            Ok(t) => t,
            Err(e) => return e,
        };
        match get_pattern(args, 1, F, ISO_LOCAL_DATE) {
            Ok(p) => lift(convert::calendar_date_from_text(text, &p)),
            Err(e) => e,
        }
    }
}

impl FunctionPlugin for ZoneFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "zone",
            description: "Resolve a zone id, or return the context zone",
            usage: "zone(id?)",
            args: &ZONE_ARGS,
            returns: "Zone",
            examples: &ZONE_EXAMPLES,
            category: "convert",
            related: &ZONE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const F: &str = "zone";
        if let Err(e) = check_arity(args, F, 0, 1) {
            return e;
        }
        match get_zone(args, 0, F, ctx) {
            Ok(z) => Value::Zone(z),
            Err(e) => e,
        }
    }
}
