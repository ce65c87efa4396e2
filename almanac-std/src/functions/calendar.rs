//! Calendar arithmetic functions

use super::helpers::*;
use almanac_core::calendar;
use almanac_plugin::prelude::*;

pub struct FirstDay;
pub struct LastDay;
pub struct NthDayOfWeekIn;
pub struct PresidentialElectionDayUsa;
pub struct NDaysAfter;

static MONTH_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("year", "Integer", "Year"),
    ArgMeta::required("month", "Integer", "Month (1-12)"),
    ArgMeta::optional("weekday", "Weekday | Text", "Restrict to this day of the week", "null"),
];

static FIRST_DAY_EXAMPLES: [&str; 2] = ["firstDay(2021, 9, 'MONDAY')", "firstDay(2021, 9)"];
static FIRST_DAY_RELATED: [&str; 2] = ["lastDay", "nthDayOfWeekIn"];

static LAST_DAY_EXAMPLES: [&str; 2] = ["lastDay(2021, 9, 'MONDAY')", "lastDay(2020, 2)"];
static LAST_DAY_RELATED: [&str; 2] = ["firstDay", "nthDayOfWeekIn"];

static NTH_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("year", "Integer", "Year"),
    ArgMeta::required("month", "Integer", "Month (1-12)"),
    ArgMeta::required("week_ordinal", "Integer", "1 = first, -1 = last, 0 = last of the previous month"),
    ArgMeta::required("weekday", "Weekday | Text", "Day of the week"),
];
static NTH_EXAMPLES: [&str; 2] = ["nthDayOfWeekIn(2018, 7, 3, 'WEDNESDAY')", "nthDayOfWeekIn(2018, 7, -1, 'TUESDAY')"];
static NTH_RELATED: [&str; 2] = ["firstDay", "lastDay"];

static ELECTION_ARGS: [ArgMeta; 1] = [ArgMeta::required("year", "Integer", "A year divisible by 4")];
static ELECTION_EXAMPLES: [&str; 1] = ["presidentialElectionDayUsa(2020)"];
static ELECTION_RELATED: [&str; 1] = ["firstDay"];

static N_DAYS_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("number_of_days", "Integer", "Days to add; negative goes back"),
    ArgMeta::required("reference", "CalendarDate | Text", "Starting date"),
];
static N_DAYS_EXAMPLES: [&str; 2] = ["nDaysAfter(90, '2018-01-01')", "nDaysAfter(-1, parseCalendarDate('2018-01-01'))"];
static N_DAYS_RELATED: [&str; 1] = ["parseCalendarDate"];

/// Shared body of firstDay and lastDay
fn month_edge(
    args: &[Value],
    func: &str,
    edge: fn(i32, u32, Option<Weekday>) -> Result<CalendarDate, DateTimeError>,
) -> Value {
    if let Err(e) = check_arity(args, func, 2, 3) {
        return e;
    }
    let year = match get_i32(&args[0], func, "year") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let month = match get_u32(&args[1], func, "month") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let weekday = match args.get(2).map(|v| get_weekday(v, func, "weekday")).transpose() {
        Ok(w) => w.flatten(),
        Err(e) => return e,
    };
    lift(edge(year, month, weekday))
}

impl FunctionPlugin for FirstDay {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "firstDay",
            description: "First day of a month, or the first given weekday in it",
            usage: "firstDay(year, month, weekday?)",
            args: &MONTH_ARGS,
            returns: "CalendarDate",
            examples: &FIRST_DAY_EXAMPLES,
            category: "calendar",
            related: &FIRST_DAY_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        month_edge(args, "firstDay", calendar::first_day)
    }
}

impl FunctionPlugin for LastDay {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "lastDay",
            description: "Last day of a month, or the last given weekday in it",
            usage: "lastDay(year, month, weekday?)",
            args: &MONTH_ARGS,
            returns: "CalendarDate",
            examples: &LAST_DAY_EXAMPLES,
            category: "calendar",
            related: &LAST_DAY_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        month_edge(args, "lastDay", calendar::last_day)
    }
}

impl FunctionPlugin for NthDayOfWeekIn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "nthDayOfWeekIn",
            description: "The n-th given weekday of a month, counting from either end",
            usage: "nthDayOfWeekIn(year, month, week_ordinal, weekday)",
            args: &NTH_ARGS,
            returns: "CalendarDate",
            examples: &NTH_EXAMPLES,
            category: "calendar",
            related: &NTH_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        const F: &str = "nthDayOfWeekIn";
        if args.len() != 4 {
            return Value::Error(AlmanacError::arg_count(F, 4, args.len()));
        }
        let year = match get_i32(&args[0], F, "year") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let month = match get_u32(&args[1], F, "month") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let ordinal = match get_i32(&args[2], F, "week_ordinal") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let weekday = match get_weekday(&args[3], F, "weekday") {
            Ok(w) => w,
            Err(e) => return e,
        };
        lift(calendar::nth_day_of_week_in(year, month, ordinal, weekday))
    }
}

impl FunctionPlugin for PresidentialElectionDayUsa {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "presidentialElectionDayUsa",
            description: "U.S. presidential election day: the Tuesday after the first Monday in November",
            usage: "presidentialElectionDayUsa(year)",
            args: &ELECTION_ARGS,
            returns: "CalendarDate",
            examples: &ELECTION_EXAMPLES,
            category: "calendar",
            related: &ELECTION_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        const F: &str = "presidentialElectionDayUsa";
        if args.len() != 1 {
            return Value::Error(AlmanacError::arg_count(F, 1, args.len()));
        }
        match get_i32(&args[0], F, "year") {
            Ok(year) => lift(calendar::presidential_election_day_usa(year)),
            Err(e) => e,
        }
    }
}

impl FunctionPlugin for NDaysAfter {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "nDaysAfter",
            description: "Shift a date by a number of days",
            usage: "nDaysAfter(number_of_days, reference)",
            args: &N_DAYS_ARGS,
            returns: "CalendarDate",
            examples: &N_DAYS_EXAMPLES,
            category: "calendar",
            related: &N_DAYS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        const F: &str = "nDaysAfter";
        if args.len() != 2 {
            return Value::Error(AlmanacError::arg_count(F, 2, args.len()));
        }
        let days = match get_i64(&args[0], F, "number_of_days") {
            Ok(v) => v,
            Err(e) => return e,
        };
        let reference = match get_calendar_date(&args[1], F, "reference") {
            Ok(d) => d,
            Err(e) => return e,
        };
        lift(calendar::n_days_after(days, reference))
    }
}
