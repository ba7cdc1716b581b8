//! "5 hours ago" style formatting of elapsed time.
//!
//! Months are 30 days and years 12 months, which is close enough for an age label.

const MILLIS_PER_SECOND: u64 = 1000;
const SECOND: u64 = MILLIS_PER_SECOND;
const MINUTE: u64 = SECOND * 60;
const HOUR: u64 = MINUTE * 60;
const DAY: u64 = HOUR * 24;
const MONTH: u64 = DAY * 30;
const YEAR: u64 = MONTH * 12;
const DECADE: u64 = YEAR * 10;
const CENTURY: u64 = DECADE * 10;

/// Unit sizes in milliseconds, largest first. Index matches [`TimeUnitNames`].
const UNITS: [u64; 9] = [CENTURY, DECADE, YEAR, MONTH, DAY, HOUR, MINUTE, SECOND, 1];

/// Names for each unit, indexed century (0) down to millisecond (8).
pub trait TimeUnitNames {
    fn singular(&self, unit: usize) -> &str;
    fn plural(&self, unit: usize) -> &str;
    /// Wrap the "N units" text into the final phrase.
    fn finish(&self, span: &str) -> String;
}

pub struct English;

impl TimeUnitNames for English {
    fn singular(&self, unit: usize) -> &str {
        [
            "century",
            "decade",
            "year",
            "month",
            "day",
            "hour",
            "minute",
            "second",
            "millisecond",
        ][unit]
    }

    fn plural(&self, unit: usize) -> &str {
        [
            "centuries",
            "decades",
            "years",
            "months",
            "days",
            "hours",
            "minutes",
            "seconds",
            "milliseconds",
        ][unit]
    }

    fn finish(&self, span: &str) -> String {
        format!("{span} ago")
    }
}

fn breakdown(elapsed_ms: u64) -> [u64; 9] {
    let mut parts = [0; 9];
    let mut rest = elapsed_ms;
    for (part, unit) in parts.iter_mut().zip(UNITS) {
        *part = rest / unit;
        rest %= unit;
    }
    parts
}

fn push_unit(out: &mut Vec<String>, count: u64, unit: usize, names: &dyn TimeUnitNames) {
    match count {
        0 => {}
        1 => out.push(format!("1 {}", names.singular(unit))),
        n => out.push(format!("{n} {}", names.plural(unit))),
    }
}

/// Only the largest non-zero unit: 4 hours and 1 second is "4 hours ago".
pub fn format_timespan_ago_first_unit_with(elapsed_ms: u64, names: &dyn TimeUnitNames) -> String {
    let parts = breakdown(elapsed_ms);
    match parts.iter().position(|&count| count > 0) {
        Some(unit) => {
            let mut out = Vec::with_capacity(1);
            push_unit(&mut out, parts[unit], unit, names);
            names.finish(&out[0])
        }
        None => String::new(),
    }
}

pub fn format_timespan_ago_first_unit(elapsed_ms: u64) -> String {
    format_timespan_ago_first_unit_with(elapsed_ms, &English)
}

/// Every non-zero unit: "2 hours 45 minutes 22 seconds 554 milliseconds ago".
pub fn format_timespan_ago_with(elapsed_ms: u64, names: &dyn TimeUnitNames) -> String {
    let mut out = Vec::new();
    for (unit, count) in breakdown(elapsed_ms).into_iter().enumerate() {
        push_unit(&mut out, count, unit, names);
    }
    if out.is_empty() {
        return String::new();
    }
    names.finish(&out.join(" "))
}

pub fn format_timespan_ago(elapsed_ms: u64) -> String {
    format_timespan_ago_with(elapsed_ms, &English)
}
