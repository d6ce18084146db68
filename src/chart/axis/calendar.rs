//! Calendar arithmetic for date axes.
//!
//! Date axis values are julian day numbers and date-time values are Unix
//! seconds; both are decoded to a `NaiveDateTime` for stepping and rounding.

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike,
};

use crate::chart::axis::nice::{round_down, round_up, round125};
use crate::chart::types::{AxisScale, DateTimeUnit};

/// Julian day number of 31 December 1 BCE (proleptic Gregorian).
const JULIAN_DAY_BEFORE_CE: i64 = 1_721_425;
pub(crate) const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn julian_day(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) + JULIAN_DAY_BEFORE_CE
}

pub fn from_julian_day(day: i64) -> Option<NaiveDate> {
    let days = i32::try_from(day - JULIAN_DAY_BEFORE_CE).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days)
}

fn from_timestamp(seconds: f64) -> Option<NaiveDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}

fn to_timestamp(dt: NaiveDateTime) -> f64 {
    let utc = dt.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1e9
}

/// Axis value to calendar time; `None` for non-calendar scales or values
/// outside chrono's range.
pub(crate) fn decode(scale: AxisScale, value: f64) -> Option<NaiveDateTime> {
    match scale {
        AxisScale::Date if value.is_finite() => {
            from_julian_day(value.floor() as i64).map(|d| d.and_time(NaiveTime::MIN))
        }
        AxisScale::DateTime => from_timestamp(value),
        _ => None,
    }
}

pub(crate) fn encode(scale: AxisScale, dt: NaiveDateTime) -> f64 {
    match scale {
        AxisScale::Date => julian_day(dt.date()) as f64,
        _ => to_timestamp(dt),
    }
}

/// Granularity and step for ticks roughly `days` apart.
pub(crate) fn select_interval(days: f64) -> (DateTimeUnit, u32) {
    if days > 200.0 {
        let years = round125(days / 365.0);
        return (DateTimeUnit::Years, (years as u32).max(1));
    }
    if days > 20.0 {
        let steps = [(1.3, 1), (2.3, 2), (3.3, 3), (4.3, 4)];
        return (DateTimeUnit::Months, pick(days / 30.0, &steps, 6));
    }
    if days > 0.6 {
        if days < 1.3 {
            return (DateTimeUnit::Days, 1);
        }
        let weeks = (((days + 5.0) / 7.0) as u32).max(1);
        return (DateTimeUnit::Days, 7 * weeks);
    }
    let minutes = days * 24.0 * 60.0;
    if minutes > 40.0 {
        let steps = [(1.3, 1), (2.3, 2), (3.3, 3), (4.3, 4), (6.3, 6)];
        return (DateTimeUnit::Hours, pick(minutes / 60.0, &steps, 12));
    }
    let steps = [(1.3, 1), (2.3, 2), (5.3, 5), (10.3, 10), (15.3, 15), (20.3, 20)];
    if minutes > 0.8 {
        (DateTimeUnit::Minutes, pick(minutes, &steps, 30))
    } else {
        (DateTimeUnit::Seconds, pick(minutes * 60.0, &steps, 30))
    }
}

fn pick(value: f64, steps: &[(f64, u32)], fallback: u32) -> u32 {
    steps
        .iter()
        .find(|(below, _)| value < *below)
        .map_or(fallback, |(_, step)| *step)
}

pub(crate) fn advance(dt: NaiveDateTime, unit: DateTimeUnit, n: u32) -> Option<NaiveDateTime> {
    match unit {
        DateTimeUnit::Years => dt.checked_add_months(Months::new(n.checked_mul(12)?)),
        DateTimeUnit::Months => dt.checked_add_months(Months::new(n)),
        DateTimeUnit::Days => dt.checked_add_signed(Duration::days(i64::from(n))),
        DateTimeUnit::Hours => dt.checked_add_signed(Duration::hours(i64::from(n))),
        DateTimeUnit::Minutes => dt.checked_add_signed(Duration::minutes(i64::from(n))),
        DateTimeUnit::Seconds => dt.checked_add_signed(Duration::seconds(i64::from(n))),
    }
}

fn at(date: NaiveDate, hour: u32, minute: u32, second: u32) -> Option<NaiveDateTime> {
    date.and_hms_opt(hour, minute, second)
}

/// Latest tick boundary not after `dt`.
///
/// Multi-day steps align to Mondays; the other units align their own field
/// to a multiple of `interval`.
pub(crate) fn floor_to(dt: NaiveDateTime, unit: DateTimeUnit, interval: u32) -> Option<NaiveDateTime> {
    let step = i64::from(interval.max(1));
    let aligned = |v: u32| round_down(i64::from(v), step) as u32;
    let date = dt.date();
    match unit {
        DateTimeUnit::Years => at(NaiveDate::from_ymd_opt(date.year(), 1, 1)?, 0, 0, 0),
        DateTimeUnit::Months => {
            let month = aligned(date.month0()) + 1;
            at(NaiveDate::from_ymd_opt(date.year(), month, 1)?, 0, 0, 0)
        }
        DateTimeUnit::Days if interval <= 1 => at(date, 0, 0, 0),
        DateTimeUnit::Days => {
            let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
            at(monday, 0, 0, 0)
        }
        DateTimeUnit::Hours => at(date, aligned(dt.hour()), 0, 0),
        DateTimeUnit::Minutes => at(date, dt.hour(), aligned(dt.minute()), 0),
        DateTimeUnit::Seconds => at(date, dt.hour(), dt.minute(), aligned(dt.second())),
    }
}

/// Earliest tick boundary not before `dt`.
///
/// Multi-day steps are counted from `origin`, the first tick of the axis.
pub(crate) fn ceil_to(
    dt: NaiveDateTime,
    unit: DateTimeUnit,
    interval: u32,
    origin: NaiveDateTime,
) -> Option<NaiveDateTime> {
    if unit == DateTimeUnit::Days && interval > 1 {
        let mut days = (dt.date() - origin.date()).num_days();
        if dt.time() != NaiveTime::MIN {
            days += 1;
        }
        let days = round_up(days, i64::from(interval));
        return origin.checked_add_signed(Duration::days(days));
    }

    let mut t = floor_to(dt, unit, 1)?;
    if t != dt {
        t = advance(t, unit, 1)?;
    }
    if unit == DateTimeUnit::Years {
        return Some(t);
    }
    let field = match unit {
        DateTimeUnit::Months => t.month0(),
        DateTimeUnit::Hours => t.hour(),
        DateTimeUnit::Minutes => t.minute(),
        DateTimeUnit::Seconds => t.second(),
        DateTimeUnit::Days | DateTimeUnit::Years => 0,
    };
    if interval > 1 && field % interval != 0 {
        t = advance(floor_to(t, unit, interval)?, unit, interval)?;
    }
    Some(t)
}
