//! Label text for axis values.
//!
//! Numeric axes use printf-style formats (`%.4g` unless configured), date
//! axes use strftime formats chosen from the tick granularity.

use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};
use chrono::Timelike;

use crate::chart::axis::calendar;
use crate::chart::axis::{Axis, Segment};
use crate::chart::context::ChartContext;
use crate::chart::types::{AxisScale, DateTimeUnit};

pub(crate) const DEFAULT_NUMBER_FORMAT: &str = "%.4g";

impl Axis {
    /// The format labels are rendered with.
    ///
    /// For date axes without an explicit format this depends on the
    /// granularity chosen by the last [`Axis::prepare_render`].
    pub fn label_format(&self) -> String {
        match (self.scale, &self.label_format) {
            (AxisScale::Category, _) => String::new(),
            (_, Some(format)) => format.clone(),
            (scale, None) if scale.is_calendar() => self
                .segments
                .first()
                .map(|s| self.default_date_format(s).to_string())
                .unwrap_or_default(),
            (_, None) => DEFAULT_NUMBER_FORMAT.to_string(),
        }
    }

    pub fn label(&self, value: f64, ctx: &dyn ChartContext) -> String {
        match self.scale {
            AxisScale::Category => {
                let label = if value >= 0.0 {
                    ctx.category_label(self.id, value as usize)
                } else {
                    None
                };
                label
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| format!("{value}"))
            }
            AxisScale::Date | AxisScale::DateTime => calendar::decode(self.scale, value)
                .map(|dt| format_date(dt, &self.label_format()))
                .unwrap_or_default(),
            AxisScale::Linear | AxisScale::Log => {
                let format = self.label_format();
                match NumberFormat::parse(&format) {
                    Some(parsed) => parsed.format(value),
                    None => format!("{value}"),
                }
            }
        }
    }

    pub(crate) fn default_date_format(&self, segment: &Segment) -> &'static str {
        if !self.scale.is_calendar() {
            return "";
        }
        let Some(dt) = calendar::decode(self.scale, segment.render_minimum) else {
            return "";
        };
        let at_tick = self.labels_at_ticks(segment.date_time_unit, segment.date_time_interval);
        auto_date_format(dt, segment.date_time_unit, at_tick)
    }

    /// Coarse single steps label the span between two ticks instead of the
    /// ticks themselves.
    pub(crate) fn labels_at_ticks(&self, unit: DateTimeUnit, interval: u32) -> bool {
        interval > 1 || unit <= DateTimeUnit::Days || !self.round_limits.minimum
    }
}

pub(crate) fn format_date(dt: NaiveDateTime, format: &str) -> String {
    if !is_valid_date_format(format) {
        return String::new();
    }
    dt.format(format).to_string()
}

pub(crate) fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

pub(crate) fn auto_date_format(dt: NaiveDateTime, unit: DateTimeUnit, at_tick: bool) -> &'static str {
    if !at_tick {
        return match unit {
            DateTimeUnit::Years => "%Y",
            DateTimeUnit::Months => "%b %y",
            DateTimeUnit::Days => "%d/%m/%y",
            DateTimeUnit::Hours => "%-Hh %d/%m",
            DateTimeUnit::Minutes => "%H:%M",
            DateTimeUnit::Seconds => "%H:%M:%S",
        };
    }
    match unit {
        DateTimeUnit::Years | DateTimeUnit::Months | DateTimeUnit::Days => {
            if dt.second() != 0 {
                "%d/%m/%y %H:%M:%S"
            } else if dt.hour() != 0 {
                "%d/%m/%y %H:%M"
            } else {
                "%d/%m/%y"
            }
        }
        DateTimeUnit::Hours => {
            if dt.second() != 0 {
                "%d/%m %H:%M:%S"
            } else if dt.minute() != 0 {
                "%d/%m %H:%M"
            } else {
                "%-Hh %d/%m"
            }
        }
        DateTimeUnit::Minutes if dt.second() != 0 => "%H:%M:%S",
        DateTimeUnit::Minutes => "%H:%M",
        DateTimeUnit::Seconds => "%H:%M:%S",
    }
}

/// A printf-style format with exactly one numeric conversion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NumberFormat {
    prefix: String,
    suffix: String,
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alternate: bool,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

impl NumberFormat {
    pub(crate) fn parse(format: &str) -> Option<Self> {
        let mut prefix = String::new();
        let mut chars = format.chars().peekable();
        loop {
            match chars.next()? {
                '%' if chars.peek() == Some(&'%') => {
                    chars.next();
                    prefix.push('%');
                }
                '%' => break,
                c => prefix.push(c),
            }
        }

        let mut parsed = NumberFormat {
            prefix,
            suffix: String::new(),
            left: false,
            plus: false,
            space: false,
            zero: false,
            alternate: false,
            width: 0,
            precision: None,
            conversion: 'g',
        };
        while let Some(&c) = chars.peek() {
            match c {
                '-' => parsed.left = true,
                '+' => parsed.plus = true,
                ' ' => parsed.space = true,
                '0' => parsed.zero = true,
                '#' => parsed.alternate = true,
                _ => break,
            }
            chars.next();
        }
        parsed.width = take_number(&mut chars).unwrap_or(0);
        if chars.peek() == Some(&'.') {
            chars.next();
            parsed.precision = Some(take_number(&mut chars).unwrap_or(0));
        }
        parsed.conversion = match chars.next()? {
            c @ ('f' | 'F' | 'e' | 'E' | 'g' | 'G' | 'd' | 'i') => c,
            _ => return None,
        };

        loop {
            match chars.next() {
                None => break,
                Some('%') if chars.peek() == Some(&'%') => {
                    chars.next();
                    parsed.suffix.push('%');
                }
                Some('%') => return None,
                Some(c) => parsed.suffix.push(c),
            }
        }
        Some(parsed)
    }

    pub(crate) fn format(&self, value: f64) -> String {
        let value = if value == 0.0 { 0.0 } else { value };
        let body = if !value.is_finite() {
            let text = if value.is_nan() { "nan" } else { "inf" };
            if self.conversion.is_uppercase() {
                text.to_uppercase()
            } else {
                text.to_string()
            }
        } else {
            let magnitude = value.abs();
            let precision = self.precision.unwrap_or(6);
            match self.conversion {
                'f' | 'F' => format!("{magnitude:.precision$}"),
                'e' | 'E' => exponential(magnitude, precision, self.conversion == 'E'),
                'd' | 'i' => format!("{}", magnitude.round() as u64),
                _ => general(magnitude, precision, self.alternate, self.conversion == 'G'),
            }
        };

        let sign = if value.is_sign_negative() && !value.is_nan() {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        };
        let len = sign.len() + body.len();
        let padded = if len >= self.width {
            format!("{sign}{body}")
        } else if self.left {
            format!("{sign}{body}{}", " ".repeat(self.width - len))
        } else if self.zero && value.is_finite() {
            format!("{sign}{}{body}", "0".repeat(self.width - len))
        } else {
            format!("{}{sign}{body}", " ".repeat(self.width - len))
        };
        format!("{}{padded}{}", self.prefix, self.suffix)
    }
}

fn take_number<I>(chars: &mut std::iter::Peekable<I>) -> Option<usize>
where
    I: Iterator<Item = char>,
{
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0) * 10 + digit as usize);
        chars.next();
    }
    value
}

/// Split Rust's `1.5e3` form into mantissa and exponent.
fn scientific(magnitude: f64, precision: usize) -> (String, i32) {
    let text = format!("{magnitude:.precision$e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => (mantissa.to_string(), exponent.parse().unwrap_or(0)),
        None => (text, 0),
    }
}

fn exponent_suffix(exponent: i32, upper: bool) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    let e = if upper { 'E' } else { 'e' };
    format!("{e}{sign}{:02}", exponent.abs())
}

fn exponential(magnitude: f64, precision: usize, upper: bool) -> String {
    let (mantissa, exponent) = scientific(magnitude, precision);
    format!("{mantissa}{}", exponent_suffix(exponent, upper))
}

fn general(magnitude: f64, precision: usize, alternate: bool, upper: bool) -> String {
    let precision = precision.max(1);
    let (mantissa, exponent) = scientific(magnitude, precision - 1);
    if exponent < -4 || exponent >= precision as i32 {
        let mantissa = if alternate {
            mantissa
        } else {
            strip_zeros(&mantissa)
        };
        format!("{mantissa}{}", exponent_suffix(exponent, upper))
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        let fixed = format!("{magnitude:.decimals$}");
        if alternate { fixed } else { strip_zeros(&fixed) }
    }
}

fn strip_zeros(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
