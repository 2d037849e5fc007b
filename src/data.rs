use std::fmt;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::schema::ColumnType;

/// Candidate formats tried, in order, when detecting date columns.
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// A numeric cell value. Integer-column extrema keep their exact `i64`
/// representation through JSON serialization instead of widening to float.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Eq for Number {}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a.cmp(b),
            (a, b) => a.as_f64().total_cmp(&b.as_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Base-10 integer literal: optional sign, digits, no decimal point or
/// exponent. Values beyond `i64` range do not qualify.
pub fn parse_integer_literal(value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|_| anyhow!("Failed to parse '{value}' as integer"))
}

pub fn parse_float_literal(value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| anyhow!("Failed to parse '{value}' as float"))
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

/// Parses a trimmed, non-empty cell under a numeric column type. `None`
/// marks the cell invalid for that type.
pub fn parse_number(value: &str, datatype: ColumnType) -> Option<Number> {
    match datatype {
        ColumnType::Integer => parse_integer_literal(value).ok().map(Number::Integer),
        ColumnType::Float => parse_float_literal(value).ok().map(Number::Float),
        ColumnType::Date | ColumnType::String => None,
    }
}

/// Quantizes a float to `places` decimal places through `Decimal` (banker's
/// rounding) so persisted JSON carries no binary floating-point artifacts.
/// Non-finite values pass through unchanged.
pub fn quantize(value: f64, places: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|decimal| decimal.round_dp(places))
        .and_then(|decimal| decimal.to_f64())
        .unwrap_or(value)
}
