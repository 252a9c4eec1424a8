//! Type-directed value coercion
//!
//! Raw request strings are parsed into the value kind of the target field.
//! Rules by kind:
//! - string: unchanged
//! - enum: exact, case-sensitive match of a declared name
//! - date / datetime / time: ISO-8601 local profiles
//! - integers / floats: exact width, overflow is an error; NaN and
//!   infinities are rejected
//! - boolean: see [`BooleanCoercion`]
//! - character: first character of a non-empty string
//! - relations: never coercible

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::errors::{FilterError, FilterResult};
use crate::model::ValueKind;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// How boolean strings are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanCoercion {
    /// `true`/`false` in any case; anything else is ILLEGAL_ARGUMENT
    #[default]
    Strict,
    /// Case-insensitive `true` is true, anything else is false
    Lenient,
}

/// A coerced, typed value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    Character(char),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    /// Declared symbolic name of an enum kind
    Enum(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) | Value::Enum(s) => write!(f, "{}", s),
            Value::Int8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Character(c) => write!(f, "{}", c),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMATS[0])),
            Value::Time(t) => write!(f, "{}", t.format(TIME_FORMATS[0])),
        }
    }
}

/// Coerces a single raw value into `kind`
pub fn coerce(kind: &ValueKind, raw: Option<&str>, booleans: BooleanCoercion) -> FilterResult<Value> {
    let raw = raw.ok_or_else(FilterError::value_cannot_be_null)?;
    let illegal = || FilterError::illegal_argument(kind.type_name(), raw);

    match kind {
        ValueKind::String => Ok(Value::String(raw.to_string())),
        ValueKind::Enum { variants } => variants
            .iter()
            .find(|v| v.as_str() == raw)
            .map(|v| Value::Enum(v.clone()))
            .ok_or_else(illegal),
        ValueKind::DateTime => parse_with(raw, &DATETIME_FORMATS, NaiveDateTime::parse_from_str)
            .map(Value::DateTime)
            .ok_or_else(illegal),
        ValueKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Value::Date)
            .map_err(|_| illegal()),
        ValueKind::Time => parse_with(raw, &TIME_FORMATS, NaiveTime::parse_from_str)
            .map(Value::Time)
            .ok_or_else(illegal),
        ValueKind::Int64 => raw.parse().map(Value::Int64).map_err(|_| illegal()),
        ValueKind::Float64 => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Value::Float64)
            .ok_or_else(illegal),
        ValueKind::Int32 => raw.parse().map(Value::Int32).map_err(|_| illegal()),
        ValueKind::Boolean => coerce_bool(raw, booleans).map(Value::Boolean).ok_or_else(illegal),
        ValueKind::Int16 => raw.parse().map(Value::Int16).map_err(|_| illegal()),
        ValueKind::Int8 => raw.parse().map(Value::Int8).map_err(|_| illegal()),
        ValueKind::Float32 => raw
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Value::Float32)
            .ok_or_else(illegal),
        ValueKind::Character => raw.chars().next().map(Value::Character).ok_or_else(illegal),
        ValueKind::RelationToOne { .. } | ValueKind::RelationToMany { .. } => Err(illegal()),
    }
}

/// Coerces a list of raw values; the first failure aborts the whole list
pub fn coerce_list(
    kind: &ValueKind,
    raw: Option<&[String]>,
    booleans: BooleanCoercion,
) -> FilterResult<Vec<Value>> {
    let raw = raw.ok_or_else(FilterError::values_cannot_be_null)?;
    raw.iter()
        .map(|v| coerce(kind, Some(v.as_str()), booleans))
        .collect()
}

fn coerce_bool(raw: &str, booleans: BooleanCoercion) -> Option<bool> {
    match booleans {
        BooleanCoercion::Strict => {
            if raw.eq_ignore_ascii_case("true") {
                Some(true)
            } else if raw.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        BooleanCoercion::Lenient => Some(raw.eq_ignore_ascii_case("true")),
    }
}

fn parse_with<T, E>(raw: &str, formats: &[&str], parse: fn(&str, &str) -> Result<T, E>) -> Option<T> {
    formats.iter().find_map(|format| parse(raw, format).ok())
}
