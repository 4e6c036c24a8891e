//! Permissive field readers for policy records
//!
//! Records come from a schemaless store: amounts may be numbers or strings,
//! identifiers may be numeric, dates arrive in several textual shapes. A bad
//! value degrades to "absent" (or 0 for amounts) instead of failing the
//! record. Only a missing application number rejects a record.

use super::{PaymentMode, PolicyStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer, Visitor};
use std::fmt;

/// Any scalar a JSON document can hold
#[derive(Debug, Clone, PartialEq)]
enum Scalar {
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Textual form, `None` for null and blank strings
    fn into_text(self) -> Option<String> {
        match self {
            Scalar::Missing => None,
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Int(n) => Some(n.to_string()),
            Scalar::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some((f as i64).to_string()),
            Scalar::Float(f) => Some(f.to_string()),
            Scalar::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
            }
        }
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> { Ok(Scalar::Bool(v)) }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> { Ok(Scalar::Int(v)) }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
        Ok(i64::try_from(v).map(Scalar::Int).unwrap_or(Scalar::Float(v as f64)))
    }
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> { Ok(Scalar::Float(v)) }
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> { Ok(Scalar::Text(v.to_string())) }
    fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> { Ok(Scalar::Text(v)) }
    fn visit_none<E: de::Error>(self) -> Result<Scalar, E> { Ok(Scalar::Missing) }
    fn visit_unit<E: de::Error>(self) -> Result<Scalar, E> { Ok(Scalar::Missing) }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Scalar, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Scalar, D::Error> {
    deserializer.deserialize_any(ScalarVisitor)
}

/// Required identifier; numbers are rendered as text
pub fn identifier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar(deserializer)?
        .into_text()
        .ok_or_else(|| de::Error::custom("application number is required"))
}

pub fn optional_identifier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar(deserializer)?.into_text())
}

/// Free text, null becomes empty
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar(deserializer)?.into_text().unwrap_or_default())
}

pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match scalar(deserializer)? {
        Scalar::Int(n) => n,
        Scalar::Float(f) if f.is_finite() => f.trunc() as i64,
        Scalar::Text(s) => parse_amount(&s),
        _ => 0,
    })
}

pub fn optional_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    Ok(match scalar(deserializer)? {
        Scalar::Text(s) => parse_date(&s),
        _ => None,
    })
}

pub fn mode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PaymentMode>, D::Error> {
    Ok(scalar(deserializer)?.into_text().and_then(|s| match s.parse() {
        Ok(mode) => Some(mode),
        Err(reason) => {
            log::debug!("{}", reason);
            None
        }
    }))
}

pub fn status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PolicyStatus>, D::Error> {
    Ok(scalar(deserializer)?.into_text().and_then(|s| s.parse().ok()))
}

/// Leading-integer parse: optional sign then digits, anything else ends the
/// number. No digits at all gives 0.
pub fn parse_amount(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits: &str = {
        let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return 0;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}

/// Date-only value from the textual shapes the store produces.
///
/// Timestamps keep their literal calendar date; no timezone shifting.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.date_naive());
    }
    None
}
