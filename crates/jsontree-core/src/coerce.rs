//! Typed access to nodes.
//!
//! Each `get_*` getter answers "this node as type T" following one fixed
//! conversion matrix:
//!
//! - `Null` yields `Ok(None)` for every getter.
//! - A kind that cannot be read as T at all fails with
//!   [`NodeError::TypeMismatch`] (e.g. an Object read as a Boolean).
//! - A kind that is convertible but whose content does not convert fails with
//!   [`NodeError::Format`] (e.g. `String("abc")` read as an Integer, or a
//!   fractional Decimal read as a Long).
//!
//! Every getter has a `require_*` twin that turns the `Null` case into a
//! caller-supplied error instead of `None`.

use crate::error::{NodeError, Result};
use crate::node::{truncate_to_millis, EnumValue, Node, ObjectMap};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

impl Node {
    pub fn get_string(&self) -> Result<Option<String>> {
        let text = match self {
            Node::Null => return Ok(None),
            Node::String(s) => s.clone(),
            Node::Enum(symbol) => symbol.name.clone(),
            Node::Decimal(d) => d.to_string(),
            Node::Integer(i) => i.to_string(),
            Node::Long(l) => l.to_string(),
            Node::Instant(t) => format_instant(t),
            Node::Date(t) => format_date(t),
            Node::Boolean(b) => b.to_string(),
            Node::Binary(bytes) => STANDARD.encode(bytes),
            Node::Object(_) | Node::Array(_) => {
                return Err(NodeError::mismatch("String", self.kind()))
            }
        };
        Ok(Some(text))
    }

    pub fn get_enum<E: EnumValue>(&self) -> Result<Option<E>> {
        let name = match self {
            Node::Null => return Ok(None),
            Node::String(s) => s.as_str(),
            Node::Enum(symbol) => symbol.name.as_str(),
            _ => return Err(NodeError::mismatch("Enum", self.kind())),
        };
        E::from_name(name).map(Some).ok_or_else(|| {
            NodeError::format(E::TYPE_NAME, format!("unknown symbol `{name}`"))
        })
    }

    pub fn get_decimal(&self) -> Result<Option<Decimal>> {
        let value = match self {
            Node::Null => return Ok(None),
            Node::String(s) => parse_decimal(s)?,
            Node::Decimal(d) => *d,
            Node::Integer(i) => Decimal::from(*i),
            Node::Long(l) => Decimal::from(*l),
            Node::Instant(t) | Node::Date(t) => Decimal::from(t.timestamp_millis()),
            Node::Boolean(b) => {
                if *b {
                    Decimal::ONE
                } else {
                    Decimal::ZERO
                }
            }
            _ => return Err(NodeError::mismatch("Decimal", self.kind())),
        };
        Ok(Some(value))
    }

    pub fn get_integer(&self) -> Result<Option<i32>> {
        const TARGET: &str = "Integer";
        let value = match self {
            Node::Null => return Ok(None),
            Node::String(s) => s
                .parse::<i32>()
                .map_err(|e| NodeError::format(TARGET, format!("`{s}`: {e}")))?,
            Node::Decimal(d) => narrow(decimal_to_i64(d, TARGET)?, TARGET)?,
            Node::Integer(i) => *i,
            Node::Long(l) => narrow(*l, TARGET)?,
            Node::Instant(t) | Node::Date(t) => narrow(t.timestamp_millis(), TARGET)?,
            Node::Boolean(b) => i32::from(*b),
            _ => return Err(NodeError::mismatch(TARGET, self.kind())),
        };
        Ok(Some(value))
    }

    pub fn get_long(&self) -> Result<Option<i64>> {
        const TARGET: &str = "Long";
        let value = match self {
            Node::Null => return Ok(None),
            Node::String(s) => s
                .parse::<i64>()
                .map_err(|e| NodeError::format(TARGET, format!("`{s}`: {e}")))?,
            Node::Decimal(d) => decimal_to_i64(d, TARGET)?,
            Node::Integer(i) => i64::from(*i),
            Node::Long(l) => *l,
            Node::Instant(t) | Node::Date(t) => t.timestamp_millis(),
            Node::Boolean(b) => i64::from(*b),
            _ => return Err(NodeError::mismatch(TARGET, self.kind())),
        };
        Ok(Some(value))
    }

    pub fn get_instant(&self) -> Result<Option<DateTime<Utc>>> {
        self.timestamp("Instant")
    }

    /// Like [`Node::get_instant`], truncated to millisecond precision.
    pub fn get_date(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.timestamp("Date")?.map(truncate_to_millis))
    }

    fn timestamp(&self, target: &'static str) -> Result<Option<DateTime<Utc>>> {
        let value = match self {
            Node::Null => return Ok(None),
            Node::String(s) => parse_timestamp(s, target)?,
            Node::Decimal(d) => from_millis(decimal_to_i64(d, target)?, target)?,
            Node::Integer(i) => from_millis(i64::from(*i), target)?,
            Node::Long(l) => from_millis(*l, target)?,
            Node::Instant(t) | Node::Date(t) => *t,
            _ => return Err(NodeError::mismatch(target, self.kind())),
        };
        Ok(Some(value))
    }

    pub fn get_boolean(&self) -> Result<Option<bool>> {
        let value = match self {
            Node::Null => return Ok(None),
            Node::String(s) => text_to_boolean(s),
            Node::Decimal(d) => !d.is_zero(),
            Node::Integer(i) => *i != 0,
            Node::Long(l) => *l != 0,
            Node::Boolean(b) => *b,
            _ => return Err(NodeError::mismatch("Boolean", self.kind())),
        };
        Ok(Some(value))
    }

    pub fn get_binary(&self) -> Result<Option<Vec<u8>>> {
        match self {
            Node::Null => Ok(None),
            Node::String(s) => STANDARD
                .decode(s)
                .map(Some)
                .map_err(|e| NodeError::format("Binary", e)),
            Node::Binary(bytes) => Ok(Some(bytes.clone())),
            _ => Err(NodeError::mismatch("Binary", self.kind())),
        }
    }

    pub fn get_object(&self) -> Result<Option<&ObjectMap>> {
        match self {
            Node::Null => Ok(None),
            Node::Object(map) => Ok(Some(map)),
            _ => Err(NodeError::mismatch("Object", self.kind())),
        }
    }

    pub fn get_object_mut(&mut self) -> Result<Option<&mut ObjectMap>> {
        match self {
            Node::Null => Ok(None),
            Node::Object(map) => Ok(Some(map)),
            other => Err(NodeError::mismatch("Object", other.kind())),
        }
    }

    pub fn get_array(&self) -> Result<Option<&[Node]>> {
        match self {
            Node::Null => Ok(None),
            Node::Array(items) => Ok(Some(items)),
            _ => Err(NodeError::mismatch("Array", self.kind())),
        }
    }

    pub fn get_array_mut(&mut self) -> Result<Option<&mut Vec<Node>>> {
        match self {
            Node::Null => Ok(None),
            Node::Array(items) => Ok(Some(items)),
            other => Err(NodeError::mismatch("Array", other.kind())),
        }
    }

    pub fn require_string<E, F>(&self, missing: F) -> std::result::Result<String, E>
    where
        E: From<NodeError>,
        F: FnOnce() -> E,
    {
        required(self.get_string(), missing)
    }

    pub fn require_enum<T, E, F>(&self, missing: F) -> std::result::Result<T, E>
    where
        T: EnumValue,
        E: From<NodeError>,
        F: FnOnce() -> E,
    {
        required(self.get_enum(), missing)
    }

    pub fn require_decimal<E, F>(&self, missing: F) -> std::result::Result<Decimal, E>
    where
        E: From<NodeError>,
        F: FnOnce() -> E,
    {
        required(self.get_decimal(), missing)
    }

    pub fn require_integer<E, F>(&self, missing: F) -> std::result::Result<i32, E>
    where
        E: From<NodeError>,
        F: FnOnce() -> E,
    {
        required(self.get_integer(), missing)
    }

    pub fn require_long<E, F>(&self, missing: F) -> std::result::Result<i64, E>
    where
        E: From<NodeError>,
        F: FnOnce() -> E,
    {
        required(self.get_long(), missing)
    }

    pub fn require_instant<E, F>(&self, missing: F) -> std::result::Result<DateTime<Utc>, E>
    where
        E: From<NodeError>,
        F: FnOnce() -> E,
    {
        required(self.get_instant(), missing)
    }

    pub fn require_date<E, F>(&self, missing: F) -> std::result::Result<DateTime<Utc>, E>
    where
        E: From<NodeError>,
        F: FnOnce() -> E,
    {
        required(self.get_date(), missing)
    }

    pub fn require_boolean<E, F>(&self, missing: F) -> std::result::Result<bool, E>
    where
        E: From<NodeError>,
        F: FnOnce() -> E,
    {
        required(self.get_boolean(), missing)
    }

    pub fn require_binary<E, F>(&self, missing: F) -> std::result::Result<Vec<u8>, E>
    where
        E: From<NodeError>,
        F: FnOnce() -> E,
    {
        required(self.get_binary(), missing)
    }

    pub fn require_object<E, F>(&self, missing: F) -> std::result::Result<&ObjectMap, E>
    where
        E: From<NodeError>,
        F: FnOnce() -> E,
    {
        required(self.get_object(), missing)
    }

    pub fn require_array<E, F>(&self, missing: F) -> std::result::Result<&[Node], E>
    where
        E: From<NodeError>,
        F: FnOnce() -> E,
    {
        required(self.get_array(), missing)
    }
}

/// Unwrap a getter result, mapping the absent case through `missing`.
fn required<T, E, F>(value: Result<Option<T>>, missing: F) -> std::result::Result<T, E>
where
    E: From<NodeError>,
    F: FnOnce() -> E,
{
    match value? {
        Some(v) => Ok(v),
        None => Err(missing()),
    }
}

/// First-character boolean heuristic: `1`, `T`, `t`, `Y`, `y` mean true,
/// anything else (including the empty string) means false.
pub fn text_to_boolean(text: &str) -> bool {
    matches!(text.chars().next(), Some('1' | 'T' | 't' | 'Y' | 'y'))
}

/// Parse plain or exponent decimal text.
///
/// The conversion is exact: text carrying more precision than a [`Decimal`]
/// holds, or an exponent that pushes the value out of range, is rejected
/// instead of rounded.
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    let invalid = |message: String| NodeError::format("Decimal", format!("`{text}`: {message}"));
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(i) => (&text[..i], Some(&text[i + 1..])),
        None => (text, None),
    };
    let value = Decimal::from_str_exact(mantissa).map_err(|e| invalid(e.to_string()))?;
    let Some(exponent) = exponent else {
        return Ok(value);
    };
    let exponent: i64 = exponent
        .parse()
        .map_err(|e| invalid(format!("invalid exponent: {e}")))?;
    shift_by_exponent(value, exponent)
        .ok_or_else(|| invalid("value does not fit a Decimal exactly".to_string()))
}

/// Largest scale (and power of ten) a [`Decimal`] can carry.
const MAX_SCALE: i64 = 28;

/// `value × 10^exponent`, or `None` when the result would lose digits.
fn shift_by_exponent(mut value: Decimal, exponent: i64) -> Option<Decimal> {
    let scale = i64::from(value.scale()) - exponent;
    if scale >= 0 {
        value.set_scale(u32::try_from(scale).ok()?).ok()?;
        return Some(value);
    }
    if value.is_zero() {
        return Some(Decimal::ZERO);
    }
    if scale < -MAX_SCALE {
        return None;
    }
    value.set_scale(0).ok()?;
    (0..-scale).try_fold(value, |acc, _| acc.checked_mul(Decimal::TEN))
}

/// RFC 3339 text, normalised to UTC.
fn parse_timestamp(text: &str, target: &'static str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| NodeError::format(target, format!("`{text}`: {e}")))
}

/// ISO-8601 rendering of an Instant: as many fractional digits as needed.
pub(crate) fn format_instant(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// ISO-8601 rendering of a Date: always millisecond precision.
pub(crate) fn format_date(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn from_millis(millis: i64, target: &'static str) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        NodeError::format(target, format!("{millis} ms is outside the supported range"))
    })
}

fn decimal_to_i64(value: &Decimal, target: &'static str) -> Result<i64> {
    if !value.fract().is_zero() {
        return Err(NodeError::format(
            target,
            format!("{value} has a fractional part"),
        ));
    }
    value
        .to_i64()
        .ok_or_else(|| NodeError::format(target, format!("{value} is out of range")))
}

fn narrow(value: i64, target: &'static str) -> Result<i32> {
    i32::try_from(value).map_err(|_| NodeError::format(target, format!("{value} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_heuristic() {
        for text in ["1", "true", "True", "yes", "Y", "t"] {
            assert!(text_to_boolean(text), "{text}");
        }
        for text in ["", "0", "false", "no", "on", " true"] {
            assert!(!text_to_boolean(text), "{text}");
        }
    }

    #[test]
    fn decimal_text_accepts_exponent() {
        assert_eq!(parse_decimal("1.5e2").unwrap(), Decimal::from(150));
        assert_eq!(parse_decimal("1.5E+1").unwrap(), Decimal::from(15));
        assert_eq!(parse_decimal("25.0e-3").unwrap(), Decimal::new(25, 3));
        assert_eq!(parse_decimal("0.0e99").unwrap(), Decimal::ZERO);
        assert!(parse_decimal("1.2.3").is_err());
        assert!(parse_decimal("1.5e").is_err());
    }

    #[test]
    fn decimal_text_is_never_rounded() {
        for text in [
            "1.00000000000000000000000000001",
            "0.123456789012345678901234567890123",
            "1.5e-28",
            "1.0e300",
        ] {
            let err = parse_decimal(text).unwrap_err();
            assert!(matches!(err, NodeError::Format { target: "Decimal", .. }), "{text}");
        }
        assert_eq!(parse_decimal("1.5e-27").unwrap(), Decimal::new(15, 28));
        assert_eq!(parse_decimal("7.0e27").unwrap().to_string(), "7000000000000000000000000000");
    }

    #[test]
    fn fractional_decimal_does_not_narrow() {
        let err = decimal_to_i64(&Decimal::new(15, 1), "Long").unwrap_err();
        assert!(matches!(err, NodeError::Format { target: "Long", .. }));
        // Trailing zeros are not a fractional part.
        assert_eq!(decimal_to_i64(&Decimal::new(200, 2), "Long").unwrap(), 2);
    }
}
