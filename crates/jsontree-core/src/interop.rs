//! Conversions between [`Node`] and `serde_json::Value`.
//!
//! `serde_json` has no Decimal, timestamp, binary or enum types, so the
//! outbound direction maps those onto the closest JSON shape: Decimals become
//! f64 numbers (lossy beyond ~15 significant digits), timestamps their ISO-8601
//! text, Binary its Base64 text and Enums their symbol name.

use crate::coerce::parse_decimal;
use crate::error::NodeError;
use crate::node::Node;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Number, Value};

/// Inbound: integers that fit `i64` become `Long`, all other numbers become
/// `Decimal`. Fails with a Format error for numbers outside Decimal range.
impl TryFrom<Value> for Node {
    type Error = NodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let node = match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Boolean(b),
            Value::Number(n) => number_to_node(&n)?,
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::Array(
                items
                    .into_iter()
                    .map(Node::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => Node::Object(
                map.into_iter()
                    .map(|(k, v)| Node::try_from(v).map(|node| (k, node)))
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(node)
    }
}

fn number_to_node(n: &Number) -> Result<Node, NodeError> {
    if let Some(i) = n.as_i64() {
        return Ok(Node::Long(i));
    }
    parse_decimal(&n.to_string()).map(Node::Decimal)
}

/// Outbound. Decimals are converted through `f64`, so values with more than
/// about 15 significant digits come out rounded; callers that need the exact
/// digits should read them with [`Node::get_string`] instead. A Decimal that
/// has no finite `f64` form becomes `Value::Null`.
impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Null => Value::Null,
            Node::Boolean(b) => Value::Bool(*b),
            Node::Integer(i) => Value::Number((*i).into()),
            Node::Long(l) => Value::Number((*l).into()),
            Node::Decimal(d) => d
                .to_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Node::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect::<Map<_, _>>(),
            ),
            Node::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            // Every remaining kind has a String coercion.
            scalar => scalar
                .get_string()
                .ok()
                .flatten()
                .map(Value::String)
                .unwrap_or(Value::Null),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::from(&node)
    }
}
