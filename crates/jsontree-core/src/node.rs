//! The value model: a single recursive tagged union.
//!
//! Every position in a document is a [`Node`]. Containers own their children
//! outright (no back-references), so a tree is acyclic by construction and is
//! dropped bottom-up like any other owned value.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::fmt;

/// Insertion-ordered object payload.
pub type ObjectMap = IndexMap<String, Node>;

/// A JSON document node. A fresh node is [`Node::Null`].
///
/// `Integer`/`Long` and `Instant`/`Date` are kept apart because they render
/// and narrow differently; the coercion layer converts freely between them.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    #[default]
    Null,
    String(String),
    /// A string that remembers which enumeration it came from.
    Enum(EnumSymbol),
    Decimal(Decimal),
    Integer(i32),
    Long(i64),
    /// Absolute timestamp, rendered with full sub-second precision.
    Instant(DateTime<Utc>),
    /// Absolute timestamp with millisecond precision.
    Date(DateTime<Utc>),
    Boolean(bool),
    /// Raw bytes, rendered as Base64 text.
    Binary(Vec<u8>),
    Object(ObjectMap),
    Array(Vec<Node>),
}

/// The variant tag of a [`Node`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    String,
    Enum,
    Decimal,
    Integer,
    Long,
    Instant,
    Date,
    Boolean,
    Binary,
    Object,
    Array,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Null => "Null",
            NodeKind::String => "String",
            NodeKind::Enum => "Enum",
            NodeKind::Decimal => "Decimal",
            NodeKind::Integer => "Integer",
            NodeKind::Long => "Long",
            NodeKind::Instant => "Instant",
            NodeKind::Date => "Date",
            NodeKind::Boolean => "Boolean",
            NodeKind::Binary => "Binary",
            NodeKind::Object => "Object",
            NodeKind::Array => "Array",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of an [`Node::Enum`]: the symbol plus the enumeration it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumSymbol {
    pub type_name: &'static str,
    pub name: String,
}

impl EnumSymbol {
    pub fn of<E: EnumValue>(value: &E) -> Self {
        EnumSymbol {
            type_name: E::TYPE_NAME,
            name: value.name().to_string(),
        }
    }
}

/// A Rust enumeration that can be stored in an [`Node::Enum`] and read back.
///
/// ```
/// use jsontree_core::{EnumValue, Node};
///
/// #[derive(Debug, PartialEq)]
/// enum Color { Red, Green }
///
/// impl EnumValue for Color {
///     const TYPE_NAME: &'static str = "Color";
///     fn name(&self) -> &str {
///         match self { Color::Red => "RED", Color::Green => "GREEN" }
///     }
///     fn from_name(name: &str) -> Option<Self> {
///         match name { "RED" => Some(Color::Red), "GREEN" => Some(Color::Green), _ => None }
///     }
/// }
///
/// let mut node = Node::Null;
/// node.set_enum(Some(Color::Green));
/// assert_eq!(node.get_string().unwrap().as_deref(), Some("GREEN"));
/// assert_eq!(node.get_enum::<Color>().unwrap(), Some(Color::Green));
/// ```
pub trait EnumValue: Sized {
    /// Identity of the enumeration, kept alongside each stored symbol.
    const TYPE_NAME: &'static str;

    fn name(&self) -> &str;

    fn from_name(name: &str) -> Option<Self>;
}

impl Node {
    /// An empty Object node.
    pub fn object() -> Self {
        Node::Object(ObjectMap::new())
    }

    /// An empty Array node.
    pub fn array() -> Self {
        Node::Array(Vec::new())
    }

    /// A Date node; the timestamp is truncated to millisecond precision.
    pub fn date(value: DateTime<Utc>) -> Self {
        Node::Date(truncate_to_millis(value))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::String(_) => NodeKind::String,
            Node::Enum(_) => NodeKind::Enum,
            Node::Decimal(_) => NodeKind::Decimal,
            Node::Integer(_) => NodeKind::Integer,
            Node::Long(_) => NodeKind::Long,
            Node::Instant(_) => NodeKind::Instant,
            Node::Date(_) => NodeKind::Date,
            Node::Boolean(_) => NodeKind::Boolean,
            Node::Binary(_) => NodeKind::Binary,
            Node::Object(_) => NodeKind::Object,
            Node::Array(_) => NodeKind::Array,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// True for every non-container node, including `Null`.
    pub fn is_simple(&self) -> bool {
        !self.is_object() && !self.is_array()
    }

    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_decimal()
    }

    /// True for the fixed-width integer kinds (`Integer` and `Long`).
    pub fn is_integer(&self) -> bool {
        matches!(self, Node::Integer(_) | Node::Long(_))
    }

    pub fn is_decimal(&self) -> bool {
        matches!(self, Node::Decimal(_))
    }

    /// True for both timestamp kinds (`Instant` and `Date`).
    pub fn is_date(&self) -> bool {
        matches!(self, Node::Instant(_) | Node::Date(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Node::String(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Node::Enum(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Node::Boolean(_))
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Node::Binary(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Node::Array(_))
    }

    /// Null, or a container whose every descendant is effectively null.
    /// Empty containers are vacuously effectively null.
    pub fn is_effectively_null(&self) -> bool {
        match self {
            Node::Null => true,
            Node::Object(map) => map.values().all(Node::is_effectively_null),
            Node::Array(items) => items.iter().all(Node::is_effectively_null),
            _ => false,
        }
    }

    /// Number of direct children of a container; 0 for scalars.
    pub fn len(&self) -> usize {
        match self {
            Node::Object(map) => map.len(),
            Node::Array(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of an Object in insertion order; empty for every other kind.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let map = match self {
            Node::Object(map) => Some(map),
            _ => None,
        };
        map.into_iter().flat_map(|m| m.keys().map(String::as_str))
    }

    /// Overwrite this node's tag and payload in one step.
    ///
    /// Any `None` input (see the `From<Option<T>>` impl) resets the node to
    /// `Null`, so "no value" always has a single representation.
    pub fn set(&mut self, value: impl Into<Node>) {
        *self = value.into();
    }

    pub fn set_enum<E: EnumValue>(&mut self, value: Option<E>) {
        *self = match value {
            Some(v) => Node::Enum(EnumSymbol::of(&v)),
            None => Node::Null,
        };
    }

    pub fn set_date(&mut self, value: Option<DateTime<Utc>>) {
        *self = value.map(Node::date).unwrap_or(Node::Null);
    }

    /// Take the payload out, leaving `Null` behind.
    pub fn take(&mut self) -> Node {
        std::mem::take(self)
    }

    /// Append to an Array. A non-Array node is first replaced by an empty Array.
    pub fn push(&mut self, value: impl Into<Node>) -> &mut Node {
        let items = self.make_array();
        items.push(value.into());
        let last = items.len() - 1;
        &mut items[last]
    }

    /// Insert under a flat key of an Object, keeping the position of an existing
    /// key. A non-Object node is first replaced by an empty Object. Returns the
    /// previous value for that key, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.make_object().insert(key.into(), value.into())
    }

    /// Coerce into an Object, discarding any other payload, and return the map.
    pub fn make_object(&mut self) -> &mut ObjectMap {
        if !self.is_object() {
            if !self.is_null() {
                log::debug!("replacing {} node with an empty Object", self.kind());
            }
            *self = Node::object();
        }
        match self {
            Node::Object(map) => map,
            _ => unreachable!("node was just made an Object"),
        }
    }

    /// Coerce into an Array, discarding any other payload, and return the items.
    pub fn make_array(&mut self) -> &mut Vec<Node> {
        if !self.is_array() {
            *self = Node::array();
        }
        match self {
            Node::Array(items) => items,
            _ => unreachable!("node was just made an Array"),
        }
    }
}

pub(crate) fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or(value)
}

macro_rules! node_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::$variant(value.into())
                }
            }
        )*
    };
}

node_from! {
    String => String,
    &str => String,
    Decimal => Decimal,
    i32 => Integer,
    i64 => Long,
    bool => Boolean,
    Vec<u8> => Binary,
    &[u8] => Binary,
    DateTime<Utc> => Instant,
    ObjectMap => Object,
    Vec<Node> => Array,
    EnumSymbol => Enum,
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Node::Null)
    }
}

impl FromIterator<Node> for Node {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Node::Array(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Node::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
