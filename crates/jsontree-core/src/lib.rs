//! # jsontree-core
//!
//! A self-contained JSON document engine: an in-memory tagged-value tree, a
//! strict recursive-descent parser, a canonical/pretty serializer, dotted-path
//! addressing over nested objects, and a coercion layer that reads any node as
//! any of several scalar types.
//!
//! ## Quick start
//!
//! ```rust
//! use jsontree_core::{parse, DottedView, Node};
//!
//! let mut root = parse(r#"{"server":{"port":8080,"debug":"yes"}}"#).unwrap();
//! assert_eq!(root.get("server.port").unwrap().get_integer().unwrap(), Some(8080));
//! assert_eq!(root.get("server.debug").unwrap().get_boolean().unwrap(), Some(true));
//!
//! root.put("server.host", "localhost");
//! assert_eq!(
//!     root.to_json(),
//!     r#"{"server":{"port":8080,"debug":"yes","host":"localhost"}}"#
//! );
//! assert_eq!(root.lookup("server.host").as_deref(), Some("localhost"));
//! ```
//!
//! ## Modules
//!
//! - [`node`] — the [`Node`] tagged union and its classification predicates
//! - [`coerce`] — typed `get_*`/`require_*` accessors and the conversion matrix
//! - [`path`] — complex-name lookup, spawn-on-demand, flatten, collapse
//! - [`parser`] — text → [`Node`], with position-tracked errors
//! - [`serializer`] — [`Node`] → text, canonical or indented
//! - [`view`] — [`DottedView`], the flat string view for config/template layers
//! - [`interop`] — conversions to and from `serde_json::Value`
//! - [`error`] — [`NodeError`]
//!
//! A single tree is not synchronized; concurrent mutation must be serialized
//! by the caller. Distinct trees share no state.

pub mod coerce;
pub mod error;
pub mod interop;
pub mod node;
pub mod parser;
pub mod path;
pub mod serializer;
pub mod view;

pub use coerce::text_to_boolean;
pub use error::{NodeError, Result};
pub use node::{EnumSymbol, EnumValue, Node, NodeKind, ObjectMap};
pub use parser::{parse, parse_with, unescape, ParseOptions, DEFAULT_MAX_DEPTH};
pub use path::SEPARATOR;
pub use serializer::{escape, RenderOptions, DEFAULT_INDENT};
pub use view::DottedView;
