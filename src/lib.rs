//! # jsonbuddy
//!
//! A JSON document model together with the parser and serializer that fill
//! and render it.
//!
//! ## Key Features
//!
//! - **Typed tree**: [`JsonNode`] is a closed enum of objects, arrays and
//!   simple values (text, long, double, boolean, instant, null)
//! - **Forgiving reads**: `long_value` accepts numeric text and
//!   `instant_value` accepts ISO-8601 text, without changing what is stored
//! - **Explicit failures**: every `x_value` accessor has a `required_x`
//!   counterpart returning [`Error::ValueNotPresent`] with the key name
//! - **Strict parsing**: RFC 8259 only, with line/column/offset on every error
//! - **Canonical output**: one compact rendering, streamed to any
//!   [`io::Write`]
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonbuddy::{parse, JsonObject};
//!
//! let node = parse(r#"{"firstname":"Darth","lastname":"Vader","born":"41"}"#).unwrap();
//! let person = node.as_object().unwrap();
//!
//! assert_eq!(person.string_value("firstname").as_deref(), Some("Darth"));
//! assert_eq!(person.long_value("born"), Some(41));
//! assert!(person.required_boolean("sith").is_err());
//!
//! let reply = JsonObject::new()
//!     .with_value("name", "Luke")
//!     .with_value("tags", vec!["jedi", "pilot"]);
//! assert_eq!(
//!     reply.to_json_string().unwrap(),
//!     r#"{"name":"Luke","tags":["jedi","pilot"]}"#
//! );
//! ```
//!
//! ### Building Trees with the json! Macro
//!
//! ```rust
//! use jsonbuddy::json;
//!
//! let doc = json!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "json"],
//!     "manager": null
//! });
//!
//! let obj = doc.as_object().unwrap();
//! assert_eq!(obj.required_long("age").unwrap(), 30);
//! assert_eq!(obj.required_string("manager").unwrap(), None);
//! ```
//!
//! ## Round Trips
//!
//! Serializing then parsing gives back a structurally equal tree, and the
//! canonical text is stable:
//!
//! ```rust
//! use jsonbuddy::{json, parse, to_string};
//!
//! let tree = json!({"a": [1, 2.5, "x", true, null], "b": {}});
//! let text = to_string(&tree).unwrap();
//! let back = parse(&text).unwrap();
//! assert_eq!(back, tree);
//! assert_eq!(to_string(&back).unwrap(), text);
//! ```
//!
//! ## Logging
//!
//! Parsing and serialization emit `tracing` events under the
//! `jsonbuddy::parser` and `jsonbuddy::ser` targets. The library never
//! installs a subscriber.

pub mod array;
pub mod coerce;
pub mod error;
pub mod macros;
pub mod node;
pub mod object;
pub mod options;
pub mod parser;
pub mod ser;

pub use array::JsonArray;
pub use error::{Error, Result};
pub use node::{JsonNode, NodeType};
pub use object::JsonObject;
pub use options::ParseOptions;
pub use parser::Parser;
pub use ser::Serializer;

use std::io;

/// Parse a JSON document into a tree.
///
/// # Examples
///
/// ```rust
/// use jsonbuddy::parse;
///
/// let node = parse(r#"["one","two","three"]"#).unwrap();
/// let words: Vec<_> = node.as_array().unwrap().strings().collect();
/// assert_eq!(words, vec!["one", "two", "three"]);
///
/// assert!(parse("").is_err());
/// assert!(parse("{").is_err());
/// assert!(parse("[1,]").is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] if the input is not exactly one valid JSON value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(input: &str) -> Result<JsonNode> {
    parse_with_options(input, ParseOptions::default())
}

/// Parse a JSON document with custom options.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the input is not exactly one valid JSON value
/// or nests deeper than `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<JsonNode> {
    let node = Parser::new(input, options).parse()?;
    tracing::debug!(
        target: "jsonbuddy::parser",
        bytes = input.len(),
        root = %node.node_type(),
        "parsed document"
    );
    Ok(node)
}

/// Parse a JSON document from bytes, which must be UTF-8.
///
/// # Examples
///
/// ```rust
/// use jsonbuddy::parse_slice;
///
/// let node = parse_slice(br#"{"a":true}"#).unwrap();
/// assert_eq!(node.as_object().unwrap().boolean_value("a"), Some(true));
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] if the bytes are not valid UTF-8 or not valid JSON.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice(input: &[u8]) -> Result<JsonNode> {
    match std::str::from_utf8(input) {
        Ok(text) => parse(text),
        Err(e) => {
            let offset = e.valid_up_to();
            let (line, col) = parser::locate(&input[..offset]);
            Err(Error::parse(line, col, offset, "invalid UTF-8 in input"))
        }
    }
}

/// Parse a JSON document read from an I/O stream.
///
/// The reader is read to its end but not closed; pass `&mut reader` to keep
/// using it afterwards.
///
/// # Examples
///
/// ```rust
/// use jsonbuddy::parse_reader;
/// use std::io::Cursor;
///
/// let node = parse_reader(Cursor::new(b"[1, 2]")).unwrap();
/// assert_eq!(node.as_array().unwrap().len(), 2);
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails and [`Error::Parse`] if the
/// content is not valid UTF-8 JSON.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader<R>(mut reader: R) -> Result<JsonNode>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_slice(&bytes)
}

/// Render a tree as canonical JSON text.
///
/// # Examples
///
/// ```rust
/// use jsonbuddy::{to_string, JsonArray};
///
/// let arr = JsonArray::new().add(1).add("two").add(3.0);
/// assert_eq!(to_string(&arr.into()).unwrap(), r#"[1,"two",3.0]"#);
/// ```
///
/// # Errors
///
/// Returns [`Error::Serialization`] if the tree holds a NaN or infinite double.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(node: &JsonNode) -> Result<String> {
    let mut buffer = Vec::with_capacity(128);
    to_writer(&mut buffer, node)?;
    String::from_utf8(buffer).map_err(Error::custom)
}

/// Stream the canonical JSON text of a tree to a writer.
///
/// Output is written as the tree is walked. The writer is neither flushed
/// nor closed.
///
/// # Examples
///
/// ```rust
/// use jsonbuddy::{json, to_writer};
///
/// let mut out = Vec::new();
/// to_writer(&mut out, &json!({"ok": true})).unwrap();
/// assert_eq!(out, br#"{"ok":true}"#);
/// ```
///
/// # Errors
///
/// Returns [`Error::Serialization`] if the tree holds a NaN or infinite
/// double and [`Error::Io`] if writing fails. Output written before the
/// failure is left in the writer.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, node: &JsonNode) -> Result<()>
where
    W: io::Write,
{
    let mut serializer = Serializer::new(writer);
    serializer.write_node(node)?;
    serializer.log_finished(node.node_type());
    Ok(())
}
