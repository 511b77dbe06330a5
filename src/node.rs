//! Dynamic representation of any JSON value.
//!
//! [`JsonNode`] is the closed set of node kinds a document tree is made of:
//! two containers ([`JsonObject`], [`JsonArray`]) and the simple leaves
//! (text, long, double, boolean, instant, null).
//!
//! ## Creating Values
//!
//! ```rust
//! use jsonbuddy::{json, JsonNode};
//!
//! let text = JsonNode::from("hello");
//! let long = JsonNode::from(42);
//! let list = JsonNode::from(vec!["a", "b"]);
//!
//! let doc = json!({
//!     "name": "Darth",
//!     "tags": ["sith", "lord"]
//! });
//! assert!(doc.is_object());
//! ```
//!
//! ## Equality
//!
//! Equality and hashing are structural. Object key order does not matter,
//! array order does, doubles compare by bit pattern, and an instant equals the
//! text node holding its canonical ISO-8601 rendering (which is what it turns
//! into after a serialize/parse round trip).

use crate::coerce::{self, format_instant};
use crate::{Error, JsonArray, JsonObject, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A node in a JSON document tree.
///
/// # Examples
///
/// ```rust
/// use jsonbuddy::{JsonNode, NodeType};
///
/// let null = JsonNode::Null;
/// let num = JsonNode::Long(42);
/// let text = JsonNode::Text("hello".to_string());
///
/// assert!(null.is_null());
/// assert_eq!(num.node_type(), NodeType::Long);
/// assert!(text.is_simple_value());
/// ```
#[derive(Clone, Debug, Default)]
pub enum JsonNode {
    Object(JsonObject),
    Array(JsonArray),
    Text(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Instant(DateTime<Utc>),
    #[default]
    Null,
}

/// Tag naming the kind of a [`JsonNode`], for diagnostics and dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Object,
    Array,
    Text,
    Long,
    Double,
    Boolean,
    Instant,
    Null,
}

impl NodeType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            NodeType::Object => "object",
            NodeType::Array => "array",
            NodeType::Text => "text",
            NodeType::Long => "long",
            NodeType::Double => "double",
            NodeType::Boolean => "boolean",
            NodeType::Instant => "instant",
            NodeType::Null => "null",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonNode {
    /// Starts an empty object node.
    #[must_use]
    pub fn object() -> Self {
        JsonNode::Object(JsonObject::new())
    }

    /// Starts an empty array node.
    #[must_use]
    pub fn array() -> Self {
        JsonNode::Array(JsonArray::new())
    }

    /// Creates a text node.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        JsonNode::Text(value.into())
    }

    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self {
            JsonNode::Object(_) => NodeType::Object,
            JsonNode::Array(_) => NodeType::Array,
            JsonNode::Text(_) => NodeType::Text,
            JsonNode::Long(_) => NodeType::Long,
            JsonNode::Double(_) => NodeType::Double,
            JsonNode::Boolean(_) => NodeType::Boolean,
            JsonNode::Instant(_) => NodeType::Instant,
            JsonNode::Null => NodeType::Null,
        }
    }

    /// Returns `true` for every leaf kind, null included.
    #[inline]
    #[must_use]
    pub const fn is_simple_value(&self) -> bool {
        !matches!(self, JsonNode::Object(_) | JsonNode::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, JsonNode::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, JsonNode::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, JsonNode::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, JsonNode::Text(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_long(&self) -> bool {
        matches!(self, JsonNode::Long(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_double(&self) -> bool {
        matches!(self, JsonNode::Double(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self, JsonNode::Boolean(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_instant(&self) -> bool {
        matches!(self, JsonNode::Instant(_))
    }

    /// If the node is text, returns it. No coercion.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonNode::Text(s) => Some(s),
            _ => None,
        }
    }

    /// If the node is a long, returns it. No coercion.
    #[inline]
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            JsonNode::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// If the node is a double, returns it. No coercion.
    #[inline]
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            JsonNode::Double(d) => Some(*d),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            JsonNode::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_instant(&self) -> Option<&DateTime<Utc>> {
        match self {
            JsonNode::Instant(dt) => Some(dt),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_object(&self) -> Option<&JsonObject> {
        match self {
            JsonNode::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut JsonObject> {
        match self {
            JsonNode::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_array(&self) -> Option<&JsonArray> {
        match self {
            JsonNode::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut JsonArray> {
        match self {
            JsonNode::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Textual form of a simple value, `None` for null and containers.
    ///
    /// Text yields its content; longs, doubles, booleans and instants yield
    /// the same text they serialize to (instants without quotes).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbuddy::JsonNode;
    ///
    /// assert_eq!(JsonNode::from("one").simple_value().as_deref(), Some("one"));
    /// assert_eq!(JsonNode::from(12).simple_value().as_deref(), Some("12"));
    /// assert_eq!(JsonNode::Null.simple_value(), None);
    /// ```
    #[must_use]
    pub fn simple_value(&self) -> Option<Cow<'_, str>> {
        coerce::simple_text(self)
    }

    /// Returns a fully independent copy of this subtree.
    ///
    /// Containers own their children, so this is the same as [`Clone`]; it
    /// exists to make the intent explicit at call sites that place one
    /// subtree in two parents.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        self.clone()
    }

    /// Writes the canonical JSON text of this node to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for non-finite doubles and
    /// [`Error::Io`] if the writer fails.
    pub fn to_json<W: std::io::Write>(&self, writer: W) -> Result<()> {
        crate::to_writer(writer, self)
    }

    /// Renders the canonical JSON text of this node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for non-finite doubles.
    pub fn to_json_string(&self) -> Result<String> {
        crate::to_string(self)
    }

    /// Text an instant compares and hashes as.
    fn instant_text(&self) -> Option<String> {
        match self {
            JsonNode::Instant(dt) => Some(format_instant(dt)),
            _ => None,
        }
    }
}

impl PartialEq for JsonNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JsonNode::Object(a), JsonNode::Object(b)) => a == b,
            (JsonNode::Array(a), JsonNode::Array(b)) => a == b,
            (JsonNode::Text(a), JsonNode::Text(b)) => a == b,
            (JsonNode::Long(a), JsonNode::Long(b)) => a == b,
            (JsonNode::Double(a), JsonNode::Double(b)) => a.to_bits() == b.to_bits(),
            (JsonNode::Boolean(a), JsonNode::Boolean(b)) => a == b,
            (JsonNode::Instant(a), JsonNode::Instant(b)) => a == b,
            (JsonNode::Instant(_), JsonNode::Text(text)) => {
                self.instant_text().as_deref() == Some(text.as_str())
            }
            (JsonNode::Text(text), JsonNode::Instant(_)) => {
                other.instant_text().as_deref() == Some(text.as_str())
            }
            (JsonNode::Null, JsonNode::Null) => true,
            _ => false,
        }
    }
}

impl Eq for JsonNode {}

impl Hash for JsonNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Instants hash as their text so Instant == Text stays consistent.
        match self {
            JsonNode::Object(obj) => {
                0u8.hash(state);
                obj.hash(state);
            }
            JsonNode::Array(arr) => {
                1u8.hash(state);
                arr.hash(state);
            }
            JsonNode::Text(s) => {
                2u8.hash(state);
                s.hash(state);
            }
            JsonNode::Instant(dt) => {
                2u8.hash(state);
                format_instant(dt).hash(state);
            }
            JsonNode::Long(l) => {
                3u8.hash(state);
                l.hash(state);
            }
            JsonNode::Double(d) => {
                4u8.hash(state);
                d.to_bits().hash(state);
            }
            JsonNode::Boolean(b) => {
                5u8.hash(state);
                b.hash(state);
            }
            JsonNode::Null => 6u8.hash(state),
        }
    }
}

impl Serialize for JsonNode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            JsonNode::Null => serializer.serialize_unit(),
            JsonNode::Boolean(b) => serializer.serialize_bool(*b),
            JsonNode::Long(l) => serializer.serialize_i64(*l),
            JsonNode::Double(d) => serializer.serialize_f64(*d),
            JsonNode::Text(s) => serializer.serialize_str(s),
            JsonNode::Instant(dt) => serializer.serialize_str(&format_instant(dt)),
            JsonNode::Array(arr) => arr.serialize(serializer),
            JsonNode::Object(obj) => obj.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for JsonNode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct JsonNodeVisitor;

        impl<'de> Visitor<'de> for JsonNodeVisitor {
            type Value = JsonNode;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid JSON value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E> {
                Ok(JsonNode::Boolean(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E> {
                Ok(JsonNode::Long(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E> {
                Ok(i64::try_from(value)
                    .map(JsonNode::Long)
                    .unwrap_or(JsonNode::Double(value as f64)))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E> {
                Ok(JsonNode::Double(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E> {
                Ok(JsonNode::Text(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E> {
                Ok(JsonNode::Text(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(JsonNode::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(JsonNode::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut array = JsonArray::new();
                while let Some(elem) = seq.next_element::<JsonNode>()? {
                    array.push(elem);
                }
                Ok(JsonNode::Array(array))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut object = JsonObject::new();
                while let Some((key, value)) = map.next_entry::<String, JsonNode>()? {
                    object.insert(key, value);
                }
                Ok(JsonNode::Object(object))
            }
        }

        deserializer.deserialize_any(JsonNodeVisitor)
    }
}

// TryFrom implementations for extracting values from JsonNode
impl TryFrom<JsonNode> for i64 {
    type Error = Error;

    fn try_from(value: JsonNode) -> Result<Self> {
        coerce::lenient_long(&value).ok_or_else(|| {
            Error::custom(format!("expected long, found {}", value.node_type()))
        })
    }
}

impl TryFrom<JsonNode> for f64 {
    type Error = Error;

    fn try_from(value: JsonNode) -> Result<Self> {
        coerce::lenient_double(&value).ok_or_else(|| {
            Error::custom(format!("expected double, found {}", value.node_type()))
        })
    }
}

impl TryFrom<JsonNode> for bool {
    type Error = Error;

    fn try_from(value: JsonNode) -> Result<Self> {
        match value {
            JsonNode::Boolean(b) => Ok(b),
            other => Err(Error::custom(format!(
                "expected boolean, found {}",
                other.node_type()
            ))),
        }
    }
}

impl TryFrom<JsonNode> for String {
    type Error = Error;

    fn try_from(value: JsonNode) -> Result<Self> {
        match value {
            JsonNode::Text(s) => Ok(s),
            other => match other.simple_value() {
                Some(text) => Ok(text.into_owned()),
                None => Err(Error::custom(format!(
                    "expected simple value, found {}",
                    other.node_type()
                ))),
            },
        }
    }
}

impl TryFrom<JsonNode> for JsonObject {
    type Error = Error;

    fn try_from(value: JsonNode) -> Result<Self> {
        match value {
            JsonNode::Object(obj) => Ok(obj),
            other => Err(Error::custom(format!(
                "expected object, found {}",
                other.node_type()
            ))),
        }
    }
}

impl TryFrom<JsonNode> for JsonArray {
    type Error = Error;

    fn try_from(value: JsonNode) -> Result<Self> {
        match value {
            JsonNode::Array(arr) => Ok(arr),
            other => Err(Error::custom(format!(
                "expected array, found {}",
                other.node_type()
            ))),
        }
    }
}

// From implementations for creating JsonNode from primitives
impl From<bool> for JsonNode {
    fn from(value: bool) -> Self {
        JsonNode::Boolean(value)
    }
}

impl From<i8> for JsonNode {
    fn from(value: i8) -> Self {
        JsonNode::Long(i64::from(value))
    }
}

impl From<i16> for JsonNode {
    fn from(value: i16) -> Self {
        JsonNode::Long(i64::from(value))
    }
}

impl From<i32> for JsonNode {
    fn from(value: i32) -> Self {
        JsonNode::Long(i64::from(value))
    }
}

impl From<i64> for JsonNode {
    fn from(value: i64) -> Self {
        JsonNode::Long(value)
    }
}

impl From<u8> for JsonNode {
    fn from(value: u8) -> Self {
        JsonNode::Long(i64::from(value))
    }
}

impl From<u16> for JsonNode {
    fn from(value: u16) -> Self {
        JsonNode::Long(i64::from(value))
    }
}

impl From<u32> for JsonNode {
    fn from(value: u32) -> Self {
        JsonNode::Long(i64::from(value))
    }
}

impl From<f32> for JsonNode {
    fn from(value: f32) -> Self {
        JsonNode::Double(f64::from(value))
    }
}

impl From<f64> for JsonNode {
    fn from(value: f64) -> Self {
        JsonNode::Double(value)
    }
}

impl From<String> for JsonNode {
    fn from(value: String) -> Self {
        JsonNode::Text(value)
    }
}

impl From<&str> for JsonNode {
    fn from(value: &str) -> Self {
        JsonNode::Text(value.to_string())
    }
}

impl From<&String> for JsonNode {
    fn from(value: &String) -> Self {
        JsonNode::Text(value.clone())
    }
}

impl From<DateTime<Utc>> for JsonNode {
    fn from(value: DateTime<Utc>) -> Self {
        JsonNode::Instant(value)
    }
}

impl From<JsonObject> for JsonNode {
    fn from(value: JsonObject) -> Self {
        JsonNode::Object(value)
    }
}

impl From<JsonArray> for JsonNode {
    fn from(value: JsonArray) -> Self {
        JsonNode::Array(value)
    }
}

impl<T: Into<JsonNode>> From<Option<T>> for JsonNode {
    fn from(value: Option<T>) -> Self {
        value.map_or(JsonNode::Null, Into::into)
    }
}

impl<T: Into<JsonNode>> From<Vec<T>> for JsonNode {
    fn from(value: Vec<T>) -> Self {
        JsonNode::Array(value.into_iter().collect())
    }
}

impl From<()> for JsonNode {
    fn from(_: ()) -> Self {
        JsonNode::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn hash_of(node: &JsonNode) -> u64 {
        let mut hasher = DefaultHasher::new();
        node.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(JsonNode::from(true), JsonNode::Boolean(true));
        assert_eq!(JsonNode::from(42i32), JsonNode::Long(42));
        assert_eq!(JsonNode::from(42u32), JsonNode::Long(42));
        assert_eq!(JsonNode::from(3.5f64), JsonNode::Double(3.5));
        assert_eq!(JsonNode::from("test"), JsonNode::Text("test".to_string()));
        assert_eq!(JsonNode::from(None::<i64>), JsonNode::Null);
        assert_eq!(JsonNode::from(Some("x")), JsonNode::text("x"));
    }

    #[test]
    fn test_from_string_list_builds_array() {
        let node = JsonNode::from(vec!["a".to_string(), "b".to_string()]);
        let arr = node.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.string_value(1).as_deref(), Some("b"));
    }

    #[test]
    fn test_tryfrom() {
        assert_eq!(i64::try_from(JsonNode::from("17")).unwrap(), 17);
        assert!(i64::try_from(JsonNode::from(1.5)).is_err());
        assert_eq!(f64::try_from(JsonNode::from(2i64)).unwrap(), 2.0);
        assert!(bool::try_from(JsonNode::from(1i64)).is_err());
        assert_eq!(String::try_from(JsonNode::from(12i64)).unwrap(), "12");
        assert!(String::try_from(JsonNode::Null).is_err());
        assert!(JsonObject::try_from(JsonNode::object()).is_ok());
        assert!(JsonArray::try_from(JsonNode::object()).is_err());
    }

    #[test]
    fn test_double_equality_is_bitwise() {
        assert_eq!(JsonNode::Double(f64::NAN), JsonNode::Double(f64::NAN));
        assert_ne!(JsonNode::Double(0.0), JsonNode::Double(-0.0));
        assert_ne!(JsonNode::Double(1.0), JsonNode::Long(1));
    }

    #[test]
    fn test_instant_equals_its_canonical_text() {
        let instant = Utc.with_ymd_and_hms(2016, 3, 4, 5, 6, 7).unwrap();
        let as_instant = JsonNode::from(instant);
        let as_text = JsonNode::from("2016-03-04T05:06:07Z");

        assert_eq!(as_instant, as_text);
        assert_eq!(as_text, as_instant);
        assert_eq!(hash_of(&as_instant), hash_of(&as_text));
        assert_ne!(as_instant, JsonNode::from("2016-03-04T05:06:07+00:00"));
    }

    #[test]
    fn test_structural_hash_dedups() {
        let a = JsonNode::from(JsonObject::new().with_value("x", 1).with_value("y", 2));
        let b = JsonNode::from(JsonObject::new().with_value("y", 2).with_value("x", 1));
        assert_eq!(a, b);

        let set: HashSet<JsonNode> = [a, b, JsonNode::Null].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_node_type_names() {
        assert_eq!(JsonNode::array().node_type().to_string(), "array");
        assert_eq!(JsonNode::Null.node_type().as_str(), "null");
        assert!(JsonNode::Null.is_simple_value());
        assert!(!JsonNode::object().is_simple_value());
    }
}
