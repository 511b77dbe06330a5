//! JSON objects and their typed accessors.
//!
//! [`JsonObject`] wraps an [`IndexMap`] so that keys serialize in insertion
//! order, which keeps output deterministic. Equality and hashing ignore that
//! order.
//!
//! Every typed accessor comes in two forms:
//!
//! - `x_value(key)` returns `None` when the key is missing or holds a node of
//!   the wrong type;
//! - `required_x(key)` returns [`Error::ValueNotPresent`] naming the key in
//!   the same situations.
//!
//! See [`crate::coerce`] for which node types each accessor accepts.
//!
//! ## Examples
//!
//! ```rust
//! use jsonbuddy::JsonObject;
//!
//! let person = JsonObject::new()
//!     .with_value("name", "Darth Vader")
//!     .with_value("age", "45")
//!     .with_value("sith", true);
//!
//! assert_eq!(person.string_value("name").as_deref(), Some("Darth Vader"));
//! assert_eq!(person.long_value("age"), Some(45));
//! assert_eq!(person.boolean_value("missing"), None);
//! assert!(person.required_boolean("sith").unwrap());
//! ```

use crate::coerce;
use crate::{Error, JsonArray, JsonNode, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A JSON object: unique string keys mapped to nodes, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct JsonObject {
    values: IndexMap<String, JsonNode>,
}

impl JsonObject {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        JsonObject {
            values: IndexMap::new(),
        }
    }

    /// Creates an empty object with room for `capacity` keys.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        JsonObject {
            values: IndexMap::with_capacity(capacity),
        }
    }

    /// Sets `key` to `value`, replacing any earlier value, and returns the
    /// object for chaining.
    ///
    /// Accepts anything convertible into a [`JsonNode`]: strings, integers,
    /// floats, booleans, `DateTime<Utc>`, `Option`s (None becomes null),
    /// vectors (become arrays) and other nodes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbuddy::JsonObject;
    ///
    /// let obj = JsonObject::new()
    ///     .with_value("tags", vec!["a", "b"])
    ///     .with_value("tags", "replaced");
    /// assert_eq!(obj.string_value("tags").as_deref(), Some("replaced"));
    /// ```
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<JsonNode>) -> Self {
        self.insert(key, value);
        self
    }

    /// Stores the display form of `value` (typically an enum) as text.
    #[must_use]
    pub fn with_enum_value<E: fmt::Display>(self, key: impl Into<String>, value: E) -> Self {
        self.with_value(key, value.to_string())
    }

    /// Sets `key` to `value` in place; returns the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonNode>) -> Option<JsonNode> {
        self.values.insert(key.into(), value.into())
    }

    /// Removes `key` and returns the value it held, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbuddy::{JsonNode, JsonObject};
    ///
    /// let mut obj = JsonObject::new().with_value("a", 1);
    /// assert_eq!(obj.remove_value("a"), Some(JsonNode::Long(1)));
    /// assert_eq!(obj.remove_value("a"), None);
    /// assert!(obj.is_empty());
    /// ```
    pub fn remove_value(&mut self, key: &str) -> Option<JsonNode> {
        self.values.shift_remove(key)
    }

    /// Returns the raw node stored under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&JsonNode> {
        self.values.get(key)
    }

    pub fn value_mut(&mut self, key: &str) -> Option<&mut JsonNode> {
        self.values.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Textual form of the simple value under `key`.
    ///
    /// Null, objects and arrays yield `None`.
    #[must_use]
    pub fn string_value(&self, key: &str) -> Option<Cow<'_, str>> {
        self.value(key).and_then(coerce::simple_text)
    }

    /// The long under `key`, or text under `key` that parses as one.
    #[must_use]
    pub fn long_value(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(coerce::lenient_long)
    }

    /// The double under `key`; longs widen and numeric text is parsed.
    #[must_use]
    pub fn double_value(&self, key: &str) -> Option<f64> {
        self.value(key).and_then(coerce::lenient_double)
    }

    #[must_use]
    pub fn boolean_value(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(JsonNode::as_bool)
    }

    #[must_use]
    pub fn object_value(&self, key: &str) -> Option<&JsonObject> {
        self.value(key).and_then(JsonNode::as_object)
    }

    pub fn object_value_mut(&mut self, key: &str) -> Option<&mut JsonObject> {
        self.value_mut(key).and_then(JsonNode::as_object_mut)
    }

    #[must_use]
    pub fn array_value(&self, key: &str) -> Option<&JsonArray> {
        self.value(key).and_then(JsonNode::as_array)
    }

    pub fn array_value_mut(&mut self, key: &str) -> Option<&mut JsonArray> {
        self.value_mut(key).and_then(JsonNode::as_array_mut)
    }

    /// The instant under `key`, or ISO-8601 text under `key`.
    ///
    /// A missing key or a node of another type gives `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInstant`] if the key holds text that is not a
    /// valid ISO-8601 timestamp.
    pub fn instant_value(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        match self.value(key) {
            Some(node) => coerce::lenient_instant(node),
            None => Ok(None),
        }
    }

    /// Like [`string_value`](Self::string_value), but a missing key is an
    /// error.
    ///
    /// An explicit null is an acceptable answer here and yields `Ok(None)`;
    /// every other `required_*` accessor treats null as missing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbuddy::{JsonNode, JsonObject};
    ///
    /// let obj = JsonObject::new().with_value("x", JsonNode::Null);
    /// assert_eq!(obj.required_string("x").unwrap(), None);
    /// assert!(obj.required_string("y").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] if the key is missing or holds an
    /// object or array.
    pub fn required_string(&self, key: &str) -> Result<Option<Cow<'_, str>>> {
        match self.value(key) {
            Some(JsonNode::Null) => Ok(None),
            Some(node) => coerce::simple_text(node)
                .map(Some)
                .ok_or_else(|| Error::value_not_present(key)),
            None => Err(Error::value_not_present(key)),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] unless [`long_value`](Self::long_value) finds a value.
    pub fn required_long(&self, key: &str) -> Result<i64> {
        self.long_value(key)
            .ok_or_else(|| Error::value_not_present(key))
    }

    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] unless [`double_value`](Self::double_value) finds a value.
    pub fn required_double(&self, key: &str) -> Result<f64> {
        self.double_value(key)
            .ok_or_else(|| Error::value_not_present(key))
    }

    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] unless the key holds a boolean.
    pub fn required_boolean(&self, key: &str) -> Result<bool> {
        self.boolean_value(key)
            .ok_or_else(|| Error::value_not_present(key))
    }

    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] unless the key holds an object.
    pub fn required_object(&self, key: &str) -> Result<&JsonObject> {
        self.object_value(key)
            .ok_or_else(|| Error::value_not_present(key))
    }

    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] unless the key holds an array.
    pub fn required_array(&self, key: &str) -> Result<&JsonArray> {
        self.array_value(key)
            .ok_or_else(|| Error::value_not_present(key))
    }

    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] unless the key holds an instant or
    /// text, and [`Error::InvalidInstant`] if that text is not ISO-8601.
    pub fn required_instant(&self, key: &str) -> Result<DateTime<Utc>> {
        self.instant_value(key)?
            .ok_or_else(|| Error::value_not_present(key))
    }

    /// Returns a fully independent copy of this object.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        self.clone()
    }

    /// Writes the canonical JSON text of this object to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for non-finite doubles and
    /// [`Error::Io`] if the writer fails.
    pub fn to_json<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut serializer = crate::Serializer::new(writer);
        serializer.write_object(self)?;
        serializer.log_finished(crate::NodeType::Object);
        Ok(())
    }

    /// Renders the canonical JSON text of this object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for non-finite doubles.
    pub fn to_json_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.to_json(&mut buffer)?;
        String::from_utf8(buffer).map_err(Error::custom)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, JsonNode> {
        self.values.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, JsonNode> {
        self.values.values()
    }

    /// Returns an iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, JsonNode> {
        self.values.iter()
    }
}

impl PartialEq for JsonObject {
    fn eq(&self, other: &Self) -> bool {
        // IndexMap equality is order-insensitive.
        self.values == other.values
    }
}

impl Eq for JsonObject {}

impl Hash for JsonObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut combined: u64 = 0;
        for (key, value) in &self.values {
            let mut entry = DefaultHasher::new();
            key.hash(&mut entry);
            value.hash(&mut entry);
            combined = combined.wrapping_add(entry.finish());
        }
        self.values.len().hash(state);
        combined.hash(state);
    }
}

impl Serialize for JsonObject {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for JsonObject {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match JsonNode::deserialize(deserializer)? {
            JsonNode::Object(obj) => Ok(obj),
            other => Err(serde::de::Error::custom(format!(
                "expected object, found {}",
                other.node_type()
            ))),
        }
    }
}

impl<'a> IntoIterator for &'a JsonObject {
    type Item = (&'a String, &'a JsonNode);
    type IntoIter = indexmap::map::Iter<'a, String, JsonNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for JsonObject {
    type Item = (String, JsonNode);
    type IntoIter = indexmap::map::IntoIter<String, JsonNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<K: Into<String>, V: Into<JsonNode>> FromIterator<(K, V)> for JsonObject {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        JsonObject {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<JsonNode>> Extend<(K, V)> for JsonObject {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug)]
    enum Side {
        Dark,
    }

    impl fmt::Display for Side {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Side::Dark => f.write_str("DARK"),
            }
        }
    }

    #[test]
    fn test_with_value_upserts() {
        let obj = JsonObject::new()
            .with_value("a", 1)
            .with_value("b", "two")
            .with_value("a", 3);
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.long_value("a"), Some(3));
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_with_value_leaf_kinds() {
        let instant = Utc.with_ymd_and_hms(2001, 9, 9, 1, 46, 40).unwrap();
        let obj = JsonObject::new()
            .with_value("text", "t")
            .with_value("long", 5i64)
            .with_value("double", 2.5)
            .with_value("flag", false)
            .with_value("when", instant)
            .with_enum_value("side", Side::Dark)
            .with_value("list", vec!["x".to_string(), "y".to_string()]);

        assert!(obj.value("text").unwrap().is_text());
        assert!(obj.value("long").unwrap().is_long());
        assert!(obj.value("double").unwrap().is_double());
        assert!(obj.value("flag").unwrap().is_boolean());
        assert!(obj.value("when").unwrap().is_instant());
        assert_eq!(obj.string_value("side").as_deref(), Some("DARK"));
        assert_eq!(obj.required_array("list").unwrap().len(), 2);
    }

    #[test]
    fn test_string_value_stringifies_simple_leaves() {
        let obj = JsonObject::new()
            .with_value("n", 42)
            .with_value("b", true)
            .with_value("z", JsonNode::Null)
            .with_value("o", JsonObject::new());
        assert_eq!(obj.string_value("n").as_deref(), Some("42"));
        assert_eq!(obj.string_value("b").as_deref(), Some("true"));
        assert_eq!(obj.string_value("z"), None);
        assert_eq!(obj.string_value("o"), None);
        assert_eq!(obj.string_value("missing"), None);
    }

    #[test]
    fn test_lenient_long() {
        let obj = JsonObject::new().with_value("n", "42").with_value("s", "abc");
        assert_eq!(obj.long_value("n"), Some(42));
        assert_eq!(obj.long_value("s"), None);
        // stored representation is untouched
        assert!(obj.value("n").unwrap().is_text());
    }

    #[test]
    fn test_boolean_has_no_text_coercion() {
        let obj = JsonObject::new().with_value("b", "true");
        assert_eq!(obj.boolean_value("b"), None);
        assert!(obj.required_boolean("b").unwrap_err().is_value_not_present());
    }

    #[test]
    fn test_required_string_null_versus_absent() {
        let obj = JsonObject::new().with_value("x", JsonNode::Null);
        assert_eq!(obj.required_string("x").unwrap(), None);

        let err = JsonObject::new().required_string("x").unwrap_err();
        assert!(matches!(err, Error::ValueNotPresent { ref key } if key == "x"));
    }

    #[test]
    fn test_other_required_accessors_reject_null() {
        let obj = JsonObject::new().with_value("x", JsonNode::Null);
        assert!(obj.required_long("x").is_err());
        assert!(obj.required_double("x").is_err());
        assert!(obj.required_boolean("x").is_err());
        assert!(obj.required_object("x").is_err());
        assert!(obj.required_array("x").is_err());
        assert!(obj.required_instant("x").is_err());
    }

    #[test]
    fn test_required_type_mismatch_is_value_not_present() {
        let obj = JsonObject::new().with_value("o", JsonObject::new());
        match obj.required_array("o") {
            Err(Error::ValueNotPresent { key }) => assert_eq!(key, "o"),
            other => panic!("expected ValueNotPresent, got {:?}", other),
        }
        assert!(obj.required_string("o").is_err());
    }

    #[test]
    fn test_instant_asymmetry() {
        let obj = JsonObject::new()
            .with_value("good", "2015-01-01T12:00:00Z")
            .with_value("bad", "noon")
            .with_value("num", 7);

        let expected = Utc.with_ymd_and_hms(2015, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(obj.instant_value("good").unwrap(), Some(expected));
        assert_eq!(obj.required_instant("good").unwrap(), expected);

        assert_eq!(obj.instant_value("num").unwrap(), None);
        assert_eq!(obj.instant_value("missing").unwrap(), None);
        assert!(obj.required_instant("num").unwrap_err().is_value_not_present());

        assert!(matches!(obj.instant_value("bad"), Err(Error::InvalidInstant { .. })));
        assert!(matches!(obj.required_instant("bad"), Err(Error::InvalidInstant { .. })));
    }

    #[test]
    fn test_remove_value() {
        let mut obj = JsonObject::new().with_value("a", 1).with_value("b", 2);
        assert_eq!(obj.remove_value("a"), Some(JsonNode::Long(1)));
        assert_eq!(obj.remove_value("nope"), None);
        assert!(!obj.contains_key("a"));
        assert_eq!(obj.len(), 1);
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let original = JsonObject::new()
            .with_value("inner", JsonObject::new().with_value("list", vec![1, 2]));
        let mut copy = original.deep_clone();

        copy.object_value_mut("inner")
            .and_then(|inner| inner.array_value_mut("list"))
            .unwrap()
            .push(3);

        let original_list = original.required_object("inner").unwrap().required_array("list").unwrap();
        assert_eq!(original_list.len(), 2);
        assert_ne!(original, copy);
    }

    #[test]
    fn test_equality_ignores_key_order() {
        let a = JsonObject::new().with_value("x", 1).with_value("y", 2);
        let b = JsonObject::new().with_value("y", 2).with_value("x", 1);
        assert_eq!(a, b);
        assert_ne!(a, JsonObject::new().with_value("x", 1));
    }

    #[test]
    fn test_from_iterator_keeps_last_duplicate() {
        let obj: JsonObject = vec![("k", 1), ("k", 2)].into_iter().collect();
        assert_eq!(obj.long_value("k"), Some(2));
    }

    #[test]
    fn test_to_json_string() {
        let obj = JsonObject::new().with_value("a", 1).with_value("b", vec!["c"]);
        assert_eq!(obj.to_json_string().unwrap(), r#"{"a":1,"b":["c"]}"#);
    }
}
