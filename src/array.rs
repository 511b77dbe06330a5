//! JSON arrays.
//!
//! [`JsonArray`] mirrors the typed accessors of [`JsonObject`](crate::JsonObject)
//! with element indices in place of keys. A failed `required_*` lookup reports
//! the index as the missing key.
//!
//! ```rust
//! use jsonbuddy::JsonArray;
//!
//! let arr = JsonArray::from_strings(["one", "two", "three"]);
//! let words: Vec<_> = arr.strings().collect();
//! assert_eq!(words, vec!["one", "two", "three"]);
//! assert_eq!(arr.long_value(0), None);
//! ```

use crate::coerce;
use crate::{Error, JsonNode, JsonObject, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;

/// An ordered sequence of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonArray {
    values: Vec<JsonNode>,
}

impl JsonArray {
    #[must_use]
    pub fn new() -> Self {
        JsonArray { values: Vec::new() }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        JsonArray {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Builds an array of text nodes.
    #[must_use]
    pub fn from_strings<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        strings.into_iter().map(|s| JsonNode::Text(s.into())).collect()
    }

    /// Appends `value` and returns the array for chaining.
    #[must_use]
    pub fn add(mut self, value: impl Into<JsonNode>) -> Self {
        self.push(value);
        self
    }

    /// Appends every item of `values` and returns the array for chaining.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbuddy::JsonArray;
    ///
    /// let arr = JsonArray::new().add(1).add_all(vec!["a", "b"]);
    /// assert_eq!(arr.len(), 3);
    /// assert_eq!(arr.string_value(2).as_deref(), Some("b"));
    /// ```
    #[must_use]
    pub fn add_all<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<JsonNode>,
    {
        self.extend(values);
        self
    }

    pub fn push(&mut self, value: impl Into<JsonNode>) {
        self.values.push(value.into());
    }

    /// Removes and returns the element at `index`, shifting later elements.
    pub fn remove(&mut self, index: usize) -> Option<JsonNode> {
        (index < self.values.len()).then(|| self.values.remove(index))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&JsonNode> {
        self.values.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut JsonNode> {
        self.values.get_mut(index)
    }

    #[must_use]
    pub fn string_value(&self, index: usize) -> Option<Cow<'_, str>> {
        self.get(index).and_then(coerce::simple_text)
    }

    #[must_use]
    pub fn long_value(&self, index: usize) -> Option<i64> {
        self.get(index).and_then(coerce::lenient_long)
    }

    #[must_use]
    pub fn double_value(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(coerce::lenient_double)
    }

    #[must_use]
    pub fn boolean_value(&self, index: usize) -> Option<bool> {
        self.get(index).and_then(JsonNode::as_bool)
    }

    #[must_use]
    pub fn object_value(&self, index: usize) -> Option<&JsonObject> {
        self.get(index).and_then(JsonNode::as_object)
    }

    pub fn object_value_mut(&mut self, index: usize) -> Option<&mut JsonObject> {
        self.get_mut(index).and_then(JsonNode::as_object_mut)
    }

    #[must_use]
    pub fn array_value(&self, index: usize) -> Option<&JsonArray> {
        self.get(index).and_then(JsonNode::as_array)
    }

    pub fn array_value_mut(&mut self, index: usize) -> Option<&mut JsonArray> {
        self.get_mut(index).and_then(JsonNode::as_array_mut)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidInstant`] if the element is text that is not
    /// ISO-8601.
    pub fn instant_value(&self, index: usize) -> Result<Option<DateTime<Utc>>> {
        match self.get(index) {
            Some(node) => coerce::lenient_instant(node),
            None => Ok(None),
        }
    }

    /// Null elements yield `Ok(None)`, as with
    /// [`JsonObject::required_string`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] if the index is out of bounds or
    /// the element is a container.
    pub fn required_string(&self, index: usize) -> Result<Option<Cow<'_, str>>> {
        match self.get(index) {
            Some(JsonNode::Null) => Ok(None),
            Some(node) => coerce::simple_text(node)
                .map(Some)
                .ok_or_else(|| missing(index)),
            None => Err(missing(index)),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] unless [`long_value`](Self::long_value) finds a value.
    pub fn required_long(&self, index: usize) -> Result<i64> {
        self.long_value(index).ok_or_else(|| missing(index))
    }

    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] unless [`double_value`](Self::double_value) finds a value.
    pub fn required_double(&self, index: usize) -> Result<f64> {
        self.double_value(index).ok_or_else(|| missing(index))
    }

    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] unless the element is a boolean.
    pub fn required_boolean(&self, index: usize) -> Result<bool> {
        self.boolean_value(index).ok_or_else(|| missing(index))
    }

    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] unless the element is an object.
    pub fn required_object(&self, index: usize) -> Result<&JsonObject> {
        self.object_value(index).ok_or_else(|| missing(index))
    }

    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] unless the element is an array.
    pub fn required_array(&self, index: usize) -> Result<&JsonArray> {
        self.array_value(index).ok_or_else(|| missing(index))
    }

    /// # Errors
    ///
    /// Returns [`Error::ValueNotPresent`] unless the element is an instant or
    /// text, and [`Error::InvalidInstant`] if that text is not ISO-8601.
    pub fn required_instant(&self, index: usize) -> Result<DateTime<Utc>> {
        self.instant_value(index)?.ok_or_else(|| missing(index))
    }

    /// Iterates the textual form of every simple, non-null element,
    /// skipping the rest.
    pub fn strings(&self) -> impl Iterator<Item = Cow<'_, str>> + '_ {
        self.values.iter().filter_map(coerce::simple_text)
    }

    /// Iterates every object element, skipping the rest.
    pub fn objects(&self) -> impl Iterator<Item = &JsonObject> + '_ {
        self.values.iter().filter_map(JsonNode::as_object)
    }

    /// Returns a fully independent copy of this array.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        self.clone()
    }

    /// Writes the canonical JSON text of this array to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for non-finite doubles and
    /// [`Error::Io`] if the writer fails.
    pub fn to_json<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut serializer = crate::Serializer::new(writer);
        serializer.write_array(self)?;
        serializer.log_finished(crate::NodeType::Array);
        Ok(())
    }

    /// Renders the canonical JSON text of this array.
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

    pub fn iter(&self) -> std::slice::Iter<'_, JsonNode> {
        self.values.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, JsonNode> {
        self.values.iter_mut()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[JsonNode] {
        &self.values
    }
}

fn missing(index: usize) -> Error {
    Error::value_not_present(index.to_string())
}

impl Serialize for JsonArray {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self.iter() {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for JsonArray {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match JsonNode::deserialize(deserializer)? {
            JsonNode::Array(arr) => Ok(arr),
            other => Err(serde::de::Error::custom(format!(
                "expected array, found {}",
                other.node_type()
            ))),
        }
    }
}

impl<'a> IntoIterator for &'a JsonArray {
    type Item = &'a JsonNode;
    type IntoIter = std::slice::Iter<'a, JsonNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for JsonArray {
    type Item = JsonNode;
    type IntoIter = std::vec::IntoIter<JsonNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<V: Into<JsonNode>> FromIterator<V> for JsonArray {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        JsonArray {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<V: Into<JsonNode>> Extend<V> for JsonArray {
    fn extend<T: IntoIterator<Item = V>>(&mut self, iter: T) {
        self.values.extend(iter.into_iter().map(Into::into));
    }
}

impl std::ops::Index<usize> for JsonArray {
    type Output = JsonNode;

    fn index(&self, index: usize) -> &JsonNode {
        &self.values[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_index() {
        let arr = JsonArray::new().add("a").add(2).add(JsonNode::Null);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr[0], JsonNode::from("a"));
        assert_eq!(arr.long_value(1), Some(2));
        assert!(arr[2].is_null());
        assert_eq!(arr.get(3), None);
    }

    #[test]
    fn test_required_accessors_report_index() {
        let arr = JsonArray::new().add("x");
        match arr.required_long(0) {
            Err(Error::ValueNotPresent { key }) => assert_eq!(key, "0"),
            other => panic!("expected ValueNotPresent, got {:?}", other),
        }
        match arr.required_object(5) {
            Err(Error::ValueNotPresent { key }) => assert_eq!(key, "5"),
            other => panic!("expected ValueNotPresent, got {:?}", other),
        }
    }

    #[test]
    fn test_required_string_null_element() {
        let arr = JsonArray::new().add(JsonNode::Null).add(JsonArray::new());
        assert_eq!(arr.required_string(0).unwrap(), None);
        assert!(arr.required_string(1).is_err());
        assert!(arr.required_string(2).is_err());
    }

    #[test]
    fn test_lenient_accessors_per_element() {
        let arr = JsonArray::from_strings(["7", "2020-01-01T00:00:00Z", "bad"]);
        assert_eq!(arr.long_value(0), Some(7));
        assert_eq!(arr.double_value(0), Some(7.0));
        assert!(arr.instant_value(1).unwrap().is_some());
        assert!(arr.instant_value(2).is_err());
        assert_eq!(arr.instant_value(9).unwrap(), None);
    }

    #[test]
    fn test_strings_and_objects_filters() {
        let arr = JsonArray::new()
            .add("a")
            .add(JsonObject::new().with_value("k", 1))
            .add(3)
            .add(JsonNode::Null);
        assert_eq!(arr.strings().collect::<Vec<_>>(), vec!["a", "3"]);
        assert_eq!(arr.objects().count(), 1);
    }

    #[test]
    fn test_order_matters_for_equality() {
        let a = JsonArray::new().add(1).add(2);
        let b = JsonArray::new().add(2).add(1);
        assert_ne!(a, b);
        assert_eq!(a, JsonArray::new().add_all(vec![1, 2]));
    }

    #[test]
    fn test_remove() {
        let mut arr = JsonArray::new().add(1).add(2).add(3);
        assert_eq!(arr.remove(1), Some(JsonNode::Long(2)));
        assert_eq!(arr.remove(7), None);
        assert_eq!(arr.to_json_string().unwrap(), "[1,3]");
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let original = JsonArray::new().add(JsonArray::new().add("x"));
        let mut copy = original.deep_clone();
        copy.array_value_mut(0).unwrap().push("y");

        assert_eq!(original.required_array(0).unwrap().len(), 1);
        assert_eq!(copy.required_array(0).unwrap().len(), 2);
    }
}
