//! The [`json!`](crate::json) macro for building trees from literals.
//!
//! ```rust
//! use jsonbuddy::{json, JsonNode};
//!
//! let doc = json!({
//!     "id": 7,
//!     "offset": (-3),
//!     "tags": ["a", "b"],
//!     "parent": null
//! });
//! assert_eq!(doc.as_object().unwrap().long_value("offset"), Some(-3));
//! ```
//!
//! Values are single token trees, so negative numbers and other compound
//! expressions go in parentheses.

#[macro_export]
macro_rules! json {
    // Handle null
    (null) => {
        $crate::JsonNode::Null
    };

    // Handle true
    (true) => {
        $crate::JsonNode::Boolean(true)
    };

    // Handle false
    (false) => {
        $crate::JsonNode::Boolean(false)
    };

    // Handle empty array
    ([]) => {
        $crate::JsonNode::Array($crate::JsonArray::new())
    };

    // Handle non-empty array
    ([ $($elem:tt),* $(,)? ]) => {{
        let mut array = $crate::JsonArray::new();
        $(
            array.push($crate::json!($elem));
        )*
        $crate::JsonNode::Array(array)
    }};

    // Handle empty object
    ({}) => {
        $crate::JsonNode::Object($crate::JsonObject::new())
    };

    // Handle non-empty object
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::JsonObject::new();
        $(
            object.insert($key, $crate::json!($value));
        )*
        $crate::JsonNode::Object(object)
    }};

    // Anything convertible into a node
    ($s:expr) => {
        $crate::JsonNode::from($s)
    };
}
