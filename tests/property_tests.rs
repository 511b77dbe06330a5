//! Property-based tests for the parse/serialize round trip.
//!
//! Trees are generated recursively with every node kind, finite doubles only,
//! and arbitrary text including control characters and astral code points.

use chrono::{TimeZone, Utc};
use jsonbuddy::{parse, to_string, JsonArray, JsonNode, JsonObject};
use proptest::prelude::*;

fn arb_leaf() -> impl Strategy<Value = JsonNode> {
    prop_oneof![
        Just(JsonNode::Null),
        any::<bool>().prop_map(JsonNode::Boolean),
        any::<i64>().prop_map(JsonNode::Long),
        any::<f64>()
            .prop_filter("finite", |d| d.is_finite())
            .prop_map(JsonNode::Double),
        any::<String>().prop_map(JsonNode::Text),
        (-62_167_219_200_000i64..3_093_527_980_800_000i64)
            .prop_map(|millis| JsonNode::Instant(Utc.timestamp_millis_opt(millis).unwrap())),
    ]
}

fn arb_node() -> impl Strategy<Value = JsonNode> {
    arb_leaf().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8)
                .prop_map(|values| JsonNode::Array(values.into_iter().collect::<JsonArray>())),
            prop::collection::vec((any::<String>(), inner), 0..8)
                .prop_map(|entries| JsonNode::Object(entries.into_iter().collect::<JsonObject>())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_round_trip(node in arb_node()) {
        let text = to_string(&node).unwrap();
        let back = parse(&text).unwrap();
        prop_assert_eq!(back, node);
    }

    #[test]
    fn prop_canonical_text_is_stable(node in arb_node()) {
        let once = to_string(&node).unwrap();
        let twice = to_string(&parse(&once).unwrap()).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_output_is_valid_json(node in arb_node()) {
        let text = to_string(&node).unwrap();
        prop_assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
    }

    #[test]
    fn prop_instants_read_back(millis in -62_167_219_200_000i64..3_093_527_980_800_000i64) {
        let at = Utc.timestamp_millis_opt(millis).unwrap();
        let text = JsonObject::new().with_value("at", at).to_json_string().unwrap();
        let back = parse(&text).unwrap();
        prop_assert_eq!(back.as_object().unwrap().required_instant("at").unwrap(), at);
    }

    #[test]
    fn prop_longs_read_from_text(n in any::<i64>()) {
        let obj = JsonObject::new().with_value("n", n.to_string());
        prop_assert_eq!(obj.long_value("n"), Some(n));
    }

    #[test]
    fn prop_doubles_round_trip_exactly(d in any::<f64>().prop_filter("finite", |d| d.is_finite())) {
        let text = to_string(&JsonNode::Double(d)).unwrap();
        prop_assert_eq!(parse(&text).unwrap(), JsonNode::Double(d));
    }

    #[test]
    fn prop_arbitrary_text_never_panics(input in ".{0,64}") {
        let _ = parse(&input);
    }
}
