//! Walking and editing a tree whose shape is only known at runtime.
//!
//! Run with: cargo run --example dynamic_values

use chrono::Utc;
use jsonbuddy::{json, parse, JsonNode, NodeType};
use std::error::Error;

fn describe(node: &JsonNode, indent: usize) {
    let pad = " ".repeat(indent);
    match node {
        JsonNode::Object(obj) => {
            for (key, value) in obj {
                println!("{}{} ({})", pad, key, value.node_type());
                describe(value, indent + 2);
            }
        }
        JsonNode::Array(arr) => {
            for (i, value) in arr.iter().enumerate() {
                println!("{}[{}] ({})", pad, i, value.node_type());
                describe(value, indent + 2);
            }
        }
        other => {
            if let Some(text) = other.simple_value() {
                println!("{}= {}", pad, text);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build config dynamically with the json! macro
    let mut config = json!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging", "metrics"],
        "debug": true,
        "proxy": null
    });

    println!("Config as JSON:\n{}\n", config.to_json_string()?);
    describe(&config, 0);

    // Edit in place
    if let Some(obj) = config.as_object_mut() {
        obj.insert("started", Utc::now());
        if let Some(features) = obj.array_value_mut("features") {
            features.push("tracing");
        }
    }

    // Instants leave as text and come back as text
    let reparsed = parse(&config.to_json_string()?)?;
    let obj = reparsed.as_object().ok_or("expected an object")?;
    let stored = obj.value("started").map_or(NodeType::Null, JsonNode::node_type);
    println!("\nstarted is stored as {}", stored);
    println!("started reads as {}", obj.required_instant("started")?);
    println!("features: {:?}", obj.required_array("features")?.strings().collect::<Vec<_>>());

    Ok(())
}
