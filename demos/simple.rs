//! Building, serializing and parsing a small document.
//!
//! Run with: cargo run --example simple

use jsonbuddy::{parse, JsonArray, JsonObject};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let person = JsonObject::new()
        .with_value("firstname", "Darth")
        .with_value("lastname", "Vader")
        .with_value("born", "41")
        .with_value("films", JsonArray::new().add(4).add(5).add(6));

    // Serialize to canonical JSON
    let json = person.to_json_string()?;
    println!("JSON output:\n{}\n", json);

    // Parse it back
    let node = parse(&json)?;
    let back = node.as_object().ok_or("expected an object")?;
    assert_eq!(back, &person);
    println!("✓ Round-trip successful");

    // Text that looks like a number reads as one
    println!("born: {}", back.required_long("born")?);

    // A missing key is an error only when it is required
    println!("title: {:?}", back.string_value("title"));
    match back.required_string("title") {
        Ok(title) => println!("title: {:?}", title),
        Err(e) => println!("required title: {}", e),
    }

    Ok(())
}
