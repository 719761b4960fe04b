//! Encode a sensor payload, show both segments, and decode it back.
//!
//! Run with: `cargo run --example sensor_roundtrip`
//! Set `RUST_LOG=coil=debug` to watch the optimizer accept substitutions.

use serde_json::json;

fn main() {
    env_logger::init();

    let payload = json!({
        "q": "hourly",
        "data": {"sensordata": [
            {"station": "north", "sensor": "atmospheric-pressure-probe", "temp": "21.5", "unit": "C"},
            {"station": "north", "sensor": "atmospheric-pressure-probe", "temp": "19.0", "unit": "C"},
            {"station": "south", "sensor": "atmospheric-pressure-probe", "temp": "22.1", "unit": "C"},
            {"station": "south", "sensor": "atmospheric-pressure-probe", "temp": "20.4", "unit": "C"},
            {"station": "east", "sensor": "atmospheric-pressure-probe", "temp": "18.9", "unit": "C"},
            {"station": "east", "sensor": "atmospheric-pressure-probe", "temp": "21.0", "unit": "C"}
        ]}
    });

    let encoded = coil::encode(&payload).expect("payload is well-formed");
    let meta = encoded["data"]["meta"].as_str().unwrap();
    let body = encoded["data"]["body"].as_str().unwrap();

    println!("META: {meta}");
    println!("BODY: {body}");

    let json_text = serde_json::to_string(&payload).unwrap();
    let coil_text = format!("{meta}{body}");
    println!(
        "\nheuristic cost: JSON {} tokens, COIL {} tokens",
        coil::heuristic_cost(&json_text),
        coil::heuristic_cost(&coil_text),
    );

    let decoded = coil::decode(&encoded).expect("segments decode");
    assert_eq!(decoded, payload);
    println!("round trip: ok");
}
