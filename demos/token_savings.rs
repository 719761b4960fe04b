//! Compare the heuristic token cost of JSON and COIL representations as a
//! dataset grows.
//!
//! Run with: `cargo run --example token_savings`

use serde_json::{json, Value};

fn payload_with(rows: usize) -> Value {
    let units = ["C", "F"];
    let sensordata: Vec<Value> = (0..rows)
        .map(|i| {
            json!({
                "sensor": "environment-monitoring-unit",
                "status": "nominal",
                "temp": format!("{}.{}", 15 + i % 12, i % 10),
                "unit": units[i % units.len()],
            })
        })
        .collect();
    json!({"data": {"sensordata": sensordata}})
}

fn main() {
    env_logger::init();

    println!("{:>6} {:>10} {:>10} {:>9}", "rows", "json", "coil", "saved");
    for rows in [5, 20, 100, 500] {
        let payload = payload_with(rows);
        let encoded = coil::encode(&payload).expect("payload is well-formed");

        let json_cost = coil::heuristic_cost(&serde_json::to_string(&payload).unwrap());
        let coil_text = format!(
            "{}{}",
            encoded["data"]["meta"].as_str().unwrap(),
            encoded["data"]["body"].as_str().unwrap(),
        );
        let coil_cost = coil::heuristic_cost(&coil_text);
        let saved = 100.0 - (coil_cost as f64 / json_cost as f64) * 100.0;

        println!("{rows:>6} {json_cost:>10} {coil_cost:>10} {saved:>8.1}%");
    }
}
