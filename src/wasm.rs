//! WASM bindings for the gate-level front end.
//!
//! Lets a browser-hosted schematic editor normalize its extracted devices and
//! query waveforms without a round trip through the engine.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { gateNetlist, interpolate } from 'gatelevel';
//!
//! await init();
//!
//! const netlist = JSON.parse(gateNetlist(JSON.stringify(devices), '["inverter","nand2"]'));
//! const v = JSON.parse(interpolate(15e-9, '[0, 1e-8]', '["0", "1"]'));
//! ```

use wasm_bindgen::prelude::*;

use crate::netlist::{normalize, RawDevice};
use crate::waveform::value_at_time;

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Normalize a JSON device list into a JSON netlist.
///
/// # Arguments
/// * `devices_json` - Array of `{type, connections, properties}` objects
/// * `gate_names_json` - Array of gate-library member names
#[wasm_bindgen(js_name = gateNetlist)]
pub fn gate_netlist(devices_json: &str, gate_names_json: &str) -> Result<String, JsValue> {
    let devices: Vec<RawDevice> = serde_json::from_str(devices_json).map_err(to_js)?;
    let gates: Vec<String> = serde_json::from_str(gate_names_json).map_err(to_js)?;
    let netlist = normalize(&devices, &gates).map_err(to_js)?;
    serde_json::to_string(&netlist).map_err(to_js)
}

/// Value in force at time `t`, as JSON. Returns `null` when `t` precedes the
/// first sample or `values_json` is `null`.
#[wasm_bindgen]
pub fn interpolate(t: f64, times_json: &str, values_json: &str) -> Result<String, JsValue> {
    let times: Vec<f64> = serde_json::from_str(times_json).map_err(to_js)?;
    let values: Option<Vec<serde_json::Value>> =
        serde_json::from_str(values_json).map_err(to_js)?;
    let value = value_at_time(t, &times, values.as_deref());
    serde_json::to_string(&value).map_err(to_js)
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
