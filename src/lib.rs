//! # Gatelevel
//!
//! Gate-level transient analysis front end for a schematic editor.
//!
//! This library provides:
//! - Normalization of a flattened schematic into a device-level netlist
//! - A parser for voltage-source excitations such as `pulse(0,5,1n,1n,1n,5n,10n)`
//! - Orchestration of a transient run with progress reporting and cancellation
//! - Rendering of the engine's per-node waveforms into plot series
//! - Point-in-time lookup on step waveforms
//!
//! ## Architecture
//!
//! - [`source`] - Source-spec grammar and engineering-number parsing
//! - [`netlist`] - Device classification and netlist normalization
//! - [`analysis`] - Engine protocol, run state machine and results rendering
//! - [`waveform`] - Step waveforms and interpolation
//!
//! The diagram, the simulation engine and the plotting widget live outside
//! this crate and are reached through the traits in [`analysis`].
//!
//! ## Usage
//!
//! ```rust
//! use gatelevel::netlist::{normalize, RawDevice, DeviceKind};
//!
//! let devices = vec![
//!     RawDevice::new("gates:inverter").with_pin("a", "in").with_pin("z", "out"),
//!     RawDevice::new("analog:v_probe").with_pin("probe", "out").with_property("color", "red"),
//!     RawDevice::new("analog:resistor"),
//! ];
//! let netlist = normalize(&devices, &["inverter"]).unwrap();
//! assert_eq!(netlist.len(), 2);
//! assert_eq!(netlist.count(DeviceKind::VoltageProbe), 1);
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! gatelevel netlist design.json --gates inverter,nand2
//! gatelevel run design.json --results recorded.json --gates inverter --tstop 20n
//! ```

pub mod analysis;
pub mod error;
pub mod netlist;
pub mod source;
pub mod waveform;

// Re-export main types for convenience
pub use analysis::{TransientAnalysis, RunReport, RunState};
pub use error::{GateLevelError, Result};
pub use netlist::{normalize, Netlist, NormalizedDevice, RawDevice};
pub use source::{parse_source_spec, SourceSpec};
pub use waveform::{value_at_time, LogicLevel, Waveform};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::{gate_netlist, interpolate};
