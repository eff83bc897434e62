//! Netlist extraction and normalization.
//!
//! The diagram hands over a flattened list of [`RawDevice`]s. Each is
//! classified into a simulation primitive ([`NormalizedDevice`]) and the
//! results are collected, in order, into a [`Netlist`] for the gate-level
//! engine. Devices the engine has no use for are dropped, not rejected.

mod classify;
mod device;
mod normalize;
mod types;

pub use classify::{
    classify, DeviceType, GateLibrary, GATES_NAMESPACE, TAG_GROUND, TAG_JUMPER,
    TAG_VOLTAGE_PROBE, TAG_VOLTAGE_SOURCE,
};
pub use device::{
    DeviceKind, GateTiming, NormalizedDevice, ProbeRecord, GATE_PROPERTIES, GROUND_PIN,
    PROBE_PIN, X_AXIS_COLOR,
};
pub use normalize::{find_probes, leaf_types, normalize, probe_nodes, Netlist};
pub use types::{Connections, NodeId, PropertyValue, RawDevice};
