//! Device classification.
//!
//! Maps each extracted [`RawDevice`] onto one simulation primitive. The type
//! tag is resolved once into a [`DeviceType`]; anything the gate-level engine
//! has no use for resolves to [`DeviceType::Unrecognized`] and is dropped.

use std::collections::{BTreeSet, HashSet};

use log::debug;

use super::device::{GateTiming, NormalizedDevice, GATE_PROPERTIES, GROUND_PIN, PROBE_PIN};
use super::types::{PropertyValue, RawDevice};
use crate::error::{GateLevelError, Result};
use crate::source::parse_source_spec;

/// Namespace of gate-library modules in a type tag.
pub const GATES_NAMESPACE: &str = "gates";

pub const TAG_GROUND: &str = "ground";
pub const TAG_JUMPER: &str = "jumper";
pub const TAG_VOLTAGE_SOURCE: &str = "analog:v_source";
pub const TAG_VOLTAGE_PROBE: &str = "analog:v_probe";

/// The set of known gate primitives.
pub trait GateLibrary {
    /// Whether `name` is a member of the library.
    fn contains(&self, name: &str) -> bool;

    /// Member names in library order.
    fn gate_names(&self) -> Vec<String>;
}

impl<S: AsRef<str>> GateLibrary for [S] {
    fn contains(&self, name: &str) -> bool {
        self.iter().any(|s| s.as_ref() == name)
    }

    fn gate_names(&self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>> GateLibrary for Vec<S> {
    fn contains(&self, name: &str) -> bool {
        GateLibrary::contains(self.as_slice(), name)
    }

    fn gate_names(&self) -> Vec<String> {
        self.as_slice().gate_names()
    }
}

impl<S: AsRef<str>, const N: usize> GateLibrary for [S; N] {
    fn contains(&self, name: &str) -> bool {
        GateLibrary::contains(self.as_slice(), name)
    }

    fn gate_names(&self) -> Vec<String> {
        self.as_slice().gate_names()
    }
}

impl GateLibrary for HashSet<String> {
    fn contains(&self, name: &str) -> bool {
        HashSet::contains(self, name)
    }

    fn gate_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.iter().cloned().collect();
        names.sort();
        names
    }
}

impl GateLibrary for BTreeSet<String> {
    fn contains(&self, name: &str) -> bool {
        BTreeSet::contains(self, name)
    }

    fn gate_names(&self) -> Vec<String> {
        self.iter().cloned().collect()
    }
}

/// Resolved type of a raw device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceType {
    /// Gate-library member
    Gate(String),
    VoltageSource,
    Ground,
    Jumper,
    VoltageProbe,
    /// Not simulated at gate level
    Unrecognized,
}

impl DeviceType {
    /// Resolve a type tag against the gate library.
    pub fn resolve<L: GateLibrary + ?Sized>(type_tag: &str, library: &L) -> Self {
        if let Some((GATES_NAMESPACE, name)) = type_tag.split_once(':') {
            if library.contains(name) {
                return DeviceType::Gate(name.to_string());
            }
            return DeviceType::Unrecognized;
        }

        match type_tag {
            TAG_VOLTAGE_SOURCE => DeviceType::VoltageSource,
            TAG_GROUND => DeviceType::Ground,
            TAG_JUMPER => DeviceType::Jumper,
            TAG_VOLTAGE_PROBE => DeviceType::VoltageProbe,
            _ => DeviceType::Unrecognized,
        }
    }
}

/// Classify one raw device.
///
/// Returns `Ok(None)` for devices the gate-level engine ignores. A malformed
/// voltage-source value or an unparseable numeric property is an error.
pub fn classify<L: GateLibrary + ?Sized>(
    device: &RawDevice,
    library: &L,
) -> Result<Option<NormalizedDevice>> {
    let normalized = match DeviceType::resolve(&device.type_tag, library) {
        DeviceType::Gate(gate) => NormalizedDevice::Gate {
            timing: gate_timing(device)?,
            gate,
            name: text_property(device, "name"),
            connections: device.connections.clone(),
        },

        DeviceType::VoltageSource => {
            let value = device
                .property("value")
                .ok_or_else(|| GateLevelError::missing_property(device.display_name(), "value"))?;
            NormalizedDevice::VoltageSource {
                name: text_property(device, "name"),
                connections: device.connections.clone(),
                value: parse_source_spec(&value.as_text())?,
            }
        }

        DeviceType::Ground => {
            let node = device
                .connections
                .pin(GROUND_PIN)
                .or_else(|| device.connections.first())
                .ok_or_else(|| GateLevelError::MissingPin {
                    device: device.display_name(),
                    pin: GROUND_PIN.to_string(),
                })?;
            NormalizedDevice::Ground { node: node.clone() }
        }

        // Every attached node, whatever the pin is called.
        DeviceType::Jumper => NormalizedDevice::Connect {
            nodes: device.connections.nodes(),
        },

        DeviceType::VoltageProbe => {
            if device.connections.is_empty() {
                return Err(GateLevelError::MissingPin {
                    device: device.display_name(),
                    pin: PROBE_PIN.to_string(),
                });
            }
            NormalizedDevice::VoltageProbe {
                name: text_property(device, "name"),
                connections: device.connections.clone(),
                color: text_property(device, "color"),
                offset: numeric_property(device, "offset")?,
            }
        }

        DeviceType::Unrecognized => {
            debug!("ignoring device of type '{}'", device.type_tag);
            return Ok(None);
        }
    };

    debug!(
        "classified '{}' as {}",
        device.display_name(),
        normalized.kind()
    );
    Ok(Some(normalized))
}

fn gate_timing(device: &RawDevice) -> Result<GateTiming> {
    let mut timing = GateTiming::default();
    for property in GATE_PROPERTIES {
        if let Some(slot) = timing.slot_mut(property) {
            *slot = numeric_property(device, property)?;
        }
    }
    Ok(timing)
}

fn text_property(device: &RawDevice, name: &str) -> Option<String> {
    device.property(name).map(PropertyValue::as_text)
}

fn numeric_property(device: &RawDevice, name: &str) -> Result<Option<f64>> {
    match device.property(name) {
        None => Ok(None),
        Some(value) => value.as_number().map(Some).ok_or_else(|| {
            GateLevelError::invalid_property(device.display_name(), name, value.as_text())
        }),
    }
}
