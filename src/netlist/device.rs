//! Normalized simulation devices.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{Connections, NodeId};
use crate::source::SourceSpec;

/// Pin carrying the observed node on a voltage probe.
pub const PROBE_PIN: &str = "probe";

/// Pin carrying the node on a ground symbol.
pub const GROUND_PIN: &str = "gnd";

/// Colour sentinel marking the probe that selects the horizontal axis.
pub const X_AXIS_COLOR: &str = "x-axis";

/// Timing and sizing properties the engine reads from a gate.
pub const GATE_PROPERTIES: [&str; 8] = ["tcd", "tpd", "tr", "tf", "cin", "size", "ts", "th"];

/// Simulation primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    PrimitiveGate,
    VoltageSource,
    Ground,
    Connect,
    VoltageProbe,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceKind::PrimitiveGate => "gate",
            DeviceKind::VoltageSource => "voltage source",
            DeviceKind::Ground => "ground",
            DeviceKind::Connect => "connect",
            DeviceKind::VoltageProbe => "voltage probe",
        };
        f.write_str(name)
    }
}

/// Gate timing/size parameters, all in SI units. Absent values stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateTiming {
    /// Contamination delay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcd: Option<f64>,
    /// Propagation delay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tpd: Option<f64>,
    /// Output rise time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tr: Option<f64>,
    /// Output fall time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tf: Option<f64>,
    /// Input capacitance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cin: Option<f64>,
    /// Drive size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Setup time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<f64>,
    /// Hold time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub th: Option<f64>,
}

impl GateTiming {
    /// Slot for one of [`GATE_PROPERTIES`].
    pub fn slot_mut(&mut self, property: &str) -> Option<&mut Option<f64>> {
        match property {
            "tcd" => Some(&mut self.tcd),
            "tpd" => Some(&mut self.tpd),
            "tr" => Some(&mut self.tr),
            "tf" => Some(&mut self.tf),
            "cin" => Some(&mut self.cin),
            "size" => Some(&mut self.size),
            "ts" => Some(&mut self.ts),
            "th" => Some(&mut self.th),
            _ => None,
        }
    }
}

/// A device in the normalized netlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedDevice {
    /// A gate-library primitive
    Gate {
        /// Library member name, e.g. `nand2`
        gate: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        connections: Connections,
        timing: GateTiming,
    },
    VoltageSource {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        connections: Connections,
        value: SourceSpec,
    },
    Ground { node: NodeId },
    /// Ties every listed node together
    Connect { nodes: Vec<NodeId> },
    VoltageProbe {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        connections: Connections,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        offset: Option<f64>,
    },
}

impl NormalizedDevice {
    pub fn kind(&self) -> DeviceKind {
        match self {
            NormalizedDevice::Gate { .. } => DeviceKind::PrimitiveGate,
            NormalizedDevice::VoltageSource { .. } => DeviceKind::VoltageSource,
            NormalizedDevice::Ground { .. } => DeviceKind::Ground,
            NormalizedDevice::Connect { .. } => DeviceKind::Connect,
            NormalizedDevice::VoltageProbe { .. } => DeviceKind::VoltageProbe,
        }
    }

    /// Connected nodes in order.
    pub fn nodes(&self) -> Vec<NodeId> {
        match self {
            NormalizedDevice::Gate { connections, .. }
            | NormalizedDevice::VoltageSource { connections, .. }
            | NormalizedDevice::VoltageProbe { connections, .. } => connections.nodes(),
            NormalizedDevice::Ground { node } => vec![node.clone()],
            NormalizedDevice::Connect { nodes } => nodes.clone(),
        }
    }

    /// Instance name, if the device carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            NormalizedDevice::Gate { name, .. }
            | NormalizedDevice::VoltageSource { name, .. }
            | NormalizedDevice::VoltageProbe { name, .. } => name.as_deref(),
            NormalizedDevice::Ground { .. } | NormalizedDevice::Connect { .. } => None,
        }
    }

    /// Probe identity for a voltage probe.
    pub fn probe(&self) -> Option<ProbeRecord> {
        match self {
            NormalizedDevice::VoltageProbe {
                connections,
                color,
                offset,
                ..
            } => {
                let label = connections.pin(PROBE_PIN).or_else(|| connections.first())?;
                Some(ProbeRecord {
                    color: color.clone().unwrap_or_default(),
                    label: label.clone(),
                    offset: *offset,
                })
            }
            _ => None,
        }
    }
}

/// Display identity of one voltage probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeRecord {
    pub color: String,
    /// Node the probe observes
    pub label: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
}

impl ProbeRecord {
    pub fn new(color: impl Into<String>, label: impl Into<NodeId>) -> Self {
        Self {
            color: color.into(),
            label: label.into(),
            offset: None,
        }
    }

    /// Whether this probe only selects the horizontal axis.
    pub fn is_x_axis(&self) -> bool {
        self.color == X_AXIS_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn named(pairs: &[(&str, &str)]) -> Connections {
        Connections::Named(
            pairs
                .iter()
                .map(|(p, n)| (p.to_string(), n.to_string()))
                .collect::<IndexMap<_, _>>(),
        )
    }

    #[test]
    fn test_probe_record_from_device() {
        let dev = NormalizedDevice::VoltageProbe {
            name: Some("P1".into()),
            connections: named(&[("probe", "out")]),
            color: Some("red".into()),
            offset: Some(0.5),
        };
        assert_eq!(dev.kind(), DeviceKind::VoltageProbe);
        let probe = dev.probe().unwrap();
        assert_eq!(probe.label, "out");
        assert_eq!(probe.color, "red");
        assert_eq!(probe.offset, Some(0.5));
        assert!(!probe.is_x_axis());
    }

    #[test]
    fn test_non_probe_has_no_probe_record() {
        let dev = NormalizedDevice::Ground { node: "gnd".into() };
        assert!(dev.probe().is_none());
        assert_eq!(dev.nodes(), vec!["gnd"]);
        assert_eq!(dev.name(), None);
    }

    #[test]
    fn test_x_axis_sentinel() {
        assert!(ProbeRecord::new("x-axis", "clk").is_x_axis());
    }

    #[test]
    fn test_gate_timing_serializes_present_fields_only() {
        let timing = GateTiming {
            tpd: Some(2e-11),
            ..Default::default()
        };
        let json = serde_json::to_value(&timing).unwrap();
        assert_eq!(json, serde_json::json!({ "tpd": 2e-11 }));
    }
}
