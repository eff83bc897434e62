//! Netlist normalization.

use log::debug;
use serde::{Deserialize, Serialize};

use super::classify::{
    classify, GateLibrary, GATES_NAMESPACE, TAG_GROUND, TAG_JUMPER, TAG_VOLTAGE_PROBE,
    TAG_VOLTAGE_SOURCE,
};
use super::device::{DeviceKind, NormalizedDevice, ProbeRecord};
use super::types::{NodeId, RawDevice};
use crate::error::Result;

/// Ordered list of normalized devices, in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Netlist {
    devices: Vec<NormalizedDevice>,
}

impl Netlist {
    pub fn new(devices: Vec<NormalizedDevice>) -> Self {
        Self { devices }
    }

    pub fn devices(&self) -> &[NormalizedDevice] {
        &self.devices
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedDevice> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Number of devices of the given kind.
    pub fn count(&self, kind: DeviceKind) -> usize {
        self.devices.iter().filter(|d| d.kind() == kind).count()
    }

    /// Probes in declaration order.
    pub fn probes(&self) -> Vec<ProbeRecord> {
        find_probes(self)
    }
}

impl<'a> IntoIterator for &'a Netlist {
    type Item = &'a NormalizedDevice;
    type IntoIter = std::slice::Iter<'a, NormalizedDevice>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}

/// Classify every raw device, keeping input order and dropping ignored ones.
///
/// The first classification error aborts normalization.
pub fn normalize<L: GateLibrary + ?Sized>(devices: &[RawDevice], library: &L) -> Result<Netlist> {
    let mut normalized = Vec::with_capacity(devices.len());
    for device in devices {
        if let Some(dev) = classify(device, library)? {
            normalized.push(dev);
        }
    }

    debug!(
        "normalized {} of {} extracted devices",
        normalized.len(),
        devices.len()
    );
    Ok(Netlist::new(normalized))
}

/// Extraction allow-list: built-in leaves followed by `gates:<name>` for every
/// library member.
pub fn leaf_types<L: GateLibrary + ?Sized>(library: &L) -> Vec<String> {
    let mut leaves: Vec<String> = [TAG_GROUND, TAG_JUMPER, TAG_VOLTAGE_SOURCE, TAG_VOLTAGE_PROBE]
        .iter()
        .map(|s| s.to_string())
        .collect();
    leaves.extend(
        library
            .gate_names()
            .into_iter()
            .map(|name| format!("{}:{}", GATES_NAMESPACE, name)),
    );
    leaves
}

/// Probe records for every voltage probe, in declaration order.
pub fn find_probes(netlist: &Netlist) -> Vec<ProbeRecord> {
    netlist.iter().filter_map(NormalizedDevice::probe).collect()
}

/// Node labels handed to the engine for the given probes.
pub fn probe_nodes(probes: &[ProbeRecord]) -> Vec<NodeId> {
    probes.iter().map(|p| p.label.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY: [&str; 2] = ["inverter", "nand2"];

    fn sample_devices() -> Vec<RawDevice> {
        vec![
            RawDevice::new("analog:v_source")
                .with_pin("nplus", "a")
                .with_pin("nminus", "gnd")
                .with_property("value", "pulse(0,1,1n,0.1n,0.1n,5n,10n)"),
            RawDevice::new("analog:resistor").with_pin("n1", "a"),
            RawDevice::new("gates:inverter")
                .with_pin("a", "a")
                .with_pin("z", "b")
                .with_property("tpd", "15p"),
            RawDevice::new("text"),
            RawDevice::new("ground").with_pin("gnd", "gnd"),
            RawDevice::new("analog:v_probe")
                .with_pin("probe", "a")
                .with_property("color", "red"),
            RawDevice::new("analog:v_probe")
                .with_pin("probe", "b")
                .with_property("color", "x-axis"),
        ]
    }

    #[test]
    fn test_normalize_preserves_order_and_drops_unknown() {
        let netlist = normalize(&sample_devices(), &LIBRARY).unwrap();
        let kinds: Vec<DeviceKind> = netlist.iter().map(NormalizedDevice::kind).collect();
        assert_eq!(
            kinds,
            vec![
                DeviceKind::VoltageSource,
                DeviceKind::PrimitiveGate,
                DeviceKind::Ground,
                DeviceKind::VoltageProbe,
                DeviceKind::VoltageProbe,
            ]
        );
        assert_eq!(netlist.count(DeviceKind::VoltageProbe), 2);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let devices = sample_devices();
        assert_eq!(
            normalize(&devices, &LIBRARY).unwrap(),
            normalize(&devices, &LIBRARY).unwrap()
        );
    }

    #[test]
    fn test_normalize_propagates_classification_error() {
        let mut devices = sample_devices();
        devices.push(RawDevice::new("analog:v_source").with_property("value", "pulse 0 1"));
        assert!(normalize(&devices, &LIBRARY).is_err());
    }

    #[test]
    fn test_normalize_empty() {
        let netlist = normalize(&[], &LIBRARY).unwrap();
        assert!(netlist.is_empty());
        assert!(netlist.probes().is_empty());
    }

    #[test]
    fn test_find_probes_in_declaration_order() {
        let netlist = normalize(&sample_devices(), &LIBRARY).unwrap();
        let probes = find_probes(&netlist);
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[0].label, "a");
        assert_eq!(probes[1].color, "x-axis");
        assert_eq!(probe_nodes(&probes), vec!["a", "b"]);
    }

    #[test]
    fn test_leaf_types() {
        assert_eq!(
            leaf_types(&LIBRARY),
            vec![
                "ground",
                "jumper",
                "analog:v_source",
                "analog:v_probe",
                "gates:inverter",
                "gates:nand2",
            ]
        );
    }

    #[test]
    fn test_netlist_serializes_as_list() {
        let netlist = normalize(&sample_devices()[4..5], &LIBRARY).unwrap();
        let json = serde_json::to_value(&netlist).unwrap();
        assert_eq!(json, serde_json::json!([{ "kind": "ground", "node": "gnd" }]));
    }
}
