//! Raw extracted device records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::source::parse_number;

/// A circuit node identifier as produced by the diagram extractor.
pub type NodeId = String;

/// Connections of a device: pin-named or positional.
///
/// Pin-named maps keep their insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Connections {
    /// `pin name -> node`
    Named(IndexMap<String, NodeId>),
    /// Nodes in pin order
    Positional(Vec<NodeId>),
}

impl Connections {
    /// Node on a named pin. Positional connections have no pin names.
    pub fn pin(&self, name: &str) -> Option<&NodeId> {
        match self {
            Connections::Named(map) => map.get(name),
            Connections::Positional(_) => None,
        }
    }

    /// All connected nodes in iteration order.
    pub fn nodes(&self) -> Vec<NodeId> {
        match self {
            Connections::Named(map) => map.values().cloned().collect(),
            Connections::Positional(nodes) => nodes.clone(),
        }
    }

    /// First connected node.
    pub fn first(&self) -> Option<&NodeId> {
        match self {
            Connections::Named(map) => map.values().next(),
            Connections::Positional(nodes) => nodes.first(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Connections::Named(map) => map.len(),
            Connections::Positional(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Connections {
    fn default() -> Self {
        Connections::Named(IndexMap::new())
    }
}

/// A property value in a raw device's property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
}

impl PropertyValue {
    /// Numeric value, parsing text literals such as `"10ns"`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(v) => Some(*v),
            PropertyValue::Text(s) => parse_number(s),
        }
    }

    /// Text form of the value.
    pub fn as_text(&self) -> String {
        match self {
            PropertyValue::Number(v) => v.to_string(),
            PropertyValue::Text(s) => s.clone(),
        }
    }

    /// Empty text counts as absent.
    pub fn is_blank(&self) -> bool {
        matches!(self, PropertyValue::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Number(v)
    }
}

/// A device as extracted from the flattened diagram. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDevice {
    /// `"<namespace>:<name>"` or a bare built-in name
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub connections: Connections,
    #[serde(default)]
    pub properties: IndexMap<String, PropertyValue>,
}

impl RawDevice {
    /// Create a device with no connections or properties.
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            connections: Connections::default(),
            properties: IndexMap::new(),
        }
    }

    /// Add a pin-named connection.
    pub fn with_pin(mut self, pin: impl Into<String>, node: impl Into<NodeId>) -> Self {
        match &mut self.connections {
            Connections::Named(map) => {
                map.insert(pin.into(), node.into());
            }
            Connections::Positional(nodes) => nodes.push(node.into()),
        }
        self
    }

    /// Add a property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Look up a property, treating blank text as absent.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name).filter(|v| !v.is_blank())
    }

    /// Instance name for messages: the `name` property or the type tag.
    pub fn display_name(&self) -> String {
        self.property("name")
            .map(PropertyValue::as_text)
            .unwrap_or_else(|| self.type_tag.clone())
    }

    /// Split the type tag into `(namespace, name)`.
    pub fn split_tag(&self) -> (Option<&str>, &str) {
        match self.type_tag.split_once(':') {
            Some((namespace, name)) => (Some(namespace), name),
            None => (None, self.type_tag.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_connections_keep_order() {
        let dev = RawDevice::new("jumper")
            .with_pin("z", "n3")
            .with_pin("a", "n1")
            .with_pin("m", "n2");
        assert_eq!(dev.connections.nodes(), vec!["n3", "n1", "n2"]);
        assert_eq!(dev.connections.pin("a").map(String::as_str), Some("n1"));
    }

    #[test]
    fn test_deserialize_raw_device() {
        let json = r#"{
            "type": "gates:nand2",
            "connections": {"a": "x", "b": "y", "z": "out"},
            "properties": {"name": "U1", "tpd": "20p", "size": 4}
        }"#;
        let dev: RawDevice = serde_json::from_str(json).unwrap();
        assert_eq!(dev.split_tag(), (Some("gates"), "nand2"));
        assert_eq!(dev.connections.nodes(), vec!["x", "y", "out"]);
        assert_eq!(dev.property("tpd").and_then(PropertyValue::as_number), Some(20e-12));
        assert_eq!(dev.property("size").and_then(PropertyValue::as_number), Some(4.0));
        assert_eq!(dev.display_name(), "U1");
    }

    #[test]
    fn test_positional_connections() {
        let dev: RawDevice =
            serde_json::from_str(r#"{"type": "jumper", "connections": ["a", "b"]}"#).unwrap();
        assert_eq!(dev.connections, Connections::Positional(vec!["a".into(), "b".into()]));
        assert_eq!(dev.connections.pin("a"), None);
        assert!(dev.properties.is_empty());
    }

    #[test]
    fn test_blank_property_is_absent() {
        let dev = RawDevice::new("gates:inv").with_property("tr", "  ");
        assert!(dev.property("tr").is_none());
        assert_eq!(dev.display_name(), "gates:inv");
    }
}
