//! Attribute storage for a single device

use std::collections::{BTreeSet, HashMap};

/// Capability namespaces the model supports
pub const ATTR_CAPS: &str = "base:caps";
/// Protocol address of the device, e.g. `DRIV:ZW:7`
pub const ATTR_ADDRESS: &str = "base:address";
/// Set while the device's last battery report was the low-battery warning
pub const ATTR_LOW_BATTERY: &str = "devpow:lowBattery";

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    StrSet(BTreeSet<String>),
    IntList(Vec<i64>),
}

/// Mutable bag of attributes describing one device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    attributes: HashMap<String, AttributeValue>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(name.into(), value);
    }

    /// Capability namespaces, or `None` if `base:caps` is absent or not a set
    pub fn capabilities(&self) -> Option<&BTreeSet<String>> {
        match self.attributes.get(ATTR_CAPS) {
            Some(AttributeValue::StrSet(caps)) => Some(caps),
            _ => None,
        }
    }

    /// Add a capability namespace, creating `base:caps` if needed
    pub fn add_capability(&mut self, namespace: &str) {
        let entry = self
            .attributes
            .entry(ATTR_CAPS.to_string())
            .or_insert_with(|| AttributeValue::StrSet(BTreeSet::new()));
        match entry {
            AttributeValue::StrSet(caps) => {
                caps.insert(namespace.to_string());
            }
            other => {
                *other = AttributeValue::StrSet(BTreeSet::from([namespace.to_string()]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_capability() {
        let mut model = Model::new();
        assert!(model.capabilities().is_none());

        model.add_capability("base");
        model.add_capability("devpow");
        model.add_capability("base");

        let caps = model.capabilities().unwrap();
        assert_eq!(caps.len(), 2);
        assert!(caps.contains("devpow"));
    }

    #[test]
    fn test_caps_of_wrong_type_are_replaced() {
        let mut model = Model::new();
        model.set_attribute(ATTR_CAPS, AttributeValue::Str("base".into()));
        assert!(model.capabilities().is_none());

        model.add_capability("swit");
        assert_eq!(
            model.attribute(ATTR_CAPS),
            Some(&AttributeValue::StrSet(BTreeSet::from(["swit".to_string()])))
        );
    }
}
