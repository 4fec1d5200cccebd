//! Predicates over device models

use super::attributes::{AttributeValue, Model};

/// Matches models whose capabilities include `namespace`
///
/// An absent model, a model without `base:caps`, or empty caps never match.
pub fn is_a(namespace: impl Into<String>) -> impl Fn(Option<&Model>) -> bool {
    let namespace = namespace.into();
    move |model| {
        model
            .and_then(Model::capabilities)
            .is_some_and(|caps| caps.contains(&namespace))
    }
}

/// Matches models where `name` is set to exactly `value`
pub fn attribute_equals(
    name: impl Into<String>,
    value: AttributeValue,
) -> impl Fn(Option<&Model>) -> bool {
    let name = name.into();
    move |model| model.and_then(|m| m.attribute(&name)) == Some(&value)
}
