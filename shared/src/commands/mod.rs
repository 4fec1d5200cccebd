//! Built-in command classes and their registration table
//!
//! Each submodule owns the constants, decoders and encoders of one command
//! class. [`STANDARD_COMMANDS`] is the explicit list the registry is built from.

pub mod association;
pub mod basic;
pub mod battery;
pub mod configuration;
pub mod manufacturer_specific;
pub mod notification;
pub mod sensor_multilevel;
pub mod switch_binary;
pub mod version;
pub mod wake_up;

use crate::descriptor::CommandDescriptor;
use crate::encoder::EncodeError;
use crate::entity::Entity;
use crate::identity::CommandIdentity;

/// Every command decoded out of the box
pub static STANDARD_COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor::new(version::REPORT, "Version Report", &version::VersionReportDecoder)
        .with_encoder(&version::VersionReportEncoder),
    CommandDescriptor::new(
        version::COMMAND_CLASS_REPORT,
        "Version Command Class Report",
        &version::CommandClassReportDecoder,
    )
    .with_encoder(&version::CommandClassReportEncoder),
    CommandDescriptor::new(basic::REPORT, "Basic Report", &basic::BasicReportDecoder)
        .with_encoder(&basic::BasicReportEncoder),
    CommandDescriptor::new(
        switch_binary::REPORT,
        "Binary Switch Report",
        &switch_binary::BinarySwitchReportDecoder,
    )
    .with_encoder(&switch_binary::BinarySwitchReportEncoder),
    CommandDescriptor::new(battery::REPORT, "Battery Report", &battery::BatteryReportDecoder)
        .with_encoder(&battery::BatteryReportEncoder),
    CommandDescriptor::new(
        manufacturer_specific::REPORT,
        "Manufacturer Specific Report",
        &manufacturer_specific::ManufacturerSpecificReportDecoder,
    ),
    CommandDescriptor::new(
        sensor_multilevel::REPORT,
        "Multilevel Sensor Report",
        &sensor_multilevel::SensorMultilevelReportDecoder,
    ),
    CommandDescriptor::new(
        configuration::REPORT,
        "Configuration Report",
        &configuration::ConfigurationReportDecoder,
    ),
    CommandDescriptor::new(
        association::REPORT,
        "Association Report",
        &association::AssociationReportDecoder,
    ),
    CommandDescriptor::new(
        wake_up::NOTIFICATION,
        "Wake Up Notification",
        &wake_up::WakeUpNotificationDecoder,
    ),
    CommandDescriptor::new(
        notification::REPORT,
        "Notification Report",
        &notification::NotificationReportDecoder,
    ),
];

fn mismatch(expected: CommandIdentity, entity: &Entity) -> EncodeError {
    EncodeError::Mismatch {
        expected,
        actual: entity.identity(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_standard_table_is_unique() {
        let identities: HashSet<_> = STANDARD_COMMANDS.iter().map(|d| d.identity()).collect();
        assert_eq!(identities.len(), STANDARD_COMMANDS.len());
    }

    #[test]
    fn test_standard_names_are_set() {
        for descriptor in STANDARD_COMMANDS {
            assert!(!descriptor.name().is_empty(), "{:?}", descriptor);
        }
    }
}
