//! Decoded command payloads
//!
//! Every type here is an immutable value: fields are set once by the
//! constructor and only exposed through accessors.

use crate::commands::{
    association, basic, battery, configuration, manufacturer_specific, notification,
    sensor_multilevel, switch_binary, version, wake_up,
};
use crate::identity::CommandIdentity;

/// One decoded command, closed over the supported command set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    VersionReport(VersionReport),
    VersionCommandClassReport(VersionCommandClassReport),
    BasicReport(BasicReport),
    BinarySwitchReport(BinarySwitchReport),
    BatteryReport(BatteryReport),
    ManufacturerSpecificReport(ManufacturerSpecificReport),
    SensorMultilevelReport(SensorMultilevelReport),
    ConfigurationReport(ConfigurationReport),
    AssociationReport(AssociationReport),
    WakeUpNotification,
    NotificationReport(NotificationReport),
}

impl Entity {
    /// The command this entity was decoded from
    pub fn identity(&self) -> CommandIdentity {
        match self {
            Entity::VersionReport(_) => version::REPORT,
            Entity::VersionCommandClassReport(_) => version::COMMAND_CLASS_REPORT,
            Entity::BasicReport(_) => basic::REPORT,
            Entity::BinarySwitchReport(_) => switch_binary::REPORT,
            Entity::BatteryReport(_) => battery::REPORT,
            Entity::ManufacturerSpecificReport(_) => manufacturer_specific::REPORT,
            Entity::SensorMultilevelReport(_) => sensor_multilevel::REPORT,
            Entity::ConfigurationReport(_) => configuration::REPORT,
            Entity::AssociationReport(_) => association::REPORT,
            Entity::WakeUpNotification => wake_up::NOTIFICATION,
            Entity::NotificationReport(_) => notification::REPORT,
        }
    }
}

/// Version Report: library type, protocol version and per-target firmware versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReport {
    library_type: u8,
    protocol_version: u8,
    firmware_versions: Vec<u16>,
}

impl VersionReport {
    pub fn new(library_type: u8, protocol_version: u8, firmware_versions: Vec<u16>) -> Self {
        Self {
            library_type,
            protocol_version,
            firmware_versions,
        }
    }

    pub fn library_type(&self) -> u8 {
        self.library_type
    }

    pub fn protocol_version(&self) -> u8 {
        self.protocol_version
    }

    /// Firmware versions in target order; target 0 is always present
    pub fn firmware_versions(&self) -> &[u16] {
        &self.firmware_versions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionCommandClassReport {
    requested_class: u8,
    class_version: u8,
}

impl VersionCommandClassReport {
    pub fn new(requested_class: u8, class_version: u8) -> Self {
        Self {
            requested_class,
            class_version,
        }
    }

    pub fn requested_class(&self) -> u8 {
        self.requested_class
    }

    /// Zero means the node does not support the requested class
    pub fn class_version(&self) -> u8 {
        self.class_version
    }
}

/// Target value and duration carried by v2 reports of actuator classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<T> {
    target: T,
    duration: u8,
}

impl<T: Copy> Transition<T> {
    pub fn new(target: T, duration: u8) -> Self {
        Self { target, duration }
    }

    pub fn target(&self) -> T {
        self.target
    }

    /// Raw duration byte (0x00 instant, 0x01-0x7F seconds, 0x80-0xFD minutes, 0xFE unknown)
    pub fn duration(&self) -> u8 {
        self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicReport {
    current_value: u8,
    transition: Option<Transition<u8>>,
}

impl BasicReport {
    pub fn new(current_value: u8, transition: Option<Transition<u8>>) -> Self {
        Self {
            current_value,
            transition,
        }
    }

    pub fn current_value(&self) -> u8 {
        self.current_value
    }

    pub fn transition(&self) -> Option<Transition<u8>> {
        self.transition
    }
}

/// State reported by a binary switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    Off,
    On,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinarySwitchReport {
    current_value: SwitchState,
    transition: Option<Transition<SwitchState>>,
}

impl BinarySwitchReport {
    pub fn new(current_value: SwitchState, transition: Option<Transition<SwitchState>>) -> Self {
        Self {
            current_value,
            transition,
        }
    }

    pub fn current_value(&self) -> SwitchState {
        self.current_value
    }

    pub fn transition(&self) -> Option<Transition<SwitchState>> {
        self.transition
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryLevel {
    /// Remaining charge, 0-100
    Percent(u8),
    /// Device signalled a low-battery warning instead of a level
    LowWarning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryReport {
    level: BatteryLevel,
}

impl BatteryReport {
    pub fn new(level: BatteryLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> BatteryLevel {
        self.level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManufacturerSpecificReport {
    manufacturer_id: u16,
    product_type_id: u16,
    product_id: u16,
}

impl ManufacturerSpecificReport {
    pub fn new(manufacturer_id: u16, product_type_id: u16, product_id: u16) -> Self {
        Self {
            manufacturer_id,
            product_type_id,
            product_id,
        }
    }

    pub fn manufacturer_id(&self) -> u16 {
        self.manufacturer_id
    }

    pub fn product_type_id(&self) -> u16 {
        self.product_type_id
    }

    pub fn product_id(&self) -> u16 {
        self.product_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorMultilevelReport {
    sensor_type: u8,
    scale: u8,
    precision: u8,
    value: i32,
}

impl SensorMultilevelReport {
    pub fn new(sensor_type: u8, scale: u8, precision: u8, value: i32) -> Self {
        Self {
            sensor_type,
            scale,
            precision,
            value,
        }
    }

    pub fn sensor_type(&self) -> u8 {
        self.sensor_type
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Number of decimal places encoded in `raw_value`
    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn raw_value(&self) -> i32 {
        self.value
    }

    /// Value with the precision applied, e.g. raw 215 at precision 1 is 21.5
    pub fn value(&self) -> f64 {
        self.value as f64 / 10f64.powi(self.precision as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationReport {
    parameter: u8,
    size: u8,
    value: i32,
}

impl ConfigurationReport {
    pub fn new(parameter: u8, size: u8, value: i32) -> Self {
        Self {
            parameter,
            size,
            value,
        }
    }

    pub fn parameter(&self) -> u8 {
        self.parameter
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationReport {
    grouping: u8,
    max_nodes: u8,
    reports_to_follow: u8,
    nodes: Vec<u8>,
}

impl AssociationReport {
    pub fn new(grouping: u8, max_nodes: u8, reports_to_follow: u8, nodes: Vec<u8>) -> Self {
        Self {
            grouping,
            max_nodes,
            reports_to_follow,
            nodes,
        }
    }

    pub fn grouping(&self) -> u8 {
        self.grouping
    }

    pub fn max_nodes(&self) -> u8 {
        self.max_nodes
    }

    pub fn reports_to_follow(&self) -> u8 {
        self.reports_to_follow
    }

    pub fn nodes(&self) -> &[u8] {
        &self.nodes
    }
}

/// Extended fields sent by notification v3+ devices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDetails {
    status: u8,
    notification_type: u8,
    event: u8,
    params: Vec<u8>,
    sequence: Option<u8>,
}

impl NotificationDetails {
    pub fn new(status: u8, notification_type: u8, event: u8, params: Vec<u8>) -> Self {
        Self {
            status,
            notification_type,
            event,
            params,
            sequence: None,
        }
    }

    /// Attach the v4+ sequence number
    pub fn with_sequence(mut self, sequence: u8) -> Self {
        self.sequence = Some(sequence);
        self
    }

    pub fn status(&self) -> u8 {
        self.status
    }

    pub fn notification_type(&self) -> u8 {
        self.notification_type
    }

    pub fn event(&self) -> u8 {
        self.event
    }

    pub fn params(&self) -> &[u8] {
        &self.params
    }

    pub fn sequence(&self) -> Option<u8> {
        self.sequence
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationReport {
    alarm_type: u8,
    alarm_level: u8,
    details: Option<NotificationDetails>,
}

impl NotificationReport {
    pub fn new(alarm_type: u8, alarm_level: u8, details: Option<NotificationDetails>) -> Self {
        Self {
            alarm_type,
            alarm_level,
            details,
        }
    }

    pub fn alarm_type(&self) -> u8 {
        self.alarm_type
    }

    pub fn alarm_level(&self) -> u8 {
        self.alarm_level
    }

    pub fn details(&self) -> Option<&NotificationDetails> {
        self.details.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_identity() {
        let report = Entity::VersionReport(VersionReport::new(1, 4, vec![0x0201]));
        assert_eq!(report.identity(), CommandIdentity::new(0x86, 0x12));
        assert_eq!(
            Entity::WakeUpNotification.identity(),
            CommandIdentity::new(0x84, 0x07)
        );
    }

    #[test]
    fn test_sensor_value_precision() {
        let report = SensorMultilevelReport::new(0x01, 0, 1, 215);
        assert!((report.value() - 21.5).abs() < f64::EPSILON);

        let report = SensorMultilevelReport::new(0x01, 0, 0, -3);
        assert!((report.value() + 3.0).abs() < f64::EPSILON);
    }
}
