//! Per-node device models and the entity-to-attribute mapping

use super::attributes::{AttributeValue, Model, ATTR_ADDRESS, ATTR_LOW_BATTERY};
use crate::command::ModelUpdate;
use std::collections::HashMap;
use zwave_protocol::commands::sensor_multilevel::{
    SENSOR_TYPE_HUMIDITY, SENSOR_TYPE_LUMINANCE, SENSOR_TYPE_TEMPERATURE,
};
use zwave_protocol::{now_ms, BatteryLevel, Entity, SwitchState};

/// Device models keyed by Z-Wave node id
#[derive(Debug, Default)]
pub struct DeviceModels {
    devices: HashMap<u8, Model>,
}

impl DeviceModels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node_id: u8) -> Option<&Model> {
        self.devices.get(&node_id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Number of devices whose model satisfies `predicate`
    pub fn count_matching(&self, predicate: impl Fn(Option<&Model>) -> bool) -> usize {
        self.devices.values().filter(|model| predicate(Some(model))).count()
    }

    /// Apply an update, returning the names of the attributes it set
    pub fn apply(&mut self, update: &ModelUpdate) -> Vec<String> {
        let node_id = update.origin.node_id;
        let model = self.devices.entry(node_id).or_insert_with(|| {
            let mut model = Model::new();
            model.add_capability("base");
            model.set_attribute(ATTR_ADDRESS, AttributeValue::Str(format!("DRIV:ZW:{node_id}")));
            model
        });

        let mut changes = Changes { model, names: Vec::new() };
        apply_entity(&mut changes, &update.entity);
        changes.names
    }
}

struct Changes<'a> {
    model: &'a mut Model,
    names: Vec<String>,
}

impl Changes<'_> {
    fn set(&mut self, name: impl Into<String>, value: AttributeValue) {
        let name = name.into();
        self.model.set_attribute(name.clone(), value);
        self.names.push(name);
    }

    fn cap(&mut self, namespace: &str) {
        self.model.add_capability(namespace);
    }
}

fn apply_entity(changes: &mut Changes<'_>, entity: &Entity) {
    use AttributeValue::*;

    match entity {
        Entity::VersionReport(report) => {
            changes.cap("devadv");
            changes.set("devadv:zwLibraryType", Int(report.library_type() as i64));
            changes.set(
                "devadv:zwProtocolVersion",
                Int(report.protocol_version() as i64),
            );
            if let Some(primary) = report.firmware_versions().first() {
                changes.set(
                    "devadv:firmwareVersion",
                    Str(format!("{}.{}", primary >> 8, primary & 0xFF)),
                );
            }
            changes.set(
                "devadv:firmwareVersions",
                IntList(report.firmware_versions().iter().map(|&v| v as i64).collect()),
            );
        }
        Entity::VersionCommandClassReport(report) => {
            changes.cap("devadv");
            changes.set(
                format!("devadv:zwClassVersion:{:02x}", report.requested_class()),
                Int(report.class_version() as i64),
            );
        }
        Entity::BasicReport(report) => {
            changes.cap("basic");
            changes.set("basic:value", Int(report.current_value() as i64));
        }
        Entity::BinarySwitchReport(report) => {
            let state = match report.current_value() {
                SwitchState::On => "ON",
                SwitchState::Off => "OFF",
                SwitchState::Unknown => return,
            };
            changes.cap("swit");
            changes.set("swit:state", Str(state.into()));
        }
        Entity::BatteryReport(report) => {
            changes.cap("devpow");
            match report.level() {
                BatteryLevel::Percent(percent) => {
                    changes.set("devpow:battery", Int(percent as i64));
                    changes.set(ATTR_LOW_BATTERY, Bool(false));
                }
                BatteryLevel::LowWarning => {
                    changes.set(ATTR_LOW_BATTERY, Bool(true));
                }
            }
        }
        Entity::ManufacturerSpecificReport(report) => {
            changes.cap("dev");
            changes.set("dev:vendorId", Int(report.manufacturer_id() as i64));
            changes.set("dev:productTypeId", Int(report.product_type_id() as i64));
            changes.set("dev:productId", Int(report.product_id() as i64));
        }
        Entity::SensorMultilevelReport(report) => match report.sensor_type() {
            SENSOR_TYPE_TEMPERATURE => {
                // Scale 1 is Fahrenheit; the model stores Celsius
                let celsius = if report.scale() == 1 {
                    (report.value() - 32.0) * 5.0 / 9.0
                } else {
                    report.value()
                };
                changes.cap("temp");
                changes.set("temp:temperature", Float(celsius));
            }
            SENSOR_TYPE_HUMIDITY => {
                changes.cap("humid");
                changes.set("humid:humidity", Float(report.value()));
            }
            SENSOR_TYPE_LUMINANCE => {
                changes.cap("illum");
                changes.set("illum:illuminance", Float(report.value()));
            }
            other => {
                changes.cap("sensor");
                changes.set(format!("sensor:level:{other:02x}"), Float(report.value()));
            }
        },
        Entity::ConfigurationReport(report) => {
            changes.cap("zwcfg");
            changes.set(
                format!("zwcfg:param:{}", report.parameter()),
                Int(report.value() as i64),
            );
        }
        Entity::AssociationReport(report) => {
            changes.cap("zwassoc");
            changes.set(
                format!("zwassoc:group:{}", report.grouping()),
                IntList(report.nodes().iter().map(|&n| n as i64).collect()),
            );
        }
        Entity::WakeUpNotification => {
            changes.cap("wkup");
            changes.set("wkup:lastWakeup", Int(now_ms() as i64));
        }
        Entity::NotificationReport(report) => match report.details() {
            Some(details) => {
                changes.cap("notif");
                changes.set("notif:type", Int(details.notification_type() as i64));
                changes.set("notif:event", Int(details.event() as i64));
            }
            None => {
                changes.cap("alarm");
                changes.set("alarm:type", Int(report.alarm_type() as i64));
                changes.set("alarm:level", Int(report.alarm_level() as i64));
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::predicate::is_a;
    use zwave_protocol::{
        BatteryReport, BinarySwitchReport, DecodeContext, SensorMultilevelReport, VersionReport,
    };

    fn update(node_id: u8, entity: Entity) -> ModelUpdate {
        ModelUpdate::new(DecodeContext::new(node_id, 1), entity)
    }

    #[test]
    fn test_version_report_sets_firmware() {
        let mut devices = DeviceModels::new();
        let changed = devices.apply(&update(
            7,
            Entity::VersionReport(VersionReport::new(3, 4, vec![0x0201, 0x0105])),
        ));
        assert!(changed.contains(&"devadv:firmwareVersion".to_string()));

        let model = devices.get(7).unwrap();
        assert!(is_a("devadv")(Some(model)));
        assert_eq!(
            model.attribute("devadv:firmwareVersion"),
            Some(&AttributeValue::Str("2.1".into()))
        );
        assert_eq!(
            model.attribute("devadv:firmwareVersions"),
            Some(&AttributeValue::IntList(vec![0x0201, 0x0105]))
        );
        assert_eq!(
            model.attribute(ATTR_ADDRESS),
            Some(&AttributeValue::Str("DRIV:ZW:7".into()))
        );
    }

    #[test]
    fn test_updates_are_per_node() {
        let mut devices = DeviceModels::new();
        devices.apply(&update(
            2,
            Entity::BatteryReport(BatteryReport::new(BatteryLevel::Percent(40))),
        ));
        devices.apply(&update(
            3,
            Entity::BinarySwitchReport(BinarySwitchReport::new(SwitchState::On, None)),
        ));

        assert_eq!(devices.len(), 2);
        assert!(is_a("devpow")(devices.get(2)));
        assert!(!is_a("swit")(devices.get(2)));
        assert!(is_a("swit")(devices.get(3)));
        assert!(!is_a("swit")(devices.get(4)));
        assert_eq!(devices.count_matching(is_a("base")), 2);
        assert_eq!(devices.count_matching(is_a("devpow")), 1);
        assert_eq!(devices.count_matching(is_a("temp")), 0);
    }

    #[test]
    fn test_unknown_switch_state_changes_nothing() {
        let mut devices = DeviceModels::new();
        let changed = devices.apply(&update(
            5,
            Entity::BinarySwitchReport(BinarySwitchReport::new(SwitchState::Unknown, None)),
        ));
        assert!(changed.is_empty());
        assert!(!is_a("swit")(devices.get(5)));
    }

    #[test]
    fn test_fahrenheit_converted() {
        let mut devices = DeviceModels::new();
        // 77.0 F, precision 1
        devices.apply(&update(
            6,
            Entity::SensorMultilevelReport(SensorMultilevelReport::new(
                SENSOR_TYPE_TEMPERATURE,
                1,
                1,
                770,
            )),
        ));
        let Some(AttributeValue::Float(celsius)) = devices.get(6).unwrap().attribute("temp:temperature")
        else {
            panic!("temperature not set");
        };
        assert!((celsius - 25.0).abs() < 1e-9);
    }
}
