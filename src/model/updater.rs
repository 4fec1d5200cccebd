//! Queue between the dispatcher and the device models

use super::attributes::{AttributeValue, ATTR_LOW_BATTERY};
use super::devices::DeviceModels;
use super::predicate::attribute_equals;
use crate::command::{CapabilitySink, ForwardError, ModelUpdate};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

/// Capability sink backed by a bounded channel
///
/// A full channel makes `forward` wait; the dispatcher's timeout bounds it.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<ModelUpdate>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<ModelUpdate>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl CapabilitySink for ChannelSink {
    async fn forward(&self, update: ModelUpdate) -> Result<(), ForwardError> {
        self.tx.send(update).await.map_err(|_| ForwardError::Closed)
    }
}

/// Drains forwarded updates into the device models
pub struct ModelUpdater {
    devices: Arc<RwLock<DeviceModels>>,
}

impl ModelUpdater {
    pub fn new() -> Self {
        Self {
            devices: Arc::new(RwLock::new(DeviceModels::new())),
        }
    }

    /// Shared view of the device models for readers
    pub fn devices(&self) -> Arc<RwLock<DeviceModels>> {
        self.devices.clone()
    }

    /// Apply updates in arrival order until every sender is dropped
    pub async fn run(self, mut rx: mpsc::Receiver<ModelUpdate>) {
        let low_battery = attribute_equals(ATTR_LOW_BATTERY, AttributeValue::Bool(true));

        while let Some(update) = rx.recv().await {
            let node_id = update.origin.node_id;
            let mut devices = self.devices.write().await;
            let changed = devices.apply(&update);
            debug!(
                "Node {} {}: updated {:?}",
                node_id,
                update.entity.identity(),
                changed
            );
            if changed.iter().any(|name| name == ATTR_LOW_BATTERY) && low_battery(devices.get(node_id)) {
                warn!("Node {} reports low battery", node_id);
            }
        }
        info!("Model update queue closed");
    }
}

impl Default for ModelUpdater {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use zwave_protocol::{BatteryLevel, BatteryReport, DecodeContext, Entity};

    fn battery(node_id: u8, percent: u8) -> ModelUpdate {
        ModelUpdate::new(
            DecodeContext::new(node_id, 1),
            Entity::BatteryReport(BatteryReport::new(BatteryLevel::Percent(percent))),
        )
    }

    #[tokio::test]
    async fn test_updates_applied_in_order() {
        let (tx, rx) = mpsc::channel(8);
        let updater = ModelUpdater::new();
        let devices = updater.devices();
        let handle = tokio::spawn(updater.run(rx));

        let sink = ChannelSink::new(tx);
        for percent in [90, 80, 70] {
            sink.forward(battery(4, percent)).await.unwrap();
        }
        drop(sink);
        handle.await.unwrap();

        let devices = devices.read().await;
        assert_eq!(
            devices.get(4).unwrap().attribute("devpow:battery"),
            Some(&AttributeValue::Int(70))
        );
    }

    #[tokio::test]
    async fn test_low_battery_warning_flags_device() {
        let (tx, rx) = mpsc::channel(8);
        let updater = ModelUpdater::new();
        let devices = updater.devices();
        let handle = tokio::spawn(updater.run(rx));

        let sink = ChannelSink::new(tx);
        sink.forward(battery(6, 15)).await.unwrap();
        sink.forward(ModelUpdate::new(
            DecodeContext::new(6, 1),
            Entity::BatteryReport(BatteryReport::new(BatteryLevel::LowWarning)),
        ))
        .await
        .unwrap();
        drop(sink);
        handle.await.unwrap();

        let devices = devices.read().await;
        let low_battery = attribute_equals(ATTR_LOW_BATTERY, AttributeValue::Bool(true));
        assert!(low_battery(devices.get(6)));
        // The last percentage survives the warning
        assert_eq!(
            devices.get(6).unwrap().attribute("devpow:battery"),
            Some(&AttributeValue::Int(15))
        );
        assert_eq!(devices.count_matching(&low_battery), 1);
    }

    #[tokio::test]
    async fn test_full_queue_blocks_and_closed_queue_errors() {
        let (tx, rx) = mpsc::channel(1);
        let sink = ChannelSink::new(tx);

        sink.forward(battery(1, 10)).await.unwrap();
        // Nobody drains the queue, so the second send waits
        let blocked = tokio::time::timeout(Duration::from_millis(20), sink.forward(battery(1, 20))).await;
        assert!(blocked.is_err());

        drop(rx);
        assert_eq!(sink.forward(battery(1, 30)).await, Err(ForwardError::Closed));
    }
}
