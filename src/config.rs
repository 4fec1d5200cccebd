//! Agent configuration with environment overrides

use anyhow::{bail, Context, Result};
use std::time::Duration;
use zwave_protocol::timing;

pub const ENV_SERIAL_PORT: &str = "ZW_SERIAL_PORT";
pub const ENV_BAUD_RATE: &str = "ZW_BAUD_RATE";
pub const ENV_TCP_ADDR: &str = "ZW_TCP_ADDR";
pub const ENV_FORWARD_TIMEOUT_MS: &str = "ZW_FORWARD_TIMEOUT_MS";
pub const ENV_QUEUE_CAPACITY: &str = "ZW_QUEUE_CAPACITY";

/// Z-Wave controller sticks run the Serial API at 115200 baud
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Where the controller's Serial API byte stream comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// Local controller stick (e.g., "/dev/ttyACM0")
    Serial { path: String, baud_rate: u32 },
    /// Remote stick exposed through a TCP serial bridge (e.g., ser2net)
    Tcp { address: String },
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig::Serial {
            path: "/dev/ttyACM0".into(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub transport: TransportConfig,
    /// Bounded wait when handing an update to the capability model
    pub forward_timeout: Duration,
    /// Capacity of the queue feeding the capability model
    pub queue_capacity: usize,
    /// Delay before reopening a lost transport
    pub reconnect_delay: Duration,
    /// Interval between statistics log lines
    pub stats_interval: Duration,
    pub read_buffer_size: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            forward_timeout: Duration::from_millis(timing::FORWARD_TIMEOUT_MS),
            queue_capacity: 256,
            reconnect_delay: Duration::from_millis(timing::RECONNECT_DELAY_MS),
            stats_interval: Duration::from_millis(timing::STATS_INTERVAL_MS),
            read_buffer_size: 1024,
        }
    }
}

impl AgentConfig {
    /// Defaults overlaid with `ZW_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        match (lookup(ENV_SERIAL_PORT), lookup(ENV_TCP_ADDR)) {
            (Some(_), Some(_)) => {
                bail!("{ENV_SERIAL_PORT} and {ENV_TCP_ADDR} are mutually exclusive")
            }
            (Some(path), None) => {
                let baud_rate = match lookup(ENV_BAUD_RATE) {
                    Some(raw) => raw
                        .parse()
                        .with_context(|| format!("invalid {ENV_BAUD_RATE}: {raw}"))?,
                    None => DEFAULT_BAUD_RATE,
                };
                config.transport = TransportConfig::Serial { path, baud_rate };
            }
            (None, Some(address)) => {
                config.transport = TransportConfig::Tcp { address };
            }
            (None, None) => {}
        }

        if let Some(raw) = lookup(ENV_FORWARD_TIMEOUT_MS) {
            let ms: u64 = raw
                .parse()
                .with_context(|| format!("invalid {ENV_FORWARD_TIMEOUT_MS}: {raw}"))?;
            if ms == 0 {
                bail!("{ENV_FORWARD_TIMEOUT_MS} must be greater than zero");
            }
            config.forward_timeout = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup(ENV_QUEUE_CAPACITY) {
            let capacity: usize = raw
                .parse()
                .with_context(|| format!("invalid {ENV_QUEUE_CAPACITY}: {raw}"))?;
            if capacity == 0 {
                bail!("{ENV_QUEUE_CAPACITY} must be greater than zero");
            }
            config.queue_capacity = capacity;
        }

        Ok(config)
    }
}
