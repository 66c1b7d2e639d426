use serde::Deserialize;

use crate::poller::DEFAULT_INTERVAL_MS;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub device: DeviceConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Gateway web server root, e.g. `http://192.168.1.100`.
    pub base_url: String,
    /// Per-request timeout applied by the HTTP client.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_request_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Stop polling while no dashboard viewer is connected.
    #[serde(default = "default_pause_when_hidden")]
    pub pause_when_hidden: bool,
    /// How often to log poller stats at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
    /// Delay between a manual read request and the refresh that shows its result.
    #[serde(default = "default_manual_read_refresh_delay_ms")]
    pub manual_read_refresh_delay_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            pause_when_hidden: default_pause_when_hidden(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
            manual_read_refresh_delay_ms: default_manual_read_refresh_delay_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

fn default_pause_when_hidden() -> bool {
    true
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

fn default_manual_read_refresh_delay_ms() -> u64 {
    500
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(
            self.device.base_url.starts_with("http://")
                || self.device.base_url.starts_with("https://"),
            "device.base_url must start with http:// or https://, got {:?}",
            self.device.base_url
        );
        anyhow::ensure!(
            self.device.request_timeout_ms > 0,
            "device.request_timeout_ms must be > 0, got {}",
            self.device.request_timeout_ms
        );
        anyhow::ensure!(
            self.polling.interval_ms > 0,
            "polling.interval_ms must be > 0, got {}",
            self.polling.interval_ms
        );
        anyhow::ensure!(
            self.polling.stats_log_interval_secs > 0,
            "polling.stats_log_interval_secs must be > 0, got {}",
            self.polling.stats_log_interval_secs
        );
        Ok(())
    }
}
