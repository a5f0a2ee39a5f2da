//! Console configuration
//!
//! Read once at process start from environment variables. The tick
//! interval is fixed for the life of the process; views share one timer at
//! whatever cadence is configured here.

use std::time::Duration;

/// Default shared-timer tick period
const DEFAULT_TICK_INTERVAL_MS: u64 = 15_000;

/// Console configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Engine base URL (e.g., "http://localhost:8080")
    pub engine_url: String,

    /// Shared timer tick period for all dashboard feeds
    pub tick_interval: Duration,

    /// Per-request deadline applied to every engine call
    pub request_timeout: Duration,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - FLOWDECK_ENGINE_URL (optional, default: http://localhost:8080)
    /// - FLOWDECK_TIMER_INTERVAL_MS (optional, default: 15000; absent,
    ///   unparsable or zero values fall back to the default)
    pub fn from_env() -> Self {
        let engine_url = std::env::var("FLOWDECK_ENGINE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        let tick_interval = tick_interval_from(
            std::env::var("FLOWDECK_TIMER_INTERVAL_MS")
                .ok()
                .as_deref(),
        );

        Self {
            engine_url,
            tick_interval,
            request_timeout: flowdeck_client::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.engine_url.is_empty() {
            anyhow::bail!("engine_url cannot be empty");
        }

        if !self.engine_url.starts_with("http://") && !self.engine_url.starts_with("https://") {
            anyhow::bail!("engine_url must start with http:// or https://");
        }

        if self.tick_interval.is_zero() {
            anyhow::bail!("tick_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine_url: "http://localhost:8080".to_string(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            request_timeout: flowdeck_client::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Parses a raw interval value, falling back to the default when it is
/// absent, unparsable or zero
fn tick_interval_from(raw: Option<&str>) -> Duration {
    let millis = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|millis| *millis > 0)
        .unwrap_or(DEFAULT_TICK_INTERVAL_MS);

    Duration::from_millis(millis)
}
