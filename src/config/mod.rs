use crate::{ENV_DYNAMODB_ENDPOINT_URL, ENV_INTERVAL_SECS, ENV_STREAM_ARN, ENV_TABLE};

use std::env;
use tokio::time::Duration;

const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Environment-driven configuration for the binaries. Library users set the
/// same values through [`crate::SubscriberBuilder`] instead.
#[derive(Debug)]
pub struct Config {
    endpoint_url: Option<String>,
    stream_arn: Option<String>,
    table: Option<String>,
    interval: Duration,
}

impl Config {
    pub fn new() -> Self {
        let endpoint_url = env::var(ENV_DYNAMODB_ENDPOINT_URL).ok();
        let stream_arn = env::var(ENV_STREAM_ARN).ok();
        let table = env::var(ENV_TABLE).ok();
        let secs = env::var(ENV_INTERVAL_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_INTERVAL_SECS);

        Self {
            endpoint_url,
            stream_arn,
            table,
            interval: Duration::from_secs(secs),
        }
    }

    pub fn endpoint_url(&self) -> Option<String> {
        self.endpoint_url.clone()
    }

    pub fn stream_arn(&self) -> Option<String> {
        self.stream_arn.clone()
    }

    pub fn table(&self) -> Option<String> {
        self.table.clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}
