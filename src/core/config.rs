// src/core/config.rs

use crate::logging::PROJECT_NAME;
use std::time::Duration;
use tracing::{debug, warn};

pub const MIN_WORKERS: usize = 1;
pub const MAX_WORKERS: usize = 10;

/// Well-known ports checked by the sweep, with the label reported for each.
pub const COMMON_PORTS: &[(u16, &str)] = &[
    (21, "FTP"),
    (22, "SSH"),
    (23, "Telnet"),
    (25, "SMTP"),
    (53, "DNS"),
    (80, "HTTP"),
    (110, "POP3"),
    (143, "IMAP"),
    (443, "HTTPS"),
    (3306, "MySQL"),
    (8080, "HTTP-ALT"),
];

/// Tunables for a scan session.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub max_depth: usize,
    pub workers: usize,
    pub crawl_timeout: Duration,
    /// Wall-clock ceiling for the whole crawl phase.
    pub crawl_budget: Duration,
    pub probe_timeout: Duration,
    pub header_timeout: Duration,
    pub banner_timeout: Duration,
    pub tls_timeout: Duration,
    pub port_timeout: Duration,
    pub tls_port: u16,
    pub ports: Vec<(u16, String)>,
    pub progress_interval: usize,
    pub user_agent: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            workers: 5,
            crawl_timeout: Duration::from_secs(5),
            crawl_budget: Duration::from_secs(120),
            probe_timeout: Duration::from_secs(3),
            header_timeout: Duration::from_secs(3),
            banner_timeout: Duration::from_secs(3),
            tls_timeout: Duration::from_secs(3),
            port_timeout: Duration::from_millis(500),
            tls_port: 443,
            ports: COMMON_PORTS.iter().map(|(p, s)| (*p, s.to_string())).collect(),
            progress_interval: 10,
            user_agent: format!("VanguardProbe/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ScanConfig {
    /// Builds the default configuration and applies `<PROJECT>_WORKERS` and
    /// `<PROJECT>_MAX_DEPTH` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let workers_key = format!("{}_WORKERS", PROJECT_NAME.as_str());
        if let Some(raw) = lookup(&workers_key) {
            match raw.trim().parse::<usize>() {
                Ok(workers) => config = config.with_workers(workers),
                Err(e) => warn!(key = %workers_key, value = %raw, error = %e, "Ignoring invalid worker count."),
            }
        }

        let depth_key = format!("{}_MAX_DEPTH", PROJECT_NAME.as_str());
        if let Some(raw) = lookup(&depth_key) {
            match raw.trim().parse::<usize>() {
                Ok(depth) => config.max_depth = depth,
                Err(e) => warn!(key = %depth_key, value = %raw, error = %e, "Ignoring invalid crawl depth."),
            }
        }

        debug!(workers = config.workers, max_depth = config.max_depth, "Scan configuration loaded.");
        config
    }

    /// Sets the worker pool size, clamped to the supported range.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(MIN_WORKERS, MAX_WORKERS);
        self
    }
}
