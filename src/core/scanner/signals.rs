// src/core/scanner/signals.rs

use super::banner_scanner::run_banner_scan;
use super::port_scanner::run_port_scan;
use super::ssl_scanner::run_ssl_scan;
use crate::core::config::ScanConfig;
use crate::core::fetcher::Fetcher;
use crate::core::models::{AdvancedSignals, CheckResult};
use crate::core::target::Target;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use std::net::IpAddr;
use tracing::{debug, info, warn};

/// Resolves the target host once; IP literals are used as-is.
async fn resolve_host(host: &str) -> CheckResult<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
    let lookup = resolver
        .lookup_ip(host)
        .await
        .map_err(|e| format!("DNS Error: {}", e))?;
    lookup
        .iter()
        .next()
        .ok_or_else(|| format!("No address found for {}", host))
}

/// Port sweep, TLS inspection and server banner, one after the other.
///
/// Each check falls back to its own sentinel; none of them can abort the others.
pub async fn collect_advanced_signals<F: Fetcher + ?Sized>(
    fetcher: &F,
    target: &Target,
    config: &ScanConfig,
) -> AdvancedSignals {
    info!(host = target.host(), "Starting advanced signal collection.");

    let addr = match resolve_host(target.host()).await {
        Ok(addr) => {
            debug!(host = target.host(), %addr, "Host resolved.");
            Some(addr)
        }
        Err(e) => {
            warn!(host = target.host(), error = %e, "Host resolution failed.");
            None
        }
    };

    let open_ports = match addr {
        Some(addr) => run_port_scan(addr, &config.ports, config.port_timeout).await,
        None => Vec::new(),
    };
    let ssl_check = run_ssl_scan(target.host(), addr, config.tls_port, config.tls_timeout).await;
    let server_info = run_banner_scan(fetcher, target, config.banner_timeout).await;

    info!(
        open_ports = open_ports.len(),
        tls_valid = ssl_check.valid,
        server = %server_info.server,
        "Advanced signal collection finished."
    );
    AdvancedSignals {
        open_ports,
        ssl_check,
        server_info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ip_literals_skip_dns() {
        assert_eq!(resolve_host("127.0.0.1").await, Ok("127.0.0.1".parse().unwrap()));
        assert_eq!(resolve_host("::1").await, Ok("::1".parse().unwrap()));
    }
}
