// src/core/scanner/headers_scanner.rs

use crate::core::config::ScanConfig;
use crate::core::fetcher::{FetchMethod, FetchResponse, Fetcher};
use crate::core::models::{Finding, FindingKind, Severity};
use crate::core::target::Target;
use tracing::{debug, info, warn};

/// Security response headers whose absence is reported.
pub const TRACKED_HEADERS: &[&str] = &[
    "X-Frame-Options",
    "X-Content-Type-Options",
    "Strict-Transport-Security",
];

/// Checks whether a header is present in the response.
fn has_header(response: &FetchResponse, name: &str) -> bool {
    let present = response.header(name).is_some();
    debug!(header_name = name, present, "Checked header.");
    present
}

/// Audits the root target, and only the root target, for missing security headers.
///
/// Each absent header yields one LOW finding whose payload is the header name.
/// A failed request yields no findings.
pub async fn run_headers_scan<F: Fetcher + ?Sized>(fetcher: &F, target: &Target, config: &ScanConfig) -> Vec<Finding> {
    info!(target = target.url(), "Starting headers scan.");

    let response = match fetcher.fetch(target.url(), FetchMethod::Head, config.header_timeout).await {
        Ok(response) => {
            info!(status = response.status, "Received HTTP response for headers scan.");
            response
        }
        Err(e) => {
            warn!(url = target.url(), error = %e, "HEAD request failed, skipping headers scan.");
            return Vec::new();
        }
    };

    let findings: Vec<Finding> = TRACKED_HEADERS
        .iter()
        .filter(|name| !has_header(&response, name))
        .map(|name| {
            Finding::new(
                FindingKind::MissingSecurityHeader,
                target.url(),
                name,
                Severity::Low,
                format!("Missing security header: {}", name),
            )
        })
        .collect();

    info!(findings = findings.len(), "Headers scan finished.");
    findings
}
