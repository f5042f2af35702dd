// src/core/report.rs

use crate::core::models::ScanReport;
use chrono::Local;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const REPORT_FILE: &str = "scan_report.json";
pub const SUMMARY_FILE: &str = "executive_summary.txt";

/// Plain-text overview of a scan, suitable for sharing with non-specialists.
pub fn executive_summary(report: &ScanReport) -> String {
    let signals = &report.advanced_analysis.signals;
    let ports = if signals.open_ports.is_empty() {
        "None".to_string()
    } else {
        signals
            .open_ports
            .iter()
            .map(|p| format!("{} ({})", p.port, p.service))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut lines = vec![
        format!("Executive report for {}", report.target),
        format!("Overall score: {}/100", report.advanced_analysis.security_score),
        format!("Open ports detected: {}", ports),
        format!("Valid TLS certificate: {}", if signals.ssl_check.valid { "Yes" } else { "No" }),
        format!("Certificate issuer: {}", signals.ssl_check.issuer),
        format!("Server: {}", signals.server_info.server),
    ];
    if !report.target_reachable {
        lines.push("Warning: the target did not respond; results are not meaningful.".to_string());
    }
    lines.push(String::new());
    lines.push("Vulnerabilities detected:".to_string());

    if report.vulnerabilities.is_empty() {
        lines.push(" - No vulnerabilities detected.".to_string());
    } else {
        lines.extend(
            report
                .vulnerabilities
                .iter()
                .map(|v| format!(" - {} ({}) : {}", v.kind, v.severity, v.description)),
        );
    }
    lines.join("\n")
}

/// Writes the JSON report and the executive summary into a new timestamped
/// directory under `base_dir`, returning that directory.
pub fn export_report(report: &ScanReport, base_dir: &Path) -> Result<PathBuf> {
    let dir = base_dir.join(format!("scan_{}", Local::now().format("%Y%m%d_%H%M%S")));
    fs::create_dir_all(&dir).wrap_err_with(|| format!("creating {}", dir.display()))?;

    let json = serde_json::to_string_pretty(report).wrap_err("serializing scan report")?;
    fs::write(dir.join(REPORT_FILE), json).wrap_err("writing JSON report")?;
    fs::write(dir.join(SUMMARY_FILE), executive_summary(report)).wrap_err("writing executive summary")?;

    info!(dir = %dir.display(), "Report exported.");
    Ok(dir)
}
