// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

// --- Reusable Result Types ---

// Result of a best-effort check: the value on success, a readable reason otherwise.
pub type CheckResult<T> = Result<T, String>;

// --- Core Data Models ---

/// Severity of a finding, ordered from least to most severe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// The closed set of injection classes every surface is probed for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VulnClass {
    Sql,
    Xss,
    Traversal,
    Command,
}

/// What a finding reports. Serialized as the human-readable `type` field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
pub enum FindingKind {
    #[serde(rename = "SQL Injection")]
    #[strum(serialize = "SQL Injection")]
    SqlInjection,
    #[serde(rename = "Cross-Site Scripting (XSS)")]
    #[strum(serialize = "Cross-Site Scripting (XSS)")]
    CrossSiteScripting,
    #[serde(rename = "Directory Traversal")]
    #[strum(serialize = "Directory Traversal")]
    DirectoryTraversal,
    #[serde(rename = "Command Injection")]
    #[strum(serialize = "Command Injection")]
    CommandInjection,
    #[serde(rename = "Missing Security Header")]
    #[strum(serialize = "Missing Security Header")]
    MissingSecurityHeader,
}

/// A single detected vulnerability indication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub url: String,
    pub payload: String,
    pub severity: Severity,
    pub description: String,
}

impl Finding {
    pub fn new(kind: FindingKind, url: &str, payload: &str, severity: Severity, description: String) -> Self {
        Self {
            kind,
            url: url.to_string(),
            payload: payload.to_string(),
            severity,
            description,
        }
    }
}

// --- Advanced Signal Models ---

/// A port that accepted a TCP connection during the sweep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenPort {
    pub port: u16,
    pub service: String,
}

/// Certificate summary of the target's TLS endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TlsInfo {
    pub valid: bool,
    pub issuer: String,
    pub expiration: String,
}

impl TlsInfo {
    pub const UNKNOWN_ISSUER: &'static str = "Unknown";
    pub const UNKNOWN_EXPIRATION: &'static str = "N/A";

    /// The sentinel used whenever the handshake or certificate parsing fails.
    pub fn unknown() -> Self {
        Self {
            valid: false,
            issuer: Self::UNKNOWN_ISSUER.to_string(),
            expiration: Self::UNKNOWN_EXPIRATION.to_string(),
        }
    }
}

impl Default for TlsInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

/// The `Server` banner returned by the target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerInfo {
    pub server: String,
}

impl ServerInfo {
    pub const UNDETECTED: &'static str = "Undetected";

    pub fn undetected() -> Self {
        Self { server: Self::UNDETECTED.to_string() }
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self::undetected()
    }
}

/// Signals collected independently of the probe phase. Each field falls back
/// to its own sentinel, so one failing check never hides the others.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AdvancedSignals {
    pub open_ports: Vec<OpenPort>,
    pub ssl_check: TlsInfo,
    pub server_info: ServerInfo,
}

// --- Main Report ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Performance {
    pub urls_scanned: usize,
    pub threads_used: usize,
    pub average_time_per_url: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvancedAnalysis {
    #[serde(flatten)]
    pub signals: AdvancedSignals,
    pub security_score: u8,
}

/// The terminal aggregate of one scan session. Built once, read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanReport {
    pub target: String,
    pub scan_date: DateTime<Utc>,
    pub scan_duration_seconds: f64,
    pub target_reachable: bool,
    pub total_vulnerabilities: usize,
    pub vulnerabilities: Vec<Finding>,
    pub crawled_urls: Vec<String>,
    pub forms_found: Vec<String>,
    pub performance: Performance,
    pub advanced_analysis: AdvancedAnalysis,
}

// --- Progress ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ScanPhase {
    #[default]
    #[strum(serialize = "Starting")]
    Starting,
    #[strum(serialize = "Crawling")]
    Crawling,
    #[strum(serialize = "Probing")]
    Probing,
    #[strum(serialize = "Advanced analysis")]
    Signals,
    #[strum(serialize = "Done")]
    Done,
}

/// Observational progress published while a scan runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanProgress {
    pub phase: ScanPhase,
    pub completed: usize,
    pub total: usize,
}

impl ScanProgress {
    pub fn percent(&self) -> u16 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100) / self.total).min(100) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finding_serializes_with_type_and_uppercase_severity() {
        let finding = Finding::new(
            FindingKind::SqlInjection,
            "http://example.test/login",
            "' OR '1'='1",
            Severity::High,
            "SQL error detected in response".to_string(),
        );
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["type"], "SQL Injection");
        assert_eq!(json["severity"], "HIGH");
        assert_eq!(json["url"], "http://example.test/login");
    }

    #[test]
    fn advanced_analysis_flattens_signals() {
        let analysis = AdvancedAnalysis {
            signals: AdvancedSignals::default(),
            security_score: 85,
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["ssl_check"]["valid"], false);
        assert_eq!(json["ssl_check"]["expiration"], "N/A");
        assert_eq!(json["server_info"]["server"], "Undetected");
        assert_eq!(json["security_score"], 85);
        assert!(json["open_ports"].as_array().unwrap().is_empty());
    }

    #[test]
    fn progress_percent_handles_empty_totals() {
        assert_eq!(ScanProgress::default().percent(), 0);
        let progress = ScanProgress { phase: ScanPhase::Probing, completed: 5, total: 20 };
        assert_eq!(progress.percent(), 25);
    }
}
