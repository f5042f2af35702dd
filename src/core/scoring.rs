// src/core/scoring.rs

use crate::core::models::{Finding, Severity};

pub const MAX_SCORE: u8 = 100;
pub const OPEN_PORT_PENALTY: i64 = 2;
pub const TLS_INVALID_PENALTY: i64 = 15;

pub fn severity_penalty(severity: Severity) -> i64 {
    match severity {
        Severity::Critical => 40,
        Severity::High => 25,
        Severity::Medium => 10,
        Severity::Low => 5,
    }
}

/// Security score in `0..=100`. A pure function of its three inputs.
pub fn score(findings: &[Finding], open_port_count: usize, tls_valid: bool) -> u8 {
    let finding_penalty: i64 = findings.iter().map(|f| severity_penalty(f.severity)).sum();
    let port_penalty = open_port_count as i64 * OPEN_PORT_PENALTY;
    let tls_penalty = if tls_valid { 0 } else { TLS_INVALID_PENALTY };

    let raw = i64::from(MAX_SCORE) - finding_penalty - port_penalty - tls_penalty;
    raw.clamp(0, i64::from(MAX_SCORE)) as u8
}

/// Number of findings per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        findings.iter().fold(Self::default(), |mut counts, f| {
            match f.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}
