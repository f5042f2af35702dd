// src/core/mod.rs

// The scanning engine. Nothing in here touches the terminal; the UI consumes
// the `ScanReport` it produces.

/// Scan tunables and their environment overrides.
pub mod config;

/// The single HTTP capability every check goes through.
pub mod fetcher;

/// Static explanations and remediation advice for each finding kind.
pub mod knowledge_base;

/// Data structures shared across the engine and the UI, such as `Finding`
/// and `ScanReport`.
pub mod models;

/// JSON export and the plain-text executive summary.
pub mod report;

/// Crawler, probe scheduler, header audit, advanced signals and the session
/// orchestration that ties them together.
pub mod scanner;

/// Pure scoring of findings and signals.
pub mod scoring;

pub mod target;
