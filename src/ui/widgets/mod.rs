// src/ui/widgets/mod.rs

pub mod analysis_view; // Findings list and per-finding details.
pub mod disclaimer_popup;
pub mod footer;
pub mod input;
pub mod summary; // Score, severity counts and advanced signals.
