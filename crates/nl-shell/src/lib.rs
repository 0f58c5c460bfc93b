//! CLI front end for the resolution engine: config loading, feedback
//! logging, and human-readable output. The binary never executes the
//! commands it resolves; it prints them for the user to run.

pub mod config;
pub mod feedback;
pub mod report;
