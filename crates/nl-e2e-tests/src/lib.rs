//! End-to-end integration tests for the nl-shell workspace.
//!
//! This crate has no runtime code; the tests under `tests/` exercise
//! the full resolution path through the public APIs only.
