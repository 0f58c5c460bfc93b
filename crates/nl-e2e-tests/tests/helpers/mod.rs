//! Shared test harness for E2E integration tests.
//!
//! Everything goes through the public `Resolver` API with the builtin
//! catalog and policy, the same way the binary wires them.

use nl_engine::{CommandCatalog, Resolver, SafetyPolicy};
use nl_protocol::{Platform, ResolveError, ResolvedCommand};

pub fn resolver() -> Resolver {
    Resolver::new(CommandCatalog::builtin(), SafetyPolicy::builtin())
}

pub fn on_windows(query: &str) -> Result<ResolvedCommand, ResolveError> {
    resolver().resolve(query, Platform::Windows)
}

pub fn on_linux(query: &str) -> Result<ResolvedCommand, ResolveError> {
    resolver().resolve(query, Platform::Linux)
}
