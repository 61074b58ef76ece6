//! Core domain types for the Bond language client.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod settings;

pub use settings::{
    BackendSettings, EXECUTABLE_PATH_SETTING, InvocationOptions, LocateError, RecoverySettings,
    SessionConfig, TraceLevel,
};

// ============================================================================
// Child process environment
// ============================================================================

/// Environment variable patterns never forwarded to a spawned backend.
///
/// Patterns are matched case-insensitively: `*_SUFFIX`, `PREFIX_*`,
/// `*_INFIX*`, or an exact name.
pub const ENV_SECRET_DENYLIST: &[&str] = &[
    "*_API_KEY",
    "*_SECRET*",
    "*_TOKEN",
    "*_PASSWORD",
    "*_CREDENTIAL*",
    "AWS_*",
    "GITHUB_TOKEN",
    "ANTHROPIC_API_KEY",
    "OPENAI_API_KEY",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denylist_patterns_are_uppercase() {
        for pattern in ENV_SECRET_DENYLIST {
            assert_eq!(*pattern, pattern.to_uppercase());
        }
    }
}
