//! Backend settings and the resolved session configuration.
//!
//! [`BackendSettings`] is what external configuration holds: possibly
//! incomplete, every field defaulted. [`BackendSettings::locate`] is the one
//! place it turns into a [`SessionConfig`], and existence of a
//! `SessionConfig` is the proof that an executable path was configured.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// The settings key users see in the "missing setting" notice.
pub const EXECUTABLE_PATH_SETTING: &str = "bond.bondExecutablePath";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    #[error("Could not start bond language server due to missing setting: {EXECUTABLE_PATH_SETTING}")]
    MissingExecutablePath,
}

/// How much of the RPC traffic to log, mirrored to the server via `$/setTrace`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Off,
    Messages,
    #[default]
    Verbose,
}

impl TraceLevel {
    /// Wire value for `$/setTrace`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Messages => "messages",
            Self::Verbose => "verbose",
        }
    }

    #[must_use]
    pub fn logs_messages(self) -> bool {
        !matches!(self, Self::Off)
    }

    #[must_use]
    pub fn logs_bodies(self) -> bool {
        matches!(self, Self::Verbose)
    }
}

/// Recovery used by the non-fail-fast policy when the server reports errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecoverySettings {
    /// Errors tolerated (the transport keeps running) before giving up.
    pub error_tolerance: u32,
    /// Past the tolerance, restart the server instead of shutting down.
    pub restart_on_error: bool,
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            error_tolerance: 3,
            restart_on_error: false,
        }
    }
}

/// Invocation options passed through to the spawned backend.
///
/// The mapping is opaque; the typed getters cover the keys the stdio
/// transport understands and return `None` for absent or ill-typed values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct InvocationOptions(BTreeMap<String, Value>);

impl InvocationOptions {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Run the executable through the platform shell. On unless set to
    /// `false`, so a path like `bond-ls --stdio` works as written.
    #[must_use]
    pub fn shell(&self) -> bool {
        self.get("shell").and_then(Value::as_bool).unwrap_or(true)
    }

    #[must_use]
    pub fn args(&self) -> Vec<String> {
        self.get("args")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn cwd(&self) -> Option<&str> {
        self.get("cwd").and_then(Value::as_str)
    }

    #[must_use]
    pub fn env(&self) -> Vec<(String, String)> {
        self.get("env")
            .and_then(Value::as_object)
            .map(|vars| {
                vars.iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Raw backend settings as read from external configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    #[serde(alias = "bondExecutablePath", alias = "executablePath")]
    pub executable_path: Option<String>,
    #[serde(alias = "failFast")]
    pub fail_fast: bool,
    pub options: InvocationOptions,
    pub trace: TraceLevel,
    pub recovery: RecoverySettings,
}

impl BackendSettings {
    /// Resolve the settings into a session configuration.
    ///
    /// A blank executable path counts as missing.
    pub fn locate(&self) -> Result<SessionConfig, LocateError> {
        let executable_path = self
            .executable_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(LocateError::MissingExecutablePath)?;

        Ok(SessionConfig {
            executable_path: executable_path.to_string(),
            options: self.options.clone(),
            fail_fast: self.fail_fast,
            trace: self.trace,
            recovery: self.recovery,
        })
    }
}

/// Immutable configuration of one client session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    executable_path: String,
    options: InvocationOptions,
    fail_fast: bool,
    trace: TraceLevel,
    recovery: RecoverySettings,
}

impl SessionConfig {
    #[must_use]
    pub fn executable_path(&self) -> &str {
        &self.executable_path
    }

    #[must_use]
    pub fn options(&self) -> &InvocationOptions {
        &self.options
    }

    #[must_use]
    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    #[must_use]
    pub fn trace(&self) -> TraceLevel {
        self.trace
    }

    #[must_use]
    pub fn recovery(&self) -> RecoverySettings {
        self.recovery
    }
}
