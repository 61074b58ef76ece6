//! Configuration loading for the Bond language client.
//!
//! Reads `~/.bond/config.toml` (or `$BOND_CONFIG`) and resolves the
//! `[server]` table into [`BackendSettings`], applying environment
//! overrides on top. Validation of the executable path is left to
//! [`BackendSettings::locate`] at session start.

use serde::Deserialize;
use std::{env, path::Path, path::PathBuf};

use bond_types::BackendSettings;

/// Overrides the config file location.
pub const BOND_CONFIG: &str = "BOND_CONFIG";
/// Overrides `server.executable_path`.
pub const BOND_EXECUTABLE_PATH: &str = "BOND_EXECUTABLE_PATH";
/// Forces the fail-fast policy when truthy.
pub const BOND_FAIL_FAST: &str = "BOND_FAIL_FAST";

#[derive(Debug, Default, Deserialize)]
pub struct BondConfig {
    pub server: Option<BackendSettings>,
}

impl BondConfig {
    /// Load the config file, if any.
    ///
    /// Read and parse failures are logged and treated as "no config".
    pub fn load() -> Option<Self> {
        let path = config_path()?;
        if !path.exists() {
            return None;
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return None;
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                None
            }
        }
    }

    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Resolve backend settings from the process environment.
    #[must_use]
    pub fn backend_settings(&self) -> BackendSettings {
        self.backend_settings_with(|key| env::var(key).ok())
    }

    /// Resolve backend settings using `lookup` for environment variables.
    pub fn backend_settings_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> BackendSettings {
        let mut settings = self.server.clone().unwrap_or_default();

        if let Some(path) = lookup(BOND_EXECUTABLE_PATH).filter(|p| !p.trim().is_empty()) {
            tracing::debug!(env_var = BOND_EXECUTABLE_PATH, "Executable path overridden");
            settings.executable_path = Some(path);
        }
        if lookup(BOND_FAIL_FAST).is_some_and(|raw| is_truthy(&raw)) {
            settings.fail_fast = true;
        }

        settings.executable_path = settings
            .executable_path
            .map(|path| expand_env_vars(&path, &lookup));
        settings
    }
}

/// Expand `${VAR}` references. Unset variables expand to nothing.
pub fn expand_env_vars(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&lookup(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(BOND_CONFIG)
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".bond").join("config.toml"))
}
