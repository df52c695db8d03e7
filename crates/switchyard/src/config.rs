//! CLI configuration: thin wrapper around `switchyard_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--config, --driver, --read-only).

use std::path::{Path, PathBuf};

use switchyard_core::ConnectorConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use switchyard_config::{Config, Profile};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Config file selected by `--config`, or the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(switchyard_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(switchyard_config::load_config_from(&config_path(global))?)
}

pub fn save(config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    switchyard_config::save_config_to(config, &config_path(global))?;
    Ok(())
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> Option<String> {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
}

/// Look up a profile, listing the alternatives when it is missing.
pub fn find_profile<'a>(config: &'a Config, name: &str) -> Result<&'a Profile, CliError> {
    config.profiles.get(name).ok_or_else(|| {
        let mut names: Vec<_> = config.profiles.keys().cloned().collect();
        names.sort();
        CliError::ProfileNotFound {
            name: name.into(),
            available: if names.is_empty() {
                "(none)".into()
            } else {
                names.join(", ")
            },
        }
    })
}

/// Build the engine configuration for an offline session.
///
/// Uses the active profile when there is one; otherwise the walk file's
/// stem becomes the device key. `--driver` and `--read-only` win over the
/// profile.
pub fn connector_config(
    global: &GlobalOpts,
    config: &Config,
    walk: &Path,
) -> Result<ConnectorConfig, CliError> {
    let mut connector = match active_profile_name(global, config) {
        Some(name) => {
            let profile = find_profile(config, &name)?;
            switchyard_config::profile_to_connector_config(profile, &name, &config.defaults)?
        }
        None => ConnectorConfig::new(device_key_for(walk)),
    };

    if let Some(driver) = global.driver.as_deref() {
        connector.vendor_override = switchyard_config::parse_driver(driver)?;
    }
    if global.read_only {
        connector.read_only = true;
    }
    Ok(connector)
}

fn device_key_for(walk: &Path) -> String {
    walk.file_stem()
        .map_or_else(|| "device".into(), |s| s.to_string_lossy().into_owned())
}
