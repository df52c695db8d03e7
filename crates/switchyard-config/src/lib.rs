//! Device profile management for switchyard.
//!
//! Handles TOML config files, credential resolution (env, keyring,
//! plaintext), and translation from on-disk profiles into the
//! `TransportConfig` + `ConnectorConfig` pair the engine consumes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use switchyard_api::{
    AuthProtocol, PrivProtocol, SecurityLevel, SnmpCredentials, SnmpVersion, TransportConfig,
    UsmCredentials,
};
use switchyard_core::{ConnectorConfig, Vendor};

const KEYRING_SERVICE: &str = "switchyard";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{0}' not found")]
    UnknownProfile(String),

    #[error("no {secret} configured for profile '{profile}'")]
    NoCredentials { profile: String, secret: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("configuration error: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config types ────────────────────────────────────────────────────

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Global defaults applied to every profile that does not override them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_color")]
    pub color: String,
    /// Per-request SNMP timeout, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_max_repetitions")]
    pub max_repetitions: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            retries: default_retries(),
            max_repetitions: default_max_repetitions(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    5
}
fn default_retries() -> u32 {
    2
}
fn default_max_repetitions() -> u32 {
    25
}
fn default_port() -> u16 {
    161
}
fn default_driver() -> String {
    "auto".into()
}

/// One managed switch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub version: SnmpVersion,

    // v1/v2c
    pub community: Option<String>,
    /// Environment variable holding the community string.
    pub community_env: Option<String>,

    // v3 USM
    pub username: Option<String>,
    #[serde(default)]
    pub security_level: SecurityLevel,
    pub auth_protocol: Option<AuthProtocol>,
    pub auth_passphrase: Option<String>,
    pub auth_passphrase_env: Option<String>,
    pub priv_protocol: Option<PrivProtocol>,
    pub priv_passphrase: Option<String>,
    pub priv_passphrase_env: Option<String>,

    /// `auto`, or a forced dialect: `generic`, `cisco-vtp`, `cisco-sb`, `comware`.
    #[serde(default = "default_driver")]
    pub driver: String,
    #[serde(default)]
    pub read_only: bool,
    /// Interface name prefixes hidden from the model.
    #[serde(default)]
    pub hide_interfaces: Vec<String>,

    pub timeout: Option<u64>,
    pub retries: Option<u32>,
    pub max_repetitions: Option<u32>,
    /// Config-copy timeout, in seconds.
    pub save_timeout: Option<u64>,
    /// Config-copy poll period, in seconds.
    pub save_poll_interval: Option<u64>,
    /// Fixed config-copy row index.
    pub copy_row_index: Option<u32>,
}

impl Profile {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            version: SnmpVersion::default(),
            community: None,
            community_env: None,
            username: None,
            security_level: SecurityLevel::default(),
            auth_protocol: None,
            auth_passphrase: None,
            auth_passphrase_env: None,
            priv_protocol: None,
            priv_passphrase: None,
            priv_passphrase_env: None,
            driver: default_driver(),
            read_only: false,
            hide_interfaces: Vec::new(),
            timeout: None,
            retries: None,
            max_repetitions: None,
            save_timeout: None,
            save_poll_interval: None,
            copy_row_index: None,
        }
    }
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .ok_or_else(|| ConfigError::Validation {
                field: "profile".into(),
                reason: "no profile given and no default_profile set".into(),
            })?;
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile(name.into()))
    }
}

// ── Config loading ──────────────────────────────────────────────────

/// Platform-specific config file path.
pub fn config_path() -> PathBuf {
    directories::ProjectDirs::from("net", "switchyard", "switchyard").map_or_else(
        || {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home)
                .join(".config")
                .join("switchyard")
                .join("config.toml")
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Load configuration from the default path merged with `SWITCHYARD_*` env.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load configuration from an explicit file merged with `SWITCHYARD_*` env.
///
/// Nested keys use a double underscore: `SWITCHYARD_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    use figment::Figment;
    use figment::providers::{Env, Format, Serialized, Toml};

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SWITCHYARD_").split("__"))
        .extract()?;

    Ok(config)
}

/// Load config, returning defaults when nothing is on disk.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Write a config file, creating parent directories as needed.
pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(config)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Write the config to the platform path.
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    save_config_to(config, &config_path())
}

// ── Credential resolution ───────────────────────────────────────────

/// Which secret of a profile is being resolved. Doubles as the keyring
/// account suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    Community,
    AuthPassphrase,
    PrivPassphrase,
}

impl SecretKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Community => "community",
            Self::AuthPassphrase => "auth-passphrase",
            Self::PrivPassphrase => "priv-passphrase",
        }
    }

    fn sources(self, profile: &Profile) -> (Option<&str>, Option<&str>) {
        match self {
            Self::Community => (profile.community_env.as_deref(), profile.community.as_deref()),
            Self::AuthPassphrase => (
                profile.auth_passphrase_env.as_deref(),
                profile.auth_passphrase.as_deref(),
            ),
            Self::PrivPassphrase => (
                profile.priv_passphrase_env.as_deref(),
                profile.priv_passphrase.as_deref(),
            ),
        }
    }
}

fn keyring_entry(profile_name: &str, kind: SecretKind) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/{}", kind.as_str()),
    )?)
}

/// Resolve one secret: named env var, then keyring, then plaintext.
pub fn resolve_secret(
    profile: &Profile,
    profile_name: &str,
    kind: SecretKind,
) -> Result<SecretString, ConfigError> {
    let (env_name, plaintext) = kind.sources(profile);

    if let Some(env_name) = env_name {
        if let Ok(value) = std::env::var(env_name) {
            return Ok(SecretString::from(value));
        }
    }

    if let Ok(entry) = keyring_entry(profile_name, kind) {
        if let Ok(value) = entry.get_password() {
            return Ok(SecretString::from(value));
        }
    }

    if let Some(value) = plaintext {
        return Ok(SecretString::from(value.to_owned()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        secret: kind.as_str().into(),
    })
}

/// Store a secret in the system keyring.
pub fn store_secret(profile_name: &str, kind: SecretKind, value: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, kind)?.set_password(value)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse the `driver` field. `auto` means detect from `sysObjectID`.
pub fn parse_driver(driver: &str) -> Result<Option<Vendor>, ConfigError> {
    if driver.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    let vendor: Vendor = driver.parse().map_err(|_| ConfigError::Validation {
        field: "driver".into(),
        reason: format!("unknown driver '{driver}'"),
    })?;
    if vendor == Vendor::Juniper {
        return Err(ConfigError::Validation {
            field: "driver".into(),
            reason: "juniper devices are managed over RPC, not SNMP".into(),
        });
    }
    Ok(Some(vendor))
}

fn build_credentials(profile: &Profile, name: &str) -> Result<SnmpCredentials, ConfigError> {
    if profile.version != SnmpVersion::V3 {
        return Ok(SnmpCredentials::Community(resolve_secret(
            profile,
            name,
            SecretKind::Community,
        )?));
    }

    let username = profile
        .username
        .clone()
        .ok_or_else(|| ConfigError::Validation {
            field: "username".into(),
            reason: "required for SNMPv3".into(),
        })?;

    let needs_auth = matches!(
        profile.security_level,
        SecurityLevel::AuthNoPriv | SecurityLevel::AuthPriv
    );
    let auth = if needs_auth {
        let protocol = profile.auth_protocol.ok_or_else(|| ConfigError::Validation {
            field: "auth_protocol".into(),
            reason: format!("required for security level {}", profile.security_level),
        })?;
        Some((protocol, resolve_secret(profile, name, SecretKind::AuthPassphrase)?))
    } else {
        None
    };

    let privacy = if profile.security_level == SecurityLevel::AuthPriv {
        let protocol = profile.priv_protocol.ok_or_else(|| ConfigError::Validation {
            field: "priv_protocol".into(),
            reason: "required for security level authPriv".into(),
        })?;
        Some((protocol, resolve_secret(profile, name, SecretKind::PrivPassphrase)?))
    } else {
        None
    };

    Ok(SnmpCredentials::Usm(UsmCredentials {
        username,
        level: profile.security_level,
        auth,
        privacy,
    }))
}

/// Build the transport half of a profile. Resolves secrets.
pub fn profile_to_transport_config(
    profile: &Profile,
    name: &str,
    defaults: &Defaults,
) -> Result<TransportConfig, ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }

    Ok(TransportConfig {
        host: profile.host.clone(),
        port: profile.port,
        version: profile.version,
        credentials: build_credentials(profile, name)?,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        retries: profile.retries.unwrap_or(defaults.retries),
        max_repetitions: profile.max_repetitions.unwrap_or(defaults.max_repetitions),
    })
}

/// Build the engine half of a profile. Touches no secrets, so it also
/// serves offline sessions.
pub fn profile_to_connector_config(
    profile: &Profile,
    name: &str,
    defaults: &Defaults,
) -> Result<ConnectorConfig, ConfigError> {
    let mut config = ConnectorConfig::new(name);
    config.vendor_override = parse_driver(&profile.driver)?;
    config.read_only = profile.read_only;
    config.max_repetitions = profile.max_repetitions.unwrap_or(defaults.max_repetitions);
    config.hide_interfaces.clone_from(&profile.hide_interfaces);
    if let Some(secs) = profile.save_timeout {
        config.save_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = profile.save_poll_interval {
        config.save_poll_interval = Duration::from_secs(secs.max(1));
    }
    config.copy_row_index = profile.copy_row_index;
    Ok(config)
}

/// Translate a profile into everything a live session needs.
pub fn profile_to_configs(
    profile: &Profile,
    name: &str,
    defaults: &Defaults,
) -> Result<(TransportConfig, ConnectorConfig), ConfigError> {
    Ok((
        profile_to_transport_config(profile, name, defaults)?,
        profile_to_connector_config(profile, name, defaults)?,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    const SAMPLE: &str = r#"
default_profile = "core-1"

[defaults]
timeout = 8

[profiles.core-1]
host = "10.0.0.2"
community = "s3cret"
driver = "cisco-vtp"
hide_interfaces = ["Null", "Vlan"]
save_timeout = 60

[profiles.edge-3]
host = "10.0.0.3"
version = "v3"
username = "ops"
security_level = "authPriv"
auth_protocol = "Sha256"
auth_passphrase = "authpass"
priv_protocol = "Aes128"
priv_passphrase = "privpass"
read_only = true
"#;

    fn load_sample() -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        load_config_from(&path).unwrap()
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let config = load_sample();

        assert_eq!(config.default_profile.as_deref(), Some("core-1"));
        assert_eq!(config.defaults.timeout, 8);
        assert_eq!(config.defaults.retries, 2);
        assert_eq!(config.profiles["core-1"].port, 161);
        assert_eq!(config.profiles["edge-3"].version, SnmpVersion::V3);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert!(config.profiles.is_empty());
        assert_eq!(config.defaults, Defaults::default());
    }

    #[test]
    fn default_profile_is_used_when_none_given() {
        let config = load_sample();
        let (name, profile) = config.profile(None).unwrap();
        assert_eq!(name, "core-1");
        assert_eq!(profile.host, "10.0.0.2");

        assert!(matches!(
            config.profile(Some("nope")),
            Err(ConfigError::UnknownProfile(_))
        ));
    }

    #[test]
    fn v2c_profile_translates() {
        let config = load_sample();
        let (name, profile) = config.profile(Some("core-1")).unwrap();

        let (transport, connector) =
            profile_to_configs(profile, name, &config.defaults).unwrap();

        assert_eq!(transport.target(), "10.0.0.2:161");
        assert_eq!(transport.timeout, Duration::from_secs(8));
        match transport.credentials {
            SnmpCredentials::Community(secret) => assert_eq!(secret.expose_secret(), "s3cret"),
            SnmpCredentials::Usm(_) => panic!("expected community"),
        }
        assert_eq!(connector.device_key, "core-1");
        assert_eq!(connector.vendor_override, Some(Vendor::CiscoVtp));
        assert_eq!(connector.hide_interfaces, vec!["Null", "Vlan"]);
        assert_eq!(connector.save_timeout, Duration::from_secs(60));
    }

    #[test]
    fn v3_profile_translates() {
        let config = load_sample();
        let (name, profile) = config.profile(Some("edge-3")).unwrap();

        let (transport, connector) =
            profile_to_configs(profile, name, &config.defaults).unwrap();

        let SnmpCredentials::Usm(usm) = transport.credentials else {
            panic!("expected USM credentials");
        };
        assert_eq!(usm.username, "ops");
        assert_eq!(usm.level, SecurityLevel::AuthPriv);
        let (auth, pass) = usm.auth.unwrap();
        assert_eq!(auth, AuthProtocol::Sha256);
        assert_eq!(pass.expose_secret(), "authpass");
        assert_eq!(usm.privacy.unwrap().0, PrivProtocol::Aes128);
        assert!(connector.read_only);
        assert_eq!(connector.vendor_override, None);
    }

    #[test]
    fn v3_without_auth_protocol_is_rejected() {
        let mut profile = Profile::new("10.0.0.9");
        profile.version = SnmpVersion::V3;
        profile.username = Some("ops".into());
        profile.security_level = SecurityLevel::AuthNoPriv;
        profile.auth_passphrase = Some("x".into());

        let err = profile_to_transport_config(&profile, "lab", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "auth_protocol"));
    }

    #[test]
    fn driver_parsing() {
        assert_eq!(parse_driver("auto").unwrap(), None);
        assert_eq!(parse_driver("cisco-sb").unwrap(), Some(Vendor::CiscoSb));
        assert_eq!(parse_driver("comware").unwrap(), Some(Vendor::Comware));
        assert!(parse_driver("juniper").is_err());
        assert!(parse_driver("netgear").is_err());
    }

    #[test]
    fn connector_config_needs_no_secret() {
        let profile = Profile::new("10.0.0.5");
        let config = profile_to_connector_config(&profile, "lab", &Defaults::default()).unwrap();
        assert_eq!(config.device_key, "lab");
        assert_eq!(config.max_repetitions, 25);
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        let mut profile = Profile::new("10.1.1.1");
        profile.community = Some("public".into());
        config.profiles.insert("lab".into(), profile);
        config.default_profile = Some("lab".into());

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profiles, config.profiles);
        assert_eq!(loaded.default_profile, config.default_profile);
    }
}
