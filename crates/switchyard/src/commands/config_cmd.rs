//! Config subcommand handlers.

use std::fmt::Write as _;

use serde::Serialize;
use tabled::Tabled;

use switchyard_api::{
    AuthProtocol, PrivProtocol, SecurityLevel, SnmpCredentials, SnmpVersion, TransportConfig,
};
use switchyard_config::SecretKind;

use crate::cli::{AddProfileArgs, ConfigArgs, ConfigCommand, GlobalOpts, SecretArg};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "retries = {}", cfg.defaults.retries);
    let _ = writeln!(out, "max_repetitions = {}", cfg.defaults.max_repetitions);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "host = \"{}\"", p.host);
        let _ = writeln!(out, "port = {}", p.port);
        let _ = writeln!(out, "version = \"{}\"", p.version);
        if p.community.is_some() {
            let _ = writeln!(out, "community = \"****\"");
        }
        if let Some(ref env) = p.community_env {
            let _ = writeln!(out, "community_env = \"{env}\"");
        }
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
            let _ = writeln!(out, "security_level = \"{}\"", p.security_level);
        }
        if let Some(auth) = p.auth_protocol {
            let _ = writeln!(out, "auth_protocol = \"{auth}\"");
        }
        if p.auth_passphrase.is_some() {
            let _ = writeln!(out, "auth_passphrase = \"****\"");
        }
        if let Some(privacy) = p.priv_protocol {
            let _ = writeln!(out, "priv_protocol = \"{privacy}\"");
        }
        if p.priv_passphrase.is_some() {
            let _ = writeln!(out, "priv_passphrase = \"****\"");
        }
        let _ = writeln!(out, "driver = \"{}\"", p.driver);
        if p.read_only {
            let _ = writeln!(out, "read_only = true");
        }
        if !p.hide_interfaces.is_empty() {
            let _ = writeln!(out, "hide_interfaces = {:?}", p.hide_interfaces);
        }
    }

    out.trim_end().to_owned()
}

fn invalid(field: &str, value: &str, expected: &str) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: format!("'{value}' is not one of {expected}"),
    }
}

fn profile_from_args(args: &AddProfileArgs) -> Result<Profile, CliError> {
    let mut profile = Profile::new(args.host.clone());
    profile.port = args.port;
    profile.version = args
        .version
        .parse::<SnmpVersion>()
        .map_err(|_| invalid("snmp-version", &args.version, "v1, v2c, v3"))?;
    profile.community.clone_from(&args.community);
    profile.community_env.clone_from(&args.community_env);
    profile.username.clone_from(&args.username);
    if let Some(level) = args.security_level.as_deref() {
        profile.security_level = level.parse::<SecurityLevel>().map_err(|_| {
            invalid(
                "security-level",
                level,
                "noAuthNoPriv, authNoPriv, authPriv",
            )
        })?;
    }
    if let Some(auth) = args.auth_protocol.as_deref() {
        profile.auth_protocol = Some(
            auth.parse::<AuthProtocol>()
                .map_err(|_| invalid("auth-protocol", auth, "md5, sha, sha256, sha512"))?,
        );
    }
    if let Some(privacy) = args.priv_protocol.as_deref() {
        profile.priv_protocol = Some(
            privacy
                .parse::<PrivProtocol>()
                .map_err(|_| invalid("priv-protocol", privacy, "des, aes128, aes256"))?,
        );
    }

    switchyard_config::parse_driver(&args.driver)?;
    profile.driver.clone_from(&args.driver);
    profile.read_only = args.read_only;
    profile.hide_interfaces.clone_from(&args.hide_interfaces);

    if profile.version == SnmpVersion::V3 && profile.username.is_none() {
        return Err(CliError::Validation {
            field: "username".into(),
            reason: "required for SNMPv3".into(),
        });
    }
    Ok(profile)
}

// ── Profile check view ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ProfileCheck {
    profile: String,
    target: String,
    version: SnmpVersion,
    credentials: String,
    timeout_secs: u64,
    retries: u32,
    max_repetitions: u32,
    driver: String,
    read_only: bool,
}

fn describe_credentials(transport: &TransportConfig) -> String {
    match &transport.credentials {
        SnmpCredentials::Community(_) => "community (resolved)".into(),
        SnmpCredentials::Usm(usm) => {
            let mut text = format!("user {} ({})", usm.username, usm.level);
            if let Some((auth, _)) = &usm.auth {
                let _ = write!(text, ", auth {auth}");
            }
            if let Some((privacy, _)) = &usm.privacy {
                let _ = write!(text, ", priv {privacy}");
            }
            text
        }
    }
}

fn check_detail(c: &ProfileCheck) -> String {
    [
        format!("Profile:     {}", c.profile),
        format!("Target:      {}", c.target),
        format!("Version:     {}", c.version),
        format!("Credentials: {}", c.credentials),
        format!("Timeout:     {}s x {} retries", c.timeout_secs, c.retries),
        format!("Bulk size:   {}", c.max_repetitions),
        format!("Driver:      {}", c.driver),
        format!("Read-only:   {}", if c.read_only { "yes" } else { "no" }),
    ]
    .join("\n")
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    active: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Driver")]
    driver: String,
}

#[derive(Debug, Serialize)]
struct ProfileSummary {
    name: String,
    default: bool,
    host: String,
    version: SnmpVersion,
    driver: String,
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(
                &config::config_path(global).display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            output::print_output(&format_config_redacted(&cfg), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load(global)?;
            let mut profiles: Vec<ProfileSummary> = cfg
                .profiles
                .iter()
                .map(|(name, p)| ProfileSummary {
                    name: name.clone(),
                    default: cfg.default_profile.as_deref() == Some(name.as_str()),
                    host: p.host.clone(),
                    version: p.version,
                    driver: p.driver.clone(),
                })
                .collect();
            profiles.sort_by(|a, b| a.name.cmp(&b.name));
            let out = output::render_list(
                &global.output,
                &profiles,
                |p| ProfileRow {
                    active: if p.default { "*" } else { "" },
                    name: p.name.clone(),
                    host: p.host.clone(),
                    version: p.version.to_string(),
                    driver: p.driver.clone(),
                },
                |p| p.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Check { name } => {
            let cfg = config::load(global)?;
            let name = name
                .or_else(|| config::active_profile_name(global, &cfg))
                .ok_or_else(|| CliError::Validation {
                    field: "profile".into(),
                    reason: "no profile given and no default_profile set".into(),
                })?;
            let profile = config::find_profile(&cfg, &name)?;
            let (transport, connector) =
                switchyard_config::profile_to_configs(profile, &name, &cfg.defaults)?;

            let check = ProfileCheck {
                profile: name,
                target: transport.target(),
                version: transport.version,
                credentials: describe_credentials(&transport),
                timeout_secs: transport.timeout.as_secs(),
                retries: transport.retries,
                max_repetitions: transport.max_repetitions,
                driver: connector
                    .vendor_override
                    .map_or_else(|| "auto".into(), |v| v.to_string()),
                read_only: connector.read_only,
            };
            let out = output::render_single(&global.output, &check, check_detail, |c| {
                c.target.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Add(add) => {
            let profile = profile_from_args(&add)?;
            let mut cfg = config::load(global)?;
            let first = cfg.profiles.is_empty();
            cfg.profiles.insert(add.name.clone(), profile);
            if add.default || first {
                cfg.default_profile = Some(add.name.clone());
            }
            config::save(&cfg, global)?;
            if !global.quiet {
                eprintln!("✓ profile '{}' saved", add.name);
            }
            Ok(())
        }

        ConfigCommand::Remove { name } => {
            let mut cfg = config::load(global)?;
            config::find_profile(&cfg, &name)?;
            cfg.profiles.remove(&name);
            if cfg.default_profile.as_deref() == Some(name.as_str()) {
                cfg.default_profile = None;
            }
            config::save(&cfg, global)?;
            if !global.quiet {
                eprintln!("✓ profile '{name}' removed");
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load(global)?;
            config::find_profile(&cfg, &name)?;
            cfg.default_profile = Some(name.clone());
            config::save(&cfg, global)?;
            if !global.quiet {
                eprintln!("✓ default profile is now '{name}'");
            }
            Ok(())
        }

        ConfigCommand::SetSecret { name, kind, value } => {
            let cfg = config::load(global)?;
            config::find_profile(&cfg, &name)?;
            let kind = match kind {
                SecretArg::Community => SecretKind::Community,
                SecretArg::Auth => SecretKind::AuthPassphrase,
                SecretArg::Priv => SecretKind::PrivPassphrase,
            };
            switchyard_config::store_secret(&name, kind, &value)?;
            if !global.quiet {
                eprintln!("✓ {} for '{name}' stored in system keyring", kind.as_str());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn add_args(version: &str) -> AddProfileArgs {
        AddProfileArgs {
            name: "lab".into(),
            host: "10.0.0.1".into(),
            port: 161,
            version: version.into(),
            community: Some("public".into()),
            community_env: None,
            username: None,
            security_level: None,
            auth_protocol: None,
            priv_protocol: None,
            driver: "auto".into(),
            read_only: false,
            hide_interfaces: vec!["Null".into()],
            default: false,
        }
    }

    #[test]
    fn redacted_config_masks_secrets() {
        let mut cfg = Config::default();
        cfg.profiles
            .insert("lab".into(), profile_from_args(&add_args("v2c")).unwrap());
        let text = format_config_redacted(&cfg);
        assert!(text.contains("community = \"****\""));
        assert!(!text.contains("public"));
    }

    #[test]
    fn v3_profiles_need_a_user() {
        let err = profile_from_args(&add_args("v3")).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "username"));
    }

    #[test]
    fn bad_version_is_rejected() {
        assert!(profile_from_args(&add_args("v4")).is_err());
    }
}
