//! Clap derive structures for the `switchyard` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// switchyard -- inspect managed switches and dry-run changes
#[derive(Debug, Parser)]
#[command(
    name = "switchyard",
    version,
    about = "Inspect managed switches and dry-run configuration changes",
    long_about = "Builds a vendor-neutral model of a managed Ethernet switch \
        (interfaces, VLANs, PoE, learned clients, LLDP, stack members) from \
        an `snmpwalk -On` dump, and shows the exact SNMP SETs a change \
        would send.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "SWITCHYARD_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "SWITCHYARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// `snmpwalk -On` dump to answer requests from
    #[arg(long, short = 'w', env = "SWITCHYARD_WALK", global = true)]
    pub walk: Option<PathBuf>,

    /// Force a dialect: auto, generic, cisco-vtp, cisco-sb, comware
    #[arg(long, short = 'd', global = true)]
    pub driver: Option<String>,

    /// Restore a snapshot written by `switchyard snapshot` instead of
    /// re-reading the dump
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Refuse every change
    #[arg(long, global = true)]
    pub read_only: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SWITCHYARD_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the system group and session details
    #[command(alias = "sys")]
    System,

    /// List and inspect interfaces
    #[command(alias = "if", alias = "i")]
    Interfaces(InterfacesArgs),

    /// List and create VLANs
    Vlans(VlansArgs),

    /// Show PoE ports
    Poe,

    /// Show learned MAC addresses or LLDP neighbors
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Show stack members and hardware inventory
    #[command(alias = "hw")]
    Hardware,

    /// Change one interface setting
    Set(SetArgs),

    /// Write the running configuration to startup storage
    Save,

    /// Print the cacheable device model as a JSON snapshot
    Snapshot(SnapshotArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Interfaces ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InterfacesArgs {
    #[command(subcommand)]
    pub command: InterfacesCommand,
}

#[derive(Debug, Subcommand)]
pub enum InterfacesCommand {
    /// List interfaces
    #[command(alias = "ls")]
    List {
        /// Include hidden and unmanageable interfaces
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Show one interface
    Show {
        /// ifIndex or interface name
        interface: String,
    },
}

// ── VLANs ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VlansArgs {
    #[command(subcommand)]
    pub command: VlansCommand,
}

#[derive(Debug, Subcommand)]
pub enum VlansCommand {
    /// List VLANs
    #[command(alias = "ls")]
    List,

    /// Create a VLAN
    Create {
        /// VLAN id (1-4094)
        id: u16,

        /// VLAN name (defaults to VLAN<id>)
        #[arg(long, short = 'n', default_value = "")]
        name: String,
    },
}

// ── Clients ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClientsArgs {
    /// Show LLDP neighbors instead of learned addresses
    #[arg(long)]
    pub lldp: bool,
}

// ── Set ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetArgs {
    #[command(subcommand)]
    pub command: SetCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    #[value(alias = "up", alias = "enable")]
    On,
    #[value(alias = "down", alias = "disable")]
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

#[derive(Debug, Subcommand)]
pub enum SetCommand {
    /// Bring an interface administratively up or down
    Admin {
        /// ifIndex or interface name
        interface: String,
        state: Toggle,
    },

    /// Move an interface's untagged (native) VLAN
    Vlan {
        /// ifIndex or interface name
        interface: String,
        vlan: u16,
    },

    /// Enable or disable PoE on an interface
    Poe {
        /// ifIndex or interface name
        interface: String,
        state: Toggle,
    },

    /// Set the interface description (ifAlias)
    #[command(alias = "desc")]
    Description {
        /// ifIndex or interface name
        interface: String,
        text: String,
    },
}

// ── Snapshot ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Write to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SecretArg {
    Community,
    Auth,
    Priv,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the current configuration (secrets masked)
    Show,

    /// List profiles
    Profiles,

    /// Resolve a profile's transport settings and credentials
    Check {
        /// Profile name (defaults to the active profile)
        name: Option<String>,
    },

    /// Add or replace a profile
    Add(AddProfileArgs),

    /// Remove a profile
    Remove {
        /// Profile name
        name: String,
    },

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store a profile secret in the system keyring
    SetSecret {
        /// Profile name
        name: String,
        /// Which secret
        #[arg(long, default_value = "community")]
        kind: SecretArg,
        /// Secret value
        #[arg(long, env = "SWITCHYARD_SECRET", hide_env = true)]
        value: String,
    },
}

#[derive(Debug, Args)]
pub struct AddProfileArgs {
    /// Profile name
    pub name: String,

    /// Device address
    #[arg(long)]
    pub host: String,

    #[arg(long, default_value = "161")]
    pub port: u16,

    /// SNMP version: v1, v2c, v3
    #[arg(id = "snmp_version", long = "snmp-version", value_name = "VERSION", default_value = "v2c")]
    pub version: String,

    /// Community string, stored in plaintext (prefer `config set-secret`)
    #[arg(long)]
    pub community: Option<String>,

    /// Environment variable holding the community string
    #[arg(long)]
    pub community_env: Option<String>,

    /// SNMPv3 user name
    #[arg(long)]
    pub username: Option<String>,

    /// SNMPv3 security level: noAuthNoPriv, authNoPriv, authPriv
    #[arg(long)]
    pub security_level: Option<String>,

    /// SNMPv3 auth protocol: md5, sha, sha256, sha512
    #[arg(long)]
    pub auth_protocol: Option<String>,

    /// SNMPv3 privacy protocol: des, aes128, aes256
    #[arg(long)]
    pub priv_protocol: Option<String>,

    /// Dialect: auto, generic, cisco-vtp, cisco-sb, comware
    #[arg(long, default_value = "auto")]
    pub driver: String,

    /// Refuse every change for this device
    #[arg(long)]
    pub read_only: bool,

    /// Interface name prefix to hide (repeatable)
    #[arg(long = "hide")]
    pub hide_interfaces: Vec<String>,

    /// Make this the default profile
    #[arg(long)]
    pub default: bool,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
