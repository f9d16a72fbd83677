//! Clap derive structures for the `oncohub` CLI.
//!
//! Every resource subcommand behaves like a page of the web client: it
//! logs in, passes the route guard, dispatches its operations and renders
//! from the resulting slice snapshot.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use oncohub_core::PatientId;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// oncohub -- patient records, consultations and guidelines from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "oncohub",
    version,
    about = "Work with e-OncoHub patient records from the command line",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "ONCOHUB_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API gateway URL (overrides profile)
    #[arg(long, env = "ONCOHUB_API_URL", global = true)]
    pub api_url: Option<String>,

    /// E-mail confirmation service URL (overrides profile)
    #[arg(long, env = "ONCOHUB_CONFIRM_URL", global = true, hide = true)]
    pub confirm_url: Option<String>,

    /// Account e-mail (overrides profile)
    #[arg(long, short = 'e', env = "ONCOHUB_EMAIL", global = true)]
    pub email: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ONCOHUB_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ONCOHUB_INSECURE", global = true)]
    pub insecure: bool,

    /// Operation timeout in seconds (overrides profile)
    #[arg(long, env = "ONCOHUB_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with the profile credentials
    Login,

    /// Log in, then end the session again
    Logout,

    /// Check whether the server accepts the session
    Session(SessionArgs),

    /// Register a doctor account from a JSON form
    Register(RegisterArgs),

    /// Confirm an e-mail address
    Confirm(ConfirmArgs),

    /// Manage the patient roster
    #[command(alias = "pt")]
    Patients(PatientsArgs),

    /// Show or edit the doctor profile
    Doctor(DoctorArgs),

    /// Consultation history and new consultations
    #[command(alias = "cons")]
    Consultations(ConsultationsArgs),

    /// Look up treatment guidelines
    Guidelines(GuidelinesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Command {
    /// Whether the command renders a protected page (login + guard first).
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Self::Patients(_) | Self::Doctor(_) | Self::Consultations(_) | Self::Guidelines(_)
        )
    }
}

// ── Session & account ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Check without logging in first
    #[arg(long)]
    pub anonymous: bool,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// JSON file with the sign-up form (camelCase keys)
    #[arg(long, short = 'F')]
    pub from_file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ConfirmArgs {
    /// Token from the confirmation e-mail
    pub token: Option<String>,
}

// ── Patients ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PatientsArgs {
    #[command(subcommand)]
    pub command: PatientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PatientsCommand {
    /// List the roster
    #[command(alias = "ls")]
    List,

    /// Show one patient
    Get { id: PatientId },

    /// Add a patient from a JSON person record
    Create {
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },

    /// Replace a patient's person record from JSON
    Update {
        id: PatientId,
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },

    /// Delete a patient
    #[command(alias = "rm")]
    Delete { id: PatientId },
}

// ── Doctor ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DoctorArgs {
    #[command(subcommand)]
    pub command: DoctorCommand,
}

#[derive(Debug, Subcommand)]
pub enum DoctorCommand {
    /// Show the signed-in doctor's profile
    Show,

    /// Save profile changes from a JSON doctor record
    Update {
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },
}

// ── Consultations ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConsultationsArgs {
    #[command(subcommand)]
    pub command: ConsultationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConsultationsCommand {
    /// Show the most recent consultation of a patient
    Last { patient: PatientId },

    /// List every consultation of a patient
    History { patient: PatientId },

    /// Record a consultation with its four documents
    Create(CreateConsultationArgs),
}

#[derive(Debug, Args)]
pub struct CreateConsultationArgs {
    pub patient: PatientId,

    /// JSON file with the indicators (ER, PR, HER2, Ki67, TNM, ...)
    #[arg(long)]
    pub kpis: PathBuf,

    /// Appointment time (RFC 3339); defaults to now
    #[arg(long)]
    pub appointment: Option<String>,

    /// Treatment protocol (PDF or image)
    #[arg(long)]
    pub protocol: Option<PathBuf>,

    /// Medical report (PDF or image)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// MRI scan (PDF or image)
    #[arg(long)]
    pub rmn: Option<PathBuf>,

    /// Blood work (PDF or image)
    #[arg(long)]
    pub blood: Option<PathBuf>,
}

// ── Guidelines ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GuidelinesArgs {
    /// Diagnostic, e.g. "Luminal A"
    pub diagnostic: String,

    /// Estrogen receptor value
    #[arg(long, default_value = "0")]
    pub er: i64,

    /// Progesterone receptor value
    #[arg(long, default_value = "0")]
    pub pr: i64,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Store the active profile's password in the system keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
