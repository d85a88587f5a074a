//! Clap CLI definitions for the `regform` command.

use clap::{Args, Parser, Subcommand};

/// regform -- event registration forms with computed fields.
///
/// Evaluates the formulas behind dynamic registration fields (such as a
/// total price), checks event form configurations, and walks through a
/// registration from the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "regform",
    about = "Event registration forms with computed fields",
    long_about = "Evaluate registration field formulas, lint event form configurations, and fill forms from the terminal.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path of the .regform directory (default: auto-discover from cwd).
    #[arg(long, global = true, env = "REGFORM_DIR")]
    pub dir: Option<String>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a formula file against field values.
    Eval(EvalArgs),

    /// Compute every field of an event form from the given values.
    Compute(ComputeArgs),

    /// List the fields of an event form.
    Fields(FieldsArgs),

    /// Check an event form for configuration problems.
    Lint(LintArgs),

    /// Fill an event form interactively, one field at a time.
    Fill(FillArgs),

    /// Manage configuration (set, get, list, unset).
    Config(ConfigArgs),

    /// Generate shell completion scripts.
    Completion(CompletionArgs),

    /// Print version information.
    Version,
}

// ---------------------------------------------------------------------------
// Eval
// ---------------------------------------------------------------------------

/// Arguments for `regform eval`.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Formula file (JSON or TOML), or `-` to read JSON from stdin.
    pub formula: String,

    /// Field value (key=value), repeatable. Values are read as JSON when
    /// they parse as JSON, otherwise as text.
    #[arg(long = "var", num_args = 1..)]
    pub vars: Vec<String>,

    /// Show each applied step.
    #[arg(long)]
    pub trace: bool,
}

// ---------------------------------------------------------------------------
// Compute
// ---------------------------------------------------------------------------

/// Arguments for `regform compute`.
#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// Event name or path to an event form file.
    pub event: String,

    /// Field value (key=value), repeatable.
    #[arg(long = "var", num_args = 1..)]
    pub vars: Vec<String>,

    /// Fail unless every required field has a value.
    #[arg(long)]
    pub submit: bool,
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Arguments for `regform fields`.
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Event name or path to an event form file.
    pub event: String,

    /// Only list dynamic fields.
    #[arg(long)]
    pub dynamic: bool,
}

// ---------------------------------------------------------------------------
// Lint
// ---------------------------------------------------------------------------

/// Arguments for `regform lint`.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Event name or path to an event form file.
    pub event: String,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

// ---------------------------------------------------------------------------
// Fill
// ---------------------------------------------------------------------------

/// Arguments for `regform fill`.
#[derive(Args, Debug)]
pub struct FillArgs {
    /// Event name or path to an event form file.
    pub event: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Arguments for `regform config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a configuration value.
    Set(ConfigSetArgs),
    /// Get a configuration value.
    Get(ConfigGetArgs),
    /// List all configuration values.
    List,
    /// Reset a configuration value to its default.
    Unset(ConfigUnsetArgs),
}

/// Arguments for `regform config set`.
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Arguments for `regform config get`.
#[derive(Args, Debug)]
pub struct ConfigGetArgs {
    /// Configuration key.
    pub key: String,
}

/// Arguments for `regform config unset`.
#[derive(Args, Debug)]
pub struct ConfigUnsetArgs {
    /// Configuration key.
    pub key: String,
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Arguments for `regform completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommands,
}

/// Completion subcommands.
#[derive(Subcommand, Debug)]
pub enum CompletionCommands {
    /// Generate bash completions.
    Bash,
    /// Generate zsh completions.
    Zsh,
    /// Generate fish completions.
    Fish,
    /// Generate PowerShell completions.
    Powershell,
}
