//! CLI argument parsing

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{defaults, env};

/// kubectl with a per-shell context and namespace
#[derive(Parser, Debug)]
#[command(name = "kw", version)]
#[command(
    about = "kubectl with a per-shell context and namespace",
    long_about = None,
    after_help = "The session lives in KUBE_CONTEXT and KUBE_NAMESPACE. \
        Load it into your shell with:\n  \
        eval \"$(kw switch prod web --export sh)\""
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,

    /// kubectl executable to run
    #[arg(long, global = true, env = env::KUBECTL, default_value = defaults::KUBECTL)]
    pub kubectl: String,

    /// Format for structured results
    #[arg(long, global = true, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run any kubectl command with the session's context and namespace
    #[command(alias = "k")]
    Wrap(WrapArgs),

    /// Get resources; listings are parsed into a table
    Get(GetArgs),

    /// Set the session context (and optionally namespace)
    Switch(SwitchArgs),

    /// Set the session namespace
    #[command(alias = "ns")]
    Namespace(NamespaceArgs),

    /// Clear the session context and namespace
    Clear(ClearArgs),

    /// Show the context and namespace persisted in kubeconfig
    KubeconfigInfo,

    /// List context names for shell completion
    CompleteContexts(CompleteArgs),
}

/// Explicit overrides for the session values
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Context for this call only
    #[arg(long)]
    pub context: Option<String>,

    /// Namespace for this call only
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,
}

#[derive(Args, Debug)]
pub struct WrapArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Arguments passed to kubectl
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:\n  \
        kw get pods                 # table with parsed ages\n  \
        kw get pod web-0            # one resource, YAML\n  \
        kw get -o json pods         # kubectl output as is\n  \
        kw get -w pods              # watch, streamed")]
pub struct GetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// kubectl output format; anything but 'wide' disables parsing
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Watch for changes (streamed, never parsed)
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Print kubectl's output unchanged
    #[arg(long)]
    pub no_parse: bool,

    /// Resource type, names and further kubectl flags
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SwitchArgs {
    /// Context to use for this session
    pub context: String,

    /// Namespace to use for this session
    pub namespace: Option<String>,

    /// Print shell statements instead of the result
    #[arg(long, value_enum)]
    pub export: Option<ShellKind>,
}

#[derive(Args, Debug)]
pub struct NamespaceArgs {
    /// Namespace to use for this session
    pub namespace: String,

    /// Print shell statements instead of the result
    #[arg(long, value_enum)]
    pub export: Option<ShellKind>,
}

#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Keep the session context
    #[arg(long)]
    pub no_context: bool,

    /// Keep the session namespace
    #[arg(long)]
    pub no_namespace: bool,

    /// Also unset kubectl's persisted current-context and its namespace
    #[arg(long)]
    pub kubeconfig: bool,

    /// Print shell statements instead of the result
    #[arg(long, value_enum)]
    pub export: Option<ShellKind>,
}

#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Partial context name typed so far
    pub query: Option<String>,

    /// How candidates are matched against the query
    #[arg(long = "match", value_enum, default_value_t = MatchKind::Fuzzy)]
    pub algorithm: MatchKind,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Aligned text (default)
    Table,
    Yaml,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShellKind {
    /// sh, bash, zsh
    Sh,
    Fish,
}

impl From<ShellKind> for kubewrap::Shell {
    fn from(shell: ShellKind) -> Self {
        match shell {
            ShellKind::Sh => kubewrap::Shell::Posix,
            ShellKind::Fish => kubewrap::Shell::Fish,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchKind {
    Prefix,
    Fuzzy,
}

impl From<MatchKind> for kubewrap::MatchAlgorithm {
    fn from(kind: MatchKind) -> Self {
        match kind {
            MatchKind::Prefix => kubewrap::MatchAlgorithm::Prefix,
            MatchKind::Fuzzy => kubewrap::MatchAlgorithm::Fuzzy,
        }
    }
}
