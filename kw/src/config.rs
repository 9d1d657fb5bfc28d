/// Default values for CLI
pub mod defaults {
    /// kubectl executable
    pub const KUBECTL: &str = "kubectl";

    /// Default log level
    pub const LOG_LEVEL: &str = "warn";
}

/// Environment variables read by the CLI
pub mod env {
    /// Overrides the kubectl executable
    pub const KUBECTL: &str = "KW_KUBECTL";
}
