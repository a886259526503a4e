use clap::Parser;

use crate::ir::text_range::IndexBase;

/// Completion service for bound script documents, speaking JSON lines on
/// stdin/stdout.
#[derive(Parser, Debug, Clone)]
#[command(name = "script-completion-server", version, about)]
pub struct Config {
    /// Disable ANSI colors in stderr output
    #[arg(long)]
    pub no_color: bool,

    /// Log filter for stderr, e.g. "debug" or "script_completion_server=trace".
    /// Falls back to RUST_LOG, then "info".
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write a DEBUG-level session log to the user cache directory
    #[arg(long)]
    pub log_file: bool,

    /// How the binder numbers lines and columns
    #[arg(long, value_enum, default_value_t = IndexBase::One)]
    pub index_base: IndexBase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["script-completion-server"]);
        assert!(!config.no_color);
        assert!(!config.log_file);
        assert_eq!(config.log_level, None);
        assert_eq!(config.index_base, IndexBase::One);
    }

    #[test]
    fn test_flags() {
        let config = Config::parse_from([
            "script-completion-server",
            "--no-color",
            "--log-level",
            "trace",
            "--index-base",
            "zero",
        ]);
        assert!(config.no_color);
        assert_eq!(config.log_level.as_deref(), Some("trace"));
        assert_eq!(config.index_base, IndexBase::Zero);
    }
}
