//! Command-line interface definitions.
//!
//! All CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, color, error format) sit on the top-level
//! parser; the store coordinates are shared by every subcommand and can
//! also come from the environment or the config file.
//!
//! # Example
//!
//! ```bash
//! # Run the interactive scan screen
//! scangate scan --store-url https://gate-demo.firebaseio.com
//!
//! # One-shot validation for scripting (exit code carries the verdict)
//! scangate check BAG-20250001
//!
//! # Seed the allow-list from a JSON file
//! scangate push codes.json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Terminal gate-check scanner.
///
/// Validates scanned codes against a remote allow-list and shows a
/// verdict banner. A wedge-mode barcode scanner acts as the keyboard.
#[derive(Debug, Parser)]
#[command(name = "scangate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the interactive scan screen
    Scan(ScanArgs),
    /// Validate a single code and exit (0 valid, 2 invalid, 1 error)
    Check(CheckArgs),
    /// Publish an allow-list from a JSON file to the store
    Push(PushArgs),
}

/// Store coordinates shared by all subcommands.
///
/// Precedence: CLI flag, then environment variable, then the config file.
#[derive(Debug, Args)]
pub struct StoreOpts {
    /// Base URL of the allow-list store
    #[arg(long, value_name = "URL", env = "SCANGATE_STORE_URL")]
    pub store_url: Option<String>,

    /// Node under the store base URL holding the allow-list
    #[arg(long, value_name = "NODE", env = "SCANGATE_NODE")]
    pub node: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub store: StoreOpts,

    /// TUI theme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,
}

/// Arguments for the check subcommand.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// The code to validate
    #[arg(value_name = "CODE")]
    pub code: String,

    #[command(flatten)]
    pub store: StoreOpts,
}

/// Arguments for the push subcommand.
#[derive(Debug, Args)]
pub struct PushArgs {
    /// JSON file containing an array of valid codes
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub store: StoreOpts,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// TUI theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeArg {
    /// High-contrast dark palette
    #[default]
    Dark,
    /// High-contrast light palette
    Light,
}

impl std::fmt::Display for ThemeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeArg::Dark => write!(f, "dark"),
            ThemeArg::Light => write!(f, "light"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_scan() {
        let cli = Cli::try_parse_from([
            "scangate",
            "scan",
            "--store-url",
            "https://example.test",
            "--theme",
            "light",
        ])
        .unwrap();

        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.store.store_url.as_deref(), Some("https://example.test"));
                assert_eq!(args.theme, Some(ThemeArg::Light));
            }
            _ => panic!("expected scan subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_check_with_code() {
        let cli = Cli::try_parse_from(["scangate", "check", "BAG-20250001"]).unwrap();
        match cli.command {
            Commands::Check(args) => assert_eq!(args.code, "BAG-20250001"),
            _ => panic!("expected check subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_push_with_yes() {
        let cli = Cli::try_parse_from(["scangate", "push", "codes.json", "-y"]).unwrap();
        match cli.command {
            Commands::Push(args) => {
                assert_eq!(args.file, PathBuf::from("codes.json"));
                assert!(args.yes);
            }
            _ => panic!("expected push subcommand"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli =
            Cli::try_parse_from(["scangate", "-vv", "--json-errors", "check", "X"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json_errors);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["scangate", "-v", "-q", "check", "X"]).is_err());
    }

    #[test]
    fn test_check_requires_code() {
        assert!(Cli::try_parse_from(["scangate", "check"]).is_err());
    }

    #[test]
    fn test_theme_arg_display() {
        assert_eq!(ThemeArg::Dark.to_string(), "dark");
        assert_eq!(ThemeArg::Light.to_string(), "light");
    }
}
