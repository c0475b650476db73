//! scangate - Terminal Gate Check Scanner
//!
//! Validates scanned codes against a remote allow-list and reports a
//! binary verdict. The scan session state machine lives in [`session`];
//! the interactive screen in [`tui`]; the store adapter in [`store`].

pub mod cli;
pub mod config;
pub mod error;
pub mod link;
pub mod logging;
pub mod session;
pub mod signal;
pub mod store;
pub mod tui;

use std::fs;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use cli::{CheckArgs, Cli, Commands, PushArgs, ScanArgs, StoreOpts, ThemeArg};
use config::Config;
use error::ExitCode;
use link::SystemOpener;
use session::ScanSession;
use store::{AllowListStore, HttpStore};
use tui::{App, Theme};

/// Run the application logic for the parsed CLI.
///
/// # Errors
///
/// Returns an error for fatal failures (missing configuration, store
/// write failures, terminal errors); expected negative outcomes are
/// encoded in the returned [`ExitCode`] instead.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let config = Config::load();

    match cli.command {
        Commands::Scan(args) => run_scan(args, &config),
        Commands::Check(args) => run_check(args, &config, cli.quiet),
        Commands::Push(args) => run_push(args, &config, cli.quiet),
    }
}

/// Resolved store coordinates after merging CLI, environment, and config.
#[derive(Debug)]
struct StoreSettings {
    url: String,
    node: String,
    timeout: Duration,
}

fn resolve_store(opts: &StoreOpts, config: &Config) -> Result<StoreSettings> {
    let url = opts
        .store_url
        .clone()
        .or_else(|| config.store_url.clone())
        .context(
            "no allow-list store configured; pass --store-url, set SCANGATE_STORE_URL, \
             or add store_url to the config file",
        )?;

    let node = opts.node.clone().unwrap_or_else(|| config.node.clone());
    let timeout = Duration::from_secs(opts.timeout.unwrap_or(config.timeout_secs));

    Ok(StoreSettings { url, node, timeout })
}

fn build_store(settings: &StoreSettings) -> HttpStore {
    HttpStore::new(&settings.url, &settings.node, settings.timeout)
}

fn run_scan(args: ScanArgs, config: &Config) -> Result<ExitCode> {
    let settings = resolve_store(&args.store, config)?;
    let store: Arc<dyn AllowListStore> = Arc::new(build_store(&settings));

    let theme = match args.theme.unwrap_or(config.theme) {
        ThemeArg::Dark => Theme::dark(),
        ThemeArg::Light => Theme::light(),
    };

    let handler = signal::install_handler()?;
    let opener = SystemOpener::new();
    let mut app = App::with_theme(theme);

    log::info!(
        "starting scan screen against {} (node {})",
        settings.url,
        settings.node
    );
    tui::run_tui(&mut app, store, &opener, Some(handler.get_flag()))?;

    if handler.is_shutdown_requested() {
        Ok(ExitCode::Interrupted)
    } else {
        Ok(ExitCode::Success)
    }
}

fn run_check(args: CheckArgs, config: &Config, quiet: bool) -> Result<ExitCode> {
    let settings = resolve_store(&args.store, config)?;
    let store = build_store(&settings);

    let mut session = ScanSession::new();
    let request = session
        .on_decode(&args.code)
        .context("cannot validate an empty code")?;
    session.lookup_issued(request.generation);
    session.on_lookup_complete(request.generation, store.fetch());

    match (session.verdict(), session.failure()) {
        (Some(true), _) => {
            if !quiet {
                println!("valid: {}", args.code);
            }
            Ok(ExitCode::Success)
        }
        (Some(false), _) => {
            if !quiet {
                println!("invalid: {}", args.code);
            }
            Ok(ExitCode::Invalid)
        }
        (None, Some(failure)) => Err(anyhow::Error::new(failure.clone())),
        (None, None) => bail!("lookup produced no outcome"),
    }
}

fn run_push(args: PushArgs, config: &Config, quiet: bool) -> Result<ExitCode> {
    let settings = resolve_store(&args.store, config)?;
    let store = build_store(&settings);

    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let codes: Vec<String> = serde_json::from_str(&content)
        .with_context(|| format!("{} must contain a JSON array of strings", args.file.display()))?;

    if codes.is_empty() {
        bail!("refusing to publish an empty allow-list; the store node would be cleared");
    }

    if !args.yes && !confirm_push(codes.len(), &store.node_url())? {
        if !quiet {
            println!("Push cancelled.");
        }
        return Ok(ExitCode::Success);
    }

    store.publish(&codes)?;

    if !quiet {
        println!("Published {} codes to {}", codes.len(), store.node_url());
    }
    Ok(ExitCode::Success)
}

/// Ask the operator to confirm overwriting the store node.
fn confirm_push(count: usize, url: &str) -> Result<bool> {
    print!("Replace the allow-list at {} with {} codes? [y/N]: ", url, count);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();

    Ok(answer == "y" || answer == "yes")
}
