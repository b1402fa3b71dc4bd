//! Drives startup: resolves paths, prepares directories, brings up logging, reads the saved
//! plugin, assembles the `StartupConfig` and dispatches to the main window or `where`.
//!
//! Functions:
//!
//! - `run` performs the startup sequence for every command.
//! - `print_where` backs the `where` subcommand.

use std::env;
use std::io;

use anyhow::{Context, Result};
use emscore::{
    decode, launch, prepare_directories, saved_plugin_path, AppPaths, LaunchOptions,
    PathResolver, StartupConfig,
};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::console::ConsoleWindow;
use crate::logging;

pub fn run(cli: Cli) -> Result<()> {
    let paths = PathResolver::discover().resolve();
    let report = prepare_directories(&paths);
    let _log_guard = logging::initialise_logging(&paths.log_file());
    report.log();
    tracing::debug!(
        family = paths.family().as_str(),
        base = %paths.base_dir().display(),
        defaults = %paths.defaults_dir().display(),
        settings = %paths.settings_dir().display(),
        home = %paths.local_home_dir().display(),
        log = %paths.log_file().display(),
        "resolved EMStudio paths"
    );

    match cli.command {
        Some(Command::Where { json }) => {
            let config = assemble(&paths, cli.run.into_launch_options());
            print_where(&paths, &config, json)
        }
        None => {
            let options = cli.run.into_launch_options();
            if let Some(legacy) = legacy_disagreement(env::args().skip(1), &options) {
                debug!(?legacy, ?options, "legacy argument decoding disagrees with clap");
            }
            let config = assemble(&paths, options);
            if config.autoconnect() {
                tracing::info!("autoconnect requested");
            }
            let mut window = ConsoleWindow::new(io::stdout().lock());
            launch(&config, &mut window);
            Ok(())
        }
    }
}

/// Decodes the raw tokens the schema-free way and returns the legacy reading of them when it
/// differs from what clap produced (e.g. values split across tokens or env fallbacks).
fn legacy_disagreement<I>(tokens: I, options: &LaunchOptions) -> Option<LaunchOptions>
where
    I: IntoIterator<Item = String>,
{
    let raw = decode(tokens);
    debug!(?raw, "raw command line");
    let legacy = LaunchOptions::from_pairs(&raw);
    (legacy != *options).then_some(legacy)
}

fn assemble(paths: &AppPaths, options: LaunchOptions) -> StartupConfig {
    let saved_plugin = if options.plugin_path.is_some() {
        String::new()
    } else {
        saved_plugin_path(&paths.settings_file())
    };
    StartupConfig::assemble(paths, options, &saved_plugin)
}

fn print_where(paths: &AppPaths, config: &StartupConfig, json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(config)
            .context("failed to render startup configuration as JSON")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("EMStudio directories ({}):", paths.family().as_str());
    println!("  base:       {}", paths.base_dir().display());
    println!("  defaults:   {}", config.defaults_dir().display());
    println!("  settings:   {}", config.settings_dir().display());
    println!("  config:     {}", config.settings_file().display());
    println!("  home:       {}", config.local_home_dir().display());
    println!("  profiles:   {}", paths.profiles_dir().display());
    println!("  log:        {}", config.log_file().display());
    if let Some(plugin) = config.plugin_path() {
        println!("Plugin: {plugin}");
    }
    Ok(())
}
