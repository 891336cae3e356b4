// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intake - business form intake service.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod forms;
mod serve;
mod shutdown;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use intake_config::{ConfigError, IntakeConfig};
use intake_core::IntakeError;

/// Intake - validate and store business form submissions.
#[derive(Parser, Debug)]
#[command(name = "intake", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the XDG lookup.
    #[arg(long, short, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP intake server.
    Serve,
    /// Print the effective configuration as TOML.
    Config,
    /// List registered form types, their collections and fields.
    Forms {
        /// Also show how many records each collection holds.
        #[arg(long)]
        counts: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<IntakeConfig, Vec<ConfigError>> {
    match path {
        Some(path) => intake_config::load_and_validate_path(path),
        None => intake_config::load_and_validate(),
    }
}

fn render_config(config: &IntakeConfig) -> Result<String, IntakeError> {
    toml::to_string_pretty(config).map_err(|e| IntakeError::Config(e.to_string()))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            intake_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Config) => render_config(&config).map(|rendered| print!("{rendered}")),
        Some(Commands::Forms { counts }) => forms::run_forms(&config, counts).await,
        None => {
            println!("intake: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the stats epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_serve_with_config_path() {
        let cli = Cli::try_parse_from(["intake", "serve", "--config", "/tmp/intake.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/intake.toml")));
    }

    #[test]
    fn cli_parses_forms_counts() {
        let cli = Cli::try_parse_from(["intake", "forms", "--counts"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Forms { counts: true })));
    }

    #[test]
    fn rendered_config_round_trips_through_loader() {
        let config = intake_config::load_and_validate_str("[server]\nport = 9123\n").unwrap();
        let rendered = render_config(&config).unwrap();
        let reloaded = intake_config::load_and_validate_str(&rendered).unwrap();
        assert_eq!(reloaded.server.port, 9123);
        assert_eq!(reloaded.storage.database_path, config.storage.database_path);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let errors = load_config(Some(Path::new("/no/such/intake.toml"))).unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
