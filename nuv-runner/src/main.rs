//! # nuv-runner
//!
//! Runs a nuv script with the `nuv` and `process` modules enabled.
//!
//! ## Configuration
//!
//! The runner reads configuration from `$XDG_CONFIG_HOME/nuv/config.toml`,
//! or from the file given with `--config`. Run with `--init-config` to write
//! a documented default file.
//!
//! ## Running
//!
//! ```bash
//! # Run a script with arguments
//! nuv-runner deploy.rhai prod --dry-run
//!
//! # With debug logging
//! RUST_LOG=debug nuv-runner deploy.rhai
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use nuv_bridge::ProcessSnapshot;
use nuv_runner::config::Config;
use nuv_runner::script::{build_engine, run_script};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "nuv-runner")]
#[command(about = "Run nuv scripts with host capabilities", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/nuv/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overriding the configuration file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Write the default configuration file and exit
    #[arg(long)]
    init_config: bool,

    /// Script to run
    #[arg(required_unless_present = "init_config")]
    script: Option<PathBuf>,

    /// Arguments passed to the script as process::argv
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        let path = match cli.config {
            Some(path) => path,
            None => Config::default_config_path()?,
        };
        Config::create_default_file(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    // Initialize logging; RUST_LOG takes precedence over the configured level
    let level = cli.log_level.as_deref().unwrap_or(&config.runner.log_level);
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {level}"))?,
    };
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting nuv-runner v{}", env!("CARGO_PKG_VERSION"));

    let script = cli.script.context("No script given")?;
    let mut argv = vec![script.to_string_lossy().into_owned()];
    argv.extend(cli.args);
    let snapshot = ProcessSnapshot::new(argv, ProcessSnapshot::capture().env);

    let engine = build_engine(&config, &snapshot)?;
    run_script(&engine, &script)
}
