//! switchctl - drive a single Switch stage from the command line.
//!
//! Reads one command per line from stdin:
//!
//! ```text
//! read switch
//! write switch 2
//! push 100
//! stats
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use sonic_switch_element::{Command, ElementRegistry, HostConfig, SwitchHost};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Switch element control harness
#[derive(Parser, Debug)]
#[command(name = "switchctl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file describing the stage
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Number of connected outputs (overrides the config file)
    #[arg(short = 'n', long)]
    outputs: Option<usize>,

    /// Configuration argument passed to the element (repeatable)
    #[arg(short = 'a', long = "arg")]
    arguments: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("switchctl: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<HostConfig> {
    let mut config = match &args.config {
        Some(path) => HostConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => HostConfig::default(),
    };
    if let Some(outputs) = args.outputs {
        config = config.with_outputs(outputs);
    }
    if !args.arguments.is_empty() {
        config = config.with_arguments(args.arguments.clone());
    }
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let registry = ElementRegistry::with_standard_elements();

    let mut host = SwitchHost::start(&registry, &config).with_context(|| {
        format!(
            "{}({}) failed to initialize",
            config.element,
            config.arguments.join(", ")
        )
    })?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(message) => {
                warn!("{}", message);
                continue;
            }
        };

        match host.execute(&command) {
            Ok(output) => stdout.write_all(output.as_bytes())?,
            Err(e) => writeln!(stdout, "error: {}", e)?,
        }
        stdout.flush()?;
    }

    info!("switchctl: input closed, exiting");
    Ok(())
}
