//! tootline - an interactive command-line client for Mastodon
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tootline::config::Config;
use tootline::shell::{self, Shell};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args()? {
        Command::Run { profile } => run_shell(&profile).await,
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Run { profile: String },
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    let mut profile = String::from("default");
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" | "help" => return Ok(Command::Help),
            "-v" | "--version" | "version" => return Ok(Command::Version),
            "-P" | "--profile" => {
                let name = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow::anyhow!("Missing profile name after {}", args[i]))?;
                profile = name.clone();
                i += 2;
            }
            other => {
                return Err(anyhow::anyhow!(
                    "Unknown argument: {other}\nRun 'tootline --help' for usage"
                ));
            }
        }
    }

    Ok(Command::Run { profile })
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"tootline - an interactive command-line client for Mastodon

USAGE:
    tootline [OPTIONS]

OPTIONS:
    -P, --profile <name>    Profile to log in with (default: "default")
    -h, --help              Show this help message
    -v, --version           Show version information

On first run (or with a new profile name) tootline walks you through
an OAuth login and saves the credentials. Once connected, type 'help'
at the prompt for the list of commands.

CONFIG:
    {}
"#,
        config_path
    );
}

fn print_version() {
    println!("tootline {}", tootline::VERSION);
}

async fn run_shell(profile_name: &str) -> Result<()> {
    let mut config = Config::load()?;

    let profile = match config.profile(profile_name) {
        Some(profile) => profile.clone(),
        None => shell::login(&mut config, profile_name).await?,
    };

    let mut shell = Shell::new(&config, profile_name, &profile).await?;
    shell.run().await
}
