mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use commands::config::ConfigCommand;
use commands::list::ListArgs;
use colored::Colorize;
use tracing_subscriber::{fmt, EnvFilter};
use userlist_api::error::ApiError;
use userlist_api::ApiClient;
use userlist_config::{resolve_base_url, Config, BASE_URL_ENV};
use userlist_output::{OutputFormat, OutputRenderer};

#[derive(Parser, Debug)]
#[command(name = "userlist", version, about = "Browse users from a paginated user list API", long_about = None)]
struct Cli {
    /// Profile to use from config file
    #[arg(short, long)]
    profile: Option<String>,

    /// Path to config file (defaults to ~/.userlist/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// API base URL, overrides the API_URL env var and the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Enable verbose logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: UserlistCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum UserlistCommand {
    /// Fetch one page of users
    List(ListArgs),
    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(cli.debug) {
        eprintln!("{} {err:#}", "error:".red().bold());
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone();
    let mut config = Config::load(config_path.as_ref())?;
    let renderer = OutputRenderer::new(cli.output);

    match cli.command {
        UserlistCommand::List(args) => {
            let env_url = std::env::var(BASE_URL_ENV).ok();
            let base_url = resolve_base_url(
                cli.base_url.as_deref(),
                env_url.as_deref(),
                &config,
                cli.profile.as_deref(),
            )?;
            let client = ApiClient::new(&base_url)?;
            commands::list::execute(args, &client, &renderer).await?
        }
        UserlistCommand::Config(command) => {
            commands::config::handle(command, &mut config, config_path.as_deref(), &renderer)?
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug { "info,userlist=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}

fn report(err: &anyhow::Error) {
    eprintln!("{} {err:#}", "error:".red().bold());
    if let Some(hint) = err.downcast_ref::<ApiError>().and_then(ApiError::suggestion) {
        eprintln!("{} {hint}", "hint:".yellow().bold());
    }
}
