use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use url::Url;
use userlist_config::Config;
use userlist_output::OutputRenderer;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Store the API base URL for a profile
    SetUrl(SetUrlArgs),
    /// List configured profiles
    Show,
}

#[derive(Args, Debug, Clone)]
pub struct SetUrlArgs {
    /// API base URL (e.g. https://randomuser.me/api)
    pub url: String,
    /// Profile name to create or update.
    #[arg(long, default_value = "default")]
    pub profile: String,
}

pub fn handle(
    command: ConfigCommand,
    config: &mut Config,
    config_path: Option<&Path>,
    renderer: &OutputRenderer,
) -> Result<()> {
    match command {
        ConfigCommand::SetUrl(args) => set_url(args, config, config_path),
        ConfigCommand::Show => show(config, renderer),
    }
}

fn set_url(args: SetUrlArgs, config: &mut Config, config_path: Option<&Path>) -> Result<()> {
    let url = Url::parse(args.url.trim())
        .with_context(|| format!("'{}' is not a valid URL", args.url))?;

    config.set_base_url(&args.profile, url.as_str());
    config.save(config_path)?;

    tracing::info!(profile = %args.profile, base_url = %url, "Saved base URL");
    Ok(())
}

#[derive(Serialize, Debug)]
struct ProfileRow<'a> {
    profile: &'a str,
    base_url: &'a str,
    default: bool,
}

fn profile_rows(config: &Config) -> Vec<ProfileRow<'_>> {
    let mut rows: Vec<ProfileRow<'_>> = config
        .profiles
        .iter()
        .map(|(name, profile)| ProfileRow {
            profile: name.as_str(),
            base_url: profile.base_url.as_deref().unwrap_or(""),
            default: config.default_profile.as_deref() == Some(name.as_str()),
        })
        .collect();
    rows.sort_by(|a, b| a.profile.cmp(b.profile));
    rows
}

fn show(config: &Config, renderer: &OutputRenderer) -> Result<()> {
    let rows = profile_rows(config);
    if rows.is_empty() {
        tracing::info!("No profiles configured");
        return Ok(());
    }
    renderer.render(&rows)
}
