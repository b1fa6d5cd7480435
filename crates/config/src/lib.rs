use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "API_URL";

/// Represents the full CLI configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Config {
    /// Load configuration from the provided path or the default config file.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(Config::default_path);

        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Unable to read config file at {}", path.display()))?;

        serde_yaml::from_str(&raw)
            .with_context(|| format!("Malformed YAML in config file {}", path.display()))
    }

    /// Persist the configuration to disk, creating parent directories if needed.
    pub fn save<P: AsRef<Path>>(&self, path: Option<P>) -> Result<()> {
        let path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(Config::default_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create config directory {}", parent.display())
            })?;
        }

        let serialized = serde_yaml::to_string(self)?;
        fs::write(&path, serialized)
            .with_context(|| format!("Unable to write config file {}", path.display()))?;

        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Returns either the requested profile or falls back to the default one.
    pub fn resolve_profile<'a>(
        &'a self,
        requested: Option<&'a str>,
    ) -> Option<(&'a str, &'a Profile)> {
        if let Some(name) = requested {
            self.profiles.get(name).map(|profile| (name, profile))
        } else if let Some(default_name) = self.default_profile.as_deref() {
            self.profiles
                .get(default_name)
                .map(|profile| (default_name, profile))
        } else {
            // HashMap order is arbitrary; pick the lowest name so the fallback is stable.
            self.profiles
                .iter()
                .min_by(|(a, _), (b, _)| a.cmp(b))
                .map(|(name, profile)| (name.as_str(), profile))
        }
    }

    /// Create or update a profile's base URL. The first profile written
    /// becomes the default.
    pub fn set_base_url(&mut self, profile: &str, base_url: impl Into<String>) {
        self.profiles
            .entry(profile.to_string())
            .or_default()
            .base_url = Some(base_url.into());

        if self.default_profile.is_none() {
            self.default_profile = Some(profile.to_string());
        }
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".userlist");
        path.push("config.yaml");
        path
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    pub base_url: Option<String>,
}

/// Picks the base URL to talk to, in order: explicit flag, the
/// [`BASE_URL_ENV`] value, then the resolved profile. Blank values are skipped.
pub fn resolve_base_url(
    flag: Option<&str>,
    env: Option<&str>,
    config: &Config,
    profile: Option<&str>,
) -> Result<String> {
    let non_blank = |value: &str| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    if let Some(url) = flag.and_then(non_blank) {
        debug!("Using base URL from command line");
        return Ok(url);
    }

    if let Some(url) = env.and_then(non_blank) {
        debug!(var = BASE_URL_ENV, "Using base URL from environment");
        return Ok(url);
    }

    match config.resolve_profile(profile) {
        Some((name, p)) => p
            .base_url
            .as_deref()
            .and_then(non_blank)
            .ok_or_else(|| anyhow!("Profile '{name}' is missing a base_url.")),
        None => match profile {
            Some(name) => Err(anyhow!("Profile '{name}' not found in config.")),
            None => Err(anyhow!(
                "No base URL configured. Set {BASE_URL_ENV}, pass --base-url, or run `userlist config set-url <URL>`."
            )),
        },
    }
}
