//! Client settings: defaults, `journey.toml`, then environment overrides.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::domain::Language;
use tracing::warn;

use crate::transport::api_base_url;

pub const DEFAULT_SETTINGS_FILE: &str = "journey.toml";
pub const DEFAULT_AUTO_ADVANCE_DELAY_MS: u64 = 180;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub api_prefix: String,
    pub language: Language,
    pub auto_advance_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            api_prefix: "/api/v1".into(),
            language: Language::En,
            auto_advance_delay_ms: DEFAULT_AUTO_ADVANCE_DELAY_MS,
            request_timeout_secs: 15,
        }
    }
}

impl ClientSettings {
    pub fn auto_advance_delay(&self) -> Duration {
        Duration::from_millis(self.auto_advance_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        api_base_url(&self.server_url, &self.api_prefix)?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    api_prefix: Option<String>,
    language: Option<String>,
    auto_advance_delay_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `journey.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if path.exists() {
        match read_file_settings(path) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(err) => warn!(path = %path.display(), "config: ignoring settings file: {err:#}"),
        }
    }

    if let Some(v) = env("JOURNEY_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__API_PREFIX") {
        settings.api_prefix = v;
    }
    if let Some(v) = env("APP__LANGUAGE") {
        match v.parse() {
            Ok(language) => settings.language = language,
            Err(err) => warn!("config: {err}"),
        }
    }
    if let Some(v) = env("APP__AUTO_ADVANCE_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.auto_advance_delay_ms = parsed;
        }
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}

fn read_file_settings(path: &Path) -> Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse '{}'", path.display()))
}

fn apply_file_settings(settings: &mut ClientSettings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.api_prefix {
        settings.api_prefix = v;
    }
    if let Some(v) = file_cfg.language {
        match v.parse() {
            Ok(language) => settings.language = language,
            Err(err) => warn!("config: {err}"),
        }
    }
    if let Some(v) = file_cfg.auto_advance_delay_ms {
        settings.auto_advance_delay_ms = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
}

pub fn settings_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
