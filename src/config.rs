use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_API_URL: &str = "https://api.fleetctl.io";
const DEFAULT_DASHBOARD_URL: &str = "https://dashboard.fleetctl.io";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const ENV_CONFIG_PATH: &str = "FLEETCTL_CONFIG";
const ENV_API_URL: &str = "FLEETCTL_API_URL";
const ENV_DASHBOARD_URL: &str = "FLEETCTL_DASHBOARD_URL";
const ENV_API_TOKEN: &str = "FLEETCTL_API_TOKEN";
const ENV_V13: &str = "FLEETCTL_V13";
const ENV_TIMEOUT_MS: &str = "FLEETCTL_TIMEOUT_MS";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub dashboard_url: String,
    pub api_token: Option<String>,
    /// Whether this environment opted into v13 behavior ahead of the flag.
    pub v13: bool,
    pub timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            api_token: None,
            v13: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    dashboard_url: Option<String>,
    api_token: Option<String>,
    v13: Option<bool>,
    timeout_ms: Option<u64>,
}

impl Settings {
    /// Defaults, then the config file, then `FLEETCTL_*` environment variables.
    pub fn load() -> Result<Self> {
        let path = config_file_path();
        let file = load_file(&path)?;
        let mut settings = Settings::default();
        settings.apply_file(file);
        settings.apply_env(|key| env::var(key).ok())?;
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(api_url) = file.api_url {
            self.api_url = api_url;
        }
        if let Some(dashboard_url) = file.dashboard_url {
            self.dashboard_url = dashboard_url;
        }
        if file.api_token.is_some() {
            self.api_token = file.api_token;
        }
        if let Some(v13) = file.v13 {
            self.v13 = v13;
        }
        if let Some(timeout_ms) = file.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_url) = lookup(ENV_API_URL) {
            self.api_url = api_url;
        }
        if let Some(dashboard_url) = lookup(ENV_DASHBOARD_URL) {
            self.dashboard_url = dashboard_url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|token| !token.is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(raw) = lookup(ENV_V13) {
            self.v13 = parse_flag(&raw)
                .with_context(|| format!("invalid {} value \"{}\"", ENV_V13, raw))?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {} value \"{}\"", ENV_TIMEOUT_MS, raw))?;
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(anyhow::anyhow!("expected a boolean, got \"{}\"", other)),
    }
}

fn load_file(path: &Path) -> Result<FileSettings> {
    if !path.exists() {
        debug!("[CLI][CONFIG] no config file at {}", path.display());
        return Ok(FileSettings::default());
    }
    debug!("[CLI][CONFIG] loading {}", path.display());
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let file = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(file)
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var(ENV_CONFIG_PATH) {
        PathBuf::from(path)
    } else if let Some(proj) = ProjectDirs::from("io", "fleetctl", "fleetctl") {
        proj.config_dir().join("config.json")
    } else if let Ok(current) = env::current_dir() {
        current.join(".fleetctl.json")
    } else {
        env::temp_dir().join("fleetctl.json")
    }
}
