use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that points at an alternate config file
pub const CONFIG_ENV: &str = "STUDENT_FORECAST_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub results: ResultsConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout. Requests never time out when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub email_matching: EmailMatching,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsConfig {
    /// Show the placeholder prediction when nothing has been stored yet
    #[serde(default = "default_true")]
    pub demo_fallback: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// How signup and login compare email addresses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmailMatching {
    /// Byte-for-byte comparison, no trimming
    #[default]
    Exact,
    /// Trimmed and lowercased before comparison
    CaseInsensitive,
}

impl EmailMatching {
    /// Normalized form of an email used for comparison and storage
    pub fn key(&self, email: &str) -> String {
        match self {
            EmailMatching::Exact => email.to_string(),
            EmailMatching::CaseInsensitive => email.trim().to_lowercase(),
        }
    }

    pub fn matches(&self, a: &str, b: &str) -> bool {
        self.key(a) == self.key(b)
    }
}

// Default value functions
fn default_base_url() -> String {
    option_env!("API_BASE_URL")
        .unwrap_or("http://localhost:3000/api")
        .to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            demo_fallback: default_true(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.student-forecast/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".student-forecast"))
    }

    /// Get config file path, honouring `STUDENT_FORECAST_CONFIG`
    pub fn config_file() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from a specific file, falling back to defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Directory holding the local database
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("data")),
        }
    }
}
