//! Configuration loading and resolution
//!
//! Each value resolves in priority order:
//! 1. Command-line argument (handled by the binary)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! A missing TOML file is not an error; the service starts on defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

pub const APP_DIR_NAME: &str = "fleet-roster";
pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_RECOMMENDER_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_RECOMMENDER_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const ENV_SPREADSHEET_ID: &str = "SPREADSHEET_ID";
pub const ENV_RANGE: &str = "RANGE";
pub const ENV_SHEETS_API_KEY: &str = "GOOGLE_SHEETS_API_KEY";
pub const ENV_ADMIN_TOKEN: &str = "ADMIN_TOKEN";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GENAI_API_KEY: &str = "GOOGLE_GENAI_API_KEY";
pub const ENV_DATA_DIR: &str = "ROSTER_DATA_DIR";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Directory holding the snapshot, sync status and admin files
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Secret compared against submitted admin tokens
    #[serde(default)]
    pub admin_token: Option<String>,

    #[serde(default)]
    pub recommender: RecommenderConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Google Sheets connection parameters
///
/// All three are required for a sync but are checked lazily, so the
/// dashboard can still serve an existing snapshot without them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Validated sheet location and credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetCoordinates {
    pub spreadsheet_id: String,
    pub range: String,
    pub api_key: String,
}

impl SheetsConfig {
    /// Require all three values, naming every missing one
    pub fn validate(&self) -> Result<SheetCoordinates> {
        let mut missing = Vec::new();
        if !is_set(&self.spreadsheet_id) {
            missing.push(ENV_SPREADSHEET_ID);
        }
        if !is_set(&self.range) {
            missing.push(ENV_RANGE);
        }
        if !is_set(&self.api_key) {
            missing.push(ENV_SHEETS_API_KEY);
        }

        match (&self.spreadsheet_id, &self.range, &self.api_key) {
            (Some(spreadsheet_id), Some(range), Some(api_key)) if missing.is_empty() => {
                Ok(SheetCoordinates {
                    spreadsheet_id: spreadsheet_id.trim().to_string(),
                    range: range.trim().to_string(),
                    api_key: api_key.trim().to_string(),
                })
            }
            _ => Err(Error::Config(format!(
                "Missing Google Sheets API configuration: {}",
                missing.join(", ")
            ))),
        }
    }
}

/// Generative recommendation backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommenderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl RecommenderConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_RECOMMENDER_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_RECOMMENDER_BASE_URL)
    }

    pub fn is_configured(&self) -> bool {
        is_set(&self.api_key)
    }
}

/// Non-empty, non-whitespace value
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().map(is_valid_value).unwrap_or(false)
}

impl TomlConfig {
    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the config file if it exists, otherwise defaults
    ///
    /// `explicit` is the path given on the command line or via
    /// `ROSTER_CONFIG`; a missing explicit file is reported as a warning.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => {
                    warn!("Could not determine config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if path.exists() {
            info!("Loading configuration from {}", path.display());
            Self::load(&path)
        } else {
            if explicit.is_some() {
                warn!("Config file not found: {} (using defaults)", path.display());
            }
            Ok(Self::default())
        }
    }

    /// Overlay process environment variables
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Overlay values from an environment lookup; set values win over TOML
    pub fn apply_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |name: &str| lookup(name).filter(|v| is_valid_value(v));

        if let Some(v) = env(ENV_SPREADSHEET_ID) {
            self.sheets.spreadsheet_id = Some(v);
        }
        if let Some(v) = env(ENV_RANGE) {
            self.sheets.range = Some(v);
        }
        if let Some(v) = env(ENV_SHEETS_API_KEY) {
            self.sheets.api_key = Some(v);
        }
        if let Some(v) = env(ENV_ADMIN_TOKEN) {
            self.admin_token = Some(v);
        }
        if let Some(v) = env(ENV_GEMINI_API_KEY).or_else(|| env(ENV_GENAI_API_KEY)) {
            self.recommender.api_key = Some(v);
        }
        if let Some(v) = env(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(v));
        }
        self
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Configured data directory, else the platform default
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Admin secret, if configured and non-blank
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref().filter(|t| is_valid_value(t))
    }
}

/// `<config_dir>/fleet-roster/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// OS-dependent default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_parse_full_toml() {
        let config: TomlConfig = toml::from_str(
            r#"
data_dir = "/srv/roster"
port = 8088
admin_token = "s3cret"

[logging]
level = "debug"

[sheets]
spreadsheet_id = "abc"
range = "Fleet!A1:M500"
api_key = "key"

[recommender]
model = "gemini-1.5-pro"
"#,
        )
        .unwrap();

        assert_eq!(config.data_dir(), PathBuf::from("/srv/roster"));
        assert_eq!(config.port(), 8088);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.admin_token(), Some("s3cret"));
        assert_eq!(config.recommender.model(), "gemini-1.5-pro");
        assert_eq!(config.recommender.base_url(), DEFAULT_RECOMMENDER_BASE_URL);
        assert!(!config.recommender.is_configured());
        assert!(config.sheets.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.recommender.model(), DEFAULT_RECOMMENDER_MODEL);
        assert!(config.admin_token().is_none());
    }

    #[test]
    fn test_validate_names_missing_values() {
        let sheets = SheetsConfig {
            spreadsheet_id: Some("abc".to_string()),
            range: Some("  ".to_string()),
            api_key: None,
        };

        match sheets.validate() {
            Err(Error::Config(msg)) => {
                assert!(msg.contains("RANGE"));
                assert!(msg.contains("GOOGLE_SHEETS_API_KEY"));
                assert!(!msg.contains("SPREADSHEET_ID"));
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_trims_values() {
        let sheets = SheetsConfig {
            spreadsheet_id: Some(" abc ".to_string()),
            range: Some("A1:M".to_string()),
            api_key: Some("key\n".to_string()),
        };
        let coords = sheets.validate().unwrap();
        assert_eq!(coords.spreadsheet_id, "abc");
        assert_eq!(coords.api_key, "key");
    }

    #[test]
    fn test_env_overrides_toml() {
        let mut config = TomlConfig::default();
        config.sheets.range = Some("Old!A:M".to_string());
        config.admin_token = Some("from-toml".to_string());

        let config = config.apply_env_with(lookup(&[
            (ENV_RANGE, "New!A:M"),
            (ENV_SPREADSHEET_ID, "sheet-1"),
            (ENV_ADMIN_TOKEN, ""),
            (ENV_GENAI_API_KEY, "genai-key"),
        ]));

        assert_eq!(config.sheets.range.as_deref(), Some("New!A:M"));
        assert_eq!(config.sheets.spreadsheet_id.as_deref(), Some("sheet-1"));
        // Blank env value does not clobber TOML
        assert_eq!(config.admin_token(), Some("from-toml"));
        assert_eq!(config.recommender.api_key.as_deref(), Some("genai-key"));
    }

    #[test]
    fn test_gemini_key_preferred_over_genai_key() {
        let config = TomlConfig::default().apply_env_with(lookup(&[
            (ENV_GEMINI_API_KEY, "gemini"),
            (ENV_GENAI_API_KEY, "genai"),
        ]));
        assert_eq!(config.recommender.api_key.as_deref(), Some("gemini"));
    }

    #[test]
    fn test_blank_admin_token_is_unset() {
        let config = TomlConfig {
            admin_token: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.admin_token().is_none());
    }
}
