//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use diagnosa_domain::classifier::FALLBACK_PRIOR;
use diagnosa_domain::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the home directory holding config, history and database.
const APP_DIR: &str = ".diagnosa";

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database path; a leading `~/` expands to the home directory
    #[serde(default = "default_database")]
    pub database: String,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Classifier tuning
    #[serde(default)]
    pub classifier: ClassifierSettings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Questionnaire history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Prior for catalog diseases without cases
    #[serde(default = "default_fallback_prior")]
    pub fallback_prior: f64,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Application directory (`~/.diagnosa`).
    pub fn app_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(APP_DIR))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::app_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path or create default.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from a file.
    ///
    /// A missing file is created with the defaults. A file that does not
    /// parse is an error and is left untouched.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Resolve the database path, expanding a leading `~/`.
    pub fn database_path(&self) -> Result<PathBuf> {
        expand_home(&self.database)
    }

    /// Classifier configuration, validated.
    pub fn classifier_config(&self) -> Result<ClassifierConfig> {
        let config = ClassifierConfig {
            fallback_prior: self.classifier.fallback_prior,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            settings: Settings::default(),
            classifier: ClassifierSettings::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            fallback_prior: FALLBACK_PRIOR,
        }
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    if path == ":memory:" {
        return Ok(PathBuf::from(path));
    }

    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}

fn default_database() -> String {
    format!("~/{}/diagnosa.db", APP_DIR)
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

fn default_fallback_prior() -> f64 {
    FALLBACK_PRIOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database, "~/.diagnosa/diagnosa.db");
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.classifier.fallback_prior, FALLBACK_PRIOR);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            database = "/tmp/clinic.db"

            [settings]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.database, "/tmp/clinic.db");
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(config.settings.history_size, 1000);
        assert_eq!(config.classifier.fallback_prior, FALLBACK_PRIOR);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.database = "/var/lib/diagnosa.db".to_string();
        config.classifier.fallback_prior = 1e-4;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.database, "/var/lib/diagnosa.db");
        assert_eq!(loaded.classifier.fallback_prior, 1e-4);
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.database, default_database());
        assert!(path.exists());

        let written: Config = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.database, default_database());
    }

    #[test]
    fn test_malformed_file_is_error_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let contents = "database = \"/tmp/mine.db\"\n\n[classifier]\nfallback_prior = \"oops\"\n";
        fs::write(&path, contents).unwrap();

        assert!(matches!(Config::load_from(&path), Err(CliError::Toml(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn test_invalid_fallback_prior_rejected() {
        let mut config = Config::default();
        config.classifier.fallback_prior = 2.0;
        assert!(matches!(
            config.classifier_config(),
            Err(CliError::Classification(_))
        ));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path.db").unwrap(), PathBuf::from("/abs/path.db"));
        assert_eq!(expand_home(":memory:").unwrap(), PathBuf::from(":memory:"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/x.db").unwrap(), home.join("x.db"));
        }
    }
}
