//! TOML-based application configuration.
//!
//! Stores:
//! - Backend base URL, endpoint paths and request timeout
//! - Wizard fallback template and icon table
//! - Display locale for month names
//! - SOS alert message bounds
//!
//! Configuration is stored at `~/.config/almaia/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::locale::Locale;
use crate::questions::{IconTable, TemplateTag};

/// Backend collaborator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_questions_path")]
    pub questions_path: String,
    #[serde(default = "default_answers_path")]
    pub answers_path: String,
    #[serde(default = "default_tasks_path")]
    pub tasks_path: String,
    #[serde(default = "default_alerts_path")]
    pub alerts_path: String,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Wizard presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Template used when a question's code is unknown.
    #[serde(default)]
    pub fallback_template: TemplateTag,
    #[serde(default)]
    pub icon_table: IconTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    #[serde(default)]
    pub default_locale: Locale,
}

/// Bounds for SOS alert messages, in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/almaia/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
}

// Default functions
fn default_base_url() -> String {
    "https://api-almaia.onrender.com/api/v1/".into()
}
fn default_questions_path() -> String {
    "alumnos/preguntas".into()
}
fn default_answers_path() -> String {
    "alumnos/respuestas".into()
}
fn default_tasks_path() -> String {
    "colegios/alumnos_tareas".into()
}
fn default_alerts_path() -> String {
    "alumnos/alertas".into()
}
fn default_health_path() -> String {
    "health".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_min_length() -> usize {
    10
}
fn default_max_length() -> usize {
    1000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            questions_path: default_questions_path(),
            answers_path: default_answers_path(),
            tasks_path: default_tasks_path(),
            alerts_path: default_alerts_path(),
            health_path: default_health_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            fallback_template: TemplateTag::GenericChoice,
            icon_table: IconTable::Answers,
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::Es,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot set a whole section".to_string()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Path of the config file in the data directory.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return (and write) the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// [`load`](Self::load) against an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// [`save`](Self::save) against an explicit file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field (including unknown enum names such as an unsupported locale).
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
