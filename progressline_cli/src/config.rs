use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use progressline_core::DEFAULT_SAMPLES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::presets::Preset;

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub demo: DemoConfig,

    #[serde(default)]
    pub samples: SamplesConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DisplayConfig {
    /// Line width; 0 means detect from the terminal
    pub width: usize,
    pub preset: Preset,
    pub marker: String,
    pub fill: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DemoConfig {
    pub max_value: f64,
    pub delay_ms: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SamplesConfig {
    pub window: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 0,
            preset: Preset::Default,
            marker: "#".to_string(),
            fill: " ".to_string(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            max_value: 10.0 * 1024.0 * 1024.0,
            delay_ms: 40,
        }
    }
}

impl Default for SamplesConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_SAMPLES,
        }
    }
}

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with default XDG-compliant paths
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    /// Get the default XDG-compliant configuration path
    fn default_config_path() -> PathBuf {
        // Check for XDG_CONFIG_HOME override first (Linux/macOS)
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("progressline/config.toml");
        }

        #[cfg(target_os = "linux")]
        {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config/progressline/config.toml")
        }

        #[cfg(not(target_os = "linux"))]
        {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("progressline")
                .join("config.toml")
        }
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new();

        // Layer 1: Defaults
        figment = figment.merge(Serialized::defaults(AppConfig::default()));

        // Layer 2: Config file (if exists)
        if self.config_path.exists() {
            log::debug!("Reading configuration from {}", self.config_path.display());
            figment = figment.merge(Toml::file(&self.config_path));
        }

        // Layer 3: Environment variables
        figment = figment.merge(Env::prefixed("PROGRESSLINE_").split("__"));

        figment.extract().context("Failed to load configuration")
    }

    /// Get a configuration value by key (dot notation)
    pub fn get(&self, key: &str) -> Result<String> {
        let value = self.load_value()?;

        let mut current = &value;
        for part in key.split('.') {
            match current {
                toml::Value::Table(table) => {
                    current = table
                        .get(part)
                        .ok_or_else(|| anyhow::anyhow!("Key '{}' not found", key))?;
                }
                _ => anyhow::bail!("Invalid key path: {}", key),
            }
        }

        scalar_to_string(current)
            .ok_or_else(|| anyhow::anyhow!("Value at '{}' is not a simple type", key))
    }

    /// Set a configuration value by key (dot notation)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parsed = Self::parse_config_value(key, value)?;

        let mut config = if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            toml::from_str(&content)?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        let (section, name) = key
            .split_once('.')
            .ok_or_else(|| anyhow::anyhow!("Invalid key path: {}", key))?;
        let toml::Value::Table(root) = &mut config else {
            anyhow::bail!("Configuration file is not a table");
        };
        let table = root
            .entry(section.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
        let toml::Value::Table(table) = table else {
            anyhow::bail!("Invalid key path: expected table at '{}'", section);
        };
        table.insert(name.to_string(), parsed);

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_string = toml::to_string_pretty(&config)?;
        fs::write(&self.config_path, toml_string)?;

        // Reject files that no longer deserialize
        self.load()?;
        Ok(())
    }

    /// List all configuration values
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let value = self.load_value()?;

        let mut items = Vec::new();
        Self::collect_values(&value, String::new(), &mut items);
        items.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(items)
    }

    fn load_value(&self) -> Result<toml::Value> {
        let config = self.load()?;
        let toml_string = toml::to_string(&config)?;
        Ok(toml::from_str(&toml_string)?)
    }

    /// Recursively collect all key-value pairs from TOML
    fn collect_values(value: &toml::Value, prefix: String, items: &mut Vec<(String, String)>) {
        if let toml::Value::Table(table) = value {
            for (key, val) in table {
                let new_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                Self::collect_values(val, new_prefix, items);
            }
        } else if let Some(text) = scalar_to_string(value) {
            items.push((prefix, text));
        }
    }

    /// Parse and validate a value for `key`
    fn parse_config_value(key: &str, value: &str) -> Result<toml::Value> {
        match key {
            "display.width" | "samples.window" | "demo.delay_ms" => {
                let number: u32 = value
                    .parse()
                    .with_context(|| format!("{key} must be a non-negative integer"))?;
                if key == "samples.window" && number == 0 {
                    anyhow::bail!("samples.window must be at least 1");
                }
                Ok(toml::Value::Integer(number.into()))
            }
            "demo.max_value" => {
                let number: f64 = value.parse().context("demo.max_value must be a number")?;
                if !(number.is_finite() && number > 0.0) {
                    anyhow::bail!("demo.max_value must be greater than 0");
                }
                Ok(toml::Value::Float(number))
            }
            "display.marker" | "display.fill" => {
                if value.chars().count() != 1 {
                    anyhow::bail!("{key} must be exactly one character");
                }
                Ok(toml::Value::String(value.to_string()))
            }
            "display.preset" => {
                let preset: Preset = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
                Ok(toml::Value::String(preset.name().to_string()))
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }
    }
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Load configuration from the default location
pub fn get_config() -> Result<AppConfig> {
    ConfigManager::new().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));
        let config = manager.load().unwrap();

        assert_eq!(config.display.width, 0);
        assert_eq!(config.display.preset, Preset::Default);
        assert_eq!(config.samples.window, DEFAULT_SAMPLES);
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(ConfigManager::parse_config_value("display.marker", "##").is_err());
        assert!(ConfigManager::parse_config_value("samples.window", "0").is_err());
        assert!(ConfigManager::parse_config_value("demo.max_value", "-3").is_err());
        assert!(ConfigManager::parse_config_value("display.preset", "fancy").is_err());
        assert!(ConfigManager::parse_config_value("nope.key", "1").is_err());
    }

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(&toml::Value::Integer(3)), Some("3".to_string()));
        assert_eq!(scalar_to_string(&toml::Value::Array(vec![])), None);
    }
}
