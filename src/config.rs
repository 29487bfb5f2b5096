use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::analysis::style::DEFAULT_MAX_LINE_LENGTH;

/// Looked up in the current directory when no explicit path is given.
pub const CONFIG_FILE: &str = ".code-analyzer.toml";

const DEFAULT_MAX_STYLE_VIOLATIONS: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .code-analyzer.toml.
/// All fields are optional; an empty file behaves like no file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub style: StyleConfig,

    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    /// Longest line, in characters, before a "line too long" violation
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryConfig {
    /// Directory names skipped while walking (e.g., ["venv", ".git"])
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Style violations listed per file in the rendered report
    #[serde(default = "default_max_style_violations")]
    pub max_style_violations: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_style_violations: DEFAULT_MAX_STYLE_VIOLATIONS,
        }
    }
}

fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LENGTH
}

fn default_max_style_violations() -> usize {
    DEFAULT_MAX_STYLE_VIOLATIONS
}

impl Config {
    /// Load configuration from `explicit` if given, otherwise from
    /// .code-analyzer.toml in the current directory.
    /// Returns default config if no file is found.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.style.max_line_length, 79);
        assert!(config.discovery.exclude.is_empty());
        assert_eq!(config.report.max_style_violations, 3);
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[style]
max_line_length = 99

[discovery]
exclude = ["venv", ".git", "build"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.style.max_line_length, 99);
        assert_eq!(config.discovery.exclude.len(), 3);
        assert_eq!(config.report.max_style_violations, 3);
    }

    #[test]
    fn test_empty_sections_keep_defaults() {
        let config: Config = toml::from_str("[style]\n[report]\n").unwrap();
        assert_eq!(config.style.max_line_length, 79);
        assert_eq!(config.report.max_style_violations, 3);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[report]\nmax_style_violations = 10\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.report.max_style_violations, 10);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[style\nmax_line_length = ").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }
}
