//! folio.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub site: SiteConfig,
    pub server: ServerConfig,
    pub capabilities: CapabilitiesConfig,
    pub content: ContentConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub default_locale: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Folio".to_string(),
            default_locale: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Parameter validation switches for capability resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilitiesConfig {
    pub strict_types: bool,
    pub allow_unknown_parameters: bool,
}

impl Default for CapabilitiesConfig {
    fn default() -> Self {
        Self {
            strict_types: true,
            allow_unknown_parameters: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// JSON seed file for the portfolio modules, relative to the config file.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,folio=debug".to_string(),
        }
    }
}

impl FolioConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: FolioConfig = toml::from_str(&content)?;
        if let (Some(content_path), Some(base)) = (&config.content.path, path.parent()) {
            if content_path.is_relative() {
                config.content.path = Some(base.join(content_path));
            }
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a folio.toml for a new site.
    pub fn scaffold(name: &str) -> Self {
        FolioConfig {
            site: SiteConfig {
                name: name.to_string(),
                ..Default::default()
            },
            content: ContentConfig {
                path: Some(PathBuf::from("content.json")),
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold() {
        let config = FolioConfig::scaffold("my-portfolio");
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("my-portfolio"));
        assert!(toml_str.contains("strict_types = true"));
    }

    #[test]
    fn test_parse_minimal() {
        let config: FolioConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert!(config.capabilities.strict_types);
        assert!(!config.capabilities.allow_unknown_parameters);
        assert!(config.content.path.is_none());
    }

    #[test]
    fn test_parse_partial_table() {
        let toml_str = r#"
[capabilities]
allow_unknown_parameters = true
"#;
        let config: FolioConfig = toml::from_str(toml_str).unwrap();
        assert!(config.capabilities.strict_types);
        assert!(config.capabilities.allow_unknown_parameters);
    }

    #[test]
    fn test_content_path_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "[content]\npath = \"seed.json\"\n").unwrap();

        let config = FolioConfig::from_file(&path).unwrap();
        assert_eq!(config.content.path, Some(dir.path().join("seed.json")));
    }
}
