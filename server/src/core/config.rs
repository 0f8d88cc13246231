use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_BODY_LIMIT, DEFAULT_HOST, DEFAULT_PORT,
};

// =============================================================================
// File Config Structs (all fields optional, merged in order)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub body_limit: Option<usize>,
    pub cors_origins: Option<Vec<String>>,
    pub max_chats: Option<usize>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Names of top-level fields this version does not understand
    fn unknown_fields(&self) -> Vec<&str> {
        match &self.extra {
            serde_json::Value::Object(map) => map.keys().map(|k| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        let unknown = self.unknown_fields();
        if !unknown.is_empty() {
            tracing::warn!(
                fields = %unknown.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
            if server.body_limit.is_some() {
                tracing::trace!(body_limit = ?server.body_limit, "Merging server.body_limit");
                current.body_limit = server.body_limit;
            }
            if server.cors_origins.is_some() {
                tracing::trace!(cors_origins = ?server.cors_origins, "Merging server.cors_origins");
                current.cors_origins = server.cors_origins;
            }
            if server.max_chats.is_some() {
                tracing::trace!(max_chats = ?server.max_chats, "Merging server.max_chats");
                current.max_chats = server.max_chats;
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body in bytes
    pub body_limit: usize,
    /// Extra CORS origins besides the server's own address
    pub cors_origins: Vec<String>,
    /// Upper bound on stored chats; `None` keeps everything
    pub max_chats: Option<usize>,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.vizor/vizor.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let profile_path = get_profile_config_path().filter(|path| path.exists());
        Self::load_with_profile(cli, profile_path.as_deref())
    }

    fn load_with_profile(cli: &CliConfig, profile_path: Option<&Path>) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Profile dir config
        if let Some(profile_path) = profile_path {
            let profile_config = FileConfig::load_from_file(profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        // 3. Layer configs: defaults -> file config -> CLI/env overrides
        let file_server = file_config.server.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let body_limit = file_server.body_limit.unwrap_or(DEFAULT_BODY_LIMIT);

        let cors_origins = if cli.cors_origins.is_empty() {
            file_server.cors_origins.unwrap_or_default()
        } else {
            cli.cors_origins.clone()
        };

        let config = Self {
            server: ServerConfig {
                host,
                port,
                body_limit,
                cors_origins,
                max_chats: file_server.max_chats,
            },
        };

        config.validate()?;
        tracing::debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }
        if self.server.body_limit == 0 {
            anyhow::bail!("Configuration error: server.body_limit must be greater than 0");
        }
        if self.server.max_chats == Some(0) {
            anyhow::bail!("Configuration error: server.max_chats must be greater than 0");
        }
        Ok(())
    }
}

/// Get the profile config path (~/.vizor/vizor.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Expand `~` and make relative paths absolute against the working directory
fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    let expanded = if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        }
    } else {
        PathBuf::from(path)
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

/// Check if host binds to all network interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, name: &str, json: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(json.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": {
                "host": "0.0.0.0",
                "port": 8080,
                "body_limit": 1024,
                "cors_origins": ["http://localhost:5173"],
                "max_chats": 500
            }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host, Some("0.0.0.0".to_string()));
        assert_eq!(server.port, Some(8080));
        assert_eq!(server.body_limit, Some(1024));
        assert_eq!(
            server.cors_origins,
            Some(vec!["http://localhost:5173".to_string()])
        );
        assert_eq!(server.max_chats, Some(500));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.unknown_fields().is_empty());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "host": "localhost" }, "unknown_field": 123 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.server.as_ref().unwrap().host,
            Some("localhost".to_string())
        );
        assert_eq!(config.extra.get("unknown_field").unwrap(), 123);
        assert_eq!(config.unknown_fields(), vec!["unknown_field"]);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = FileConfig {
            server: Some(ServerFileConfig {
                host: Some("127.0.0.1".to_string()),
                port: Some(3000),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = FileConfig {
            server: Some(ServerFileConfig {
                port: Some(9000),
                ..Default::default()
            }),
            ..Default::default()
        };

        base.merge(overlay);

        let server = base.server.unwrap();
        assert_eq!(server.host, Some("127.0.0.1".to_string()));
        assert_eq!(server.port, Some(9000));
    }

    #[test]
    fn test_load_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "empty.json", "{}");
        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };

        let config = AppConfig::load_with_profile(&cli, None).unwrap();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.body_limit, DEFAULT_BODY_LIMIT);
        assert!(config.server.cors_origins.is_empty());
        assert!(config.server.max_chats.is_none());
    }

    #[test]
    fn test_load_layers_profile_file_and_cli() {
        let dir = tempfile::tempdir().unwrap();
        let profile = write_config(
            &dir,
            "profile.json",
            r#"{ "server": { "host": "0.0.0.0", "port": 4000, "body_limit": 2048 } }"#,
        );
        let overlay = write_config(&dir, "overlay.json", r#"{ "server": { "port": 5000 } }"#);
        let cli = CliConfig {
            port: Some(6000),
            config: Some(overlay),
            ..Default::default()
        };

        let config = AppConfig::load_with_profile(&cli, Some(&profile)).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.server.body_limit, 2048);
    }

    #[test]
    fn test_load_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "vizor.json",
            r#"{ "server": { "port": 7000, "cors_origins": ["http://a.test"] } }"#,
        );
        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };

        let config = AppConfig::load_with_profile(&cli, None).unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.cors_origins, vec!["http://a.test".to_string()]);
    }

    #[test]
    fn test_cli_cors_origins_replace_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "vizor.json",
            r#"{ "server": { "cors_origins": ["http://file.test"] } }"#,
        );
        let cli = CliConfig {
            config: Some(path),
            cors_origins: vec!["http://cli.test".to_string()],
            ..Default::default()
        };

        let config = AppConfig::load_with_profile(&cli, None).unwrap();
        assert_eq!(config.server.cors_origins, vec!["http://cli.test".to_string()]);
    }

    #[test]
    fn test_load_missing_config_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cli = CliConfig {
            config: Some(dir.path().join("nope.json")),
            ..Default::default()
        };
        let err = AppConfig::load_with_profile(&cli, None).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "bad.json", "{ not json");
        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };
        let err = AppConfig::load_with_profile(&cli, None).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "vizor.json", r#"{ "server": { "port": 0 } }"#);
        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };
        assert!(AppConfig::load_with_profile(&cli, None).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_max_chats() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "vizor.json", r#"{ "server": { "max_chats": 0 } }"#);
        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };
        let err = AppConfig::load_with_profile(&cli, None).unwrap_err();
        assert!(err.to_string().contains("max_chats"));
    }

    #[test]
    fn test_expand_path_absolute_unchanged() {
        assert_eq!(expand_path("/etc/vizor.json"), PathBuf::from("/etc/vizor.json"));
    }

    #[test]
    fn test_expand_path_relative_becomes_absolute() {
        assert!(expand_path("vizor.json").is_absolute());
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(!is_all_interfaces("127.0.0.1"));
    }
}
