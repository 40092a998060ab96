//! Server configuration.
//!
//! Every setting is resolved in the same order: environment variable first,
//! then the optional TOML file (`$DOCU_CHAT_CONFIG_PATH`, default
//! `docu_chat.server.toml`), then the built-in default.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const DEFAULT_CONFIG_PATH: &str = "docu_chat.server.toml";

/// Shape of the optional config file. All keys are optional.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerConfigFile {
    pub host: Option<String>,
    pub port: Option<String>,
    pub uploads_directory: Option<String>,
    pub max_upload_mb: Option<String>,
    pub open_browser: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub uploads_directory: PathBuf,
    /// Limit applied to JSON bodies and multipart files.
    pub max_upload_bytes: usize,
    pub open_browser: bool,
}

impl ServerConfig {
    /// Loads the configuration from the process environment and the config file.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var("DOCU_CHAT_CONFIG_PATH") {
            Ok(path) => read_config_file(Path::new(&path), true)?,
            Err(_) => read_config_file(Path::new(DEFAULT_CONFIG_PATH), false)?,
        };
        Self::resolve(|key| std::env::var(key).ok(), file)
    }

    /// Resolves the configuration from an arbitrary variable lookup, so the
    /// precedence rules can be exercised without touching the real environment.
    pub fn resolve(
        var: impl Fn(&str) -> Option<String>,
        file: Option<ServerConfigFile>,
    ) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();

        let host = var("DOCU_CHAT_HOST")
            .or(file.host)
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let port = var("DOCU_CHAT_PORT")
            .or(file.port)
            .unwrap_or_else(|| "8080".to_string());
        let port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("port", port))?;
        let uploads_directory = var("DOCU_CHAT_UPLOADS_DIRECTORY")
            .or(file.uploads_directory)
            .unwrap_or_else(|| "uploads".to_string());
        let max_upload_mb = var("DOCU_CHAT_MAX_UPLOAD_MB")
            .or(file.max_upload_mb)
            .unwrap_or_else(|| "10".to_string());
        let max_upload_bytes = max_upload_mb
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|mb| mb.checked_mul(1024 * 1024))
            .ok_or(ConfigError::Invalid("max_upload_mb", max_upload_mb))?;
        let open_browser = var("DOCU_CHAT_OPEN_BROWSER")
            .or(file.open_browser)
            .unwrap_or_else(|| "true".to_string());
        let open_browser = match open_browser.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => return Err(ConfigError::Invalid("open_browser", open_browser)),
        };

        Ok(Self {
            host,
            port,
            uploads_directory: PathBuf::from(uploads_directory),
            max_upload_bytes,
            open_browser,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Reads and parses the config file at `path`.
///
/// A missing file is only acceptable when the path was not given explicitly.
fn read_config_file(path: &Path, explicit: bool) -> Result<Option<ServerConfigFile>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(toml::from_str(&text)?)),
        Err(e) if e.kind() == ErrorKind::NotFound && !explicit => Ok(None),
        Err(e) => Err(ConfigError::Read(path.display().to_string(), e)),
    }
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::resolve(lookup(&[]), None).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.uploads_directory, PathBuf::from("uploads"));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.open_browser);
        assert_eq!(config.url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_env_overrides_file() {
        let file: ServerConfigFile = toml::from_str(
            r#"
            port = "9000"
            uploads_directory = "/srv/docs"
            open_browser = "false"
            "#,
        )
        .unwrap();
        let config =
            ServerConfig::resolve(lookup(&[("DOCU_CHAT_PORT", "9100")]), Some(file)).unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.uploads_directory, PathBuf::from("/srv/docs"));
        assert!(!config.open_browser);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = ServerConfig::resolve(lookup(&[("DOCU_CHAT_PORT", "eighty")]), None).unwrap_err();
        assert!(err.to_string().contains("port"));

        let err =
            ServerConfig::resolve(lookup(&[("DOCU_CHAT_MAX_UPLOAD_MB", "-1")]), None).unwrap_err();
        assert!(err.to_string().contains("max_upload_mb"));

        assert!(ServerConfig::resolve(lookup(&[("DOCU_CHAT_OPEN_BROWSER", "maybe")]), None).is_err());
    }

    #[test]
    fn test_oversized_upload_limit_is_rejected() {
        let err = ServerConfig::resolve(
            lookup(&[("DOCU_CHAT_MAX_UPLOAD_MB", "18446744073709551615")]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("max_upload_mb", _)));
    }

    #[test]
    fn test_read_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "port = \"9200\"\n").unwrap();

        let file = read_config_file(&path, true).unwrap().unwrap();
        assert_eq!(file.port.as_deref(), Some("9200"));

        std::fs::write(&path, "port = [").unwrap();
        assert!(matches!(read_config_file(&path, true), Err(ConfigError::File(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        assert!(read_config_file(&missing, false).unwrap().is_none());
        assert!(matches!(read_config_file(&missing, true), Err(ConfigError::Read(..))));
        // A directory is never a usable config file, default path or not.
        assert!(matches!(read_config_file(dir.path(), false), Err(ConfigError::Read(..))));
    }
}
