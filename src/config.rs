use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::auth::Session;
use crate::{photos, places};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Photo search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotosConfig {
    /// Unsplash access key
    #[serde(skip_serializing)]
    pub access_key: Option<String>,
    pub base_url: String,
    pub query: String,
    pub per_page: u32,
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            base_url: photos::DEFAULT_BASE_URL.to_string(),
            query: photos::DEFAULT_QUERY.to_string(),
            per_page: photos::DEFAULT_PER_PAGE,
        }
    }
}

/// Store search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub base_url: String,
    pub limit: u32,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: places::DEFAULT_BASE_URL.to_string(),
            limit: places::DEFAULT_LIMIT,
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of wardrobe-server
    pub server_url: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub photos: PhotosConfig,
    pub places: PlacesConfig,
    /// Current session, if signed in
    #[serde(skip_serializing)]
    pub session: Option<Session>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    server_url: Option<String>,
    photos: Option<PhotosConfig>,
    places: Option<PlacesConfig>,
    session: Option<Session>,
}

const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut server_url =
            ConfigValue::new(DEFAULT_SERVER_URL.to_string(), ConfigSource::Default);
        let mut config_file = None;
        let mut photos = PhotosConfig::default();
        let mut places = PlacesConfig::default();
        let mut session = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(url) = file_config.server_url {
                server_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(photos_config) = file_config.photos {
                photos = photos_config;
            }
            if let Some(places_config) = file_config.places {
                places = places_config;
            }
            session = file_config.session;
        }

        // Apply environment variable overrides
        if let Ok(url) = std::env::var("WARDROBE_SERVER_URL") {
            server_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(key) = std::env::var("WARDROBE_UNSPLASH_ACCESS_KEY") {
            photos.access_key = Some(key);
        }
        if let Ok(token) = std::env::var("WARDROBE_SESSION_TOKEN") {
            session = Some(match session {
                Some(existing) => Session { token, ..existing },
                None => Session {
                    uid: String::new(),
                    email: String::new(),
                    token,
                },
            });
        }

        Ok(Self {
            server_url,
            config_file,
            photos,
            places,
            session,
        })
    }

    /// Path that session changes are written to.
    pub fn writable_path(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(Self::default_config_path)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/wardrobe/
    /// - macOS: ~/Library/Application Support/wardrobe/
    /// - Windows: %APPDATA%/wardrobe/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wardrobe")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Stores the session in the config file, keeping every other key.
pub fn save_session(session: &Session, config_path: &Path) -> Result<(), ConfigError> {
    let mut yaml = read_yaml(config_path)?;
    let mapping = yaml
        .as_mapping_mut()
        .ok_or_else(|| ConfigError::InvalidFormat(config_path.to_path_buf()))?;

    let value = serde_yaml::to_value(session).map_err(ConfigError::SerializeError)?;
    mapping.insert(serde_yaml::Value::String("session".to_string()), value);

    write_yaml(&yaml, config_path)
}

/// Removes the session from the config file. Returns false if there was
/// none.
pub fn clear_session(config_path: &Path) -> Result<bool, ConfigError> {
    if !config_path.exists() {
        return Ok(false);
    }

    let mut yaml = read_yaml(config_path)?;
    let removed = yaml
        .as_mapping_mut()
        .and_then(|m| m.remove(serde_yaml::Value::String("session".to_string())))
        .is_some();

    if removed {
        write_yaml(&yaml, config_path)?;
    }
    Ok(removed)
}

fn read_yaml(config_path: &Path) -> Result<serde_yaml::Value, ConfigError> {
    if !config_path.exists() {
        return Ok(serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));
    }
    let contents = std::fs::read_to_string(config_path)
        .map_err(|e| ConfigError::ReadError(config_path.to_path_buf(), e))?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&contents)
        .map_err(|e| ConfigError::ParseError(config_path.to_path_buf(), e))?;
    // An empty file parses as null
    Ok(match yaml {
        serde_yaml::Value::Null => serde_yaml::Value::Mapping(serde_yaml::Mapping::new()),
        other => other,
    })
}

fn write_yaml(yaml: &serde_yaml::Value, config_path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::WriteError(config_path.to_path_buf(), e))?;
    }
    let contents = serde_yaml::to_string(yaml).map_err(ConfigError::SerializeError)?;
    std::fs::write(config_path, contents)
        .map_err(|e| ConfigError::WriteError(config_path.to_path_buf(), e))
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    WriteError(PathBuf, std::io::Error),
    SerializeError(serde_yaml::Error),
    InvalidFormat(PathBuf),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::WriteError(path, e) => {
                write!(f, "Failed to write config file '{}': {}", path.display(), e)
            }
            ConfigError::SerializeError(e) => write!(f, "Failed to serialize config: {}", e),
            ConfigError::InvalidFormat(path) => {
                write!(
                    f,
                    "Config file '{}' must be a YAML mapping",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn session() -> Session {
        Session {
            uid: "u1".into(),
            email: "ana@example.com".into(),
            token: "secret-token".into(),
        }
    }

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.server_url.value, "http://localhost:8080");
        assert_eq!(config.server_url.source, ConfigSource::Default);
        assert_eq!(config.photos.query, "clothing");
        assert_eq!(config.photos.per_page, 30);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "server_url: https://wardrobe.example.com").unwrap();
        writeln!(file, "photos:").unwrap();
        writeln!(file, "  access_key: abc123").unwrap();
        writeln!(file, "  per_page: 10").unwrap();
        writeln!(file, "places:").unwrap();
        writeln!(file, "  limit: 5").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.server_url.value, "https://wardrobe.example.com");
        assert_eq!(config.server_url.source, ConfigSource::File);
        assert_eq!(config.photos.access_key.as_deref(), Some("abc123"));
        assert_eq!(config.photos.per_page, 10);
        // Unset keys in a section keep their defaults
        assert_eq!(config.photos.query, "clothing");
        assert_eq!(config.places.limit, 5);
        assert_eq!(config.places.base_url, places::DEFAULT_BASE_URL);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    #[ignore] // Run with --ignored; env vars can pollute parallel tests
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "server_url: http://fromfile:8080").unwrap();

        std::env::set_var("WARDROBE_SERVER_URL", "http://fromenv:8080");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.server_url.value, "http://fromenv:8080");
        assert_eq!(config.server_url.source, ConfigSource::Environment);

        std::env::remove_var("WARDROBE_SERVER_URL");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_save_and_load_session() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.yaml");

        save_session(&session(), &config_path).unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.session, Some(session()));
    }

    #[test]
    fn test_save_session_keeps_other_keys() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "server_url: http://example.com:9000\n").unwrap();

        save_session(&session(), &config_path).unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.server_url.value, "http://example.com:9000");
        assert!(config.session.is_some());
    }

    #[test]
    fn test_clear_session() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "server_url: http://example.com:9000\n").unwrap();
        save_session(&session(), &config_path).unwrap();

        assert!(clear_session(&config_path).unwrap());
        assert!(!clear_session(&config_path).unwrap());

        let config = Config::load(Some(config_path)).unwrap();
        assert!(config.session.is_none());
        assert_eq!(config.server_url.value, "http://example.com:9000");
    }

    #[test]
    fn test_clear_session_without_file() {
        let temp_dir = tempdir().unwrap();
        assert!(!clear_session(&temp_dir.path().join("missing.yaml")).unwrap());
    }

    #[test]
    fn test_serialized_config_hides_secrets() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "photos:\n  access_key: abc123\n").unwrap();
        save_session(&session(), &config_path).unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("abc123"));
        assert!(!json.contains("secret-token"));
    }
}
