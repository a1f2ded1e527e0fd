//! Configuration system using a JSON file.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\gust\config.json
//! - macOS: ~/Library/Application Support/gust/config.json
//! - Linux: ~/.config/gust/config.json
//!
//! The file holds the Spotify client credentials and a cached bearer token.
//! The token section is only a cache and can be regenerated at any time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::spotify::{AccessToken, Credentials, TokenStore};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spotify API settings
    pub api: ApiConfig,
}

/// Spotify API credentials and token cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_access_token: CachedToken,
}

/// Last bearer token handed out by the accounts service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CachedToken {
    pub token: String,
    /// Expiry as epoch seconds; written as `""` when unknown
    #[serde(with = "expires_format")]
    pub expires: Option<f64>,
}

impl Config {
    /// Both client id and secret are filled in
    pub fn has_credentials(&self) -> bool {
        !self.api.spotify_client_id.trim().is_empty()
            && !self.api.spotify_client_secret.trim().is_empty()
    }

    /// Stored client credentials; an empty id or secret is an error.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        if !self.has_credentials() {
            return Err(ConfigError::MissingCredentials);
        }

        Ok(Credentials {
            client_id: self.api.spotify_client_id.trim().to_string(),
            client_secret: self.api.spotify_client_secret.trim().to_string(),
        })
    }

    pub fn set_credentials(&mut self, client_id: &str, client_secret: &str) {
        self.api.spotify_client_id = client_id.trim().to_string();
        self.api.spotify_client_secret = client_secret.trim().to_string();
        // A token issued for other credentials is useless
        self.api.spotify_access_token = CachedToken::default();
    }

    /// The cached token, if one was ever stored
    pub fn cached_token(&self) -> Option<AccessToken> {
        let cached = &self.api.spotify_access_token;
        match (cached.token.is_empty(), cached.expires) {
            (false, Some(expires_at)) => Some(AccessToken {
                token: cached.token.clone(),
                expires_at,
            }),
            _ => None,
        }
    }

    pub fn set_cached_token(&mut self, token: &AccessToken) {
        self.api.spotify_access_token = CachedToken {
            token: token.token.clone(),
            expires: Some(token.expires_at),
        };
    }
}

/// `expires` is `""` until a token is cached, then a float; hand-edited
/// files sometimes carry it as a numeric string. Accept all three.
mod expires_format {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(secs) => s.serialize_f64(*secs),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        match Option::<Raw>::deserialize(d)? {
            None => Ok(None),
            Some(Raw::Number(secs)) => Ok(Some(secs)),
            Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(Raw::Text(text)) => text
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid token expiry {text:?}: {e}"))),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gust"))
}

/// Get the full path to the config file
pub fn config_path() -> Result<PathBuf, ConfigError> {
    config_dir()
        .map(|d| d.join("config.json"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Load the configuration at `path`, creating it with defaults if absent.
///
/// Unlike a settings file, a broken credentials file is not silently
/// replaced: the caller gets a parse error naming the file.
pub fn load_or_init_at(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, creating defaults", path);
        let config = Config::default();
        save_to(path, &config)?;
        return Ok(config);
    }

    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config =
        serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::debug!("Saved config to {:?}", path);
    Ok(())
}

/// Overwrite the config file with empty credentials.
pub fn reset() -> Result<PathBuf, ConfigError> {
    let path = config_path()?;
    save_to(&path, &Config::default())?;
    Ok(path)
}

/// Persists refreshed tokens into the config file.
///
/// The file is re-read before each write so credentials edited by another
/// `gust config` invocation are not clobbered.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn save_token(&self, token: &AccessToken) -> Result<(), ConfigError> {
        let mut config = load_or_init_at(&self.path)?;
        config.set_cached_token(token);
        save_to(&self.path, &config)
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to decode config file {0}: {1} (run `gust config reset` to start over)")]
    Parse(PathBuf, serde_json::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(serde_json::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),

    #[error("Spotify client id and secret are not configured (run `gust config api`)")]
    MissingCredentials,
}

// ============================================================================
// Tests
// ============================================================================
