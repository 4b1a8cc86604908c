use serde::{Deserialize, Serialize};

pub mod wizard;
mod file;
pub use file::ConfigPathChoice;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

mod defaults {
    pub fn api_url() -> String { super::DEFAULT_API_URL.to_owned() }
    pub fn placeholder() -> String { crate::catalog::render::DEFAULT_PLACEHOLDER.to_owned() }
    pub const fn yes() -> bool { true }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigRetrievalError<'a> {
    #[error("permission denied")]
    PermissionDenied(ConfigPathChoice<'a>),
    #[error("not found")]
    NotFound(ConfigPathChoice<'a>),
    #[error("deserialization failure: {inner}")]
    DeserializationFailure { path: ConfigPathChoice<'a>, inner: toml::de::Error },
    #[error("{inner}")]
    UnknownFs { path: ConfigPathChoice<'a>, inner: std::io::Error },
}
impl<'a> ConfigRetrievalError<'a> {
    pub fn path(&self) -> &ConfigPathChoice<'a> {
        match self {
            Self::PermissionDenied(path) | Self::NotFound(path) => path,
            Self::DeserializationFailure { path, .. } | Self::UnknownFs { path, .. } => path,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigSaveError {
    #[error("could not serialize configuration: {0}")]
    Serialization(#[from] toml::ser::Error),
    #[error("could not write configuration: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config<'a> {
    #[serde(skip)]
    pub path: ConfigPathChoice<'a>,

    /// Where the backend is served; `/api/canciones` is appended to it.
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Ask before deleting. `--yes` skips the prompt for a single invocation.
    #[serde(default = "defaults::yes")]
    pub confirm_deletes: bool,

    /// Shown in place of credits the backend did not provide.
    #[serde(default = "defaults::placeholder")]
    pub placeholder: String,

    /// Requests never time out unless this is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}
impl Default for Config<'_> {
    fn default() -> Self {
        Self {
            path: ConfigPathChoice::default(),
            api_url: defaults::api_url(),
            confirm_deletes: true,
            placeholder: defaults::placeholder(),
            request_timeout_secs: None,
            user_agent: None,
        }
    }
}
impl<'a> Config<'a> {
    pub async fn get(args: &'a crate::cli::Cli) -> Result<Self, ConfigRetrievalError<'a>> {
        Self::load(ConfigPathChoice::new(args.config_file_path.as_deref())).await
    }

    pub async fn load(path: ConfigPathChoice<'a>) -> Result<Self, ConfigRetrievalError<'a>> {
        match tokio::fs::read(&path).await {
            Err(error) => {
                use std::io::ErrorKind;
                Err(match error.kind() {
                    ErrorKind::PermissionDenied => ConfigRetrievalError::PermissionDenied(path),
                    ErrorKind::NotFound => ConfigRetrievalError::NotFound(path),
                    _ => ConfigRetrievalError::UnknownFs { path, inner: error }
                })
            },
            Ok(data) => {
                let data = String::from_utf8_lossy(&data[..]);
                match toml::from_str::<Self>(&data) {
                    Ok(mut config) => {
                        config.path = path;
                        Ok(config)
                    }
                    Err(inner) => Err(ConfigRetrievalError::DeserializationFailure { path, inner })
                }
            }
        }
    }

    /// Defaults, remembering where they would be saved.
    pub fn default_at(path: ConfigPathChoice<'a>) -> Self {
        Self { path, ..Default::default() }
    }

    pub fn request_timeout(&self) -> Option<core::time::Duration> {
        self.request_timeout_secs.map(core::time::Duration::from_secs)
    }

    pub fn client_options(&self) -> catalog_api::ClientOptions {
        catalog_api::ClientOptions {
            user_agent: self.user_agent.clone(),
            timeout: self.request_timeout(),
        }
    }

    pub fn edit_with_wizard(&mut self) {
        use wizard::io;
        self.api_url = io::prompt_with_default("Base URL of the catalog backend", &self.api_url);
        self.confirm_deletes = io::prompt_bool("Ask for confirmation before deleting a song?");
        self.placeholder = io::prompt_with_default("Placeholder shown for missing credits", &self.placeholder);
        let timeout = io::prompt_with_default("Request timeout in seconds (0 for none)", &self.request_timeout_secs.unwrap_or(0).to_string());
        self.request_timeout_secs = match timeout.parse::<u64>() {
            Ok(0) => None,
            Ok(secs) => Some(secs),
            Err(error) => {
                tracing::warn!(?error, "ignoring unparsable timeout");
                self.request_timeout_secs
            }
        };
    }

    /// NOTE: Will not write to the provided path unless [`Self::save_to_disk`] is called.
    pub fn create_with_wizard(path: ConfigPathChoice<'a>) -> Self {
        let mut config = Self::default_at(path);
        config.edit_with_wizard();
        config
    }

    pub fn serialize(&self) -> Result<String, toml::ser::Error> {
        toml::ser::to_string(self)
    }

    pub async fn save_to_disk(&self) -> Result<(), ConfigSaveError> {
        let path = self.path.as_path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, self.serialize()?.as_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("nested/config.toml");

        let mut config = Config::default_at(ConfigPathChoice::Explicit(&path));
        config.api_url = "http://catalog.local:8080".into();
        config.request_timeout_secs = Some(5);
        config.save_to_disk().await.expect("failed to save");

        let loaded = Config::load(ConfigPathChoice::Explicit(&path)).await.expect("failed to load");
        assert_eq!(loaded.api_url, "http://catalog.local:8080");
        assert_eq!(loaded.request_timeout(), Some(core::time::Duration::from_secs(5)));
        assert!(loaded.confirm_deletes);
        assert_eq!(loaded.path.as_path(), path);
    }

    #[tokio::test]
    async fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "confirm_deletes = false\n").await.unwrap();

        let loaded = Config::load(ConfigPathChoice::Explicit(&path)).await.expect("failed to load");
        assert!(!loaded.confirm_deletes);
        assert_eq!(loaded.api_url, DEFAULT_API_URL);
        assert_eq!(loaded.placeholder, "-");
        assert_eq!(loaded.request_timeout(), None);
    }

    #[tokio::test]
    async fn retrieval_errors() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(ConfigPathChoice::Explicit(&missing)).await, Err(ConfigRetrievalError::NotFound(_))));

        let broken = dir.path().join("broken.toml");
        tokio::fs::write(&broken, "api_url = [").await.unwrap();
        let error = Config::load(ConfigPathChoice::Explicit(&broken)).await.unwrap_err();
        assert!(matches!(error, ConfigRetrievalError::DeserializationFailure { .. }));
        assert_eq!(error.path().as_path(), broken);
    }
}
