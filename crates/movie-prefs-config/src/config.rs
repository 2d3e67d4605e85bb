use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub onboarding: OnboardingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Backend paths, relative to `base_url`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EndpointConfig {
    #[serde(default = "default_movies_path")]
    pub movies: String,
    #[serde(default = "default_search_path")]
    pub search: String,
    #[serde(default = "default_preferences_path")]
    pub preferences: String,
    #[serde(default = "default_submit_path")]
    pub submit: String,
    #[serde(default = "default_csrf_token_path")]
    pub csrf_token: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FeedConfig {
    #[serde(default = "default_initial_batch")]
    pub initial_batch: u32,
    #[serde(default = "default_scroll_batch")]
    pub scroll_batch: u32,
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OnboardingConfig {
    /// Where the web flow goes after a successful submit
    #[serde(default = "default_next_step")]
    pub next_step: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_movies_path() -> String {
    "/api/movies/".to_string()
}

fn default_search_path() -> String {
    "/api/search/movies".to_string()
}

fn default_preferences_path() -> String {
    "/accounts/preferences/movies".to_string()
}

fn default_submit_path() -> String {
    "/accounts/onboarding/movies/".to_string()
}

fn default_csrf_token_path() -> String {
    "/get-csrf-token/".to_string()
}

fn default_initial_batch() -> u32 {
    50
}

fn default_scroll_batch() -> u32 {
    35
}

pub fn default_poster_base_url() -> String {
    "https://image.tmdb.org/t/p/w300".to_string()
}

fn default_next_step() -> String {
    "/accounts/onboarding/triggers/".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoints: EndpointConfig::default(),
            user_agent: None,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            movies: default_movies_path(),
            search: default_search_path(),
            preferences: default_preferences_path(),
            submit: default_submit_path(),
            csrf_token: default_csrf_token_path(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            initial_batch: default_initial_batch(),
            scroll_batch: default_scroll_batch(),
            poster_base_url: default_poster_base_url(),
        }
    }
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            next_step: default_next_step(),
        }
    }
}

fn is_http_url(url: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://")) && !url.contains(char::is_whitespace)
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if it exists, defaults otherwise
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !is_http_url(&self.backend.base_url) {
            return Err(anyhow::anyhow!(
                "backend.base_url must be an http(s) URL, got '{}'",
                self.backend.base_url
            ));
        }

        let endpoints = &self.backend.endpoints;
        for (name, path) in [
            ("movies", &endpoints.movies),
            ("search", &endpoints.search),
            ("preferences", &endpoints.preferences),
            ("submit", &endpoints.submit),
            ("csrf_token", &endpoints.csrf_token),
        ] {
            if !path.starts_with('/') {
                return Err(anyhow::anyhow!("backend.endpoints.{} must start with '/', got '{}'", name, path));
            }
        }

        if self.feed.initial_batch == 0 {
            return Err(anyhow::anyhow!("feed.initial_batch must be greater than zero"));
        }
        if self.feed.scroll_batch == 0 {
            return Err(anyhow::anyhow!("feed.scroll_batch must be greater than zero"));
        }
        if !is_http_url(&self.feed.poster_base_url) {
            return Err(anyhow::anyhow!(
                "feed.poster_base_url must be an http(s) URL, got '{}'",
                self.feed.poster_base_url
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.backend.base_url = "https://movies.example.com".to_string();
        config.feed.scroll_batch = 20;

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.backend.base_url, "https://movies.example.com");
        assert_eq!(loaded.feed.scroll_batch, 20);
        assert_eq!(loaded.feed.initial_batch, 50);
        assert_eq!(loaded.backend.endpoints, EndpointConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [backend]
            base_url = "http://127.0.0.1:9000"

            [backend.endpoints]
            movies = "/v2/movies"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.endpoints.movies, "/v2/movies");
        assert_eq!(config.backend.endpoints.submit, "/accounts/onboarding/movies/");
        assert_eq!(config.feed.scroll_batch, 35);
        assert_eq!(config.onboarding.next_step, "/accounts/onboarding/triggers/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.backend.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        config.backend.base_url = "http://localhost:8000".to_string();
        config.backend.endpoints.search = "api/search".to_string();
        assert!(config.validate().is_err());

        config.backend.endpoints.search = "/api/search".to_string();
        config.feed.initial_batch = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
    }
}
