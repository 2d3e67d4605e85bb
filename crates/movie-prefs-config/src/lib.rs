pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{BackendConfig, Config, EndpointConfig, FeedConfig, OnboardingConfig, default_poster_base_url};
pub use credentials::CredentialStore;
pub use paths::{PathManager, container_base_path};
