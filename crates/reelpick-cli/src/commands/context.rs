use color_eyre::Result;
use movie_prefs_api::ReelpickClient;
use movie_prefs_config::{Config, CredentialStore, PathManager};
use movie_prefs_core::{OnboardingSession, SessionSettings};
use std::path::Path;

/// Everything a command needs to talk to the backend
pub struct Context {
    pub config: Config,
    pub client: ReelpickClient,
}

pub fn path_manager(config_dir: Option<&Path>) -> PathManager {
    match config_dir {
        Some(dir) => PathManager::with_base(dir),
        None => PathManager::default(),
    }
}

pub fn load_context(config_dir: Option<&Path>) -> Result<Context> {
    let path_manager = path_manager(config_dir);
    let config_file = path_manager.config_file();

    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

    let credentials_file = path_manager.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

    if cred_store.get_session_id().is_none() {
        tracing::warn!("No backend session stored; run 'reelpick config session' if requests are rejected");
    }

    let client = ReelpickClient::new(&config.backend, cred_store.get_session_id().map(|s| s.as_str()))
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create backend client: {}", e))?;

    tracing::debug!(base_url = %client.base_url(), "Backend client ready");
    Ok(Context { config, client })
}

pub fn session_settings(config: &Config) -> SessionSettings {
    SessionSettings {
        initial_batch: config.feed.initial_batch,
        scroll_batch: config.feed.scroll_batch,
        next_step: config.onboarding.next_step.clone(),
    }
}

pub fn new_session(ctx: &Context) -> OnboardingSession<ReelpickClient> {
    OnboardingSession::new(ctx.client.clone(), session_settings(&ctx.config))
}
