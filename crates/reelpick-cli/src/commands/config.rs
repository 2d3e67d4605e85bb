use super::context::path_manager;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use movie_prefs_config::{Config, CredentialStore, PathManager};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

pub fn run_config(config_dir: Option<&Path>, cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    let path_manager = path_manager(config_dir);
    match cmd {
        crate::ConfigCommands::Show => show_config(&path_manager, output),
        crate::ConfigCommands::Init { base_url, force } => init_config(&path_manager, base_url, force, output),
        crate::ConfigCommands::SetUrl { base_url } => set_base_url(&path_manager, base_url, output),
        crate::ConfigCommands::Session { session_id, clear } => configure_session(&path_manager, session_id, clear, output),
    }
}

fn load_credentials(path_manager: &PathManager) -> Result<CredentialStore> {
    let credentials_file = path_manager.credentials_file();
    let mut store = CredentialStore::new(credentials_file.clone());
    store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    Ok(store)
}

fn section_table(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn show_config(path_manager: &PathManager, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    let credentials = load_credentials(path_manager)?;

    let session = credentials.get_session_id().map(|s| mask_string(s));
    let saved_at = credentials.get_session_saved_at().map(|dt| dt.to_rfc3339());

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            if !config_file.exists() {
                output.warn(format!(
                    "No config file at {}; showing defaults. Run 'reelpick config init' to create one.",
                    config_file.display()
                ));
            }

            let mut backend = section_table("Backend");
            backend.add_row(vec![Cell::new("Base URL"), Cell::new(&config.backend.base_url)]);
            backend.add_row(vec![Cell::new("Movies"), Cell::new(&config.backend.endpoints.movies)]);
            backend.add_row(vec![Cell::new("Search"), Cell::new(&config.backend.endpoints.search)]);
            backend.add_row(vec![Cell::new("Preferences"), Cell::new(&config.backend.endpoints.preferences)]);
            backend.add_row(vec![Cell::new("Submit"), Cell::new(&config.backend.endpoints.submit)]);
            backend.add_row(vec![Cell::new("CSRF token"), Cell::new(&config.backend.endpoints.csrf_token)]);
            if let Some(agent) = &config.backend.user_agent {
                backend.add_row(vec![Cell::new("User agent"), Cell::new(agent)]);
            }
            println!("{}", backend);

            let mut feed = section_table("Feed");
            feed.add_row(vec![Cell::new("Initial batch"), Cell::new(config.feed.initial_batch)]);
            feed.add_row(vec![Cell::new("Scroll batch"), Cell::new(config.feed.scroll_batch)]);
            feed.add_row(vec![Cell::new("Poster base URL"), Cell::new(&config.feed.poster_base_url)]);
            feed.add_row(vec![Cell::new("Next step"), Cell::new(&config.onboarding.next_step)]);
            println!("{}", feed);

            let mut auth = section_table("Session");
            match &session {
                Some(masked) => {
                    auth.add_row(vec![Cell::new("sessionid"), Cell::new(masked)]);
                    auth.add_row(vec![
                        Cell::new("Saved at"),
                        Cell::new(saved_at.clone().unwrap_or_else(|| "unknown".to_string())),
                    ]);
                }
                None => {
                    auth.add_row(vec![Cell::new("sessionid"), Cell::new("<not set>".bright_black().to_string())]);
                }
            }
            println!("{}", auth);

            let mut paths = section_table("Paths");
            paths.add_row(vec![Cell::new("Config directory"), Cell::new(path_manager.config_dir().display())]);
            paths.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
            paths.add_row(vec![Cell::new("Suggested log file"), Cell::new(path_manager.log_file().display())]);
            println!("{}", paths);
        }
        _ => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "exists": config_file.exists(),
                "log_file": path_manager.log_file().display().to_string(),
                "config": config,
                "session": {
                    "sessionid": session,
                    "saved_at": saved_at,
                },
            }));
        }
    }

    Ok(())
}

fn init_config(path_manager: &PathManager, base_url: Option<String>, force: bool, output: &Output) -> Result<()> {
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;

    let config_file = path_manager.config_file();
    if config_file.exists() && !force {
        return Err(color_eyre::eyre::eyre!(
            "{} already exists; pass --force to overwrite it",
            config_file.display()
        ));
    }

    let mut config = Config::default();
    if let Some(url) = base_url {
        config.backend.base_url = url.trim_end_matches('/').to_string();
    }
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;

    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    tracing::info!(path = %config_file.display(), "Wrote default config");
    output.success(format!("Wrote {}", config_file.display()));
    Ok(())
}

fn set_base_url(path_manager: &PathManager, base_url: String, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();
    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    config.backend.base_url = base_url.trim_end_matches('/').to_string();
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;

    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Backend set to {}", config.backend.base_url));
    Ok(())
}

fn configure_session(path_manager: &PathManager, session_id: Option<String>, clear: bool, output: &Output) -> Result<()> {
    let mut credentials = load_credentials(path_manager)?;

    if clear {
        credentials.clear_session();
        credentials
            .save()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;
        output.success("Session cleared");
        return Ok(());
    }

    let session_id = match session_id {
        Some(id) => id,
        None => rpassword::prompt_password("sessionid cookie: ")
            .map_err(|e| color_eyre::eyre::eyre!("Failed to read session id: {}", e))?,
    };
    let session_id = session_id.trim().to_string();
    if session_id.is_empty() {
        return Err(color_eyre::eyre::eyre!("Session id cannot be empty"));
    }

    credentials.set_session_id(session_id);
    credentials
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;

    output.success(format!("Session stored in {}", path_manager.credentials_file().display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return "<not set>".to_string();
    }
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("abcdefgh"), "ab***gh");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path());
        let output = Output::new(OutputFormat::Json, true);

        init_config(&paths, Some("https://reelpick.example/".to_string()), false, &output).unwrap();
        let config = Config::load_from_file(&paths.config_file()).unwrap();
        assert_eq!(config.backend.base_url, "https://reelpick.example");

        assert!(init_config(&paths, None, false, &output).is_err());
        init_config(&paths, None, true, &output).unwrap();
    }

    #[test]
    fn test_set_url_rejects_invalid() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path());
        let output = Output::new(OutputFormat::Json, true);

        assert!(set_base_url(&paths, "not a url".to_string(), &output).is_err());
        assert!(!paths.config_file().exists());
    }

    #[test]
    fn test_session_store_and_clear() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path());
        let output = Output::new(OutputFormat::Json, true);

        configure_session(&paths, Some("  abc123  ".to_string()), false, &output).unwrap();
        let store = load_credentials(&paths).unwrap();
        assert_eq!(store.get_session_id().map(|s| s.as_str()), Some("abc123"));
        assert!(store.get_session_saved_at().is_some());

        configure_session(&paths, None, true, &output).unwrap();
        let store = load_credentials(&paths).unwrap();
        assert!(store.get_session_id().is_none());
    }
}
