use super::context::{load_context, new_session};
use super::render::preferences_table;
use super::spinner::Spinner;
use crate::output::Output;
use color_eyre::Result;
use movie_prefs_core::{Change, SessionError, SubmitOutcome, Transition};
use movie_prefs_models::{MovieId, PreferenceKind};
use serde_json::json;
use std::path::Path;
use std::str::FromStr;

/// One `KIND:ID` toggle from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleArg {
    pub kind: PreferenceKind,
    pub id: MovieId,
}

impl FromStr for ToggleArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected KIND:ID, got '{}'", s))?;
        Ok(Self {
            kind: kind.parse()?,
            id: id.parse()?,
        })
    }
}

/// "Liked, Watched; removed Watchlist"
pub fn describe_transition(transition: &Transition) -> String {
    let added: Vec<&str> = transition
        .changes
        .iter()
        .filter_map(|c| match c {
            Change::Added(kind) => Some(kind.label()),
            Change::Removed(_) => None,
        })
        .collect();
    let removed: Vec<&str> = transition
        .changes
        .iter()
        .filter_map(|c| match c {
            Change::Removed(kind) => Some(kind.label()),
            Change::Added(_) => None,
        })
        .collect();

    match (added.is_empty(), removed.is_empty()) {
        (true, true) => "no change".to_string(),
        (false, true) => format!("added {}", added.join(", ")),
        (true, false) => format!("removed {}", removed.join(", ")),
        (false, false) => format!("added {}; removed {}", added.join(", "), removed.join(", ")),
    }
}

pub async fn run_apply(config_dir: Option<&Path>, toggles: Vec<ToggleArg>, dry_run: bool, output: &Output) -> Result<()> {
    let ctx = load_context(config_dir)?;
    let mut session = new_session(&ctx);

    let spinner = Spinner::start("Loading preferences...", output.is_human());
    let loaded = session.load_preferences().await;
    spinner.finish();

    // Submitting on top of an unknown state would overwrite the saved sets
    if !loaded {
        return Err(color_eyre::eyre::eyre!(
            "Could not load current preferences from {}; nothing was changed",
            ctx.client.base_url()
        ));
    }

    let mut applied = 0usize;
    let mut refused = 0usize;
    for toggle in &toggles {
        match session.toggle(toggle.kind, &toggle.id) {
            Ok(transition) => {
                applied += 1;
                output.success(format!("[{}] {}: {}", toggle.id, toggle.kind, describe_transition(&transition)));
            }
            Err(refusal) => {
                refused += 1;
                output.refusal(toggle.id.as_str(), refusal.to_string());
            }
        }
    }

    tracing::info!(applied, refused, dry_run, "Applied preference toggles");

    if dry_run {
        if output.is_human() {
            output.table(&preferences_table(session.preferences()));
            output.info("Dry run: nothing submitted");
        } else {
            output.json(&json!({
                "dry_run": true,
                "applied": applied,
                "refused": refused,
                "preferences": session.preferences().snapshot(),
            }));
        }
        return Ok(());
    }

    let spinner = Spinner::start("Submitting preferences...", output.is_human());
    let result = session.submit().await;
    spinner.finish();

    match result {
        Ok(SubmitOutcome::Advance { next }) => {
            output.success(format!("Saved movie preferences ({} applied, {} refused)", applied, refused));
            output.info(format!("Next onboarding step: {}", next));
            Ok(())
        }
        Err(e) => {
            output.error("Something went wrong saving your movie preferences. Please try again.");
            let SessionError::Submit(api_error) = &e;
            if api_error.is_status() {
                output.warn("The backend refused the request; if your login expired, run 'reelpick config session'");
            }
            Err(color_eyre::eyre::eyre!("{}", e))
        }
    }
}
