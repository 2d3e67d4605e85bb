use super::context::{load_context, new_session};
use super::render::preferences_table;
use super::spinner::Spinner;
use crate::output::Output;
use color_eyre::Result;
use serde_json::json;
use std::path::Path;

pub async fn run_prefs(config_dir: Option<&Path>, output: &Output) -> Result<()> {
    let ctx = load_context(config_dir)?;
    let mut session = new_session(&ctx);

    let spinner = Spinner::start("Loading preferences...", output.is_human());
    let loaded = session.load_preferences().await;
    spinner.finish();

    if !loaded {
        return Err(color_eyre::eyre::eyre!(
            "Could not load movie preferences from {}",
            ctx.client.base_url()
        ));
    }

    let preferences = session.preferences();
    if output.is_human() {
        if preferences.is_empty() {
            output.info("No movie preferences saved yet. Run 'reelpick onboard' to add some.");
            return Ok(());
        }
        output.table(&preferences_table(preferences));
        let violations = preferences.violations();
        if !violations.is_empty() {
            output.warn(format!("{} saved entries break the preference rules", violations.len()));
        }
    } else {
        let counts: serde_json::Map<String, serde_json::Value> = preferences
            .counts()
            .into_iter()
            .map(|(kind, count)| (kind.wire_name().to_string(), json!(count)))
            .collect();
        output.json(&json!({
            "preferences": preferences.snapshot(),
            "counts": counts,
        }));
    }
    Ok(())
}
