use super::context::{load_context, new_session};
use super::render::{movie_table, movies_json};
use super::spinner::Spinner;
use crate::output::Output;
use color_eyre::Result;
use std::path::Path;

pub async fn run_movies(config_dir: Option<&Path>, amount: Option<u32>, output: &Output) -> Result<()> {
    let ctx = load_context(config_dir)?;
    let amount = amount.unwrap_or(ctx.config.feed.initial_batch);
    let mut session = new_session(&ctx);

    let spinner = Spinner::start(format!("Fetching {} movies...", amount), output.is_human());
    // Preferences only decorate the list; a failure here is logged and ignored
    session.load_preferences().await;
    let added = session.fetch_more(amount).await;
    spinner.finish();

    if added == 0 {
        output.warn("No movies returned (see logs for details)");
        return Ok(());
    }

    if output.is_human() {
        output.table(&movie_table(session.movies(), session.preferences()));
        output.info(format!("{} movies", added));
    } else {
        output.json(&movies_json(session.movies(), session.preferences(), &ctx.config.feed.poster_base_url));
    }
    Ok(())
}

pub async fn run_search(config_dir: Option<&Path>, term: &str, output: &Output) -> Result<()> {
    let ctx = load_context(config_dir)?;
    let mut session = new_session(&ctx);

    let spinner = Spinner::start(format!("Searching for '{}'...", term.trim()), output.is_human());
    session.load_preferences().await;
    let found = session.search(term).await;
    spinner.finish();

    let Some(found) = found else {
        return Err(color_eyre::eyre::eyre!(
            "Search for '{}' failed; run with -v for details",
            term.trim()
        ));
    };

    if found == 0 {
        output.warn(format!("No movies found for '{}'", term.trim()));
        return Ok(());
    }

    if output.is_human() {
        output.table(&movie_table(session.movies(), session.preferences()));
        output.info(format!("{} movies", found));
    } else {
        output.json(&movies_json(session.movies(), session.preferences(), &ctx.config.feed.poster_base_url));
    }
    Ok(())
}
