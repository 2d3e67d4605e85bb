use super::apply::describe_transition;
use super::context::{load_context, new_session};
use super::prompts::{prompt_select, prompt_string, prompt_yes_no};
use super::render::{preferences_table, status_badges};
use super::spinner::Spinner;
use crate::output::Output;
use color_eyre::Result;
use movie_prefs_api::MovieBackend;
use movie_prefs_core::{FeedMode, MovieView, OnboardingSession, SessionError, SubmitOutcome};
use movie_prefs_models::{Movie, MovieId, PreferenceKind};
use std::io::IsTerminal;
use std::path::Path;

const MAIN_MENU: [&str; 6] = [
    "Rate a movie from the list",
    "Show more movies",
    "Search",
    "Show my preferences",
    "Submit and continue",
    "Quit without saving",
];

fn movie_label(movie: &Movie, view: &MovieView) -> String {
    let badges = status_badges(view);
    if badges.is_empty() {
        movie.display_title()
    } else {
        format!("{}  [{}]", movie.display_title(), badges.join(", "))
    }
}

fn preference_items(view: &MovieView) -> Vec<String> {
    let mut items: Vec<String> = PreferenceKind::ALL
        .iter()
        .map(|kind| {
            let mark = if view.is_active(*kind) { "[x]" } else { "[ ]" };
            format!("{} {}", mark, kind.label())
        })
        .collect();
    items.push("Back".to_string());
    items
}

/// Toggle preferences for one movie until the user goes back. Returns true if
/// anything changed.
fn edit_movie<B: MovieBackend>(session: &mut OnboardingSession<B>, id: &MovieId, title: &str, output: &Output) -> Result<bool> {
    let mut changed = false;

    loop {
        let view = session.view(id);
        let items = preference_items(&view);
        let Some(choice) = prompt_select(title, &items, 0)? else {
            return Ok(changed);
        };
        let Some(kind) = PreferenceKind::ALL.get(choice).copied() else {
            return Ok(changed);
        };

        match session.toggle(kind, id) {
            Ok(transition) => {
                changed = true;
                output.success(describe_transition(&transition));
            }
            Err(refusal) => output.refusal(id.as_str(), refusal.to_string()),
        }
    }
}

fn pick_movie<B: MovieBackend>(session: &mut OnboardingSession<B>, output: &Output) -> Result<bool> {
    if session.movies().is_empty() {
        output.warn("No movies listed. Search or show more movies first.");
        return Ok(false);
    }

    let labels: Vec<String> = session
        .movies()
        .iter()
        .map(|m| movie_label(m, &session.view(&m.id)))
        .collect();

    let Some(index) = prompt_select("Pick a movie (Esc to go back)", &labels, 0)? else {
        return Ok(false);
    };

    let movie = session.movies()[index].clone();
    edit_movie(session, &movie.id, &movie.display_title(), output)
}

pub async fn run_onboard(config_dir: Option<&Path>, output: &Output) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        return Err(color_eyre::eyre::eyre!(
            "'reelpick onboard' needs an interactive terminal; use 'reelpick apply' in scripts"
        ));
    }

    let ctx = load_context(config_dir)?;
    let scroll_batch = ctx.config.feed.scroll_batch;
    let mut session = new_session(&ctx);

    let spinner = Spinner::start("Loading your movies...", output.is_human());
    let loaded = session.start().await;
    spinner.finish();

    if !loaded {
        output.warn("Could not load your saved preferences; starting from an empty list");
    }

    let mut dirty = false;

    loop {
        let listing = match session.feed().mode() {
            FeedMode::Browse => "random picks".to_string(),
            FeedMode::Search(term) => format!("results for '{}'", term),
        };
        output.info(format!("\n{} movies listed ({})", session.movies().len(), listing));

        let choice = prompt_select("What next?", &MAIN_MENU, 0)?.unwrap_or(MAIN_MENU.len() - 1);

        match choice {
            0 => {
                if pick_movie(&mut session, output)? {
                    dirty = true;
                }
            }
            1 => {
                if matches!(session.feed().mode(), FeedMode::Search(_)) {
                    output.info("Leaving search results for random movies");
                    session.search("").await;
                } else {
                    let spinner = Spinner::start("Fetching more movies...", output.is_human());
                    let added = session.fetch_more(scroll_batch).await;
                    spinner.finish();
                    if added == 0 {
                        output.warn("No new movies this time");
                    }
                }
            }
            2 => {
                let term = prompt_string("Search (leave empty for random movies)", None)?;
                let spinner = Spinner::start("Searching...", output.is_human());
                let found = session.search(&term).await;
                spinner.finish();
                match found {
                    Some(0) => output.warn("No movies found"),
                    Some(_) => {}
                    None => output.error("Search failed; the movie list was left as it was"),
                }
            }
            3 => {
                output.table(&preferences_table(session.preferences()));
            }
            4 => {
                let spinner = Spinner::start("Submitting preferences...", output.is_human());
                let result = session.submit().await;
                spinner.finish();

                match result {
                    Ok(SubmitOutcome::Advance { next }) => {
                        output.success("Movie preferences saved");
                        output.info(format!("Continue onboarding at {}{}", ctx.client.base_url().as_str().trim_end_matches('/'), next));
                        return Ok(());
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Submit failed, staying on the movie step");
                        output.error("Something went wrong saving your movie preferences. Please try again.");
                        let SessionError::Submit(api_error) = &e;
                        if api_error.is_status() {
                            output.warn("The backend refused the request; if your login expired, run 'reelpick config session'");
                        }
                    }
                }
            }
            _ => {
                if dirty && !prompt_yes_no("Discard your unsaved changes?", false)? {
                    continue;
                }
                output.info("Nothing submitted");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movie_prefs_core::PreferenceSets;

    #[test]
    fn test_preference_items_mark_active() {
        let mut sets = PreferenceSets::new();
        let id = MovieId::from("1");
        sets.toggle_disliked(&id).unwrap();

        let items = preference_items(&sets.view(&id));
        assert_eq!(items.len(), 7);
        assert_eq!(items[0], "[ ] Liked");
        assert_eq!(items[1], "[x] Disliked");
        assert_eq!(items[2], "[x] Watched");
        assert_eq!(items[6], "Back");
    }

    #[test]
    fn test_movie_label() {
        let movie = Movie {
            id: MovieId::from("1"),
            name: "Heat".to_string(),
            year: Some(1995),
            poster: None,
        };
        let mut sets = PreferenceSets::new();
        assert_eq!(movie_label(&movie, &sets.view(&movie.id)), "Heat (1995)");

        sets.toggle_watchlist(&movie.id).unwrap();
        assert_eq!(movie_label(&movie, &sets.view(&movie.id)), "Heat (1995)  [watchlist]");
    }
}
