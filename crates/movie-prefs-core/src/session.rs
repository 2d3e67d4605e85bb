use movie_prefs_api::MovieBackend;
use movie_prefs_models::{Movie, MovieId, PreferenceKind};
use tracing::{debug, error, info, warn};

use crate::error::{Refusal, SessionError};
use crate::feed::{MovieFeed, INITIAL_BATCH, SCROLL_BATCH};
use crate::preferences::{MovieView, PreferenceSets, Transition};


#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub initial_batch: u32,
    pub scroll_batch: u32,
    /// Next onboarding step after a successful submit
    pub next_step: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            initial_batch: INITIAL_BATCH,
            scroll_batch: SCROLL_BATCH,
            next_step: "/accounts/onboarding/triggers/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Preferences saved; move on to `next`
    Advance { next: String },
}

/// One user's movie onboarding.
///
/// Owns the preference sets and the movie list for as long as the user stays
/// on the step. Reads that fail are logged and leave state as it was; a failed
/// submit is returned so the caller can keep the user on the step.
pub struct OnboardingSession<B: MovieBackend> {
    backend: B,
    preferences: PreferenceSets,
    feed: MovieFeed,
    settings: SessionSettings,
}

impl<B: MovieBackend> OnboardingSession<B> {
    pub fn new(backend: B, settings: SessionSettings) -> Self {
        Self {
            backend,
            preferences: PreferenceSets::new(),
            feed: MovieFeed::new(),
            settings,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn preferences(&self) -> &PreferenceSets {
        &self.preferences
    }

    pub fn feed(&self) -> &MovieFeed {
        &self.feed
    }

    pub fn movies(&self) -> &[Movie] {
        self.feed.movies()
    }

    pub fn view(&self, id: &MovieId) -> MovieView {
        self.preferences.view(id)
    }

    /// Load saved preferences and the first page of movies
    pub async fn start(&mut self) -> bool {
        let loaded = self.load_preferences().await;
        self.fetch_more(self.settings.initial_batch).await;
        loaded
    }

    /// Replace the preference sets with the backend's copy. Returns false
    /// (state unchanged) if the request fails.
    pub async fn load_preferences(&mut self) -> bool {
        match self.backend.load_preferences().await {
            Ok(snapshot) => {
                self.preferences.load(&snapshot);
                let violations = self.preferences.violations();
                if !violations.is_empty() {
                    warn!(count = violations.len(), ?violations, "Loaded preferences break membership rules");
                }
                info!(total = snapshot.total(), "Loaded saved movie preferences");
                true
            }
            Err(e) => {
                error!(error = %e, "Error loading movie preferences");
                false
            }
        }
    }

    /// Append up to `amount` random movies. Returns how many new movies were
    /// added; 0 when another fetch is in flight or the request fails.
    pub async fn fetch_more(&mut self, amount: u32) -> usize {
        let Some(_guard) = self.feed.begin_fetch() else {
            debug!("Movie fetch already in progress, dropping request");
            return 0;
        };

        match self.backend.fetch_movies(amount).await {
            Ok(movies) => self.feed.append(movies),
            Err(e) => {
                error!(error = %e, "Error fetching movies");
                0
            }
        }
    }

    /// Infinite scroll hook
    pub async fn on_scroll(&mut self, scroll_top: f64, scroll_height: f64, client_height: f64) -> usize {
        if !self.feed.should_fetch_more(scroll_top, scroll_height, client_height) {
            return 0;
        }
        self.fetch_more(self.settings.scroll_batch).await
    }

    /// Run a search. A blank term clears the list and goes back to random
    /// movies. Returns the number of movies now listed, or `None` if the
    /// search request failed and the list was left as it was.
    pub async fn search(&mut self, term: &str) -> Option<usize> {
        let term = term.trim();

        if term.is_empty() {
            self.feed.set_search(term);
            self.fetch_more(self.settings.initial_batch).await;
            return Some(self.feed.len());
        }

        match self.backend.search_movies(term, true).await {
            Ok(movies) => {
                self.feed.set_search(term);
                self.feed.replace(movies);
                Some(self.feed.len())
            }
            Err(e) => {
                error!(error = %e, term = %term, "Error searching movies");
                None
            }
        }
    }

    pub fn toggle(&mut self, kind: PreferenceKind, id: &MovieId) -> Result<Transition, Refusal> {
        self.preferences.apply(kind, id)
    }

    /// Send the preference sets to the backend
    pub async fn submit(&self) -> Result<SubmitOutcome, SessionError> {
        let snapshot = self.preferences.snapshot();

        match self.backend.submit_preferences(&snapshot).await {
            Ok(()) => {
                info!(total = snapshot.total(), "Submitted movie preferences");
                Ok(SubmitOutcome::Advance {
                    next: self.settings.next_step.clone(),
                })
            }
            Err(e) => {
                error!(error = %e, "Error submitting movie preferences");
                Err(SessionError::Submit(e))
            }
        }
    }
}
