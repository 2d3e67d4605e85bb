use async_trait::async_trait;
use movie_prefs_models::{Movie, PreferenceSnapshot};

use crate::error::ApiError;

/// The server side of movie onboarding.
///
/// Anti-forgery tokens are the implementation's concern; callers only see
/// movies and preference snapshots.
#[async_trait]
pub trait MovieBackend: Send + Sync {
    /// Up to `amount` random movies
    async fn fetch_movies(&self, amount: u32) -> Result<Vec<Movie>, ApiError>;

    /// Movies matching a search term. `send_all` asks for every match rather
    /// than a short autocomplete list.
    async fn search_movies(&self, term: &str, send_all: bool) -> Result<Vec<Movie>, ApiError>;

    /// The user's saved preference sets
    async fn load_preferences(&self) -> Result<PreferenceSnapshot, ApiError>;

    /// Persist the user's preference sets
    async fn submit_preferences(&self, snapshot: &PreferenceSnapshot) -> Result<(), ApiError>;
}
