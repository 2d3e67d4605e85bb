use movie_prefs_api::ApiError;
use thiserror::Error;

/// Which action was attempted on a blocked movie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockedAction {
    Watchlist,
    Rewatch,
}

impl BlockedAction {
    fn message(&self) -> &'static str {
        match self {
            BlockedAction::Watchlist => {
                "You cannot add a movie you have excluded from recommendations to your watchlist."
            }
            BlockedAction::Rewatch => {
                "You cannot rewatch a movie you have excluded from recommendations."
            }
        }
    }
}

/// A rejected toggle. State is left untouched and the message is meant to be
/// shown to the user next to the movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("Please remove your rating before marking a movie as un-watched.")]
    RatingConflict,
    #[error("You cannot add a movie you have seen to your watchlist, did you mean to select the rewatch button?")]
    AlreadyWatched,
    #[error("{}", .action.message())]
    Blocked { action: BlockedAction },
    #[error("You cannot rewatch a movie you have not seen.")]
    NotWatched,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to submit movie preferences: {0}")]
    Submit(#[source] ApiError),
}
