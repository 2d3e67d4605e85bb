pub mod error;
pub mod feed;
pub mod preferences;
pub mod session;

pub use error::{BlockedAction, Refusal, SessionError};
pub use feed::{FeedMode, FetchGuard, MovieFeed, INITIAL_BATCH, SCROLL_BATCH};
pub use preferences::{Change, InvariantViolation, MovieView, PreferenceSets, RatingState, Transition};
pub use session::{OnboardingSession, SessionSettings, SubmitOutcome};
