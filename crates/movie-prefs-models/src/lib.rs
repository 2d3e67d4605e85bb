pub mod movie;
pub mod movie_id;
pub mod preference;
pub mod snapshot;

pub use movie::{Movie, MovieList};
pub use movie_id::MovieId;
pub use preference::PreferenceKind;
pub use snapshot::PreferenceSnapshot;
