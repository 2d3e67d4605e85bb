use serde::{Deserialize, Serialize};

/// The six preference sets a movie can belong to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKind {
    Liked,
    Disliked,
    Watched,
    Watchlisted,
    Rewatch,
    Blocked,
}

impl PreferenceKind {
    pub const ALL: [PreferenceKind; 6] = [
        PreferenceKind::Liked,
        PreferenceKind::Disliked,
        PreferenceKind::Watched,
        PreferenceKind::Watchlisted,
        PreferenceKind::Rewatch,
        PreferenceKind::Blocked,
    ];

    /// Field name used in the preferences payload
    pub fn wire_name(&self) -> &'static str {
        match self {
            PreferenceKind::Liked => "movies_liked",
            PreferenceKind::Disliked => "movies_disliked",
            PreferenceKind::Watched => "movies_watched",
            PreferenceKind::Watchlisted => "watchlist",
            PreferenceKind::Rewatch => "movies_rewatch",
            PreferenceKind::Blocked => "movies_blocked",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PreferenceKind::Liked => "Liked",
            PreferenceKind::Disliked => "Disliked",
            PreferenceKind::Watched => "Watched",
            PreferenceKind::Watchlisted => "Watchlist",
            PreferenceKind::Rewatch => "Rewatch",
            PreferenceKind::Blocked => "Blocked",
        }
    }
}

impl std::fmt::Display for PreferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for PreferenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "like" | "liked" | "movies_liked" => Ok(PreferenceKind::Liked),
            "dislike" | "disliked" | "movies_disliked" => Ok(PreferenceKind::Disliked),
            "watched" | "seen" | "movies_watched" => Ok(PreferenceKind::Watched),
            "watchlist" | "watchlisted" => Ok(PreferenceKind::Watchlisted),
            "rewatch" | "movies_rewatch" => Ok(PreferenceKind::Rewatch),
            "block" | "blocked" | "exclude" | "movies_blocked" => Ok(PreferenceKind::Blocked),
            _ => Err(format!(
                "Invalid preference: {}. Use like, dislike, watched, watchlist, rewatch, or block",
                s
            )),
        }
    }
}
