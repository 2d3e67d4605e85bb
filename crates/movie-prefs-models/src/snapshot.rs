use serde::{Deserialize, Serialize};
use crate::movie_id::MovieId;
use crate::preference::PreferenceKind;

/// Wire form of a user's movie preferences.
///
/// This is both the body returned by `GET /preferences/movies` and the body
/// posted to `POST /onboarding/movies`. Fields missing from a response are
/// treated as empty lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PreferenceSnapshot {
    #[serde(default)]
    pub movies_liked: Vec<MovieId>,
    #[serde(default)]
    pub movies_disliked: Vec<MovieId>,
    #[serde(default)]
    pub movies_watched: Vec<MovieId>,
    #[serde(default)]
    pub watchlist: Vec<MovieId>,
    #[serde(default)]
    pub movies_rewatch: Vec<MovieId>,
    #[serde(default)]
    pub movies_blocked: Vec<MovieId>,
}

impl PreferenceSnapshot {
    pub fn ids(&self, kind: PreferenceKind) -> &[MovieId] {
        match kind {
            PreferenceKind::Liked => &self.movies_liked,
            PreferenceKind::Disliked => &self.movies_disliked,
            PreferenceKind::Watched => &self.movies_watched,
            PreferenceKind::Watchlisted => &self.watchlist,
            PreferenceKind::Rewatch => &self.movies_rewatch,
            PreferenceKind::Blocked => &self.movies_blocked,
        }
    }

    pub fn ids_mut(&mut self, kind: PreferenceKind) -> &mut Vec<MovieId> {
        match kind {
            PreferenceKind::Liked => &mut self.movies_liked,
            PreferenceKind::Disliked => &mut self.movies_disliked,
            PreferenceKind::Watched => &mut self.movies_watched,
            PreferenceKind::Watchlisted => &mut self.watchlist,
            PreferenceKind::Rewatch => &mut self.movies_rewatch,
            PreferenceKind::Blocked => &mut self.movies_blocked,
        }
    }

    /// Total number of ids across all six lists
    pub fn total(&self) -> usize {
        PreferenceKind::ALL.iter().map(|k| self.ids(*k).len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let snapshot = PreferenceSnapshot {
            movies_liked: vec![MovieId::from("1")],
            watchlist: vec![MovieId::from("2")],
            ..Default::default()
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        for kind in PreferenceKind::ALL {
            assert!(value.get(kind.wire_name()).is_some(), "missing {}", kind.wire_name());
        }
        assert_eq!(value["movies_liked"], serde_json::json!(["1"]));
        assert_eq!(value["watchlist"], serde_json::json!(["2"]));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let snapshot: PreferenceSnapshot =
            serde_json::from_str(r#"{"movies_liked": [12, "13"]}"#).unwrap();
        assert_eq!(snapshot.movies_liked.len(), 2);
        assert!(snapshot.movies_blocked.is_empty());
        assert_eq!(snapshot.total(), 2);
    }
}
