//! Per-movie preference bookkeeping.
//!
//! `PreferenceSets` owns the six sets of movie ids a user builds during
//! onboarding and enforces how they interact:
//!
//! 1. Liked and Disliked are disjoint.
//! 2. Liked and Disliked are both subsets of Watched (rating implies watched).
//! 3. Watchlisted and Watched are disjoint.
//! 4. Watchlisted and Blocked are disjoint.
//! 5. Rewatch is a subset of Watched.
//! 6. Rewatch and Blocked are disjoint.
//!
//! Blocking a movie evicts it from Watchlisted and Rewatch, which keeps 4 and 6
//! true, and never touches Watched or the rating. A movie can be rated and
//! watched at once; 2 requires it.
//!
//! Every toggle either applies a `Transition` or returns a `Refusal` and leaves
//! the sets untouched. Nothing here knows how a movie is drawn; callers read
//! `view()` or the returned changes to restyle whatever UI they own.

use std::collections::BTreeSet;

use movie_prefs_models::{MovieId, PreferenceKind, PreferenceSnapshot};
use tracing::debug;

use crate::error::{BlockedAction, Refusal};

#[cfg(test)]
mod tests;

/// One membership change caused by a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added(PreferenceKind),
    Removed(PreferenceKind),
}

/// The changes a successful toggle applied to a single movie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub id: MovieId,
    pub changes: Vec<Change>,
}

impl Transition {
    fn new(id: &MovieId) -> Self {
        Self {
            id: id.clone(),
            changes: Vec::new(),
        }
    }

    pub fn added(&self, kind: PreferenceKind) -> bool {
        self.changes.contains(&Change::Added(kind))
    }

    pub fn removed(&self, kind: PreferenceKind) -> bool {
        self.changes.contains(&Change::Removed(kind))
    }
}

/// Rating axis of a movie's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingState {
    Unrated,
    Liked,
    Disliked,
}

/// Everything a renderer needs to style one movie's buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieView {
    pub id: MovieId,
    pub rating: RatingState,
    pub watched: bool,
    pub watchlisted: bool,
    pub rewatch: bool,
    pub blocked: bool,
}

impl MovieView {
    pub fn is_active(&self, kind: PreferenceKind) -> bool {
        match kind {
            PreferenceKind::Liked => self.rating == RatingState::Liked,
            PreferenceKind::Disliked => self.rating == RatingState::Disliked,
            PreferenceKind::Watched => self.watched,
            PreferenceKind::Watchlisted => self.watchlisted,
            PreferenceKind::Rewatch => self.rewatch,
            PreferenceKind::Blocked => self.blocked,
        }
    }
}

/// A broken membership rule, reported for state that came from outside
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    LikedAndDisliked(MovieId),
    RatedButNotWatched(MovieId),
    WatchlistedButWatched(MovieId),
    WatchlistedButBlocked(MovieId),
    RewatchButNotWatched(MovieId),
    RewatchButBlocked(MovieId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceSets {
    liked: BTreeSet<MovieId>,
    disliked: BTreeSet<MovieId>,
    watched: BTreeSet<MovieId>,
    watchlisted: BTreeSet<MovieId>,
    rewatch: BTreeSet<MovieId>,
    blocked: BTreeSet<MovieId>,
}

impl PreferenceSets {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, kind: PreferenceKind) -> &BTreeSet<MovieId> {
        match kind {
            PreferenceKind::Liked => &self.liked,
            PreferenceKind::Disliked => &self.disliked,
            PreferenceKind::Watched => &self.watched,
            PreferenceKind::Watchlisted => &self.watchlisted,
            PreferenceKind::Rewatch => &self.rewatch,
            PreferenceKind::Blocked => &self.blocked,
        }
    }

    fn set_mut(&mut self, kind: PreferenceKind) -> &mut BTreeSet<MovieId> {
        match kind {
            PreferenceKind::Liked => &mut self.liked,
            PreferenceKind::Disliked => &mut self.disliked,
            PreferenceKind::Watched => &mut self.watched,
            PreferenceKind::Watchlisted => &mut self.watchlisted,
            PreferenceKind::Rewatch => &mut self.rewatch,
            PreferenceKind::Blocked => &mut self.blocked,
        }
    }

    pub fn contains(&self, kind: PreferenceKind, id: &MovieId) -> bool {
        self.set(kind).contains(id)
    }

    pub fn ids(&self, kind: PreferenceKind) -> impl Iterator<Item = &MovieId> {
        self.set(kind).iter()
    }

    pub fn len(&self, kind: PreferenceKind) -> usize {
        self.set(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        PreferenceKind::ALL.iter().all(|k| self.set(*k).is_empty())
    }

    /// Per-set sizes in `PreferenceKind::ALL` order
    pub fn counts(&self) -> Vec<(PreferenceKind, usize)> {
        PreferenceKind::ALL.iter().map(|k| (*k, self.len(*k))).collect()
    }

    fn insert(&mut self, kind: PreferenceKind, transition: &mut Transition) {
        if self.set_mut(kind).insert(transition.id.clone()) {
            transition.changes.push(Change::Added(kind));
        }
    }

    fn remove(&mut self, kind: PreferenceKind, transition: &mut Transition) {
        if self.set_mut(kind).remove(&transition.id) {
            transition.changes.push(Change::Removed(kind));
        }
    }

    // Watched and Watchlisted never overlap, so entering Watched always leaves the watchlist
    fn mark_watched(&mut self, transition: &mut Transition) {
        self.remove(PreferenceKind::Watchlisted, transition);
        self.insert(PreferenceKind::Watched, transition);
    }

    fn toggle_rating(
        &mut self,
        id: &MovieId,
        target: PreferenceKind,
        opposite: PreferenceKind,
    ) -> Result<Transition, Refusal> {
        let mut transition = Transition::new(id);

        if self.contains(target, id) {
            // Un-rating keeps the movie watched
            self.remove(target, &mut transition);
            return Ok(transition);
        }

        self.remove(opposite, &mut transition);
        // First rating of a movie implies it was watched
        self.mark_watched(&mut transition);
        self.insert(target, &mut transition);
        Ok(transition)
    }

    pub fn toggle_liked(&mut self, id: &MovieId) -> Result<Transition, Refusal> {
        self.toggle_rating(id, PreferenceKind::Liked, PreferenceKind::Disliked)
    }

    pub fn toggle_disliked(&mut self, id: &MovieId) -> Result<Transition, Refusal> {
        self.toggle_rating(id, PreferenceKind::Disliked, PreferenceKind::Liked)
    }

    pub fn toggle_watched(&mut self, id: &MovieId) -> Result<Transition, Refusal> {
        let mut transition = Transition::new(id);

        if self.contains(PreferenceKind::Watched, id) {
            if self.contains(PreferenceKind::Liked, id) || self.contains(PreferenceKind::Disliked, id) {
                return Err(Refusal::RatingConflict);
            }
            self.remove(PreferenceKind::Rewatch, &mut transition);
            self.remove(PreferenceKind::Watched, &mut transition);
            return Ok(transition);
        }

        self.mark_watched(&mut transition);
        Ok(transition)
    }

    pub fn toggle_watchlist(&mut self, id: &MovieId) -> Result<Transition, Refusal> {
        if self.contains(PreferenceKind::Watched, id) {
            return Err(Refusal::AlreadyWatched);
        }
        if self.contains(PreferenceKind::Blocked, id) {
            return Err(Refusal::Blocked {
                action: BlockedAction::Watchlist,
            });
        }

        let mut transition = Transition::new(id);
        if self.contains(PreferenceKind::Watchlisted, id) {
            self.remove(PreferenceKind::Watchlisted, &mut transition);
        } else {
            self.insert(PreferenceKind::Watchlisted, &mut transition);
        }
        Ok(transition)
    }

    pub fn toggle_rewatch(&mut self, id: &MovieId) -> Result<Transition, Refusal> {
        if !self.contains(PreferenceKind::Watched, id) {
            return Err(Refusal::NotWatched);
        }
        if self.contains(PreferenceKind::Blocked, id) {
            return Err(Refusal::Blocked {
                action: BlockedAction::Rewatch,
            });
        }

        let mut transition = Transition::new(id);
        if self.contains(PreferenceKind::Rewatch, id) {
            self.remove(PreferenceKind::Rewatch, &mut transition);
        } else {
            self.insert(PreferenceKind::Rewatch, &mut transition);
        }
        Ok(transition)
    }

    pub fn toggle_blocked(&mut self, id: &MovieId) -> Result<Transition, Refusal> {
        let mut transition = Transition::new(id);

        if self.contains(PreferenceKind::Blocked, id) {
            self.remove(PreferenceKind::Blocked, &mut transition);
            return Ok(transition);
        }

        // Watched and ratings survive a block
        self.remove(PreferenceKind::Watchlisted, &mut transition);
        self.remove(PreferenceKind::Rewatch, &mut transition);
        self.insert(PreferenceKind::Blocked, &mut transition);
        Ok(transition)
    }

    /// Toggle the given preference for a movie
    pub fn apply(&mut self, kind: PreferenceKind, id: &MovieId) -> Result<Transition, Refusal> {
        let result = match kind {
            PreferenceKind::Liked => self.toggle_liked(id),
            PreferenceKind::Disliked => self.toggle_disliked(id),
            PreferenceKind::Watched => self.toggle_watched(id),
            PreferenceKind::Watchlisted => self.toggle_watchlist(id),
            PreferenceKind::Rewatch => self.toggle_rewatch(id),
            PreferenceKind::Blocked => self.toggle_blocked(id),
        };

        match &result {
            Ok(transition) => debug!(movie_id = %id, preference = ?kind, changes = ?transition.changes, "Applied preference toggle"),
            Err(refusal) => debug!(movie_id = %id, preference = ?kind, reason = %refusal, "Refused preference toggle"),
        }

        result
    }

    pub fn view(&self, id: &MovieId) -> MovieView {
        let rating = if self.liked.contains(id) {
            RatingState::Liked
        } else if self.disliked.contains(id) {
            RatingState::Disliked
        } else {
            RatingState::Unrated
        };

        MovieView {
            id: id.clone(),
            rating,
            watched: self.watched.contains(id),
            watchlisted: self.watchlisted.contains(id),
            rewatch: self.rewatch.contains(id),
            blocked: self.blocked.contains(id),
        }
    }

    /// Serialize to the wire form. Ids come out sorted.
    pub fn snapshot(&self) -> PreferenceSnapshot {
        let mut snapshot = PreferenceSnapshot::default();
        for kind in PreferenceKind::ALL {
            *snapshot.ids_mut(kind) = self.set(kind).iter().cloned().collect();
        }
        snapshot
    }

    /// Replace every set with the snapshot's contents. The snapshot is trusted
    /// as-is; use `violations()` to inspect it.
    pub fn load(&mut self, snapshot: &PreferenceSnapshot) {
        for kind in PreferenceKind::ALL {
            *self.set_mut(kind) = snapshot.ids(kind).iter().cloned().collect();
        }
    }

    pub fn violations(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        for id in self.liked.intersection(&self.disliked) {
            violations.push(InvariantViolation::LikedAndDisliked(id.clone()));
        }
        for id in self.liked.union(&self.disliked) {
            if !self.watched.contains(id) {
                violations.push(InvariantViolation::RatedButNotWatched(id.clone()));
            }
        }
        for id in self.watchlisted.intersection(&self.watched) {
            violations.push(InvariantViolation::WatchlistedButWatched(id.clone()));
        }
        for id in self.watchlisted.intersection(&self.blocked) {
            violations.push(InvariantViolation::WatchlistedButBlocked(id.clone()));
        }
        for id in self.rewatch.difference(&self.watched) {
            violations.push(InvariantViolation::RewatchButNotWatched(id.clone()));
        }
        for id in self.rewatch.intersection(&self.blocked) {
            violations.push(InvariantViolation::RewatchButBlocked(id.clone()));
        }

        violations
    }
}

impl From<&PreferenceSnapshot> for PreferenceSets {
    fn from(snapshot: &PreferenceSnapshot) -> Self {
        let mut sets = Self::new();
        sets.load(snapshot);
        sets
    }
}
