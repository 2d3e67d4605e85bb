use super::*;
use movie_prefs_models::{MovieId, PreferenceKind, PreferenceSnapshot};

fn id(s: &str) -> MovieId {
    MovieId::from(s)
}

fn members(sets: &PreferenceSets, kind: PreferenceKind) -> Vec<String> {
    sets.ids(kind).map(|m| m.to_string()).collect()
}

#[test]
fn test_dislike_then_like_moves_rating() {
    let mut sets = PreferenceSets::new();

    sets.toggle_disliked(&id("m1")).unwrap();
    assert_eq!(members(&sets, PreferenceKind::Watched), vec!["m1"]);
    assert_eq!(members(&sets, PreferenceKind::Disliked), vec!["m1"]);

    let transition = sets.toggle_liked(&id("m1")).unwrap();
    assert!(transition.removed(PreferenceKind::Disliked));
    assert!(transition.added(PreferenceKind::Liked));
    assert!(!transition.added(PreferenceKind::Watched));
    assert_eq!(members(&sets, PreferenceKind::Watched), vec!["m1"]);
    assert_eq!(members(&sets, PreferenceKind::Liked), vec!["m1"]);
    assert!(members(&sets, PreferenceKind::Disliked).is_empty());
}

#[test]
fn test_like_twice_keeps_implicit_watched() {
    let mut sets = PreferenceSets::new();

    let first = sets.toggle_liked(&id("m1")).unwrap();
    assert_eq!(
        first.changes,
        vec![Change::Added(PreferenceKind::Watched), Change::Added(PreferenceKind::Liked)]
    );

    let second = sets.toggle_liked(&id("m1")).unwrap();
    assert_eq!(second.changes, vec![Change::Removed(PreferenceKind::Liked)]);
    assert!(!sets.contains(PreferenceKind::Liked, &id("m1")));
    assert!(sets.contains(PreferenceKind::Watched, &id("m1")));
}

#[test]
fn test_like_twice_on_watched_movie_restores_membership() {
    let mut sets = PreferenceSets::new();
    sets.toggle_watched(&id("m1")).unwrap();
    let before = sets.clone();

    sets.toggle_liked(&id("m1")).unwrap();
    sets.toggle_liked(&id("m1")).unwrap();
    assert_eq!(sets, before);
}

#[test]
fn test_unwatch_rated_movie_is_refused() {
    let mut sets = PreferenceSets::new();
    sets.toggle_liked(&id("m1")).unwrap();
    let before = sets.clone();

    assert_eq!(sets.toggle_watched(&id("m1")), Err(Refusal::RatingConflict));
    assert_eq!(sets.toggle_watched(&id("m1")), Err(Refusal::RatingConflict));
    assert_eq!(sets, before);

    sets.toggle_disliked(&id("m1")).unwrap();
    assert_eq!(sets.toggle_watched(&id("m1")), Err(Refusal::RatingConflict));
}

#[test]
fn test_unwatch_drops_rewatch() {
    let mut sets = PreferenceSets::new();
    sets.toggle_watched(&id("m1")).unwrap();
    sets.toggle_rewatch(&id("m1")).unwrap();

    let transition = sets.toggle_watched(&id("m1")).unwrap();
    assert!(transition.removed(PreferenceKind::Rewatch));
    assert!(transition.removed(PreferenceKind::Watched));
    assert!(sets.is_empty());
}

#[test]
fn test_watching_a_watchlisted_movie_clears_watchlist() {
    let mut sets = PreferenceSets::new();
    sets.toggle_watchlist(&id("m2")).unwrap();
    sets.toggle_watched(&id("m2")).unwrap();

    assert!(members(&sets, PreferenceKind::Watchlisted).is_empty());
    assert_eq!(members(&sets, PreferenceKind::Watched), vec!["m2"]);
}

#[test]
fn test_rating_a_watchlisted_movie_clears_watchlist() {
    let mut sets = PreferenceSets::new();
    sets.toggle_watchlist(&id("m2")).unwrap();

    let transition = sets.toggle_disliked(&id("m2")).unwrap();
    assert!(transition.removed(PreferenceKind::Watchlisted));
    assert!(sets.violations().is_empty());
}

#[test]
fn test_watchlist_refusals() {
    let mut sets = PreferenceSets::new();
    sets.toggle_watched(&id("seen")).unwrap();
    sets.toggle_blocked(&id("blocked")).unwrap();

    assert_eq!(sets.toggle_watchlist(&id("seen")), Err(Refusal::AlreadyWatched));
    assert_eq!(
        sets.toggle_watchlist(&id("blocked")),
        Err(Refusal::Blocked { action: BlockedAction::Watchlist })
    );

    // Watched is checked before Blocked
    sets.toggle_blocked(&id("seen")).unwrap();
    assert_eq!(sets.toggle_watchlist(&id("seen")), Err(Refusal::AlreadyWatched));
}

#[test]
fn test_watchlist_toggles() {
    let mut sets = PreferenceSets::new();
    sets.toggle_watchlist(&id("m1")).unwrap();
    assert!(sets.contains(PreferenceKind::Watchlisted, &id("m1")));
    sets.toggle_watchlist(&id("m1")).unwrap();
    assert!(sets.is_empty());
}

#[test]
fn test_rewatch_requires_watched() {
    let mut sets = PreferenceSets::new();
    let before = sets.clone();

    assert_eq!(sets.toggle_rewatch(&id("m3")), Err(Refusal::NotWatched));
    assert_eq!(sets, before);
}

#[test]
fn test_rewatch_refused_when_blocked() {
    let mut sets = PreferenceSets::new();
    sets.toggle_watched(&id("m3")).unwrap();
    sets.toggle_blocked(&id("m3")).unwrap();

    assert_eq!(
        sets.toggle_rewatch(&id("m3")),
        Err(Refusal::Blocked { action: BlockedAction::Rewatch })
    );
    // NotWatched wins over Blocked
    assert_eq!(sets.toggle_rewatch(&id("other")), Err(Refusal::NotWatched));
}

#[test]
fn test_block_evicts_watchlist_and_rewatch_only() {
    let mut sets = PreferenceSets::new();
    sets.toggle_liked(&id("m4")).unwrap();
    sets.toggle_rewatch(&id("m4")).unwrap();

    let transition = sets.toggle_blocked(&id("m4")).unwrap();
    assert!(transition.removed(PreferenceKind::Rewatch));
    assert!(transition.added(PreferenceKind::Blocked));

    let view = sets.view(&id("m4"));
    assert!(view.blocked);
    assert!(!view.rewatch);
    assert!(view.watched);
    assert_eq!(view.rating, RatingState::Liked);

    // Unblocking restores nothing
    sets.toggle_blocked(&id("m4")).unwrap();
    assert!(!sets.contains(PreferenceKind::Rewatch, &id("m4")));
}

#[test]
fn test_block_evicts_from_inconsistent_loaded_state() {
    let mut sets = PreferenceSets::new();
    sets.load(&PreferenceSnapshot {
        movies_watched: vec![id("m5")],
        watchlist: vec![id("m5")],
        movies_rewatch: vec![id("m5")],
        ..Default::default()
    });

    sets.toggle_blocked(&id("m5")).unwrap();
    assert!(!sets.contains(PreferenceKind::Watchlisted, &id("m5")));
    assert!(!sets.contains(PreferenceKind::Rewatch, &id("m5")));
    assert!(sets.contains(PreferenceKind::Blocked, &id("m5")));
}

#[test]
fn test_snapshot_load_round_trip() {
    let mut sets = PreferenceSets::new();
    sets.toggle_liked(&id("b")).unwrap();
    sets.toggle_disliked(&id("a")).unwrap();
    sets.toggle_watchlist(&id("c")).unwrap();
    sets.toggle_rewatch(&id("b")).unwrap();
    sets.toggle_blocked(&id("d")).unwrap();

    let snapshot = sets.snapshot();
    assert_eq!(snapshot.movies_watched, vec![id("a"), id("b")]);

    let restored = PreferenceSets::from(&snapshot);
    assert_eq!(restored, sets);
    assert_eq!(restored.snapshot(), snapshot);
}

#[test]
fn test_load_replaces_everything_without_checks() {
    let mut sets = PreferenceSets::new();
    sets.toggle_liked(&id("old")).unwrap();

    sets.load(&PreferenceSnapshot {
        movies_liked: vec![id("x")],
        movies_disliked: vec![id("x")],
        ..Default::default()
    });

    assert!(!sets.contains(PreferenceKind::Watched, &id("old")));
    let violations = sets.violations();
    assert!(violations.contains(&InvariantViolation::LikedAndDisliked(id("x"))));
    assert!(violations.contains(&InvariantViolation::RatedButNotWatched(id("x"))));
}

#[test]
fn test_view_is_active_matches_sets() {
    let mut sets = PreferenceSets::new();
    sets.apply(PreferenceKind::Disliked, &id("m1")).unwrap();

    let view = sets.view(&id("m1"));
    assert!(view.is_active(PreferenceKind::Disliked));
    assert!(view.is_active(PreferenceKind::Watched));
    assert!(!view.is_active(PreferenceKind::Liked));
    assert!(!view.is_active(PreferenceKind::Blocked));
    assert_eq!(sets.view(&id("unknown")).rating, RatingState::Unrated);
}

#[test]
fn test_counts() {
    let mut sets = PreferenceSets::new();
    sets.toggle_liked(&id("1")).unwrap();
    sets.toggle_liked(&id("2")).unwrap();
    sets.toggle_blocked(&id("3")).unwrap();

    let counts = sets.counts();
    assert_eq!(counts[0], (PreferenceKind::Liked, 2));
    assert_eq!(counts[2], (PreferenceKind::Watched, 2));
    assert_eq!(counts[5], (PreferenceKind::Blocked, 1));
}
