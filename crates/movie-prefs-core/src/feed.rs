use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use movie_prefs_models::{Movie, MovieId};

/// Movies requested when the page first opens or a search is cleared
pub const INITIAL_BATCH: u32 = 50;
/// Movies requested each time the user scrolls past the halfway mark
pub const SCROLL_BATCH: u32 = 35;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMode {
    /// Random movies, grows as the user scrolls
    Browse,
    /// Results for a search term, replaced wholesale per search
    Search(String),
}

/// Held while a "fetch more" request is outstanding. Dropping it, on success
/// or failure, lets the next fetch through.
#[derive(Debug)]
pub struct FetchGuard {
    in_flight: Arc<AtomicBool>,
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// The list of movies currently offered to the user
#[derive(Debug)]
pub struct MovieFeed {
    movies: Vec<Movie>,
    shown: HashSet<MovieId>,
    mode: FeedMode,
    in_flight: Arc<AtomicBool>,
}

impl MovieFeed {
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            shown: HashSet::new(),
            mode: FeedMode::Browse,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn mode(&self) -> &FeedMode {
        &self.mode
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, id: &MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| &m.id == id)
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the single fetch slot. Returns `None` when a fetch is already
    /// outstanding; the caller should drop its request.
    pub fn begin_fetch(&self) -> Option<FetchGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FetchGuard {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    /// Append a browse page, skipping movies already shown. Returns how many
    /// were added.
    pub fn append(&mut self, movies: Vec<Movie>) -> usize {
        let before = self.movies.len();
        for movie in movies {
            if self.shown.insert(movie.id.clone()) {
                self.movies.push(movie);
            }
        }
        self.movies.len() - before
    }

    /// Replace the list with search results
    pub fn replace(&mut self, movies: Vec<Movie>) -> usize {
        self.clear();
        self.append(movies)
    }

    pub fn clear(&mut self) {
        self.movies.clear();
        self.shown.clear();
    }

    /// Switch mode from a raw search box value. A blank term returns to
    /// browsing. The list is cleared either way.
    pub fn set_search(&mut self, term: &str) -> &FeedMode {
        let term = term.trim();
        self.mode = if term.is_empty() {
            FeedMode::Browse
        } else {
            FeedMode::Search(term.to_string())
        };
        self.clear();
        &self.mode
    }

    /// Infinite scroll trigger: only while browsing, once the scroll position
    /// passes the halfway point of the last screenful.
    pub fn should_fetch_more(&self, scroll_top: f64, scroll_height: f64, client_height: f64) -> bool {
        if self.mode != FeedMode::Browse {
            return false;
        }
        let threshold = scroll_height - client_height / 2.0;
        scroll_top >= threshold
    }
}

impl Default for MovieFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str) -> Movie {
        Movie {
            id: MovieId::from(id),
            name: format!("Movie {}", id),
            year: Some(2001),
            poster: None,
        }
    }

    #[test]
    fn test_overlapping_fetch_is_dropped() {
        let feed = MovieFeed::new();
        let guard = feed.begin_fetch();
        assert!(guard.is_some());
        assert!(feed.is_fetching());
        assert!(feed.begin_fetch().is_none());

        drop(guard);
        assert!(!feed.is_fetching());
        assert!(feed.begin_fetch().is_some());
    }

    #[test]
    fn test_append_skips_duplicates() {
        let mut feed = MovieFeed::new();
        assert_eq!(feed.append(vec![movie("1"), movie("2")]), 2);
        assert_eq!(feed.append(vec![movie("2"), movie("3")]), 1);
        assert_eq!(feed.len(), 3);
        assert!(feed.get(&MovieId::from("3")).is_some());
    }

    #[test]
    fn test_blank_search_returns_to_browse() {
        let mut feed = MovieFeed::new();
        feed.append(vec![movie("1")]);

        assert_eq!(feed.set_search("  matrix "), &FeedMode::Search("matrix".to_string()));
        assert!(feed.is_empty());
        assert!(!feed.should_fetch_more(1000.0, 1000.0, 500.0));

        assert_eq!(feed.set_search("   "), &FeedMode::Browse);
        assert!(feed.should_fetch_more(750.0, 1000.0, 500.0));
    }

    #[test]
    fn test_scroll_threshold() {
        let feed = MovieFeed::new();
        assert!(!feed.should_fetch_more(749.0, 1000.0, 500.0));
        assert!(feed.should_fetch_more(750.0, 1000.0, 500.0));
    }
}
