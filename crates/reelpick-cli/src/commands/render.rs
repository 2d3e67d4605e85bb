use comfy_table::{Attribute, Cell, Color, Table};
use movie_prefs_core::{MovieView, PreferenceSets, RatingState};
use movie_prefs_models::{Movie, PreferenceKind};
use serde_json::json;

fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

/// Short labels for every active preference of a movie
pub fn status_badges(view: &MovieView) -> Vec<&'static str> {
    let mut badges = Vec::new();
    match view.rating {
        RatingState::Liked => badges.push("liked"),
        RatingState::Disliked => badges.push("disliked"),
        RatingState::Unrated => {}
    }
    if view.watched {
        badges.push("watched");
    }
    if view.watchlisted {
        badges.push("watchlist");
    }
    if view.rewatch {
        badges.push("rewatch");
    }
    if view.blocked {
        badges.push("blocked");
    }
    badges
}

fn badge_color(view: &MovieView) -> Color {
    match view.rating {
        RatingState::Liked => Color::Green,
        RatingState::Disliked => Color::Red,
        RatingState::Unrated if view.blocked => Color::DarkGrey,
        RatingState::Unrated if view.watchlisted => Color::Cyan,
        RatingState::Unrated if view.watched => Color::Blue,
        RatingState::Unrated => Color::Reset,
    }
}

pub fn movie_table(movies: &[Movie], preferences: &PreferenceSets) -> Table {
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
    ]);

    for movie in movies {
        let view = preferences.view(&movie.id);
        table.add_row(vec![
            Cell::new(movie.id.as_str()),
            Cell::new(&movie.name),
            Cell::new(movie.year.map(|y| y.to_string()).unwrap_or_default()),
            Cell::new(status_badges(&view).join(", ")).fg(badge_color(&view)),
        ]);
    }

    table
}

pub fn movies_json(movies: &[Movie], preferences: &PreferenceSets, poster_base: &str) -> serde_json::Value {
    let items: Vec<_> = movies
        .iter()
        .map(|movie| {
            let view = preferences.view(&movie.id);
            json!({
                "id": movie.id,
                "name": movie.name,
                "year": movie.year,
                "poster_url": movie.poster_url(poster_base),
                "status": status_badges(&view),
            })
        })
        .collect();
    json!({ "count": items.len(), "movies": items })
}

pub fn preferences_table(preferences: &PreferenceSets) -> Table {
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new("Preference").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
        Cell::new("Movie IDs").add_attribute(Attribute::Bold),
    ]);

    for kind in PreferenceKind::ALL {
        let ids: Vec<&str> = preferences.ids(kind).map(|id| id.as_str()).collect();
        table.add_row(vec![
            Cell::new(kind.label()),
            Cell::new(ids.len()),
            Cell::new(ids.join(", ")),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use movie_prefs_models::MovieId;

    #[test]
    fn test_status_badges_follow_view() {
        let mut sets = PreferenceSets::new();
        let id = MovieId::from("603");
        sets.toggle_liked(&id).unwrap();
        sets.toggle_rewatch(&id).unwrap();

        assert_eq!(status_badges(&sets.view(&id)), vec!["liked", "watched", "rewatch"]);
        assert!(status_badges(&sets.view(&MovieId::from("1"))).is_empty());
    }

    #[test]
    fn test_movies_json_includes_poster_url() {
        let movies = vec![Movie {
            id: MovieId::from("603"),
            name: "The Matrix".to_string(),
            year: Some(1999),
            poster: Some("/matrix.jpg".to_string()),
        }];
        let value = movies_json(&movies, &PreferenceSets::new(), "https://image.tmdb.org/t/p/w300");
        assert_eq!(value["count"], 1);
        assert_eq!(value["movies"][0]["poster_url"], "https://image.tmdb.org/t/p/w300/matrix.jpg");
        assert_eq!(value["movies"][0]["id"], "603");
    }
}
