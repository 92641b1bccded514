use serde::{Deserialize, Serialize};

use super::MovieId;

/// Catalog entry for a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Comma-separated genre tags
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub release_year: Option<i32>,
}

impl Movie {
    pub fn new(id: MovieId, title: &str, genre: Option<&str>) -> Self {
        Self {
            id,
            title: title.to_string(),
            genre: genre.map(str::to_string),
            rating: None,
            release_year: None,
        }
    }

    pub fn with_rating(mut self, rating: f64, release_year: i32) -> Self {
        self.rating = Some(rating);
        self.release_year = Some(release_year);
        self
    }

    /// Whether the genre field contains `token` as a literal substring
    pub fn genre_contains(&self, token: &str) -> bool {
        self.genre
            .as_deref()
            .is_some_and(|genre| genre.contains(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_contains_is_substring_match() {
        let movie = Movie::new(1, "Hot Fuzz", Some("Action/Comedy"));
        assert!(movie.genre_contains("Action"));
        assert!(movie.genre_contains("Comedy"));
        assert!(!movie.genre_contains("Drama"));
    }

    #[test]
    fn test_genre_contains_without_genre() {
        let movie = Movie::new(1, "Untitled", None);
        assert!(!movie.genre_contains("Action"));
    }

    #[test]
    fn test_movie_serialization() {
        let movie = Movie::new(3, "Arrival", Some("Sci-Fi")).with_rating(7.9, 2016);
        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["rating"], 7.9);
        assert_eq!(json["release_year"], 2016);
    }
}
