// Catalog records and the ordered, title-keyed collection that holds them.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{Result, StoreError};

/// Lowest accepted rating.
pub const MIN_RATING: f64 = 0.0;
/// Highest accepted rating.
pub const MAX_RATING: f64 = 10.0;

/// One catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: String,
}

/// The per-title payload as it is stored: everything except the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub year: i32,
    pub rating: f64,
    pub poster: String,
}

impl Movie {
    pub fn new(title: impl Into<String>, year: i32, rating: f64, poster: impl Into<String>) -> Self {
        Movie {
            title: title.into(),
            year,
            rating,
            poster: poster.into(),
        }
    }

    pub fn from_details(title: String, details: MovieDetails) -> Self {
        Movie {
            title,
            year: details.year,
            rating: details.rating,
            poster: details.poster,
        }
    }

    pub fn details(&self) -> MovieDetails {
        MovieDetails {
            year: self.year,
            rating: self.rating,
            poster: self.poster.clone(),
        }
    }

    /// Checks the invariants a record must satisfy before it is stored.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        validate_rating(self.rating)?;
        Ok(())
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}), Rating: {}, Poster: {}",
            self.title, self.year, self.rating, self.poster
        )
    }
}

/// Returns the rating unchanged when it is a finite value in `[0, 10]`.
pub fn validate_rating(rating: f64) -> Result<f64> {
    if rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(StoreError::InvalidRating(rating))
    }
}

/// Every record of one store, unique by title and kept in insertion order.
///
/// Serializes as a JSON-style map `title -> {year, rating, poster}` whose
/// key order follows the catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Movie> {
        self.movies.iter()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }

    pub fn get(&self, title: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.title == title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    fn position(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|m| m.title == title)
    }

    /// Appends a movie whose title is not present yet. Hands the movie back
    /// if the title is already taken.
    pub fn insert(&mut self, movie: Movie) -> std::result::Result<(), Movie> {
        if self.contains(&movie.title) {
            return Err(movie);
        }
        self.movies.push(movie);
        Ok(())
    }

    /// Inserts or replaces in place. Used when reading files, where a
    /// repeated title overwrites the earlier row but keeps its position.
    pub fn upsert(&mut self, movie: Movie) {
        match self.position(&movie.title) {
            Some(idx) => self.movies[idx] = movie,
            None => self.movies.push(movie),
        }
    }

    pub fn remove(&mut self, title: &str) -> Option<Movie> {
        self.position(title).map(|idx| self.movies.remove(idx))
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut Movie> {
        self.movies.iter_mut().find(|m| m.title == title)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Movie;
    type IntoIter = std::slice::Iter<'a, Movie>;

    fn into_iter(self) -> Self::IntoIter {
        self.movies.iter()
    }
}

impl FromIterator<Movie> for Catalog {
    fn from_iter<I: IntoIterator<Item = Movie>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for movie in iter {
            catalog.upsert(movie);
        }
        catalog
    }
}

#[derive(Serialize)]
struct DetailsRef<'a> {
    year: i32,
    rating: f64,
    poster: &'a str,
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.movies.len()))?;
        for movie in &self.movies {
            let details = DetailsRef {
                year: movie.year,
                rating: movie.rating,
                poster: &movie.poster,
            };
            map.serialize_entry(&movie.title, &details)?;
        }
        map.end()
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of movie titles to {year, rating, poster}")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Catalog, A::Error> {
        let mut catalog = Catalog::new();
        while let Some((title, details)) = access.next_entry::<String, MovieDetails>()? {
            let movie = Movie::from_details(title, details);
            movie
                .validate()
                .map_err(|e| <A::Error as de::Error>::custom(format!("record '{}': {e}", movie.title)))?;
            catalog.upsert(movie);
        }
        Ok(catalog)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Catalog, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_duplicate_title() {
        let mut catalog = Catalog::new();
        catalog.insert(Movie::new("Heat", 1995, 8.3, "p")).unwrap();
        let rejected = catalog.insert(Movie::new("Heat", 2000, 1.0, "q")).unwrap_err();
        assert_eq!(rejected.year, 2000);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Heat").unwrap().year, 1995);
    }

    #[test]
    fn test_titles_are_case_sensitive() {
        let mut catalog = Catalog::new();
        catalog.insert(Movie::new("Heat", 1995, 8.3, "p")).unwrap();
        assert!(catalog.insert(Movie::new("heat", 1995, 8.3, "p")).is_ok());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_upsert_keeps_position() {
        let mut catalog: Catalog = vec![
            Movie::new("A", 2001, 1.0, "a"),
            Movie::new("B", 2002, 2.0, "b"),
        ]
        .into_iter()
        .collect();
        catalog.upsert(Movie::new("A", 2001, 5.0, "a"));
        let titles: Vec<&str> = catalog.titles().collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(catalog.get("A").unwrap().rating, 5.0);
    }

    #[test]
    fn test_validate_rating_bounds() {
        assert!(validate_rating(0.0).is_ok());
        assert!(validate_rating(10.0).is_ok());
        assert!(matches!(validate_rating(10.1), Err(StoreError::InvalidRating(_))));
        assert!(matches!(validate_rating(-0.5), Err(StoreError::InvalidRating(_))));
        assert!(validate_rating(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_blank_title() {
        let movie = Movie::new("   ", 1999, 5.0, "p");
        assert!(matches!(movie.validate(), Err(StoreError::EmptyTitle)));
    }

    #[test]
    fn test_json_shape_preserves_order() {
        let catalog: Catalog = vec![
            Movie::new("Zodiac", 2007, 7.7, "z"),
            Movie::new("Alien", 1979, 8.5, "a"),
        ]
        .into_iter()
        .collect();
        let text = serde_json::to_string(&catalog).unwrap();
        assert_eq!(
            text,
            r#"{"Zodiac":{"year":2007,"rating":7.7,"poster":"z"},"Alien":{"year":1979,"rating":8.5,"poster":"a"}}"#
        );
        let back: Catalog = serde_json::from_str(&text).unwrap();
        assert_eq!(back, catalog);
    }

    #[test]
    fn test_json_rejects_invalid_records() {
        let out_of_range = r#"{"Heat":{"year":1995,"rating":42.0,"poster":"h"}}"#;
        assert!(serde_json::from_str::<Catalog>(out_of_range).is_err());
        let blank_title = r#"{"":{"year":2000,"rating":-3,"poster":"x"}}"#;
        assert!(serde_json::from_str::<Catalog>(blank_title).is_err());
    }

    #[test]
    fn test_json_repeated_key_last_wins() {
        let text = r#"{"A":{"year":1,"rating":1.0,"poster":"x"},"B":{"year":2,"rating":2.0,"poster":"y"},"A":{"year":3,"rating":3.0,"poster":"z"}}"#;
        let catalog: Catalog = serde_json::from_str(text).unwrap();
        let titles: Vec<&str> = catalog.titles().collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(catalog.get("A").unwrap().year, 3);
    }
}
