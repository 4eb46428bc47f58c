// Tabular backend: one CSV row per movie under a fixed header.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{atomic_write, read_store, recover, MovieStorage, Recovery};
use crate::error::Result;
use crate::movie::{Catalog, Movie};

/// Column order used when writing. Reading matches columns by name.
pub const HEADER: [&str; 4] = ["title", "year", "rating", "poster"];

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    title: String,
    year: i32,
    rating: f64,
    poster: String,
}

impl From<Row> for Movie {
    fn from(row: Row) -> Self {
        Movie::new(row.title, row.year, row.rating, row.poster)
    }
}

impl<'a> From<&'a Movie> for Row {
    fn from(movie: &'a Movie) -> Self {
        Row {
            title: movie.title.clone(),
            year: movie.year,
            rating: movie.rating,
            poster: movie.poster.clone(),
        }
    }
}

/// CSV file storage. A missing file is an empty store and is only created
/// by the first write.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
    recovery: Recovery,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>, recovery: Recovery) -> Self {
        CsvStorage {
            path: path.into(),
            recovery,
        }
    }

    fn parse(bytes: &[u8]) -> std::result::Result<Catalog, String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(bytes);
        let headers = reader.headers().map_err(|e| e.to_string())?;
        if let Some(missing) = HEADER.iter().find(|name| !headers.iter().any(|h| h == **name)) {
            return Err(format!("header has no '{missing}' column"));
        }
        let mut catalog = Catalog::new();
        for row in reader.deserialize::<Row>() {
            let movie: Movie = row.map_err(|e| e.to_string())?.into();
            movie
                .validate()
                .map_err(|e| format!("record '{}': {e}", movie.title))?;
            catalog.upsert(movie);
        }
        Ok(catalog)
    }

    fn render(catalog: &Catalog) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(HEADER)?;
        for movie in catalog {
            writer.serialize(Row::from(movie))?;
        }
        writer
            .into_inner()
            .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()).into())
    }
}

impl MovieStorage for CsvStorage {
    fn load(&self) -> Result<Catalog> {
        let Some(bytes) = read_store(&self.path)? else {
            return Ok(Catalog::new());
        };
        match Self::parse(&bytes) {
            Ok(catalog) => {
                debug!(path = %self.path.display(), movies = catalog.len(), "CSV store loaded");
                Ok(catalog)
            }
            Err(e) => recover(self.recovery, &self.path, e),
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        let bytes = Self::render(catalog)?;
        atomic_write(&self.path, &bytes)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
