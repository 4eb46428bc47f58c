// Catalog controller: the menu operations as plain methods.
// It owns one storage backend and, optionally, a metadata lookup. The UI
// layer collects input and prints results; everything here is testable
// without a terminal.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::error::AppError;
use crate::lookup::MetadataLookup;
use crate::movie::{Catalog, Movie};
use crate::site;
use crate::stats::{self, Stats};
use crate::storage::MovieStorage;

pub struct MovieApp {
    storage: Box<dyn MovieStorage>,
    lookup: Option<Box<dyn MetadataLookup>>,
    site: SiteConfig,
}

impl MovieApp {
    pub fn new(storage: Box<dyn MovieStorage>, site: SiteConfig) -> Self {
        MovieApp {
            storage,
            lookup: None,
            site,
        }
    }

    /// Attach a metadata lookup used by `add_from_lookup`.
    pub fn with_lookup(mut self, lookup: Box<dyn MetadataLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn has_lookup(&self) -> bool {
        self.lookup.is_some()
    }

    pub fn list_movies(&self) -> Result<Catalog, AppError> {
        Ok(self.storage.list()?)
    }

    /// Fetch canonical metadata for `title` and add it. The key stored is
    /// the title returned by the service.
    pub fn add_from_lookup(&self, title: &str) -> Result<Movie, AppError> {
        let lookup = self.lookup.as_ref().ok_or(AppError::LookupDisabled)?;
        let movie = lookup.fetch(title.trim())?;
        debug!(requested = title, canonical = %movie.title, "lookup resolved");
        self.storage.add(movie.clone())?;
        Ok(movie)
    }

    /// Add a movie entered by hand.
    pub fn add_movie(&self, movie: Movie) -> Result<(), AppError> {
        Ok(self.storage.add(movie)?)
    }

    pub fn delete_movie(&self, title: &str) -> Result<Movie, AppError> {
        Ok(self.storage.delete(title)?)
    }

    pub fn update_rating(&self, title: &str, rating: f64) -> Result<(), AppError> {
        Ok(self.storage.update(title, rating)?)
    }

    /// `None` when there are no movies to summarise.
    pub fn statistics(&self) -> Result<Option<Stats>, AppError> {
        let catalog = self.storage.list()?;
        Ok(stats::compute(&catalog))
    }

    /// Render the catalog to the configured output page. `None` when there
    /// are no movies, in which case nothing is written.
    pub fn generate_site(&self) -> Result<Option<PathBuf>, AppError> {
        let catalog = self.storage.list()?;
        if catalog.is_empty() {
            info!("no movies, website not generated");
            return Ok(None);
        }
        site::generate(&self.site, &catalog).map(Some)
    }
}
