// Storage backends: structured-record JSON file and tabular CSV file.
//
// A backend only knows how to `load` and `save` a whole `Catalog`. The
// four catalog operations are provided on `MovieStorage` itself, so both
// backends share one implementation of the uniqueness and rating rules.

pub mod csv_file;
pub mod json_file;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::movie::{validate_rating, Catalog, Movie};

pub use self::csv_file::CsvStorage;
pub use self::json_file::JsonStorage;

/// What `list` does when the store file exists but cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Recovery {
    /// Report [`StoreError::Malformed`] and refuse to write over the file.
    #[default]
    Strict,
    /// Log a warning and treat the file as an empty store.
    Lenient,
}

/// Storage trait: whole-collection persistence of one catalog file.
pub trait MovieStorage {
    /// Read the full catalog. A missing or empty file is an empty catalog.
    fn load(&self) -> Result<Catalog>;

    /// Replace the file contents with `catalog`.
    fn save(&self, catalog: &Catalog) -> Result<()>;

    /// Path of the backing file.
    fn path(&self) -> &Path;

    /// List every movie in file order.
    fn list(&self) -> Result<Catalog> {
        self.load()
    }

    /// Add a new movie. Fails if the title is already present.
    fn add(&self, movie: Movie) -> Result<()> {
        movie.validate()?;
        let mut catalog = self.load()?;
        let title = movie.title.clone();
        if catalog.insert(movie).is_err() {
            return Err(StoreError::DuplicateTitle(title));
        }
        self.save(&catalog)?;
        info!(title = %title, path = %self.path().display(), "movie added");
        Ok(())
    }

    /// Remove a movie by title.
    fn delete(&self, title: &str) -> Result<Movie> {
        let mut catalog = self.load()?;
        let removed = catalog
            .remove(title)
            .ok_or_else(|| StoreError::NotFound(title.to_string()))?;
        self.save(&catalog)?;
        info!(title, path = %self.path().display(), "movie deleted");
        Ok(removed)
    }

    /// Replace the rating of an existing movie; nothing else changes.
    fn update(&self, title: &str, rating: f64) -> Result<()> {
        validate_rating(rating)?;
        let mut catalog = self.load()?;
        let movie = catalog
            .get_mut(title)
            .ok_or_else(|| StoreError::NotFound(title.to_string()))?;
        movie.rating = rating;
        self.save(&catalog)?;
        info!(title, rating, path = %self.path().display(), "rating updated");
        Ok(())
    }
}

/// Which backend a store file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendKind {
    /// Structured-record JSON document.
    Json,
    /// Tabular CSV file with a header row.
    Csv,
}

impl BackendKind {
    /// `.csv` files use the CSV backend, everything else JSON.
    pub fn infer(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => BackendKind::Csv,
            _ => BackendKind::Json,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Json => f.write_str("json"),
            BackendKind::Csv => f.write_str("csv"),
        }
    }
}

/// Build the backend for `path`.
pub fn open(kind: BackendKind, path: impl Into<PathBuf>, recovery: Recovery) -> Result<Box<dyn MovieStorage>> {
    let path = path.into();
    debug!(backend = %kind, path = %path.display(), "opening store");
    let storage: Box<dyn MovieStorage> = match kind {
        BackendKind::Json => Box::new(JsonStorage::open(path, recovery)?),
        BackendKind::Csv => Box::new(CsvStorage::new(path, recovery)),
    };
    Ok(storage)
}

/// Read the store file. `None` means there is nothing to parse: the file is
/// missing, empty or whitespace only.
pub(crate) fn read_store(path: &Path) -> Result<Option<Vec<u8>>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(bytes))
}

/// Apply the recovery policy to a file that failed to parse.
pub(crate) fn recover(recovery: Recovery, path: &Path, reason: impl fmt::Display) -> Result<Catalog> {
    match recovery {
        Recovery::Strict => Err(StoreError::Malformed {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }),
        Recovery::Lenient => {
            warn!(path = %path.display(), %reason, "store file unreadable, treating it as empty");
            Ok(Catalog::new())
        }
    }
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`, so a reader
/// never sees a half-written store. Missing parent directories are created.
pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("db");
    let tmp = path.with_extension(format!("{ext}.tmp"));
    std::fs::write(&tmp, bytes)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    debug!(path = %path.display(), bytes = bytes.len(), "store written");
    Ok(())
}
