// Structured-record backend: the catalog as one JSON object keyed by title.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use super::{atomic_write, read_store, recover, MovieStorage, Recovery};
use crate::error::Result;
use crate::movie::Catalog;

/// JSON file storage. The whole document is read and rewritten on every call.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
    recovery: Recovery,
}

impl JsonStorage {
    /// Open the store at `path`, writing an empty `{}` document if the file
    /// does not exist yet.
    pub fn open(path: impl Into<PathBuf>, recovery: Recovery) -> Result<Self> {
        let storage = JsonStorage {
            path: path.into(),
            recovery,
        };
        if !storage.path.exists() {
            debug!(path = %storage.path.display(), "provisioning empty JSON store");
            storage.save(&Catalog::new())?;
        }
        Ok(storage)
    }
}

impl MovieStorage for JsonStorage {
    fn load(&self) -> Result<Catalog> {
        let Some(bytes) = read_store(&self.path)? else {
            return Ok(Catalog::new());
        };
        match serde_json::from_slice::<Catalog>(&bytes) {
            Ok(catalog) => {
                debug!(path = %self.path.display(), movies = catalog.len(), "JSON store loaded");
                Ok(catalog)
            }
            Err(e) => recover(self.recovery, &self.path, e),
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        catalog.serialize(&mut ser)?;
        buf.push(b'\n');
        atomic_write(&self.path, &buf)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
