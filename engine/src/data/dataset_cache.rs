// Explicit memoization of loaded datasets. The caller owns the cache; an
// entry is reused only while the file's signature is unchanged.
use crate::data::csv_parser::{BrazilianCsvParser, Dataset};
use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Cheap fingerprint of a file's contents, taken from its metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileSignature {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileSignature {
    pub fn of(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(FileSignature {
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub signature: FileSignature,
}

impl CacheKey {
    pub fn for_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Ok(CacheKey {
            path: path.to_path_buf(),
            signature: FileSignature::of(path)?,
        })
    }
}

pub struct DatasetCache {
    parser: BrazilianCsvParser,
    // One entry per path; a new signature replaces the stale one.
    entries: HashMap<PathBuf, (FileSignature, Arc<Dataset>)>,
}

impl DatasetCache {
    pub fn new(parser: BrazilianCsvParser) -> Self {
        DatasetCache {
            parser,
            entries: HashMap::new(),
        }
    }

    pub fn get_or_load(&mut self, path: impl AsRef<Path>) -> Result<Arc<Dataset>> {
        let key = CacheKey::for_path(path)?;
        let parser = &self.parser;
        let entries = &mut self.entries;
        Self::lookup_or_insert(entries, key, |path| parser.load_transactions(path))
    }

    /// Like [`Self::get_or_load`] with a caller-supplied key and loader.
    pub fn get_or_insert_with<F>(&mut self, key: CacheKey, loader: F) -> Result<Arc<Dataset>>
    where
        F: FnOnce(&Path) -> Result<Dataset>,
    {
        Self::lookup_or_insert(&mut self.entries, key, loader)
    }

    fn lookup_or_insert<F>(
        entries: &mut HashMap<PathBuf, (FileSignature, Arc<Dataset>)>,
        key: CacheKey,
        loader: F,
    ) -> Result<Arc<Dataset>>
    where
        F: FnOnce(&Path) -> Result<Dataset>,
    {
        if let Some((signature, dataset)) = entries.get(&key.path) {
            if *signature == key.signature {
                tracing::debug!(path = %key.path.display(), "Dataset cache hit");
                return Ok(Arc::clone(dataset));
            }
            tracing::debug!(path = %key.path.display(), "Source changed, reloading dataset");
        } else {
            tracing::debug!(path = %key.path.display(), "Dataset cache miss");
        }

        let dataset = Arc::new(loader(&key.path)?);
        entries.insert(key.path, (key.signature, Arc::clone(&dataset)));
        Ok(dataset)
    }

    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> bool {
        self.entries.remove(path.as_ref()).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(BrazilianCsvParser::default())
    }
}
