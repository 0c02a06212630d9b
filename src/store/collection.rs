use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

use super::error::{StoreError, StoreResult};

/// One JSON file holding every document of a record kind, keyed by id.
pub(crate) struct Collection<T> {
    name: &'static str,
    path: PathBuf,
    _doc: PhantomData<T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(root: &Path, name: &'static str) -> Self {
        Self {
            name,
            path: root.join(format!("{name}.json")),
            _doc: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn load(&self) -> StoreResult<BTreeMap<String, T>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Serialization {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, docs: &BTreeMap<String, T>) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(docs).map_err(|source| StoreError::Serialization {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, bytes).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        trace!(collection = self.name, documents = docs.len(), "collection saved");
        Ok(())
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<T>> {
        Ok(self.load()?.remove(id))
    }

    /// Writes `doc` under `id`, replacing any existing document.
    pub fn put(&self, id: &str, doc: T) -> StoreResult<()> {
        let mut docs = self.load()?;
        docs.insert(id.to_string(), doc);
        self.save(&docs)
    }

    /// Modifies an existing document in place.
    pub fn update(&self, id: &str, f: impl FnOnce(&mut T)) -> StoreResult<()> {
        let mut docs = self.load()?;
        let doc = docs.get_mut(id).ok_or_else(|| StoreError::NotFound {
            collection: self.name,
            id: id.to_string(),
        })?;
        f(doc);
        self.save(&docs)
    }

    /// Removing an absent document is not an error.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let mut docs = self.load()?;
        if docs.remove(id).is_some() {
            self.save(&docs)?;
        }
        Ok(())
    }

    pub fn query(&self, mut pred: impl FnMut(&T) -> bool) -> StoreResult<Vec<T>> {
        Ok(self.load()?.into_values().filter(|d| pred(d)).collect())
    }
}
