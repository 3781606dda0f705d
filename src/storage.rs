//! Object storage seam for the run adapter.
//!
//! The adapter receives an [`ObjectStore`] at construction time; nothing in
//! the crate keeps a process-wide storage handle.

use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Component, Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result, anyhow, bail};

/// A bucket-qualified object key such as `input/acme/export.csv`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Same bucket, different key.
    pub fn sibling(&self, key: impl Into<String>) -> Self {
        Self::new(self.bucket.clone(), key)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

pub trait ObjectStore: Send + Sync {
    fn get(&self, object: &ObjectRef) -> Result<Vec<u8>>;
    fn put(&self, object: &ObjectRef, bytes: &[u8]) -> Result<()>;
    /// Human-readable location reported back to callers.
    fn locate(&self, object: &ObjectRef) -> String;
}

/// Filesystem store laid out as `root/bucket/key`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, object: &ObjectRef) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for part in [object.bucket.as_str(), object.key.as_str()] {
            let relative = Path::new(part);
            if part.is_empty() {
                bail!("Object reference {object} has an empty segment");
            }
            for component in relative.components() {
                match component {
                    Component::Normal(segment) => path.push(segment),
                    Component::CurDir => {}
                    _ => bail!("Object reference {object} escapes the store root"),
                }
            }
        }
        Ok(path)
    }
}

impl ObjectStore for LocalStore {
    fn get(&self, object: &ObjectRef) -> Result<Vec<u8>> {
        let path = self.resolve(object)?;
        fs::read(&path).with_context(|| format!("Reading object {object} from {path:?}"))
    }

    fn put(&self, object: &ObjectRef, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(object)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating directory {parent:?}"))?;
        }
        fs::write(&path, bytes).with_context(|| format!("Writing object {object} to {path:?}"))
    }

    fn locate(&self, object: &ObjectRef) -> String {
        match self.resolve(object) {
            Ok(path) => path.display().to_string(),
            Err(_) => object.to_string(),
        }
    }
}

/// In-process store, handy for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<ObjectRef, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, object: ObjectRef, bytes: impl Into<Vec<u8>>) {
        if let Ok(mut objects) = self.objects.lock() {
            objects.insert(object, bytes.into());
        }
    }

    pub fn contains(&self, object: &ObjectRef) -> bool {
        self.objects
            .lock()
            .map(|objects| objects.contains_key(object))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, object: &ObjectRef) -> Result<Vec<u8>> {
        let objects = self
            .objects
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        objects
            .get(object)
            .cloned()
            .ok_or_else(|| anyhow!("Object {object} not found"))
    }

    fn put(&self, object: &ObjectRef, bytes: &[u8]) -> Result<()> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        objects.insert(object.clone(), bytes.to_vec());
        Ok(())
    }

    fn locate(&self, object: &ObjectRef) -> String {
        format!("memory://{object}")
    }
}
