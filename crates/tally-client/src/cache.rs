use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tally_core::Slug;
use tracing::warn;

/// Last known liked-state per slug, used to render before the server answers.
///
/// Entries are hints. A widget overwrites them with every server response.
pub trait LikeCache: Send + Sync {
    fn liked(&self, slug: &Slug) -> Option<bool>;
    fn store(&self, slug: &Slug, liked: bool);
}

/// Slugs whose view was already counted in the current session.
pub trait SessionViews: Send + Sync {
    fn is_counted(&self, slug: &Slug) -> bool;
    fn mark_counted(&self, slug: &Slug);
}

#[derive(Debug, Default)]
pub struct MemoryLikeCache {
    entries: Mutex<HashMap<Slug, bool>>,
}

impl MemoryLikeCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LikeCache for MemoryLikeCache {
    fn liked(&self, slug: &Slug) -> Option<bool> {
        self.entries.lock().get(slug).copied()
    }

    fn store(&self, slug: &Slug, liked: bool) {
        self.entries.lock().insert(slug.clone(), liked);
    }
}

/// A [`LikeCache`] persisted as a JSON document, surviving restarts.
///
/// The document is replaced through a temporary file and a rename, so a
/// reader never sees a partial write.
///
/// An unreadable document starts the cache empty, and a failed write only
/// logs a warning: the cache is never allowed to fail a widget.
#[derive(Debug)]
pub struct FileLikeCache {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, bool>>,
}

impl FileLikeCache {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn load(path: &Path) -> BTreeMap<String, bool> {
        let Ok(raw) = std::fs::read(path) else {
            return BTreeMap::new();
        };
        serde_json::from_slice(&raw).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring unreadable like cache");
            BTreeMap::new()
        })
    }

    fn persist(&self, entries: &BTreeMap<String, bool>) {
        let result = serde_json::to_vec(entries)
            .map_err(std::io::Error::other)
            .and_then(|json| {
                if let Some(dir) = self.path.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                let tmp = self.path.with_extension("json.tmp");
                std::fs::write(&tmp, json)?;
                std::fs::rename(&tmp, &self.path)
            });

        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "failed to persist like cache");
        }
    }
}

impl LikeCache for FileLikeCache {
    fn liked(&self, slug: &Slug) -> Option<bool> {
        self.entries.lock().get(slug.as_str()).copied()
    }

    fn store(&self, slug: &Slug, liked: bool) {
        let mut entries = self.entries.lock();
        if entries.get(slug.as_str()) == Some(&liked) {
            return;
        }
        entries.insert(slug.as_str().to_owned(), liked);
        self.persist(&entries);
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionViews {
    counted: Mutex<HashSet<Slug>>,
}

impl MemorySessionViews {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionViews for MemorySessionViews {
    fn is_counted(&self, slug: &Slug) -> bool {
        self.counted.lock().contains(slug)
    }

    fn mark_counted(&self, slug: &Slug) {
        self.counted.lock().insert(slug.clone());
    }
}

impl<T: LikeCache + ?Sized> LikeCache for std::sync::Arc<T> {
    fn liked(&self, slug: &Slug) -> Option<bool> {
        (**self).liked(slug)
    }

    fn store(&self, slug: &Slug, liked: bool) {
        (**self).store(slug, liked)
    }
}

impl<T: SessionViews + ?Sized> SessionViews for std::sync::Arc<T> {
    fn is_counted(&self, slug: &Slug) -> bool {
        (**self).is_counted(slug)
    }

    fn mark_counted(&self, slug: &Slug) {
        (**self).mark_counted(slug)
    }
}
