//! Session cookie storage
//!
//! The request helpers only ever read a cookie or delete one. Writing is
//! left to whoever owns the store (a login flow, a test, the CLI seeding
//! a jar file).

use crate::error::{CopsError, Result};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Read/remove access to named session cookies
pub trait CookieStore {
    /// Value of the cookie, if set
    fn get(&self, name: &str) -> Option<String>;

    /// Delete the cookie. Removing a cookie that is not set is not an error.
    fn remove(&mut self, name: &str) -> Result<()>;
}

/// In-memory cookie store
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieStore {
    cookies: BTreeMap<String, String>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.cookies.remove(name);
        Ok(())
    }
}

/// Cookie store persisted as a flat JSON object (`{"name": "value"}`).
///
/// Every removal is written back to disk immediately.
#[derive(Debug)]
pub struct FileCookieStore {
    path: PathBuf,
    cookies: MemoryCookieStore,
}

impl FileCookieStore {
    /// Default jar location: `<config dir>/cops/cookies.json`
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("cops").join("cookies.json"))
            .ok_or_else(|| CopsError::Config("Cannot determine config directory".to_string()))
    }

    /// Load the jar at `path`. A missing file is an empty jar.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut cookies = MemoryCookieStore::new();

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if !content.trim().is_empty() {
                let parsed: BTreeMap<String, String> =
                    serde_json::from_str(&content).map_err(|e| {
                        CopsError::CookieStore(format!("Malformed cookie jar {:?}: {}", path, e))
                    })?;
                cookies.cookies = parsed;
            }
        } else {
            log::debug!("Cookie jar {:?} does not exist, starting empty", path);
        }

        Ok(Self { path, cookies })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set a cookie and persist the jar
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.cookies.insert(name, value);
        self.save()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter()
    }

    /// Write the jar atomically next to its final location
    pub fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, &self.cookies.cookies)?;
        file.write_all(b"\n")?;
        file.persist(&self.path)
            .map_err(|e| CopsError::CookieStore(format!("Cannot write {:?}: {}", self.path, e)))?;
        Ok(())
    }
}

impl CookieStore for FileCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name)
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        if self.cookies.get(name).is_none() {
            return Ok(());
        }
        self.cookies.remove(name)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::{CookieStore, FileCookieStore, MemoryCookieStore};
    use crate::error::CopsError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn memory_store_get_and_remove() {
        let mut store = MemoryCookieStore::new();
        store.insert("url", "http://api.test");
        assert_eq!(store.get("url"), Some("http://api.test".to_string()));

        store.remove("url").expect("remove");
        assert_eq!(store.get("url"), None);
        store.remove("url").expect("removing twice is fine");
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let temp = tempdir().expect("tempdir");
        let store = FileCookieStore::open(temp.path().join("absent.json")).expect("open");
        assert_eq!(store.get("url"), None);
        assert_eq!(store.iter().count(), 0);
    }

    #[test]
    fn file_store_persists_removal() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("cookies.json");
        fs::write(&path, r#"{"url": "http://api.test", "session": "abc"}"#).expect("seed");

        let mut store = FileCookieStore::open(&path).expect("open");
        assert_eq!(store.get("url"), Some("http://api.test".to_string()));
        store.remove("url").expect("remove");

        let reopened = FileCookieStore::open(&path).expect("reopen");
        assert_eq!(reopened.get("url"), None);
        assert_eq!(reopened.get("session"), Some("abc".to_string()));
    }

    #[test]
    fn file_store_insert_creates_parent_dirs() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("cookies.json");
        let mut store = FileCookieStore::open(&path).expect("open");
        store.insert("url", "http://api.test").expect("insert");
        assert!(path.exists());
    }

    #[test]
    fn file_store_rejects_malformed_json() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("cookies.json");
        fs::write(&path, "not json").expect("seed");
        let err = FileCookieStore::open(&path).expect_err("malformed");
        assert!(matches!(err, CopsError::CookieStore(_)));
    }
}
