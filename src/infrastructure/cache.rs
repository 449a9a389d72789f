//! # File Cache
//!
//! JSON files in the data directory backing the `Store` trait:
//! `cache.json` for commands and `secrets.json` for channel credentials.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::traits::Store;
use crate::domain::types::{CommandSet, Secrets};

const CACHE_FILE: &str = "cache.json";
const SECRETS_FILE: &str = "secrets.json";

pub struct FsCache {
    dir: PathBuf,
}

impl FsCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn cache_path(&self) -> PathBuf {
        self.dir.join(CACHE_FILE)
    }

    fn secrets_path(&self) -> PathBuf {
        self.dir.join(SECRETS_FILE)
    }
}

/// Reads `path` as JSON, or returns the default when the file does not exist.
fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

impl Store for FsCache {
    fn load(&self) -> Result<CommandSet> {
        read_json(&self.cache_path())
    }

    fn save(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let path = self.cache_path();
        let mut cache: serde_json::Map<String, serde_json::Value> = read_json(&path)?;
        cache.insert(key.to_string(), value);
        write_json(&path, &cache)
    }

    fn save_all(&self, doc: &CommandSet) -> Result<()> {
        write_json(&self.cache_path(), doc)
    }

    fn read_all(&self, path: &Path) -> Result<CommandSet> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("{} is not a commands document", path.display()))
    }

    fn write_all(&self, path: &Path, doc: &CommandSet) -> Result<()> {
        write_json(path, doc)
    }

    fn secrets(&self) -> Result<Secrets> {
        read_json(&self.secrets_path())
    }

    fn save_secret(&self, secrets: &Secrets) -> Result<()> {
        write_json(&self.secrets_path(), secrets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::Configuration;
    use crate::domain::types::Command;

    #[test]
    fn test_empty_dir_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path().join("nested"));
        assert!(cache.load().unwrap().commands.is_empty());
        assert!(cache.secrets().unwrap().config.is_none());
    }

    #[test]
    fn test_save_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path().join("nested"));
        cache.save("theme", serde_json::json!("dark")).unwrap();
        cache
            .save("commands", serde_json::to_value(vec![Command::text("a", "", "1")]).unwrap())
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(cache.cache_path()).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(cache.load().unwrap().commands.len(), 1);
    }

    #[test]
    fn test_secrets_round_trip_uses_short_names() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path());
        let config = Configuration {
            channel_name: "scanf".into(),
            bot_username: "awesomo".into(),
            oauth_token: "oauth:abc".into(),
            auto_connect: true,
        };
        cache
            .save_secret(&Secrets {
                config: Some(config.clone()),
            })
            .unwrap();

        let raw = fs::read_to_string(cache.secrets_path()).unwrap();
        assert!(raw.contains("\"autoConnect\": true"));
        assert_eq!(cache.secrets().unwrap().config, Some(config));
    }

    #[test]
    fn test_read_all_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();
        let cache = FsCache::new(dir.path());
        assert!(cache.read_all(&path).is_err());
        assert!(cache.read_all(&dir.path().join("missing.json")).is_err());
    }
}
