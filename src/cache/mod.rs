use anyhow::{Context, Result};
use log::info;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// File-based cache of raw Challonge responses, one directory per edition.
/// Keeping the full raw JSON means an edition can be re-ingested after a
/// schema or roster change without touching the API again.
pub struct Cache {
    cache_dir: PathBuf,
}

impl Cache {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

        Ok(Self { cache_dir })
    }

    pub fn save_participants(&self, edition: u32, data: &Value) -> Result<()> {
        self.write_json(&self.participants_path(edition), data)
    }

    pub fn load_participants(&self, edition: u32) -> Result<Option<Value>> {
        self.read_json_opt(&self.participants_path(edition))
    }

    pub fn save_matches(&self, edition: u32, data: &Value) -> Result<()> {
        self.write_json(&self.matches_path(edition), data)
    }

    pub fn load_matches(&self, edition: u32) -> Result<Option<Value>> {
        self.read_json_opt(&self.matches_path(edition))
    }

    pub fn has_edition(&self, edition: u32) -> bool {
        self.participants_path(edition).exists() && self.matches_path(edition).exists()
    }

    // --- Helper Methods ---

    fn edition_dir(&self, edition: u32) -> PathBuf {
        self.cache_dir.join(format!("cup{}", edition))
    }

    fn participants_path(&self, edition: u32) -> PathBuf {
        self.edition_dir(edition).join("participants.json")
    }

    fn matches_path(&self, edition: u32) -> PathBuf {
        self.edition_dir(edition).join("matches.json")
    }

    fn write_json(&self, path: &Path, data: &Value) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create edition cache directory")?;
        }

        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json).context("Failed to write cache file")?;

        info!("Saved raw data to cache: {}", path.display());
        Ok(())
    }

    fn read_json_opt(&self, path: &Path) -> Result<Option<Value>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path).context("Failed to read cache file")?;
        let data = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse JSON from {:?}", path))?;

        Ok(Some(data))
    }
}
