//! Offline cache for verse data and rendered melodies.
//!
//! The cache root (`<cache_dir>/singverse`) holds:
//! - `data/kjv.json` and `data/manifest.json`: the normalized verse data and
//!   where it came from
//! - `renders/<hash>.cache/`: content-addressed render outputs keyed by
//!   melody seeds, settings, tempo, volume, format, and backend version
//! - `state.json`: the reader's last position

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use singverse_bible::BibleData;
use singverse_melody::{MelodySettings, RenderResult};
use std::fs;
use std::path::{Path, PathBuf};

const DATA_FILE: &str = "kjv.json";
const MANIFEST_FILE: &str = "manifest.json";

/// Provenance of the cached verse data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataManifest {
    /// URL the raw source was fetched from
    pub source_url: String,
    /// Timestamp when the data was stored
    pub fetched_at: String,
    /// BLAKE3 hash of the stored `kjv.json`
    pub hash: String,
    pub book_count: usize,
    pub verse_count: usize,
}

/// Cache key components for render lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderKey {
    /// Melody seed of each rendered verse, in order
    pub seeds: Vec<u32>,
    pub settings: MelodySettings,
    pub tempo: f64,
    pub volume: f64,
    /// Output format ("wav" or "midi")
    pub format: String,
    pub sample_rate: u32,
    /// Backend version string
    pub backend_version: String,
}

impl RenderKey {
    /// Compute the cache entry hash (deterministic cache directory name)
    pub fn compute_hash(&self) -> String {
        let seeds: Vec<String> = self.seeds.iter().map(|s| s.to_string()).collect();
        let canonical = format!(
            "seeds:{},settings:{},tempo:{},volume:{},format:{},rate:{},backend:{}",
            seeds.join("-"),
            self.settings.seed_json(),
            self.tempo,
            self.volume,
            self.format,
            self.sample_rate,
            self.backend_version
        );
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }
}

/// Manifest stored alongside a cached render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderManifest {
    pub key: RenderKey,
    /// Timestamp when this entry was created
    pub created_at: String,
    /// Output file name within the entry
    pub file: String,
    /// BLAKE3 hash of the output file
    pub hash: String,
}

/// Cached render output.
#[derive(Debug, Clone)]
pub struct CachedRender {
    pub data: Vec<u8>,
    pub hash: String,
}

/// Cache manager for the verse data store and render cache
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Create a new cache manager using the default XDG cache directory
    pub fn new() -> Result<Self> {
        let cache_dir = Self::default_cache_dir().context("Failed to determine cache directory")?;
        Ok(Self { cache_dir })
    }

    /// Create a cache manager rooted at `cache_dir`
    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Get the default cache directory (XDG-compatible)
    pub fn default_cache_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|d| d.join("singverse"))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn data_dir(&self) -> PathBuf {
        self.cache_dir.join("data")
    }

    fn renders_dir(&self) -> PathBuf {
        self.cache_dir.join("renders")
    }

    /// Path of the cached normalized verse data
    pub fn data_path(&self) -> PathBuf {
        self.data_dir().join(DATA_FILE)
    }

    /// Path of the reader state file
    pub fn state_path(&self) -> PathBuf {
        self.cache_dir.join("state.json")
    }

    /// Check if verse data is cached
    pub fn has_data(&self) -> bool {
        self.data_path().exists()
    }

    /// Read the cached verse data (returns None if nothing is cached)
    pub fn read_data(&self) -> Result<Option<BibleData>> {
        let path = self.data_path();
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cached data: {}", path.display()))?;
        let data = BibleData::from_json(&json)
            .with_context(|| format!("Failed to parse cached data: {}", path.display()))?;
        Ok(Some(data))
    }

    /// Read the cached data manifest, if any
    pub fn data_manifest(&self) -> Result<Option<DataManifest>> {
        let path = self.data_dir().join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path).context("Failed to read data manifest")?;
        let manifest = serde_json::from_str(&json).context("Failed to parse data manifest")?;
        Ok(Some(manifest))
    }

    /// Store normalized verse data and its manifest
    pub fn store_data(&self, data: &BibleData, source_url: &str) -> Result<DataManifest> {
        let data_dir = self.data_dir();
        fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create data directory: {}", data_dir.display())
        })?;

        let json = data.to_json().context("Failed to serialize verse data")?;
        fs::write(self.data_path(), &json).context("Failed to write cached data")?;

        let manifest = DataManifest {
            source_url: source_url.to_string(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
            hash: blake3::hash(json.as_bytes()).to_hex().to_string(),
            book_count: data.books.len(),
            verse_count: data.verse_count(),
        };
        let manifest_json = serde_json::to_string_pretty(&manifest)
            .context("Failed to serialize data manifest")?;
        fs::write(data_dir.join(MANIFEST_FILE), manifest_json)
            .context("Failed to write data manifest")?;

        Ok(manifest)
    }

    /// Get the path to a render cache entry directory
    pub fn entry_path(&self, key: &RenderKey) -> PathBuf {
        let hash = key.compute_hash();
        self.renders_dir().join(format!("{}.cache", hash))
    }

    /// Retrieve a cached render (returns None on cache miss)
    pub fn get_render(&self, key: &RenderKey) -> Result<Option<CachedRender>> {
        let entry_path = self.entry_path(key);
        let manifest_path = entry_path.join(MANIFEST_FILE);

        if !manifest_path.exists() {
            return Ok(None);
        }

        let manifest_json =
            fs::read_to_string(&manifest_path).context("Failed to read cache manifest")?;
        let manifest: RenderManifest =
            serde_json::from_str(&manifest_json).context("Failed to parse cache manifest")?;

        let file = entry_path.join(&manifest.file);
        let data = fs::read(&file)
            .with_context(|| format!("Failed to read cached file: {}", file.display()))?;

        if blake3::hash(&data).to_hex().as_str() != manifest.hash {
            tracing::warn!(entry = %entry_path.display(), "cached render is corrupt, ignoring");
            return Ok(None);
        }

        Ok(Some(CachedRender {
            data,
            hash: manifest.hash,
        }))
    }

    /// Store a render in the cache
    pub fn put_render(&self, key: &RenderKey, result: &RenderResult) -> Result<()> {
        let entry_path = self.entry_path(key);

        fs::create_dir_all(&entry_path).with_context(|| {
            format!(
                "Failed to create cache entry directory: {}",
                entry_path.display()
            )
        })?;

        let file = format!("output.{}", result.extension);
        fs::write(entry_path.join(&file), &result.data)
            .context("Failed to write cached render")?;

        let manifest = RenderManifest {
            key: key.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
            file,
            hash: result.hash.clone(),
        };
        let manifest_json = serde_json::to_string_pretty(&manifest)
            .context("Failed to serialize cache manifest")?;
        fs::write(entry_path.join(MANIFEST_FILE), manifest_json)
            .context("Failed to write cache manifest")?;

        Ok(())
    }

    /// Clear all render entries, and the cached verse data when `include_data`
    /// is set. Returns the number of render entries removed.
    pub fn clear(&self, include_data: bool) -> Result<u64> {
        if include_data {
            let data_dir = self.data_dir();
            if data_dir.exists() {
                fs::remove_dir_all(&data_dir).with_context(|| {
                    format!("Failed to remove data directory: {}", data_dir.display())
                })?;
            }
        }

        let renders_dir = self.renders_dir();
        if !renders_dir.exists() {
            return Ok(0);
        }

        let mut count = 0u64;
        for entry in fs::read_dir(&renders_dir).context("Failed to read cache directory")? {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_dir() && path.extension().and_then(|s| s.to_str()) == Some("cache") {
                fs::remove_dir_all(&path)
                    .with_context(|| format!("Failed to remove cache entry: {}", path.display()))?;
                count += 1;
            }
        }

        Ok(count)
    }

    /// Get cache info (render entries, sizes, data provenance)
    pub fn info(&self) -> Result<CacheInfo> {
        let mut entry_count = 0u64;
        let mut total_size_bytes = 0u64;

        let renders_dir = self.renders_dir();
        if renders_dir.exists() {
            for entry in fs::read_dir(&renders_dir).context("Failed to read cache directory")? {
                let entry = entry.context("Failed to read directory entry")?;
                let path = entry.path();

                if path.is_dir() && path.extension().and_then(|s| s.to_str()) == Some("cache") {
                    entry_count += 1;
                    total_size_bytes += Self::dir_size(&path)?;
                }
            }
        }

        let data_dir = self.data_dir();
        let data_size_bytes = if data_dir.exists() {
            Self::dir_size(&data_dir)?
        } else {
            0
        };

        Ok(CacheInfo {
            cache_dir: self.cache_dir.clone(),
            entry_count,
            total_size_bytes,
            data_size_bytes,
            data: self.data_manifest()?,
        })
    }

    /// Compute total size of a directory (recursive)
    fn dir_size(path: &Path) -> Result<u64> {
        let mut total = 0u64;

        for entry in walkdir::WalkDir::new(path) {
            let entry = entry.context("Failed to walk directory")?;
            if entry.file_type().is_file() {
                total += entry.metadata()?.len();
            }
        }

        Ok(total)
    }
}

/// Cache information
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfo {
    /// Cache directory path
    pub cache_dir: PathBuf,
    /// Number of render cache entries
    pub entry_count: u64,
    /// Total size of render entries in bytes
    pub total_size_bytes: u64,
    /// Size of the cached verse data in bytes
    pub data_size_bytes: u64,
    /// Provenance of the cached verse data
    pub data: Option<DataManifest>,
}
