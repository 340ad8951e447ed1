//! Verse data acquisition.
//!
//! Data is read cache-first: a download happens only when nothing is cached
//! or a refresh is requested, and a failed download falls back to the cached
//! copy. Downloads run in-process over HTTP and retry through the system
//! `curl` when that fails.

use anyhow::{bail, Context, Result};
use singverse_bible::{normalize, validate_bible, BibleData, ValidationWarning};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::cache::{CacheManager, DataManifest};
use crate::config::Config;

/// Fetches the raw source text for a URL.
pub trait Downloader {
    fn download(&self, url: &str) -> Result<String>;
}

/// Request timeout for in-process downloads.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Downloads in-process with a blocking `reqwest` client.
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("singverse/", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str) -> Result<String> {
        tracing::info!(url, "downloading verse source");
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to request {}", url))?
            .error_for_status()
            .with_context(|| format!("download of {} failed", url))?;
        response
            .text()
            .with_context(|| format!("Failed to read response body from {}", url))
    }
}

/// Tries `primary`, then `fallback` when the first attempt fails or returns
/// an empty body.
pub struct FallbackDownloader<P, F> {
    primary: P,
    fallback: F,
}

impl<P: Downloader, F: Downloader> FallbackDownloader<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: Downloader, F: Downloader> Downloader for FallbackDownloader<P, F> {
    fn download(&self, url: &str) -> Result<String> {
        let first_error = match self.primary.download(url) {
            Ok(text) if !text.is_empty() => return Ok(text),
            Ok(_) => anyhow::anyhow!("empty response from {}", url),
            Err(err) => err,
        };
        tracing::warn!(
            error = %format!("{:#}", first_error),
            "download failed, retrying with fallback"
        );
        self.fallback
            .download(url)
            .with_context(|| format!("first attempt also failed: {:#}", first_error))
    }
}

/// The downloader the CLI uses: HTTP first, `curl` second.
pub fn default_downloader() -> Box<dyn Downloader> {
    match HttpDownloader::new() {
        Ok(http) => Box::new(FallbackDownloader::new(http, CurlDownloader)),
        Err(err) => {
            tracing::warn!(error = %format!("{:#}", err), "HTTP client unavailable, using curl");
            Box::new(CurlDownloader)
        }
    }
}

/// Downloads with the system `curl`.
pub struct CurlDownloader;

impl CurlDownloader {
    fn find_curl() -> Result<PathBuf> {
        let names = if cfg!(windows) {
            vec!["curl.exe", "curl"]
        } else {
            vec!["curl"]
        };
        for name in names {
            if let Ok(path) = which::which(name) {
                return Ok(path);
            }
        }
        bail!("curl not found in PATH")
    }
}

impl Downloader for CurlDownloader {
    fn download(&self, url: &str) -> Result<String> {
        let curl = Self::find_curl()?;
        tracing::info!(url, curl = %curl.display(), "downloading verse source with curl");

        let output = Command::new(&curl)
            .args(["-L", "--fail", "--silent", "--show-error", url])
            .output()
            .with_context(|| format!("Failed to run {}", curl.display()))?;

        if !output.status.success() {
            bail!(
                "download of {} failed ({}): {}",
                url,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        String::from_utf8(output.stdout).context("Downloaded source is not valid UTF-8")
    }
}

/// Where loaded data came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOrigin {
    /// Freshly downloaded and stored in the cache.
    Downloaded,
    /// Read from the cache without touching the network.
    Cache,
    /// Download failed; the cached copy was used instead.
    CacheFallback,
    /// Read from a configured file.
    File(PathBuf),
}

/// Result of [`fetch`].
#[derive(Debug)]
pub struct FetchOutcome {
    pub data: BibleData,
    pub origin: DataOrigin,
    pub manifest: Option<DataManifest>,
    pub warnings: Vec<ValidationWarning>,
}

/// Normalizes and validates raw scrollmapper JSON.
///
/// Fails if validation reports errors; warnings are returned.
pub fn ingest(raw_json: &str) -> Result<(BibleData, Vec<ValidationWarning>)> {
    let data = normalize::normalize_json(raw_json).context("Failed to parse raw verse source")?;
    let (data, warnings) = check(data)?;
    tracing::debug!(
        books = data.books.len(),
        warnings = warnings.len(),
        "normalized verse source"
    );
    Ok((data, warnings))
}

fn check(data: BibleData) -> Result<(BibleData, Vec<ValidationWarning>)> {
    match validate_bible(&data).into_result() {
        Ok(warnings) => Ok((data, warnings)),
        Err(errors) => {
            let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            bail!(
                "verse data failed validation with {} error(s):\n  {}",
                errors.len(),
                details.join("\n  ")
            )
        }
    }
}

/// Makes verse data available in the cache, downloading when needed.
pub fn fetch(
    cache_mgr: &CacheManager,
    url: &str,
    refresh: bool,
    downloader: &dyn Downloader,
) -> Result<FetchOutcome> {
    if !refresh {
        if let Some(data) = cache_mgr.read_data()? {
            tracing::debug!(path = %cache_mgr.data_path().display(), "verse data cache hit");
            return Ok(FetchOutcome {
                data,
                origin: DataOrigin::Cache,
                manifest: cache_mgr.data_manifest()?,
                warnings: Vec::new(),
            });
        }
    }

    match downloader.download(url) {
        Ok(raw) => {
            let (data, warnings) = ingest(&raw)?;
            let manifest = cache_mgr.store_data(&data, url)?;
            tracing::info!(hash = %manifest.hash, "stored verse data");
            Ok(FetchOutcome {
                data,
                origin: DataOrigin::Downloaded,
                manifest: Some(manifest),
                warnings,
            })
        }
        Err(err) => match cache_mgr.read_data()? {
            Some(data) => {
                tracing::warn!(error = %err, "download failed, using cached verse data");
                Ok(FetchOutcome {
                    data,
                    origin: DataOrigin::CacheFallback,
                    manifest: cache_mgr.data_manifest()?,
                    warnings: Vec::new(),
                })
            }
            None => Err(err.context("no cached verse data to fall back on")),
        },
    }
}

/// Reads normalized verse data from a file and validates it.
pub fn read_data_file(path: &Path) -> Result<BibleData> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read verse data: {}", path.display()))?;
    let data = BibleData::from_json(&json)
        .with_context(|| format!("Failed to parse verse data: {}", path.display()))?;
    let (data, warnings) = check(data)?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    Ok(data)
}

/// Loads the verse data the reader should use.
///
/// A configured `data_path` wins; otherwise the cache is used, downloading
/// on first use.
pub fn load_bible(
    config: &Config,
    cache_mgr: &CacheManager,
    downloader: &dyn Downloader,
) -> Result<BibleData> {
    if let Some(path) = &config.data_path {
        return read_data_file(path);
    }
    Ok(fetch(cache_mgr, &config.source_url, false, downloader)?.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    const RAW: &str = r#"{"books": [
        {"name": "Genesis", "chapters": [{"verses": [
            {"verse": 1, "text": "In the beginning God created the heaven and the earth."}
        ]}]},
        {"name": "1 John", "chapters": [{"verses": [
            {"verse": 1, "text": "That which was from the beginning"}
        ]}]}
    ]}"#;

    struct StubDownloader {
        body: Option<&'static str>,
        calls: Cell<u32>,
    }

    impl StubDownloader {
        fn ok(body: &'static str) -> Self {
            Self {
                body: Some(body),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                body: None,
                calls: Cell::new(0),
            }
        }
    }

    impl Downloader for StubDownloader {
        fn download(&self, _url: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            match self.body {
                Some(body) => Ok(body.to_string()),
                None => bail!("network unreachable"),
            }
        }
    }

    #[test]
    fn test_fallback_used_when_primary_fails() {
        let chain = FallbackDownloader::new(StubDownloader::failing(), StubDownloader::ok(RAW));
        assert_eq!(chain.download("u").unwrap(), RAW);
        assert_eq!(chain.primary.calls.get(), 1);
        assert_eq!(chain.fallback.calls.get(), 1);
    }

    #[test]
    fn test_fallback_skipped_when_primary_succeeds() {
        let chain = FallbackDownloader::new(StubDownloader::ok(RAW), StubDownloader::failing());
        assert_eq!(chain.download("u").unwrap(), RAW);
        assert_eq!(chain.fallback.calls.get(), 0);
    }

    #[test]
    fn test_fallback_used_on_empty_body() {
        let chain = FallbackDownloader::new(StubDownloader::ok(""), StubDownloader::ok(RAW));
        assert_eq!(chain.download("u").unwrap(), RAW);
        assert_eq!(chain.fallback.calls.get(), 1);
    }

    #[test]
    fn test_chain_fails_when_both_fail() {
        let tmp = TempDir::new().unwrap();
        let cache_mgr = CacheManager::with_dir(tmp.path());
        let chain =
            FallbackDownloader::new(StubDownloader::failing(), StubDownloader::failing());

        let err = chain.download("u").unwrap_err();
        assert!(format!("{:#}", err).contains("first attempt also failed"));
        assert!(fetch(&cache_mgr, "u", false, &chain).is_err());

        let recovered =
            FallbackDownloader::new(StubDownloader::failing(), StubDownloader::ok(RAW));
        let outcome = fetch(&cache_mgr, "u", false, &recovered).unwrap();
        assert_eq!(outcome.origin, DataOrigin::Downloaded);
    }

    #[test]
    fn test_ingest_normalizes() {
        let (data, warnings) = ingest(RAW).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(data.order, vec!["genesis".to_string(), "1-john".to_string()]);
    }

    #[test]
    fn test_ingest_rejects_invalid_data() {
        assert!(ingest(r#"{"books": []}"#).is_err());
        assert!(ingest("<html>").is_err());
    }

    #[test]
    fn test_fetch_is_cache_first() {
        let tmp = TempDir::new().unwrap();
        let cache_mgr = CacheManager::with_dir(tmp.path());
        let downloader = StubDownloader::ok(RAW);

        let first = fetch(&cache_mgr, "u", false, &downloader).unwrap();
        assert_eq!(first.origin, DataOrigin::Downloaded);
        assert_eq!(downloader.calls.get(), 1);

        let second = fetch(&cache_mgr, "u", false, &downloader).unwrap();
        assert_eq!(second.origin, DataOrigin::Cache);
        assert_eq!(second.data, first.data);
        assert_eq!(downloader.calls.get(), 1);

        let refreshed = fetch(&cache_mgr, "u", true, &downloader).unwrap();
        assert_eq!(refreshed.origin, DataOrigin::Downloaded);
        assert_eq!(downloader.calls.get(), 2);
    }

    #[test]
    fn test_failed_download_falls_back_to_cache() {
        let tmp = TempDir::new().unwrap();
        let cache_mgr = CacheManager::with_dir(tmp.path());

        assert!(fetch(&cache_mgr, "u", false, &StubDownloader::failing()).is_err());

        fetch(&cache_mgr, "u", false, &StubDownloader::ok(RAW)).unwrap();
        let outcome = fetch(&cache_mgr, "u", true, &StubDownloader::failing()).unwrap();
        assert_eq!(outcome.origin, DataOrigin::CacheFallback);
        assert_eq!(outcome.data.books.len(), 2);
    }

    #[test]
    fn test_load_prefers_configured_file() {
        let tmp = TempDir::new().unwrap();
        let (data, _) = ingest(RAW).unwrap();
        let path = tmp.path().join("kjv.json");
        fs::write(&path, data.to_json().unwrap()).unwrap();

        let config = Config {
            data_path: Some(path),
            ..Config::default()
        };
        let cache_mgr = CacheManager::with_dir(tmp.path().join("cache"));
        let downloader = StubDownloader::failing();
        assert_eq!(load_bible(&config, &cache_mgr, &downloader).unwrap(), data);
        assert_eq!(downloader.calls.get(), 0);
    }
}
