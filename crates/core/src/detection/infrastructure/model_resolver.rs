use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{DEFAULT_WEIGHTS, PRETRAINED_WEIGHTS};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unknown pretrained weights '{name}', known: {}", .known.join(", "))]
    UnknownWeights {
        name: String,
        known: Vec<&'static str>,
    },
    #[error("weights file not found: {0}")]
    WeightsNotFound(PathBuf),
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write weights to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Where detection weights come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WeightsSource {
    /// A weights file already on disk.
    Path(PathBuf),
    /// A published pretrained weights name, fetched through the local cache.
    Named(String),
}

impl WeightsSource {
    /// Interpret a raw configuration value: known pretrained names stay
    /// names, anything else is treated as a filesystem path.
    pub fn parse(raw: &str) -> Self {
        if PRETRAINED_WEIGHTS.iter().any(|(name, _, _)| *name == raw) {
            WeightsSource::Named(raw.to_string())
        } else {
            WeightsSource::Path(PathBuf::from(raw))
        }
    }

    /// The published default weights for a registry algorithm.
    pub fn default_for(algorithm: &str) -> Option<Self> {
        DEFAULT_WEIGHTS
            .iter()
            .find(|(alg, _)| *alg == algorithm)
            .map(|(_, name)| WeightsSource::Named((*name).to_string()))
    }
}

pub fn pretrained_names() -> Vec<&'static str> {
    PRETRAINED_WEIGHTS.iter().map(|(name, _, _)| *name).collect()
}

/// Resolve a weights source to a local file.
///
/// Explicit paths are used as-is. Named weights are looked up in the cache
/// directory first and downloaded from their published URL on a miss.
pub fn resolve_source(
    source: &WeightsSource,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ResolveError> {
    match source {
        WeightsSource::Path(path) => {
            if path.exists() {
                Ok(path.clone())
            } else {
                Err(ResolveError::WeightsNotFound(path.clone()))
            }
        }
        WeightsSource::Named(name) => {
            let (_, file, url) = PRETRAINED_WEIGHTS
                .iter()
                .find(|(n, _, _)| *n == name.as_str())
                .copied()
                .ok_or_else(|| ResolveError::UnknownWeights {
                    name: name.clone(),
                    known: pretrained_names(),
                })?;
            resolve_cached(file, url, progress)
        }
    }
}

/// Platform cache directory for downloaded weights.
///
/// - Linux: `$XDG_CACHE_HOME/logoscout/weights/` or `~/.cache/logoscout/weights/`
/// - macOS: `~/Library/Caches/logoscout/weights/`
/// - Windows: `%LOCALAPPDATA%/logoscout/weights/`
pub fn weights_cache_dir() -> Result<PathBuf, ResolveError> {
    dirs::cache_dir()
        .map(|d| d.join("logoscout").join("weights"))
        .ok_or(ResolveError::NoCacheDir)
}

fn resolve_cached(
    file: &str,
    url: &str,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ResolveError> {
    let cache_dir = weights_cache_dir()?;
    let cached_path = cache_dir.join(file);
    if cached_path.exists() {
        return Ok(cached_path);
    }

    fs::create_dir_all(&cache_dir).map_err(ResolveError::CacheDir)?;
    log::info!("Downloading pretrained weights from {url}");
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ResolveError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    write_stream(response, dest, total, progress)
}

/// Stream `reader` into `dest` via a temporary `.part` file, renamed into
/// place on success.
fn write_stream(
    reader: impl Read,
    dest: &Path,
    total: u64,
    progress: Option<ProgressFn>,
) -> Result<(), ResolveError> {
    let temp_path = dest.with_extension("part");

    let result = stream_to_file(reader, dest, &temp_path, total, progress);

    // Clean up .part file on any error
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn stream_to_file(
    mut reader: impl Read,
    dest: &Path,
    temp_path: &Path,
    total: u64,
    progress: Option<ProgressFn>,
) -> Result<(), ResolveError> {
    let mut downloaded: u64 = 0;

    let mut file = fs::File::create(temp_path).map_err(|e| ResolveError::Write {
        path: temp_path.to_path_buf(),
        source: e,
    })?;

    // Stream the body in chunks instead of buffering in memory. This avoids
    // loading large weights (100MB+) entirely into RAM and provides accurate
    // progress reporting during the actual download.
    let mut buf = vec![0u8; 1024 * 1024]; // 1MB buffer
    loop {
        let n = reader.read(&mut buf).map_err(|e| ResolveError::Write {
            path: temp_path.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(|e| ResolveError::Write {
            path: temp_path.to_path_buf(),
            source: e,
        })?;
        downloaded += n as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(|e| ResolveError::Write {
        path: temp_path.to_path_buf(),
        source: e,
    })?;
    drop(file);

    fs::rename(temp_path, dest).map_err(|e| ResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
