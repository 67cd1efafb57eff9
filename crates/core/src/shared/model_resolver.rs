use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_DIR_NAME: &str = "FaceFinder";

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("download interrupted for {url}: {source}")]
    Stream {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write model to {path}: {source}")]
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

/// Resolve a model file by name, checking local locations before downloading.
///
/// Resolution order:
/// 1. Explicit directory (`--model-dir`, pre-packaged installs)
/// 2. User cache directory (platform-specific)
/// 3. Download from URL to cache
pub fn resolve(
    name: &str,
    url: &str,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cache_dir = model_cache_dir()?;
    resolve_with_cache(&cache_dir, name, url, bundled_dir, progress)
}

fn resolve_with_cache(
    cache_dir: &Path,
    name: &str,
    url: &str,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(dir) = bundled_dir {
        let bundled_path = dir.join(name);
        if bundled_path.exists() {
            log::debug!("Using bundled model {}", bundled_path.display());
            return Ok(bundled_path);
        }
    }

    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        log::debug!("Using cached model {}", cached_path.display());
        return Ok(cached_path);
    }

    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    log::info!("Downloading {name} from {url}");
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/FaceFinder/models/`
/// - Linux: `$XDG_CACHE_HOME/FaceFinder/models/` or `~/.cache/FaceFinder/models/`
/// - Windows: `%LOCALAPPDATA%/FaceFinder/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME).join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join(APP_DIR_NAME).join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let download_err = |e: reqwest::Error| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    };
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;
    let total = response.content_length().unwrap_or(0);

    // Temp file + rename so a failed download never leaves a truncated model
    let temp_path = dest.with_extension("part");
    let write_err = |e: std::io::Error| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    };
    let mut file = fs::File::create(&temp_path).map_err(write_err)?;

    if let Err(e) = copy_with_progress(&mut response, &mut file, total, progress.as_ref()) {
        let _ = fs::remove_file(&temp_path);
        return Err(match e {
            CopyError::Read(source) => ModelResolveError::Stream {
                url: url.to_string(),
                source,
            },
            CopyError::Write(source) => write_err(source),
        });
    }

    file.flush().map_err(write_err)?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

const CHUNK_SIZE: usize = 64 * 1024;

enum CopyError {
    Read(std::io::Error),
    Write(std::io::Error),
}

/// Stream `reader` into `writer`, reporting progress after every chunk.
fn copy_with_progress(
    reader: &mut impl Read,
    writer: &mut impl Write,
    total: u64,
    progress: Option<&ProgressFn>,
) -> Result<u64, CopyError> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut copied: u64 = 0;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };
        writer.write_all(&buf[..n]).map_err(CopyError::Write)?;
        copied += n as u64;
        if let Some(cb) = progress {
            cb(copied, total);
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const UNREACHABLE_URL: &str = "http://invalid.nonexistent.example.com/model.bin";

    #[test]
    fn test_resolve_finds_cached_file() {
        let tmp = TempDir::new().unwrap();
        let cached = tmp.path().join("model.bin");
        fs::write(&cached, b"cached model").unwrap();

        let path = resolve_with_cache(tmp.path(), "model.bin", UNREACHABLE_URL, None, None).unwrap();
        assert_eq!(path, cached);
    }

    #[test]
    fn test_bundled_dir_takes_precedence_over_cache() {
        let tmp = TempDir::new().unwrap();
        let cache_dir = tmp.path().join("cache");
        let bundled_dir = tmp.path().join("bundled");
        fs::create_dir_all(&cache_dir).unwrap();
        fs::create_dir_all(&bundled_dir).unwrap();
        fs::write(cache_dir.join("model.bin"), b"cached").unwrap();
        fs::write(bundled_dir.join("model.bin"), b"bundled").unwrap();

        let path = resolve_with_cache(
            &cache_dir,
            "model.bin",
            UNREACHABLE_URL,
            Some(&bundled_dir),
            None,
        )
        .unwrap();
        assert_eq!(fs::read(path).unwrap(), b"bundled");
    }

    #[test]
    fn test_missing_bundled_file_falls_back_to_cache() {
        let tmp = TempDir::new().unwrap();
        let bundled_dir = tmp.path().join("empty");
        fs::create_dir_all(&bundled_dir).unwrap();
        fs::write(tmp.path().join("model.bin"), b"cached").unwrap();

        let path = resolve_with_cache(
            tmp.path(),
            "model.bin",
            UNREACHABLE_URL,
            Some(&bundled_dir),
            None,
        )
        .unwrap();
        assert_eq!(path, tmp.path().join("model.bin"));
    }

    #[test]
    fn test_model_cache_dir_returns_path() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains(APP_DIR_NAME));
        assert!(path.ends_with("models"));
    }

    #[test]
    fn test_resolve_unreachable_url_returns_download_error() {
        let tmp = TempDir::new().unwrap();
        let result = resolve_with_cache(tmp.path(), "model.bin", UNREACHABLE_URL, None, None);
        assert!(matches!(result, Err(ModelResolveError::Download { .. })));
    }

    #[test]
    fn test_download_atomic_no_partial_on_failure() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.bin");
        let _ = download(UNREACHABLE_URL, &dest, None);
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }

    #[test]
    fn test_copy_reports_progress_per_chunk() {
        use std::sync::{Arc, Mutex};

        let body = vec![7u8; CHUNK_SIZE * 2 + 100];
        let total = body.len() as u64;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let progress: ProgressFn = Box::new(move |done, all| {
            sink.lock().unwrap().push((done, all));
        });

        let mut out = Vec::new();
        let copied = copy_with_progress(
            &mut std::io::Cursor::new(&body),
            &mut out,
            total,
            Some(&progress),
        )
        .ok()
        .unwrap();

        assert_eq!(copied, total);
        assert_eq!(out, body);
        let seen = seen.lock().unwrap();
        assert!(seen.len() >= 3, "expected one report per chunk: {seen:?}");
        assert!(seen[0].0 < total);
        assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(seen.last().copied(), Some((total, total)));
    }

    struct FailingReader {
        remaining: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.remaining == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                ));
            }
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            Ok(n)
        }
    }

    #[test]
    fn test_copy_surfaces_read_error_after_partial_body() {
        let mut out = Vec::new();
        let result = copy_with_progress(
            &mut FailingReader { remaining: 1000 },
            &mut out,
            5000,
            None,
        );
        assert!(matches!(result, Err(CopyError::Read(_))));
        assert_eq!(out.len(), 1000);
    }
}
