use std::path::PathBuf;
use crate::global::utils::get_global_cache_dir;
use crate::util::verify_sha256;
use anyhow::{anyhow, bail, Context, Result};
use walkdir::WalkDir;

/// Returns a cached copy of the archive at `url`, or downloads it.
///
/// The archive's SHA-256 is verified in both cases; a cached file that no
/// longer matches is discarded and fetched again. The checksum gate runs
/// before anything is handed to the caller.
pub fn fetch_archive(url: &str, sha256: &str) -> Result<PathBuf> {
    if let Some(path) = get_cached_archive(url)? {
        let bytes = std::fs::read(&path)?;
        if verify_sha256(&bytes, sha256).is_ok() {
            return Ok(path);
        }
        std::fs::remove_file(&path)?;
    }

    let response = reqwest::blocking::get(url)?;
    if !response.status().is_success() {
        bail!("Failed to fetch {}: {}", url, response.status());
    }
    let bytes = response.bytes()?;
    verify_sha256(&bytes, sha256)
        .with_context(|| format!("Downloaded archive {} is corrupt", url))?;
    cache_archive(url, &bytes)
}

pub fn get_cached_archive(url: &str) -> Result<Option<PathBuf>> {
    let cache_dir = get_global_cache_dir()?;
    let file_name = archive_file_name(url)?;
    let archive_path = cache_dir.join(file_name);
    if archive_path.exists() {
        Ok(Some(archive_path))
    }
    else {
        Ok(None)
    }
}

pub fn cache_archive(url: &str, bytes: &[u8]) -> Result<PathBuf> {
    let cache_dir = get_global_cache_dir()?;
    if !cache_dir.exists() {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Could not create cache dir {:?}", cache_dir))?;
    }
    let file_name = archive_file_name(url)?;
    let path = cache_dir.join(file_name);
    // staged write; the final path only ever holds a complete archive
    let tmp = tempfile::NamedTempFile::new_in(&cache_dir)?;
    std::fs::write(tmp.path(), bytes)?;
    tmp.persist(&path)
        .map_err(|e| anyhow!("Could not persist cache file {:?}: {}", path, e))?;
    Ok(path)
}

pub fn clean_cache() -> Result<()> {
    let cache_dir = get_global_cache_dir()?;
    if cache_dir.exists() {
        for entry in WalkDir::new(&cache_dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file() {
                println!("removing {}", entry.path().display());
            }
        }
        std::fs::remove_dir_all(&cache_dir)?;
    }
    std::fs::create_dir_all(&cache_dir)?;
    Ok(())
}

fn archive_file_name(url: &str) -> Result<&str> {
    url.split('/')
        .next_back()
        .filter(|name| !name.is_empty())
        .ok_or(anyhow!("Could not determine archive name from {}", url))
}
