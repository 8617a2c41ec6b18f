use std::path::PathBuf;
use anyhow::{anyhow, Result};
use directories::ProjectDirs;

pub fn get_global_cache_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("org", "devsync", "devsync")
        .ok_or_else(|| anyhow!("Could not get project directories"))?;
    Ok(proj_dirs.cache_dir().to_path_buf())
}
