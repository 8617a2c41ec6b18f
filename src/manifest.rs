use std::path::Path;
use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// The fields of `package.json` this tool cares about.
///
/// Only `packageManager` is read; everything else in the manifest belongs
/// to the package manager itself.
#[derive(Deserialize, Debug)]
pub struct PackageManifest {
    #[serde(rename = "packageManager")]
    package_manager: Option<String>,
}

impl PackageManifest {
    /// Loads `<reporoot>/package.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not valid JSON.
    pub fn load<P: AsRef<Path>>(reporoot: P) -> Result<PackageManifest> {
        let path = reporoot.as_ref().join("package.json");
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Could not parse {}", path.display()))
    }

    /// Returns the pinned package-manager version.
    ///
    /// The `packageManager` field has the form `"<name>@<version>"`; the
    /// version is everything after the last `@`, so build metadata like
    /// `pnpm@8.15.0+sha.abc` and scoped names both survive.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or has no `@`.
    pub fn package_manager_version(&self) -> Result<&str> {
        let pin = self
            .package_manager
            .as_deref()
            .context("package.json has no packageManager field")?;
        let Some((_, version)) = pin.rsplit_once('@') else {
            bail!("Invalid packageManager field: {}", pin);
        };
        if version.is_empty() {
            bail!("Invalid packageManager field: {}", pin);
        }
        Ok(version)
    }
}
