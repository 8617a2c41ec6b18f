use std::collections::HashMap;
use std::path::Path;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use crate::util::is_valid_version;

/// Name of the per-repository configuration file.
pub const CONFIG_FILE: &str = "devsync.toml";

/// Represents the contents of a `devsync.toml` file.
#[derive(Deserialize, Debug)]
pub struct DevsyncConfig {
    /// The pinned Node.js runtime.
    pub node: NodeConfig,
}

/// The pinned Node.js runtime: a version plus one download artifact per
/// machine architecture.
#[derive(Deserialize, Debug)]
pub struct NodeConfig {
    /// The pinned runtime version, without a leading `v` (e.g. `"22.11.0"`).
    pub version: String,
    /// A map of machine architectures (`x86_64`, `aarch64`, ...) to their
    /// download artifacts.
    pub downloads: HashMap<String, Artifact>,
}

/// A downloadable runtime artifact with its integrity hash.
#[derive(Deserialize, Debug, Clone)]
pub struct Artifact {
    /// The URL of the `.tar.gz` archive.
    pub url: String,
    /// The SHA-256 hash of the archive, hex encoded.
    pub sha256: String,
}

/// Returns the machine architecture key used in `[node.downloads.<arch>]`.
pub fn machine() -> &'static str {
    std::env::consts::ARCH
}

impl DevsyncConfig {
    /// Loads and validates the configuration of a repository.
    ///
    /// # Errors
    ///
    /// Returns an error if `devsync.toml` is missing, unparsable, or fails
    /// validation. Downstream code can rely on every field being usable.
    pub fn load<P: AsRef<Path>>(reporoot: P) -> Result<DevsyncConfig> {
        let path = reporoot.as_ref().join(CONFIG_FILE);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config: DevsyncConfig = toml::from_str(&content)
            .with_context(|| format!("Could not parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !is_valid_version(&self.node.version) {
            bail!("Invalid node version: {}", self.node.version);
        }
        if self.node.downloads.is_empty() {
            bail!("No node downloads configured");
        }
        for (arch, artifact) in &self.node.downloads {
            if artifact.url.is_empty() {
                bail!("Empty download url for {}", arch);
            }
            let sha = artifact.sha256.strip_prefix("sha256:").unwrap_or(&artifact.sha256);
            if sha.len() != 64 || !sha.bytes().all(|b| b.is_ascii_hexdigit()) {
                bail!("Invalid sha256 for {}: {}", arch, artifact.sha256);
            }
        }
        Ok(())
    }
}

impl NodeConfig {
    /// Returns the download artifact for the current machine architecture.
    pub fn download_for_machine(&self) -> Result<&Artifact> {
        self.downloads
            .get(machine())
            .with_context(|| format!("No node download configured for {}", machine()))
    }
}
