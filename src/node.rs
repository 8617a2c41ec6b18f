use std::path::Path;
use anyhow::{Context, Result};
use crate::config::Artifact;
use crate::global::cache::fetch_archive;
use crate::proc;
use crate::util::{ensure_binroot, node_env_binary, unpack_tar_gz, write_tool_shim};

/// Name of the managed runtime.
pub const TOOL: &str = "node";

/// The runtime executables that get a wrapper shim in the bin root.
/// npm must be shimmed: its global installs have to land inside
/// `node-env`, not in a system prefix.
pub const SHIMMED_TOOLS: [&str; 3] = ["node", "npm", "npx"];

/// Checks whether the desired node version is installed in the bin root.
///
/// Same contract as the pnpm checker: shim resolved inside the bin root
/// only, backing binary present, reported version an exact match.
/// `node --version` prints a leading `v` (`v22.11.0`), so the comparison
/// target is `v<version>`.
pub fn installed(version: &str, binroot: &Path) -> Result<bool> {
    let shim = binroot.join(TOOL);
    match which::which_in(TOOL, Some(binroot), std::env::current_dir()?) {
        Ok(resolved) if resolved == shim => {}
        _ => return Ok(false),
    }
    if !node_env_binary(binroot, TOOL).exists() {
        return Ok(false);
    }

    let stdout = proc::run_captured(&shim, &["--version"])?;
    Ok(stdout.trim() == format!("v{version}"))
}

/// Brings the node runtime to the desired version in the repository's
/// bin root. Idempotent, like the pnpm installer.
///
/// The architecture-specific tarball goes through the user-level archive
/// cache and is checksum-verified before anything touches the bin root.
/// A mismatched `node-env` is replaced wholesale; the new tree is staged
/// next to it and renamed into place.
pub fn install(version: &str, artifact: &Artifact, reporoot: &Path) -> Result<()> {
    let binroot = ensure_binroot(reporoot)?;

    if installed(version, &binroot)? {
        return Ok(());
    }

    println!("installing node {version}...");

    let archive = fetch_archive(&artifact.url, &artifact.sha256)?;

    let staging = tempfile::tempdir_in(&binroot)?;
    unpack_tar_gz(&archive, staging.path())
        .with_context(|| format!("Could not unpack {}", archive.display()))?;

    let env_dir = binroot.join("node-env");
    if env_dir.exists() {
        std::fs::remove_dir_all(&env_dir)?;
    }
    std::fs::rename(staging.keep(), &env_dir)?;

    for tool in SHIMMED_TOOLS {
        write_tool_shim(&binroot, tool)?;
    }
    Ok(())
}
