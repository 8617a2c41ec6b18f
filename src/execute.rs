use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use colored::Colorize;
use devsync::config::DevsyncConfig;
use devsync::global::cache::clean_cache;
use devsync::manifest::PackageManifest;
use devsync::util::{find_installed_paths, get_binroot};
use devsync::{node, pnpm};
use crate::cli::{DevsyncCommand, CLI};

pub fn execute(cli: CLI) -> Result<()> {
    match cli.command {
        DevsyncCommand::Sync { reporoot } => {
            execute_sync(&resolve_reporoot(reporoot)?)
        }
        DevsyncCommand::Status { reporoot } => {
            execute_status(&resolve_reporoot(reporoot)?)
        }
        DevsyncCommand::Which { name, reporoot } => {
            execute_which(&name, &resolve_reporoot(reporoot)?)
        }
        DevsyncCommand::Uninstall { reporoot } => {
            execute_uninstall(&resolve_reporoot(reporoot)?)
        }
        DevsyncCommand::Clean => {
            clean_cache()
        }
    }
}

fn resolve_reporoot(reporoot: Option<PathBuf>) -> Result<PathBuf> {
    match reporoot {
        Some(reporoot) => Ok(reporoot),
        None => std::env::current_dir().context("Could not get current directory"),
    }
}

/// Brings the repository's toolchain in line with its pins: the node
/// runtime first (pnpm is installed through npm, which has to exist by
/// then), then pnpm at the version pinned in `package.json`.
pub fn execute_sync(reporoot: &Path) -> Result<()> {
    let config = DevsyncConfig::load(reporoot)?;
    node::install(
        &config.node.version,
        config.node.download_for_machine()?,
        reporoot,
    )?;

    let manifest = PackageManifest::load(reporoot)?;
    pnpm::install(manifest.package_manager_version()?, reporoot)?;
    Ok(())
}

pub fn execute_status(reporoot: &Path) -> Result<()> {
    let config = DevsyncConfig::load(reporoot)?;
    let manifest = PackageManifest::load(reporoot)?;
    let pnpm_version = manifest.package_manager_version()?;
    let binroot = get_binroot(reporoot);

    print_status(node::TOOL, &config.node.version, node::installed(&config.node.version, &binroot)?);
    print_status(pnpm::TOOL, pnpm_version, pnpm::installed(pnpm_version, &binroot)?);
    Ok(())
}

fn print_status(tool: &str, desired: &str, installed: bool) {
    let state = match installed {
        true => "installed".green(),
        false => "missing".red(),
    };
    println!("{}: {} {}", tool, desired, state);
}

pub fn execute_which(name: &str, reporoot: &Path) -> Result<()> {
    let binroot = get_binroot(reporoot);
    let (exe_path, shim_path) = find_installed_paths(&binroot, name);
    if exe_path.is_none() && shim_path.is_none() {
        println!("No installed paths found");
        return Ok(());
    }
    if let Some(exe_path) = exe_path {
        println!("Found executable at: {}", exe_path.display());
    }
    if let Some(shim_path) = shim_path {
        println!("Found shim at: {}", shim_path.display());
    }
    Ok(())
}

pub fn execute_uninstall(reporoot: &Path) -> Result<()> {
    let devsync_dir = reporoot.join(".devsync");
    if devsync_dir.exists() {
        std::fs::remove_dir_all(&devsync_dir)
            .with_context(|| format!("Could not remove {}", devsync_dir.display()))?;
        println!("Removed {}", devsync_dir.display());
    }
    else {
        println!("Nothing to remove");
    }
    Ok(())
}
