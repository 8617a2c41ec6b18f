use std::path::Path;
use anyhow::Result;
use crate::proc;
use crate::util::{ensure_binroot, node_env_binary, write_tool_shim};

/// Name of the managed package manager.
pub const TOOL: &str = "pnpm";

/// Checks whether the desired pnpm version is installed in the bin root.
///
/// The lookup is constrained to the bin root; a pnpm elsewhere on the
/// search path never satisfies it. `true` requires all of:
/// - an executable `pnpm` resolving to exactly `<binroot>/pnpm`,
/// - the backing binary `<binroot>/node-env/bin/pnpm` (a shim without it
///   is orphaned),
/// - `pnpm --version` output, trimmed, equal to `version`. Exact string
///   equality, no range matching.
///
/// A version-query subprocess failure is an error, not `false`.
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
    Ok(stdout.trim() == version)
}

/// Brings pnpm to the desired version in the repository's bin root.
///
/// Idempotent: if the installed version already matches, this returns
/// without side effects, so it is safe to call on every sync.
pub fn install(version: &str, reporoot: &Path) -> Result<()> {
    let binroot = ensure_binroot(reporoot)?;

    if installed(version, &binroot)? {
        return Ok(());
    }

    println!("installing pnpm {version}...");

    // <binroot>/npm is a managed shim, so this install -g ends up
    // putting pnpm into <binroot>/node-env/bin/pnpm, which is what
    // the <binroot>/pnpm shim points to
    proc::run_streamed(
        binroot.join("npm"),
        &["install", "-g", &format!("pnpm@{version}")],
    )?;

    write_tool_shim(&binroot, TOOL)?;
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::util::{ensure_binroot, write_script};
    use tempfile::tempdir;

    fn fake_backing_binary(binroot: &Path, script: &str) {
        let env_bin = binroot.join("node-env").join("bin");
        std::fs::create_dir_all(&env_bin).unwrap();
        write_script(env_bin.join("pnpm"), script, &[]).unwrap();
    }

    fn fake_install(binroot: &Path, reported_version: &str) {
        fake_backing_binary(binroot, &format!("#!/bin/sh\necho {reported_version}\n"));
        crate::util::write_tool_shim(binroot, TOOL).unwrap();
    }

    #[test]
    fn test_installed_matching_version() {
        let dir = tempdir().unwrap();
        let binroot = ensure_binroot(dir.path()).unwrap();
        fake_install(&binroot, "8.15.0");

        assert!(installed("8.15.0", &binroot).unwrap());
    }

    #[test]
    fn test_installed_trims_reported_version() {
        let dir = tempdir().unwrap();
        let binroot = ensure_binroot(dir.path()).unwrap();
        // echo appends a newline; the comparison must not see it
        fake_install(&binroot, "8.15.0");

        assert!(installed("8.15.0", &binroot).unwrap());
        assert!(!installed("8.15.1", &binroot).unwrap());
    }

    #[test]
    fn test_not_installed_when_binroot_empty() {
        let dir = tempdir().unwrap();
        let binroot = ensure_binroot(dir.path()).unwrap();

        assert!(!installed("8.15.0", &binroot).unwrap());
    }

    #[test]
    fn test_not_installed_when_shim_is_orphaned() {
        let dir = tempdir().unwrap();
        let binroot = ensure_binroot(dir.path()).unwrap();
        fake_install(&binroot, "8.15.0");
        std::fs::remove_file(binroot.join("node-env").join("bin").join("pnpm")).unwrap();

        assert!(!installed("8.15.0", &binroot).unwrap());
    }

    #[test]
    fn test_not_fooled_by_pnpm_outside_binroot() {
        let dir = tempdir().unwrap();
        let binroot = ensure_binroot(dir.path()).unwrap();
        // a working pnpm nearby, but not at <binroot>/pnpm
        let elsewhere = dir.path().join("elsewhere");
        std::fs::create_dir_all(&elsewhere).unwrap();
        write_script(elsewhere.join("pnpm"), "#!/bin/sh\necho 8.15.0\n", &[]).unwrap();
        fake_backing_binary(&binroot, "#!/bin/sh\necho 8.15.0\n");

        assert!(!installed("8.15.0", &binroot).unwrap());
    }

    #[test]
    fn test_broken_shim_propagates_error() {
        let dir = tempdir().unwrap();
        let binroot = ensure_binroot(dir.path()).unwrap();
        fake_backing_binary(&binroot, "#!/bin/sh\necho 8.15.0\n");
        write_script(binroot.join("pnpm"), "#!/bin/sh\nexit 7\n", &[]).unwrap();

        assert!(installed("8.15.0", &binroot).is_err());
    }

    #[test]
    fn test_install_short_circuits_when_satisfied() {
        let dir = tempdir().unwrap();
        let binroot = ensure_binroot(dir.path()).unwrap();
        fake_install(&binroot, "8.15.0");
        // no npm shim exists, so reaching the install path would fail

        install("8.15.0", dir.path()).unwrap();
    }
}
