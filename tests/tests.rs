#![cfg(unix)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use devsync::pnpm;
use devsync::util::{ensure_binroot, write_script};

// A stand-in for the managed npm shim: it logs its arguments and "installs"
// a pnpm that reports the requested version, exactly where a real
// `npm install -g` through the shim would put it.
const FAKE_NPM: &str = r#"#!/bin/sh
echo "$@" >> {log}
ver=${3##*@}
mkdir -p {envbin}
printf '#!/bin/sh\necho %s\n' "$ver" > {envbin}/pnpm
chmod +x {envbin}/pnpm
"#;

fn setup_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let binroot = ensure_binroot(temp_dir.path()).unwrap();
    let log = binroot.join("npm-calls.log");
    let envbin = binroot.join("node-env").join("bin");
    write_script(
        binroot.join("npm"),
        FAKE_NPM,
        &[
            ("log", log.to_str().unwrap()),
            ("envbin", envbin.to_str().unwrap()),
        ],
    )
    .unwrap();
    (temp_dir, binroot)
}

fn npm_calls(binroot: &Path) -> Vec<String> {
    match std::fs::read_to_string(binroot.join("npm-calls.log")) {
        Ok(log) => log.lines().map(str::to_string).collect(),
        Err(_) => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_from_empty_binroot() {
        let (dir, binroot) = setup_repo();

        pnpm::install("8.15.0", dir.path()).unwrap();

        assert_eq!(npm_calls(&binroot), vec!["install -g pnpm@8.15.0"]);
        assert!(binroot.join("pnpm").exists());
        assert!(pnpm::installed("8.15.0", &binroot).unwrap());
    }

    #[test]
    fn test_install_is_idempotent() {
        let (dir, binroot) = setup_repo();

        pnpm::install("8.15.0", dir.path()).unwrap();
        pnpm::install("8.15.0", dir.path()).unwrap();

        // the second call must short-circuit: no new subprocess run
        assert_eq!(npm_calls(&binroot).len(), 1);
        assert!(pnpm::installed("8.15.0", &binroot).unwrap());
    }

    #[test]
    fn test_install_reinstalls_on_version_drift() {
        let (dir, binroot) = setup_repo();

        pnpm::install("8.15.0", dir.path()).unwrap();
        pnpm::install("8.15.1", dir.path()).unwrap();

        assert_eq!(
            npm_calls(&binroot),
            vec!["install -g pnpm@8.15.0", "install -g pnpm@8.15.1"]
        );
        assert!(pnpm::installed("8.15.1", &binroot).unwrap());
        assert!(!pnpm::installed("8.15.0", &binroot).unwrap());
    }

    #[test]
    fn test_install_replaces_orphaned_shim() {
        let (dir, binroot) = setup_repo();
        pnpm::install("8.15.0", dir.path()).unwrap();
        std::fs::remove_dir_all(binroot.join("node-env")).unwrap();

        pnpm::install("8.15.0", dir.path()).unwrap();

        assert_eq!(npm_calls(&binroot).len(), 2);
        assert!(pnpm::installed("8.15.0", &binroot).unwrap());
    }

    #[test]
    fn test_install_fails_when_npm_fails() {
        let dir = TempDir::new().unwrap();
        let binroot = ensure_binroot(dir.path()).unwrap();
        write_script(binroot.join("npm"), "#!/bin/sh\nexit 1\n", &[]).unwrap();

        assert!(pnpm::install("8.15.0", dir.path()).is_err());
    }
}
