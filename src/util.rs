use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use semver::Version;
use sha2::{Digest, Sha256};
use tar::Archive;

/// Ensures the repo-local bin root exists under the given repository root.
/// Creates `.devsync/bin` if it doesn't already exist.
///
/// Returns the full path to the bin root.
pub fn ensure_binroot<P: AsRef<Path>>(reporoot: P) -> Result<PathBuf> {
    let binroot = get_binroot(&reporoot);
    std::fs::create_dir_all(&binroot)
        .with_context(|| format!("Could not create bin root {}", binroot.display()))?;
    Ok(binroot)
}

/// Returns the path of the bin root for a repository, without creating it.
pub fn get_binroot<P: AsRef<Path>>(reporoot: P) -> PathBuf {
    reporoot.as_ref().join(".devsync").join("bin")
}

/// Returns the path of the managed runtime binary for a tool,
/// i.e. `<binroot>/node-env/bin/<tool>`. This is the binary the
/// shim at `<binroot>/<tool>` wraps.
pub fn node_env_binary(binroot: &Path, tool: &str) -> PathBuf {
    binroot.join("node-env").join("bin").join(tool)
}

/// Finds the shim and its backing binary for a managed tool.
/// Returns a tuple of `Option<PathBuf>` for (backing binary, shim).
pub fn find_installed_paths(binroot: &Path, tool: &str) -> (Option<PathBuf>, Option<PathBuf>) {
    let backing = node_env_binary(binroot, tool);
    let shim = binroot.join(tool);
    (
        backing.exists().then_some(backing),
        shim.exists().then_some(shim),
    )
}

/// Quotes a value for embedding in a `/bin/sh` script.
///
/// The value is wrapped in single quotes, with embedded single quotes
/// rewritten as `'\''`. The result is always a single shell word, no
/// matter what the value contains.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Renders a shell-script template and writes it as an executable file.
///
/// Every `{key}` placeholder in the template is replaced by the matching
/// substitution value, quoted through [`shell_quote`]. Substitution values
/// are treated as data; they can never introduce shell syntax.
///
/// # Errors
///
/// Returns an error if the file can't be written or marked executable.
pub fn write_script<P: AsRef<Path>>(
    path: P,
    template: &str,
    substitutions: &[(&str, &str)],
) -> Result<()> {
    let mut script = template.to_string();
    for (key, value) in substitutions {
        script = script.replace(&format!("{{{key}}}"), &shell_quote(value));
    }
    std::fs::write(&path, script)
        .with_context(|| format!("Could not write script {}", path.as_ref().display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

const TOOL_SHIM_TEMPLATE: &str = r#"#!/bin/sh
export PATH={binroot}/node-env/bin:"${PATH}"
exec {binroot}/node-env/bin/{tool} "$@"
"#;

/// Writes the wrapper shim for a managed tool at `<binroot>/<tool>`.
///
/// The shim prepends the managed runtime's bin directory to `PATH` and
/// forwards all arguments to the backing binary in `node-env/bin`.
/// An existing shim is overwritten.
pub fn write_tool_shim(binroot: &Path, tool: &str) -> Result<()> {
    let binroot_str = binroot
        .to_str()
        .with_context(|| format!("Bin root is not valid UTF-8: {}", binroot.display()))?;
    write_script(
        binroot.join(tool),
        TOOL_SHIM_TEMPLATE,
        &[("binroot", binroot_str), ("tool", tool)],
    )
}

/// Validates whether a version string is a valid SemVer version.
/// Build metadata (`8.15.0+sha.abc`) is accepted.
pub fn is_valid_version(version: &str) -> bool {
    Version::parse(version).is_ok()
}

/// Verifies the SHA-256 digest of a byte buffer against an expected hex
/// string. A `sha256:` prefix on the expected value is accepted.
pub fn verify_sha256(bytes: &[u8], expected: &str) -> Result<()> {
    let expected = expected.strip_prefix("sha256:").unwrap_or(expected);
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let actual = hex::encode(hasher.finalize());
    if !actual.eq_ignore_ascii_case(expected) {
        bail!("Checksum mismatch: expected {}, got {}", expected, actual);
    }
    Ok(())
}

/// Unpacks a `.tar.gz` archive into `dest`, stripping the top-level
/// component (e.g. `node-v22.11.0-linux-x64/`).
pub fn unpack_tar_gz(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = std::fs::File::open(archive_path)
        .with_context(|| format!("Could not open archive {}", archive_path.display()))?;
    let decoder = GzDecoder::new(std::io::BufReader::new(file));
    let mut archive = Archive::new(decoder);

    std::fs::create_dir_all(dest)?;
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?;
        let stripped: PathBuf = path.components().skip(1).collect();
        if stripped.as_os_str().is_empty() {
            continue;
        }
        let dest_path = dest.join(&stripped);
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        entry.unpack(&dest_path)?;
    }
    Ok(())
}
