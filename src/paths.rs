//! Layout of a Node.js installation on disk.
//!
//! The platform is passed explicitly rather than taken from `cfg`, since the
//! worker a build runs on need not match the machine computing its paths.

use crate::installer::Platform;
use std::path::{Path, PathBuf};

/// Directory holding the `node` executable.
///
/// - **Unix**: `{home}/bin`
/// - **Windows**: `{home}` itself
pub fn bin_dir(home: &Path, platform: Platform) -> PathBuf {
    if platform.is_windows() {
        home.to_path_buf()
    } else {
        home.join("bin")
    }
}

/// Path of the `node` executable inside an installation.
pub fn executable_path(home: &Path, platform: Platform) -> PathBuf {
    let name = if platform.is_windows() {
        "node.exe"
    } else {
        "node"
    };
    bin_dir(home, platform).join(name)
}

/// Find `node` on the current `PATH`.
pub fn find_node_on_path() -> Option<PathBuf> {
    which::which("node").ok()
}

/// Separator used between `PATH` entries on `platform`.
pub fn path_separator(platform: Platform) -> char {
    if platform.is_windows() {
        ';'
    } else {
        ':'
    }
}

/// Resolve a leading `~` in a configured installation home.
///
/// Only `~` and `~/...` are expanded; `~user` forms and paths without a home
/// directory to resolve against are returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => &rest[1..],
        _ => return PathBuf::from(path),
    };

    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_dir() {
        let home = PathBuf::from("/opt/node");
        assert_eq!(bin_dir(&home, Platform::Linux), PathBuf::from("/opt/node/bin"));
        assert_eq!(bin_dir(&home, Platform::Windows), home);
    }

    #[test]
    fn test_executable_path() {
        let home = PathBuf::from("/opt/node");
        assert_eq!(
            executable_path(&home, Platform::Darwin),
            PathBuf::from("/opt/node/bin/node")
        );
        assert_eq!(
            executable_path(&home, Platform::Windows),
            PathBuf::from("/opt/node/node.exe")
        );
    }

    #[test]
    fn test_path_separator() {
        assert_eq!(path_separator(Platform::Windows), ';');
        assert_eq!(path_separator(Platform::Aix), ':');
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();

        assert_eq!(expand_tilde("~"), home);
        assert_eq!(expand_tilde("~/.nvm/versions/node/v20"), home.join(".nvm/versions/node/v20"));
        assert_eq!(expand_tilde("~jenkins/node"), PathBuf::from("~jenkins/node"));
        assert_eq!(expand_tilde("/opt/node"), PathBuf::from("/opt/node"));
        assert_eq!(expand_tilde("tools/node"), PathBuf::from("tools/node"));
    }
}
