//! Configured Node.js installations and the environment they contribute.

use crate::error::{Error, Result};
use crate::installer::Platform;
use crate::paths::{bin_dir, executable_path, expand_tilde, find_node_on_path, path_separator};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, trace};

/// Environment variable pointing at the installation home.
pub const NODEJS_HOME: &str = "NODEJS_HOME";

/// A named Node.js installation.
///
/// `home` may start with `~`. An installation without a home uses whatever
/// `node` is found on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInstallation {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
}

impl NodeInstallation {
    pub fn new(name: impl Into<String>, home: Option<&str>) -> Self {
        Self {
            name: name.into(),
            home: home.map(str::to_string),
        }
    }

    /// The installation home with `~` expanded, if one is configured.
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.home
            .as_deref()
            .map(str::trim)
            .filter(|home| !home.is_empty())
            .map(expand_tilde)
    }

    /// Locate the `node` executable for this installation.
    pub fn executable(&self, platform: Platform) -> Result<PathBuf> {
        match self.home_dir() {
            Some(home) => {
                let executable = executable_path(&home, platform);
                if executable.is_file() {
                    Ok(executable)
                } else {
                    Err(Error::ExecutableNotFound(executable))
                }
            }
            None => {
                trace!(name = %self.name, "No home configured, searching PATH for node");
                find_node_on_path().ok_or_else(|| Error::ExecutableNotFound(PathBuf::from("node")))
            }
        }
    }

    /// Environment variables a build using this installation needs.
    ///
    /// Sets `NODEJS_HOME` and prepends the bin directory to `current_path`
    /// using `platform`'s separator. Returns nothing when no home is set.
    pub fn build_env(&self, platform: Platform, current_path: Option<&str>) -> IndexMap<String, String> {
        let mut env = IndexMap::new();

        let Some(home) = self.home_dir() else {
            return env;
        };

        let bin = bin_dir(&home, platform).to_string_lossy().into_owned();
        let path = match current_path.filter(|path| !path.is_empty()) {
            Some(current) => format!("{}{}{}", bin, path_separator(platform), current),
            None => bin,
        };

        env.insert(NODEJS_HOME.to_string(), home.to_string_lossy().into_owned());
        env.insert("PATH".to_string(), path);

        debug!(name = %self.name, home = %home.display(), "Contributed Node.js environment");

        env
    }
}

/// The configured installations, passed to whatever needs to look one up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Installations(Vec<NodeInstallation>);

impl Installations {
    pub fn new(installations: Vec<NodeInstallation>) -> Self {
        Self(installations)
    }

    /// Find an installation by name.
    pub fn find(&self, name: &str) -> Result<&NodeInstallation> {
        self.0
            .iter()
            .find(|installation| installation.name == name)
            .ok_or_else(|| Error::UnknownInstallation(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeInstallation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
