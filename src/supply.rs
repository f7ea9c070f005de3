//! Supplying a templated npmrc to a build.
//!
//! An [`NpmConfig`] is a stored npmrc template plus the registries to add to
//! it. Supplying it verifies the registries, resolves their credentials,
//! templates the document and writes it where the build can pick it up via
//! `npm_config_userconfig`.

use crate::auth::{resolve_credentials, CredentialProvider};
use crate::config::ConfigDocument;
use crate::error::{Error, Result};
use crate::registry::{verify_registries, Registry, VerifiedRegistries};
use crate::templater::RegistryTemplater;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Environment variable npm reads its user config path from.
pub const NPM_USERCONFIG: &str = "npm_config_userconfig";

/// A managed npmrc: template text plus registries to inject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpmConfig {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// npmrc template text.
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub registries: Vec<Registry>,

    /// Write the global registry's auth under its prefix (npm 9+).
    #[serde(default)]
    pub npm9_format: bool,

    /// Expand `${VAR}` references in the template from the build environment.
    #[serde(default)]
    pub replace_tokens: bool,
}

impl NpmConfig {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registries.push(registry);
        self
    }

    /// Check the registries; must pass before anything is templated.
    pub fn verify(&self) -> Result<VerifiedRegistries> {
        verify_registries(self.registries.iter().cloned())
    }

    /// Produce the npmrc text for a build.
    #[instrument(skip_all, fields(id = %self.id))]
    pub fn render<P>(&self, provider: &P, env: &HashMap<String, String>) -> Result<String>
    where
        P: CredentialProvider + ?Sized,
    {
        let registries = self.verify()?;

        let mut document = ConfigDocument::load(&self.content);
        if self.replace_tokens {
            document.expand_env(env)?;
        }

        let credentials = resolve_credentials(&registries, provider);

        RegistryTemplater::new()
            .npm9_format(self.npm9_format)
            .apply(&mut document, &registries, &credentials)?;

        debug!(
            registries = registries.len(),
            authenticated = credentials.len(),
            "Rendered npmrc"
        );

        Ok(document.serialize())
    }

    /// Render and write the npmrc to `path` for the lifetime of the returned
    /// guard.
    pub fn supply<P>(
        &self,
        path: &Path,
        provider: &P,
        env: &HashMap<String, String>,
    ) -> Result<SuppliedNpmrc>
    where
        P: CredentialProvider + ?Sized,
    {
        let content = self.render(provider, env)?;

        std::fs::write(path, content).map_err(|e| Error::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(id = %self.id, path = %path.display(), "Supplied npmrc");

        Ok(SuppliedNpmrc {
            path: path.to_path_buf(),
        })
    }
}

/// An npmrc written for a build step. The file is removed on drop.
#[derive(Debug)]
pub struct SuppliedNpmrc {
    path: PathBuf,
}

impl SuppliedNpmrc {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Environment pointing npm at the supplied file.
    pub fn env_vars(&self) -> IndexMap<String, String> {
        IndexMap::from([(
            NPM_USERCONFIG.to_string(),
            self.path.to_string_lossy().into_owned(),
        )])
    }
}

impl Drop for SuppliedNpmrc {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to remove supplied npmrc");
            }
        }
    }
}
