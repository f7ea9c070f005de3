//! Writes registry and authentication entries into an npmrc document.

use crate::auth::Credentials;
use crate::config::ConfigDocument;
use crate::error::Result;
use crate::registry::{prefixed_key, scope_registry_key, VerifiedRegistries};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Fills a [`ConfigDocument`] with the keys npm needs to reach each registry.
///
/// For the global registry:
///
/// ```ini
/// registry = https://registry.example.com/
/// always-auth = true
/// _auth = <base64 user:secret>
/// ```
///
/// For a scoped registry, one `@<scope>:registry` line per scope plus auth
/// keys under the registry's prefix:
///
/// ```ini
/// @acme:registry = https://npm.acme.com/
/// //npm.acme.com/:always-auth = true
/// //npm.acme.com/:_auth = <base64 user:secret>
/// ```
///
/// `_auth` is only written when credentials were resolved for the registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryTemplater {
    npm9_format: bool,
}

impl RegistryTemplater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the global registry's auth keys under its prefix.
    ///
    /// npm 9 rejects top-level `_auth`, so this is required for npm 9 and
    /// later.
    pub fn npm9_format(mut self, enabled: bool) -> Self {
        self.npm9_format = enabled;
        self
    }

    /// Apply `registries` to `document` in list order.
    ///
    /// `credentials` is keyed by registry URL; a registry without an entry
    /// is written with `always-auth = false`.
    #[instrument(skip_all, fields(registries = registries.len()))]
    pub fn apply(
        &self,
        document: &mut ConfigDocument,
        registries: &VerifiedRegistries,
        credentials: &HashMap<String, Credentials>,
    ) -> Result<()> {
        for registry in registries.iter() {
            let creds = credentials.get(&registry.url);
            let auth_prefix = if registry.is_global() && !self.npm9_format {
                None
            } else {
                Some(registry.prefix()?)
            };
            let key = |name: &str| match &auth_prefix {
                Some(prefix) => prefixed_key(prefix, name),
                None => name.to_string(),
            };

            if registry.is_global() {
                document.set("registry", registry.url.as_str())?;
            } else {
                for scope in registry.scopes() {
                    document.set(scope_registry_key(scope), registry.url.as_str())?;
                }
            }

            document.set(key("always-auth"), creds.is_some().to_string())?;
            if let Some(creds) = creds {
                document.set(key("_auth"), creds.auth_token())?;
            }

            debug!(
                url = %registry.url,
                scopes = %registry.display_scopes(),
                authenticated = creds.is_some(),
                "Templated registry"
            );
        }

        Ok(())
    }
}
