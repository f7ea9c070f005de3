//! Registry definitions and their verification.
//!
//! A registry without scopes is the global registry; every other registry
//! routes one or more package scopes. Before a registry list is templated
//! into an npmrc it has to pass [`verify_registries`], which is the only way
//! to obtain a [`VerifiedRegistries`].

use crate::auth::registry_prefix;
use crate::error::{Error, Result};
use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::Deref;
use tracing::debug;

/// The default npm registry URL.
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org/";

/// A package registry endpoint.
///
/// Scope names are stored without the leading `@`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_id: Option<String>,

    /// `None` marks the global registry. Accepts a list or a comma-separated
    /// string when deserializing.
    #[serde(
        default,
        deserialize_with = "deserialize_scopes",
        skip_serializing_if = "Option::is_none"
    )]
    pub scopes: Option<IndexSet<String>>,
}

impl Registry {
    /// A registry used for packages outside any configured scope.
    pub fn global(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials_id: None,
            scopes: None,
        }
    }

    /// A registry for the given scopes. Leading `@`s are stripped.
    pub fn scoped<I, S>(url: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            url: url.into(),
            credentials_id: None,
            scopes: Some(normalize_scopes(scopes)),
        }
    }

    pub fn with_credentials(mut self, credentials_id: impl Into<String>) -> Self {
        self.credentials_id = Some(credentials_id.into());
        self
    }

    pub fn is_global(&self) -> bool {
        self.scopes.is_none()
    }

    /// Scope names without `@`; empty for the global registry.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().flatten().map(String::as_str)
    }

    /// Scopes as users write them, e.g. `@acme, @tools`.
    pub fn display_scopes(&self) -> String {
        self.scopes()
            .map(|scope| format!("@{}", scope))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Key prefix for this registry's per-registry settings.
    pub fn prefix(&self) -> Result<String> {
        registry_prefix(&self.url)
    }

    /// Check the URL and, for scoped registries, that scopes are present.
    pub fn validate(&self) -> Result<()> {
        check_url(&self.url)?;

        if matches!(&self.scopes, Some(scopes) if scopes.is_empty()) {
            return Err(Error::EmptyScopes {
                url: self.url.clone(),
            });
        }

        if let Some(scope) = self.scopes().find(|scope| !is_valid_scope(scope)) {
            return Err(Error::InvalidScope {
                url: self.url.clone(),
                scope: scope.to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScopesRepr {
    Text(String),
    List(Vec<String>),
}

fn deserialize_scopes<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<IndexSet<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<ScopesRepr>::deserialize(deserializer)?.map(|repr| match repr {
            ScopesRepr::Text(text) => parse_scopes(&text),
            ScopesRepr::List(list) => normalize_scopes(list),
        }),
    )
}

/// Parse a user-entered scope list such as `"@acme, tools internal"`.
///
/// Scopes are separated by commas or whitespace; leading `@`s are stripped
/// and duplicates dropped, keeping first-seen order.
///
/// # Examples
///
/// ```
/// use nodejs_provision::registry::parse_scopes;
///
/// let scopes = parse_scopes("@acme, tools @acme");
/// assert_eq!(scopes.iter().collect::<Vec<_>>(), ["acme", "tools"]);
/// ```
pub fn parse_scopes(text: &str) -> IndexSet<String> {
    normalize_scopes(text.split(|c: char| c == ',' || c.is_whitespace()))
}

fn normalize_scopes<I, S>(scopes: I) -> IndexSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    scopes
        .into_iter()
        .filter_map(|scope| {
            let scope = scope.as_ref().trim();
            let scope = scope.strip_prefix('@').unwrap_or(scope);
            (!scope.is_empty()).then(|| scope.to_string())
        })
        .collect()
}

/// A scope must fit in `@<scope>:registry` as a single key.
fn is_valid_scope(scope: &str) -> bool {
    !scope.is_empty()
        && !scope
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, ':' | '=' | '@'))
}

/// Extract the scope from a package name if present.
///
/// # Examples
///
/// ```
/// use nodejs_provision::registry::extract_scope;
///
/// assert_eq!(extract_scope("@myorg/package"), Some("myorg"));
/// assert_eq!(extract_scope("package"), None);
/// ```
pub fn extract_scope(package: &str) -> Option<&str> {
    let rest = package.strip_prefix('@')?;
    let end = rest.find('/').unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Build the config key for a scoped registry.
///
/// # Examples
///
/// ```
/// use nodejs_provision::registry::scope_registry_key;
///
/// assert_eq!(scope_registry_key("myorg"), "@myorg:registry");
/// assert_eq!(scope_registry_key("@myorg"), "@myorg:registry");
/// ```
pub fn scope_registry_key(scope: &str) -> String {
    format!("@{}:registry", scope.strip_prefix('@').unwrap_or(scope))
}

/// Build a per-registry key such as `//npm.acme.com/:_auth`.
pub fn prefixed_key(prefix: &str, key: &str) -> String {
    format!("{}:{}", prefix, key)
}

/// Check a registry URL, reporting blank and unusable URLs separately.
pub fn check_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(Error::EmptyRegistryUrl);
    }

    registry_prefix(url).map(|_| ())
}

/// A registry list that passed [`verify_registries`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifiedRegistries(Vec<Registry>);

impl VerifiedRegistries {
    /// The global registry, if one is configured.
    pub fn global(&self) -> Option<&Registry> {
        self.0.iter().find(|registry| registry.is_global())
    }

    /// The registry URL npm will use for `package`.
    ///
    /// Scoped packages use their scope's registry, everything else the
    /// global registry, falling back to [`DEFAULT_REGISTRY`].
    pub fn registry_for(&self, package: &str) -> &str {
        if let Some(scope) = extract_scope(package) {
            if let Some(registry) = self.0.iter().find(|r| r.scopes().any(|s| s == scope)) {
                return &registry.url;
            }
        }

        self.global()
            .map(|registry| registry.url.as_str())
            .unwrap_or(DEFAULT_REGISTRY)
    }

    pub fn into_inner(self) -> Vec<Registry> {
        self.0
    }
}

impl Deref for VerifiedRegistries {
    type Target = [Registry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Verify a registry list before it is templated.
///
/// Every registry must have a usable URL, scoped registries must name at
/// least one scope, and at most one registry may be global.
pub fn verify_registries<I>(registries: I) -> Result<VerifiedRegistries>
where
    I: IntoIterator<Item = Registry>,
{
    let registries: Vec<Registry> = registries.into_iter().collect();

    for registry in &registries {
        registry.validate()?;
    }

    let globals: Vec<String> = registries
        .iter()
        .filter(|registry| registry.is_global())
        .map(|registry| registry.url.clone())
        .collect();

    if globals.len() > 1 {
        return Err(Error::TooManyGlobalRegistries { urls: globals });
    }

    debug!(count = registries.len(), "Verified registries");

    Ok(VerifiedRegistries(registries))
}
