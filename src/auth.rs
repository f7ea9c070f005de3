//! Registry credentials and the keys they are written under.
//!
//! Per-registry settings in an npmrc are prefixed with the registry URL
//! stripped of its scheme ("nerf-darting"), so a credential only ever applies
//! to the registry it was issued for:
//!
//! ```text
//! https://npm.acme.com/repo/ → //npm.acme.com/repo/:_auth = ...
//! ```

use crate::error::{Error, Result};
use crate::registry::Registry;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

/// Username and secret resolved for a registry.
///
/// `Debug` redacts the secret so credentials can be logged safely.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// The base64 `username:secret` token written to `_auth`.
    pub fn auth_token(&self) -> String {
        encode_auth(&self.username, &self.secret)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Source of credentials, looked up by the id a registry refers to.
///
/// Storage is the host's concern; an unknown id means "no authentication".
pub trait CredentialProvider {
    fn find(&self, credentials_id: &str) -> Option<Credentials>;
}

impl CredentialProvider for HashMap<String, Credentials> {
    fn find(&self, credentials_id: &str) -> Option<Credentials> {
        self.get(credentials_id).cloned()
    }
}

/// Resolve credentials for each registry, keyed by registry URL.
///
/// Registries without a credentials id are skipped. An id the provider does
/// not know is logged and skipped as well.
pub fn resolve_credentials<P>(registries: &[Registry], provider: &P) -> HashMap<String, Credentials>
where
    P: CredentialProvider + ?Sized,
{
    let mut resolved = HashMap::new();

    for registry in registries {
        let Some(id) = registry.credentials_id.as_deref() else {
            continue;
        };

        match provider.find(id) {
            Some(credentials) => {
                debug!(url = %registry.url, credentials_id = id, "Resolved registry credentials");
                resolved.insert(registry.url.clone(), credentials);
            }
            None => {
                warn!(
                    url = %registry.url,
                    credentials_id = id,
                    "Credentials not found, registry will be used without authentication"
                );
            }
        }
    }

    resolved
}

/// Encode `username:secret` as standard padded base64.
///
/// # Examples
///
/// ```
/// use nodejs_provision::encode_auth;
///
/// assert_eq!(encode_auth("user", "password"), "dXNlcjpwYXNzd29yZA==");
/// ```
pub fn encode_auth(username: &str, secret: &str) -> String {
    BASE64.encode(format!("{}:{}", username, secret).as_bytes())
}

/// Decode an `_auth` token into `(username, secret)`.
///
/// The split happens at the first `:`, so secrets may contain colons.
pub fn decode_auth(auth: &str) -> Result<(String, String)> {
    let decoded = String::from_utf8(BASE64.decode(auth)?)?;
    let mut parts = decoded.splitn(2, ':');
    let username = parts.next().unwrap_or("").to_string();
    let secret = parts.next().unwrap_or("").to_string();
    Ok((username, secret))
}

/// Compute the key prefix for a registry URL.
///
/// The scheme and trailing slashes are stripped and the remainder wrapped as
/// `//<host-and-path>/`. Port and path are kept verbatim.
///
/// # Examples
///
/// ```
/// use nodejs_provision::registry_prefix;
///
/// assert_eq!(registry_prefix("https://registry.npmjs.org/").unwrap(), "//registry.npmjs.org/");
/// assert_eq!(
///     registry_prefix("http://nexus.local:8081/repository/npm").unwrap(),
///     "//nexus.local:8081/repository/npm/"
/// );
/// ```
pub fn registry_prefix(url: &str) -> Result<String> {
    // Url::parse drops tabs and newlines, which would otherwise reach the
    // npmrc verbatim.
    if url.chars().any(char::is_control) {
        return Err(Error::InvalidRegistryUrl {
            url: url.to_string(),
            message: "URL contains control characters".to_string(),
        });
    }

    let trimmed = url.trim().trim_end_matches('/');

    let parsed = Url::parse(trimmed).map_err(|e| Error::InvalidRegistryUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if parsed.host_str().is_none() {
        return Err(Error::InvalidRegistryUrl {
            url: url.to_string(),
            message: "URL has no host".to_string(),
        });
    }

    let Some(index) = trimmed.find("://") else {
        return Err(Error::InvalidRegistryUrl {
            url: url.to_string(),
            message: "URL has no scheme separator '://'".to_string(),
        });
    };

    Ok(format!("//{}/", &trimmed[index + 3..]))
}
