//! Error types for nodejs-provision.

use crate::installer::{Cpu, Platform};
use crate::version::Version;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving installers or supplying npm config.
#[derive(Error, Debug)]
pub enum Error {
    /// Config file not found.
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    /// Failed to read a config file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a supplied config file.
    #[error("failed to write config file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed `N.N.N` version string.
    #[error("invalid version '{version}': {message}")]
    InvalidVersion { version: String, message: String },

    /// Malformed version range literal.
    #[error("invalid version range '{range}': {message}")]
    InvalidVersionRange { range: String, message: String },

    /// Invalid download or mirror URL.
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// A registry was configured without a URL.
    #[error("registry URL must not be empty")]
    EmptyRegistryUrl,

    /// A registry URL that cannot be used to compute credential keys.
    #[error("invalid registry URL '{url}': {message}")]
    InvalidRegistryUrl { url: String, message: String },

    /// A scoped registry without any scope names.
    #[error("registry '{url}' is scoped but declares no scopes")]
    EmptyScopes { url: String },

    /// A scope name that cannot be written as an `@scope:registry` key.
    #[error("registry '{url}' has invalid scope '{scope}'")]
    InvalidScope { url: String, scope: String },

    /// Key, value or comment text that would not read back as written.
    #[error("invalid npmrc entry '{text}': {message}")]
    InvalidEntry { text: String, message: String },

    /// More than one registry without scopes.
    #[error("only one global registry may be configured, found: {}", urls.join(", "))]
    TooManyGlobalRegistries { urls: Vec<String> },

    /// Node.js release that never shipped usable binaries.
    #[error("Node.js {0} is not supported by the installer")]
    UnsupportedVersion(Version),

    /// No distribution exists for the platform and cpu combination.
    #[error("Node.js {version} is not distributed for {platform}-{cpu}")]
    UnsupportedPlatform {
        version: Version,
        platform: Platform,
        cpu: Cpu,
    },

    /// Operating system name that maps to no known platform.
    #[error("unknown platform '{0}'")]
    UnknownPlatform(String),

    /// Architecture name that maps to no known cpu.
    #[error("unknown cpu architecture '{0}'")]
    UnknownCpu(String),

    /// Installation name not present in the configured list.
    #[error("no Node.js installation named '{0}'")]
    UnknownInstallation(String),

    /// The node executable could not be located.
    #[error("node executable not found at {0}")]
    ExecutableNotFound(PathBuf),

    /// Invalid base64 encoding in an `_auth` field.
    #[error("invalid base64 encoding in _auth field")]
    InvalidBase64(#[from] base64::DecodeError),

    /// UTF-8 decoding error.
    #[error("invalid UTF-8 in decoded _auth field")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias for nodejs-provision operations.
pub type Result<T> = std::result::Result<T, Error>;
