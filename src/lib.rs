//! Node.js provisioning for build agents.
//!
//! This crate covers the parts of setting up Node.js for a build that have
//! real logic in them:
//!
//! - Three-part versions and interval version ranges
//! - Installer path and download URL resolution per platform and cpu
//! - Build environment contribution for configured installations
//! - Templating `.npmrc` files with registries and credentials
//!
//! Downloading, unpacking, and running processes are left to the caller.
//!
//! # Quick Start
//!
//! ```
//! use nodejs_provision::{Credentials, NpmConfig, Registry};
//! use std::collections::HashMap;
//!
//! let config = NpmConfig::new("ci", "; managed npmrc\n")
//!     .with_registry(Registry::global("https://registry.npmjs.org/"))
//!     .with_registry(
//!         Registry::scoped("https://npm.acme.com/", ["acme"]).with_credentials("acme-bot"),
//!     );
//!
//! let credentials = HashMap::from([(
//!     "acme-bot".to_string(),
//!     Credentials::new("bot", "s3cr3t"),
//! )]);
//!
//! let npmrc = config.render(&credentials, &HashMap::new()).unwrap();
//! assert!(npmrc.contains("@acme:registry = https://npm.acme.com/\n"));
//! assert!(npmrc.contains("//npm.acme.com/:_auth = Ym90OnMzY3IzdA==\n"));
//! ```
//!
//! # Registry keys
//!
//! Scoped registries route package scopes, and their credentials are written
//! under the registry URL stripped of its scheme, so a token never leaks to
//! another registry:
//!
//! ```ini
//! registry = https://registry.npmjs.org/
//! always-auth = false
//! @acme:registry = https://npm.acme.com/
//! //npm.acme.com/:always-auth = true
//! //npm.acme.com/:_auth = Ym90OnMzY3IzdA==
//! ```
//!
//! At most one registry may be unscoped; [`verify_registries`] rejects
//! anything else before templating starts.
//!
//! # Installers
//!
//! ```
//! use nodejs_provision::{is_blacklisted, resolve_install_path, Cpu, Platform, Version};
//!
//! let version: Version = "0.9.1".parse().unwrap();
//! assert!(!is_blacklisted(&version));
//! assert_eq!(
//!     resolve_install_path(&version, Platform::Linux, Cpu::X64).unwrap(),
//!     "node-v0.9.1-linux-x64.tar.gz"
//! );
//! ```

mod auth;
mod config;
mod error;
mod installation;
mod installer;
mod parser;
mod paths;
pub mod registry;
mod supply;
mod templater;
mod version;

// Re-export main types
pub use auth::{
    decode_auth, encode_auth, registry_prefix, resolve_credentials, CredentialProvider,
    Credentials,
};
pub use config::{ConfigDocument, Entry};
pub use error::{Error, Result};
pub use installation::{Installations, NodeInstallation, NODEJS_HOME};
pub use installer::{
    is_blacklisted, resolve_download_url, resolve_install_path, Cpu, Platform, DEFAULT_DIST_URL,
};
pub use parser::{expand_env_vars, parse_bool};
pub use paths::{bin_dir, executable_path, expand_tilde, find_node_on_path, path_separator};
pub use registry::{verify_registries, Registry, VerifiedRegistries};
pub use supply::{NpmConfig, SuppliedNpmrc, NPM_USERCONFIG};
pub use templater::RegistryTemplater;
pub use version::{Version, VersionRange};
