//! Installer path resolution for Node.js distributions.
//!
//! Node.js publishes one directory per release (`v18.17.0/`) holding an
//! archive per platform and cpu. The archive name changed over the years:
//! early Windows releases only shipped MSI installers, zip archives appeared
//! with 4.5.0 and 6.2.1, and Apple Silicon builds start at 16.0.0. The
//! version ranges below encode those cut-overs.

use crate::error::{Error, Result};
use crate::version::{Version, VersionRange};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

/// Official distribution root.
pub const DEFAULT_DIST_URL: &str = "https://nodejs.org/dist/";

/// Releases published before binary distributions existed.
static NO_BINARIES: LazyLock<VersionRange> = LazyLock::new(|| {
    VersionRange::new(Version::new(0, 0, 0), true, Some(Version::new(0, 8, 6)), false)
});

/// 0.9.0 was published without a usable distribution.
const BROKEN_RELEASE: Version = Version::new(0, 9, 0);

/// Windows releases shipping a zip archive in the 4.x line.
static WINDOWS_ZIP_4X: LazyLock<VersionRange> = LazyLock::new(|| {
    VersionRange::new(Version::new(4, 5, 0), true, Some(Version::new(5, 0, 0)), false)
});

/// Windows zip archives for every release from 6.2.1 on.
static WINDOWS_ZIP: LazyLock<VersionRange> =
    LazyLock::new(|| VersionRange::at_least(Version::new(6, 2, 1)));

/// 0.x Windows installers lived at the release root (x86) and under `x64/`.
static WINDOWS_LEGACY_MSI: LazyLock<VersionRange> = LazyLock::new(|| {
    VersionRange::new(Version::new(0, 0, 0), true, Some(Version::new(1, 0, 0)), false)
});

static DARWIN_ARM64: LazyLock<VersionRange> =
    LazyLock::new(|| VersionRange::at_least(Version::new(16, 0, 0)));

/// Operating systems Node.js is distributed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
    Darwin,
    SunOs,
    Aix,
}

impl Platform {
    /// Map an operating system name (`std::env::consts::OS` style, or the
    /// name Node.js uses) to a platform.
    pub fn from_os(os: &str) -> Result<Self> {
        match os.trim().to_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "windows" | "win" | "win32" => Ok(Platform::Windows),
            "macos" | "darwin" | "mac os x" => Ok(Platform::Darwin),
            "solaris" | "sunos" | "illumos" => Ok(Platform::SunOs),
            "aix" => Ok(Platform::Aix),
            _ => Err(Error::UnknownPlatform(os.to_string())),
        }
    }

    /// The platform this crate was compiled for.
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Name used in distribution archive names.
    pub fn code(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "win",
            Platform::Darwin => "darwin",
            Platform::SunOs => "sunos",
            Platform::Aix => "aix",
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Processor architectures Node.js is distributed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cpu {
    X86,
    X64,
    Arm64,
    ArmV6l,
    ArmV7l,
    Ppc64le,
    S390x,
}

impl Cpu {
    /// Map an architecture name (`std::env::consts::ARCH` style, `uname -m`
    /// output, or the name Node.js uses) to a cpu.
    pub fn from_arch(arch: &str) -> Result<Self> {
        match arch.trim().to_lowercase().as_str() {
            "x86" | "i386" | "i486" | "i586" | "i686" => Ok(Cpu::X86),
            "x86_64" | "amd64" | "x64" => Ok(Cpu::X64),
            "aarch64" | "arm64" => Ok(Cpu::Arm64),
            "armv6l" => Ok(Cpu::ArmV6l),
            "arm" | "armv7l" => Ok(Cpu::ArmV7l),
            "powerpc64" | "ppc64le" | "ppc64" => Ok(Cpu::Ppc64le),
            "s390x" => Ok(Cpu::S390x),
            _ => Err(Error::UnknownCpu(arch.to_string())),
        }
    }

    /// The cpu this crate was compiled for.
    pub fn current() -> Result<Self> {
        Self::from_arch(std::env::consts::ARCH)
    }

    /// Name used in distribution archive names.
    pub fn code(&self) -> &'static str {
        match self {
            Cpu::X86 => "x86",
            Cpu::X64 => "x64",
            Cpu::Arm64 => "arm64",
            Cpu::ArmV6l => "armv6l",
            Cpu::ArmV7l => "armv7l",
            Cpu::Ppc64le => "ppc64le",
            Cpu::S390x => "s390x",
        }
    }
}

impl fmt::Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether `version` is known to have no installable distribution.
pub fn is_blacklisted(version: &Version) -> bool {
    NO_BINARIES.includes(version) || *version == BROKEN_RELEASE
}

/// Resolve the archive path of `version` relative to its release directory.
///
/// # Examples
///
/// ```
/// use nodejs_provision::{resolve_install_path, Cpu, Platform, Version};
///
/// let path = resolve_install_path(&Version::new(18, 17, 0), Platform::Linux, Cpu::X64).unwrap();
/// assert_eq!(path, "node-v18.17.0-linux-x64.tar.gz");
/// ```
pub fn resolve_install_path(version: &Version, platform: Platform, cpu: Cpu) -> Result<String> {
    if is_blacklisted(version) {
        return Err(Error::UnsupportedVersion(*version));
    }

    let unsupported = || Error::UnsupportedPlatform {
        version: *version,
        platform,
        cpu,
    };

    let path = match platform {
        Platform::Windows => {
            if !matches!(cpu, Cpu::X86 | Cpu::X64 | Cpu::Arm64) {
                return Err(unsupported());
            }

            if WINDOWS_ZIP_4X.includes(version) || WINDOWS_ZIP.includes(version) {
                format!("node-v{}-win-{}.zip", version, cpu)
            } else if cpu == Cpu::Arm64 {
                return Err(unsupported());
            } else if WINDOWS_LEGACY_MSI.includes(version) && cpu == Cpu::X64 {
                format!("x64/node-v{}-x64.msi", version)
            } else {
                format!("node-v{}-{}.msi", version, cpu)
            }
        }
        Platform::Darwin => {
            if cpu == Cpu::Arm64 && !DARWIN_ARM64.includes(version) {
                return Err(unsupported());
            }
            if !matches!(cpu, Cpu::X86 | Cpu::X64 | Cpu::Arm64) {
                return Err(unsupported());
            }
            format!("node-v{}-darwin-{}.tar.gz", version, cpu)
        }
        _ => format!("node-v{}-{}-{}.tar.gz", version, platform, cpu),
    };

    debug!(%version, %platform, %cpu, path = %path, "Resolved installer path");

    Ok(path)
}

/// Build the download URL for a release archive.
///
/// A non-blank `mirror` replaces `base_url`, so installers pointed at an
/// internal mirror keep the official layout.
///
/// # Examples
///
/// ```
/// use nodejs_provision::{resolve_download_url, Cpu, Platform, Version, DEFAULT_DIST_URL};
///
/// let url = resolve_download_url(
///     DEFAULT_DIST_URL,
///     Some("https://mirror.example.com/node"),
///     &Version::new(20, 11, 1),
///     Platform::Windows,
///     Cpu::X64,
/// )
/// .unwrap();
/// assert_eq!(url, "https://mirror.example.com/node/v20.11.1/node-v20.11.1-win-x64.zip");
/// ```
pub fn resolve_download_url(
    base_url: &str,
    mirror: Option<&str>,
    version: &Version,
    platform: Platform,
    cpu: Cpu,
) -> Result<String> {
    let root = mirror
        .map(str::trim)
        .filter(|mirror| !mirror.is_empty())
        .unwrap_or(base_url)
        .trim();

    Url::parse(root).map_err(|e| Error::InvalidUrl {
        url: root.to_string(),
        message: e.to_string(),
    })?;

    let path = resolve_install_path(version, platform, cpu)?;

    Ok(format!(
        "{}/v{}/{}",
        root.trim_end_matches('/'),
        version,
        path
    ))
}
