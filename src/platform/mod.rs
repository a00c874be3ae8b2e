//! Target platforms and the asset-matching rules for each of them.
//!
//! A platform is keyed by its DotSlash name together with the free-threading
//! flag, since the same platform name is published in both build variants.

use std::fmt;

/// Composite key identifying one entry of the platform table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Platform {
    /// DotSlash platform name, e.g. `linux-x86_64`
    pub name: &'static str,
    pub free_threaded: bool,
}

impl Platform {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            free_threaded: false,
        }
    }

    pub const fn free_threaded(name: &'static str) -> Self {
        Self {
            name,
            free_threaded: true,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.free_threaded {
            write!(f, "{} (free-threaded)", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// How to recognise a platform's asset and where its interpreter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Target triple fragment that must appear in the asset name
    pub marker: &'static str,
    /// Build flavor fragment that must also appear, when set
    pub flavor: Option<&'static str>,
    /// Interpreter path inside the extracted archive
    pub path: &'static str,
}

impl fmt::Display for PlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker={:?}", self.marker)?;
        if let Some(flavor) = self.flavor {
            write!(f, ", flavor={:?}", flavor)?;
        }
        write!(f, ", path={:?}", self.path)
    }
}

const STRIPPED: Option<&str> = Some("install_only_stripped");

/// Every platform a descriptor can be generated for, ordered by key.
pub const PLATFORMS: &[(Platform, PlatformConfig)] = &[
    (
        Platform::new("linux-aarch64"),
        PlatformConfig {
            marker: "aarch64-unknown-linux-gnu",
            flavor: STRIPPED,
            path: "python/bin/python",
        },
    ),
    (
        Platform::free_threaded("linux-aarch64"),
        PlatformConfig {
            marker: "aarch64-unknown-linux-gnu",
            flavor: Some("freethreaded+lto-full"),
            path: "python/install/bin/python",
        },
    ),
    (
        Platform::new("linux-x86_64"),
        PlatformConfig {
            marker: "x86_64_v3-unknown-linux-gnu",
            flavor: STRIPPED,
            path: "python/bin/python",
        },
    ),
    (
        Platform::free_threaded("linux-x86_64"),
        PlatformConfig {
            marker: "x86_64_v3-unknown-linux-gnu",
            flavor: Some("freethreaded+pgo+lto-full"),
            path: "python/install/bin/python",
        },
    ),
    (
        Platform::new("macos-aarch64"),
        PlatformConfig {
            marker: "aarch64-apple-darwin",
            flavor: STRIPPED,
            path: "python/bin/python",
        },
    ),
    (
        Platform::free_threaded("macos-aarch64"),
        PlatformConfig {
            marker: "aarch64-apple-darwin",
            flavor: Some("freethreaded+pgo+lto-full"),
            path: "python/install/bin/python",
        },
    ),
    (
        Platform::new("macos-x86_64"),
        PlatformConfig {
            marker: "x86_64-apple-darwin",
            flavor: STRIPPED,
            path: "python/bin/python",
        },
    ),
    (
        Platform::free_threaded("macos-x86_64"),
        PlatformConfig {
            marker: "x86_64-apple-darwin",
            flavor: Some("freethreaded+pgo+lto-full"),
            path: "python/install/bin/python",
        },
    ),
    // windows-aarch64 builds are not published in a DotSlash-compatible format yet
    (
        Platform::new("windows-x86_64"),
        PlatformConfig {
            marker: "x86_64-pc-windows-msvc-shared",
            flavor: STRIPPED,
            path: "python/python.exe",
        },
    ),
    (
        Platform::free_threaded("windows-x86_64"),
        PlatformConfig {
            marker: "x86_64-pc-windows-msvc-shared",
            flavor: Some("freethreaded+pgo-full"),
            path: "python/install/python.exe",
        },
    ),
];

/// Looks up the configuration for a platform key.
pub fn lookup(platform: &Platform) -> Option<&'static PlatformConfig> {
    PLATFORMS
        .iter()
        .find(|(p, _)| p == platform)
        .map(|(_, config)| config)
}

/// Returns the platforms of one build variant, in key order.
pub fn for_variant(free_threaded: bool) -> impl Iterator<Item = &'static (Platform, PlatformConfig)> {
    PLATFORMS
        .iter()
        .filter(move |(p, _)| p.free_threaded == free_threaded)
}
