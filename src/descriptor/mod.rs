//! DotSlash descriptor model.
//!
//! Field order in these structs is alphabetical so serialization yields
//! sorted keys, matching what `dotslash` tooling itself writes.

mod builder;
mod emitter;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use builder::{UnsupportedFormatError, platform_descriptor};
pub use emitter::{HEADER, emit, render};

/// The whole descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub name: String,
    pub platforms: BTreeMap<String, PlatformDescriptor>,
}

/// One platform entry: where to download the archive and what to run in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg0: Option<Arg0>,
    pub digest: String,
    pub format: ArchiveFormat,
    pub hash: HashAlgorithm,
    pub path: String,
    pub providers: Vec<Provider>,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
}

/// How `dotslash` sets `argv[0]` for the launched executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Arg0 {
    /// Point argv[0] at the extracted binary so the interpreter can find
    /// its stdlib relative to itself. Ignored on Windows.
    UnderlyingExecutable,
}

/// Archive formats `dotslash` can unpack, in matching order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchiveFormat {
    #[serde(rename = "tar.gz")]
    TarGz,
    #[serde(rename = "tar.zst")]
    TarZst,
}

impl ArchiveFormat {
    pub const ALL: [ArchiveFormat; 2] = [ArchiveFormat::TarGz, ArchiveFormat::TarZst];

    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::TarZst => "tar.zst",
        }
    }

    /// Detects the format from the end of a download URL.
    pub fn from_url(url: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| url.ends_with(&format!(".{}", format.extension())))
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
