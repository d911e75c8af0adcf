use crate::types::{PackageName, VersionId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("failed to serialize manifest: {0}")]
    SerializeToml(#[from] toml::ser::Error),
    #[error("package name must not be empty")]
    EmptyName,
    #[error("package version must not be empty")]
    EmptyVersion,
    #[error("invalid version '{version}' for '{subject}': {reason}")]
    InvalidVersion {
        subject: String,
        version: String,
        reason: String,
    },
    #[error("invalid requirement '{0}', expected '<name>/<version>'")]
    InvalidReference(String),
    #[error("unknown generator '{0}'")]
    UnknownGenerator(String),
    #[error("generator '{0}' is listed more than once")]
    DuplicateGenerator(String),
    #[error("dependency '{0}' is required more than once")]
    DuplicateDependency(String),
    #[error("conanfile.txt line {line}: {message}")]
    Conanfile { line: usize, message: String },
}

/// Build-file generator understood by the consuming package tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Generator {
    Cmake,
    CmakeMulti,
    CmakePaths,
    CmakeFindPackage,
    CmakeFindPackageMulti,
    CMakeDeps,
    CMakeToolchain,
    PkgConfig,
    PkgConfigDeps,
    Txt,
}

impl Generator {
    pub const ALL: &'static [Generator] = &[
        Generator::Cmake,
        Generator::CmakeMulti,
        Generator::CmakePaths,
        Generator::CmakeFindPackage,
        Generator::CmakeFindPackageMulti,
        Generator::CMakeDeps,
        Generator::CMakeToolchain,
        Generator::PkgConfig,
        Generator::PkgConfigDeps,
        Generator::Txt,
    ];

    /// The tag as written in a manifest.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cmake => "cmake",
            Self::CmakeMulti => "cmake_multi",
            Self::CmakePaths => "cmake_paths",
            Self::CmakeFindPackage => "cmake_find_package",
            Self::CmakeFindPackageMulti => "cmake_find_package_multi",
            Self::CMakeDeps => "CMakeDeps",
            Self::CMakeToolchain => "CMakeToolchain",
            Self::PkgConfig => "pkg_config",
            Self::PkgConfigDeps => "PkgConfigDeps",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Generator {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == tag)
            .ok_or_else(|| ManifestError::UnknownGenerator(tag.to_owned()))
    }
}

impl TryFrom<String> for Generator {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Generator> for String {
    fn from(value: Generator) -> Self {
        value.as_str().to_owned()
    }
}

/// A `name/version` requirement on an external library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DependencyRef {
    pub name: PackageName,
    pub version: VersionId,
}

impl DependencyRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: PackageName::new(name),
            version: VersionId::new(version),
        }
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl FromStr for DependencyRef {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ManifestError::InvalidReference(s.to_owned());
        let (name, version) = s.trim().split_once('/').ok_or_else(invalid)?;
        let (name, version) = (name.trim(), version.trim());

        let well_formed = |part: &str| {
            !part.is_empty()
                && !part
                    .chars()
                    .any(|c| c.is_whitespace() || matches!(c, '/' | '@' | '#'))
        };
        if !well_formed(name) || !well_formed(version) {
            return Err(invalid());
        }

        Ok(Self::new(name, version))
    }
}

impl TryFrom<String> for DependencyRef {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DependencyRef> for String {
    fn from(value: DependencyRef) -> Self {
        value.to_string()
    }
}

/// The package manifest: identity, generator preference, and requirements.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PackageManifest {
    pub name: PackageName,
    pub version: VersionId,
    #[serde(default)]
    pub generators: Vec<Generator>,
    #[serde(default)]
    pub requires: Vec<DependencyRef>,
}

impl PackageManifest {
    /// Look up a requirement by library name.
    pub fn dependency(&self, name: &str) -> Option<&DependencyRef> {
        self.requires.iter().find(|d| d.name == name)
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &DependencyRef> {
        self.requires.iter()
    }

    pub fn to_toml(&self) -> Result<String, ManifestError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

pub fn parse_manifest_str(input: &str) -> Result<PackageManifest, ManifestError> {
    Ok(toml::from_str(input)?)
}

pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<PackageManifest, ManifestError> {
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content)
}
