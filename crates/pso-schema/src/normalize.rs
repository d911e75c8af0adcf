use crate::manifest::{DependencyRef, Generator, ManifestError, PackageManifest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Validated, canonical representation of a package manifest.
///
/// Name and version are trimmed and non-empty, every version is a semantic
/// version, generators are sorted and unique, requirements keep their
/// declaration order and are unique by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedManifest {
    pub name: String,
    pub version: String,
    pub generators: Vec<Generator>,
    pub requires: Vec<DependencyRef>,
}

impl PackageManifest {
    /// Validate the manifest and produce its canonical form.
    pub fn normalize(&self) -> Result<NormalizedManifest, ManifestError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(ManifestError::EmptyName);
        }

        let version = self.version.trim().to_owned();
        if version.is_empty() {
            return Err(ManifestError::EmptyVersion);
        }
        check_version(&name, &version)?;

        let mut generators = BTreeSet::new();
        for generator in &self.generators {
            if !generators.insert(*generator) {
                return Err(ManifestError::DuplicateGenerator(generator.to_string()));
            }
        }

        let mut seen = BTreeSet::new();
        let mut requires = Vec::with_capacity(self.requires.len());
        for dep in &self.requires {
            if !seen.insert(dep.name.as_str()) {
                return Err(ManifestError::DuplicateDependency(dep.name.to_string()));
            }
            check_version(&dep.name, &dep.version)?;
            requires.push(dep.clone());
        }

        Ok(NormalizedManifest {
            name,
            version,
            generators: generators.into_iter().collect(),
            requires,
        })
    }
}

impl NormalizedManifest {
    pub fn canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Semver, or the looser Conan form: dot-separated alphanumeric segments
/// such as `1.1.1k`, `3.6` or `cci.20210910`.
fn check_version(subject: &str, version: &str) -> Result<(), ManifestError> {
    let semver_err = match semver::Version::parse(version) {
        Ok(_) => return Ok(()),
        Err(e) => e,
    };
    let invalid = |reason: String| ManifestError::InvalidVersion {
        subject: subject.to_owned(),
        version: version.to_owned(),
        reason,
    };
    if version.is_empty() {
        return Err(invalid(semver_err.to_string()));
    }
    for segment in version.split('.') {
        if segment.is_empty() {
            return Err(invalid("empty version segment".to_owned()));
        }
        if let Some(c) = segment
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(invalid(format!("unexpected character '{c}'")));
        }
    }
    Ok(())
}
