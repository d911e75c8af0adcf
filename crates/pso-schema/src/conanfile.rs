//! The INI-style `conanfile.txt` encoding of a package manifest.
//!
//! `conanfile.txt` carries no package identity, only sections. The `[requires]`
//! and `[generators]` sections map onto the manifest; the other sections the
//! package tool understands are accepted and skipped.

use crate::manifest::{DependencyRef, Generator, ManifestError, PackageManifest};
use crate::types::{PackageName, VersionId};
use std::fmt::Write;

const SKIPPED_SECTIONS: &[&str] = &[
    "options",
    "imports",
    "tool_requires",
    "build_requires",
    "test_requires",
    "layout",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConanfileSections {
    pub requires: Vec<DependencyRef>,
    pub generators: Vec<Generator>,
}

enum Section {
    Requires,
    Generators,
    Skipped,
}

pub fn parse_conanfile_str(input: &str) -> Result<ConanfileSections, ManifestError> {
    let mut sections = ConanfileSections::default();
    let mut current = None;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let Some(name) = header.strip_suffix(']') else {
                return Err(ManifestError::Conanfile {
                    line: line_no,
                    message: format!("unterminated section header '{line}'"),
                });
            };
            current = Some(match name.trim() {
                "requires" => Section::Requires,
                "generators" => Section::Generators,
                other if SKIPPED_SECTIONS.contains(&other) => Section::Skipped,
                other => {
                    return Err(ManifestError::Conanfile {
                        line: line_no,
                        message: format!("unknown section '[{other}]'"),
                    })
                }
            });
            continue;
        }

        let wrap = |e: ManifestError| ManifestError::Conanfile {
            line: line_no,
            message: e.to_string(),
        };
        match current {
            Some(Section::Requires) => sections.requires.push(line.parse().map_err(wrap)?),
            Some(Section::Generators) => sections.generators.push(line.parse().map_err(wrap)?),
            Some(Section::Skipped) => {}
            None => {
                return Err(ManifestError::Conanfile {
                    line: line_no,
                    message: format!("'{line}' appears before any section header"),
                })
            }
        }
    }

    Ok(sections)
}

impl PackageManifest {
    /// Build a manifest from `conanfile.txt` sections plus the package identity
    /// that the file itself does not carry.
    pub fn from_conanfile(
        name: impl Into<String>,
        version: impl Into<String>,
        sections: ConanfileSections,
    ) -> Self {
        Self {
            name: PackageName::new(name),
            version: VersionId::new(version),
            generators: sections.generators,
            requires: sections.requires,
        }
    }

    /// Render the `[requires]` and `[generators]` sections.
    pub fn to_conanfile_txt(&self) -> String {
        let mut out = String::from("[requires]\n");
        for dep in &self.requires {
            let _ = writeln!(out, "{dep}");
        }
        out.push_str("\n[generators]\n");
        for generator in &self.generators {
            let _ = writeln!(out, "{generator}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse_manifest_str;

    #[test]
    fn parses_requires_and_generators() {
        let input = "\
# PSO dependencies
[requires]
toml11/3.6.0

[generators]
cmake_find_package
";
        let sections = parse_conanfile_str(input).unwrap();
        assert_eq!(sections.requires, vec![DependencyRef::new("toml11", "3.6.0")]);
        assert_eq!(sections.generators, vec![Generator::CmakeFindPackage]);
    }

    #[test]
    fn skips_known_sections() {
        let input = "\
[requires]
toml11/3.6.0
[options]
toml11:shared=False
[imports]
lib, *.so -> ./lib
";
        let sections = parse_conanfile_str(input).unwrap();
        assert_eq!(sections.requires.len(), 1);
        assert!(sections.generators.is_empty());
    }

    #[test]
    fn rejects_unknown_section() {
        let err = parse_conanfile_str("[package]\nname=PSO\n").unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");
    }

    #[test]
    fn rejects_entry_outside_section() {
        assert!(parse_conanfile_str("toml11/3.6.0\n").is_err());
    }

    #[test]
    fn reports_line_of_bad_requirement() {
        let err = parse_conanfile_str("[requires]\n\ntoml11\n").unwrap_err();
        assert!(err.to_string().starts_with("conanfile.txt line 3"), "{err}");
    }

    #[test]
    fn roundtrips_shipped_manifest() {
        let manifest = parse_manifest_str(include_str!("../../../pso.toml")).unwrap();
        let txt = manifest.to_conanfile_txt();
        let sections = parse_conanfile_str(&txt).unwrap();
        let back = PackageManifest::from_conanfile("PSO", "0.1.5", sections);
        assert_eq!(back, manifest);
    }
}
