//! Package manifest and optimizer configuration for PSO.
//!
//! This crate defines the schema layer: TOML manifest parsing (`PackageManifest`),
//! the `conanfile.txt` encoding of the same record, validated representations
//! (`NormalizedManifest`), optimizer configuration (`OptimizerConfig` resolved to
//! `ResolvedConfig`), and built-in configuration presets.

pub mod conanfile;
pub mod config;
pub mod manifest;
pub mod normalize;
pub mod preset;
pub mod types;

pub use conanfile::{parse_conanfile_str, ConanfileSections};
pub use config::{
    parse_config_file, parse_config_str, Bound, ConfigError, OptimizerConfig, ResolvedConfig,
};
pub use manifest::{
    parse_manifest_file, parse_manifest_str, DependencyRef, Generator, ManifestError,
    PackageManifest,
};
pub use normalize::NormalizedManifest;
pub use preset::{get_preset, list_presets, Preset, BUILTIN_PRESETS};
pub use types::{PackageName, VersionId};
