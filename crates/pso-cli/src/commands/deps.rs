use super::{json_pretty, EXIT_SUCCESS};
use pso_schema::parse_manifest_file;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct DependencyRow<'a> {
    name: &'a str,
    version: &'a str,
}

/// Print the requirements declared by the manifest, in declaration order.
/// Nothing is resolved or fetched.
pub fn run(manifest_path: &Path, json: bool) -> Result<u8, String> {
    let manifest =
        parse_manifest_file(manifest_path).map_err(|e| format!("manifest error: {e}"))?;
    let normalized = manifest
        .normalize()
        .map_err(|e| format!("manifest error: {e}"))?;

    if json {
        let rows: Vec<DependencyRow<'_>> = normalized
            .requires
            .iter()
            .map(|d| DependencyRow {
                name: d.name.as_str(),
                version: d.version.as_str(),
            })
            .collect();
        println!("{}", json_pretty(&rows)?);
    } else {
        for dep in &normalized.requires {
            println!("{} {}", dep.name, dep.version);
        }
    }
    Ok(EXIT_SUCCESS)
}
