use super::{json_pretty, styled_ok, EXIT_SUCCESS};
use crate::ManifestFormat;
use pso_schema::{parse_conanfile_str, parse_manifest_file, ConanfileSections, PackageManifest};
use std::path::Path;

fn load(manifest_path: &Path) -> Result<PackageManifest, String> {
    parse_manifest_file(manifest_path).map_err(|e| format!("manifest error: {e}"))
}

/// Compare a conanfile.txt against the manifest. Generators compare as sets,
/// requirements in order.
fn conanfile_drift(manifest: &PackageManifest, sections: &ConanfileSections) -> Option<String> {
    if sections.requires != manifest.requires {
        let list = |deps: &[pso_schema::DependencyRef]| {
            deps.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        return Some(format!(
            "requires differ: manifest [{}], conanfile.txt [{}]",
            list(manifest.requires.as_slice()),
            list(sections.requires.as_slice())
        ));
    }
    let mut ours = manifest.generators.clone();
    let mut theirs = sections.generators.clone();
    ours.sort();
    theirs.sort();
    if ours != theirs {
        return Some("generators differ between manifest and conanfile.txt".to_owned());
    }
    None
}

pub fn check(manifest_path: &Path, conanfile: Option<&Path>, json: bool) -> Result<u8, String> {
    let manifest = load(manifest_path)?;
    let normalized = manifest
        .normalize()
        .map_err(|e| format!("manifest error: {e}"))?;

    if let Some(path) = conanfile {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("manifest error: failed to read {}: {e}", path.display()))?;
        let sections = parse_conanfile_str(&content).map_err(|e| format!("manifest error: {e}"))?;
        if let Some(drift) = conanfile_drift(&manifest, &sections) {
            return Err(format!("manifest error: {drift}"));
        }
    }

    if json {
        let payload = serde_json::json!({
            "status": "ok",
            "manifest": manifest_path,
            "package": normalized,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "{} {} {} ({} requirement(s), {} generator(s))",
            styled_ok("manifest ok:"),
            normalized.name,
            normalized.version,
            normalized.requires.len(),
            normalized.generators.len()
        );
    }
    Ok(EXIT_SUCCESS)
}

pub fn show(manifest_path: &Path, format: ManifestFormat, json: bool) -> Result<u8, String> {
    let manifest = load(manifest_path)?;
    manifest
        .normalize()
        .map_err(|e| format!("manifest error: {e}"))?;

    if json {
        println!("{}", json_pretty(&manifest)?);
        return Ok(EXIT_SUCCESS);
    }
    match format {
        ManifestFormat::Toml => {
            let toml = manifest
                .to_toml()
                .map_err(|e| format!("manifest error: {e}"))?;
            print!("{toml}");
        }
        ManifestFormat::Conanfile => print!("{}", manifest.to_conanfile_txt()),
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pso_schema::parse_manifest_str;

    fn shipped() -> PackageManifest {
        parse_manifest_str(include_str!("../../../../pso.toml")).unwrap()
    }

    #[test]
    fn matching_conanfile_has_no_drift() {
        let manifest = shipped();
        let sections =
            parse_conanfile_str("[generators]\ncmake_find_package\n[requires]\ntoml11/3.6.0\n")
                .unwrap();
        assert!(conanfile_drift(&manifest, &sections).is_none());
    }

    #[test]
    fn different_requirement_is_drift() {
        let manifest = shipped();
        let sections =
            parse_conanfile_str("[requires]\ntoml11/3.7.0\n[generators]\ncmake_find_package\n")
                .unwrap();
        let drift = conanfile_drift(&manifest, &sections).unwrap();
        assert!(drift.contains("toml11/3.7.0"), "{drift}");
    }

    #[test]
    fn missing_generator_is_drift() {
        let manifest = shipped();
        let sections = parse_conanfile_str("[requires]\ntoml11/3.6.0\n").unwrap();
        assert!(conanfile_drift(&manifest, &sections).is_some());
    }
}
