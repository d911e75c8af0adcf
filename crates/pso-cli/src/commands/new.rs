use super::{json_pretty, write_atomic, EXIT_SUCCESS};
use pso_schema::{get_preset, list_presets, parse_config_str, OptimizerConfig};
use std::path::Path;

fn load_template(name: &str) -> Result<OptimizerConfig, String> {
    let preset = get_preset(name).ok_or_else(|| {
        let known: Vec<&str> = list_presets().iter().map(|p| p.name).collect();
        format!(
            "unknown template '{name}' (expected: {})",
            known.join(", ")
        )
    })?;
    parse_config_str(preset.config).map_err(|e| format!("template parse error: {e}"))
}

pub fn run(template: &str, output: &Path, force: bool, json: bool) -> Result<u8, String> {
    let config = load_template(template)?;
    if output.exists() && !force {
        return Err(format!(
            "refusing to overwrite existing {} (pass --force)",
            output.display()
        ));
    }

    // Rendered from the parsed preset so every default is spelled out.
    let toml = config
        .to_toml()
        .map_err(|e| format!("TOML serialization failed: {e}"))?;
    write_atomic(output, &toml)?;

    if json {
        let payload = serde_json::json!({
            "status": "written",
            "path": output,
            "template": template,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("wrote {} from template '{template}'", output.display());
    }
    Ok(EXIT_SUCCESS)
}
