pub mod check;
pub mod replay;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dynaform::{FormConfig, FormSchema};

/// Read a schema, picking the format from the file extension
pub fn load_schema(path: &Path) -> Result<FormSchema> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {:?}", path))?;

    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    let schema = if is_toml {
        FormSchema::from_toml(&content)
    } else {
        FormSchema::from_json(&content)
    };

    schema.with_context(|| format!("Failed to parse schema file: {:?}", path))
}

/// Explicit config file, or ./dynaform.toml, or defaults
pub fn load_config(path: Option<&Path>) -> Result<FormConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {:?}", path);
            }
            FormConfig::load(path)
        }
        None => FormConfig::load_default(),
    }
}
