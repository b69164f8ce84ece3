// File: dynaform/src/config.rs
// Purpose: Form behavior configuration parsed from dynaform.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Form configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FormConfig {
    #[serde(default)]
    pub schema: SchemaConfig,

    #[serde(default)]
    pub reactor: ReactorConfig,

    #[serde(default)]
    pub files: FileConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// How the builder treats a schema with structural problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPolicy {
    /// Degrade silently: unknown types, dangling references and duplicates are tolerated
    #[default]
    Lenient,
    /// Refuse the schema with a `SchemaError` listing every issue
    Strict,
}

/// How dependent fields react to their parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CascadeMode {
    /// Each dependent reacts to its own parent's value only
    #[default]
    Independent,
    /// Dependents are evaluated over the whole graph; a disabled parent disables its dependents
    Cascade,
}

/// Whether a picked file is also written into the control's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilePatchPolicy {
    /// Keep the file in the attachment map only
    #[default]
    AttachOnly,
    /// Also set the control's value to the file handle
    PatchControl,
}

/// Visual variant passed through to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Fill,
    #[default]
    Outline,
    Standard,
    Legacy,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SchemaConfig {
    #[serde(default)]
    pub policy: SchemaPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactorConfig {
    #[serde(default)]
    pub cascade: CascadeMode,

    /// Capacity of the change-event channel
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub patch_policy: FilePatchPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    #[serde(default)]
    pub appearance: Appearance,
}

fn default_event_capacity() -> usize {
    256
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            cascade: CascadeMode::default(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl FormConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: FormConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./dynaform.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("dynaform.toml")
    }

    pub fn strict() -> Self {
        let mut config = Self::default();
        config.schema.policy = SchemaPolicy::Strict;
        config
    }

    pub fn with_cascade(mut self, cascade: CascadeMode) -> Self {
        self.reactor.cascade = cascade;
        self
    }

    pub fn with_file_patch(mut self, policy: FilePatchPolicy) -> Self {
        self.files.patch_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FormConfig::default();
        assert_eq!(config.schema.policy, SchemaPolicy::Lenient);
        assert_eq!(config.reactor.cascade, CascadeMode::Independent);
        assert_eq!(config.reactor.event_capacity, 256);
        assert_eq!(config.files.patch_policy, FilePatchPolicy::AttachOnly);
        assert_eq!(config.display.appearance, Appearance::Outline);
    }

    #[test]
    fn test_custom_config() {
        let toml = r#"
            [schema]
            policy = "strict"

            [reactor]
            cascade = "cascade"

            [files]
            patch_policy = "patch_control"

            [display]
            appearance = "fill"
        "#;
        let config: FormConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.schema.policy, SchemaPolicy::Strict);
        assert_eq!(config.reactor.cascade, CascadeMode::Cascade);
        assert_eq!(config.reactor.event_capacity, 256);
        assert_eq!(config.files.patch_policy, FilePatchPolicy::PatchControl);
        assert_eq!(config.display.appearance, Appearance::Fill);
    }

    #[test]
    fn test_missing_and_empty_files_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FormConfig::load(dir.path().join("nope.toml")).unwrap();
        assert_eq!(missing, FormConfig::default());

        let empty_path = dir.path().join("empty.toml");
        std::fs::File::create(&empty_path).unwrap();
        assert_eq!(FormConfig::load(&empty_path).unwrap(), FormConfig::default());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[schema]\npolicy = \"sometimes\"").unwrap();

        let err = FormConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
