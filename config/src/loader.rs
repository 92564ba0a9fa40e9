//! Reading application definitions from files and strings.

use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::definition::ApplicationDefinition;
use crate::error::{ConfigError, Result};

/// On-disk encodings of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Json,
    Yaml,
}

impl DefinitionFormat {
    /// Picks the format from the file extension (`.json`, `.yml`, `.yaml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl ApplicationDefinition {
    /// Loads a definition from a JSON or YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for an
    /// unknown extension, [`IoError`](ConfigError::IoError) if the file
    /// cannot be read, or [`JsonError`](ConfigError::JsonError) /
    /// [`YamlError`](ConfigError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format =
            DefinitionFormat::from_path(path)
                .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let definition: Self = match format {
            DefinitionFormat::Json => serde_json::from_reader(reader)?,
            DefinitionFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        debug!(
            path = %path.display(),
            ?format,
            commands = definition.commands.len() + definition.option_commands.len(),
            "Loaded application definition"
        );
        Ok(definition)
    }

    /// Parses a YAML definition.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a JSON definition.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
