//! Generator configuration (optional TOML file + CLI overrides)
//!
//! ```toml
//! # C++ namespace of the generated types, `::` separated. Empty for none.
//! namespace = "Loong::Shaders"
//! # Emit the "GENERATED FILE - DO NOT EDIT" banner
//! header_banner = true
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::error::ShaderGenError;
use crate::model::is_cpp_identifier;

/// Settings that shape the generated C++.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Namespace wrapping all generated types (default: `Shaders`)
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Emit the generated-file banner (default: true)
    #[serde(rename = "header_banner", default = "default_true")]
    pub banner: bool,
}

fn default_namespace() -> String {
    "Shaders".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            banner: true,
        }
    }
}

impl GeneratorConfig {
    /// Load a config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShaderGenError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ShaderGenError::io(path, e))?;
        let config: GeneratorConfig =
            toml::from_str(&content).map_err(|e| ShaderGenError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if let Err(message) = config.validate() {
            return Err(ShaderGenError::Config {
                path: path.to_path_buf(),
                message,
            });
        }

        tracing::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Check that the namespace is empty or a `::` path of identifiers.
    pub fn validate(&self) -> Result<(), String> {
        if self.namespace.is_empty() {
            return Ok(());
        }
        match self
            .namespace
            .split("::")
            .find(|segment| !is_cpp_identifier(segment))
        {
            Some(segment) => Err(format!(
                "namespace '{}' has invalid segment '{}'",
                self.namespace, segment
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: GeneratorConfig = toml::from_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.namespace, "Shaders");
        assert!(config.banner);
    }

    #[test]
    fn test_parse_full() {
        let config: GeneratorConfig =
            toml::from_str("namespace = \"Loong::Shaders\"\nheader_banner = false\n").unwrap();
        assert_eq!(config.namespace, "Loong::Shaders");
        assert!(!config.banner);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<GeneratorConfig>("mask = 32\n").is_err());
        // the key is `header_banner`, not the field name
        assert!(toml::from_str::<GeneratorConfig>("banner = false\n").is_err());
    }

    #[test]
    fn test_load_documented_example() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shader-gen.toml");
        std::fs::write(
            &path,
            "namespace = \"Loong::Shaders\"   # C++ namespace, `::` separated\n\
             header_banner = true           # emit the GENERATED FILE banner\n",
        )
        .unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.namespace, "Loong::Shaders");
        assert!(config.banner);
    }

    #[test]
    fn test_validate_namespace() {
        let mut config = GeneratorConfig::default();
        config.namespace = String::new();
        assert!(config.validate().is_ok());

        config.namespace = "Loong::".to_string();
        assert!(config.validate().is_err());

        config.namespace = "Loong::3d".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shader-gen.toml");
        std::fs::write(&path, "namespace = \"a b\"\n").unwrap();

        let err = GeneratorConfig::load(&path).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("shader-gen.toml"));
    }
}
