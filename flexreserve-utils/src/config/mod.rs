//! Configuration file handling
//!
//! Model settings and patient parameter sets can be stored as TOML, JSON or
//! YAML. The format is picked from the file extension.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let extension = path.extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yml" | "yaml" => Ok(Self::Yaml),
            _ => Err(crate::UtilError::Config(
                format!("Unsupported config format: '{}' ({})", extension, path.display())
            )),
        }
    }
}

/// Parse configuration text in the given format
pub fn parse_config<T>(content: &str, format: ConfigFormat) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    match format {
        ConfigFormat::Toml => toml::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("TOML parse error: {}", e))),
        ConfigFormat::Json => serde_json::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("JSON parse error: {}", e))),
        ConfigFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("YAML parse error: {}", e))),
    }
}

/// Load configuration from file (format from extension)
pub fn load_config<T>(path: &Path) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let format = ConfigFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), ?format, "loading configuration");
    parse_config(&content, format)
}

/// Merge two JSON values (second overrides first)
fn merge_json_values(base: &mut serde_json::Value, override_value: serde_json::Value) {
    match (base, override_value) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(override_obj)) => {
            for (key, value) in override_obj {
                match base_obj.get_mut(&key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (base_value, override_value) => {
            *base_value = override_value;
        }
    }
}

/// Merge two configurations (second overrides first)
pub fn merge_configs<T>(base: &mut T, override_config: T) -> crate::Result<()>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let mut base_value = serde_json::to_value(&*base)
        .map_err(|e| crate::UtilError::Serialization(format!("Base serialization error: {}", e)))?;

    let override_value = serde_json::to_value(override_config)
        .map_err(|e| crate::UtilError::Serialization(format!("Override serialization error: {}", e)))?;

    merge_json_values(&mut base_value, override_value);

    *base = serde_json::from_value(base_value)
        .map_err(|e| crate::UtilError::Serialization(format!("Result deserialization error: {}", e)))?;

    Ok(())
}

/// Configuration builder for fluent API
#[derive(Debug)]
pub struct ConfigBuilder<T> {
    config: T,
}

impl<T> ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    /// Create new config builder with defaults
    pub fn new() -> Self {
        Self {
            config: T::default(),
        }
    }

    /// Load from file and merge
    pub fn load_file(mut self, path: &Path) -> crate::Result<Self> {
        let file_config: T = load_config(path)?;
        merge_configs(&mut self.config, file_config)?;
        Ok(self)
    }

    /// Load from file only when a path is given
    pub fn load_optional(self, path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) => self.load_file(path),
            None => Ok(self),
        }
    }

    /// Merge with another config
    pub fn merge(mut self, other: T) -> crate::Result<Self> {
        merge_configs(&mut self.config, other)?;
        Ok(self)
    }

    pub fn build(self) -> T {
        self.config
    }
}

impl<T> Default for ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct ThresholdConfig {
        threshold_deg: f64,
        step_deg: f64,
        label: String,
    }

    impl Default for ThresholdConfig {
        fn default() -> Self {
            Self {
                threshold_deg: 10.0,
                step_deg: 0.1,
                label: "default".to_string(),
            }
        }
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.JSON")).unwrap(), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")).unwrap(), ConfigFormat::Yaml);
        assert!(ConfigFormat::from_path(Path::new("a.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_load_toml() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("model.toml");
        std::fs::write(&config_path, "threshold_deg = 12.5\nstep_deg = 0.05\nlabel = \"strict\"\n")?;

        let config: ThresholdConfig = load_config(&config_path)?;

        assert_eq!(config.threshold_deg, 12.5);
        assert_eq!(config.step_deg, 0.05);
        assert_eq!(config.label, "strict");
        Ok(())
    }

    #[test]
    fn test_load_yaml_partial_uses_defaults() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("model.yaml");
        std::fs::write(&config_path, "threshold_deg: 8.0\n")?;

        let config: ThresholdConfig = load_config(&config_path)?;

        assert_eq!(config.threshold_deg, 8.0);
        assert_eq!(config.step_deg, 0.1);
        Ok(())
    }

    #[test]
    fn test_parse_error_is_config_error() {
        let result: crate::Result<ThresholdConfig> = parse_config("{ not json", ConfigFormat::Json);
        assert!(matches!(result, Err(crate::UtilError::Config(_))));
    }

    #[test]
    fn test_merge_configs() -> crate::Result<()> {
        let mut base = ThresholdConfig::default();
        let override_config = ThresholdConfig {
            threshold_deg: 15.0,
            step_deg: 0.1,
            label: "override".to_string(),
        };

        merge_configs(&mut base, override_config)?;

        assert_eq!(base.threshold_deg, 15.0);
        assert_eq!(base.label, "override");
        Ok(())
    }

    #[test]
    fn test_config_builder() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("builder.json");
        std::fs::write(&config_path, r#"{ "label": "from-file" }"#)?;

        let config: ThresholdConfig = ConfigBuilder::new()
            .load_optional(Some(&config_path))?
            .build();

        assert_eq!(config.label, "from-file");
        assert_eq!(config.threshold_deg, 10.0);

        let untouched: ThresholdConfig = ConfigBuilder::new().load_optional(None)?.build();
        assert_eq!(untouched, ThresholdConfig::default());
        Ok(())
    }
}
