//! Plugin parameters (`protoc --gdscript_opt=option=http,res_root=res://proto/`).

use gdproto_binding::DEFAULT_BINDING_OPTION;
use thiserror::Error;

pub const DEFAULT_RES_ROOT: &str = "res://";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Name of the `MethodOptions` extension holding the binding string.
    pub binding_option: String,
    /// Prefix of the `preload` paths in generated loader files.
    pub res_root: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            binding_option: DEFAULT_BINDING_OPTION.to_string(),
            res_root: DEFAULT_RES_ROOT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("plugin parameter `{0}` is not of the form key=value")]
    MissingValue(String),

    #[error("plugin parameter `{0}` has an empty value")]
    EmptyValue(String),

    #[error("unknown plugin parameter `{0}` (expected `option` or `res_root`)")]
    UnknownKey(String),
}

impl GeneratorConfig {
    pub fn from_parameter(parameter: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let Some(parameter) = parameter else {
            return Ok(config);
        };

        for part in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| ConfigError::MissingValue(part.to_string()))?;
            let (key, value) = (key.trim(), value.trim());
            if value.is_empty() {
                return Err(ConfigError::EmptyValue(key.to_string()));
            }
            match key {
                "option" => config.binding_option = value.to_string(),
                "res_root" => {
                    config.res_root = if value.ends_with('/') {
                        value.to_string()
                    } else {
                        format!("{value}/")
                    }
                }
                _ => return Err(ConfigError::UnknownKey(key.to_string())),
            }
        }

        Ok(config)
    }
}
