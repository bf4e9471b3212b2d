use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

const DEFAULT_CONFIG_PATH: &str = "config/app.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_path: String,
    pub frontend_dir: String,
    pub max_upload_bytes: usize,
    pub workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let frontend_dir = if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
            format!("{}/../frontend/dist", manifest_dir)
        } else {
            "/usr/src/app/frontend/dist".to_string()
        };

        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            model_path: "models/image_classifier_model.onnx".to_string(),
            frontend_dir,
            max_upload_bytes: 50 * 1024 * 1024,
            workers: 1,
        }
    }
}

impl AppConfig {
    /// Defaults, then the YAML file named by `APP_CONFIG` (or `config/app.yaml`
    /// when present), then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("APP_CONFIG") {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_yaml_file(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(config_str: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(config_str)?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_value("PORT", &port)?;
        }
        if let Some(model_path) = lookup("MODEL_PATH") {
            self.model_path = model_path;
        }
        if let Some(frontend_dir) = lookup("FRONTEND_DIR") {
            self.frontend_dir = frontend_dir;
        }
        if let Some(max_upload_bytes) = lookup("MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = parse_value("MAX_UPLOAD_BYTES", &max_upload_bytes)?;
        }
        if let Some(workers) = lookup("WORKERS") {
            self.workers = parse_value("WORKERS", &workers)?;
        }

        if self.workers == 0 {
            return Err(ConfigError::InvalidValue {
                key: "workers".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let config = AppConfig::from_yaml_str("port: 9000\nmodel_path: /srv/cifar.onnx\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.model_path, "/srv/cifar.onnx");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.workers, 1);
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn env_overrides_take_precedence() {
        let vars: HashMap<&str, &str> = [("PORT", "7000"), ("HOST", "127.0.0.1"), ("WORKERS", "2")]
            .into_iter()
            .collect();
        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:7000");
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(|key| (key == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORT"));
    }

    #[test]
    fn zero_workers_is_rejected() {
        let mut config = AppConfig::default();
        assert!(config
            .apply_overrides(|key| (key == "WORKERS").then(|| "0".to_string()))
            .is_err());
    }
}
