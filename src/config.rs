//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::inference::TensorLayout;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Patient dataset (CSV)
    pub data_path: PathBuf,

    /// Pre-trained classifier (ONNX)
    pub model_path: PathBuf,

    /// Tensor layout the model expects
    pub model_input_layout: TensorLayout,

    /// Where uploaded scans are stored
    pub upload_dir: PathBuf,

    /// Max request body for uploads, in bytes
    pub max_upload_bytes: usize,

    /// Upper bound on decode + inference per request
    pub inference_timeout: Duration,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            data_path: PathBuf::from("data/alzheimers_data.csv"),
            model_path: PathBuf::from("alzheimer_model.onnx"),
            model_input_layout: TensorLayout::Nhwc,
            upload_dir: PathBuf::from("static/uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
            inference_timeout: Duration::from_secs(30),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            data_path: env::var("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            model_input_layout: env::var("MODEL_INPUT_LAYOUT")
                .ok()
                .and_then(|l| l.parse().ok())
                .unwrap_or(defaults.model_input_layout),

            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),

            inference_timeout: env::var("INFERENCE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.inference_timeout),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// `host:port` string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_layout() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.model_input_layout, TensorLayout::Nhwc);
        assert_eq!(config.upload_dir, PathBuf::from("static/uploads"));
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert!(!config.is_production());
    }
}
