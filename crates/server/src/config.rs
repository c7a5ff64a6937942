//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the trained model artifact
    pub model_path: String,

    /// Server port
    pub port: u16,

    /// Origin allowed to call the API from a browser
    pub allowed_origin: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            model_path: env::var("CULT_CALC_MODEL").unwrap_or_else(|_| "tree_model.bin".to_string()),

            port: env::var("CULT_CALC_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            allowed_origin: env::var("CULT_CALC_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}
