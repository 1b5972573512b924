// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fs;

use range_dispatch_core::DispatchConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HomeworkConfig {
    pub fill_rows: usize,
    pub fill_cols: usize,
    pub max_len: usize,
    pub sum_len: usize,
    pub prefix_len: usize,
    pub mul_rows: usize,
    pub mul_inner: usize,
    pub mul_cols: usize,
    /// Random operands for matrix-mul instead of `i + j`
    pub random_matrices: bool,
    pub dispatch: DispatchConfig,
}

impl Default for HomeworkConfig {
    fn default() -> Self {
        Self {
            fill_rows: 16,
            fill_cols: 16,
            max_len: 20,
            sum_len: 10_000_000,
            prefix_len: 10,
            mul_rows: 3,
            mul_inner: 3,
            mul_cols: 1,
            random_matrices: false,
            dispatch: DispatchConfig::default(),
        }
    }
}

impl HomeworkConfig {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: HomeworkConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Loads `path`, falling back to the defaults when it is missing or malformed
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(path, error = %e, "using default homework configuration");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: HomeworkConfig =
            serde_json::from_str(r#"{ "sum_len": 42, "dispatch": { "concurrency": 2 } }"#).unwrap();
        assert_eq!(config.sum_len, 42);
        assert_eq!(config.fill_rows, 16);
        assert_eq!(config.dispatch.concurrency, Some(2));
        assert_eq!(config.dispatch.dynamic_chunk_size, 1);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("homework-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let path = path.to_string_lossy().into_owned();

        assert!(HomeworkConfig::load(&path).is_err());
        let config = HomeworkConfig::load_or_default(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.sum_len, 10_000_000);
        assert_eq!(config.dispatch.concurrency, None);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = HomeworkConfig::load_or_default("does-not-exist.json");
        assert_eq!(config.max_len, 20);
        assert!(!config.random_matrices);
    }
}
