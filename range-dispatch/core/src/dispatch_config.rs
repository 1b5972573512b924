// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::env::VarError;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DispatchError;

/// Environment variable overriding the worker count of [`DispatchConfig::from_env`]
pub const THREADS_ENV_VAR: &str = "RANGE_DISPATCH_THREADS";

/// Settings of a [`RangeDispatcher`](crate::RangeDispatcher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Number of workers; `None` uses the available hardware parallelism
    pub concurrency: Option<usize>,
    /// Indices per claim under dynamic scheduling when the policy sets no chunk size
    pub dynamic_chunk_size: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            dynamic_chunk_size: 1,
        }
    }
}

impl DispatchConfig {
    /// Reads a JSON config file; absent fields keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DispatchError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DispatchError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            DispatchError::Configuration(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    /// Defaults, with the worker count taken from [`THREADS_ENV_VAR`] when it is set.
    /// A value that is not a positive integer is a configuration error.
    pub fn from_env() -> Result<Self, DispatchError> {
        let config = match std::env::var(THREADS_ENV_VAR) {
            Ok(value) => Self::default().with_concurrency(parse_threads(&value)?),
            Err(VarError::NotPresent) => Self::default(),
            Err(VarError::NotUnicode(value)) => {
                return Err(DispatchError::Configuration(format!(
                    "{} is not valid unicode: {:?}",
                    THREADS_ENV_VAR, value
                )))
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    pub fn with_dynamic_chunk_size(mut self, chunk_size: usize) -> Self {
        self.dynamic_chunk_size = chunk_size;
        self
    }

    /// Worker count this config resolves to
    pub fn resolved_concurrency(&self) -> Result<usize, DispatchError> {
        match self.concurrency {
            Some(0) => Err(DispatchError::Configuration(
                "concurrency must be at least 1".to_string(),
            )),
            Some(n) => Ok(n),
            None => Ok(std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)),
        }
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        self.resolved_concurrency()?;
        if self.dynamic_chunk_size == 0 {
            return Err(DispatchError::Configuration(
                "dynamic chunk size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_threads(value: &str) -> Result<usize, DispatchError> {
    value.trim().parse().map_err(|_| {
        DispatchError::Configuration(format!(
            "{} must be a worker count, got {:?}",
            THREADS_ENV_VAR, value
        ))
    })
}
