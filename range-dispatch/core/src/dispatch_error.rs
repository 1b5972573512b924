// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Errors surfaced synchronously by a dispatch call, before any worker runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Range whose begin lies past its end
    InvalidRange { begin: i64, end: i64 },

    /// Dispatcher, policy or reduction set up inconsistently
    /// (seed differing from the combiner identity, zero workers, zero chunk size, ...)
    Configuration(String),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::InvalidRange { begin, end } => {
                write!(f, "Invalid range: begin {} is greater than end {}", begin, end)
            }
            DispatchError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DispatchError {}
