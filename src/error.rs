//! Error types for the gate-level front end.
//!
//! This module provides a unified error type [`GateLevelError`] that covers
//! source-spec parsing, device classification, waveform construction and
//! the CLI/WASM data files.

use thiserror::Error;

/// Result type alias using [`GateLevelError`].
pub type Result<T> = std::result::Result<T, GateLevelError>;

/// Unified error type for all gate-level operations.
#[derive(Error, Debug)]
pub enum GateLevelError {
    // ============ Source-Spec Errors ============
    /// Error while tokenizing a source-spec string
    #[error("Lexer error at column {column} in source spec: {message}")]
    LexerError { column: usize, message: String },

    /// Source-spec string does not match `kind(arg, ...)`
    #[error("Malformed source spec '{text}': {message}")]
    SourceSpec { text: String, message: String },

    // ============ Classification Errors ============
    /// A property that must be numeric could not be parsed
    #[error("Invalid property '{property}' on '{device}': cannot parse '{value}' as a number")]
    InvalidProperty {
        device: String,
        property: String,
        value: String,
    },

    /// A required property is absent
    #[error("Device '{device}' is missing required property '{property}'")]
    MissingProperty { device: String, property: String },

    /// A required pin is not connected
    #[error("Device '{device}' has no connection on pin '{pin}'")]
    MissingPin { device: String, pin: String },

    // ============ Waveform Errors ============
    /// Times and values differ in length
    #[error("Waveform has {times} time points but {values} values")]
    WaveformLength { times: usize, values: usize },

    /// Times are not strictly increasing
    #[error("Waveform time points must be strictly increasing (index {index})")]
    WaveformOrder { index: usize },

    // ============ I/O Errors ============
    /// Error reading an input file
    #[error("Failed to read '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failure
    #[cfg(any(feature = "cli", feature = "wasm"))]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GateLevelError {
    /// Create a lexer error
    pub fn lexer(column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            column,
            message: message.into(),
        }
    }

    /// Create a malformed source-spec error
    pub fn source_spec(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceSpec {
            text: text.into(),
            message: message.into(),
        }
    }

    /// Create an invalid numeric property error
    pub fn invalid_property(
        device: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty {
            device: device.into(),
            property: property.into(),
            value: value.into(),
        }
    }

    /// Create a missing property error
    pub fn missing_property(device: impl Into<String>, property: impl Into<String>) -> Self {
        Self::MissingProperty {
            device: device.into(),
            property: property.into(),
        }
    }
}
