//! Error types for the lab simulator.
//!
//! The per-tick pipeline never fails: unknown parts, dangling wires, missing
//! inputs and unparsable sketch code all degrade silently. [`LabError`]
//! covers the outer surfaces only: loading boards, validating
//! configuration, parsing CLI probes, and the WASM bridge.

use thiserror::Error;

/// Result type alias using [`LabError`].
pub type Result<T> = std::result::Result<T, LabError>;

/// Unified error type for all fallible lab simulator operations.
#[derive(Error, Debug)]
pub enum LabError {
    // ============ Board Loading Errors ============
    /// Board description is not valid JSON or has the wrong shape
    #[error("Invalid board description: {source}")]
    BoardFormat {
        #[source]
        source: serde_json::Error,
    },

    /// Two components share an id
    #[error("Duplicate component id '{id}'")]
    DuplicateComponent { id: String },

    /// A mutator addressed a component that is not on the board
    #[error("No component with id '{id}' on the board")]
    UnknownComponent { id: String },

    /// A mutator addressed a component of the wrong kind
    #[error("Component '{id}' is a {actual}, expected {expected}")]
    WrongComponentKind {
        id: String,
        expected: &'static str,
        actual: String,
    },

    // ============ Configuration Errors ============
    /// Invalid simulation parameter
    #[error("Invalid simulation parameter: {message}")]
    InvalidConfig { message: String },

    /// Probe argument is not of the form `component:pin`
    #[error("Invalid probe '{probe}' (expected <component>:<pin>)")]
    InvalidProbe { probe: String },

    // ============ I/O Errors ============
    /// Error reading a board file
    #[error("Failed to read board file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing waveform output
    #[error("Output error: {message}")]
    OutputError { message: String },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl LabError {
    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unknown component error
    pub fn unknown_component(id: impl Into<String>) -> Self {
        Self::UnknownComponent { id: id.into() }
    }

    /// Create a wrong component kind error
    pub fn wrong_kind(id: impl Into<String>, expected: &'static str, actual: impl Into<String>) -> Self {
        Self::WrongComponentKind {
            id: id.into(),
            expected,
            actual: actual.into(),
        }
    }
}

impl From<serde_json::Error> for LabError {
    fn from(source: serde_json::Error) -> Self {
        Self::BoardFormat { source }
    }
}
