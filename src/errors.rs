//! Error Types
//!
//! This module defines the error type used throughout the crate.
//!
//! # Overview
//!
//! [`KeyportalError`] covers the failure modes the landing scene can hit:
//! - Asset loading and decoding errors
//! - Configuration parsing errors
//! - Navigation and windowing errors
//!
//! Most of these are absorbed close to where they happen (a key whose model
//! fails to load simply stays inert), but every fallible API still returns
//! [`Result<T>`] so the host decides what to surface.

use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum KeyportalError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Asset index out of bounds.
    #[error("Asset index out of bounds: {context} (index: {index})")]
    AssetIndexOutOfBounds {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
    },

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// HTTP response error with status code.
    #[error("HTTP response error: status {status}")]
    HttpResponseError {
        /// HTTP status code
        status: u16,
    },

    /// HTTP transport error (WASM fetch).
    #[error("HTTP error: {0}")]
    HttpError(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A configuration value is out of its valid range.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Host Errors
    // ========================================================================
    /// The navigation sink refused or failed to open a destination.
    #[error("Navigation to {url} failed: {reason}")]
    NavigationFailed {
        /// Destination that was requested
        url: String,
        /// Host-provided reason
        reason: String,
    },

    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    /// Async loader task failed to complete.
    #[error("Task join error: {0}")]
    TaskJoinError(String),

    /// WASM-specific error.
    #[cfg(target_arch = "wasm32")]
    #[error("WASM error: {0}")]
    WasmError(String),
}

impl From<gltf::Error> for KeyportalError {
    fn from(err: gltf::Error) -> Self {
        KeyportalError::GltfError(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<tokio::task::JoinError> for KeyportalError {
    fn from(err: tokio::task::JoinError) -> Self {
        KeyportalError::TaskJoinError(err.to_string())
    }
}

/// Alias for `Result<T, KeyportalError>`.
pub type Result<T> = std::result::Result<T, KeyportalError>;
