//! Engine error types

use std::time::Duration;

use thiserror::Error;

/// Errors raised by the control plane and the audio backends.
///
/// The mixing callback itself never produces one of these.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No audio devices available
    #[error("No audio output devices found")]
    NoDevices,

    /// Host reported no default output device
    #[error("No default audio output device available")]
    NoDefaultDevice,

    /// Failed to query or negotiate a device configuration
    #[error("Failed to get device config: {0}")]
    ConfigError(String),

    /// Failed to build audio stream
    #[error("Failed to build audio stream: {0}")]
    StreamBuildError(String),

    /// Failed to start/play stream
    #[error("Failed to start audio stream: {0}")]
    StreamPlayError(String),

    /// Failed to pause stream
    #[error("Failed to stop audio stream: {0}")]
    StreamPauseError(String),

    /// Backend-specific stream failure
    #[error("Audio stream error: {0}")]
    StreamError(String),

    /// The backend never delivered a first buffer
    #[error("Audio stream produced no buffer within {0:?}")]
    StartupTimeout(Duration),

    /// Tracks must hold at least one sample
    #[error("Track must contain at least one sample")]
    EmptyTrack,
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
