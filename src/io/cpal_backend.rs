//! CPAL audio backend
//!
//! Opens a fixed-format stream: stereo, `f32`, the configured sample rate
//! and a fixed buffer size. If the device refuses that format the stream
//! fails to build and the error surfaces from engine start-up; nothing is
//! renegotiated behind the caller's back.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, OutputCallbackInfo, SampleRate, Stream, StreamConfig};

use super::{AudioBackend, BackendStream};
use crate::{
    config::EngineConfig,
    engine::mixer::Mixer,
    error::{EngineError, EngineResult},
    CHANNELS,
};

/// Output through the default host, on its default device unless a device
/// name was given.
#[derive(Debug, Clone, Default)]
pub struct CpalBackend {
    device_name: Option<String>,
}

impl CpalBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the output device with exactly this name.
    pub fn with_device(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
        }
    }

    fn select_device(&self) -> EngineResult<Device> {
        let host = cpal::default_host();
        let mut devices = host
            .output_devices()
            .map_err(|e| EngineError::ConfigError(e.to_string()))?
            .peekable();
        if devices.peek().is_none() {
            return Err(EngineError::NoDevices);
        }

        match &self.device_name {
            Some(name) => devices
                .find(|d| d.name().ok().as_ref() == Some(name))
                .ok_or_else(|| EngineError::ConfigError(format!("output device not found: {name}"))),
            None => host.default_output_device().ok_or(EngineError::NoDefaultDevice),
        }
    }
}

impl AudioBackend for CpalBackend {
    type Stream = CpalStream;

    fn open(&mut self, config: &EngineConfig, mixer: Mixer) -> EngineResult<CpalStream> {
        let device = self.select_device()?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        log::info!("Using audio device: {}", device_name);

        let stream_config = StreamConfig {
            channels: CHANNELS as u16,
            sample_rate: SampleRate(config.sample_rate),
            buffer_size: BufferSize::Fixed(config.frames_per_buffer),
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &OutputCallbackInfo| mixer.process(data),
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| EngineError::StreamBuildError(e.to_string()))?;

        log::info!(
            "Audio config: {} channels, {}Hz, {} frames (~{:.1}ms latency)",
            stream_config.channels,
            config.sample_rate,
            config.frames_per_buffer,
            config.latency_ms()
        );

        Ok(CpalStream { stream })
    }
}

/// Live CPAL stream. Dropping it closes the device.
pub struct CpalStream {
    stream: Stream,
}

impl BackendStream for CpalStream {
    fn start(&self) -> EngineResult<()> {
        self.stream
            .play()
            .map_err(|e| EngineError::StreamPlayError(e.to_string()))
    }

    fn stop(&self) -> EngineResult<()> {
        self.stream
            .pause()
            .map_err(|e| EngineError::StreamPauseError(e.to_string()))
    }
}
