//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info};

use crate::traits::{AudioError, AudioOutput, StreamSource};

/// Largest device buffer the callback serves without reallocating.
const SCRATCH_FRAMES: usize = 8192;

/// CPAL-based audio output.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl CpalOutput {
    /// Create a new CPAL output on the default device.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        let mut config: StreamConfig = config.into();
        // The sources produce interleaved stereo.
        config.channels = 2;

        info!(
            device = %device.name().unwrap_or_default(),
            sample_rate = config.sample_rate.0,
            "audio output opened"
        );

        Ok(Self { device, config, stream: None })
    }

    fn build_stream<S: StreamSource>(&self, source: Arc<Mutex<S>>) -> Result<Stream, AudioError> {
        let channels = self.config.channels as usize;
        let mut scratch: Vec<i16> = Vec::with_capacity(SCRATCH_FRAMES * 2);

        self.device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let frames = data.len() / channels;
                    scratch.resize(frames * 2, 0);
                    source.lock().fill(&mut scratch);

                    // Write stereo pair; zero-fill any extra channels
                    for (chunk, pair) in data.chunks_mut(channels).zip(scratch.chunks_exact(2)) {
                        for (i, sample) in chunk.iter_mut().enumerate() {
                            *sample = match i {
                                0 => pair[0] as f32 / 32768.0,
                                1 => pair[1] as f32 / 32768.0,
                                _ => 0.0,
                            };
                        }
                    }
                },
                |err| error!(error = %err, "audio stream error"),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn attach<S: StreamSource>(&mut self, source: Arc<Mutex<S>>) -> Result<(), AudioError> {
        self.detach()?;
        let stream = self.build_stream(source)?;
        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }

    fn detach(&mut self) -> Result<(), AudioError> {
        if let Some(stream) = self.stream.take() {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }
}
