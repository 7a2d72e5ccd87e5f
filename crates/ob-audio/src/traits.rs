//! Audio output trait and error types.

use parking_lot::Mutex;
use std::sync::Arc;

/// Error type for audio operations.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// Failed to initialize audio device
    #[error("device init error: {0}")]
    DeviceInit(String),
    /// Failed to create audio stream
    #[error("stream create error: {0}")]
    StreamCreate(String),
    /// Playback error
    #[error("playback error: {0}")]
    Playback(String),
    /// No audio device available
    #[error("no audio device available")]
    NoDevice,
}

/// Something that produces interleaved 16-bit stereo samples on demand.
///
/// Called from the audio thread with the source's lock held; implementations
/// must not block, allocate or log.
pub trait StreamSource: Send + 'static {
    /// Overwrite every sample of `out`.
    fn fill(&mut self, out: &mut [i16]);
}

/// Trait for audio output backends.
///
/// The output pulls from an attached source rather than being pushed to.
pub trait AudioOutput {
    /// Get the sample rate.
    fn sample_rate(&self) -> u32;

    /// Start pulling from `source`, replacing any previous one.
    fn attach<S: StreamSource>(&mut self, source: Arc<Mutex<S>>) -> Result<(), AudioError>;

    /// Stop pulling. Detaching an idle output is a no-op.
    fn detach(&mut self) -> Result<(), AudioError>;
}
