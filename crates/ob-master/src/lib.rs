//! Playback controller for the orgbeat player.
//!
//! Owns the shared transport, drives an audio output and exposes the
//! song/transport API that both the CLI and tests use.

mod error;
mod player;
mod resources;
mod settings;
mod transport;
mod wav;

pub use error::PlayerError;
pub use player::{Player, FADE_INTERVAL, FADE_STEP};
pub use resources::{load_sound_bank, load_sound_bank_with};
pub use settings::{Settings, ENV_PREFIX};
pub use transport::{Transport, START_VOLUME};
pub use wav::{frames_to_wav, write_wav};

// Re-export common types so callers don't need the lower crates directly.
pub use ob_audio::{AudioError, AudioOutput, CpalOutput, HeadlessOutput, StreamSource};
pub use ob_engine::{Frame, Interpolation};
pub use ob_formats::FormatError;
pub use ob_ir::{Song, SoundBank};
