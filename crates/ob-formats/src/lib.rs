//! Format loaders for the orgbeat player.
//!
//! Parses Organya songs, the wavetable resource and the drum bank into the IR.

mod drums;
mod org_format;
mod wavetable;

pub use drums::{load_drums, DrumRenderer, PcmDrumRenderer, DRUM_TABLE};
pub use org_format::{load_org, ORG_SIGNATURE_LEN};
pub use wavetable::load_wavetable;

/// Error type for format parsing.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The data ended in the middle of a field.
    #[error("unexpected end of data")]
    UnexpectedEof,

    /// The wavetable resource is shorter than 100 full shapes.
    #[error("wavetable too short: expected {expected} bytes, got {actual}")]
    ShortWavetable { expected: usize, actual: usize },

    /// A mapped drum's definition resource could not be read.
    #[error("drum slot {slot}: definition {id:#04x} unavailable: {reason}")]
    MissingDrum { slot: usize, id: u8, reason: String },

    /// The pre-rendering collaborator rejected a drum definition.
    #[error("drum slot {slot}: failed to render definition {id:#04x}: {reason}")]
    Render { slot: usize, id: u8, reason: String },
}
