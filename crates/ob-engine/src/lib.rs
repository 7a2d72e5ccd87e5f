//! Beat synthesizer for the orgbeat player.
//!
//! Renders a song one beat at a time into interleaved stereo `f32` samples,
//! keeping per-instrument oscillator state across beats.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod frame;
mod frequency;
mod gain;
mod interpolation;
mod sequencer;
mod voice;

pub use frame::Frame;
pub use frequency::{drum_increment, note_frequency, pipi_length, split_note, wave_length, wave_step};
pub use gain::{pan_gains, volume_to_gain, PAN_CENTER};
pub use interpolation::{Interpolation, Waveform};
pub use sequencer::Sequencer;
pub use voice::{Source, Voice};
