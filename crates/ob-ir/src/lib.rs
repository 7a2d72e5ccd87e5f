//! Core data types for the orgbeat player.
//!
//! This crate defines the in-memory song model parsed from Organya files and
//! the read-only sound bank (wavetable plus drum samples) that the
//! synthesizer renders from.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bank;
mod event;
mod instrument;
pub mod song;

pub use bank::{DrumBank, SoundBank, Wavetable, DRUM_SLOTS, WAVETABLE_SIZE, WAVE_COUNT, WAVE_LEN};
pub use event::{Event, NO_NOTE, UNCHANGED};
pub use instrument::{Instrument, InstrumentKind, DEFAULT_TUNING};
pub use song::{Song, MELODIC_INSTRUMENTS, NUM_INSTRUMENTS};
