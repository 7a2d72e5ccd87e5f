//! Wavetable and drum sample storage shared by every synthesized beat.

use alloc::boxed::Box;
use alloc::vec::Vec;

/// Number of waveform shapes in the wavetable.
pub const WAVE_COUNT: usize = 100;

/// Samples per waveform shape.
pub const WAVE_LEN: usize = 256;

/// Size of the wavetable resource in bytes.
pub const WAVETABLE_SIZE: usize = WAVE_COUNT * WAVE_LEN;

/// Number of drum sample slots.
pub const DRUM_SLOTS: usize = 8;

/// 100 fixed-length signed 8-bit waveform shapes.
#[derive(Clone, PartialEq, Eq)]
pub struct Wavetable {
    samples: Box<[i8]>,
}

impl Wavetable {
    /// Build a wavetable from exactly [`WAVETABLE_SIZE`] samples.
    pub fn from_samples(samples: Vec<i8>) -> Option<Self> {
        if samples.len() != WAVETABLE_SIZE {
            return None;
        }
        Some(Self {
            samples: samples.into_boxed_slice(),
        })
    }

    /// The 256-sample shape at `index` (wraps modulo [`WAVE_COUNT`]).
    pub fn wave(&self, index: u8) -> &[i8] {
        let start = (index as usize % WAVE_COUNT) * WAVE_LEN;
        &self.samples[start..start + WAVE_LEN]
    }
}

impl core::fmt::Debug for Wavetable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Wavetable")
            .field("shapes", &WAVE_COUNT)
            .finish()
    }
}

/// Pre-rendered percussion samples, one buffer per slot.
///
/// An empty slot is a "null drum": instruments pointing at it render silence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrumBank {
    slots: [Vec<i16>; DRUM_SLOTS],
}

impl DrumBank {
    /// Create a bank with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a rendered drum into `slot`.
    ///
    /// The slot buffer grows (zero-filled) when the render is longer than
    /// what it already holds; a shorter render overwrites only its prefix.
    /// Out-of-range slots are ignored.
    pub fn store(&mut self, slot: usize, rendered: &[i16]) {
        let Some(buffer) = self.slots.get_mut(slot) else {
            return;
        };
        if rendered.len() > buffer.len() {
            buffer.resize(rendered.len(), 0);
        }
        buffer[..rendered.len()].copy_from_slice(rendered);
    }

    /// Sample data for `slot`; empty when the slot is unmapped.
    pub fn drum(&self, slot: usize) -> &[i16] {
        self.slots.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Does `slot` hold any sample data?
    pub fn is_loaded(&self, slot: usize) -> bool {
        !self.drum(slot).is_empty()
    }

    /// Number of slots holding data.
    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }
}

/// The complete read-only sound bank: wavetable plus drums.
///
/// Can only be built from a full wavetable, so the synthesizer never runs
/// against an unpopulated bank.
#[derive(Clone, Debug)]
pub struct SoundBank {
    wavetable: Wavetable,
    drums: DrumBank,
}

impl SoundBank {
    /// Combine a loaded wavetable and drum bank.
    pub fn new(wavetable: Wavetable, drums: DrumBank) -> Self {
        Self { wavetable, drums }
    }

    /// The waveform shapes.
    pub fn wavetable(&self) -> &Wavetable {
        &self.wavetable
    }

    /// The drum samples.
    pub fn drums(&self) -> &DrumBank {
        &self.drums
    }
}
