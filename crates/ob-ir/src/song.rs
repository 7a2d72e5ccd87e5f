//! Song structure and timing parameters.

use crate::instrument::{Instrument, InstrumentKind};

/// Number of instrument tracks in a song.
pub const NUM_INSTRUMENTS: usize = 16;

/// Tracks below this index are melodic, the rest percussive.
pub const MELODIC_INSTRUMENTS: usize = 8;

/// A complete song.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Song {
    /// Milliseconds per beat
    pub ms_per_beat: u16,
    /// Steps per bar (metadata)
    pub steps_per_bar: u8,
    /// Beats per step (metadata)
    pub beats_per_step: u8,
    /// First beat of the loop region
    pub loop_start: u32,
    /// End of the loop region (exclusive)
    pub loop_end: u32,
    /// Instrument tracks; 0-7 melodic, 8-15 percussive
    pub instruments: [Instrument; NUM_INSTRUMENTS],
}

impl Default for Song {
    fn default() -> Self {
        Self {
            ms_per_beat: 100,
            steps_per_bar: 4,
            beats_per_step: 4,
            loop_start: 0,
            loop_end: 1,
            instruments: Default::default(),
        }
    }
}

impl Song {
    /// Create an empty song with the given tempo and loop region.
    pub fn new(ms_per_beat: u16, loop_start: u32, loop_end: u32) -> Self {
        Self {
            ms_per_beat,
            loop_start,
            loop_end,
            ..Self::default()
        }
    }

    /// Kind of the instrument in slot `index`.
    pub fn kind(index: usize) -> InstrumentKind {
        if index < MELODIC_INSTRUMENTS {
            InstrumentKind::Melodic
        } else {
            InstrumentKind::Percussive
        }
    }

    /// Number of output frames in one beat at `sample_rate`.
    ///
    /// `round(ms_per_beat * sample_rate / 1000)`.
    pub fn samples_per_beat(&self, sample_rate: u32) -> usize {
        let scaled = self.ms_per_beat as u64 * sample_rate as u64;
        ((scaled + 500) / 1000) as usize
    }

    /// Length of the loop region in beats (0 if the region is empty).
    pub fn loop_len(&self) -> u32 {
        self.loop_end.saturating_sub(self.loop_start)
    }

    /// Fold a beat past the loop end back into the loop region.
    pub fn wrap_beat(&self, beat: u32) -> u32 {
        let len = self.loop_len();
        if beat < self.loop_end || len == 0 {
            return beat;
        }
        self.loop_start + (beat - self.loop_end) % len
    }

    /// Total number of scheduled events across all instruments.
    pub fn event_count(&self) -> usize {
        self.instruments.iter().map(|i| i.events.len()).sum()
    }
}
