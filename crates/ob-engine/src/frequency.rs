//! Note-to-frequency conversion for wavetable and drum playback.
//!
//! Melodic notes are split into octave and key; the key picks a base
//! frequency and the octave a multiplier. Higher octaves also read the
//! 256-sample waveform more coarsely, which keeps the oscillator's phase
//! increment in a narrow range.

use ob_ir::WAVE_LEN;

/// Base frequency of each key within an octave.
const FREQUENCY_TABLE: [u32; 12] = [262, 277, 294, 311, 330, 349, 370, 392, 415, 440, 466, 494];

/// Frequency multiplier per octave.
const OCTAVE_TABLE: [u32; 8] = [32, 64, 64, 128, 128, 128, 128, 128];

/// Effective waveform length per octave.
const WAVE_LENGTH_TABLE: [u32; 8] = [256, 256, 128, 128, 64, 32, 16, 8];

/// Split a note number into `(octave, key)`.
pub fn split_note(note: u8) -> (usize, usize) {
    ((note / 12) as usize, (note % 12) as usize)
}

/// Table row for an octave. Notes above the tables (damaged songs) reuse
/// the highest octave instead of indexing out of bounds.
fn table_octave(octave: usize) -> usize {
    octave.min(OCTAVE_TABLE.len() - 1)
}

/// Oscillator frequency for a melodic note with the given tuning (1000 = neutral).
pub fn note_frequency(note: u8, tuning: u16) -> f64 {
    let (octave, key) = split_note(note);
    let base = FREQUENCY_TABLE[key] as f64 * OCTAVE_TABLE[table_octave(octave)] as f64;
    base + (tuning as f64 - 1000.0)
}

/// Effective waveform length for an octave.
pub fn wave_length(octave: usize) -> u32 {
    WAVE_LENGTH_TABLE[table_octave(octave)]
}

/// Stride through the 256-sample shape for an octave.
pub fn wave_step(octave: usize) -> f64 {
    (WAVE_LEN as u32 / wave_length(octave)) as f64
}

/// Duration in samples of a held ("pipi") note re-triggered after silence.
pub fn pipi_length(octave: usize) -> usize {
    let octave = table_octave(octave);
    (octave + 1) * 4 * WAVE_LENGTH_TABLE[octave] as usize
}

/// Per-sample phase increment for a drum hit: pitch is proportional to note.
pub fn drum_increment(note: u8, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    (note as f64 * 800.0 + 100.0) / sample_rate as f64
}
