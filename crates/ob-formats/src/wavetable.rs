//! Wavetable resource loader.

use ob_ir::{Wavetable, WAVETABLE_SIZE};

use crate::FormatError;

/// Build the wavetable from the first 25,600 bytes of `data`, read as signed
/// 8-bit samples. Anything past that is ignored.
pub fn load_wavetable(data: &[u8]) -> Result<Wavetable, FormatError> {
    let bytes = data.get(..WAVETABLE_SIZE).ok_or(FormatError::ShortWavetable {
        expected: WAVETABLE_SIZE,
        actual: data.len(),
    })?;

    let samples = bytes.iter().map(|&b| b as i8).collect();
    Wavetable::from_samples(samples).ok_or(FormatError::ShortWavetable {
        expected: WAVETABLE_SIZE,
        actual: data.len(),
    })
}
