//! Volume and panning curves.

/// Pan value that leaves both channels at unity.
pub const PAN_CENTER: u8 = 6;

/// Pan positions 0-12 mapped onto a 0-512 scale, 256 = centre.
const PANNING_TABLE: [i32; 13] = [0, 43, 86, 129, 172, 215, 256, 297, 340, 383, 426, 469, 512];

/// Convert an event volume (0-254) into a linear gain.
///
/// Logarithmic: each step below 255 attenuates by 0.08 dB, and the
/// result is pre-divided by 128 so a full-scale 8-bit sample lands near 1.0.
pub fn volume_to_gain(volume: u8) -> f64 {
    let exponent = ((volume as i32 - 255) * 8) as f64 / 2000.0;
    libm::pow(10.0, exponent) / 128.0
}

/// Left/right gains for a pan position, scaled by `gain`.
///
/// The channel on the far side of centre is attenuated exponentially; the
/// near side stays at unity.
pub fn pan_gains(pan: u8, gain: f64) -> (f64, f64) {
    let index = (pan as usize).min(PANNING_TABLE.len() - 1);
    let pan = (PANNING_TABLE[index] - 256) as f64 * 10.0;

    let mut left = 1.0;
    let mut right = 1.0;
    if pan < 0.0 {
        right = libm::pow(10.0, pan / 2000.0);
    } else if pan > 0.0 {
        left = libm::pow(10.0, -pan / 2000.0);
    }

    (left * gain, right * gain)
}
