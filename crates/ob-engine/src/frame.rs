//! Audio frame type.

/// A stereo audio frame (16-bit integer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub left: i16,
    pub right: i16,
}

impl Frame {
    /// Create a silent frame.
    pub const fn silence() -> Self {
        Self { left: 0, right: 0 }
    }

    /// Build a frame from one interleaved `[left, right]` pair.
    pub fn from_pair(pair: &[i16]) -> Self {
        Self {
            left: pair.first().copied().unwrap_or(0),
            right: pair.get(1).copied().unwrap_or(0),
        }
    }

    /// Scale a synthesized sample to 16-bit range, clipping at the edges.
    ///
    /// `gain` is the product of every output-stage volume.
    pub fn quantize(sample: f32, gain: f32) -> i16 {
        let scaled = (sample as f64 * 32767.0 * gain as f64) as i32;
        scaled.clamp(-32768, 32767) as i16
    }

    /// Is either channel non-zero?
    pub fn is_audible(&self) -> bool {
        self.left != 0 || self.right != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_scales_full_range() {
        assert_eq!(Frame::quantize(1.0, 1.0), 32767);
        assert_eq!(Frame::quantize(-1.0, 1.0), -32767);
        assert_eq!(Frame::quantize(0.5, 0.5), 8191);
    }

    #[test]
    fn quantize_clips_to_i16() {
        assert_eq!(Frame::quantize(3.0, 1.0), 32767);
        assert_eq!(Frame::quantize(-3.0, 1.0), -32768);
    }

    #[test]
    fn from_pair_reads_left_then_right() {
        let frame = Frame::from_pair(&[10, -20]);
        assert_eq!(frame, Frame { left: 10, right: -20 });
        assert!(frame.is_audible());
        assert!(!Frame::silence().is_audible());
    }
}
