//! Waveform readers and interpolation modes.

/// How a fractional read position is turned into a sample value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum Interpolation {
    /// Read the sample at the integer part of the position.
    Nearest,
    /// Blend the two neighbouring samples.
    #[default]
    Linear,
    /// Four-point cubic through the samples at -1, 0, +1 and +2.
    Cubic,
}

/// A borrowed source buffer.
///
/// Wavetable shapes are periodic and wrap at their length; drum samples are
/// one-shot and clamp to their last sample instead.
#[derive(Clone, Copy, Debug)]
pub enum Waveform<'a> {
    Wave(&'a [i8]),
    Drum(&'a [i16]),
}

impl Waveform<'_> {
    /// Number of samples in the buffer.
    pub fn len(&self) -> usize {
        match self {
            Waveform::Wave(w) => w.len(),
            Waveform::Drum(d) => d.len(),
        }
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample at a (possibly out-of-range) index.
    pub fn at(&self, index: i64) -> f64 {
        let len = self.len() as i64;
        if len == 0 {
            return 0.0;
        }
        match self {
            Waveform::Wave(w) => w[index.rem_euclid(len) as usize] as f64,
            Waveform::Drum(d) => d[index.clamp(0, len - 1) as usize] as f64,
        }
    }
}

impl Interpolation {
    /// Read `wave` at fractional position `pos` (non-negative).
    pub fn sample(self, wave: Waveform<'_>, pos: f64) -> f64 {
        let index = pos as i64;
        let frac = pos - index as f64;

        match self {
            Interpolation::Nearest => wave.at(index),
            Interpolation::Linear => {
                let s1 = wave.at(index);
                let s2 = wave.at(index + 1);
                s1 + (s2 - s1) * frac
            }
            Interpolation::Cubic => {
                let sp = wave.at(index - 1);
                let s1 = wave.at(index);
                let s2 = wave.at(index + 1);
                let sn = wave.at(index + 2);

                let mu2 = frac * frac;
                let a0 = sn - s2 - sp + s1;
                let a1 = sp - s1 - a0;
                let a2 = s2 - sp;
                let a3 = s1;

                a0 * frac * mu2 + a1 * mu2 + a2 * frac + a3
            }
        }
    }
}
