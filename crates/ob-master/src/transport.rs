//! Shared playback state: the part of the player the audio thread touches.

use ob_audio::StreamSource;
use ob_engine::{Frame, Interpolation, Sequencer};
use ob_ir::{Song, SoundBank};
use std::sync::Arc;
use std::time::Instant;

/// Master volume set by every `start`.
pub const START_VOLUME: f32 = 0.75;

/// Sequencer plus the streaming cursor, guarded by one lock.
pub struct Transport {
    sequencer: Sequencer,
    loaded: bool,
    playing: bool,
    /// Current beat, interleaved stereo.
    samples: Vec<f32>,
    /// Next sample of `samples` to emit.
    cursor: usize,
    master_volume: f32,
    user_volume: f32,
    /// When the current beat was synthesized.
    last_synth: Instant,
}

impl Transport {
    pub fn new(bank: Arc<SoundBank>, sample_rate: u32, interpolation: Interpolation, user_volume: f32) -> Self {
        let mut sequencer = Sequencer::new(bank, sample_rate);
        sequencer.set_interpolation(interpolation);
        Self {
            sequencer,
            loaded: false,
            playing: false,
            samples: Vec::new(),
            cursor: 0,
            master_volume: START_VOLUME,
            user_volume,
            last_synth: Instant::now(),
        }
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn song(&self) -> &Song {
        self.sequencer.song()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Forget the current song; output goes silent.
    pub fn unload(&mut self) {
        self.loaded = false;
        self.playing = false;
    }

    /// Install a parsed song at beat 0.
    pub fn install(&mut self, song: Song) {
        self.sequencer.load(song);
        self.samples.clear();
        self.cursor = 0;
        self.loaded = true;
    }

    /// Begin playing from `beat` with the first beat already rendered.
    pub fn begin(&mut self, beat: u32, now: Instant) {
        self.playing = true;
        self.master_volume = START_VOLUME;
        self.sequencer.set_position(beat);
        self.synth_next(now);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume;
    }

    pub fn user_volume(&self) -> f32 {
        self.user_volume
    }

    pub fn set_user_volume(&mut self, volume: f32) {
        self.user_volume = volume;
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.sequencer.set_interpolation(interpolation);
    }

    /// Estimate the beat being heard at `now`.
    ///
    /// The device buffers ahead, so the last synthesized beat overstates the
    /// position; instead extrapolate from when that beat was made.
    pub fn heard_beat(&self, now: Instant) -> u32 {
        let song = self.sequencer.song();
        let elapsed_ms = now.saturating_duration_since(self.last_synth).as_millis();
        let beats = match song.ms_per_beat {
            0 => 0,
            ms => (elapsed_ms / ms as u128).min(u32::MAX as u128) as u32,
        };
        song.wrap_beat(self.sequencer.last_beat().saturating_add(beats))
    }

    fn synth_next(&mut self, now: Instant) {
        self.sequencer.synth(&mut self.samples);
        self.cursor = 0;
        self.last_synth = now;
    }

    fn stream(&mut self, out: &mut [i16]) {
        let gain = self.master_volume * self.user_volume;

        for i in 0..out.len() {
            if self.cursor >= self.samples.len() {
                self.synth_next(Instant::now());
                if self.samples.is_empty() {
                    // zero-length beats
                    out[i..].fill(0);
                    return;
                }
            }
            out[i] = Frame::quantize(self.samples[self.cursor], gain);
            self.cursor += 1;
        }
    }

    #[cfg(feature = "alloc_check")]
    fn is_warm(&self) -> bool {
        self.samples.capacity() >= self.sequencer.samples_per_beat() * 2
    }
}

impl StreamSource for Transport {
    fn fill(&mut self, out: &mut [i16]) {
        if !self.playing {
            out.fill(0);
            return;
        }

        #[cfg(feature = "alloc_check")]
        {
            if self.is_warm() {
                assert_no_alloc::assert_no_alloc(|| self.stream(out));
                return;
            }
        }

        self.stream(out);
    }
}
