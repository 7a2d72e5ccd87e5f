//! Voice: per-instrument oscillator state carried from beat to beat.

use ob_ir::{Event, Instrument, SoundBank, NO_NOTE};

use crate::frequency::{drum_increment, note_frequency, pipi_length, split_note, wave_length, wave_step};
use crate::gain::{pan_gains, volume_to_gain, PAN_CENTER};
use crate::interpolation::{Interpolation, Waveform};

/// The buffer a voice reads from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Source {
    /// No note has fired yet.
    #[default]
    Silent,
    /// Wavetable shape index.
    Wave(u8),
    /// Drum bank slot.
    Drum(u8),
}

/// Playback state of one instrument track.
#[derive(Clone, Debug, PartialEq)]
pub struct Voice {
    /// Fractional read position, in source steps.
    pub phase_acc: f64,
    /// Phase advance per output sample (pitch).
    pub phase_inc: f64,
    /// Multiplier from phase to buffer index.
    pub wave_step: f64,
    /// Active source buffer.
    pub source: Source,
    /// Output samples left in the current note.
    pub remaining: usize,
    /// Linear volume gain.
    pub gain: f64,
    /// Pan position (0-12, 6 = centre).
    pub pan: u8,
    /// Last note fired, or [`NO_NOTE`] before the first one.
    pub last_note: u8,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            phase_acc: 0.0,
            phase_inc: 0.0,
            wave_step: 1.0,
            source: Source::Silent,
            remaining: 0,
            gain: volume_to_gain(255),
            pan: PAN_CENTER,
            last_note: NO_NOTE,
        }
    }
}

impl Voice {
    /// Create a silent voice with full volume and centred pan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Is the voice still producing samples?
    pub fn is_sounding(&self) -> bool {
        self.remaining > 0
    }

    /// Start a wavetable note.
    ///
    /// A held ("pipi") instrument coming out of silence ignores the event
    /// length and sustains for a fixed number of waveform cycles instead.
    pub fn trigger_melodic(
        &mut self,
        event: &Event,
        instrument: &Instrument,
        bank: &SoundBank,
        samples_per_beat: usize,
        sample_rate: u32,
    ) {
        let (octave, _) = split_note(event.note);

        self.wave_step = wave_step(octave);
        self.phase_inc = if sample_rate == 0 {
            0.0
        } else {
            note_frequency(event.note, instrument.tuning) / sample_rate as f64
        };
        self.phase_acc = libm::fmod(self.phase_acc, wave_length(octave) as f64);
        self.source = Source::Wave(instrument.wave);
        self.remaining = if instrument.pipi && self.last_note == NO_NOTE {
            pipi_length(octave)
        } else {
            event.length as usize * samples_per_beat
        };

        self.finish_trigger(event.note, bank);
    }

    /// Start a drum hit from `slot`; it plays once for its natural length at
    /// a pitch proportional to the note.
    pub fn trigger_drum(&mut self, note: u8, slot: u8, bank: &SoundBank, sample_rate: u32) {
        let len = bank.drums().drum(slot as usize).len();

        self.wave_step = 1.0;
        self.phase_inc = drum_increment(note, sample_rate);
        self.phase_acc = 0.0;
        self.source = Source::Drum(slot);
        self.remaining = if self.phase_inc > 0.0 {
            (len as f64 / self.phase_inc) as usize
        } else {
            0
        };

        self.finish_trigger(note, bank);
    }

    fn finish_trigger(&mut self, note: u8, bank: &SoundBank) {
        self.last_note = note;
        if self.waveform(bank).is_empty() {
            self.remaining = 0;
        }
    }

    /// Apply the volume/pan fields of an event.
    ///
    /// Ignored until the voice has sounded a real note.
    pub fn apply_params(&mut self, event: &Event) {
        if self.last_note == NO_NOTE {
            return;
        }
        if let Some(volume) = event.volume() {
            self.gain = volume_to_gain(volume);
        }
        if let Some(pan) = event.panning() {
            self.pan = pan;
        }
    }

    /// Resolve the active source against the bank.
    pub fn waveform<'a>(&self, bank: &'a SoundBank) -> Waveform<'a> {
        match self.source {
            Source::Silent => Waveform::Wave(&[]),
            Source::Wave(index) => Waveform::Wave(bank.wavetable().wave(index)),
            Source::Drum(slot) => Waveform::Drum(bank.drums().drum(slot as usize)),
        }
    }

    /// Mix up to one buffer's worth of the current note into `output`.
    ///
    /// `output` is interleaved stereo; samples are added, not overwritten.
    pub fn render(&mut self, bank: &SoundBank, interpolation: Interpolation, output: &mut [f32]) {
        let n = (output.len() / 2).min(self.remaining);
        if n == 0 {
            return;
        }

        let wave = self.waveform(bank);
        let (left, right) = pan_gains(self.pan, self.gain);

        for frame in output.chunks_exact_mut(2).take(n) {
            let sample = interpolation.sample(wave, self.phase_acc * self.wave_step);
            frame[0] += (sample * left) as f32;
            frame[1] += (sample * right) as f32;
            self.phase_acc += self.phase_inc;
        }

        self.remaining -= n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use ob_ir::{DrumBank, Wavetable, UNCHANGED, WAVETABLE_SIZE};

    const RATE: u32 = 44100;
    const SPB: usize = 4410;

    fn constant_bank(value: i8) -> SoundBank {
        let wavetable = Wavetable::from_samples(vec![value; WAVETABLE_SIZE]).unwrap();
        let mut drums = DrumBank::new();
        drums.store(0, &[64; 1000]);
        SoundBank::new(wavetable, drums)
    }

    fn render_beat(voice: &mut Voice, bank: &SoundBank) -> Vec<f32> {
        let mut out = vec![0.0f32; SPB * 2];
        voice.render(bank, Interpolation::Linear, &mut out);
        out
    }

    #[test]
    fn new_voice_is_silent() {
        let bank = constant_bank(100);
        let mut voice = Voice::new();
        assert!(!voice.is_sounding());
        assert!(render_beat(&mut voice, &bank).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn melodic_note_length_is_beats_times_samples() {
        let bank = constant_bank(100);
        let inst = Instrument::default();
        let mut voice = Voice::new();
        voice.trigger_melodic(&Event::note(48, 3, UNCHANGED, UNCHANGED), &inst, &bank, SPB, RATE);
        assert_eq!(voice.remaining, 3 * SPB);
        assert_eq!(voice.source, Source::Wave(0));
        assert_eq!(voice.last_note, 48);
        assert_eq!(voice.wave_step, 4.0);
    }

    #[test]
    fn pipi_after_silence_uses_held_length() {
        let bank = constant_bank(100);
        let inst = Instrument::new(1000, 3, true);
        let mut voice = Voice::new();
        // octave 2
        voice.trigger_melodic(&Event::note(30, 9, UNCHANGED, UNCHANGED), &inst, &bank, SPB, RATE);
        assert_eq!(voice.remaining, 3 * 4 * 128);

        // A second note while the previous was a real note uses the event length.
        voice.trigger_melodic(&Event::note(30, 9, UNCHANGED, UNCHANGED), &inst, &bank, SPB, RATE);
        assert_eq!(voice.remaining, 9 * SPB);
    }

    #[test]
    fn melodic_retrigger_folds_phase_into_octave_length() {
        let bank = constant_bank(100);
        let inst = Instrument::default();
        let mut voice = Voice::new();
        voice.phase_acc = 300.5;
        voice.trigger_melodic(&Event::note(0, 1, UNCHANGED, UNCHANGED), &inst, &bank, SPB, RATE);
        assert!((voice.phase_acc - 44.5).abs() < 1e-9);
    }

    #[test]
    fn drum_duration_is_length_over_increment() {
        let bank = constant_bank(0);
        let mut voice = Voice::new();
        voice.phase_acc = 17.0;
        voice.trigger_drum(0, 0, &bank, 100);
        // increment = 100 / 100 = 1 sample per output sample
        assert_eq!(voice.remaining, 1000);
        assert_eq!(voice.phase_acc, 0.0);
        assert_eq!(voice.source, Source::Drum(0));
    }

    #[test]
    fn unmapped_drum_slot_is_silent() {
        let bank = constant_bank(0);
        let mut voice = Voice::new();
        voice.trigger_drum(40, 3, &bank, RATE);
        assert_eq!(voice.remaining, 0);
        assert_eq!(voice.last_note, 40);
        assert!(render_beat(&mut voice, &bank).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn params_ignored_before_first_note() {
        let mut voice = Voice::new();
        let before = voice.clone();
        voice.apply_params(&Event::note(NO_NOTE, 0, 10, 2));
        assert_eq!(voice, before);
    }

    #[test]
    fn params_apply_after_a_note() {
        let bank = constant_bank(100);
        let mut voice = Voice::new();
        voice.trigger_drum(10, 0, &bank, RATE);
        voice.apply_params(&Event::note(NO_NOTE, 0, 200, 2));
        assert_eq!(voice.gain, volume_to_gain(200));
        assert_eq!(voice.pan, 2);
    }

    #[test]
    fn volume_sentinel_keeps_gain_with_a_real_note() {
        let bank = constant_bank(100);
        let inst = Instrument::default();
        let mut voice = Voice::new();
        let first = Event::note(40, 1, 180, UNCHANGED);
        voice.trigger_melodic(&first, &inst, &bank, SPB, RATE);
        voice.apply_params(&first);
        let gain = voice.gain;

        let second = Event::note(52, 1, UNCHANGED, UNCHANGED);
        voice.trigger_melodic(&second, &inst, &bank, SPB, RATE);
        voice.apply_params(&second);
        assert_eq!(voice.gain, gain);
    }

    #[test]
    fn render_accumulates_into_output() {
        let bank = constant_bank(64);
        let inst = Instrument::default();
        let mut voice = Voice::new();
        voice.trigger_melodic(&Event::note(48, 1, UNCHANGED, UNCHANGED), &inst, &bank, SPB, RATE);

        let mut out = vec![0.25f32; SPB * 2];
        voice.render(&bank, Interpolation::Nearest, &mut out);
        // 64 * (1/128) centred = 0.5, on top of 0.25
        assert!(out.iter().all(|&s| (s - 0.75).abs() < 1e-6));
    }

    #[test]
    fn render_consumes_remaining_length() {
        let bank = constant_bank(64);
        let inst = Instrument::default();
        let mut voice = Voice::new();
        voice.trigger_melodic(&Event::note(48, 1, UNCHANGED, UNCHANGED), &inst, &bank, 1000, RATE);
        let phase_inc = voice.phase_inc;

        let out = render_beat(&mut voice, &bank);
        assert_eq!(voice.remaining, 0);
        assert!((voice.phase_acc - 1000.0 * phase_inc).abs() < 1e-6);
        // Only the first 1000 frames carry the note.
        assert!(out[..2000].iter().all(|&s| s != 0.0));
        assert!(out[2000..].iter().all(|&s| s == 0.0));
    }
}
