//! Beat sequencer: advances a song one beat per call.

use alloc::sync::Arc;
use alloc::vec::Vec;
use ob_ir::{InstrumentKind, Song, SoundBank, MELODIC_INSTRUMENTS, NUM_INSTRUMENTS};

use crate::interpolation::Interpolation;
use crate::voice::Voice;

/// Drives a song beat by beat against a shared sound bank.
pub struct Sequencer {
    /// The song being played
    song: Song,
    /// Read-only wavetable and drums
    bank: Arc<SoundBank>,
    /// Playback state per instrument
    voices: [Voice; NUM_INSTRUMENTS],
    /// Audio sample rate (e.g., 44100)
    sample_rate: u32,
    /// Sample reader used for every voice
    interpolation: Interpolation,
    /// Beat the next call to `synth` will render
    cur_beat: u32,
    /// Beat value at the start of the most recent `synth` call
    last_beat: u32,
}

impl Sequencer {
    /// Create a sequencer holding an empty song.
    pub fn new(bank: Arc<SoundBank>, sample_rate: u32) -> Self {
        Self {
            song: Song::default(),
            bank,
            voices: Default::default(),
            sample_rate,
            interpolation: Interpolation::default(),
            cur_beat: 0,
            last_beat: 0,
        }
    }

    /// Replace the current song in place and rewind to beat 0.
    pub fn load(&mut self, song: Song) {
        self.song = song;
        self.voices = Default::default();
        self.cur_beat = 0;
        self.last_beat = 0;
    }

    /// The loaded song.
    pub fn song(&self) -> &Song {
        &self.song
    }

    /// Per-instrument playback state.
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// The shared sound bank.
    pub fn bank(&self) -> &Arc<SoundBank> {
        &self.bank
    }

    /// Output sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Select the interpolation mode for subsequent beats.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }

    /// Current interpolation mode.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Seek: the next `synth` call renders `beat`.
    pub fn set_position(&mut self, beat: u32) {
        self.cur_beat = beat;
    }

    /// Beat the next `synth` call will render (before loop wrapping).
    pub fn position(&self) -> u32 {
        self.cur_beat
    }

    /// Beat value seen at the start of the most recent `synth` call.
    pub fn last_beat(&self) -> u32 {
        self.last_beat
    }

    /// Output frames per beat for the loaded song.
    pub fn samples_per_beat(&self) -> usize {
        self.song.samples_per_beat(self.sample_rate)
    }

    /// Render one beat into `output` as interleaved stereo and advance.
    ///
    /// `output` is cleared and resized to `2 * samples_per_beat`; its
    /// capacity is reused, so after the first beat this does not allocate.
    pub fn synth(&mut self, output: &mut Vec<f32>) {
        let samples_per_beat = self.samples_per_beat();

        self.last_beat = self.cur_beat;
        if self.cur_beat == self.song.loop_end {
            self.cur_beat = self.song.loop_start;
        }

        output.clear();
        output.resize(samples_per_beat * 2, 0.0);

        let bank = &*self.bank;
        let beat = self.cur_beat;

        for (index, (instrument, voice)) in self
            .song
            .instruments
            .iter()
            .zip(self.voices.iter_mut())
            .enumerate()
        {
            if let Some(event) = instrument.event_at(beat) {
                if event.has_note() {
                    match Song::kind(index) {
                        InstrumentKind::Melodic => voice.trigger_melodic(
                            event,
                            instrument,
                            bank,
                            samples_per_beat,
                            self.sample_rate,
                        ),
                        InstrumentKind::Percussive => voice.trigger_drum(
                            event.note,
                            (index - MELODIC_INSTRUMENTS) as u8,
                            bank,
                            self.sample_rate,
                        ),
                    }
                }
                voice.apply_params(event);
            }

            voice.render(bank, self.interpolation, output);
        }

        self.cur_beat = self.cur_beat.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use ob_ir::{DrumBank, Event, Wavetable, NO_NOTE, UNCHANGED, WAVETABLE_SIZE};

    const RATE: u32 = 44100;

    fn bank() -> Arc<SoundBank> {
        let samples = (0..WAVETABLE_SIZE).map(|i| ((i * 7) % 200) as i8).collect();
        let mut drums = DrumBank::new();
        drums.store(0, &[100; 3000]);
        Arc::new(SoundBank::new(Wavetable::from_samples(samples).unwrap(), drums))
    }

    fn sequencer(song: Song) -> Sequencer {
        let mut seq = Sequencer::new(bank(), RATE);
        seq.load(song);
        seq
    }

    #[test]
    fn empty_song_renders_silent_beats() {
        let mut seq = sequencer(Song::new(100, 0, 1));
        let mut out = Vec::new();
        for _ in 0..5 {
            seq.synth(&mut out);
            assert_eq!(out.len(), 4410 * 2);
            assert!(out.iter().all(|&s| s == 0.0));
        }
    }

    #[test]
    fn single_beat_loop_cycles_on_beat_zero() {
        let mut seq = sequencer(Song::new(100, 0, 1));
        let mut out = Vec::new();
        seq.synth(&mut out);
        assert_eq!(seq.position(), 1);
        for _ in 0..10 {
            seq.synth(&mut out);
            // wrapped to 0 before synthesis, then advanced past it
            assert_eq!(seq.position(), 1);
        }
    }

    #[test]
    fn beat_sequence_is_periodic_over_loop() {
        let mut seq = sequencer(Song::new(10, 2, 5));
        let mut out = Vec::new();
        let mut rendered = Vec::new();
        for _ in 0..9 {
            let before = seq.position();
            seq.synth(&mut out);
            rendered.push(seq.position() - 1);
            assert!(before == 5 || seq.position() == before + 1);
        }
        assert_eq!(rendered, [0, 1, 2, 3, 4, 2, 3, 4, 2]);
    }

    #[test]
    fn start_past_loop_end_never_wraps() {
        let mut seq = sequencer(Song::new(10, 0, 4));
        seq.set_position(9);
        let mut out = Vec::new();
        seq.synth(&mut out);
        seq.synth(&mut out);
        assert_eq!(seq.position(), 11);
    }

    #[test]
    fn buffer_size_matches_header_tempo() {
        for (ms, rate) in [(100u16, 44100u32), (33, 22050), (125, 48000)] {
            let mut seq = Sequencer::new(bank(), rate);
            seq.load(Song::new(ms, 0, 4));
            let expected = (ms as f64 * rate as f64 / 1000.0).round() as usize;
            let mut out = Vec::new();
            seq.synth(&mut out);
            assert_eq!(seq.samples_per_beat(), expected);
            assert_eq!(out.len(), expected * 2);
        }
    }

    #[test]
    fn note_sustains_across_beats_without_events() {
        let mut song = Song::new(100, 0, 100);
        song.instruments[0].insert_event(0, Event::note(40, 3, 200, 6));
        let mut seq = sequencer(song);
        let mut out = Vec::new();

        seq.synth(&mut out);
        let voice = seq.voices()[0].clone();
        assert_eq!(voice.remaining, 2 * 4410);

        seq.synth(&mut out);
        let next = &seq.voices()[0];
        assert_eq!(next.remaining, 4410);
        assert_eq!(next.gain, voice.gain);
        assert_eq!(next.pan, voice.pan);
        let expected_phase = voice.phase_acc + 4410.0 * voice.phase_inc;
        assert!((next.phase_acc - expected_phase).abs() < 1e-6);
        assert!(out.iter().any(|&s| s != 0.0));

        seq.synth(&mut out);
        seq.synth(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn centred_note_has_equal_channels() {
        let mut song = Song::new(100, 0, 100);
        song.instruments[2].insert_event(0, Event::note(50, 1, 254, 6));
        let mut seq = sequencer(song);
        let mut out = Vec::new();
        seq.synth(&mut out);
        assert!(out.chunks(2).all(|f| f[0] == f[1]));
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn left_pan_favours_left_channel() {
        let mut song = Song::new(100, 0, 100);
        song.instruments[8].insert_event(0, Event::note(30, 1, 254, 0));
        let mut seq = sequencer(song);
        let mut out = Vec::new();
        seq.synth(&mut out);
        let left: f32 = out.iter().step_by(2).map(|s| s.abs()).sum();
        let right: f32 = out.iter().skip(1).step_by(2).map(|s| s.abs()).sum();
        assert!(left > right * 10.0);
    }

    #[test]
    fn instruments_mix_additively() {
        let event = Event::note(30, 1, 254, 6);
        let mut single = Song::new(100, 0, 100);
        single.instruments[8].insert_event(0, event);
        let mut double = single.clone();
        double.instruments[1].insert_event(0, Event::note(36, 1, 254, 6));
        let mut only_melodic = Song::new(100, 0, 100);
        only_melodic.instruments[1].insert_event(0, Event::note(36, 1, 254, 6));

        let (mut a, mut b, mut c) = (Vec::new(), Vec::new(), Vec::new());
        sequencer(single).synth(&mut a);
        sequencer(only_melodic).synth(&mut b);
        sequencer(double).synth(&mut c);
        for i in 0..c.len() {
            assert!((c[i] - (a[i] + b[i])).abs() < 1e-5, "sample {}", i);
        }
    }

    #[test]
    fn drum_on_unmapped_slot_is_silent() {
        let mut song = Song::new(100, 0, 100);
        // slot 1 (instrument 9) has no drum data
        song.instruments[9].insert_event(0, Event::note(40, 4, 254, 6));
        let mut seq = sequencer(song);
        let mut out = Vec::new();
        for _ in 0..4 {
            seq.synth(&mut out);
            assert!(out.iter().all(|&s| s == 0.0));
        }
        assert_eq!(seq.voices()[9].remaining, 0);
    }

    #[test]
    fn drum_plays_for_its_natural_length() {
        let mut song = Song::new(100, 0, 100);
        // note 55: increment = 44100 / 44100 = 1.0
        song.instruments[8].insert_event(0, Event::note(55, 1, 254, 6));
        let mut seq = sequencer(song);
        let mut out = Vec::new();
        seq.synth(&mut out);
        assert_eq!(seq.voices()[8].remaining, 0);
        let frames_with_sound = out.chunks(2).filter(|f| f[0] != 0.0).count();
        assert_eq!(frames_with_sound, 3000);
    }

    #[test]
    fn no_note_event_only_changes_params_after_a_note() {
        let mut song = Song::new(100, 0, 100);
        song.instruments[0].insert_event(0, Event::note(NO_NOTE, 0, 10, 0));
        song.instruments[0].insert_event(1, Event::note(40, 4, UNCHANGED, UNCHANGED));
        song.instruments[0].insert_event(2, Event::note(NO_NOTE, 0, 100, 12));
        let mut seq = sequencer(song);
        let mut out = Vec::new();
        let initial = seq.voices()[0].clone();

        seq.synth(&mut out);
        assert_eq!(seq.voices()[0], initial);

        seq.synth(&mut out);
        let sounding = seq.voices()[0].clone();
        assert_eq!(sounding.gain, initial.gain);
        assert_eq!(sounding.remaining, 3 * 4410);

        seq.synth(&mut out);
        let voice = &seq.voices()[0];
        assert_eq!(voice.pan, 12);
        assert_eq!(voice.gain, crate::gain::volume_to_gain(100));
        // the no-note event did not retrigger: length keeps counting down
        assert_eq!(voice.remaining, 2 * 4410);
        assert_eq!(voice.last_note, 40);
    }

    #[test]
    fn interpolation_mode_changes_output() {
        let mut song = Song::new(100, 0, 100);
        song.instruments[0].insert_event(0, Event::note(20, 1, 254, 6));
        let mut nearest = sequencer(song.clone());
        nearest.set_interpolation(Interpolation::Nearest);
        let mut cubic = sequencer(song);
        cubic.set_interpolation(Interpolation::Cubic);

        let (mut a, mut b) = (Vec::new(), Vec::new());
        nearest.synth(&mut a);
        cubic.synth(&mut b);
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
    }

    #[test]
    fn load_resets_voices_and_position() {
        let mut song = Song::new(100, 0, 100);
        song.instruments[0].insert_event(0, Event::note(40, 8, 200, 3));
        let mut seq = sequencer(song);
        let mut out = vec![];
        seq.synth(&mut out);
        seq.synth(&mut out);

        seq.load(Song::new(50, 0, 2));
        assert_eq!(seq.position(), 0);
        assert!(seq.voices().iter().all(|v| *v == Voice::default()));
        seq.synth(&mut out);
        assert_eq!(out.len(), 2205 * 2);
    }
}
