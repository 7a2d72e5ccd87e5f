//! The playback controller.

use ob_audio::{AudioOutput, HeadlessOutput};
use ob_engine::{Frame, Interpolation};
use ob_formats::load_org;
use ob_ir::SoundBank;
use parking_lot::Mutex;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::transport::Transport;
use crate::wav::frames_to_wav;
use crate::{PlayerError, Settings};

/// Minimum time between two fade steps.
pub const FADE_INTERVAL: Duration = Duration::from_millis(25);

/// Master volume removed per fade step.
pub const FADE_STEP: f32 = 0.01;

/// Loads songs and drives playback through an [`AudioOutput`].
///
/// The audio output shares the transport with the player; every transport
/// change happens under its lock, so a control call never observes (or
/// leaves) a half-rendered callback.
pub struct Player<O: AudioOutput> {
    transport: Arc<Mutex<Transport>>,
    output: O,
    fading: bool,
    last_fade: Option<Instant>,
}

impl<O: AudioOutput> Player<O> {
    pub fn new(bank: Arc<SoundBank>, output: O, settings: &Settings) -> Self {
        let sample_rate = output.sample_rate();
        info!(sample_rate, interpolation = ?settings.interpolation, "player ready");

        let transport = Transport::new(bank, sample_rate, settings.interpolation, settings.user_volume());
        Self {
            transport: Arc::new(Mutex::new(transport)),
            output,
            fading: false,
            last_fade: None,
        }
    }

    pub fn transport(&self) -> &Arc<Mutex<Transport>> {
        &self.transport
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    // --- Song management ---

    /// Load an Organya file, replacing the current song.
    ///
    /// Playback stops first; on failure no song remains loaded.
    pub fn load(&mut self, path: &Path) -> Result<(), PlayerError> {
        self.transport.lock().unload();

        let data = fs::read(path).map_err(|source| {
            warn!(path = %path.display(), error = %source, "song file missing");
            PlayerError::ResourceMissing { path: path.to_path_buf(), source }
        })?;
        self.install(&data)?;

        info!(path = %path.display(), "song loaded");
        Ok(())
    }

    /// Load an Organya song from memory.
    pub fn load_bytes(&mut self, data: &[u8]) -> Result<(), PlayerError> {
        self.transport.lock().unload();
        self.install(data)
    }

    fn install(&mut self, data: &[u8]) -> Result<(), PlayerError> {
        let song = load_org(data)?;
        debug!(
            ms_per_beat = song.ms_per_beat,
            loop_start = song.loop_start,
            loop_end = song.loop_end,
            events = song.event_count(),
            "parsed song"
        );
        self.transport.lock().install(song);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.transport.lock().is_loaded()
    }

    // --- Transport ---

    /// Start playing the loaded song at `beat`, at the starting master volume.
    pub fn start(&mut self, beat: u32) -> Result<(), PlayerError> {
        {
            let mut transport = self.transport.lock();
            if !transport.is_loaded() {
                return Err(PlayerError::NotLoaded);
            }
            transport.begin(beat, Instant::now());
        }
        self.fading = false;

        if let Err(e) = self.output.attach(self.transport.clone()) {
            error!(error = %e, "failed to attach audio output");
            self.transport.lock().set_playing(false);
            return Err(e.into());
        }

        info!(beat, "playback started");
        Ok(())
    }

    /// Stop playback and return the beat most likely being heard.
    ///
    /// Returns 0 when nothing is playing.
    pub fn stop(&mut self) -> u32 {
        self.stop_at(Instant::now())
    }

    /// [`stop`](Self::stop) with an explicit clock reading.
    pub fn stop_at(&mut self, now: Instant) -> u32 {
        let beat = {
            let mut transport = self.transport.lock();
            if !transport.is_playing() {
                return 0;
            }
            transport.set_playing(false);
            transport.heard_beat(now)
        };

        // The lock is released first: pausing a device may wait on its callback.
        if let Err(e) = self.output.detach() {
            error!(error = %e, "failed to detach audio output");
        }

        info!(beat, "playback stopped");
        beat
    }

    /// Silence output without losing the position.
    pub fn pause(&mut self) {
        self.transport.lock().set_playing(false);
    }

    /// Continue after [`pause`](Self::pause).
    pub fn resume(&mut self) {
        let mut transport = self.transport.lock();
        if transport.is_loaded() {
            transport.set_playing(true);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.transport.lock().is_playing()
    }

    /// Set the master volume (1.0 = unity).
    pub fn set_volume(&mut self, volume: f32) {
        self.transport.lock().set_master_volume(volume);
    }

    pub fn volume(&self) -> f32 {
        self.transport.lock().master_volume()
    }

    /// Set the user music volume, 0-100.
    pub fn set_music_volume(&mut self, percent: u8) {
        self.transport.lock().set_user_volume(percent.min(100) as f32 / 100.0);
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.transport.lock().set_interpolation(interpolation);
    }

    // --- Fading ---

    /// Begin fading out; the first [`run_fade`](Self::run_fade) tick applies
    /// immediately.
    pub fn fade(&mut self) {
        self.fading = true;
        self.last_fade = None;
    }

    pub fn is_fading(&self) -> bool {
        self.fading
    }

    /// Advance an active fade. Call periodically, e.g. every 10 ms.
    pub fn run_fade(&mut self) {
        self.run_fade_at(Instant::now());
    }

    /// [`run_fade`](Self::run_fade) with an explicit clock reading.
    pub fn run_fade_at(&mut self, now: Instant) {
        if !self.fading {
            return;
        }
        if self
            .last_fade
            .is_some_and(|last| now.saturating_duration_since(last) < FADE_INTERVAL)
        {
            return;
        }

        let volume = self.volume() - FADE_STEP;
        if volume <= 0.0 {
            self.fading = false;
            self.stop_at(now);
        } else {
            debug!(volume, "fade step");
            self.set_volume(volume);
        }
        self.last_fade = Some(now);
    }
}

impl Player<HeadlessOutput> {
    /// Pull `frames` stereo frames through the streaming callback.
    pub fn render_frames(&mut self, frames: usize) -> Vec<Frame> {
        let mut buf = vec![0i16; frames * 2];
        self.output.pull(&mut buf);
        buf.chunks_exact(2).map(Frame::from_pair).collect()
    }

    /// Render `seconds` of audio into an in-memory WAV file.
    pub fn render_to_wav(&mut self, seconds: u32) -> Vec<u8> {
        let sample_rate = self.output.sample_rate();
        let frames = self.render_frames(sample_rate as usize * seconds as usize);
        frames_to_wav(&frames, sample_rate)
    }
}
