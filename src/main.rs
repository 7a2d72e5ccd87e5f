//! ob-cli: play an Organya song, or render it to WAV.
//!
//! Usage:
//!   ob-cli song.org
//!   ob-cli song.org --wav output.wav --seconds 30
//!   ob-cli song.org --fade-after 20 --interpolation cubic

use clap::{Parser, ValueEnum};
use ob_master::{
    load_sound_bank, write_wav, AudioOutput, CpalOutput, Frame, HeadlessOutput, Interpolation,
    Player, Settings,
};
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Length of a WAV render when `--seconds` is not given.
const DEFAULT_RENDER_SECONDS: u32 = 60;

/// How often the control loop ticks the fade.
const TICK: Duration = Duration::from_millis(10);

#[derive(Parser)]
#[command(version, about = "Organya song player.")]
struct Cli {
    /// The song file to play.
    song: PathBuf,
    /// Render to this WAV file instead of the audio device.
    #[arg(long)]
    wav: Option<PathBuf>,
    /// Stop after this many seconds. Live playback loops forever when unset.
    #[arg(long)]
    seconds: Option<u32>,
    /// Beat to start from.
    #[arg(long, default_value_t = 0)]
    start_beat: u32,
    /// Sample interpolation, overriding the settings file.
    #[arg(long, value_enum)]
    interpolation: Option<InterpolationArg>,
    /// Settings file (YAML, TOML or JSON).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Begin fading out after this many seconds.
    #[arg(long)]
    fade_after: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum InterpolationArg {
    Nearest,
    Linear,
    Cubic,
}

impl From<InterpolationArg> for Interpolation {
    fn from(arg: InterpolationArg) -> Self {
        match arg {
            InterpolationArg::Nearest => Interpolation::Nearest,
            InterpolationArg::Linear => Interpolation::Linear,
            InterpolationArg::Cubic => Interpolation::Cubic,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(interpolation) = cli.interpolation {
        settings.interpolation = interpolation.into();
    }
    let bank = Arc::new(load_sound_bank(&settings)?);
    let fade_after = cli.fade_after.map(Duration::from_secs_f64);

    match &cli.wav {
        Some(path) => {
            let output = HeadlessOutput::new(settings.sample_rate);
            let mut player = Player::new(bank, output, &settings);
            prepare(&mut player, &cli)?;
            let seconds = cli.seconds.unwrap_or(DEFAULT_RENDER_SECONDS);
            render_to_wav(&mut player, path, seconds, fade_after)?;
        }
        None => {
            let output = CpalOutput::new()?;
            let mut player = Player::new(bank, output, &settings);
            prepare(&mut player, &cli)?;
            play_audio(&mut player, cli.seconds, fade_after);
        }
    }
    Ok(())
}

fn prepare<O: AudioOutput>(player: &mut Player<O>, cli: &Cli) -> Result<(), Box<dyn Error>> {
    player.load(&cli.song)?;

    {
        let transport = player.transport().lock();
        let song = transport.song();
        println!("Song:     {}", cli.song.display());
        println!("Tempo:    {} ms/beat, {}/{}", song.ms_per_beat, song.steps_per_bar, song.beats_per_step);
        println!("Loop:     {}..{}", song.loop_start, song.loop_end);
        println!("Events:   {}", song.event_count());
        println!();
    }

    player.start(cli.start_beat)?;
    Ok(())
}

fn play_audio(player: &mut Player<CpalOutput>, seconds: Option<u32>, fade_after: Option<Duration>) {
    println!("Playing...");
    let started = Instant::now();
    let limit = seconds.map(|s| Duration::from_secs(s as u64));

    while player.is_playing() {
        std::thread::sleep(TICK);
        let elapsed = started.elapsed();

        if fade_after.is_some_and(|at| elapsed >= at) && !player.is_fading() {
            player.fade();
        }
        player.run_fade();

        if limit.is_some_and(|limit| elapsed >= limit) {
            let beat = player.stop();
            info!(beat, "time limit reached");
        }
    }

    println!("Done.");
}

fn render_to_wav(
    player: &mut Player<HeadlessOutput>,
    path: &Path,
    seconds: u32,
    fade_after: Option<Duration>,
) -> Result<(), Box<dyn Error>> {
    let sample_rate = player.output().sample_rate();
    println!("Rendering {} s to {} at {} Hz...", seconds, path.display(), sample_rate);

    // Drive the fade from the rendered timeline rather than the wall clock.
    let clock = Instant::now();
    let chunk = (sample_rate as usize / 100).max(1);
    let total = sample_rate as usize * seconds as usize;
    let mut frames: Vec<Frame> = Vec::with_capacity(total);

    while frames.len() < total && player.is_playing() {
        let rendered = Duration::from_secs_f64(frames.len() as f64 / sample_rate as f64);
        if fade_after.is_some_and(|at| rendered >= at) && !player.is_fading() {
            player.fade();
        }
        player.run_fade_at(clock + rendered);

        let n = chunk.min(total - frames.len());
        frames.extend(player.render_frames(n));
    }

    let mut writer = BufWriter::new(File::create(path)?);
    write_wav(&mut writer, &frames, sample_rate)?;
    writer.flush()?;
    println!("Rendered {} frames.", frames.len());
    Ok(())
}
