//! Player settings.
//!
//! Read from an optional YAML/TOML/JSON file and `ORGBEAT_*` environment
//! variables; anything unset falls back to the defaults below.

use config::{Config, Environment, File};
use ob_engine::Interpolation;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::PlayerError;

/// Environment variable prefix for overrides, e.g. `ORGBEAT_MUSIC_VOLUME=50`.
pub const ENV_PREFIX: &str = "ORGBEAT";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the wavetable and drum resources.
    pub resource_dir: PathBuf,
    /// Wavetable file name, relative to `resource_dir`.
    pub wavetable: PathBuf,
    /// Drum directory, relative to `resource_dir`.
    pub drum_dir: PathBuf,
    pub interpolation: Interpolation,
    /// User music volume, 0-100.
    pub music_volume: u8,
    /// Output rate for offline rendering; live playback uses the device rate.
    pub sample_rate: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resource_dir: PathBuf::from("data"),
            wavetable: PathBuf::from("wavetable.dat"),
            drum_dir: PathBuf::from("drums"),
            interpolation: Interpolation::Linear,
            music_volume: 100,
            sample_rate: 44100,
        }
    }
}

impl Settings {
    /// Load settings from `path` (if any) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, PlayerError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, PlayerError> {
        Ok(config.try_deserialize::<Settings>()?)
    }

    pub fn wavetable_path(&self) -> PathBuf {
        self.resource_dir.join(&self.wavetable)
    }

    /// Path of the definition file for drum `id`.
    pub fn drum_path(&self, id: u8) -> PathBuf {
        self.resource_dir.join(&self.drum_dir).join(format!("fx{:02x}.pcm", id))
    }

    /// The music volume as a 0.0-1.0 gain.
    pub fn user_volume(&self) -> f32 {
        self.music_volume.min(100) as f32 / 100.0
    }
}
