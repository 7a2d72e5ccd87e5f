//! Sound bank assembly from on-disk resources.

use ob_formats::{load_drums, load_wavetable, DrumRenderer, PcmDrumRenderer, DRUM_TABLE};
use ob_ir::{DrumBank, SoundBank};
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::{PlayerError, Settings};

/// Load the wavetable and the PCM drum set named by `settings`.
pub fn load_sound_bank(settings: &Settings) -> Result<SoundBank, PlayerError> {
    load_sound_bank_with(settings, &mut PcmDrumRenderer)
}

/// Like [`load_sound_bank`], rendering drum definitions with `renderer`.
pub fn load_sound_bank_with<R>(settings: &Settings, renderer: &mut R) -> Result<SoundBank, PlayerError>
where
    R: DrumRenderer + ?Sized,
{
    let path = settings.wavetable_path();
    info!(path = %path.display(), "loading wavetable");
    let wavetable = load_wavetable(&read_resource(&path)?).map_err(|e| {
        error!(path = %path.display(), error = %e, "bad wavetable");
        e
    })?;

    let mut drums = DrumBank::new();
    load_drums(
        &DRUM_TABLE,
        |id| {
            let path = settings.drum_path(id);
            fs::read(&path).map_err(|e| format!("{}: {}", path.display(), e))
        },
        renderer,
        &mut drums,
    )
    .map_err(|e| {
        error!(error = %e, "failed to load drums");
        e
    })?;

    info!(drums = drums.loaded_count(), "sound bank ready");
    Ok(SoundBank::new(wavetable, drums))
}

fn read_resource(path: &Path) -> Result<Vec<u8>, PlayerError> {
    fs::read(path).map_err(|source| {
        error!(path = %path.display(), error = %source, "missing resource");
        PlayerError::ResourceMissing { path: path.to_path_buf(), source }
    })
}
