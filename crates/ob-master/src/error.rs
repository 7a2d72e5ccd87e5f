use ob_audio::AudioError;
use ob_formats::FormatError;
use std::io;
use std::path::PathBuf;

/// Errors surfaced by the playback controller.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("unable to read {}: {source}", path.display())]
    ResourceMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed resource: {0}")]
    Format(#[from] FormatError),

    #[error("audio output: {0}")]
    Audio(#[from] AudioError),

    #[error("no song loaded")]
    NotLoaded,

    #[error("invalid settings: {0}")]
    Settings(#[from] config::ConfigError),
}
