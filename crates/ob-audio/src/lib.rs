//! Audio output backends for the orgbeat player.

mod cpal_backend;
mod headless;
mod traits;

pub use cpal_backend::CpalOutput;
pub use headless::HeadlessOutput;
pub use traits::{AudioError, AudioOutput, StreamSource};
