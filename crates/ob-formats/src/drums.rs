//! Drum bank loading.
//!
//! Each of the eight percussive instruments maps to a drum slot; a slot is
//! optionally bound to a drum definition resource, which is pre-rendered to
//! 16-bit PCM before playback starts.

use ob_ir::{DrumBank, DRUM_SLOTS};
use tracing::debug;

use crate::FormatError;

/// Default slot to definition-id mapping.
pub const DRUM_TABLE: [Option<u8>; DRUM_SLOTS] = [
    Some(0x96),
    None,
    Some(0x97),
    None,
    Some(0x9a),
    Some(0x98),
    Some(0x99),
    None,
];

/// Turns a drum definition resource into playable samples.
pub trait DrumRenderer {
    /// Render `definition` into signed 16-bit mono samples.
    fn render(&mut self, definition: &[u8]) -> Result<Vec<i16>, String>;
}

/// Renderer for definitions that are already signed 8-bit PCM.
///
/// Each byte becomes one sample on the same scale as the wavetable.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcmDrumRenderer;

impl DrumRenderer for PcmDrumRenderer {
    fn render(&mut self, definition: &[u8]) -> Result<Vec<i16>, String> {
        Ok(definition.iter().map(|&b| b as i8 as i16).collect())
    }
}

/// Fill `bank` from `table`.
///
/// `fetch` returns the raw definition for an id. Unmapped slots are skipped;
/// any failure on a mapped slot aborts the load.
pub fn load_drums<F, R>(
    table: &[Option<u8>; DRUM_SLOTS],
    mut fetch: F,
    renderer: &mut R,
    bank: &mut DrumBank,
) -> Result<(), FormatError>
where
    F: FnMut(u8) -> Result<Vec<u8>, String>,
    R: DrumRenderer + ?Sized,
{
    for (slot, id) in table.iter().enumerate() {
        let Some(id) = *id else {
            continue;
        };

        debug!("loading drum {:#04x} into slot {}", id, slot);

        let definition = fetch(id).map_err(|reason| FormatError::MissingDrum { slot, id, reason })?;
        let rendered = renderer
            .render(&definition)
            .map_err(|reason| FormatError::Render { slot, id, reason })?;

        bank.store(slot, &rendered);
    }
    Ok(())
}
