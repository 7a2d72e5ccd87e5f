//! Scheduled note events.

/// Note value meaning "no note": the event only carries volume/pan changes.
pub const NO_NOTE: u8 = 255;

/// Volume/panning value meaning "keep the current setting".
pub const UNCHANGED: u8 = 255;

/// A note or parameter change scheduled at one beat of one instrument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    /// Note number (octave * 12 + key), or [`NO_NOTE`]
    pub note: u8,
    /// Note length in beats
    pub length: u8,
    /// Volume (0-254), or [`UNCHANGED`]
    pub volume: u8,
    /// Panning (0-12, 6 = centre), or [`UNCHANGED`]
    pub panning: u8,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            note: NO_NOTE,
            length: 0,
            volume: UNCHANGED,
            panning: UNCHANGED,
        }
    }
}

impl Event {
    /// Create a note event.
    pub const fn note(note: u8, length: u8, volume: u8, panning: u8) -> Self {
        Self { note, length, volume, panning }
    }

    /// Does this event (re)trigger a note?
    pub fn has_note(&self) -> bool {
        self.note != NO_NOTE
    }

    /// New volume carried by the event, if any.
    pub fn volume(&self) -> Option<u8> {
        (self.volume != UNCHANGED).then_some(self.volume)
    }

    /// New panning carried by the event, if any.
    pub fn panning(&self) -> Option<u8> {
        (self.panning != UNCHANGED).then_some(self.panning)
    }
}
