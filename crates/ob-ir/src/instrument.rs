//! Instrument track definitions.

use alloc::collections::btree_map::Entry;
use alloc::collections::BTreeMap;

use crate::event::Event;

/// Tuning value that leaves the note frequency untouched.
pub const DEFAULT_TUNING: u16 = 1000;

/// Which sound source an instrument slot draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstrumentKind {
    /// Plays one of the 100 wavetable shapes.
    Melodic,
    /// Plays a drum sample from the drum bank.
    Percussive,
}

/// One instrument track: static settings plus its sparse event table.
///
/// Playback state (phase, current volume, ...) lives in the engine's voice,
/// not here, so a song can be shared and replayed without being mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instrument {
    /// Frequency fine tuning; 1000 is neutral.
    pub tuning: u16,
    /// Wavetable shape index (taken modulo 100).
    pub wave: u8,
    /// Held-note ("pipi") flag.
    pub pipi: bool,
    /// Events keyed by absolute beat.
    pub events: BTreeMap<u32, Event>,
}

impl Default for Instrument {
    fn default() -> Self {
        Self {
            tuning: DEFAULT_TUNING,
            wave: 0,
            pipi: false,
            events: BTreeMap::new(),
        }
    }
}

impl Instrument {
    /// Create an instrument with no events.
    pub fn new(tuning: u16, wave: u8, pipi: bool) -> Self {
        Self {
            tuning,
            wave,
            pipi,
            events: BTreeMap::new(),
        }
    }

    /// Look up the event scheduled at `beat`, if any.
    pub fn event_at(&self, beat: u32) -> Option<&Event> {
        self.events.get(&beat)
    }

    /// Schedule an event. An existing event at the same beat is kept.
    ///
    /// Returns false if the beat was already taken.
    pub fn insert_event(&mut self, beat: u32, event: Event) -> bool {
        match self.events.entry(beat) {
            Entry::Vacant(slot) => {
                slot.insert(event);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Beat of the last scheduled event.
    pub fn last_beat(&self) -> Option<u32> {
        self.events.keys().next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_ordered_by_beat() {
        let mut inst = Instrument::default();
        inst.insert_event(12, Event::note(1, 1, 200, 6));
        inst.insert_event(3, Event::note(2, 1, 200, 6));
        inst.insert_event(7, Event::note(3, 1, 200, 6));
        let beats: alloc::vec::Vec<u32> = inst.events.keys().copied().collect();
        assert_eq!(beats, [3, 7, 12]);
        assert_eq!(inst.last_beat(), Some(12));
    }

    #[test]
    fn duplicate_beat_keeps_first_event() {
        let mut inst = Instrument::default();
        assert!(inst.insert_event(4, Event::note(10, 1, 100, 6)));
        assert!(!inst.insert_event(4, Event::note(20, 1, 100, 6)));
        assert_eq!(inst.event_at(4).map(|e| e.note), Some(10));
    }

    #[test]
    fn sparse_lookup_misses_empty_beats() {
        let mut inst = Instrument::default();
        inst.insert_event(1_000_000, Event::note(5, 1, 100, 6));
        assert!(inst.event_at(999_999).is_none());
        assert!(inst.event_at(1_000_000).is_some());
    }
}
