//! Organya (`.org`) song parser.
//!
//! Layout, all little-endian:
//! - 6-byte signature (`Org-02` / `Org-03`), not validated
//! - `u16` ms per beat, `u8` steps per bar, `u8` beats per step
//! - `u32` loop start, `u32` loop end
//! - 16 instrument headers: `u16` tuning, `u8` wave, `u8` pipi, `u16` event count
//! - per instrument, events stored column by column: all beats (`u32`), then
//!   all notes, lengths, volumes and pannings (`u8` each)

use ob_ir::{Event, Instrument, Song, NUM_INSTRUMENTS};

use crate::FormatError;

/// Length of the leading signature.
pub const ORG_SIGNATURE_LEN: usize = 6;

struct OrgReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> OrgReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn skip(&mut self, n: usize) -> Result<(), FormatError> {
        self.read_bytes(n).map(|_| ())
    }

    fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16_le(&mut self) -> Result<u16, FormatError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32_le(&mut self) -> Result<u32, FormatError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let end = self.pos.checked_add(n).ok_or(FormatError::UnexpectedEof)?;
        if end > self.data.len() {
            return Err(FormatError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }
}

/// Parse an Organya song.
///
/// A truncated file is rejected as a whole; no partial song is returned.
pub fn load_org(data: &[u8]) -> Result<Song, FormatError> {
    let mut r = OrgReader::new(data);
    r.skip(ORG_SIGNATURE_LEN)?;

    let ms_per_beat = r.read_u16_le()?;
    let steps_per_bar = r.read_u8()?;
    let beats_per_step = r.read_u8()?;
    let loop_start = r.read_u32_le()?;
    let loop_end = r.read_u32_le()?;

    let mut song = Song::new(ms_per_beat, loop_start, loop_end);
    song.steps_per_bar = steps_per_bar;
    song.beats_per_step = beats_per_step;

    let mut counts = [0usize; NUM_INSTRUMENTS];
    for (instrument, count) in song.instruments.iter_mut().zip(counts.iter_mut()) {
        let tuning = r.read_u16_le()?;
        let wave = r.read_u8()?;
        let pipi = r.read_u8()? != 0;
        *count = r.read_u16_le()? as usize;
        *instrument = Instrument::new(tuning, wave, pipi);
    }

    for (instrument, &count) in song.instruments.iter_mut().zip(counts.iter()) {
        read_events(&mut r, instrument, count)?;
    }

    Ok(song)
}

fn read_events(r: &mut OrgReader<'_>, instrument: &mut Instrument, count: usize) -> Result<(), FormatError> {
    if count == 0 {
        return Ok(());
    }

    let mut beats = Vec::with_capacity(count);
    for _ in 0..count {
        beats.push(r.read_u32_le()?);
    }
    let notes = r.read_bytes(count)?;
    let lengths = r.read_bytes(count)?;
    let volumes = r.read_bytes(count)?;
    let pannings = r.read_bytes(count)?;

    for (i, &beat) in beats.iter().enumerate() {
        let event = Event::note(notes[i], lengths[i], volumes[i], pannings[i]);
        instrument.insert_event(beat, event);
    }
    Ok(())
}
