//! Device-less output driven by explicit pulls.
//!
//! Used for offline rendering and tests: nothing happens until the caller
//! asks for samples.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::traits::{AudioError, AudioOutput, StreamSource};

type Pull = Box<dyn FnMut(&mut [i16]) + Send>;

/// An output with no device behind it.
pub struct HeadlessOutput {
    sample_rate: u32,
    source: Option<Pull>,
}

impl HeadlessOutput {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate, source: None }
    }

    /// Is a source currently attached?
    pub fn is_attached(&self) -> bool {
        self.source.is_some()
    }

    /// Fill `out` from the attached source, or with silence when detached.
    pub fn pull(&mut self, out: &mut [i16]) {
        match self.source.as_mut() {
            Some(pull) => pull(out),
            None => out.fill(0),
        }
    }
}

impl AudioOutput for HeadlessOutput {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn attach<S: StreamSource>(&mut self, source: Arc<Mutex<S>>) -> Result<(), AudioError> {
        self.source = Some(Box::new(move |out: &mut [i16]| source.lock().fill(out)));
        Ok(())
    }

    fn detach(&mut self) -> Result<(), AudioError> {
        self.source = None;
        Ok(())
    }
}
