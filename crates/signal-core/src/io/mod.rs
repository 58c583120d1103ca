//! Signal file input and output
//!
//! Reading detects the file format (RIFF/WAVE, falling back to raw
//! text) and fills a sample list; writing emits indices and lists under
//! a set of [`WriteOptions`] toggles.

pub mod raw;
pub mod wave;
pub mod writer;

pub use wave::{WaveFormat, WaveInfo};
pub use writer::{write_index, write_index_to, write_list, FileLayout, TimeColumn, WriteOptions};

use std::fs;

use crate::error::Result;
use crate::samples::{SampleIndex, SampleList};

/// Reads a signal file into a sample list
///
/// RIFF/WAVE content is decoded as PCM; anything else is parsed as raw
/// text. Returns the WAVE description when the file was a WAVE file.
pub fn read_samples_bytes(list: &mut SampleList, data: &[u8]) -> Result<Option<WaveInfo>> {
    if wave::detect(data) {
        let info = wave::decode(data, list)?;
        Ok(Some(info))
    } else {
        let text = String::from_utf8_lossy(data);
        raw::decode(&text, list)?;
        Ok(None)
    }
}

/// Reads the file of the entry at the given position into its list
pub fn read_samples_file(index: &mut SampleIndex, pos: usize) -> Result<Option<WaveInfo>> {
    let id = index.entry_at(pos)?;
    let path = index.entry(id)?.file.clone();
    let data = fs::read(&path)?;
    index.set_current(id)?;
    read_samples_bytes(&mut index.entry_mut(id)?.list, &data)
}
