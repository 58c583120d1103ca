//! Structured index and list writers
//!
//! The writers route an index's metadata and list payloads to one
//! concatenated stream or to one file per entry, under a set of
//! enumerated toggles. Numeric payload fields are rendered in uppercase
//! exponent notation.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignalError};
use crate::samples::{IndexEntry, SampleIndex, SampleList};

/// Time column selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeColumn {
    /// `t0 + (i - 1) * dt`
    Absolute,
    /// `i - 1`
    Normalized,
    /// No time column
    None,
}

/// File routing for list payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileLayout {
    /// Each entry's payload goes to the file named by the entry
    OnePerList,
    /// All payloads go to one concatenated destination
    SingleFile,
}

/// The recognized writer toggles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Emit the index header and per-entry metadata
    pub write_index: bool,
    /// Emit the list payloads
    pub write_lists: bool,
    pub time: TimeColumn,
    pub files: FileLayout,
    /// One value per line when set; one list per line otherwise
    pub break_lines: bool,
    pub write_real_part: bool,
    pub write_img_part: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            write_index: true,
            write_lists: true,
            time: TimeColumn::None,
            files: FileLayout::SingleFile,
            break_lines: true,
            write_real_part: true,
            write_img_part: false,
        }
    }
}

/// Writes one list's payload
pub fn write_list(
    list: &SampleList,
    out: &mut dyn Write,
    options: &WriteOptions,
) -> io::Result<()> {
    for pos in 1..=list.len() {
        let value = list
            .get(pos)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

        let mut fields: Vec<String> = Vec::with_capacity(3);
        match options.time {
            TimeColumn::Absolute => {
                let t = list.ini_time() + (pos as f64 - 1.0) * list.inc_time();
                fields.push(format!("{t:E}"));
            }
            TimeColumn::Normalized => fields.push(format!("{}", pos - 1)),
            TimeColumn::None => {}
        }
        if options.write_real_part {
            fields.push(format!("{:E}", value.re));
        }
        if options.write_img_part {
            fields.push(format!("{:E}", value.im));
        }

        write!(out, "{}", fields.join(" "))?;
        if options.break_lines {
            writeln!(out)?;
        } else {
            write!(out, " ")?;
        }
    }
    if !options.break_lines {
        writeln!(out)?;
    }
    Ok(())
}

/// Writes one entry's metadata header
fn write_entry_header(
    entry: &IndexEntry,
    number: usize,
    parent: Option<&SampleIndex>,
    out: &mut dyn Write,
) -> io::Result<()> {
    writeln!(out, "List #{number}")?;
    writeln!(out, "Position   : {}", entry.position())?;
    writeln!(out, "Name       : {}", entry.name)?;
    writeln!(out, "File       : {}", entry.file)?;
    writeln!(out, "Samples    : {}", entry.list.len())?;

    let parent_entry =
        entry.parent_entry.and_then(|id| parent.and_then(|p| p.entry(id).ok()));
    match parent_entry {
        Some(parent_entry) => {
            writeln!(out, "Parent Pos.: {}", parent_entry.position())?;
            writeln!(out, "Parent Name: {}", parent_entry.name)?;
        }
        None => {
            writeln!(out, "Parent Pos.: None")?;
            writeln!(out, "Parent Name: None")?;
        }
    }

    writeln!(out, "Init. Time : {:E}", entry.list.ini_time())?;
    writeln!(out, "Time incr. : {:E}", entry.list.inc_time())?;
    writeln!(out, "Init. ntime: {}", entry.list.ini_norm_time())?;

    if let Some(stats) = entry.list.stats() {
        writeln!(out, "Average    : ({:E}, {:E})", stats.avg.re, stats.avg.im)?;
        writeln!(out, "Variance   : ({:E}, {:E})", stats.var.re, stats.var.im)?;
        writeln!(out, "Std. Dev.  : ({:E}, {:E})", stats.std.re, stats.std.im)?;
        writeln!(out, "Maximums   : ({:E}, {:E})", stats.max.re, stats.max.im)?;
        writeln!(out, "Minimums   : ({:E}, {:E})", stats.min.re, stats.min.im)?;
    }
    Ok(())
}

/// Writes an index to a single destination stream
///
/// `parent` resolves the per-entry parent references for the metadata
/// headers; pass the index the entries were derived from when available.
pub fn write_index_to(
    index: &SampleIndex,
    parent: Option<&SampleIndex>,
    out: &mut dyn Write,
    options: &WriteOptions,
) -> io::Result<()> {
    if options.write_index {
        writeln!(out, "Index ID       : {}", index.id())?;
        if let Some(parent_id) = index.parent_id() {
            writeln!(out, "Parent Index ID: {parent_id}")?;
        }
        writeln!(out, "Number of lists: {}", index.len())?;
        writeln!(out)?;
    }

    for (number, id) in index.iter_ids().enumerate() {
        let entry = index
            .entry(id)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        if options.write_index {
            write_entry_header(entry, number + 1, parent, out)?;
        }
        if options.write_lists {
            write_list(&entry.list, out, options)?;
        }
        if options.write_index {
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Writes an index according to the file layout option
///
/// With [`FileLayout::SingleFile`] everything goes to `dest` (stdout
/// when `dest` is `None`). With [`FileLayout::OnePerList`] each entry's
/// payload goes to the file named by the entry, while headers go to
/// `dest`.
pub fn write_index(
    index: &SampleIndex,
    parent: Option<&SampleIndex>,
    dest: Option<&Path>,
    options: &WriteOptions,
) -> Result<()> {
    match options.files {
        FileLayout::SingleFile => {
            match dest {
                Some(path) => {
                    let mut file = File::create(path)?;
                    write_index_to(index, parent, &mut file, options)?;
                }
                None => {
                    let stdout = io::stdout();
                    let mut lock = stdout.lock();
                    write_index_to(index, parent, &mut lock, options)?;
                }
            }
            Ok(())
        }
        FileLayout::OnePerList => {
            // Headers to the destination, payloads to the entry files
            if options.write_index {
                let header_options = WriteOptions {
                    write_lists: false,
                    ..*options
                };
                match dest {
                    Some(path) => {
                        let mut file = File::create(path)?;
                        write_index_to(index, parent, &mut file, &header_options)?;
                    }
                    None => {
                        let stdout = io::stdout();
                        let mut lock = stdout.lock();
                        write_index_to(index, parent, &mut lock, &header_options)?;
                    }
                }
            }
            if options.write_lists {
                for id in index.iter_ids() {
                    let entry = index.entry(id).map_err(|e| SignalError::Io {
                        reason: e.to_string(),
                    })?;
                    let mut file = File::create(&entry.file)?;
                    write_list(&entry.list, &mut file, options)?;
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::Complex;
    use crate::samples::SampleKind;

    fn sample_index() -> SampleIndex {
        let mut index = SampleIndex::new(None);
        index
            .add_entry("tone", "tone.raw", None, SampleKind::Complex, 0.0, 0.5, 0, true)
            .unwrap();
        let list = &mut index.current_entry_mut().unwrap().list;
        list.push(Complex::new(1.0, -1.0));
        list.push(Complex::new(2.0, -2.0));
        index
    }

    fn render(index: &SampleIndex, options: &WriteOptions) -> String {
        let mut out = Vec::new();
        write_index_to(index, None, &mut out, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_index_header() {
        let index = sample_index();
        let text = render(&index, &WriteOptions::default());
        assert!(text.contains(&format!("Index ID       : {}", index.id())));
        assert!(text.contains("Number of lists: 1"));
        assert!(text.contains("Position   : 1"));
        assert!(text.contains("Name       : tone"));
        assert!(text.contains("Samples    : 2"));
        assert!(text.contains("Parent Pos.: None"));
    }

    #[test]
    fn test_values_in_exponent_notation() {
        let index = sample_index();
        let options = WriteOptions {
            write_index: false,
            ..WriteOptions::default()
        };
        let text = render(&index, &options);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["1E0", "2E0"]);
    }

    #[test]
    fn test_time_columns() {
        let index = sample_index();
        let options = WriteOptions {
            write_index: false,
            time: TimeColumn::Absolute,
            ..WriteOptions::default()
        };
        let text = render(&index, &options);
        assert!(text.starts_with("0E0 1E0"));
        assert!(text.contains("5E-1 2E0"));

        let options = WriteOptions {
            write_index: false,
            time: TimeColumn::Normalized,
            ..WriteOptions::default()
        };
        let text = render(&index, &options);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["0 1E0", "1 2E0"]);
    }

    #[test]
    fn test_imaginary_part_toggle() {
        let index = sample_index();
        let options = WriteOptions {
            write_index: false,
            write_img_part: true,
            ..WriteOptions::default()
        };
        let text = render(&index, &options);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["1E0 -1E0", "2E0 -2E0"]);
    }

    #[test]
    fn test_unbroken_lines() {
        let index = sample_index();
        let options = WriteOptions {
            write_index: false,
            break_lines: false,
            ..WriteOptions::default()
        };
        let text = render(&index, &options);
        assert_eq!(text, "1E0 2E0 \n");
    }

    #[test]
    fn test_stats_block_when_valid() {
        let mut index = sample_index();
        index
            .current_entry_mut()
            .unwrap()
            .list
            .calculate_statistics()
            .unwrap();
        let text = render(&index, &WriteOptions::default());
        assert!(text.contains("Average    : (1.5E0, -1.5E0)"));
        assert!(text.contains("Maximums   : (2E0, -1E0)"));
    }

    #[test]
    fn test_parent_resolution() {
        let parent = sample_index();
        let mut child = SampleIndex::new(Some(&parent));
        child
            .add_entry(
                "frame",
                "frame.0",
                parent.current(),
                SampleKind::Real,
                0.0,
                1.0,
                0,
                true,
            )
            .unwrap();

        let mut out = Vec::new();
        write_index_to(&child, Some(&parent), &mut out, &WriteOptions::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&format!("Parent Index ID: {}", parent.id())));
        assert!(text.contains("Parent Pos.: 1"));
        assert!(text.contains("Parent Name: tone"));
    }
}
