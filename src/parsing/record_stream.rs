
use anyhow::Context;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::data_types::events::trim_line_ending;

/// Header lines in a VCF start with this
pub const HEADER_PREFIX: u8 = b'#';

/// Wrapper function that handles both gzip compressed and uncompressed text files
/// # Arguments
/// * `filename` - path to the file to open, gzip is detected by the ".gz" extension
pub fn open_text_file(filename: &Path) -> anyhow::Result<BufReader<Box<dyn Read>>> {
    let file = File::open(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    let reader: Box<dyn Read> = if filename.extension().unwrap_or_default() == "gz" {
        // multi-member decoding also handles BGZF
        Box::new(flate2::read::MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(BufReader::new(reader))
}

/// A line-based reader over a VCF file.
/// Lines are raw bytes with their original line terminator, so they can be copied out unchanged.
/// The leading block of '#' lines is loaded up front as the header, records are then yielded lazily.
/// Blank lines after the header are skipped and never counted as records.
/// The stream can be rewound for a second pass over the records.
pub struct RecordStream {
    /// The file we are reading from
    filename: PathBuf,
    /// All header lines, in order
    header: Vec<Vec<u8>>,
    /// Reader over the rest of the file
    reader: BufReader<Box<dyn Read>>,
    /// First record line, which we consume while scanning for the end of the header
    pending: Option<Vec<u8>>,
    /// 1-based line number of the most recently read line
    line_number: usize
}

impl RecordStream {
    /// Opens the file and loads the header
    /// # Arguments
    /// * `filename` - the VCF file to open, optionally gzip compressed
    /// # Errors
    /// * if the file cannot be opened or read
    pub fn open(filename: &Path) -> anyhow::Result<Self> {
        debug!("Opening {filename:?}...");
        let reader = open_text_file(filename)?;
        let mut stream = Self {
            filename: filename.to_path_buf(),
            header: vec![],
            reader,
            pending: None,
            line_number: 0
        };
        stream.load_header()?;
        Ok(stream)
    }

    /// Consumes the header block, stashing the first record line if there is one
    fn load_header(&mut self) -> anyhow::Result<()> {
        while let Some(line) = self.read_line()? {
            if line.first() == Some(&HEADER_PREFIX) {
                self.header.push(line);
            } else {
                self.pending = Some(line);
                break;
            }
        }
        debug!("Loaded {} header lines from {:?}", self.header.len(), self.filename);
        Ok(())
    }

    /// Pulls the next raw line from the file, terminator included
    fn read_line(&mut self) -> anyhow::Result<Option<Vec<u8>>> {
        let mut line = vec![];
        let num_bytes = self.reader.read_until(b'\n', &mut line)
            .with_context(|| format!("Error while reading line {} of {:?}:", self.line_number + 1, self.filename))?;
        if num_bytes == 0 {
            Ok(None)
        } else {
            self.line_number += 1;
            Ok(Some(line))
        }
    }

    /// Reopens the file so that the records can be scanned a second time.
    /// The header is re-read as well, the next call to `next()` returns the first record again.
    pub fn rewind(&mut self) -> anyhow::Result<()> {
        debug!("Rewinding {:?}...", self.filename);
        self.reader = open_text_file(&self.filename)?;
        self.header.clear();
        self.pending = None;
        self.line_number = 0;
        self.load_header()
    }

    // getters
    pub fn header(&self) -> &[Vec<u8>] {
        &self.header
    }

    /// 1-based line number in the file of the most recently returned line
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl Iterator for RecordStream {
    type Item = anyhow::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.pending.take() {
            if !trim_line_ending(&line).is_empty() {
                return Some(Ok(line));
            }
        }

        loop {
            match self.read_line() {
                Ok(Some(line)) => {
                    if !trim_line_ending(&line).is_empty() {
                        return Some(Ok(line));
                    }
                },
                Ok(None) => return None,
                Err(e) => return Some(Err(e))
            }
        }
    }
}
