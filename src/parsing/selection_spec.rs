
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::data_types::event_subtype::{EventSubtype, SelectionRequest};
use crate::data_types::events::{EventError, EventKind};

/// Lines starting with this are comments in the event-specification file
const COMMENT_PREFIX: char = '#';
/// KIND MIN MAX COUNT
const TOKENS_PER_LINE: usize = 4;

#[derive(thiserror::Error, Debug)]
pub enum SpecificationError {
    #[error("Error while reading {filename:?}: {source}")]
    Io { filename: PathBuf, source: std::io::Error },
    #[error("line {line_number} ('{line}') has {found} tokens, expected 'KIND MIN MAX COUNT' like 'INS 1 10 5'")]
    WrongTokenCount { line_number: usize, line: String, found: usize },
    #[error("line {line_number} ('{line}') has unrecognized event kind '{token}', expected INS or DEL")]
    UnknownKind { line_number: usize, line: String, token: String },
    #[error("line {line_number} ('{line}') has non-integer value '{token}'")]
    InvalidInteger { line_number: usize, line: String, token: String },
    #[error("line {line_number} ('{line}') is invalid: {source}")]
    InvalidRequest { line_number: usize, line: String, source: EventError },
    #[error("line {line_number} ('{line}') overlaps with previously requested {existing}")]
    Overlap { line_number: usize, line: String, existing: EventSubtype },
    #[error("no event subtypes were requested")]
    NoRequests
}

/// Opens and parses an event-specification file.
/// # Arguments
/// * `filename` - path to the text file with lines like "INS 1 5 10"
/// # Errors
/// * if the file cannot be opened or read
/// * if any line is malformed, or overlaps an earlier line; see `parse_selection_requests`
pub fn parse_selection_file(filename: &Path) -> Result<Vec<SelectionRequest>, SpecificationError> {
    let file = File::open(filename)
        .map_err(|source| SpecificationError::Io { filename: filename.to_path_buf(), source })?;
    parse_selection_requests(BufReader::new(file), filename)
}

/// Parses the event-specification lines into a list of requests with mutually disjoint subtypes.
/// Blank lines and lines starting with '#' are skipped.
/// Every other line must be `KIND MIN MAX COUNT`, where KIND is INS or DEL.
/// # Arguments
/// * `reader` - source of the lines
/// * `filename` - only used for error reporting
/// # Errors
/// * on the first malformed or overlapping line; there is no partial acceptance
/// * if no requests were found at all
pub fn parse_selection_requests<R: BufRead>(reader: R, filename: &Path) -> Result<Vec<SelectionRequest>, SpecificationError> {
    let mut requests: Vec<SelectionRequest> = vec![];
    for (line_index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| SpecificationError::Io { filename: filename.to_path_buf(), source })?;
        let line_number = line_index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
            continue;
        }

        let request = parse_request_line(trimmed, line_number)?;
        if let Some(existing) = requests.iter().find(|r| r.subtype().overlaps_with(request.subtype())) {
            return Err(SpecificationError::Overlap {
                line_number,
                line: trimmed.to_string(),
                existing: *existing.subtype()
            });
        }
        debug!("Parsed request: {} x {}", request.count(), request.subtype());
        requests.push(request);
    }

    if requests.is_empty() {
        return Err(SpecificationError::NoRequests);
    }
    Ok(requests)
}

/// Converts a single non-comment line into a request
fn parse_request_line(line: &str, line_number: usize) -> Result<SelectionRequest, SpecificationError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != TOKENS_PER_LINE {
        return Err(SpecificationError::WrongTokenCount {
            line_number, line: line.to_string(), found: tokens.len()
        });
    }

    let kind = EventKind::from_token(tokens[0])
        .ok_or_else(|| SpecificationError::UnknownKind {
            line_number, line: line.to_string(), token: tokens[0].to_string()
        })?;
    let min_size = parse_integer(tokens[1], line, line_number)?;
    let max_size = parse_integer(tokens[2], line, line_number)?;
    let count = parse_integer(tokens[3], line, line_number)?;

    let invalid = |source: EventError| SpecificationError::InvalidRequest {
        line_number, line: line.to_string(), source
    };
    let subtype = EventSubtype::new(kind, min_size, max_size).map_err(invalid)?;
    SelectionRequest::new(subtype, count).map_err(invalid)
}

/// Parses a signed integer token; negative values come back as 0 so the constructors reject them as non-positive.
fn parse_integer(token: &str, line: &str, line_number: usize) -> Result<usize, SpecificationError> {
    let value: i64 = token.parse()
        .map_err(|_e| SpecificationError::InvalidInteger {
            line_number, line: line.to_string(), token: token.to_string()
        })?;
    Ok(usize::try_from(value).unwrap_or(0))
}
