
use std::fmt;

/// The event kinds we can assign to a single VCF record
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, strum_macros::Display)]
pub enum EventKind {
    /// REF length = 1, ALT length > 1
    #[strum(to_string = "Insertion")]
    Insertion,
    /// REF length > 1, ALT length = 1
    #[strum(to_string = "Deletion")]
    Deletion,
    /// Anything that doesn't match the above criteria; never requestable
    #[strum(to_string = "Unknown")]
    Unknown
}

impl EventKind {
    /// Parses a kind token from an event-specification line.
    /// Only insertions ("INS") and deletions ("DEL") can be requested, matched case-insensitively.
    /// Returns None for anything else, including tokens naming the unknown kind.
    pub fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("INS") {
            Some(EventKind::Insertion)
        } else if token.eq_ignore_ascii_case("DEL") {
            Some(EventKind::Deletion)
        } else {
            None
        }
    }

    /// The short token used in event-specification files and summary outputs
    pub fn token(&self) -> &'static str {
        match self {
            EventKind::Insertion => "INS",
            EventKind::Deletion => "DEL",
            EventKind::Unknown => "UNK"
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EventError {
    #[error("the size of an event must be greater than zero")]
    NonPositiveSize,
    #[error("the minimum size ({min}) is larger than the maximum size ({max})")]
    InvertedSizeRange { min: usize, max: usize },
    #[error("the number of events to select must be greater than zero")]
    NonPositiveCount,
    #[error("record has {columns} tab-separated column(s), REF and ALT require at least 5")]
    MissingAlleleColumns { columns: usize }
}

/// The size of an event in bases; always > 0
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct SizeRange(usize);

impl SizeRange {
    /// Constructor
    /// # Errors
    /// * if `size` is 0
    pub fn new(size: usize) -> Result<Self, EventError> {
        if size == 0 {
            return Err(EventError::NonPositiveSize);
        }
        Ok(Self(size))
    }

    /// The size as a plain integer, useful for comparisons and reporting
    pub fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SizeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 0-based column of the reference allele in a VCF record
const REF_COLUMN: usize = 3;
/// 0-based column of the alternate allele in a VCF record
const ALT_COLUMN: usize = 4;

/// Strips a trailing "\n" or "\r\n" from a raw line
pub fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// The classification of one VCF record: what kind of event it is and how big it is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EventRecord {
    /// Insertion, deletion, or unknown
    kind: EventKind,
    /// Number of inserted or deleted bases; 1 for unknown events
    magnitude: SizeRange
}

impl EventRecord {
    /// Constructor
    /// # Arguments
    /// * `kind` - the event kind
    /// * `magnitude` - the event size, must be > 0
    pub fn new(kind: EventKind, magnitude: usize) -> Result<Self, EventError> {
        Ok(Self {
            kind,
            magnitude: SizeRange::new(magnitude)?
        })
    }

    /// Classifies an event from the REF and ALT allele strings.
    /// Only simple single-ALT encodings are recognized, everything else is `Unknown` with size 1.
    /// # Arguments
    /// * `reference` - the REF column content
    /// * `alternate` - the ALT column content
    pub fn from_alleles(reference: &str, alternate: &str) -> Self {
        Self::from_allele_lengths(reference.len(), alternate.len())
    }

    /// Same as `from_alleles`, but only the allele lengths (in bytes) are needed
    fn from_allele_lengths(ref_len: usize, alt_len: usize) -> Self {
        let (kind, size) = if ref_len == 1 && alt_len > 1 {
            (EventKind::Insertion, alt_len - ref_len)
        } else if ref_len > 1 && alt_len == 1 {
            (EventKind::Deletion, ref_len - alt_len)
        } else {
            (EventKind::Unknown, 1)
        };

        // both branches above guarantee size >= 1
        Self {
            kind,
            magnitude: SizeRange(size)
        }
    }

    /// Classifies a raw, tab-separated VCF record line.
    /// Only the REF and ALT columns are inspected, the rest of the line may hold arbitrary bytes.
    /// A trailing "\n" or "\r\n" is ignored.
    /// # Errors
    /// * if the line does not contain the REF and ALT columns
    pub fn from_vcf_line(line: &[u8]) -> Result<Self, EventError> {
        let line = trim_line_ending(line);
        let columns: Vec<&[u8]> = line.split(|&b| b == b'\t')
            .take(ALT_COLUMN + 1)
            .collect();
        match (columns.get(REF_COLUMN), columns.get(ALT_COLUMN)) {
            (Some(r), Some(a)) => Ok(Self::from_allele_lengths(r.len(), a.len())),
            _ => Err(EventError::MissingAlleleColumns { columns: columns.len() })
        }
    }

    // getters
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn magnitude(&self) -> SizeRange {
        self.magnitude
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.kind, self.magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_range() {
        assert_eq!(SizeRange::new(0), Err(EventError::NonPositiveSize));
        assert_eq!(SizeRange::new(7).unwrap().get(), 7);
        assert!(SizeRange::new(1).unwrap() < SizeRange::new(2).unwrap());
    }

    #[test]
    fn test_classify_alleles() {
        assert_eq!(EventRecord::from_alleles("A", "ACGT"), EventRecord::new(EventKind::Insertion, 3).unwrap());
        assert_eq!(EventRecord::from_alleles("ACGT", "A"), EventRecord::new(EventKind::Deletion, 3).unwrap());
        assert_eq!(EventRecord::from_alleles("AC", "GT"), EventRecord::new(EventKind::Unknown, 1).unwrap());

        // SNVs and the multi-allelic encodings fall through to unknown
        assert_eq!(EventRecord::from_alleles("A", "G").kind(), EventKind::Unknown);
        assert_eq!(EventRecord::from_alleles("A", "G,T").kind(), EventKind::Unknown);
        assert_eq!(EventRecord::from_alleles("ACG", "A,T").kind(), EventKind::Unknown);
    }

    #[test]
    fn test_classify_line() {
        let line = b"chr1\t100\t.\tA\tAGG\t50\tPASS\t.\tGT\t0/1\n";
        let record = EventRecord::from_vcf_line(line).unwrap();
        assert_eq!(record.kind(), EventKind::Insertion);
        assert_eq!(record.magnitude().get(), 2);
        assert_eq!(record.to_string(), "Insertion of 2");

        // exactly five columns is enough, and the line ending is not part of ALT
        let record = EventRecord::from_vcf_line(b"chr1\t100\t.\tCTTT\tC").unwrap();
        assert_eq!(record.kind(), EventKind::Deletion);
        assert_eq!(record.magnitude().get(), 3);
        let record = EventRecord::from_vcf_line(b"chr1\t100\t.\tC\tCT\r\n").unwrap();
        assert_eq!(record, EventRecord::new(EventKind::Insertion, 1).unwrap());

        assert_eq!(
            EventRecord::from_vcf_line(b"chr1\t100\t.\tA"),
            Err(EventError::MissingAlleleColumns { columns: 4 })
        );
        assert_eq!(
            EventRecord::from_vcf_line(b"chr1 100 . A AGG"),
            Err(EventError::MissingAlleleColumns { columns: 1 })
        );
    }

    #[test]
    fn test_classify_non_utf8_payload() {
        let line = b"chr1\t100\t.\tACG\tA\t.\tPASS\tNOTE=caf\xe9\n";
        let record = EventRecord::from_vcf_line(line).unwrap();
        assert_eq!(record, EventRecord::new(EventKind::Deletion, 2).unwrap());
    }

    #[test]
    fn test_trim_line_ending() {
        assert_eq!(trim_line_ending(b"abc\r\n"), b"abc");
        assert_eq!(trim_line_ending(b"abc\n"), b"abc");
        assert_eq!(trim_line_ending(b"abc"), b"abc");
        assert_eq!(trim_line_ending(b"\n"), b"");
    }

    #[test]
    fn test_kind_tokens() {
        assert_eq!(EventKind::from_token("INS"), Some(EventKind::Insertion));
        assert_eq!(EventKind::from_token("del"), Some(EventKind::Deletion));
        assert_eq!(EventKind::from_token("UNK"), None);
        assert_eq!(EventKind::from_token("DUP"), None);
        assert_eq!(EventKind::Insertion.to_string(), "Insertion");
        assert_eq!(EventKind::Deletion.token(), "DEL");
    }
}
