
use std::fmt;

use crate::data_types::events::{EventError, EventKind, EventRecord, SizeRange};

/// A subtype of events, e.g. insertions between 6 and 12 bases long.
/// The size range is inclusive on both ends.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EventSubtype {
    /// The event kind this subtype selects
    kind: EventKind,
    /// Smallest included event size
    min_size: SizeRange,
    /// Largest included event size
    max_size: SizeRange
}

impl EventSubtype {
    /// Constructor
    /// # Arguments
    /// * `kind` - the event kind
    /// * `min_size` - minimum event size, must be > 0
    /// * `max_size` - maximum event size, must be >= `min_size`
    /// # Errors
    /// * if either size is 0
    /// * if `min_size` > `max_size`
    pub fn new(kind: EventKind, min_size: usize, max_size: usize) -> Result<Self, EventError> {
        let min_size = SizeRange::new(min_size)?;
        let max_size = SizeRange::new(max_size)?;
        if min_size > max_size {
            return Err(EventError::InvertedSizeRange { min: min_size.get(), max: max_size.get() });
        }
        Ok(Self {
            kind, min_size, max_size
        })
    }

    /// Returns true if the event belongs to this subtype
    pub fn matches(&self, record: &EventRecord) -> bool {
        record.kind() == self.kind &&
            self.min_size <= record.magnitude() &&
            record.magnitude() <= self.max_size
    }

    /// Returns true if the two subtypes share at least one possible event, e.g. INS 1 5 and INS 5 10.
    pub fn overlaps_with(&self, other: &EventSubtype) -> bool {
        if self.kind != other.kind {
            return false;
        }

        // order by the lower bound, then it's a single comparison
        let (first, second) = if self.min_size <= other.min_size {
            (self, other)
        } else {
            (other, self)
        };
        first.max_size >= second.min_size
    }

    // getters
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn min_size(&self) -> SizeRange {
        self.min_size
    }

    pub fn max_size(&self) -> SizeRange {
        self.max_size
    }
}

impl fmt::Display for EventSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of minimum size {} and maximum size {}", self.kind, self.min_size, self.max_size)
    }
}

/// A requested subtype along with the number of events to pick from it
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SelectionRequest {
    /// Which events are eligible
    subtype: EventSubtype,
    /// How many of them to pick, always > 0
    count: usize
}

impl SelectionRequest {
    /// Constructor
    /// # Errors
    /// * if `count` is 0
    pub fn new(subtype: EventSubtype, count: usize) -> Result<Self, EventError> {
        if count == 0 {
            return Err(EventError::NonPositiveCount);
        }
        Ok(Self {
            subtype, count
        })
    }

    // getters
    pub fn subtype(&self) -> &EventSubtype {
        &self.subtype
    }

    pub fn count(&self) -> usize {
        self.count
    }
}
