/*!
# Catalogue
Contains the first pass over the input VCF.
Every record is classified, and the 0-based positional index of each record that matches a requested subtype is added to that subtype's candidate list.
Requested subtypes are mutually disjoint, so a record lands in at most one list.
*/
use anyhow::Context;
use indexmap::IndexMap;
use log::{debug, info, trace};

use crate::data_types::event_subtype::{EventSubtype, SelectionRequest};
use crate::data_types::events::{EventKind, EventRecord};

/// Lookup from each requested subtype to the indices of all matching records, in request order
#[derive(Clone, Debug, Default)]
pub struct Catalogue {
    /// Candidate record indices for each subtype, in file order
    candidates: IndexMap<EventSubtype, Vec<usize>>,
    /// Total number of records scanned
    total_records: usize,
    /// Records that could not be classified as insertion or deletion
    unknown_records: usize,
    /// Classified records that did not fit any requested subtype
    unmatched_records: usize
}

impl Catalogue {
    /// Creates an empty catalogue with one candidate list per request
    pub fn new(requests: &[SelectionRequest]) -> Self {
        let candidates = requests.iter()
            .map(|r| (*r.subtype(), vec![]))
            .collect();
        Self {
            candidates,
            ..Default::default()
        }
    }

    /// Adds the next record in file order, returning the subtype it was assigned to, if any.
    /// # Arguments
    /// * `record_index` - 0-based index of this record in the file
    /// * `record` - the classified record
    pub fn add_record(&mut self, record_index: usize, record: &EventRecord) -> Option<&EventSubtype> {
        self.total_records += 1;
        if record.kind() == EventKind::Unknown {
            self.unknown_records += 1;
            return None;
        }

        // first match is the only match since the subtypes are disjoint
        match self.candidates.iter_mut().find(|(subtype, _)| subtype.matches(record)) {
            Some((subtype, indices)) => {
                trace!("{record} added to list of size {}", indices.len());
                indices.push(record_index);
                Some(subtype)
            },
            None => {
                self.unmatched_records += 1;
                None
            }
        }
    }

    /// Returns the candidate indices for a subtype, if it was requested
    pub fn candidates(&self, subtype: &EventSubtype) -> Option<&[usize]> {
        self.candidates.get(subtype).map(|v| v.as_slice())
    }

    /// Iterates over (subtype, candidate indices) in request order
    pub fn iter(&self) -> impl Iterator<Item = (&EventSubtype, &Vec<usize>)> {
        self.candidates.iter()
    }

    /// Consumes the catalogue, handing back the candidate lists
    pub fn into_candidates(self) -> IndexMap<EventSubtype, Vec<usize>> {
        self.candidates
    }

    // getters
    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn unknown_records(&self) -> usize {
        self.unknown_records
    }

    pub fn unmatched_records(&self) -> usize {
        self.unmatched_records
    }
}

/// Scans all records and builds the catalogue for the given requests.
/// # Arguments
/// * `records` - the raw record lines in file order, header excluded
/// * `requests` - the requested subtypes, assumed to be mutually disjoint
/// # Errors
/// * if reading a record fails
/// * if a record is missing its REF/ALT columns
pub fn build_catalogue<I>(records: I, requests: &[SelectionRequest]) -> anyhow::Result<Catalogue>
where
    I: IntoIterator<Item = anyhow::Result<Vec<u8>>>
{
    let mut catalogue = Catalogue::new(requests);
    for (record_index, line) in records.into_iter().enumerate() {
        let line = line?;
        let record = EventRecord::from_vcf_line(&line)
            .with_context(|| format!("Error while classifying record #{}: {:?}", record_index + 1, String::from_utf8_lossy(&line)))?;
        catalogue.add_record(record_index, &record);
    }

    info!("Scanned {} records ({} unknown, {} unmatched)",
        catalogue.total_records, catalogue.unknown_records, catalogue.unmatched_records);
    for (subtype, indices) in catalogue.iter() {
        info!("\t{subtype}: {} candidates", indices.len());
    }
    debug!("Catalogue: {catalogue:?}");
    Ok(catalogue)
}
