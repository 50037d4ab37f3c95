
use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::data_types::event_subtype::SelectionRequest;
use crate::sampler::Selection;

/// Contains all the data written to each row of the summary file
#[derive(Debug, PartialEq, Serialize)]
struct SelectionSummaryRow {
    /// Event kind token, INS or DEL
    kind: String,
    /// Minimum event size, inclusive
    min_size: usize,
    /// Maximum event size, inclusive
    max_size: usize,
    /// Number of events asked for
    requested: usize,
    /// Number of matching events found in the input
    available: usize,
    /// Number of events written to the output
    selected: usize
}

/// This is a wrapper for writing out per-subtype selection stats to a file
pub struct SelectionSummaryWriter {
    /// Handle on the writer
    csv_writer: csv::Writer<File>
}

impl SelectionSummaryWriter {
    /// Creates a new writer
    /// # Arguments
    /// * `filename` - path to the filename that will get opened, must be .csv/.tsv
    pub fn new(filename: &Path) -> csv::Result<Self> {
        // modify the delimiter to "," if it ends with .csv
        let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
        let delimiter: u8 = if is_csv { b',' } else { b'\t' };
        let csv_writer: csv::Writer<File> = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(filename)?;
        Ok(Self {
            csv_writer
        })
    }

    /// Writes one row per request, in request order, and flushes the file
    /// # Arguments
    /// * `requests` - the original requests
    /// * `selection` - the draws made for those requests
    pub fn write_summary(mut self, requests: &[SelectionRequest], selection: &Selection) -> csv::Result<()> {
        for row in build_rows(requests, selection) {
            self.csv_writer.serialize(&row)?;
        }
        self.csv_writer.flush()?;
        Ok(())
    }
}

/// Lines up each request with its draw; requests without a draw report zeros
fn build_rows(requests: &[SelectionRequest], selection: &Selection) -> Vec<SelectionSummaryRow> {
    requests.iter()
        .map(|request| {
            let subtype = request.subtype();
            let (available, selected) = selection.draws()
                .find(|(s, _)| *s == subtype)
                .map(|(_, draw)| (draw.available(), draw.selected().len()))
                .unwrap_or((0, 0));
            SelectionSummaryRow {
                kind: subtype.kind().token().to_string(),
                min_size: subtype.min_size().get(),
                max_size: subtype.max_size().get(),
                requested: request.count(),
                available,
                selected
            }
        })
        .collect()
}
