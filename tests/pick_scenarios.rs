//! End-to-end selection scenarios driven through the library pipeline:
//! event specification -> classification pass -> sampling -> output pass.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use vcf_event_picker::catalogue::build_catalogue;
use vcf_event_picker::parsing::record_stream::RecordStream;
use vcf_event_picker::parsing::selection_spec::{parse_selection_file, SpecificationError};
use vcf_event_picker::sampler::{sample_catalogue, SamplingError};
use vcf_event_picker::writers::selected_vcf::{save_selected_records, stage_selected_records};
use vcf_event_picker::writers::selection_summary::SelectionSummaryWriter;

const HEADER: &str = "##fileformat=VCFv4.2\n##contig=<ID=chr1,length=1000>\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";

/// 3 insertions of size 3, 2 deletions of size 4, plus an SNV and a complex substitution
const RECORDS: [&str; 7] = [
    "chr1\t100\tins_a\tA\tACGT\t.\tPASS\t.",
    "chr1\t150\tdel_a\tACGTA\tA\t.\tPASS\t.",
    "chr1\t200\tsnv_a\tA\tG\t.\tPASS\t.",
    "chr1\t250\tins_b\tC\tCAAA\t.\tPASS\t.",
    "chr1\t300\tmnp_a\tAC\tGT\t.\tPASS\t.",
    "chr1\t350\tdel_b\tTCCCA\tT\t.\tPASS\t.",
    "chr1\t400\tins_c\tG\tGTTT\t.\tPASS\t.",
];

/// Writes the mock VCF and an event specification into a fresh folder
fn setup(events: &str) -> (TempDir, PathBuf, PathBuf) {
    let folder = tempfile::tempdir().unwrap();
    let vcf_fn = folder.path().join("input.vcf");
    let events_fn = folder.path().join("events.txt");
    let mut content = HEADER.to_string();
    for record in RECORDS.iter() {
        content.push_str(record);
        content.push('\n');
    }
    std::fs::write(&vcf_fn, content).unwrap();
    std::fs::write(&events_fn, events).unwrap();
    (folder, vcf_fn, events_fn)
}

/// Runs the pipeline the same way the binary does
fn run_pipeline(vcf_fn: &Path, events_fn: &Path, out_fn: &Path, seed: u64) -> anyhow::Result<usize> {
    let requests = parse_selection_file(events_fn)?;
    let mut stream = RecordStream::open(vcf_fn)?;
    let catalogue = build_catalogue(stream.by_ref(), &requests)?;
    let selection = sample_catalogue(catalogue, &requests, &mut SmallRng::seed_from_u64(seed))?;
    save_selected_records(&mut stream, &selection, out_fn)
}

/// Same as `run_pipeline`, but the output VCF is only moved into place once the summary is written
fn run_pipeline_with_summary(vcf_fn: &Path, events_fn: &Path, out_fn: &Path, summary_fn: &Path) -> anyhow::Result<usize> {
    let requests = parse_selection_file(events_fn)?;
    let mut stream = RecordStream::open(vcf_fn)?;
    let catalogue = build_catalogue(stream.by_ref(), &requests)?;
    let selection = sample_catalogue(catalogue, &requests, &mut SmallRng::seed_from_u64(0))?;
    let staged = stage_selected_records(&mut stream, &selection, out_fn)?;
    SelectionSummaryWriter::new(summary_fn)?.write_summary(&requests, &selection)?;
    staged.persist()
}

#[test]
fn test_stratified_selection() {
    let (folder, vcf_fn, events_fn) = setup("# validation set\nINS 1 5 2\nDEL 1 5 1\n");
    let out_fn = folder.path().join("selected.vcf");

    for seed in 0..20 {
        let num_written = run_pipeline(&vcf_fn, &events_fn, &out_fn, seed).unwrap();
        assert_eq!(num_written, 3);

        let output = std::fs::read_to_string(&out_fn).unwrap();
        assert!(output.starts_with(HEADER));
        let records: Vec<&str> = output[HEADER.len()..].lines().collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records.iter().filter(|r| r.contains("\tins_")).count(), 2);
        assert_eq!(records.iter().filter(|r| r.contains("\tdel_")).count(), 1);

        // original relative order is kept
        let positions: Vec<usize> = records.iter()
            .map(|r| RECORDS.iter().position(|o| o == r).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "seed {seed}: {positions:?}");
    }
}

#[test]
fn test_select_everything() {
    let (folder, vcf_fn, events_fn) = setup("INS 3 3 3\nDEL 4 4 2\nINS 4 100 0\n");
    let out_fn = folder.path().join("selected.vcf");

    // a zero count is rejected up front
    let err = run_pipeline(&vcf_fn, &events_fn, &out_fn, 0).unwrap_err();
    assert!(matches!(err.downcast_ref::<SpecificationError>(), Some(SpecificationError::InvalidRequest { .. })));

    std::fs::write(&events_fn, "INS 3 3 3\nDEL 4 4 2\n").unwrap();
    run_pipeline(&vcf_fn, &events_fn, &out_fn, 0).unwrap();
    let output = std::fs::read_to_string(&out_fn).unwrap();
    let expected: String = HEADER.to_string() + &RECORDS.iter()
        .filter(|r| r.contains("\tins_") || r.contains("\tdel_"))
        .map(|r| format!("{r}\n"))
        .collect::<String>();
    assert_eq!(output, expected);
}

#[test]
fn test_insufficient_events() {
    let (folder, vcf_fn, events_fn) = setup("INS 1 5 4\n");
    let out_fn = folder.path().join("selected.vcf");

    let err = run_pipeline(&vcf_fn, &events_fn, &out_fn, 0).unwrap_err();
    match err.downcast_ref::<SamplingError>() {
        Some(SamplingError::InsufficientEvents { requested, available, .. }) => {
            assert_eq!(*requested, 4);
            assert_eq!(*available, 3);
        },
        other => panic!("unexpected error: {other:?}")
    }
    assert!(!out_fn.exists());
}

#[test]
fn test_overlapping_request() {
    let (folder, _vcf_fn, events_fn) = setup("INS 1 10 1\nINS 5 15 1\n");
    let out_fn = folder.path().join("selected.vcf");

    // the VCF is never needed, configuration fails first
    let missing_vcf = folder.path().join("missing.vcf");
    let err = run_pipeline(&missing_vcf, &events_fn, &out_fn, 0).unwrap_err();
    assert!(matches!(err.downcast_ref::<SpecificationError>(), Some(SpecificationError::Overlap { line_number: 2, .. })));
    assert!(!out_fn.exists());
}

#[test]
fn test_reproducible_with_seed() {
    let (folder, vcf_fn, events_fn) = setup("INS 1 5 1\nDEL 1 5 1\n");
    let first_fn = folder.path().join("first.vcf");
    let second_fn = folder.path().join("second.vcf");

    run_pipeline(&vcf_fn, &events_fn, &first_fn, 1234).unwrap();
    run_pipeline(&vcf_fn, &events_fn, &second_fn, 1234).unwrap();
    assert_eq!(std::fs::read(&first_fn).unwrap(), std::fs::read(&second_fn).unwrap());
}

#[test]
fn test_summary_with_output() {
    let (folder, vcf_fn, events_fn) = setup("INS 1 5 2\nDEL 1 5 1\n");
    let out_fn = folder.path().join("selected.vcf");
    let summary_fn = folder.path().join("summary.tsv");

    assert_eq!(run_pipeline_with_summary(&vcf_fn, &events_fn, &out_fn, &summary_fn).unwrap(), 3);
    assert!(out_fn.exists());
    let summary = std::fs::read_to_string(&summary_fn).unwrap();
    assert_eq!(summary.lines().count(), 3);
}

#[test]
fn test_failed_summary_leaves_no_output() {
    let (folder, vcf_fn, events_fn) = setup("INS 1 5 2\nDEL 1 5 1\n");
    let out_fn = folder.path().join("selected.vcf");

    // the summary path is a folder, so it cannot be created
    let summary_fn = folder.path().join("summary_folder");
    std::fs::create_dir(&summary_fn).unwrap();

    assert!(run_pipeline_with_summary(&vcf_fn, &events_fn, &out_fn, &summary_fn).is_err());
    assert!(!out_fn.exists());

    // only the inputs and the summary folder remain, no temporary VCF
    let mut remaining: Vec<String> = std::fs::read_dir(folder.path()).unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    remaining.sort();
    assert_eq!(remaining, vec!["events.txt", "input.vcf", "summary_folder"]);
}
