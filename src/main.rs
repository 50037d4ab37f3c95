
use log::{LevelFilter, error, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Instant;

use vcf_event_picker::catalogue::build_catalogue;
use vcf_event_picker::cli::core::get_cli;
use vcf_event_picker::cli::pick::{PickSettings, check_pick_settings};
use vcf_event_picker::parsing::record_stream::RecordStream;
use vcf_event_picker::parsing::selection_spec::{SpecificationError, parse_selection_file};
use vcf_event_picker::sampler::sample_catalogue;
use vcf_event_picker::util::json_io::save_json;
use vcf_event_picker::writers::selected_vcf::stage_selected_records;
use vcf_event_picker::writers::selection_summary::SelectionSummaryWriter;

fn run_pick(settings: PickSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let settings = match check_pick_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // create a debug folder if specified
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("Creating debug folder at {debug_folder:?}...");
        if let Err(e) = std::fs::create_dir_all(debug_folder) {
            error!("Error while creating debug folder: {e}");
            std::process::exit(exitcode::IOERR);
        }

        // save the CLI options
        let cli_json = debug_folder.join("cli_settings.json");
        info!("Saving CLI options to {cli_json:?}...");
        if let Err(e) = save_json(&settings, &cli_json) {
            error!("Error while saving CLI options: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // all configuration problems need to surface before we touch the VCF
    info!("Loading event specification...");
    let requests = match parse_selection_file(&settings.event_spec) {
        Ok(r) => r,
        Err(e) => {
            error!("Error while parsing event specification: {e}");
            let code = match e {
                SpecificationError::Io { .. } => exitcode::IOERR,
                _ => exitcode::CONFIG
            };
            std::process::exit(code);
        }
    };
    info!("Requested subtypes:");
    for request in requests.iter() {
        info!("\t{} x {}", request.count(), request.subtype());
    }

    // first pass, classify everything
    info!("Classifying records in {:?}...", settings.input_vcf);
    let mut record_stream = match RecordStream::open(&settings.input_vcf) {
        Ok(rs) => rs,
        Err(e) => {
            error!("Error while opening input VCF: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };
    let catalogue = match build_catalogue(record_stream.by_ref(), &requests) {
        Ok(c) => c,
        Err(e) => {
            error!("Error while classifying records (line {}): {e:#}", record_stream.line_number());
            std::process::exit(exitcode::DATAERR);
        }
    };

    // draw from each subtype
    let seed: u64 = settings.seed.unwrap_or_else(rand::random);
    info!("Selecting records with seed {seed}...");
    let mut rng = SmallRng::seed_from_u64(seed);
    let selection = match sample_catalogue(catalogue, &requests, &mut rng) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while selecting records: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };

    // second pass, copy out the selected records; nothing is moved into place until the summary is done too
    info!("Saving selected records to {:?}...", settings.output_vcf);
    let staged_vcf = match stage_selected_records(&mut record_stream, &selection, &settings.output_vcf) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while saving output VCF: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    if let Some(summary_fn) = settings.output_summary.as_deref() {
        info!("Saving output summary to {summary_fn:?}...");
        let result = SelectionSummaryWriter::new(summary_fn)
            .and_then(|writer| writer.write_summary(&requests, &selection));
        if let Err(e) = result {
            error!("Error while saving summary file: {e:#}");
            // exit() skips destructors, the temporary VCF has to be removed here
            drop(staged_vcf);
            std::process::exit(exitcode::IOERR);
        }
    }

    if let Err(e) = staged_vcf.persist() {
        error!("Error while saving output VCF: {e:#}");
        if let Some(summary_fn) = settings.output_summary.as_deref() {
            if let Err(e) = std::fs::remove_file(summary_fn) {
                warn!("Error while removing summary file {summary_fn:?}: {e}");
            }
        }
        std::process::exit(exitcode::IOERR);
    }

    info!("Selected {} records in {} seconds.", selection.len(), start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    run_pick(cli.settings);
    info!("Process finished successfully.");
}
