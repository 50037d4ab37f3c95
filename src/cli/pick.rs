
use anyhow::ensure;
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_output_filename, check_required_filename, FULL_VERSION};

#[derive(Args, Clone, Default, Serialize)]
pub struct PickSettings {
    #[clap(skip)]
    picker_version: String,

    /// Input variant call file (VCF), optionally gzip compressed
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input-vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_vcf: PathBuf,

    /// Event-specification file with lines like "INS 1 5 10"
    #[clap(required = true)]
    #[clap(short = 'e')]
    #[clap(long = "events")]
    #[clap(value_name = "TXT")]
    #[clap(help_heading = Some("Input/Output"))]
    pub event_spec: PathBuf,

    /// Output VCF with the selected records; gzip compressed if it ends with .gz
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_vcf: PathBuf,

    /// Output summary file (CSV/TSV) with per-subtype counts
    #[clap(long = "output-summary")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_summary: Option<PathBuf>,

    /// Optional output debug folder
    #[clap(long = "output-debug")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub debug_folder: Option<PathBuf>,

    /// Seed for the random selection [default: random, reported in the log]
    #[clap(long = "seed")]
    #[clap(value_name = "INT")]
    #[clap(help_heading = Some("Selection"))]
    pub seed: Option<u64>,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_pick_settings(mut settings: PickSettings) -> anyhow::Result<PickSettings> {
    // hard code the version in
    settings.picker_version = FULL_VERSION.clone();
    info!("vcf-event-picker version: {:?}", &settings.picker_version);
    info!("Inputs:");

    // check for all the required input files
    check_required_filename(&settings.input_vcf, "Input VCF")?;
    info!("\tInput VCF: {:?}", &settings.input_vcf);
    check_required_filename(&settings.event_spec, "Event specification")?;
    info!("\tEvent specification: {:?}", &settings.event_spec);

    // outputs
    info!("Outputs:");
    ensure!(settings.output_vcf != settings.input_vcf, "--output-vcf must be different from --input-vcf");
    check_output_filename(&settings.output_vcf, "Output VCF")?;
    info!("\tOutput VCF: {:?}", &settings.output_vcf);
    if let Some(summary_fn) = settings.output_summary.as_deref() {
        check_output_filename(summary_fn, "Output summary")?;
        info!("\tSummary: {summary_fn:?}");
    } else {
        info!("\tSummary: None");
    }
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("\tDebug folder: {debug_folder:?}");
    }

    info!("Selection parameters:");
    match settings.seed {
        Some(seed) => info!("\tSeed: {seed}"),
        None => info!("\tSeed: random")
    };

    Ok(settings)
}
