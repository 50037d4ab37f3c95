
use anyhow::bail;
use clap::Parser;
use lazy_static::lazy_static;
use std::path::Path;

use crate::cli::pick::PickSettings;

lazy_static! {
    /// Stores the full version string we plan to use, which is generated in build.rs
    /// # Examples
    /// * `0.1.0-6bb9635-dirty` - while on a dirty branch
    /// * `0.1.0-6bb9635` - with a fresh commit
    pub static ref FULL_VERSION: String = format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("VERGEN_GIT_DESCRIBE"));
}

/// Shared after help string with usage notes for the event-specification file.
pub const AFTER_HELP: &str = "Event-specification lines look like \"INS 1 5 10\", meaning: pick 10 insertions,
any of which can be 1, 2, 3, 4, or 5 bp long. Use DEL for deletions. Lines starting
with '#' are comments. Ranges of the same kind may not overlap.";

/// vcf-event-picker, picks a random, stratified subset of insertions and deletions from a VCF for validation.
#[derive(Parser)]
#[clap(author,
    version = &**FULL_VERSION,
    about,
    after_help = AFTER_HELP)]
pub struct Cli {
    #[command(flatten)]
    pub settings: PickSettings
}

pub fn get_cli() -> Cli {
    Cli::parse()
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
pub fn check_required_filename(filename: &Path, label: &str) -> anyhow::Result<()> {
    if !filename.exists() {
        bail!("{} does not exist: \"{}\"", label, filename.display());
    }

    // file exists
    Ok(())
}

/// Checks that the folder a new file will be written into exists
/// # Arguments
/// * `filename` - the output file path
/// * `label` - the label to use for error messages
pub fn check_output_filename(filename: &Path, label: &str) -> anyhow::Result<()> {
    if let Some(parent) = filename.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            bail!("{} folder does not exist: \"{}\"", label, parent.display());
        }
    }

    // either a bare filename, or the folder exists
    Ok(())
}
