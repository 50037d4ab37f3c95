/*!
# Writers module
Contains the logic for writing the output files.
*/
/// Writes the header plus the selected records to the output VCF
pub mod selected_vcf;
/// Generates the per-subtype summary file
pub mod selection_summary;
