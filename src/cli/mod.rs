/*!
# CLI module
Command line interface functionality that is specific to vcf-event-picker.
*/

/// The main CLI module that contains the top-level CLI parser and help text
pub mod core;
/// The settings for picking events
pub mod pick;
