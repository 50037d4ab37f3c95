/// Builds the per-subtype candidate lists from the first pass over the VCF
pub mod catalogue;
/// Command line interface functionality
pub mod cli;
/// Contains the event and subtype data types
pub mod data_types;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Random selection of records from the catalogue
pub mod sampler;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
