/*!
# Parsing module
Contains the logic for parsing input files into meaningful structs / data.
*/
/// Line reader over the input VCF with header separation and rewind support
pub mod record_stream;
/// Parser for the event-specification file
pub mod selection_spec;
