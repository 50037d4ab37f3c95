
/// Requested event subtypes and the selection requests built from them
pub mod event_subtype;
/// Event kinds, sizes, and the classification of VCF records
pub mod events;
