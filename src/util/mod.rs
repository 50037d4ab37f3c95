
/// Helper functions for writing JSON via serde
pub mod json_io;
