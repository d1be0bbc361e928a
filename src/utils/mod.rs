//! Utilities module aggregator exposing path and file-write helpers.

pub mod fs;
pub mod path;
