//! Writers for collected and derived data.
//!
//! - [`json`]: news documents as pretty JSON, to a file or stdout
//! - [`ngrams`]: bigram/trigram frequency tables for comment files

pub mod json;
pub mod ngrams;
