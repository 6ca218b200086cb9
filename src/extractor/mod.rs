// file: src/extractor/mod.rs
// description: range extraction module exports
// reference: internal module structure

pub mod lazy;
pub mod range;

pub use lazy::{Ranges, range_stream};
pub use range::{OutputMode, RangeExtractor};
