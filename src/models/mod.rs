// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod range;

pub use range::{AddressFamily, LineClass, ParsedRange};
