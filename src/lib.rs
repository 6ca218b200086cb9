// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod utils;

pub use config::{Config, OutputConfig, SourceConfig};
pub use error::{PipelineError, Result};
pub use extractor::{OutputMode, RangeExtractor, Ranges, range_stream};
pub use models::{AddressFamily, LineClass, ParsedRange};
pub use pipeline::{PipelineRunner, PipelineStats, ProgressTracker};
pub use source::{
    BoxedSink, GeofeedSource, HttpSource, LineSource, Location, ReaderSource, open_sink,
    open_source,
};
pub use utils::Validator;
