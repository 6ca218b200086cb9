// file: src/utils/validation.rs
// description: input validation helpers for geofeed locations
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Validation(format!(
                "Non-HTTP URL passed as geofeed source: \"{}\"",
                url
            )));
        }

        if url.trim_start_matches("https://").trim_start_matches("http://").is_empty() {
            return Err(PipelineError::Validation(format!("URL has no host: \"{}\"", url)));
        }

        Ok(())
    }

    /// The output must not overwrite the input it is being generated from.
    pub fn validate_distinct_paths(input: &Path, output: &Path) -> Result<()> {
        if input == output {
            return Err(PipelineError::Validation(format!(
                "Output path {} is the same as the input",
                output.display()
            )));
        }

        if let (Ok(a), Ok(b)) = (input.canonicalize(), output.canonicalize()) {
            if a == b {
                return Err(PipelineError::Validation(format!(
                    "Output path {} resolves to the input file",
                    output.display()
                )));
            }
        }

        Ok(())
    }

    pub fn truncate_text(text: &str, max_length: usize) -> String {
        match text.char_indices().nth(max_length) {
            Some((end, _)) => format!("{}...", &text[..end]),
            None => text.to_string(),
        }
    }
}
