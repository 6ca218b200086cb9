// file: src/extractor/range.rs
// description: geofeed line validation and CIDR normalization
// reference: RFC 8805 section 2.1.1

use crate::models::{LineClass, ParsedRange};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// What is written for a line that passes validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// `<address as written>/<mask>`, bare addresses promoted to /32 or /128.
    #[default]
    Normalize,
    /// The address field exactly as it appears in the feed.
    Raw,
}

impl OutputMode {
    pub fn from_normalize_flag(normalize: bool) -> Self {
        if normalize {
            OutputMode::Normalize
        } else {
            OutputMode::Raw
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RangeExtractor {
    mode: OutputMode,
}

impl RangeExtractor {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        if line.is_empty() || line.starts_with('#') {
            return LineClass::Comment;
        }

        let candidate = address_field(line);
        match parse_candidate(candidate) {
            Some(range) => LineClass::Range { range, candidate },
            None => LineClass::Malformed,
        }
    }

    /// Validates one line; comments and malformed entries yield `None`.
    pub fn normalize(&self, line: &str) -> Option<ParsedRange> {
        match self.classify(line) {
            LineClass::Range { range, .. } => Some(range),
            LineClass::Comment | LineClass::Malformed => None,
        }
    }

    /// Validates one line and renders it according to the output mode.
    pub fn extract(&self, line: &str) -> Option<String> {
        match self.classify(line) {
            LineClass::Range { range, candidate } => Some(self.render(&range, candidate)),
            LineClass::Comment | LineClass::Malformed => None,
        }
    }

    pub fn render(&self, range: &ParsedRange, candidate: &str) -> String {
        match self.mode {
            OutputMode::Normalize => range.to_string(),
            OutputMode::Raw => candidate.to_string(),
        }
    }
}

/// Everything before the first comma, or the whole line for bare-range feeds.
fn address_field(line: &str) -> &str {
    line.split_once(',').map_or(line, |(field, _)| field)
}

// Addresses go through the std parser for both forms; ipnet's own parser
// accepts leading-zero octets that std rejects for bare addresses.
fn parse_candidate(candidate: &str) -> Option<ParsedRange> {
    match candidate.rsplit_once('/') {
        None => {
            let address: IpAddr = candidate.parse().ok()?;
            Some(ParsedRange::written(IpNet::from(address), candidate))
        }
        Some((ip, mask_text)) => {
            let mask = parse_mask(mask_text)?;
            let address: IpAddr = ip.parse().ok()?;
            let net = IpNet::new(address, mask).ok()?;
            Some(ParsedRange::written(net, ip))
        }
    }
}

fn parse_mask(text: &str) -> Option<u8> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
