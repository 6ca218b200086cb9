// file: src/extractor/lazy.rs
// description: lazy single-pass range sequences over sync and async line sources
// reference: https://docs.rs/futures/latest/futures/stream/fn.unfold.html

use crate::extractor::range::RangeExtractor;
use crate::source::LineSource;
use futures::stream::{self, Stream};
use std::io;

/// Pulls lines on demand until one normalizes. Yields a source error once, then ends.
pub struct Ranges<I> {
    extractor: RangeExtractor,
    lines: Option<I>,
}

impl<I> Iterator for Ranges<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.lines.as_mut()?.next();
            match next {
                Some(Ok(line)) => {
                    if let Some(range) = self.extractor.extract(&line) {
                        return Some(Ok(range));
                    }
                }
                Some(Err(e)) => {
                    self.lines = None;
                    return Some(Err(e));
                }
                None => {
                    self.lines = None;
                    return None;
                }
            }
        }
    }
}

impl<I> std::iter::FusedIterator for Ranges<I> where I: Iterator<Item = io::Result<String>> {}

impl RangeExtractor {
    /// Adapts a fallible line iterator such as `BufRead::lines()`.
    pub fn ranges<I>(self, lines: I) -> Ranges<I::IntoIter>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        Ranges {
            extractor: self,
            lines: Some(lines.into_iter()),
        }
    }

    pub fn extract_all<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        text.lines().filter_map(move |line| self.extract(line))
    }
}

/// Async counterpart of [`Ranges`]; the source is closed once it errors or runs dry.
pub fn range_stream<S>(
    extractor: RangeExtractor,
    source: S,
) -> impl Stream<Item = io::Result<String>>
where
    S: LineSource,
{
    stream::unfold(Some(source), move |state| async move {
        let mut source = state?;

        loop {
            match source.next_line().await {
                Ok(Some(line)) => {
                    if let Some(range) = extractor.extract(&line) {
                        return Some((Ok(range), Some(source)));
                    }
                }
                Ok(None) => {
                    source.close();
                    return None;
                }
                Err(e) => {
                    source.close();
                    return Some((Err(e), None));
                }
            }
        }
    })
}
