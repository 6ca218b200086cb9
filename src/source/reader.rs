// file: src/source/reader.rs
// description: line sources over async readers and in-memory byte buffers
// reference: https://docs.rs/tokio/latest/tokio/io/trait.AsyncBufReadExt.html

use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Something that yields geofeed lines one at a time.
///
/// `next_line` is the only suspension point on the input side. Lines come back
/// without their `\n` or `\r\n` terminator. `Ok(None)` marks the end of input,
/// and a closed source keeps returning it.
#[allow(async_fn_in_trait)]
pub trait LineSource {
    async fn next_line(&mut self) -> io::Result<Option<String>>;

    /// Releases the underlying handle. Safe to call more than once.
    fn close(&mut self);
}

pub struct ReaderSource<R> {
    reader: Option<R>,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            buf: Vec::new(),
        }
    }
}

impl<R: AsyncBufRead + Unpin> LineSource for ReaderSource<R> {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        self.buf.clear();
        let read = reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 {
            return Ok(None);
        }

        Ok(Some(line_from_bytes(&self.buf)))
    }

    fn close(&mut self) {
        self.reader = None;
        self.buf.clear();
    }
}

/// Accumulates body chunks and hands out complete lines.
///
/// Consumed lines are only tracked by `start`; the bytes before it are dropped
/// on the next `push`, so a chunk holding many lines is scanned once.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    start: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        if self.start > 0 {
            self.pending.drain(..self.start);
            self.start = 0;
        }
        self.pending.extend_from_slice(chunk);
    }

    pub fn next_line(&mut self) -> Option<String> {
        let unread = &self.pending[self.start..];
        let end = unread.iter().position(|b| *b == b'\n')?;
        let line = line_from_bytes(&unread[..=end]);
        self.start += end + 1;
        Some(line)
    }

    /// Drains a final line that had no terminator.
    pub fn finish(&mut self) -> Option<String> {
        let line = (self.start < self.pending.len())
            .then(|| line_from_bytes(&self.pending[self.start..]));
        self.clear();
        line
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.start = 0;
    }
}

// Non-UTF-8 bytes can only appear in the free-text columns, so decode lossily.
fn line_from_bytes(bytes: &[u8]) -> String {
    let line = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn drain<S: LineSource>(source: &mut S) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = source.next_line().await.unwrap() {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_reader_source_mixed_terminators() {
        let input: &[u8] = b"# header\r\n192.0.2.0/24,US\n\n::1";
        let mut source = ReaderSource::new(input);

        assert_eq!(
            drain(&mut source).await,
            vec!["# header", "192.0.2.0/24,US", "", "::1"]
        );
        assert_eq!(source.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reader_source_closed() {
        let input: &[u8] = b"10.0.0.0/8\n10.1.0.0/16\n";
        let mut source = ReaderSource::new(input);

        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("10.0.0.0/8"));
        source.close();
        assert_eq!(source.next_line().await.unwrap(), None);
        source.close();
    }

    #[tokio::test]
    async fn test_reader_source_lossy_utf8() {
        let input: &[u8] = b"192.0.2.0/24,DE,,M\xfcnchen,\n";
        let mut source = ReaderSource::new(input);

        let line = source.next_line().await.unwrap().unwrap();
        assert!(line.starts_with("192.0.2.0/24,DE,,M"));
    }

    #[test]
    fn test_line_buffer_split_across_chunks() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"192.0.2");
        assert_eq!(buffer.next_line(), None);

        buffer.push(b".0/24,US\r\n2001:db8::/32,FR\n::");
        assert_eq!(buffer.next_line().as_deref(), Some("192.0.2.0/24,US"));
        assert_eq!(buffer.next_line().as_deref(), Some("2001:db8::/32,FR"));
        assert_eq!(buffer.next_line(), None);

        buffer.push(b"1");
        assert_eq!(buffer.finish().as_deref(), Some("::1"));
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_line_buffer_many_lines_in_one_chunk() {
        let chunk: String = (0..1000)
            .map(|i| format!("10.{}.{}.0/24,US\n", i / 256, i % 256))
            .collect();
        let mut buffer = LineBuffer::new();
        buffer.push(chunk.as_bytes());
        buffer.push(b"10.9.9.0/24");

        let mut count = 0;
        while let Some(line) = buffer.next_line() {
            assert!(line.ends_with("/24,US"), "{line}");
            count += 1;
        }
        assert_eq!(count, 1000);
        assert_eq!(buffer.start, buffer.pending.len() - "10.9.9.0/24".len());

        buffer.push(b",US\n");
        assert_eq!(buffer.start, 0);
        assert_eq!(buffer.pending, b"10.9.9.0/24,US\n".to_vec());
        assert_eq!(buffer.next_line().as_deref(), Some("10.9.9.0/24,US"));
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_line_buffer_clear() {
        let mut buffer = LineBuffer::new();
        buffer.push(b"partial");
        buffer.clear();
        assert_eq!(buffer.finish(), None);
    }
}
