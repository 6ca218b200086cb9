// file: src/source/mod.rs
// description: opens geofeed sources and range sinks from urls, paths, and stdio
// reference: internal module structure

pub mod http;
pub mod reader;

pub use http::{HttpSource, build_client, open_url};
pub use reader::{LineBuffer, LineSource, ReaderSource};

use crate::config::SourceConfig;
use crate::error::{PipelineError, Result};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWrite, BufReader, BufWriter, Stdin};
use tracing::info;

pub type BoxedSink = Box<dyn AsyncWrite + Unpin + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Url(String),
    Path(PathBuf),
    Stdio,
}

impl Location {
    /// `-` means stdin/stdout; anything with a scheme must be HTTP(S).
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();

        if value.is_empty() {
            return Err(PipelineError::Validation("Location is empty".to_string()));
        }

        if value == "-" {
            return Ok(Location::Stdio);
        }

        if value.starts_with("http://") || value.starts_with("https://") {
            return Ok(Location::Url(value.to_string()));
        }

        if value.contains("://") {
            return Err(PipelineError::Validation(format!(
                "Non-HTTP URL passed as geofeed source: \"{}\"",
                value
            )));
        }

        Ok(Location::Path(PathBuf::from(value)))
    }
}

pub enum GeofeedSource {
    Http(HttpSource),
    File(ReaderSource<BufReader<File>>),
    Stdin(ReaderSource<BufReader<Stdin>>),
}

impl LineSource for GeofeedSource {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        match self {
            GeofeedSource::Http(source) => source.next_line().await,
            GeofeedSource::File(source) => source.next_line().await,
            GeofeedSource::Stdin(source) => source.next_line().await,
        }
    }

    fn close(&mut self) {
        match self {
            GeofeedSource::Http(source) => source.close(),
            GeofeedSource::File(source) => source.close(),
            GeofeedSource::Stdin(source) => source.close(),
        }
    }
}

pub async fn open_source(location: &Location, config: &SourceConfig) -> Result<GeofeedSource> {
    match location {
        Location::Url(url) => {
            let client = build_client(config)?;
            Ok(GeofeedSource::Http(open_url(&client, url).await?))
        }
        Location::Path(path) => Ok(GeofeedSource::File(open_file_for_reading(path).await?)),
        Location::Stdio => Ok(GeofeedSource::Stdin(open_stdin())),
    }
}

pub async fn open_file_for_reading(path: &Path) -> Result<ReaderSource<BufReader<File>>> {
    let file = File::open(path)
        .await
        .map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Reading geofeed from {}", path.display());
    Ok(ReaderSource::new(BufReader::new(file)))
}

pub fn open_stdin() -> ReaderSource<BufReader<Stdin>> {
    ReaderSource::new(BufReader::new(tokio::io::stdin()))
}

pub async fn open_file_for_writing(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .await
        .map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Writing ranges to {}", path.display());
    Ok(BufWriter::new(file))
}

/// Opens the output file, or stdout when no path (or `-`) is given.
pub async fn open_sink(path: Option<&Path>) -> Result<BoxedSink> {
    match path {
        Some(path) if path != Path::new("-") => Ok(Box::new(open_file_for_writing(path).await?)),
        _ => Ok(Box::new(BufWriter::new(tokio::io::stdout()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn test_location_parse() {
        assert_eq!(Location::parse("-").unwrap(), Location::Stdio);
        assert_eq!(
            Location::parse("https://example.com/geofeed.csv").unwrap(),
            Location::Url("https://example.com/geofeed.csv".to_string())
        );
        assert_eq!(
            Location::parse("feeds/geofeed.csv").unwrap(),
            Location::Path(PathBuf::from("feeds/geofeed.csv"))
        );
        assert!(Location::parse("ftp://example.com/geofeed.csv").is_err());
        assert!(Location::parse("  ").is_err());
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.csv");

        let result = open_file_for_reading(&missing).await;
        assert!(matches!(
            result,
            Err(PipelineError::FileOperation { ref path, .. }) if path == &missing
        ));
    }

    #[tokio::test]
    async fn test_file_round_trip_through_source() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("geofeed.csv");

        let mut sink = open_sink(Some(path.as_path())).await.unwrap();
        sink.write_all(b"192.0.2.0/24,US\r\n::1\n").await.unwrap();
        sink.shutdown().await.unwrap();

        let location = Location::parse(path.to_str().unwrap()).unwrap();
        let mut source = open_source(&location, &SourceConfig::default())
            .await
            .unwrap();

        assert_eq!(
            source.next_line().await.unwrap().as_deref(),
            Some("192.0.2.0/24,US")
        );
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("::1"));
        assert_eq!(source.next_line().await.unwrap(), None);
        source.close();
    }
}
