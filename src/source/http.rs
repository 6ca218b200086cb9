// file: src/source/http.rs
// description: fetches remote geofeeds over HTTP(S) and streams their lines
// reference: https://docs.rs/reqwest

use crate::config::SourceConfig;
use crate::error::{PipelineError, Result};
use crate::source::reader::{LineBuffer, LineSource};
use crate::utils::Validator;
use reqwest::{Client, Response, StatusCode};
use std::io;
use std::time::Duration;
use tracing::{debug, info};

pub struct HttpSource {
    response: Option<Response>,
    buffer: LineBuffer,
    closed: bool,
}

impl HttpSource {
    pub fn new(response: Response) -> Self {
        Self {
            response: Some(response),
            buffer: LineBuffer::new(),
            closed: false,
        }
    }
}

impl LineSource for HttpSource {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        if self.closed {
            return Ok(None);
        }

        loop {
            if let Some(line) = self.buffer.next_line() {
                return Ok(Some(line));
            }

            let Some(response) = self.response.as_mut() else {
                return Ok(self.buffer.finish());
            };

            match response.chunk().await.map_err(io::Error::other)? {
                Some(chunk) => {
                    debug!("Received {} byte geofeed chunk", chunk.len());
                    self.buffer.push(&chunk);
                }
                None => self.response = None,
            }
        }
    }

    fn close(&mut self) {
        self.closed = true;
        self.response = None;
        self.buffer.clear();
    }
}

pub fn build_client(config: &SourceConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| PipelineError::Http(format!("Failed to build HTTP client: {}", e)))
}

/// Requests the geofeed and fails unless the server answers 200.
pub async fn open_url(client: &Client, url: &str) -> Result<HttpSource> {
    Validator::validate_url(url)?;

    info!("Fetching geofeed from {}", url);

    let response = client.get(url).send().await.map_err(|e| {
        PipelineError::Http(format!("Failed to request geofeed at \"{}\": {}", url, e))
    })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(PipelineError::Http(format!(
            "Made request to get geofeed at \"{}\", but server returned status {}",
            url,
            status.as_u16()
        )));
    }

    Ok(HttpSource::new(response))
}
