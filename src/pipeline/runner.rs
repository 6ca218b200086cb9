// file: src/pipeline/runner.rs
// description: drives a geofeed source through the range extractor into a sink
// reference: orchestrates the read, normalize, and write stages of one run

use crate::error::{PipelineError, Result};
use crate::extractor::RangeExtractor;
use crate::models::LineClass;
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::source::LineSource;
use crate::utils::Validator;
use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Instant;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

pub struct PipelineRunner {
    extractor: RangeExtractor,
    include_header: bool,
    progress: Option<ProgressTracker>,
}

impl PipelineRunner {
    pub fn new(extractor: RangeExtractor) -> Self {
        Self {
            extractor,
            include_header: false,
            progress: None,
        }
    }

    pub fn with_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }

    pub fn with_progress(mut self, progress: ProgressTracker) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Runs one extraction. Both ends are released whatever the outcome; the sink
    /// is flushed and closed before success is reported.
    pub async fn run<S, W>(&self, mut source: S, mut sink: W) -> Result<PipelineStats>
    where
        S: LineSource,
        W: AsyncWrite + Unpin,
    {
        let start_time = Instant::now();
        let mut stats = PipelineStats::new();

        let pumped = self.pump(&mut source, &mut sink, &mut stats).await;
        source.close();
        if let Some(progress) = &self.progress {
            progress.finish();
        }

        if let Err(e) = pumped {
            release_sink(&mut sink).await;
            return Err(e);
        }

        if stats.ranges_emitted == 0 {
            release_sink(&mut sink).await;
            warn!(
                "No valid ranges in {} lines ({} malformed)",
                stats.lines_read, stats.malformed_lines
            );
            return Err(PipelineError::NoValidRanges);
        }

        if let Err(e) = sink.flush().await {
            release_sink(&mut sink).await;
            return Err(PipelineError::Sink(e));
        }
        sink.shutdown().await.map_err(PipelineError::Sink)?;

        stats.duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Wrote {} ranges from {} lines ({} comments, {} malformed, {:.1}% accepted, {:.0} ranges/s)",
            stats.ranges_emitted,
            stats.lines_read,
            stats.comment_lines,
            stats.malformed_lines,
            stats.acceptance_rate(),
            stats.ranges_per_second()
        );

        Ok(stats)
    }

    async fn pump<S, W>(
        &self,
        source: &mut S,
        sink: &mut W,
        stats: &mut PipelineStats,
    ) -> Result<()>
    where
        S: LineSource,
        W: AsyncWrite + Unpin,
    {
        if self.include_header {
            let header = header_line(Utc::now());
            debug!("Writing header: {}", header.trim_end());
            sink.write_all(header.as_bytes())
                .await
                .map_err(PipelineError::Sink)?;
        }

        while let Some(line) = source.next_line().await.map_err(PipelineError::Source)? {
            stats.lines_read += 1;

            match self.extractor.classify(&line) {
                LineClass::Comment => stats.comment_lines += 1,
                LineClass::Malformed => {
                    stats.malformed_lines += 1;
                    debug!(
                        "Skipping malformed line {}: {:?}",
                        stats.lines_read,
                        Validator::truncate_text(&line, 80)
                    );
                }
                LineClass::Range { range, candidate } => {
                    let mut output = self.extractor.render(&range, candidate);
                    debug!("Emitting {} range {}", range.family.as_str(), output);
                    output.push('\n');
                    sink.write_all(output.as_bytes())
                        .await
                        .map_err(PipelineError::Sink)?;

                    stats.ranges_emitted += 1;
                    if let Some(progress) = &self.progress {
                        progress.update(stats);
                    }
                }
            }
        }

        Ok(())
    }
}

pub fn header_line(now: DateTime<Utc>) -> String {
    format!(
        "# Last updated: {}\n",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

async fn release_sink<W: AsyncWrite + Unpin>(sink: &mut W) {
    if let Err(e) = sink.shutdown().await {
        warn!("Failed to close range sink after aborted run: {}", e);
    }
}
