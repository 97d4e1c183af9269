// Copyright 2025 Janek Bevendorff
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Iteration over the HTTP responses of a WARC stream.

use std::io::BufRead;
use std::iter::FusedIterator;
use std::mem;

use crate::config::ResponseIteratorConfig;
use crate::digest::verify_block_digest;
use crate::entry::WarcEntry;
use crate::error::{ErrorKind, RecordError, Result};
use crate::framer::{Framed, RecordFramer};
use crate::http::split_http;
use crate::record::{WarcRecord, WarcRecordType};

/// Number of skipped records per [`ErrorKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub structural: usize,
    pub missing_identifier: usize,
    pub http_split: usize,
    pub digest: usize,
}

impl SkipCounts {
    /// Total number of skipped records.
    pub fn total(&self) -> usize {
        self.structural + self.missing_identifier + self.http_split + self.digest
    }

    fn record(&mut self, kind: ErrorKind) {
        match kind {
            ErrorKind::Structural => self.structural += 1,
            ErrorKind::MissingIdentifier => self.missing_identifier += 1,
            ErrorKind::HttpSplit => self.http_split += 1,
            ErrorKind::Digest => self.digest += 1,
        }
    }
}

enum State {
    /// No entry computed yet.
    Scanning,
    /// Next entry computed, but not handed out.
    Ready(WarcEntry),
    Exhausted,
}

/// Iterator over the response records of a decompressed WARC stream.
///
/// Yields one [`WarcEntry`] per `response` record carrying the configured
/// identifier header. Other record types are passed over silently. Malformed
/// records and responses without identifier are skipped and counted, see
/// [`ResponseIterator::error_count`]. Only failures of the underlying reader
/// are returned as errors, after which the iterator is exhausted.
///
/// The iterator owns the reader and drops it as soon as the stream is
/// exhausted or [`ResponseIterator::close`] is called.
///
/// # Example
///
/// ```rust
/// use warc_entries::ResponseIterator;
///
/// let warc = b"WARC/1.0\r\n\
///     WARC-Type: response\r\n\
///     WARC-TREC-ID: doc-1\r\n\
///     Content-Length: 24\r\n\
///     \r\n\
///     HTTP/1.1 200 OK\r\n\r\nhello\r\n\r\n";
///
/// let mut responses = ResponseIterator::new(&warc[..]);
/// let entry = responses.next().unwrap().unwrap();
/// assert_eq!(entry.id(), "doc-1");
/// assert_eq!(entry.content(), b"hello");
/// assert!(responses.next().is_none());
/// assert_eq!(responses.error_count(), 0);
/// ```
pub struct ResponseIterator<R: BufRead> {
    framer: Option<RecordFramer<R>>,
    config: ResponseIteratorConfig,
    state: State,
    skipped: SkipCounts,
    records_read: usize,
}

impl<R: BufRead> ResponseIterator<R> {
    /// Create an iterator with the default configuration.
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, ResponseIteratorConfig::default())
    }

    /// Create an iterator with a custom configuration.
    pub fn with_config(reader: R, config: ResponseIteratorConfig) -> Self {
        let framer = RecordFramer::new(reader)
            .strict_mode(config.strict_mode)
            .max_content_length(config.max_content_length);
        ResponseIterator {
            framer: Some(framer),
            config,
            state: State::Scanning,
            skipped: SkipCounts::default(),
            records_read: 0,
        }
    }

    /// Returns the iterator configuration.
    pub fn config(&self) -> &ResponseIteratorConfig {
        &self.config
    }

    /// Number of skipped malformed or unidentified records so far.
    pub fn error_count(&self) -> usize {
        self.skipped.total()
    }

    /// Skipped records by kind.
    pub fn skipped(&self) -> SkipCounts {
        self.skipped
    }

    /// Number of records read from the stream, including invalid ones.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Whether the stream has been exhausted or closed.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }

    /// Whether another entry is available. Computes and caches it if necessary.
    pub fn has_next(&mut self) -> Result<bool> {
        Ok(self.peek()?.is_some())
    }

    /// Look at the next entry without consuming it.
    pub fn peek(&mut self) -> Result<Option<&WarcEntry>> {
        self.fill()?;
        match &self.state {
            State::Ready(entry) => Ok(Some(entry)),
            _ => Ok(None),
        }
    }

    /// Release the underlying stream.
    ///
    /// A computed but not yet consumed entry is discarded. Calling this more
    /// than once or after the stream is exhausted has no effect.
    pub fn close(&mut self) {
        self.state = State::Exhausted;
        self.release();
    }

    fn release(&mut self) {
        if let Some(framer) = self.framer.take() {
            log::debug!(
                "Releasing WARC stream at offset {} after {} records ({} skipped)",
                framer.position(),
                self.records_read,
                self.skipped.total()
            );
        }
    }

    fn fill(&mut self) -> Result<()> {
        if !matches!(self.state, State::Scanning) {
            return Ok(());
        }
        match self.compute_next() {
            Ok(Some(entry)) => {
                self.state = State::Ready(entry);
                Ok(())
            }
            Ok(None) => {
                self.close();
                Ok(())
            }
            Err(e) => {
                self.close();
                Err(e)
            }
        }
    }

    fn compute_next(&mut self) -> Result<Option<WarcEntry>> {
        loop {
            let framed = match self.framer.as_mut() {
                Some(framer) => framer.next_record()?,
                None => return Ok(None),
            };
            match framed {
                Framed::EndOfStream => return Ok(None),
                Framed::Invalid(invalid) => {
                    self.records_read += 1;
                    self.skip(invalid.stream_pos, &invalid.error);
                }
                Framed::Skipped(skipped) => {
                    self.records_read += 1;
                    log::debug!(
                        "Passing over {} record at offset {} ({} bytes)",
                        skipped.record_type.as_str(),
                        skipped.stream_pos,
                        skipped.content_length
                    );
                }
                Framed::Record(record) => {
                    self.records_read += 1;
                    // Skip records that are not responses
                    if record.record_type() != WarcRecordType::Response {
                        continue;
                    }
                    let stream_pos = record.stream_pos();
                    match self.extract(record) {
                        Ok(entry) => return Ok(Some(entry)),
                        Err(e) => self.skip(stream_pos, &e),
                    }
                }
            }
        }
    }

    fn extract(&self, record: WarcRecord) -> std::result::Result<WarcEntry, RecordError> {
        let id = record
            .headers()
            .get(&self.config.id_header)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RecordError::MissingIdentifier(self.config.id_header.clone()))?;

        if self.config.verify_digests {
            verify_block_digest(record.headers(), record.payload())?;
        }

        let content_offset = record.header_byte_length();
        let target_uri = record.target_uri();
        let (_, payload) = record.into_parts();
        let split = split_http(payload, self.config.strict_mode)?;
        let content_type = split.content_type();
        let charset = split.charset();

        Ok(WarcEntry::new(id, split.content, split.http_header, content_offset, content_type)
            .with_http_charset(charset)
            .with_target_uri(target_uri))
    }

    fn skip(&mut self, stream_pos: usize, error: &RecordError) {
        self.skipped.record(error.kind());
        log::warn!(
            "Skipping record {} at offset {}: {}",
            self.records_read,
            stream_pos,
            error
        );
    }
}

impl<R: BufRead> Iterator for ResponseIterator<R> {
    type Item = Result<WarcEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.fill() {
            return Some(Err(e));
        }
        match mem::replace(&mut self.state, State::Exhausted) {
            State::Ready(entry) => {
                self.state = State::Scanning;
                Some(Ok(entry))
            }
            _ => None,
        }
    }
}

impl<R: BufRead> FusedIterator for ResponseIterator<R> {}
