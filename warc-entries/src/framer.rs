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

//! Record framing.
//!
//! [`RecordFramer`] cuts a decompressed WARC byte stream into records. Each
//! call to [`RecordFramer::next_record`] reads exactly one record (or one
//! run of garbage) and never buffers beyond it.
//!
//! Malformed records are reported as [`Framed::Invalid`] instead of failing
//! the stream. If a record's length cannot be trusted, the framer
//! resynchronises by scanning for the next `WARC/` version line and drops
//! everything in between without reporting it again.

use std::io::{self, BufRead, Read};

use crate::error::RecordError;
use crate::header::{parse_header_block, trim_line_end, HeaderEncoding, HeaderMap};
use crate::record::{WarcRecord, WarcRecordType};

/// Payload preallocation cap, larger payloads grow while reading.
const MAX_PREALLOC: usize = 1 << 20;

/// Result of one framing step.
#[derive(Debug)]
pub enum Framed {
    Record(WarcRecord),
    Invalid(InvalidRecord),
    /// A well-formed non-response record whose payload exceeded the size
    /// limit and was discarded unread.
    Skipped(SkippedRecord),
    EndOfStream,
}

/// A record passed over without buffering its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub stream_pos: usize,
    pub record_type: WarcRecordType,
    pub content_length: usize,
}

/// A record that could not be framed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecord {
    /// Offset of the offending record (or garbage line) in the stream.
    pub stream_pos: usize,
    pub error: RecordError,
}

/// Splits a buffered byte stream into WARC records.
pub struct RecordFramer<R: BufRead> {
    reader: R,
    pos: usize,
    strict_mode: bool,
    max_content_length: Option<usize>,
    resync: bool,
}

impl<R: BufRead> RecordFramer<R> {
    /// Create a framer reading from `reader`.
    pub fn new(reader: R) -> Self {
        RecordFramer {
            reader,
            pos: 0,
            strict_mode: false,
            max_content_length: None,
            resync: false,
        }
    }

    /// Only accept `CRLF` as header block terminator.
    pub fn strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    /// Skip records with larger payloads without buffering them.
    pub fn max_content_length(mut self, limit: Option<usize>) -> Self {
        self.max_content_length = limit;
        self
    }

    /// Number of bytes consumed from the stream so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Frame the next record.
    ///
    /// Returns `Ok(Framed::EndOfStream)` at the end of the stream. Errors are
    /// returned only if the underlying reader fails.
    pub fn next_record(&mut self) -> io::Result<Framed> {
        let mut line = Vec::new();
        let record_start = loop {
            line.clear();
            let start = self.pos;
            let n = self.reader.read_until(b'\n', &mut line)?;
            if n == 0 {
                return Ok(Framed::EndOfStream);
            }
            self.pos += n;

            let trimmed = trim_line_end(&line);
            if trimmed.trim_ascii().is_empty() {
                continue;
            }
            if is_version_line(trimmed) {
                if self.resync {
                    log::debug!("Resynchronised at stream offset {}", start);
                    self.resync = false;
                }
                break start;
            }
            if self.resync {
                continue;
            }
            self.resync = true;
            return Ok(self.invalid(start, RecordError::MissingVersionLine(excerpt(trimmed))));
        };

        let mut headers = HeaderMap::new(HeaderEncoding::Unicode);
        headers.set_status_line(trim_line_end(&line));
        let block = parse_header_block(&mut self.reader, &mut headers, false, self.strict_mode)?;
        self.pos += block.bytes_consumed;
        let header_byte_length = line.len() + block.bytes_consumed;

        if !block.complete {
            self.resync = true;
            return Ok(self.invalid(record_start, RecordError::TruncatedHeader));
        }

        let content_length = match headers.get("Content-Length") {
            None => 0,
            Some(value) => match parse_content_length(&value) {
                Some(len) => len,
                None => {
                    self.resync = true;
                    return Ok(self.invalid(record_start, RecordError::InvalidContentLength(value)));
                }
            },
        };

        let record_type = headers.get("WARC-Type").map(|t| WarcRecordType::from_header(&t));
        let oversized = self.max_content_length.filter(|&limit| content_length > limit);
        let deferred = if let Some(malformed) = &block.malformed_line {
            Some(RecordError::MalformedHeaderLine(excerpt(malformed)))
        } else if record_type.is_none() {
            Some(RecordError::MissingRecordType)
        } else {
            match oversized {
                Some(limit) if record_type == Some(WarcRecordType::Response) => {
                    Some(RecordError::PayloadTooLarge {
                        declared: content_length,
                        limit,
                    })
                }
                _ => None,
            }
        };

        let (payload, available) = if deferred.is_some() || oversized.is_some() {
            (Vec::new(), self.skip_payload(content_length)?)
        } else {
            let payload = self.read_payload(content_length)?;
            let available = payload.len();
            (payload, available)
        };
        if available < content_length {
            return Ok(self.invalid(
                record_start,
                RecordError::TruncatedPayload {
                    declared: content_length,
                    available,
                },
            ));
        }

        let at_boundary = self.consume_record_end()?;
        if !at_boundary {
            self.resync = true;
        }
        if let Some(error) = deferred {
            return Ok(self.invalid(record_start, error));
        }
        if !at_boundary {
            return Ok(self.invalid(record_start, RecordError::LengthMismatch(content_length)));
        }
        if oversized.is_some() {
            return Ok(Framed::Skipped(SkippedRecord {
                stream_pos: record_start,
                record_type: record_type.unwrap_or(WarcRecordType::Unknown),
                content_length,
            }));
        }

        Ok(Framed::Record(WarcRecord::new(
            record_type.unwrap_or(WarcRecordType::Unknown),
            headers,
            header_byte_length,
            payload,
            record_start,
        )))
    }

    fn invalid(&self, stream_pos: usize, error: RecordError) -> Framed {
        Framed::Invalid(InvalidRecord { stream_pos, error })
    }

    fn read_payload(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut payload = Vec::with_capacity(len.min(MAX_PREALLOC));
        let n = (&mut self.reader).take(len as u64).read_to_end(&mut payload)?;
        self.pos += n;
        Ok(payload)
    }

    fn skip_payload(&mut self, len: usize) -> io::Result<usize> {
        let n = io::copy(&mut (&mut self.reader).take(len as u64), &mut io::sink())? as usize;
        self.pos += n;
        Ok(n)
    }

    /// Consume the line break following a payload.
    ///
    /// Returns `false` if the payload is followed by anything other than a line
    /// break or the end of the stream. The remaining separator lines are
    /// skipped as blank lines by the next framing step.
    fn consume_record_end(&mut self) -> io::Result<bool> {
        match self.peek_byte()? {
            None => Ok(true),
            Some(b'\n') if !self.strict_mode => {
                self.consume(1);
                Ok(true)
            }
            Some(b'\r') => {
                self.consume(1);
                match self.peek_byte()? {
                    Some(b'\n') => {
                        self.consume(1);
                        Ok(true)
                    }
                    None => Ok(true),
                    Some(_) => Ok(false),
                }
            }
            Some(_) => Ok(false),
        }
    }

    fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn consume(&mut self, n: usize) {
        self.reader.consume(n);
        self.pos += n;
    }
}

/// Decimal `Content-Length` value. Signs and other non-digits are rejected.
fn parse_content_length(value: &str) -> Option<usize> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn is_version_line(line: &[u8]) -> bool {
    line.len() > 5 && line.starts_with(b"WARC/") && line[5].is_ascii_digit()
}

/// Shortened, printable version of a line for error messages.
fn excerpt(line: &[u8]) -> String {
    const MAX_LEN: usize = 64;
    let line = &line[..line.len().min(MAX_LEN)];
    String::from_utf8_lossy(line).into_owned()
}
