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

//! Error types.
//!
//! [`Error`] is what [`ResponseIterator`](crate::ResponseIterator) hands to the
//! consumer: only faults of the underlying byte stream end up there. Problems
//! with individual records are described by [`RecordError`] and never abort
//! the stream; they are counted and the record is skipped.

use std::io;

use thiserror::Error;

/// Fatal error of a decoding run.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying byte stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience `Result` alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a skipped record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Record framing broke.
    Structural,
    /// A response record without the configured identifier header.
    MissingIdentifier,
    /// The payload could not be split into HTTP header and body.
    HttpSplit,
    /// The block digest did not match the payload.
    Digest,
}

/// Reason a single record was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected a WARC version line, found {0:?}")]
    MissingVersionLine(String),

    #[error("stream ended inside the record header block")]
    TruncatedHeader,

    #[error("malformed header line {0:?}")]
    MalformedHeaderLine(String),

    #[error("record has no WARC-Type header")]
    MissingRecordType,

    #[error("invalid Content-Length {0:?}")]
    InvalidContentLength(String),

    #[error("payload truncated: declared {declared} bytes, got {available}")]
    TruncatedPayload { declared: usize, available: usize },

    #[error("payload of {0} bytes is not followed by a record boundary")]
    LengthMismatch(usize),

    #[error("payload of {declared} bytes exceeds the limit of {limit} bytes")]
    PayloadTooLarge { declared: usize, limit: usize },

    #[error("missing identifier header {0}")]
    MissingIdentifier(String),

    #[error("cannot split HTTP message: {0}")]
    HttpSplit(&'static str),

    #[error("block digest mismatch: expected {expected}, computed {computed}")]
    DigestMismatch { expected: String, computed: String },
}

impl RecordError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::MissingIdentifier(_) => ErrorKind::MissingIdentifier,
            RecordError::HttpSplit(_) => ErrorKind::HttpSplit,
            RecordError::DigestMismatch { .. } => ErrorKind::Digest,
            _ => ErrorKind::Structural,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_record_errors() {
        assert_eq!(RecordError::TruncatedHeader.kind(), ErrorKind::Structural);
        assert_eq!(
            RecordError::TruncatedPayload { declared: 10, available: 3 }.kind(),
            ErrorKind::Structural
        );
        assert_eq!(
            RecordError::MissingIdentifier("WARC-TREC-ID".into()).kind(),
            ErrorKind::MissingIdentifier
        );
        assert_eq!(RecordError::HttpSplit("no status line").kind(), ErrorKind::HttpSplit);
    }

    #[test]
    fn io_errors_convert() {
        let err: Error = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: boom");
    }
}
