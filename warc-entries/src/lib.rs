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

//! Lazy decoding of HTTP response records from WARC (Web ARChive) streams.
//!
//! [`ResponseIterator`] reads an already decompressed WARC stream record by
//! record and yields a [`WarcEntry`] for every `response` record that carries
//! an identifier header (`WARC-TREC-ID` by default). Each entry holds the raw
//! HTTP header block, the HTTP body and the declared content type.
//!
//! Malformed records never abort the stream. They are skipped and counted;
//! query [`ResponseIterator::error_count`] to find out how many were lost.
//!
//! The lower layers are public as well: [`RecordFramer`] frames raw records
//! and [`split_http`] divides an HTTP message into header block and body.

mod config;
mod digest;
mod entry;
mod error;
mod framer;
#[cfg(feature = "gzip")]
mod gzip;
mod header;
mod http;
mod iter;
mod record;

pub use config::{ResponseIteratorConfig, TREC_ID};
pub use digest::verify_block_digest;
pub use entry::WarcEntry;
pub use error::{Error, ErrorKind, RecordError, Result};
pub use framer::{Framed, InvalidRecord, RecordFramer, SkippedRecord};
#[cfg(feature = "gzip")]
pub use gzip::{open_gzip, GzipReader};
pub use header::{parse_header_block, HeaderBlock, HeaderEncoding, HeaderMap};
pub use http::{split_http, HttpSplit};
pub use iter::{ResponseIterator, SkipCounts};
pub use record::{WarcRecord, WarcRecordType};
