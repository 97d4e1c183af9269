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

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::header::HeaderMap;

/// WARC record type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarcRecordType {
    WarcInfo,
    Response,
    Resource,
    Request,
    Metadata,
    Revisit,
    Conversion,
    Continuation,
    Unknown,
}

impl WarcRecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarcRecordType::WarcInfo => "warcinfo",
            WarcRecordType::Response => "response",
            WarcRecordType::Resource => "resource",
            WarcRecordType::Request => "request",
            WarcRecordType::Metadata => "metadata",
            WarcRecordType::Revisit => "revisit",
            WarcRecordType::Conversion => "conversion",
            WarcRecordType::Continuation => "continuation",
            WarcRecordType::Unknown => "unknown",
        }
    }

    /// Record type for a `WARC-Type` header value. Unrecognised types map to `Unknown`.
    pub fn from_header(value: &str) -> Self {
        WarcRecordType::try_from(value.trim()).unwrap_or(WarcRecordType::Unknown)
    }
}

impl TryFrom<&str> for WarcRecordType {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "warcinfo" => Ok(WarcRecordType::WarcInfo),
            "response" => Ok(WarcRecordType::Response),
            "resource" => Ok(WarcRecordType::Resource),
            "request" => Ok(WarcRecordType::Request),
            "metadata" => Ok(WarcRecordType::Metadata),
            "revisit" => Ok(WarcRecordType::Revisit),
            "conversion" => Ok(WarcRecordType::Conversion),
            "continuation" => Ok(WarcRecordType::Continuation),
            "unknown" => Ok(WarcRecordType::Unknown),
            _ => Err("Invalid enum value."),
        }
    }
}

impl From<WarcRecordType> for &'static str {
    fn from(value: WarcRecordType) -> Self {
        value.as_str()
    }
}

/// A framed WARC record: its header block and its payload.
#[derive(Debug, Clone)]
pub struct WarcRecord {
    record_type: WarcRecordType,
    headers: HeaderMap,
    header_byte_length: usize,
    payload: Vec<u8>,
    stream_pos: usize,
}

impl WarcRecord {
    pub(crate) fn new(
        record_type: WarcRecordType,
        headers: HeaderMap,
        header_byte_length: usize,
        payload: Vec<u8>,
        stream_pos: usize,
    ) -> Self {
        WarcRecord {
            record_type,
            headers,
            header_byte_length,
            payload,
            stream_pos,
        }
    }

    /// Record type (same as `headers['WARC-Type']`).
    pub fn record_type(&self) -> WarcRecordType {
        self.record_type
    }

    /// WARC record headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// WARC version line, e.g. `WARC/1.0`.
    pub fn version(&self) -> String {
        self.headers.status_line()
    }

    /// Record ID (same as `headers['WARC-Record-ID']`).
    pub fn record_id(&self) -> Option<String> {
        self.headers.get("WARC-Record-ID")
    }

    /// Record ID as a UUID if it is a `urn:uuid:` URN.
    pub fn record_uuid(&self) -> Option<Uuid> {
        let id = self.record_id()?;
        let urn = id.trim().trim_start_matches('<').trim_end_matches('>');
        Uuid::parse_str(urn.strip_prefix("urn:uuid:")?).ok()
    }

    /// Parsed `WARC-Date`.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        let value = self.headers.get("WARC-Date")?;
        let value = value.trim();
        DateTime::parse_from_rfc3339(value)
            .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }

    /// `WARC-Target-URI`, if set.
    pub fn target_uri(&self) -> Option<String> {
        self.headers.get("WARC-Target-URI")
    }

    /// Number of bytes of the record header block, from the version line
    /// up to and including the terminating blank line.
    pub fn header_byte_length(&self) -> usize {
        self.header_byte_length
    }

    /// Declared payload length in bytes.
    pub fn content_length(&self) -> usize {
        self.payload.len()
    }

    /// Record payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub(crate) fn into_parts(self) -> (HeaderMap, Vec<u8>) {
        (self.headers, self.payload)
    }

    /// WARC record start offset in the original (uncompressed) stream.
    pub fn stream_pos(&self) -> usize {
        self.stream_pos
    }
}
