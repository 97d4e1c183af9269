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

use crate::header::{parse_header_block, HeaderEncoding, HeaderMap};

/// A decoded HTTP response record.
///
/// Entries own their buffers and stay valid after the iterator that produced
/// them has advanced or been closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarcEntry {
    id: String,
    content: Vec<u8>,
    http_header: Vec<u8>,
    content_offset: usize,
    content_type: Option<String>,
    http_charset: Option<String>,
    target_uri: Option<String>,
}

impl WarcEntry {
    pub(crate) fn new(
        id: String,
        content: Vec<u8>,
        http_header: Vec<u8>,
        content_offset: usize,
        content_type: Option<String>,
    ) -> Self {
        WarcEntry {
            id,
            content,
            http_header,
            content_offset,
            content_type,
            http_charset: None,
            target_uri: None,
        }
    }

    pub(crate) fn with_http_charset(mut self, charset: Option<String>) -> Self {
        self.http_charset = charset;
        self
    }

    pub(crate) fn with_target_uri(mut self, target_uri: Option<String>) -> Self {
        self.target_uri = target_uri;
        self
    }

    /// Value of the identifier header.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// HTTP response body.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Raw HTTP status line and headers, including the terminating blank line.
    pub fn http_header(&self) -> &[u8] {
        &self.http_header
    }

    /// Length of the WARC record header block, i.e. the offset of the record
    /// payload relative to the record start.
    pub fn content_offset(&self) -> usize {
        self.content_offset
    }

    /// Plain HTTP Content-Type without additional fields such as `charset=`.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// HTTP charset/encoding as returned by the server or `None` if no valid charset is set.
    pub fn http_charset(&self) -> Option<&str> {
        self.http_charset.as_deref()
    }

    /// `WARC-Target-URI` of the record.
    pub fn target_uri(&self) -> Option<&str> {
        self.target_uri.as_deref()
    }

    /// Re-parse the HTTP header block.
    ///
    /// Returns `None` if the stored block is not a complete header block.
    pub fn http_headers(&self) -> Option<HeaderMap> {
        let mut headers = HeaderMap::new(HeaderEncoding::Latin1);
        let mut reader = self.http_header.as_slice();
        match parse_header_block(&mut reader, &mut headers, true, false) {
            Ok(block) if block.complete => Some(headers),
            _ => None,
        }
    }

    /// HTTP status code.
    pub fn status_code(&self) -> Option<u16> {
        self.http_headers()?.status_code()
    }

    /// Take the response body.
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reparses_http_headers() {
        let entry = WarcEntry::new(
            "clueweb09-en0000-00-00000".into(),
            b"<html></html>".to_vec(),
            b"HTTP/1.1 301 Moved Permanently\r\nLocation: /x\r\n\r\n".to_vec(),
            250,
            None,
        );
        assert_eq!(entry.status_code(), Some(301));
        let headers = entry.http_headers().unwrap();
        assert_eq!(headers.get("location").as_deref(), Some("/x"));
        assert_eq!(headers.reason_phrase().as_deref(), Some("Moved Permanently"));
        assert_eq!(entry.content_offset(), 250);
        assert_eq!(entry.into_content(), b"<html></html>");
    }

    #[test]
    fn incomplete_http_header_block() {
        let entry = WarcEntry::new(
            "x".into(),
            Vec::new(),
            b"HTTP/1.1 200 OK\r\nServer: x\r\n".to_vec(),
            0,
            None,
        );
        assert!(entry.http_headers().is_none());
        assert_eq!(entry.status_code(), None);
    }
}
