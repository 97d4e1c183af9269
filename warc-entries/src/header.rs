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

use std::io::{self, BufRead};

use encoding::all::WINDOWS_1252;
use encoding::{DecoderTrap, Encoding};

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum HeaderEncoding {
    Unicode,
    Latin1,
}

/// Dict-like type representing a WARC or HTTP header block.
///
/// Lookups are case-insensitive. Duplicate headers are preserved in order,
/// but [`HeaderMap::get`] resolves them to the value seen last.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    encoding: HeaderEncoding,
    status_line: Vec<u8>,
    headers: Vec<(Vec<u8>, Vec<u8>)>,
}

impl HeaderMap {
    /// Create a new header map with the specified encoding.
    ///
    /// # Arguments
    ///
    /// * `encoding` - Header source encoding
    pub fn new(encoding: HeaderEncoding) -> Self {
        HeaderMap {
            encoding,
            status_line: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Get the header status line.
    pub fn status_line(&self) -> String {
        self.decode(&self.status_line)
    }

    /// Set status line contents.
    pub fn set_status_line(&mut self, status_line: impl AsRef<[u8]>) {
        self.status_line = status_line.as_ref().trim_ascii().to_vec();
    }

    /// HTTP status code (unset if header block is not an HTTP header block).
    pub fn status_code(&self) -> Option<u16> {
        if !self.status_line.starts_with(b"HTTP/") {
            return None;
        }
        let mut parts = self.status_line.splitn(3, |&b| b == b' ');
        // Skip HTTP/
        parts.next()?;
        String::from_utf8_lossy(parts.next()?).parse::<u16>().ok()
    }

    /// HTTP reason phrase.
    /// Returns None if the header block is not an HTTP header block or no reason phrase was given.
    pub fn reason_phrase(&self) -> Option<String> {
        if !self.status_line.starts_with(b"HTTP/") {
            return None;
        }
        let mut parts = self.status_line.splitn(3, |&b| b == b' ');
        // Skip HTTP/ and status code
        parts.next()?;
        parts.next()?;
        Some(self.decode(parts.next()?))
    }

    fn decode(&self, byte_str: &[u8]) -> String {
        match self.encoding {
            HeaderEncoding::Unicode => String::from_utf8_lossy(byte_str).into_owned(),
            HeaderEncoding::Latin1 => WINDOWS_1252
                .decode(byte_str, DecoderTrap::Replace)
                .unwrap_or_else(|_| String::from_utf8_lossy(byte_str).into_owned()),
        }
    }

    /// Get the value of the last occurrence of a (case-insensitive) header key.
    ///
    /// # Arguments
    ///
    /// * `key` - Header key
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_bytes(key.as_bytes()).map(|v| self.decode(v))
    }

    /// Get the raw value of the last occurrence of a (case-insensitive) header key.
    pub fn get_bytes(&self, key: &[u8]) -> Option<&[u8]> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_slice())
    }

    /// Get all values of a (case-insensitive) header key in stream order.
    pub fn get_all(&self, key: &str) -> Vec<String> {
        let key = key.as_bytes();
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| self.decode(v))
            .collect()
    }

    /// Append header.
    ///
    /// Appending a new header is efficient and does not check for
    /// existing headers with the same name.
    ///
    /// # Arguments
    ///
    /// * `key` - Header key as bytes
    /// * `value` - Header value as bytes
    pub fn append_bytes(&mut self, key: &[u8], value: &[u8]) {
        self.headers.push((key.trim_ascii().to_vec(), value.trim_ascii().to_vec()));
    }

    /// Get the number of headers.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Check if the header map is empty.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    fn add_continuation(&mut self, value: &[u8]) {
        if let Some(last) = self.headers.last_mut() {
            last.1.push(b' ');
            last.1.extend_from_slice(value);
        } else {
            self.headers.push((Vec::new(), value.to_vec()));
        }
    }
}

/// Outcome of [`parse_header_block`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderBlock {
    /// Number of bytes read, including the terminating blank line.
    pub bytes_consumed: usize,
    /// Whether the block was terminated by a blank line before end of input.
    pub complete: bool,
    /// First line that was neither a header nor a continuation.
    pub malformed_line: Option<Vec<u8>>,
}

/// Parse a header block from a buffered reader.
///
/// Reads lines until a blank line or end of input. Lines that cannot be parsed
/// are not fatal; the first of them is reported in the returned [`HeaderBlock`].
///
/// # Arguments
///
/// * `reader` - Input reader
/// * `target` - Header map to fill
/// * `has_status_line` - Whether first line is a status line or already a header
/// * `strict_mode` - Enforce `CRLF` line endings, setting this to `false` will allow plain `LF` also
pub fn parse_header_block<R: BufRead>(
    reader: &mut R,
    target: &mut HeaderMap,
    has_status_line: bool,
    strict_mode: bool,
) -> io::Result<HeaderBlock> {
    let mut block = HeaderBlock::default();
    let mut line = Vec::new();
    let mut first_line = has_status_line;

    loop {
        line.clear();
        let n = reader.read_until(b'\n', &mut line)?;
        if n == 0 {
            return Ok(block);
        }
        block.bytes_consumed += n;

        let is_crlf = line.ends_with(b"\r\n");
        if !line.ends_with(b"\n") {
            // Last line without terminator
            return Ok(block);
        }
        let trimmed = trim_line_end(&line);

        if trimmed.is_empty() {
            if is_crlf || !strict_mode {
                block.complete = true;
                return Ok(block);
            }
            block.malformed_line.get_or_insert_with(|| line.clone());
            continue;
        }

        if trimmed[0] == b' ' || trimmed[0] == b'\t' {
            target.add_continuation(trimmed.trim_ascii());
            continue;
        }

        if first_line {
            target.set_status_line(trimmed);
            first_line = false;
            continue;
        }

        match trimmed.iter().position(|&b| b == b':') {
            Some(colon_pos) if !trimmed[..colon_pos].trim_ascii().is_empty() => {
                target.append_bytes(&trimmed[..colon_pos], &trimmed[colon_pos + 1..]);
            }
            _ => {
                block.malformed_line.get_or_insert_with(|| trimmed.to_vec());
            }
        }
    }
}

pub(crate) fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
