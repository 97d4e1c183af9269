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

//! Splitting of HTTP messages embedded in WARC payloads.

use encoding::label::encoding_from_whatwg_label;

use crate::error::RecordError;
use crate::header::{parse_header_block, HeaderEncoding, HeaderMap};

/// An HTTP message divided into its header block and body.
#[derive(Debug, Clone)]
pub struct HttpSplit {
    /// Status line and header lines including the terminating blank line.
    pub http_header: Vec<u8>,
    /// Message body.
    pub content: Vec<u8>,
    /// Parsed HTTP headers.
    pub headers: HeaderMap,
}

impl HttpSplit {
    /// Plain HTTP Content-Type without additional fields such as `charset=`.
    pub fn content_type(&self) -> Option<String> {
        media_type(&self.headers)
    }

    /// HTTP charset as declared by the server, if it names a known encoding.
    pub fn charset(&self) -> Option<String> {
        charset(&self.headers)
    }
}

/// Split an HTTP response payload at the first blank line.
///
/// The payload buffer is reused for the header part, the body is moved into a
/// new buffer. In `strict_mode` only `CRLF CRLF` ends the header block,
/// otherwise a bare `LF` blank line does as well.
pub fn split_http(mut payload: Vec<u8>, strict_mode: bool) -> Result<HttpSplit, RecordError> {
    if !payload.starts_with(b"HTTP/") {
        return Err(RecordError::HttpSplit("no HTTP status line"));
    }
    let end = header_block_end(&payload, strict_mode)
        .ok_or(RecordError::HttpSplit("no end of HTTP header block"))?;

    let content = payload.split_off(end);
    let mut headers = HeaderMap::new(HeaderEncoding::Latin1);
    let mut reader = payload.as_slice();
    parse_header_block(&mut reader, &mut headers, true, strict_mode)
        .map_err(|_| RecordError::HttpSplit("unreadable HTTP header block"))?;
    if headers.status_code().is_none() {
        return Err(RecordError::HttpSplit("invalid HTTP status line"));
    }

    Ok(HttpSplit {
        http_header: payload,
        content,
        headers,
    })
}

/// Offset just past the first blank line, if any.
fn header_block_end(buf: &[u8], strict_mode: bool) -> Option<usize> {
    if strict_mode {
        return buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4);
    }
    let mut line_start = 0;
    while let Some(nl) = buf[line_start..].iter().position(|&b| b == b'\n') {
        let line_end = line_start + nl;
        if line_start > 0 && matches!(&buf[line_start..line_end], b"" | b"\r") {
            return Some(line_end + 1);
        }
        line_start = line_end + 1;
    }
    None
}

/// Media type of the `Content-Type` header, or `None` if it is not of the form `type/subtype`.
pub(crate) fn media_type(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Content-Type")?;
    let mime = value.split(';').next()?.trim();
    let (main, sub) = mime.split_once('/')?;
    let valid = |s: &str| !s.is_empty() && !s.contains(|c: char| c.is_whitespace() || c == '/');
    if valid(main) && valid(sub) {
        Some(mime.to_string())
    } else {
        None
    }
}

/// Normalised charset name from the `Content-Type` header.
pub(crate) fn charset(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Content-Type")?;
    value
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, label)| {
            let label = label.trim().trim_matches(|c: char| c == '"' || c == '\'');
            let encoding = encoding_from_whatwg_label(label)?;
            Some(encoding.whatwg_name().unwrap_or(encoding.name()).to_string())
        })
}
