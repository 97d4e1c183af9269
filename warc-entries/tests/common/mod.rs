//! WARC builders shared by the integration tests.

#![allow(dead_code)]

/// HTTP header block used by most tests.
pub const HTML_HEADER: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n";

/// Builds a single WARC record with a correct `Content-Length`.
pub fn record(record_type: &str, headers: &[(&str, &str)], payload: &[u8]) -> Vec<u8> {
    let mut out = format!("WARC/1.0\r\nWARC-Type: {}\r\n", record_type).into_bytes();
    for (name, value) in headers {
        out.extend(format!("{}: {}\r\n", name, value).into_bytes());
    }
    out.extend(format!("Content-Length: {}\r\n\r\n", payload.len()).into_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(b"\r\n\r\n");
    out
}

/// A `warcinfo` record as found at the start of most WARC files.
pub fn warcinfo() -> Vec<u8> {
    record(
        "warcinfo",
        &[("WARC-Date", "2009-03-65T08:43:19-0800")],
        b"software: Nutch 1.0-dev\r\nformat: WARC File Format 0.18\r\n",
    )
}

/// A response record with an optional `WARC-TREC-ID`.
pub fn response(id: Option<&str>, http_header: &str, body: &[u8]) -> Vec<u8> {
    let mut payload = http_header.as_bytes().to_vec();
    payload.extend_from_slice(body);
    let mut headers = vec![("WARC-Target-URI", "http://example.com/")];
    if let Some(id) = id {
        headers.push(("WARC-TREC-ID", id));
    }
    record("response", &headers, &payload)
}

/// Length of the record header block produced by [`response`].
pub fn response_header_len(id: Option<&str>, payload_len: usize) -> usize {
    let mut len = "WARC/1.0\r\nWARC-Type: response\r\nWARC-Target-URI: http://example.com/\r\n".len();
    if let Some(id) = id {
        len += format!("WARC-TREC-ID: {}\r\n", id).len();
    }
    len + format!("Content-Length: {}\r\n\r\n", payload_len).len()
}

/// Concatenates records into one stream.
pub fn stream(records: &[Vec<u8>]) -> Vec<u8> {
    records.concat()
}
