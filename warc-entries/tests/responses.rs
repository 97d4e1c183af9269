//! End-to-end behaviour of the response iterator.

mod common;

use common::{record, response, response_header_len, stream, warcinfo, HTML_HEADER};
use warc_entries::{ResponseIterator, ResponseIteratorConfig, WarcEntry};

fn collect(data: &[u8]) -> (Vec<WarcEntry>, usize) {
    let mut iter = ResponseIterator::new(data);
    let entries = iter.by_ref().collect::<Result<Vec<_>, _>>().unwrap();
    (entries, iter.error_count())
}

#[test]
fn warcinfo_then_response() {
    let data = stream(&[warcinfo(), response(Some("ID-1"), HTML_HEADER, b"<html></html>")]);
    let (entries, errors) = collect(&data);

    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.id(), "ID-1");
    assert_eq!(entry.content_type(), Some("text/html"));
    assert_eq!(entry.content(), b"<html></html>");
    assert_eq!(entry.http_header(), HTML_HEADER.as_bytes());
    assert_eq!(entry.status_code(), Some(200));
    assert_eq!(entry.target_uri(), Some("http://example.com/"));
    assert_eq!(
        entry.content_offset(),
        response_header_len(Some("ID-1"), HTML_HEADER.len() + 13)
    );
    assert_eq!(errors, 0);
}

#[test]
fn response_without_identifier() {
    let data = stream(&[warcinfo(), response(None, HTML_HEADER, b"<html></html>")]);
    let (entries, errors) = collect(&data);
    assert!(entries.is_empty());
    assert_eq!(errors, 1);
}

#[test]
fn truncated_payload_terminates() {
    let mut data = stream(&[warcinfo(), response(Some("ID-0"), HTML_HEADER, b"ok")]);
    data.extend_from_slice(
        b"WARC/1.0\r\nWARC-Type: response\r\nWARC-TREC-ID: ID-1\r\nContent-Length: 5000\r\n\r\nHTTP/1.1 200 OK\r\n\r\n<html>",
    );
    let mut iter = ResponseIterator::new(&data[..]);
    assert_eq!(iter.next().unwrap().unwrap().id(), "ID-0");
    assert!(iter.next().is_none());
    assert_eq!(iter.error_count(), 1);
    assert!(iter.is_exhausted());
}

#[test]
fn yields_entries_in_stream_order() {
    let ids = ["a", "b", "c", "d"];
    let mut records = vec![warcinfo()];
    for id in ids {
        records.push(record("request", &[("WARC-TREC-ID", id)], b"GET / HTTP/1.1\r\n\r\n"));
        records.push(response(Some(id), HTML_HEADER, id.as_bytes()));
        records.push(record("metadata", &[], b"fetchTimeMs: 12\r\n"));
    }
    let (entries, errors) = collect(&stream(&records));
    assert_eq!(entries.iter().map(|e| e.id()).collect::<Vec<_>>(), ids);
    for entry in &entries {
        assert_eq!(entry.content(), entry.id().as_bytes());
    }
    assert_eq!(errors, 0);
}

#[test]
fn non_response_records_are_not_errors() {
    let records = [
        warcinfo(),
        record("request", &[], b"GET / HTTP/1.1\r\n\r\n"),
        record("resource", &[("WARC-TREC-ID", "r")], b"plain file"),
        record("revisit", &[], b""),
        record("x-custom", &[], b"?"),
    ];
    let (entries, errors) = collect(&stream(&records));
    assert!(entries.is_empty());
    assert_eq!(errors, 0);
}

#[test]
fn recovers_after_malformed_records() {
    let records = [
        response(Some("good-1"), HTML_HEADER, b"1"),
        b"WARC/1.0\r\nWARC-Type: response\r\nWARC-TREC-ID: bad\r\nContent-Length: 3\r\n\r\nway too long\r\n\r\n"
            .to_vec(),
        response(Some("good-2"), HTML_HEADER, b"2"),
        response(Some("no-http"), "", b"just bytes"),
        response(Some("good-3"), HTML_HEADER, b"3"),
    ];
    let (entries, errors) = collect(&stream(&records));
    assert_eq!(
        entries.iter().map(|e| e.id()).collect::<Vec<_>>(),
        ["good-1", "good-2", "good-3"]
    );
    assert_eq!(errors, 2);
}

#[test]
fn body_keeps_blank_lines() {
    let body = b"line one\r\n\r\nline two\r\n\r\n";
    let (entries, _) = collect(&response(Some("x"), HTML_HEADER, body));
    assert_eq!(entries[0].content(), body);
    assert_eq!(entries[0].http_header(), HTML_HEADER.as_bytes());
}

#[test]
fn missing_or_malformed_content_type() {
    let records = [
        response(Some("none"), "HTTP/1.1 200 OK\r\nServer: x\r\n\r\n", b""),
        response(Some("bad"), "HTTP/1.1 200 OK\r\nContent-Type: garbage\r\n\r\n", b""),
        response(
            Some("params"),
            "HTTP/1.1 200 OK\r\ncontent-type: Text/HTML ; charset=UTF-8\r\n\r\n",
            b"",
        ),
    ];
    let (entries, errors) = collect(&stream(&records));
    assert_eq!(errors, 0);
    assert_eq!(entries[0].content_type(), None);
    assert_eq!(entries[1].content_type(), None);
    assert_eq!(entries[2].content_type(), Some("Text/HTML"));
    assert_eq!(entries[2].http_charset(), Some("utf-8"));
}

#[test]
fn duplicate_identifier_uses_last_value() {
    let data = record(
        "response",
        &[("WARC-TREC-ID", "first"), ("warc-trec-id", "second")],
        format!("{}body", HTML_HEADER).as_bytes(),
    );
    let (entries, _) = collect(&data);
    assert_eq!(entries[0].id(), "second");
}

#[test]
fn digest_verification() {
    let payload = format!("{}body", HTML_HEADER);
    let data = stream(&[
        record(
            "response",
            &[
                ("WARC-TREC-ID", "tampered"),
                ("WARC-Block-Digest", "sha1:3I42H3S6NNFQ2MSVX7XZKYAYSCX5QBYJ"),
            ],
            payload.as_bytes(),
        ),
        response(Some("undigested"), HTML_HEADER, b"body"),
    ]);

    let (entries, errors) = collect(&data);
    assert_eq!(entries.len(), 2);
    assert_eq!(errors, 0);

    let config = ResponseIteratorConfig::new().verify_digests(true);
    let mut iter = ResponseIterator::with_config(&data[..], config);
    let entries = iter.by_ref().collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id(), "undigested");
    assert_eq!(iter.skipped().digest, 1);
}

#[test]
fn entries_outlive_iterator() {
    let data = response(Some("keep"), HTML_HEADER, b"kept");
    let entry = {
        let mut iter = ResponseIterator::new(&data[..]);
        let entry = iter.next().unwrap().unwrap();
        iter.close();
        entry
    };
    assert_eq!(entry.content(), b"kept");
}

#[test]
fn empty_stream() {
    let (entries, errors) = collect(b"");
    assert!(entries.is_empty());
    assert_eq!(errors, 0);
}
