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

//! WARC block digest verification.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha1::{Digest, Sha1};

use crate::error::RecordError;
use crate::header::HeaderMap;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Verify the `WARC-Block-Digest` header against a record payload.
///
/// Records without a digest, or with a digest algorithm other than SHA-1,
/// pass unchecked. SHA-1 digests are accepted in base32 (the WARC
/// convention), base16 and base64 notation.
pub fn verify_block_digest(headers: &HeaderMap, payload: &[u8]) -> Result<(), RecordError> {
    let Some(value) = headers.get("WARC-Block-Digest") else {
        return Ok(());
    };
    let Some((algorithm, expected)) = value.trim().split_once(':') else {
        return Err(RecordError::DigestMismatch {
            expected: value,
            computed: String::new(),
        });
    };
    if !algorithm.trim().eq_ignore_ascii_case("sha1") {
        log::debug!("Not verifying {} block digest", algorithm);
        return Ok(());
    }

    let hash = Sha1::digest(payload);
    let hash: &[u8] = &hash;
    let expected = expected.trim();
    let computed_b32 = base32(hash);
    let matches = match expected.len() {
        32 => expected.eq_ignore_ascii_case(&computed_b32),
        40 => expected.eq_ignore_ascii_case(&hex::encode(hash)),
        _ => expected.trim_end_matches('=') == STANDARD.encode(hash).trim_end_matches('='),
    };
    if matches {
        Ok(())
    } else {
        Err(RecordError::DigestMismatch {
            expected: value,
            computed: format!("sha1:{}", computed_b32),
        })
    }
}

fn base32(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer = 0u32;
    let mut bits = 0;
    for &b in bytes {
        buffer = (buffer << 8) | b as u32;
        bits += 8;
        while bits >= 5 {
            out.push(BASE32_ALPHABET[((buffer >> (bits - 5)) & 31) as usize] as char);
            bits -= 5;
        }
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[((buffer << (5 - bits)) & 31) as usize] as char);
    }
    out
}
