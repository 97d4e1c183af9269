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

//! Configuration of [`ResponseIterator`](crate::ResponseIterator).

/// Identifier header of TREC-style web collections (ClueWeb and friends).
pub const TREC_ID: &str = "WARC-TREC-ID";

const ENV_ID_HEADER: &str = "WARC_ENTRIES_ID_HEADER";
const ENV_STRICT: &str = "WARC_ENTRIES_STRICT";
const ENV_VERIFY_DIGESTS: &str = "WARC_ENTRIES_VERIFY_DIGESTS";
const ENV_MAX_CONTENT_LENGTH: &str = "WARC_ENTRIES_MAX_CONTENT_LENGTH";

/// Response iterator configuration.
///
/// # Example
///
/// ```rust
/// use warc_entries::ResponseIteratorConfig;
///
/// let config = ResponseIteratorConfig::new()
///     .id_header("WARC-Record-ID")
///     .verify_digests(true)
///     .max_content_length(Some(64 * 1024 * 1024));
/// assert_eq!(config.id_header, "WARC-Record-ID");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseIteratorConfig {
    /// Record header carrying the entry identifier.
    ///
    /// Response records without it are skipped and counted as errors.
    /// Default: `WARC-TREC-ID`.
    pub id_header: String,

    /// Enforce `CRLF` line endings in header blocks.
    ///
    /// Setting this to `false` will allow plain `LF` also.
    /// Default: false.
    pub strict_mode: bool,

    /// Skip records whose `WARC-Block-Digest` does not match their payload.
    /// Default: false.
    pub verify_digests: bool,

    /// Skip records with a declared payload larger than this many bytes.
    /// Default: no limit.
    pub max_content_length: Option<usize>,
}

impl Default for ResponseIteratorConfig {
    fn default() -> Self {
        ResponseIteratorConfig {
            id_header: TREC_ID.to_string(),
            strict_mode: false,
            verify_digests: false,
            max_content_length: None,
        }
    }
}

impl ResponseIteratorConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identifier header name.
    pub fn id_header(mut self, name: impl Into<String>) -> Self {
        self.id_header = name.into();
        self
    }

    /// Sets strict `CRLF` parsing.
    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Enables or disables block digest verification.
    pub fn verify_digests(mut self, verify: bool) -> Self {
        self.verify_digests = verify;
        self
    }

    /// Sets the payload size limit.
    pub fn max_content_length(mut self, limit: Option<usize>) -> Self {
        self.max_content_length = limit;
        self
    }

    /// Configuration from `WARC_ENTRIES_*` environment variables, falling back to defaults.
    ///
    /// Recognised variables are `WARC_ENTRIES_ID_HEADER`, `WARC_ENTRIES_STRICT`,
    /// `WARC_ENTRIES_VERIFY_DIGESTS` and `WARC_ENTRIES_MAX_CONTENT_LENGTH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(name) = lookup(ENV_ID_HEADER).filter(|n| !n.trim().is_empty()) {
            config.id_header = name.trim().to_string();
        }
        if let Some(value) = lookup(ENV_STRICT) {
            config.strict_mode = parse_flag(ENV_STRICT, &value).unwrap_or(config.strict_mode);
        }
        if let Some(value) = lookup(ENV_VERIFY_DIGESTS) {
            config.verify_digests =
                parse_flag(ENV_VERIFY_DIGESTS, &value).unwrap_or(config.verify_digests);
        }
        if let Some(value) = lookup(ENV_MAX_CONTENT_LENGTH) {
            match value.trim().parse::<usize>() {
                Ok(limit) => config.max_content_length = Some(limit),
                Err(_) => log::warn!("Ignoring invalid {}={:?}", ENV_MAX_CONTENT_LENGTH, value),
            }
        }
        config
    }
}

fn parse_flag(name: &str, value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => {
            log::warn!("Ignoring invalid {}={:?}", name, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_vars(vars: &[(&str, &str)]) -> ResponseIteratorConfig {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ResponseIteratorConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = ResponseIteratorConfig::default();
        assert_eq!(config.id_header, "WARC-TREC-ID");
        assert!(!config.strict_mode);
        assert!(!config.verify_digests);
        assert_eq!(config.max_content_length, None);
        assert_eq!(from_vars(&[]), config);
    }

    #[test]
    fn environment_overrides() {
        let config = from_vars(&[
            ("WARC_ENTRIES_ID_HEADER", "WARC-Record-ID"),
            ("WARC_ENTRIES_STRICT", "yes"),
            ("WARC_ENTRIES_VERIFY_DIGESTS", "1"),
            ("WARC_ENTRIES_MAX_CONTENT_LENGTH", "1024"),
        ]);
        assert_eq!(config.id_header, "WARC-Record-ID");
        assert!(config.strict_mode);
        assert!(config.verify_digests);
        assert_eq!(config.max_content_length, Some(1024));
    }

    #[test]
    fn invalid_environment_values_fall_back() {
        let config = from_vars(&[
            ("WARC_ENTRIES_ID_HEADER", "  "),
            ("WARC_ENTRIES_STRICT", "maybe"),
            ("WARC_ENTRIES_MAX_CONTENT_LENGTH", "-3"),
        ]);
        assert_eq!(config, ResponseIteratorConfig::default());
    }
}
