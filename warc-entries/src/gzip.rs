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

//! Opening of gzip-compressed WARC files.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::config::ResponseIteratorConfig;
use crate::iter::ResponseIterator;

/// Reader type produced by [`open_gzip`].
pub type GzipReader = BufReader<MultiGzDecoder<File>>;

/// Open a `.warc.gz` file and iterate over its responses.
///
/// Every record of a WARC file is usually compressed as its own gzip
/// member, so all members are decoded in sequence.
pub fn open_gzip(
    path: impl AsRef<Path>,
    config: ResponseIteratorConfig,
) -> io::Result<ResponseIterator<GzipReader>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    log::debug!("Opened {}", path.display());
    Ok(ResponseIterator::with_config(
        BufReader::new(MultiGzDecoder::new(file)),
        config,
    ))
}
