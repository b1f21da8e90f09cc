//! Reading pattern files from disk.

use crate::parser::{parse_pattern, ParsedConfiguration};
use life_core::Result;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Read and parse a pattern file. Nothing is returned unless the whole file parses.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_pattern(path: impl AsRef<Path>) -> Result<ParsedConfiguration> {
    let text = fs::read_to_string(path.as_ref()).await?;
    debug!(bytes = text.len(), "Read pattern file");
    parse_pattern(&text)
}
