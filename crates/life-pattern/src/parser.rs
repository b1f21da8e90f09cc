//! Plaintext pattern parsing.

use life_core::{Coordinate, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Char range of the first line holding the version signature
const SIGNATURE_START: usize = 6;
const SIGNATURE_LEN: usize = 4;
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Supported pattern file versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternFormat {
    /// Blocks of `*`/`.` rows positioned by `#P x y` lines
    Life105,
    /// One `x y` pair per line
    Life106,
}

impl PatternFormat {
    pub fn signature(&self) -> &'static str {
        match self {
            PatternFormat::Life105 => "1.05",
            PatternFormat::Life106 => "1.06",
        }
    }
}

/// Alive coordinates in file order; duplicates are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedConfiguration {
    pub format: PatternFormat,
    pub alive: Vec<Coordinate>,
}

impl ParsedConfiguration {
    pub fn new(format: PatternFormat) -> Self {
        Self {
            format,
            alive: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }
}

/// Identify the format from the first line of a pattern file
pub fn detect_format(header: &str) -> Result<PatternFormat> {
    let signature: String = header
        .chars()
        .skip(SIGNATURE_START)
        .take(SIGNATURE_LEN)
        .collect();

    match signature.as_str() {
        "1.05" => Ok(PatternFormat::Life105),
        "1.06" => Ok(PatternFormat::Life106),
        _ => Err(Error::UnsupportedFormat {
            header: header.to_string(),
        }),
    }
}

/// Parse a whole pattern file. Any bad line fails the entire parse.
pub fn parse_pattern(text: &str) -> Result<ParsedConfiguration> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut lines = text.lines().map(|line| line.trim_end_matches('\r'));

    let header = lines.next().ok_or_else(|| Error::UnsupportedFormat {
        header: String::new(),
    })?;
    let format = detect_format(header)?;

    // Header is line 1
    let body = lines.enumerate().map(|(idx, line)| (idx + 2, line));
    let parsed = match format {
        PatternFormat::Life105 => scan_life105(body)?,
        PatternFormat::Life106 => scan_life106(body)?,
    };

    debug!(
        format = format.signature(),
        alive = parsed.len(),
        "Parsed pattern"
    );
    Ok(parsed)
}

fn scan_life105<'a>(lines: impl Iterator<Item = (usize, &'a str)>) -> Result<ParsedConfiguration> {
    let mut config = ParsedConfiguration::new(PatternFormat::Life105);
    let mut block_x: i32 = 0;
    let mut block_y: i32 = 0;
    let mut row_offset: i32 = 0;

    for (line_no, line) in lines {
        // Whitespace-only lines are dead rows, only empty ones are skipped
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("#P") {
            let (x, y) = parse_pair(rest).ok_or_else(|| Error::malformed(line_no, line))?;
            block_x = x;
            block_y = y;
            row_offset = 0;
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        let y = block_y
            .checked_add(row_offset)
            .ok_or_else(|| Error::malformed(line_no, line))?;
        for (i, ch) in line.chars().enumerate() {
            if ch != '*' {
                continue;
            }
            let x = i32::try_from(i)
                .ok()
                .and_then(|i| block_x.checked_add(i))
                .ok_or_else(|| Error::malformed(line_no, line))?;
            config.alive.push(Coordinate::new(x, y));
        }
        row_offset += 1;
    }

    Ok(config)
}

fn scan_life106<'a>(lines: impl Iterator<Item = (usize, &'a str)>) -> Result<ParsedConfiguration> {
    let mut config = ParsedConfiguration::new(PatternFormat::Life106);

    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let (x, y) = parse_pair(line).ok_or_else(|| Error::malformed(line_no, line))?;
        config.alive.push(Coordinate::new(x, y));
    }

    Ok(config)
}

/// Exactly two whitespace-separated integers
fn parse_pair(text: &str) -> Option<(i32, i32)> {
    let mut tokens = text.split_whitespace();
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some((x, y))
}
