//! Pattern import pipeline.
//!
//! Turns Life 1.05 / Life 1.06 pattern text into a sparse list of alive
//! coordinates, then normalizes that list into a padded square grid space:
//! - `parser`: header detection and the two format scanners
//! - `normalize`: translation, padding and centering
//! - `loader`: asynchronous file reads feeding the parser

pub mod parser;
pub mod normalize;
pub mod loader;

pub use parser::{detect_format, parse_pattern, ParsedConfiguration, PatternFormat};
pub use normalize::{NormalizedConfiguration, Normalizer};
pub use loader::load_pattern;
