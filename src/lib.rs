use std::io::Error;

pub mod backup;
pub mod cli;
pub mod common;
pub mod error;
pub mod read;
pub mod scan;
pub mod source;

/// Removes `//` line comments from `input`, keeping block comments and literals,
/// trimming trailing whitespace and ending the text with a new-line.
pub fn strip_line_comments(input: &str) -> Result<String, Error> {
    source::file::SourceFile::inline(input).map(|file| file.to_string())
}
