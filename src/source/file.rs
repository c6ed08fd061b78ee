use std::{
    cell::Cell,
    fmt::{Debug, Display},
    fs::File,
    io::Error,
    path::Path,
    rc::Rc,
};

use crate::{
    read::{CharReader, CharReaderIter, TryingIteratorAdaptor},
    scan::{Ch, ChIter},
};

use super::{comment::CommentFilter, trim::TrimFilter};

/// Represents the stream of unicode characters read from a source file after these
/// passes have been performed:
/// * 1: `//` line comments removed, literals and block comments left intact
/// * 2: trailing whitespace trimmed from every line, final new-line ensured
#[derive(Clone, Eq)]
pub struct SourceFile {
    path: Rc<String>,
    src: Rc<Vec<Ch>>,
    stripped: usize,
}

impl PartialEq for SourceFile {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.src == other.src
    }
}

impl Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("src", &Ch::as_string(self.stream()))
            .field("stripped", &self.stripped)
            .finish()
    }
}

const PATH_INLINE: &str = "<inline>";

impl SourceFile {
    fn new(path: Rc<String>, src: Rc<Vec<Ch>>, stripped: usize) -> Self {
        Self {
            path,
            src,
            stripped,
        }
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    pub fn inline(input: &str) -> Result<Self, Error> {
        Self::from_bytes(PATH_INLINE, input.as_bytes())
    }

    /// strip source that has already been read, `label` names it in diagnostics
    pub fn from_bytes(label: &str, bytes: &[u8]) -> Result<Self, Error> {
        let path = Rc::new(label.to_owned());
        let chars = CharReader::new(Box::new(bytes)).into_chars();
        Self::read(path, chars)
    }

    pub fn open(path: &Path) -> Result<Self, Error> {
        let path_str = Rc::new(path.display().to_string());
        let chars = CharReader::new(Box::new(File::open(path)?)).into_chars();
        Self::read(path_str, chars)
    }

    fn read(path: Rc<String>, chars: CharReaderIter<'_>) -> Result<Self, Error> {
        let (filtered, stripped) = Self::filter_source(path.clone(), chars)?;
        let src = filtered.collect::<Result<Vec<_>, Error>>()?;
        Ok(Self::new(path, Rc::new(src), stripped.get()))
    }

    fn filter_source(
        path: Rc<String>,
        chars: CharReaderIter<'_>,
    ) -> Result<(TryingIteratorAdaptor<'_, Ch>, Rc<Cell<usize>>), Error> {
        let comments = CommentFilter::try_filter(path, ChIter::new(chars))?;
        let stripped = comments.stripped();
        Ok((
            TryingIteratorAdaptor::new(TrimFilter::new(comments)),
            stripped,
        ))
    }

    pub fn stream(&self) -> &[Ch] {
        self.src.as_slice()
    }

    pub fn len(&self) -> usize {
        self.src.len()
    }

    /// number of line comments removed
    pub fn stripped(&self) -> usize {
        self.stripped
    }
}

impl std::ops::Index<std::ops::Range<usize>> for SourceFile {
    type Output = [Ch];

    fn index(&self, index: std::ops::Range<usize>) -> &Self::Output {
        &self.stream()[index]
    }
}

impl Display for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Ch::as_string(self.stream()))
    }
}
