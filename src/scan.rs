use std::{
    fmt::{Debug, Display},
    io::Error,
};

use crate::read::{CharReaderIter, TryingIterator};

/// zero-based position of a character in its source
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Loc {
    byte: usize,
    line: usize,
    col: usize,
}

impl Loc {
    pub fn init() -> Self {
        Self::default()
    }

    pub fn next(&self, ch: char) -> Self {
        let (line, col) = if ch == '\n' {
            (self.line + 1, 0)
        } else {
            (self.line, self.col + 1)
        };
        Self {
            byte: self.byte + ch.len_utf8(),
            line,
            col,
        }
    }

    pub fn byte(&self) -> usize {
        self.byte
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn col(&self) -> usize {
        self.col
    }
}

/// one-based `line:col`, the way editors count
impl Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

/// represents a scannable character
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct Ch {
    loc: Loc,
    chat: char,
}

impl Ch {
    pub fn new(loc: Loc, chat: char) -> Self {
        Self { loc, chat }
    }

    pub fn chat(&self) -> char {
        self.chat
    }

    pub fn loc(&self) -> Loc {
        self.loc
    }

    pub fn as_string(chs: &[Self]) -> String {
        String::from_iter(chs.iter().map(|ch| ch.chat()))
    }
}

impl Debug for Ch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.chat())
    }
}

/// attaches a Loc to every char decoded from the source
pub struct ChIter<'a> {
    next: Loc,
    chars: CharReaderIter<'a>,
}

impl<'a> ChIter<'a> {
    pub fn new(chars: CharReaderIter<'a>) -> Self {
        Self {
            next: Loc::init(),
            chars,
        }
    }
}

impl<'a> TryingIterator for ChIter<'a> {
    type OkItem = Ch;

    fn try_next(&mut self) -> Result<Option<Ch>, Error> {
        match self.chars.next() {
            Some(Ok(chat)) => {
                let ch = Ch::new(self.next, chat);
                self.next = self.next.next(chat);
                Ok(Some(ch))
            }
            Some(Err(err)) => Err(err),
            None => Ok(None),
        }
    }
}
