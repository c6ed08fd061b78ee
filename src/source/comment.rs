use std::{cell::Cell, io::Error, rc::Rc};

use crate::{
    read::TryingIterator,
    scan::{Ch, Loc},
};

/// Lexical context of the scanner. Block comments do not nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Normal,
    LineComment,
    BlockComment,
    StringLit,
    CharLit,
}

impl ScanState {
    fn describe(&self) -> &'static str {
        match self {
            Self::Normal => "code",
            Self::LineComment => "line comment",
            Self::BlockComment => "block comment",
            Self::StringLit => "string literal",
            Self::CharLit => "character literal",
        }
    }
}

/// Drops `//` line comments from a character stream. The terminating newline of a
/// line comment is kept. Block comments and quoted literals pass through untouched,
/// along with any `//` inside them.
pub struct CommentFilter<'a> {
    iter: Box<dyn TryingIterator<OkItem = Ch> + 'a>,
    path: Rc<String>,
    // one char of lookahead
    peek: Option<Ch>,
    // second half of a two-char unit (`/*`, `*/`, escape) still to be emitted
    queued: Option<Ch>,
    state: ScanState,
    // where the current comment or literal was opened
    opened: Loc,
    stripped: Rc<Cell<usize>>,
}

impl<'a> CommentFilter<'a> {
    pub fn new<T: TryingIterator<OkItem = Ch> + 'a>(
        path: Rc<String>,
        first: Option<Ch>,
        iter: T,
    ) -> Self {
        Self {
            iter: Box::new(iter),
            path,
            peek: first,
            queued: None,
            state: ScanState::Normal,
            opened: Loc::init(),
            stripped: Rc::new(Cell::new(0)),
        }
    }

    pub fn try_filter<T: TryingIterator<OkItem = Ch> + 'a>(
        path: Rc<String>,
        mut iter: T,
    ) -> Result<Self, Error> {
        let first = iter.try_next()?;
        Ok(Self::new(path, first, iter))
    }

    /// shared count of line comments dropped so far
    pub fn stripped(&self) -> Rc<Cell<usize>> {
        self.stripped.clone()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    fn advance(&mut self) -> Result<Option<Ch>, Error> {
        let next = self.iter.try_next()?;
        Ok(std::mem::replace(&mut self.peek, next))
    }

    fn peek_char(&self) -> Option<char> {
        self.peek.map(|ch| ch.chat())
    }

    fn enter(&mut self, state: ScanState, at: Loc) {
        self.state = state;
        self.opened = at;
    }

    fn finish(&mut self) {
        match self.state {
            ScanState::BlockComment | ScanState::StringLit | ScanState::CharLit => {
                log::warn!(
                    "{}:{}: unterminated {} at end of input",
                    self.path,
                    self.opened,
                    self.state.describe()
                );
            }
            ScanState::Normal | ScanState::LineComment => (),
        }
        self.state = ScanState::Normal;
    }

    fn scan_normal(&mut self, ch: Ch) -> Result<Option<Ch>, Error> {
        match (ch.chat(), self.peek_char()) {
            ('/', Some('/')) => {
                self.advance()?;
                log::debug!("{}:{}: stripping line comment", self.path, ch.loc());
                self.stripped.set(self.stripped.get() + 1);
                self.enter(ScanState::LineComment, ch.loc());
                Ok(None)
            }
            ('/', Some('*')) => {
                self.queued = self.advance()?;
                self.enter(ScanState::BlockComment, ch.loc());
                Ok(Some(ch))
            }
            ('"', _) => {
                self.enter(ScanState::StringLit, ch.loc());
                Ok(Some(ch))
            }
            ('\'', _) => {
                self.enter(ScanState::CharLit, ch.loc());
                Ok(Some(ch))
            }
            _ => Ok(Some(ch)),
        }
    }

    fn scan_line_comment(&mut self, ch: Ch) -> Option<Ch> {
        if ch.chat() == '\n' {
            self.state = ScanState::Normal;
            Some(ch)
        } else {
            None
        }
    }

    fn scan_block_comment(&mut self, ch: Ch) -> Result<Option<Ch>, Error> {
        if ch.chat() == '*' && self.peek_char() == Some('/') {
            self.queued = self.advance()?;
            self.state = ScanState::Normal;
        }
        Ok(Some(ch))
    }

    fn scan_literal(&mut self, ch: Ch, quote: char) -> Result<Option<Ch>, Error> {
        if ch.chat() == '\\' && self.peek.is_some() {
            // the escaped char is never looked at as a delimiter
            self.queued = self.advance()?;
        } else if ch.chat() == quote {
            self.state = ScanState::Normal;
        }
        Ok(Some(ch))
    }
}

impl<'a> TryingIterator for CommentFilter<'a> {
    type OkItem = Ch;

    fn try_next(&mut self) -> Result<Option<Ch>, Error> {
        if let Some(ch) = self.queued.take() {
            return Ok(Some(ch));
        }
        while let Some(ch) = self.advance()? {
            let emitted = match self.state {
                ScanState::Normal => self.scan_normal(ch)?,
                ScanState::LineComment => self.scan_line_comment(ch),
                ScanState::BlockComment => self.scan_block_comment(ch)?,
                ScanState::StringLit => self.scan_literal(ch, '"')?,
                ScanState::CharLit => self.scan_literal(ch, '\'')?,
            };
            if emitted.is_some() {
                return Ok(emitted);
            }
        }
        self.finish();
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Error, rc::Rc};

    use crate::{
        read::{CharReader, TryingIterator},
        scan::{Ch, ChIter},
    };

    use super::{CommentFilter, ScanState};

    fn filter(input: &str) -> Result<CommentFilter<'_>, Error> {
        let chars = CharReader::new(Box::new(input.as_bytes())).into_chars();
        CommentFilter::try_filter(Rc::new("<test>".to_owned()), ChIter::new(chars))
    }

    fn strip(input: &str) -> Result<String, Error> {
        let mut filter = filter(input)?;
        let mut out = Vec::new();
        while let Some(ch) = filter.try_next()? {
            out.push(ch);
        }
        Ok(Ch::as_string(&out))
    }

    #[test]
    fn line_comment_keeps_newline() -> Result<(), Error> {
        assert_eq!("let x = 5; \n", strip("let x = 5; // set x\n")?);
        assert_eq!("a\n\nb", strip("a\n// whole line\nb")?);
        Ok(())
    }

    #[test]
    fn comment_at_eof() -> Result<(), Error> {
        assert_eq!("x ", strip("x //")?);
        assert_eq!("x ", strip("x // no newline")?);
        assert_eq!("", strip("//")?);
        Ok(())
    }

    #[test]
    fn url_in_string() -> Result<(), Error> {
        assert_eq!(
            "let s = \"http://example.com\"; \n",
            strip("let s = \"http://example.com\"; // a url\n")?
        );
        Ok(())
    }

    #[test]
    fn block_comment_verbatim() -> Result<(), Error> {
        let input = "/* a // b */\nlet y = 1;\n";
        assert_eq!(input, strip(input)?);
        assert_eq!("/**/x", strip("/**/x")?);
        Ok(())
    }

    #[test]
    fn block_comments_do_not_nest() -> Result<(), Error> {
        assert_eq!("/* /* */ */ ", strip("/* /* */ */ // tail")?);
        Ok(())
    }

    #[test]
    fn slash_char_literal() -> Result<(), Error> {
        assert_eq!("let c = '/';\n", strip("let c = '/';\n")?);
        assert_eq!("['/', '/'] ", strip("['/', '/'] // two")?);
        Ok(())
    }

    #[test]
    fn escaped_quotes() -> Result<(), Error> {
        let input = "let s = \"quote: \\\" // not a comment\";\n";
        assert_eq!(input, strip(input)?);
        let input = "let c = '\\''; let d = \"//\";";
        assert_eq!(input, strip(input)?);
        Ok(())
    }

    #[test]
    fn escaped_backslash_closes() -> Result<(), Error> {
        assert_eq!("\"\\\\\" ", strip("\"\\\\\" // gone")?);
        Ok(())
    }

    #[test]
    fn star_slash_outside_block() -> Result<(), Error> {
        assert_eq!("a */ b", strip("a */ b")?);
        Ok(())
    }

    #[test]
    fn unterminated_constructs() -> Result<(), Error> {
        assert_eq!("\"open // string", strip("\"open // string")?);
        assert_eq!("/* open // block", strip("/* open // block")?);
        assert_eq!("'\\", strip("'\\")?);
        Ok(())
    }

    #[test]
    fn state_after_eof_is_normal() -> Result<(), Error> {
        let mut filter = filter("\"never closed")?;
        while filter.try_next()?.is_some() {}
        assert_eq!(ScanState::Normal, filter.state());
        Ok(())
    }

    #[test]
    fn counts_stripped_comments() -> Result<(), Error> {
        let mut filter = filter("a // one\n\"//\" /* // */ b // two\n//three")?;
        let stripped = filter.stripped();
        while filter.try_next()?.is_some() {}
        assert_eq!(3, stripped.get());
        Ok(())
    }

    #[test]
    fn unicode_passes_through() -> Result<(), Error> {
        assert_eq!("let s = \"héllo 😀\"; \n", strip("let s = \"héllo 😀\"; // ünïcode\n")?);
        Ok(())
    }
}
