use std::{collections::VecDeque, io::Error};

use crate::{
    read::TryingIterator,
    scan::{Ch, Loc},
};

/// Removes whitespace at the end of every line and makes sure the stream ends in a
/// new-line character. Whitespace other than new-line is held back until the next
/// visible character shows it is not trailing.
///
/// A whitespace-only last line is kept as an empty line, and `\r` counts as
/// whitespace, so CRLF line endings come out as plain LF.
pub struct TrimFilter<'a> {
    iter: Box<dyn TryingIterator<OkItem = Ch> + 'a>,
    held: VecDeque<Ch>,
    ready: VecDeque<Ch>,
    last: Option<Ch>,
    done: bool,
}

impl<'a> TrimFilter<'a> {
    pub fn new<T: TryingIterator<OkItem = Ch> + 'a>(iter: T) -> Self {
        Self {
            iter: Box::new(iter),
            held: VecDeque::new(),
            ready: VecDeque::new(),
            last: None,
            done: false,
        }
    }

    fn final_newline(&self) -> Option<Ch> {
        match self.last {
            Some(last) if last.chat() == '\n' => None,
            Some(last) => Some(Ch::new(last.loc().next(last.chat()), '\n')),
            None => Some(Ch::new(Loc::init(), '\n')),
        }
    }
}

impl<'a> TryingIterator for TrimFilter<'a> {
    type OkItem = Ch;

    fn try_next(&mut self) -> Result<Option<Ch>, Error> {
        loop {
            if let Some(ch) = self.ready.pop_front() {
                return Ok(Some(ch));
            }
            if self.done {
                return Ok(None);
            }
            match self.iter.try_next()? {
                Some(ch) if ch.chat() == '\n' => {
                    self.held.clear();
                    self.last = Some(ch);
                    return Ok(Some(ch));
                }
                Some(ch) if ch.chat().is_whitespace() => {
                    self.held.push_back(ch);
                    self.last = Some(ch);
                }
                Some(ch) => {
                    self.ready.append(&mut self.held);
                    self.ready.push_back(ch);
                    self.last = Some(ch);
                }
                None => {
                    self.done = true;
                    self.held.clear();
                    let newline = self.final_newline();
                    self.ready.extend(newline);
                }
            }
        }
    }
}
