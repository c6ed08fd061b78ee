use std::io::{Error, Read};

use crate::common::err_invalid_data;

const BUF_SIZE: usize = 64;

/// Iterator-like trait whose items can fail with an io error. Each filter in the
/// source pipeline implements this over the one below it.
pub trait TryingIterator {
    type OkItem;

    fn try_next(&mut self) -> Result<Option<Self::OkItem>, Error>;
}

/// wrap a Read impl to produce unicode chars over utf8-encoded bytes
pub struct CharReader<'read> {
    reader: Box<dyn Read + 'read>,
    // must store at least 4 bytes for multibyte chars
    buff: [u8; BUF_SIZE],
    bufi: usize,
    bufn: usize,
}

impl<'read> CharReader<'read> {
    pub fn new(reader: Box<dyn Read + 'read>) -> Self {
        Self {
            reader,
            buff: [0; BUF_SIZE],
            bufi: 0,
            bufn: 0,
        }
    }

    fn utf8_width(lead: u8) -> Option<usize> {
        match lead {
            0x00..=0x7f => Some(1),
            0xc0..=0xdf => Some(2),
            0xe0..=0xef => Some(3),
            0xf0..=0xf7 => Some(4),
            _ => None,
        }
    }

    /// make sure at least `want` unread bytes sit in the buffer, returning how many do
    fn fill(&mut self, want: usize) -> Result<usize, Error> {
        if self.bufn - self.bufi < want && self.bufi > 0 {
            self.buff.copy_within(self.bufi..self.bufn, 0);
            self.bufn -= self.bufi;
            self.bufi = 0;
        }
        while self.bufn - self.bufi < want {
            let n_read = self.reader.read(&mut self.buff[self.bufn..BUF_SIZE])?;
            if n_read == 0 {
                break;
            }
            self.bufn += n_read;
        }
        Ok(self.bufn - self.bufi)
    }

    /// advances a reader to consume the next unicode character, if available
    pub fn read(&mut self) -> Result<Option<char>, Error> {
        if self.fill(1)? == 0 {
            return Ok(None);
        }
        let lead = self.buff[self.bufi];
        if lead.is_ascii() {
            self.bufi += 1;
            return Ok(Some(lead as char));
        }
        let width = Self::utf8_width(lead).ok_or_else(|| {
            err_invalid_data(format!("invalid utf-8 lead byte 0x{:02x}", lead))
        })?;
        if self.fill(width)? < width {
            return Err(err_invalid_data("truncated utf-8 sequence at end of input"));
        }
        let uni = core::str::from_utf8(&self.buff[self.bufi..self.bufi + width])
            .map_err(err_invalid_data)?
            .chars()
            .next();
        self.bufi += width;
        Ok(uni)
    }

    pub fn into_chars(self) -> CharReaderIter<'read> {
        CharReaderIter::new(self)
    }
}

pub struct CharReaderIter<'read> {
    reader: CharReader<'read>,
}

impl<'read> CharReaderIter<'read> {
    fn new(reader: CharReader<'read>) -> Self {
        Self { reader }
    }
}

impl<'a> Iterator for CharReaderIter<'a> {
    type Item = Result<char, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read().transpose()
    }
}

impl<'a> IntoIterator for CharReader<'a> {
    type Item = Result<char, Error>;
    type IntoIter = CharReaderIter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.into_chars()
    }
}

/// Adapts the last stage of a TryingIterator pipeline back into a std Iterator.
/// Iteration stops after the first error has been yielded.
pub struct TryingIteratorAdaptor<'a, T> {
    iter: Box<dyn TryingIterator<OkItem = T> + 'a>,
    is_err: bool,
}

impl<'a, T> TryingIteratorAdaptor<'a, T> {
    pub fn new<I: TryingIterator<OkItem = T> + 'a>(iter: I) -> Self {
        Self {
            iter: Box::new(iter),
            is_err: false,
        }
    }
}

impl<'a, T> Iterator for TryingIteratorAdaptor<'a, T> {
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_err {
            None
        } else {
            match self.iter.try_next() {
                Ok(next) => next.map(Ok),
                Err(err) => {
                    self.is_err = true;
                    Some(Err(err))
                }
            }
        }
    }
}
