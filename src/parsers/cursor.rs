/*
 * Copyright Stalwart Labs Ltd. See the COPYING
 * file at the top-level directory of this distribution.
 *
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 */

use std::io::{self, BufRead, BufReader, Read};

use crate::core::{
    cancel::Abort,
    error::{Error, Result},
};

/// Tracks whether the next byte read starts a new line.
///
/// The start of the stream counts as a line start.
#[derive(Debug, Clone, Copy)]
pub struct LineAnchor {
    at_line_start: bool,
    previous: bool,
}

impl LineAnchor {
    fn new() -> Self {
        LineAnchor {
            at_line_start: true,
            previous: true,
        }
    }

    fn advance(&mut self, ch: u8) {
        self.previous = self.at_line_start;
        self.at_line_start = ch == b'\n';
    }

    fn rewind(&mut self) {
        self.at_line_start = self.previous;
    }

    pub fn is_line_start(&self) -> bool {
        self.at_line_start
    }
}

/// Single byte lookahead reader with one byte of push-back.
///
/// A cursor is owned by exactly one parse. Reads may block on the underlying
/// reader; I/O errors other than `Interrupted` are returned as-is and are
/// never retried.
pub struct Cursor<R: Read> {
    reader: BufReader<R>,
    pushback: Option<u8>,
    last: Option<u8>,
    anchor: LineAnchor,
    offset: u64,
    abort: Abort,
}

impl<R: Read> Cursor<R> {
    pub fn new(reader: R) -> Cursor<R> {
        Cursor::with_abort(reader, Abort::default())
    }

    pub(crate) fn with_abort(reader: R, abort: Abort) -> Cursor<R> {
        Cursor {
            reader: BufReader::new(reader),
            pushback: None,
            last: None,
            anchor: LineAnchor::new(),
            offset: 0,
            abort,
        }
    }

    /// Returns the next byte, or `None` at the end of the stream.
    pub fn read(&mut self) -> Result<Option<u8>> {
        let ch = match self.pushback.take() {
            Some(ch) => ch,
            None => match self.fill()? {
                Some(ch) => ch,
                None => {
                    self.last = None;
                    return Ok(None);
                }
            },
        };

        self.offset += 1;
        self.anchor.advance(ch);
        self.last = Some(ch);
        Ok(Some(ch))
    }

    /// Returns the next byte without consuming it.
    pub fn peek(&mut self) -> Result<Option<u8>> {
        if let Some(ch) = self.pushback {
            return Ok(Some(ch));
        }
        let ch = self.read()?;
        if ch.is_some() {
            self.pushback();
        }
        Ok(ch)
    }

    /// Restores the last byte read. Returns `false` if there is no byte to
    /// restore, which happens when nothing was read since the previous push-back.
    pub fn pushback(&mut self) -> bool {
        match self.last.take() {
            Some(ch) if self.pushback.is_none() => {
                self.pushback = Some(ch);
                self.offset -= 1;
                self.anchor.rewind();
                true
            }
            _ => false,
        }
    }

    pub fn is_line_start(&self) -> bool {
        self.anchor.is_line_start()
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub(crate) fn cancelled(&self) -> Error {
        Error::Cancelled {
            offset: self.offset,
        }
    }

    pub(crate) fn abort_requested(&self) -> bool {
        self.abort.is_requested()
    }

    fn fill(&mut self) -> Result<Option<u8>> {
        loop {
            if self.reader.buffer().is_empty() && self.abort.is_requested() {
                return Err(self.cancelled());
            }

            let ch = match self.reader.fill_buf() {
                Ok(buf) => buf.first().copied(),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            if ch.is_some() {
                self.reader.consume(1);
            }
            return Ok(ch);
        }
    }
}
