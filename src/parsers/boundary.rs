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

use std::io::Read;

use super::cursor::Cursor;
use crate::core::error::Result;

/// Token that opens every envelope line. Case sensitive, only valid at line start.
pub const SEPARATOR: &[u8] = b"From ";

/// What [`Cursor::scan_line`] found at a line start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// The line opens with `From `. The cursor sits right after the token.
    Separator,
    /// An ordinary line, appended to the caller's buffer with its terminator.
    Text,
    /// The stream ended while the line still matched a prefix of `From `.
    /// The prefix is appended to the caller's buffer.
    PartialSeparator,
    /// The stream ended at the line start.
    End,
}

impl<R: Read> Cursor<R> {
    /// Decides whether the line starting at the cursor is a separator. The
    /// cursor must be at a line start or at the end of the stream.
    ///
    /// Bytes that fail to match the token are never dropped: they are pushed
    /// to `line` along with the rest of the line, terminator included.
    pub fn scan_line(&mut self, line: &mut Vec<u8>) -> Result<LineKind> {
        let kind = self.match_separator(line)?;
        if kind == LineKind::Text && line.last() != Some(&b'\n') {
            self.read_line(line)?;
        }
        Ok(kind)
    }

    /// Compares the bytes at a line start with `From `, stopping at the first
    /// mismatch. On [`LineKind::Text`] only the bytes compared so far are in
    /// `line` and the cursor is left inside the line.
    pub fn match_separator(&mut self, line: &mut Vec<u8>) -> Result<LineKind> {
        let start = line.len();

        for &expected in SEPARATOR {
            match self.read()? {
                Some(ch) if ch == expected => line.push(ch),
                Some(ch) => {
                    line.push(ch);
                    return Ok(LineKind::Text);
                }
                None if line.len() == start => return Ok(LineKind::End),
                None => return Ok(LineKind::PartialSeparator),
            }
        }

        line.truncate(start);
        Ok(LineKind::Separator)
    }

    /// Appends bytes up to and including the next `\n`, or up to the end of the stream.
    pub fn read_line(&mut self, line: &mut Vec<u8>) -> Result<()> {
        while let Some(ch) = self.read()? {
            line.push(ch);
            if ch == b'\n' {
                break;
            }
        }
        Ok(())
    }

    /// Consumes bytes up to and including the next `\n`, or up to the end of the stream.
    pub fn skip_line(&mut self) -> Result<()> {
        while let Some(ch) = self.read()? {
            if ch == b'\n' {
                break;
            }
        }
        Ok(())
    }
}
