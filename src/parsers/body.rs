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

use super::{
    boundary::{LineKind, SEPARATOR},
    cursor::Cursor,
};
use crate::{core::error::Result, EscapeGrammar};

/// How a message body ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEnd {
    /// The next separator was matched; the cursor sits right after its `From ` token.
    Separator,
    /// The stream ended.
    End,
}

impl EscapeGrammar {
    /// Returns `true` if `line` (with its leading `>` markers removed) is one
    /// that writers escape.
    #[inline(always)]
    pub fn is_escaped(&self, line: &[u8]) -> bool {
        match self {
            EscapeGrammar::FromSpace => line.starts_with(SEPARATOR),
            EscapeGrammar::From => line.starts_with(b"From"),
        }
    }
}

/// Returns `true` if `line` carries a `>` quoting marker that must be removed:
/// one or more `>` followed by an escaped line, so `>From x` becomes
/// `From x` and `>>From x` becomes `>From x`.
pub fn is_quoted_line(line: &[u8], grammar: EscapeGrammar) -> bool {
    let markers = line.iter().take_while(|&&ch| ch == b'>').count();
    markers > 0 && grammar.is_escaped(&line[markers..])
}

/// Removes the empty line mbox writers place before the next separator.
pub fn remove_separator_blank_line(body: &mut Vec<u8>) {
    if body == b"\n" || body == b"\r\n" {
        body.clear();
    } else if body.ends_with(b"\r\n\r\n") {
        body.truncate(body.len() - 2);
    } else if body.ends_with(b"\n\n") {
        body.pop();
    }
}

impl<R: Read> Cursor<R> {
    /// Appends message content to `body` line by line until the next separator
    /// or the end of the stream, unquoting escaped lines on the way. The
    /// separator itself is never part of the body.
    pub fn assemble_body(&mut self, body: &mut Vec<u8>, grammar: EscapeGrammar) -> Result<BodyEnd> {
        loop {
            let line_start = body.len();

            match self.scan_line(body)? {
                LineKind::Separator => return Ok(BodyEnd::Separator),
                LineKind::Text => {
                    if is_quoted_line(&body[line_start..], grammar) {
                        tracing::trace!(offset = self.offset(), "unquoting escaped body line");
                        body.remove(line_start);
                    }
                }
                LineKind::PartialSeparator | LineKind::End => return Ok(BodyEnd::End),
            }
        }
    }
}
