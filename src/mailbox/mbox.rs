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

use std::{io::Read, iter::FusedIterator, mem};

use crate::{
    core::cancel::Abort,
    parsers::{
        body::{remove_separator_blank_line, BodyEnd},
        boundary::{LineKind, SEPARATOR},
        cursor::Cursor,
    },
    Envelope, Error, EscapeGrammar, MboxParser, Message, Result, Token,
};

enum ParserState {
    /// Skipping blank lines and preamble text before a line that may be a separator.
    Seeking,
    /// At a line start, comparing the next bytes with `From `.
    MatchingToken,
    /// Right after a `From ` token.
    InEnvelope,
    /// Right after a separator line.
    InBody(Envelope),
    Done,
    Failed(Error),
}

enum Step {
    Continue(ParserState),
    Yield(Message, ParserState),
}

/// Parses an mbox mailbox from a `Read` stream, returning one [`Message`] per
/// `From ` separator.
///
/// The stream is lazy, forward only and not restartable: each call pulls just
/// enough input to complete the next message. Once it fails, the reader is
/// never touched again.
pub struct MessageStream<R: Read> {
    cursor: Cursor<R>,
    state: ParserState,
    escape_grammar: EscapeGrammar,
    remove_blank_line: bool,
    messages_read: usize,
    error_returned: bool,
}

impl<R: Read> MessageStream<R> {
    pub(crate) fn new(reader: R, parser: &MboxParser) -> MessageStream<R> {
        MessageStream {
            cursor: Cursor::with_abort(
                reader,
                Abort {
                    token: parser.cancellation.clone(),
                    deadline: parser.deadline,
                },
            ),
            state: ParserState::Seeking,
            escape_grammar: parser.escape_grammar,
            remove_blank_line: parser.remove_blank_line,
            messages_read: 0,
            error_returned: false,
        }
    }

    /// Returns the next message, `Ok(None)` once the mailbox is exhausted, or
    /// the error that stopped the parse. After a failure, every call returns
    /// that same error.
    pub fn next_message(&mut self) -> Result<Option<Message>> {
        match &self.state {
            ParserState::Done => return Ok(None),
            ParserState::Failed(err) => return Err(err.clone()),
            _ => (),
        }

        if self.cursor.abort_requested() {
            return Err(self.fail(self.cursor.cancelled()));
        }

        loop {
            let state = mem::replace(&mut self.state, ParserState::Done);
            match self.step(state) {
                Ok(Step::Continue(ParserState::Done)) => {
                    tracing::debug!(
                        offset = self.cursor.offset(),
                        messages = self.messages_read,
                        "reached end of mailbox"
                    );
                    return Ok(None);
                }
                Ok(Step::Continue(next)) => self.state = next,
                Ok(Step::Yield(message, next)) => {
                    self.state = next;
                    self.messages_read += 1;
                    tracing::debug!(
                        sender = message.sender(),
                        body_len = message.body().len(),
                        "parsed message"
                    );
                    return Ok(Some(message));
                }
                Err(err) => return Err(self.fail(err)),
            }
        }
    }

    fn step(&mut self, state: ParserState) -> Result<Step> {
        match state {
            ParserState::Seeking => {
                while let Some(ch) = self.cursor.peek()? {
                    if matches!(ch, b' ' | b'\t' | b'\r' | b'\n') {
                        self.cursor.read()?;
                    } else if self.cursor.is_line_start() {
                        return Ok(Step::Continue(ParserState::MatchingToken));
                    } else {
                        self.discard_preamble(0)?;
                    }
                }
                Ok(Step::Continue(ParserState::Done))
            }
            ParserState::MatchingToken => {
                let mut token = Vec::with_capacity(SEPARATOR.len());
                match self.cursor.match_separator(&mut token)? {
                    LineKind::Separator => Ok(Step::Continue(ParserState::InEnvelope)),
                    LineKind::Text => {
                        self.discard_preamble(token.len() as u64)?;
                        Ok(Step::Continue(ParserState::Seeking))
                    }
                    LineKind::PartialSeparator => Err(Error::UnexpectedEof {
                        token: Token::Separator,
                        offset: self.cursor.offset(),
                    }),
                    LineKind::End => Ok(Step::Continue(ParserState::Done)),
                }
            }
            ParserState::InEnvelope => {
                let envelope = self.cursor.parse_envelope()?;
                tracing::debug!(
                    offset = self.cursor.offset(),
                    sender = envelope.sender(),
                    "found message separator"
                );

                // Line terminator, absent at the end of the stream.
                self.cursor.read()?;

                Ok(Step::Continue(ParserState::InBody(envelope)))
            }
            ParserState::InBody(envelope) => {
                let mut body = Vec::with_capacity(1024);
                let end = self.cursor.assemble_body(&mut body, self.escape_grammar)?;
                if self.remove_blank_line {
                    remove_separator_blank_line(&mut body);
                }

                Ok(Step::Yield(
                    Message::new(envelope, body),
                    match end {
                        BodyEnd::Separator => ParserState::InEnvelope,
                        BodyEnd::End => ParserState::Done,
                    },
                ))
            }
            ParserState::Done => Ok(Step::Continue(ParserState::Done)),
            ParserState::Failed(err) => Err(err),
        }
    }

    /// Skips the rest of a line that precedes the first separator, `scanned`
    /// bytes of which were already read.
    fn discard_preamble(&mut self, scanned: u64) -> Result<()> {
        let offset = self.cursor.offset() - scanned;
        if !self.cursor.is_line_start() {
            self.cursor.skip_line()?;
        }
        tracing::debug!(
            offset,
            len = self.cursor.offset() - offset,
            "discarding text before first separator"
        );
        Ok(())
    }

    fn fail(&mut self, err: Error) -> Error {
        tracing::warn!(error = %err, offset = self.cursor.offset(), "mbox parse failed");
        self.state = ParserState::Failed(err.clone());
        err
    }

    /// Number of bytes consumed from the reader.
    pub fn offset(&self) -> u64 {
        self.cursor.offset()
    }

    /// Number of messages returned so far.
    pub fn messages_read(&self) -> usize {
        self.messages_read
    }

    /// Returns the error that stopped the parse, if any.
    pub fn error(&self) -> Option<&Error> {
        match &self.state {
            ParserState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` once the stream has ended, successfully or not.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, ParserState::Done | ParserState::Failed(_))
    }
}

impl<R: Read> Iterator for MessageStream<R> {
    type Item = Result<Message>;

    /// Yields messages until the mailbox is exhausted. A failure is yielded
    /// once, after which the iterator ends; use [`MessageStream::error`] to
    /// retrieve it again.
    fn next(&mut self) -> Option<Self::Item> {
        if self.error_returned {
            return None;
        }

        match self.next_message() {
            Ok(message) => message.map(Ok),
            Err(err) => {
                self.error_returned = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: Read> FusedIterator for MessageStream<R> {}
