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

use std::{
    io::Read,
    time::{Duration, Instant},
};

use crate::{CancellationToken, EscapeGrammar, MboxParser, MessageStream};

impl MboxParser {
    /// Create a new builder for an mbox parser using the default settings.
    ///
    /// The default settings are:
    ///
    /// * Lines matching `^>+From ` are unquoted (`EscapeGrammar::FromSpace`).
    /// * Message bodies are returned verbatim, including the blank line that
    ///   precedes the next separator.
    /// * No cancellation token and no deadline.
    ///
    pub fn new() -> Self {
        Self {
            escape_grammar: EscapeGrammar::FromSpace,
            remove_blank_line: false,
            cancellation: None,
            deadline: None,
        }
    }

    /// Set which quoted body lines get one `>` marker removed.
    pub fn with_escape_grammar(mut self, grammar: EscapeGrammar) -> Self {
        self.escape_grammar = grammar;
        self
    }

    /// Remove the empty line that mbox writers insert at the end of each
    /// message, before the next `From ` separator.
    pub fn with_separator_blank_line_removed(mut self) -> Self {
        self.remove_blank_line = true;
        self
    }

    /// Abort parsing with `Error::Cancelled` once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Abort parsing with `Error::Cancelled` once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Abort parsing with `Error::Cancelled` after `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns a lazy stream of the messages contained in `reader`.
    pub fn parse<R: Read>(&self, reader: R) -> MessageStream<R> {
        MessageStream::new(reader, self)
    }
}

impl Default for MboxParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::{CancellationToken, EscapeGrammar, MboxParser};

    #[test]
    fn builder_settings() {
        let parser = MboxParser::default();
        assert_eq!(parser.escape_grammar, EscapeGrammar::FromSpace);
        assert!(!parser.remove_blank_line);
        assert!(parser.cancellation.is_none());
        assert!(parser.deadline.is_none());

        let token = CancellationToken::new();
        let before = Instant::now();
        let parser = MboxParser::new()
            .with_escape_grammar(EscapeGrammar::From)
            .with_separator_blank_line_removed()
            .with_cancellation(token.clone())
            .with_timeout(Duration::from_secs(60));

        assert_eq!(parser.escape_grammar, EscapeGrammar::From);
        assert!(parser.remove_blank_line);
        token.cancel();
        assert!(parser.cancellation.as_ref().unwrap().is_cancelled());
        assert!(parser.deadline.unwrap() >= before + Duration::from_secs(60));
    }
}
