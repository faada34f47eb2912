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
use crate::{
    core::error::{Error, Result, Token},
    Envelope,
};

#[inline(always)]
fn is_envelope_space(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\r' | b'\n')
}

impl<R: Read> Cursor<R> {
    /// Parses the sender and date of a separator line. The cursor must sit
    /// right after the `From ` token and is left on the line terminator.
    pub fn parse_envelope(&mut self) -> Result<Envelope> {
        let sender_offset = self.offset();
        let mut sender = Vec::with_capacity(32);

        loop {
            match self.read()? {
                Some(ch) if is_envelope_space(ch) => {
                    self.pushback();
                    break;
                }
                Some(ch) => sender.push(ch),
                None if sender.is_empty() => {
                    return Err(Error::MalformedEnvelope {
                        offset: sender_offset,
                    })
                }
                None => {
                    return Err(Error::UnexpectedEof {
                        token: Token::Sender,
                        offset: self.offset(),
                    })
                }
            }
        }

        if sender.is_empty() {
            return Err(Error::MalformedEnvelope {
                offset: sender_offset,
            });
        }

        let mut date = Vec::with_capacity(32);
        while let Some(ch) = self.peek()? {
            if ch == b'\n' {
                break;
            }
            self.read()?;
            date.push(ch);
        }

        let date = date
            .strip_suffix(b"\r")
            .unwrap_or(&date)
            .iter()
            .skip_while(|&&ch| matches!(ch, b' ' | b'\t'))
            .copied()
            .collect::<Vec<_>>();

        Ok(Envelope {
            sender: into_text(sender),
            date_text: into_text(date),
        })
    }
}

fn into_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use crate::{
        core::error::{Error, ErrorKind, Token},
        parsers::cursor::Cursor,
    };

    #[test]
    fn parse_envelopes() {
        let inputs = [
            ("foo@bar.org Sept 11, 2001\n", "foo@bar.org", "Sept 11, 2001"),
            (
                "MAILER-DAEMON Mon Jan  2 15:04:05 2006\r\n",
                "MAILER-DAEMON",
                "Mon Jan  2 15:04:05 2006",
            ),
            ("user@example.com\n", "user@example.com", ""),
            ("user@example.com\r\n", "user@example.com", ""),
            ("user@example.com   \tlate date", "user@example.com", "late date"),
            ("a\tb c\n", "a", "b c"),
            ("thi!s ", "thi!s", ""),
        ];

        for (input, sender, date) in inputs {
            let mut cursor = Cursor::new(input.as_bytes());
            let envelope = cursor.parse_envelope().unwrap();
            assert_eq!(envelope.sender(), sender, "failed for {:?}", input);
            assert_eq!(envelope.date_text(), date, "failed for {:?}", input);

            // The terminator stays in the stream.
            if input.ends_with('\n') {
                assert_eq!(cursor.read().unwrap(), Some(b'\n'));
            }
            assert_eq!(cursor.read().unwrap(), None);
        }
    }

    #[test]
    fn parse_invalid_envelopes() {
        let inputs = [
            ("", ErrorKind::MalformedEnvelope),
            (" foo@bar.org date\n", ErrorKind::MalformedEnvelope),
            ("\n", ErrorKind::MalformedEnvelope),
            ("foo@bar.org", ErrorKind::UnexpectedEof),
        ];

        for (input, kind) in inputs {
            let err = Cursor::new(input.as_bytes()).parse_envelope().unwrap_err();
            assert_eq!(err.kind(), kind, "failed for {:?}", input);
        }

        match Cursor::new(&b"abc"[..]).parse_envelope() {
            Err(Error::UnexpectedEof { token, offset }) => {
                assert_eq!(token, Token::Sender);
                assert_eq!(offset, 3);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
