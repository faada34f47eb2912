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

//! # mbox-parser
//!
//! _mbox-parser_ is a **streaming Unix mbox parser** written in Rust. It splits a concatenated mailbox into its
//! individual messages, extracting the envelope sender and date from each `From ` separator line, without
//! ever holding more than the message being assembled in memory.
//!
//! In general, this library abides by the Postel's law or [Robustness Principle](https://en.wikipedia.org/wiki/Robustness_principle):
//! stray or missing blank lines between messages are tolerated, a missing envelope date is not an error and
//! date validation is left to the caller. What it is strict about is the separator itself:
//!
//! - A separator is the literal, case sensitive token `From ` at the **start of a line** (or of the stream).
//!   `From:` headers, `notFrom x` or a `From ` in the middle of a line are always body text.
//! - Body lines quoted by the writer are unquoted following the
//!   [mboxrd](https://www.loc.gov/preservation/digital/formats/fdd/fdd000385.shtml) convention: one `>` is
//!   removed from any line made of one or more `>` followed by `From `. `>From x` becomes `From x` and
//!   `>>From x` becomes `>From x`. [`EscapeGrammar::From`] extends this to lines where `From` is not
//!   followed by a space.
//! - Parsing is pull based and single threaded. Blocking reads can be aborted through a
//!   [`CancellationToken`] or a deadline.
//!
//! Header parsing, MIME decoding and character set conversion are out of scope: every [`Message`] body is
//! returned as raw bytes, ready to be handed over to an RFC 5322 parser.
//!
//! ## Usage Example
//!
//! ```
//!    use mbox_parser::MboxParser;
//!
//!    let input = concat!(
//!        "From art@vandelay.com Sat Nov 20 14:22:01 2021\n",
//!        "Subject: Importing\n",
//!        "\n",
//!        ">From the desk of Art Vandelay\n",
//!        "\n",
//!        "From kramer@kramerica.com Sun Nov 21 09:00:00 2021\n",
//!        "Subject: Coffee tables\n",
//!    );
//!
//!    let mut messages = MboxParser::new()
//!        .with_separator_blank_line_removed()
//!        .parse(input.as_bytes());
//!
//!    let message = messages.next().unwrap().unwrap();
//!    assert_eq!(message.sender(), "art@vandelay.com");
//!    assert_eq!(message.date_text(), "Sat Nov 20 14:22:01 2021");
//!    assert_eq!(
//!        message.body(),
//!        b"Subject: Importing\n\nFrom the desk of Art Vandelay\n"
//!    );
//!    assert_eq!(
//!        message.date().unwrap().to_iso8601(),
//!        "2021-11-20T14:22:01+00:00"
//!    );
//!
//!    let message = messages.next().unwrap().unwrap();
//!    assert_eq!(message.sender(), "kramer@kramerica.com");
//!    assert_eq!(message.body(), b"Subject: Coffee tables\n");
//!
//!    assert!(messages.next().is_none());
//! ```

pub mod core;
pub mod mailbox;
pub mod parsers;

use std::time::Instant;

pub use crate::core::{
    cancel::CancellationToken,
    error::{Error, ErrorKind, Result, Token},
};
pub use crate::mailbox::mbox::MessageStream;

/// The sender and date found on a `From ` separator line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Serialize, rkyv::Deserialize, rkyv::Archive)
)]
pub struct Envelope {
    sender: String,
    date_text: String,
}

/// A message extracted from an mbox stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Serialize, rkyv::Deserialize, rkyv::Archive)
)]
pub struct Message {
    envelope: Envelope,
    body: Vec<u8>,
}

/// A date parsed from an envelope line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Serialize, rkyv::Deserialize, rkyv::Archive)
)]
pub struct DateTime {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub tz_before_gmt: bool,
    pub tz_hour: u32,
    pub tz_minute: u32,
}

/// Which quoted body lines get one `>` removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EscapeGrammar {
    /// Lines matching `^>+From ` (mboxrd).
    #[default]
    FromSpace,
    /// Lines matching `^>+From`, with or without a trailing space.
    From,
}

/// Mbox parser settings. Use [`MboxParser::parse`] to start reading a mailbox.
#[derive(Debug, Clone)]
pub struct MboxParser {
    pub(crate) escape_grammar: EscapeGrammar,
    pub(crate) remove_blank_line: bool,
    pub(crate) cancellation: Option<CancellationToken>,
    pub(crate) deadline: Option<Instant>,
}
