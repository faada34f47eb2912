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

//! Error types for mbox parsing.

use std::{fmt, io, sync::Arc};

/// Result type alias for mbox parsing.
pub type Result<T> = std::result::Result<T, Error>;

/// Mbox parsing errors. All of them are terminal for the stream that produced them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The underlying reader failed.
    #[error("I/O failure: {0}")]
    Io(#[source] Arc<io::Error>),

    /// The stream ended in the middle of a required token.
    #[error("unexpected end of stream while reading {token} at offset {offset}")]
    UnexpectedEof { token: Token, offset: u64 },

    /// A separator line without a sender.
    #[error("malformed envelope: separator line has no sender at offset {offset}")]
    MalformedEnvelope { offset: u64 },

    /// The caller cancelled the parse or its deadline passed.
    #[error("parse cancelled at offset {offset}")]
    Cancelled { offset: u64 },
}

/// The kind of an [`Error`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    IoFailure,
    UnexpectedEof,
    MalformedEnvelope,
    Cancelled,
}

/// Token being read when the stream ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// The `From ` separator literal.
    Separator,
    /// The envelope sender address.
    Sender,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::IoFailure,
            Error::UnexpectedEof { .. } => ErrorKind::UnexpectedEof,
            Error::MalformedEnvelope { .. } => ErrorKind::MalformedEnvelope,
            Error::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(match self {
            Token::Separator => "the separator token",
            Token::Sender => "the envelope sender",
        })
    }
}
