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

use std::fmt;

use crate::{parsers::date::parse_envelope_date, DateTime, Envelope, Message};

impl Envelope {
    /// Returns the envelope sender, a token without whitespace.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the unvalidated remainder of the separator line.
    pub fn date_text(&self) -> &str {
        &self.date_text
    }

    /// Parses the envelope date, returning `None` when it is missing or not
    /// in `asctime` layout.
    pub fn date(&self) -> Option<DateTime> {
        parse_envelope_date(&self.date_text)
    }
}

impl Message {
    pub(crate) fn new(envelope: Envelope, body: Vec<u8>) -> Self {
        Message { envelope, body }
    }

    /// Returns the envelope of this message.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Returns the envelope sender.
    pub fn sender(&self) -> &str {
        &self.envelope.sender
    }

    /// Returns the raw envelope date text.
    pub fn date_text(&self) -> &str {
        &self.envelope.date_text
    }

    /// Returns the parsed envelope date, if any.
    pub fn date(&self) -> Option<DateTime> {
        self.envelope.date()
    }

    /// Returns the raw message, unquoted but otherwise as found in the mailbox.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the message as text if it is valid UTF-8.
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    pub fn into_parts(self) -> (Envelope, Vec<u8>) {
        (self.envelope, self.body)
    }
}

impl DateTime {
    /// Returns an ISO 8601 representation of the date.
    pub fn to_iso8601(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}{:02}:{:02}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            if self.tz_before_gmt && (self.tz_hour > 0 || self.tz_minute > 0) {
                "-"
            } else {
                "+"
            },
            self.tz_hour,
            self.tz_minute
        )
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(&self.to_iso8601())
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if self.date_text.is_empty() {
            write!(fmt, "From {}", self.sender)
        } else {
            write!(fmt, "From {} {}", self.sender, self.date_text)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{DateTime, Envelope, Message};

    #[test]
    fn message_accessors() {
        let envelope = Envelope {
            sender: "foo@bar.org".to_string(),
            date_text: "Mon Jan  2 15:04:05 2006".to_string(),
        };
        let message = Message::new(envelope.clone(), b"Subject: hi\n\nbody\n".to_vec());

        assert_eq!(message.sender(), "foo@bar.org");
        assert_eq!(message.date_text(), "Mon Jan  2 15:04:05 2006");
        assert_eq!(message.envelope(), &envelope);
        assert_eq!(message.body_text(), Some("Subject: hi\n\nbody\n"));
        assert_eq!(
            message.date().map(|date| date.to_string()),
            Some("2006-01-02T15:04:05+00:00".to_string())
        );
        assert_eq!(
            envelope.to_string(),
            "From foo@bar.org Mon Jan  2 15:04:05 2006"
        );

        let (parts_envelope, body) = message.clone().into_parts();
        assert_eq!(parts_envelope, envelope);
        assert_eq!(body, message.into_body());

        let binary = Message::new(Envelope::default(), vec![0xff, 0xfe]);
        assert_eq!(binary.body_text(), None);
        assert_eq!(binary.date(), None);
    }

    #[test]
    fn date_display() {
        let date = DateTime {
            year: 1969,
            month: 2,
            day: 13,
            hour: 23,
            minute: 32,
            second: 54,
            tz_before_gmt: true,
            tz_hour: 3,
            tz_minute: 30,
        };
        assert_eq!(date.to_string(), "1969-02-13T23:32:54-03:30");
    }
}
