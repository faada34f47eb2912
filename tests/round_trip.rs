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

use mbox_parser::{EscapeGrammar, MboxParser, Message, Result};
use proptest::prelude::*;

#[derive(Debug)]
struct Entry {
    sender: String,
    date_text: String,
    lines: Vec<String>,
}

impl Entry {
    fn body(&self) -> Vec<u8> {
        self.lines
            .iter()
            .flat_map(|line| line.bytes().chain(std::iter::once(b'\n')))
            .collect()
    }
}

/// Writes messages the way mboxrd writers do, quoting `^>*From ` lines.
fn write_mbox(entries: &[Entry]) -> Vec<u8> {
    let mut mbox = Vec::new();

    for entry in entries {
        mbox.extend_from_slice(b"From ");
        mbox.extend_from_slice(entry.sender.as_bytes());
        if !entry.date_text.is_empty() {
            mbox.push(b' ');
            mbox.extend_from_slice(entry.date_text.as_bytes());
        }
        mbox.push(b'\n');

        for line in &entry.lines {
            if line.trim_start_matches('>').starts_with("From ") {
                mbox.push(b'>');
            }
            mbox.extend_from_slice(line.as_bytes());
            mbox.push(b'\n');
        }
    }

    mbox
}

fn entry() -> impl Strategy<Value = Entry> {
    (
        "[A-Za-z0-9@._+-]{1,24}",
        "([A-Za-z0-9:,+-][A-Za-z0-9:,+ -]{0,30})?",
        prop::collection::vec(
            prop_oneof![
                "[ -~]{0,40}",
                ">{0,3}From [ -~]{0,20}",
                ">{0,3}From",
                "Fr?o?m?",
            ],
            0..8,
        ),
    )
        .prop_map(|(sender, date_text, lines)| Entry {
            sender,
            date_text,
            lines,
        })
}

proptest! {
    #[test]
    fn messages_round_trip(entries in prop::collection::vec(entry(), 0..6)) {
        let mbox = write_mbox(&entries);
        let messages = MboxParser::new()
            .parse(&mbox[..])
            .collect::<Result<Vec<Message>>>()
            .unwrap();

        prop_assert_eq!(messages.len(), entries.len());
        for (message, entry) in messages.iter().zip(&entries) {
            prop_assert_eq!(message.sender(), entry.sender.as_str());
            prop_assert_eq!(message.date_text(), entry.date_text.as_str());
            let expected_body = entry.body();
            prop_assert_eq!(message.body(), expected_body.as_slice());
        }
    }

    #[test]
    fn unquoted_lines_never_split_messages(lines in prop::collection::vec("[ -~]{0,40}", 0..16)) {
        let mut mbox = b"From sender@example.com Mon Jan  2 15:04:05 2006\n".to_vec();
        let mut expected = Vec::new();
        for line in lines.iter().filter(|line| !line.starts_with("From ")) {
            mbox.extend_from_slice(line.as_bytes());
            mbox.push(b'\n');
            expected.extend_from_slice(line.as_bytes());
            expected.push(b'\n');
        }

        // Without quoted lines in the input, both grammars agree.
        for grammar in [EscapeGrammar::FromSpace, EscapeGrammar::From] {
            let messages = MboxParser::new()
                .with_escape_grammar(grammar)
                .parse(&mbox[..])
                .collect::<Result<Vec<Message>>>()
                .unwrap();
            prop_assert_eq!(messages.len(), 1);
            if !expected.iter().any(|&ch| ch == b'>') {
                prop_assert_eq!(messages[0].body(), expected.as_slice());
            }
        }
    }
}
