#![no_main]
use libfuzzer_sys::fuzz_target;

use mbox_parser::{parsers::date::parse_envelope_date, EscapeGrammar, MboxParser};

static MBOX_ALPHABET: &[u8] = b"From >:@0123456789abc\r\n";

fuzz_target!(|data: &[u8]| {
    for data_ in [
        std::borrow::Cow::from(data),
        std::borrow::Cow::from(into_alphabet(data, MBOX_ALPHABET)),
    ] {
        let data = data_.as_ref();

        // Fuzz both escape grammars
        for grammar in [EscapeGrammar::FromSpace, EscapeGrammar::From] {
            let mut stream = MboxParser::new()
                .with_escape_grammar(grammar)
                .with_separator_blank_line_removed()
                .parse(data);

            let mut body_len = 0;
            for message in &mut stream {
                match message {
                    Ok(message) => {
                        assert!(!message.sender().is_empty());
                        body_len += message.body().len();
                        message.date();
                    }
                    Err(_) => break,
                }
            }
            assert!(body_len <= data.len());
            assert!(stream.offset() <= data.len() as u64);
        }

        // Fuzz the date parser
        parse_envelope_date(&String::from_utf8_lossy(data));
    }
});

fn into_alphabet(data: &[u8], alphabet: &[u8]) -> Vec<u8> {
    data.iter()
        .map(|&byte| alphabet[byte as usize % alphabet.len()])
        .collect()
}
