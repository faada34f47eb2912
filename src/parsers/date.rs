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

use crate::DateTime;

fn month_number(name: &[u8]) -> Option<u32> {
    hashify::tiny_map_ignore_case! {
        name,
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12
    }
}

fn is_weekday(name: &[u8]) -> bool {
    hashify::tiny_set_ignore_case! {
        name,
        "mon",
        "tue",
        "wed",
        "thu",
        "fri",
        "sat",
        "sun"
    }
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn parse_number(token: &[u8], max_digits: usize) -> Option<u32> {
    if token.is_empty() || token.len() > max_digits || !token.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(token.iter().fold(0, |acc, &ch| acc * 10 + (ch - b'0') as u32))
}

fn parse_time(token: &[u8]) -> Option<(u32, u32, u32)> {
    let mut parts = token.split(|&ch| ch == b':');
    let hour = parse_number(parts.next()?, 2)?;
    let minute = parse_number(parts.next()?, 2)?;
    let second = match parts.next() {
        Some(second) => parse_number(second, 2)?,
        None => 0,
    };

    if parts.next().is_none() && hour < 24 && minute < 60 && second <= 60 {
        Some((hour, minute, second))
    } else {
        None
    }
}

/// Parses a `+hhmm`/`-hhmm` offset or a named UTC zone.
fn parse_zone(token: &[u8]) -> Option<(bool, u32, u32)> {
    match token {
        [sign @ (b'+' | b'-'), digits @ ..] if digits.len() == 4 => {
            let zone = parse_number(digits, 4)?;
            if zone % 100 < 60 {
                Some((*sign == b'-', zone / 100, zone % 100))
            } else {
                None
            }
        }
        _ if token.eq_ignore_ascii_case(b"UTC")
            || token.eq_ignore_ascii_case(b"GMT")
            || token.eq_ignore_ascii_case(b"UT") =>
        {
            Some((false, 0, 0))
        }
        _ => None,
    }
}

/// Parses the `asctime` date found on envelope lines, such as
/// `Mon Jan  2 15:04:05 2006`. The weekday is optional and a numeric or
/// UTC zone may follow the time or the year. Anything after the year and
/// zone (e.g. UUCP `remote from` trailers) is ignored.
pub fn parse_envelope_date(text: &str) -> Option<DateTime> {
    let mut tokens = text
        .as_bytes()
        .split(|ch| ch.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .peekable();

    if tokens.peek().is_some_and(|token| is_weekday(token)) {
        tokens.next();
    }

    let month = month_number(tokens.next()?)?;
    let day = parse_number(tokens.next()?, 2).filter(|day| (1..=31).contains(day))?;
    let (hour, minute, second) = parse_time(tokens.next()?)?;

    let mut year = None;
    let mut zone = None;
    for token in tokens.take(2) {
        if year.is_none() {
            if let Some(value) = parse_number(token, 4).filter(|_| token.len() == 4) {
                year = Some(value);
                continue;
            }
        }
        if zone.is_none() {
            if let Some(value) = parse_zone(token) {
                zone = Some(value);
                continue;
            }
        }
        break;
    }

    let year = year?;
    if day > days_in_month(year, month) {
        return None;
    }
    let (tz_before_gmt, tz_hour, tz_minute) = zone.unwrap_or((false, 0, 0));

    Some(DateTime {
        year,
        month,
        day,
        hour,
        minute,
        second,
        tz_before_gmt,
        tz_hour,
        tz_minute,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_envelope_date;

    #[test]
    fn parse_dates() {
        let inputs = [
            ("Mon Jan  2 15:04:05 2006", Some("2006-01-02T15:04:05+00:00")),
            ("Thu Nov 24 18:22:48 1986", Some("1986-11-24T18:22:48+00:00")),
            ("sat jan 3 01:05:34 1996", Some("1996-01-03T01:05:34+00:00")),
            ("Fri Dec 31 23:59 1999", Some("1999-12-31T23:59:00+00:00")),
            (
                "Tue Jul  1 10:52:37 2003 +0200",
                Some("2003-07-01T10:52:37+02:00"),
            ),
            (
                "Wed Feb 13 23:32:54 -0330 1969",
                Some("1969-02-13T23:32:54-03:30"),
            ),
            (
                "Tue Jul  1 10:52:37 2003 remote from uunet",
                Some("2003-07-01T10:52:37+00:00"),
            ),
            ("Jul  1 10:52:37 2003 GMT", Some("2003-07-01T10:52:37+00:00")),
            ("Sept 11, 2001", None),
            ("", None),
            ("Mon Jan  2 15:04:05", None),
            ("Mon Jan 32 15:04:05 2006", None),
            ("Mon Feb 31 10:00:00 2006", None),
            ("Fri Feb 29 00:00:00 2019", None),
            ("Mon Apr 31 10:00:00 2006", None),
            ("Tue Feb 29 00:00:00 2000", Some("2000-02-29T00:00:00+00:00")),
            ("Thu Feb 29 00:00:00 1900", None),
            ("Sat Feb 29 00:00:00 2020", Some("2020-02-29T00:00:00+00:00")),
            ("Mon Jan  2 25:04:05 2006", None),
            ("Mon Foo  2 15:04:05 2006", None),
            ("Mon Jan  2 15:04:05 06", None),
            ("Mon Jan  2 15:04:05 2006 +01", Some("2006-01-02T15:04:05+00:00")),
        ];

        for (input, expected) in inputs {
            assert_eq!(
                parse_envelope_date(input).map(|date| date.to_iso8601()),
                expected.map(String::from),
                "failed for {:?}",
                input
            );
        }
    }
}
