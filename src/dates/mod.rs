//! Page-key rendering from the user's preferred date format.
//!
//! The destination graph names its journal pages with a date-fns-style
//! pattern (`yyyy-MM-dd`, `MMM do, yyyy`, ...). This module translates that
//! pattern over a timestamp; the rest of the crate consumes it as a pure
//! function.

use chrono::{DateTime, Datelike, Utc};

/// Default pattern when the user has not configured one.
pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd";

/// Format a timestamp into a journal page key using a date-fns-style pattern.
///
/// Supported tokens: `yyyy`, `yy`, `MMMM`, `MMM`, `MM`, `M`, `dd`, `do`,
/// `d`, `EEEE`, `EEE`. Any other character is copied through literally.
pub fn format_page_key(timestamp: DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if !ch.is_ascii_alphabetic() {
            out.push(ch);
            i += 1;
            continue;
        }
        // "do" is the one two-letter token made of different letters.
        if ch == 'd' && chars.get(i + 1) == Some(&'o') {
            out.push_str(&ordinal_day(timestamp.day()));
            i += 2;
            continue;
        }
        let mut run = 1;
        while chars.get(i + run) == Some(&ch) {
            run += 1;
        }
        push_token(&mut out, timestamp, ch, run);
        i += run;
    }
    out
}

fn push_token(out: &mut String, ts: DateTime<Utc>, ch: char, run: usize) {
    match (ch, run) {
        ('y', 2) => out.push_str(&ts.format("%y").to_string()),
        ('y', _) => out.push_str(&ts.format("%Y").to_string()),
        ('M', 1) => out.push_str(&ts.month().to_string()),
        ('M', 2) => out.push_str(&ts.format("%m").to_string()),
        ('M', 3) => out.push_str(&ts.format("%b").to_string()),
        ('M', _) => out.push_str(&ts.format("%B").to_string()),
        ('d', 1) => out.push_str(&ts.day().to_string()),
        ('d', _) => out.push_str(&ts.format("%d").to_string()),
        ('E', run) if run >= 4 => out.push_str(&ts.format("%A").to_string()),
        ('E', _) => out.push_str(&ts.format("%a").to_string()),
        // Unknown token letters pass through unchanged.
        (other, run) => {
            for _ in 0..run {
                out.push(other);
            }
        }
    }
}

fn ordinal_day(day: u32) -> String {
    let suffix = match day {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{day}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn iso_pattern_matches_worked_example() {
        assert_eq!(format_page_key(ts(2024, 1, 2), "yyyy-MM-dd"), "2024-01-02");
    }

    #[test]
    fn month_name_and_ordinal_day() {
        assert_eq!(
            format_page_key(ts(2024, 1, 2), "MMM do, yyyy"),
            "Jan 2nd, 2024"
        );
        assert_eq!(
            format_page_key(ts(2024, 3, 11), "MMMM do, yyyy"),
            "March 11th, 2024"
        );
    }

    #[test]
    fn weekday_tokens() {
        // 2024-01-02 was a Tuesday.
        assert_eq!(
            format_page_key(ts(2024, 1, 2), "EEE, dd-MM-yyyy"),
            "Tue, 02-01-2024"
        );
        assert_eq!(format_page_key(ts(2024, 1, 2), "EEEE"), "Tuesday");
    }

    #[test]
    fn unpadded_tokens() {
        assert_eq!(format_page_key(ts(2024, 3, 5), "d/M/yy"), "5/3/24");
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal_day(1), "1st");
        assert_eq!(ordinal_day(2), "2nd");
        assert_eq!(ordinal_day(3), "3rd");
        assert_eq!(ordinal_day(4), "4th");
        assert_eq!(ordinal_day(11), "11th");
        assert_eq!(ordinal_day(12), "12th");
        assert_eq!(ordinal_day(13), "13th");
        assert_eq!(ordinal_day(21), "21st");
        assert_eq!(ordinal_day(31), "31st");
    }

    #[test]
    fn literal_characters_pass_through() {
        assert_eq!(format_page_key(ts(2024, 1, 2), "yyyy_MM"), "2024_01");
    }

    #[test]
    fn distinct_dates_give_distinct_keys() {
        let a = format_page_key(ts(2024, 1, 2), DEFAULT_DATE_FORMAT);
        let b = format_page_key(ts(2024, 1, 3), DEFAULT_DATE_FORMAT);
        assert_ne!(a, b);
    }
}
