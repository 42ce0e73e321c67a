//! Ionic charge notation: `2+`, `-`, `3-`, or a plain signed integer

use crate::error::{Error, Result};

/// magnitude written as bare digits, no sign
fn magnitude(s: &str) -> Option<i32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

pub fn parse_charge(s: &str) -> Result<i32> {
    let s = s.trim();
    let invalid = || Error::InvalidCharge(s.to_owned());
    match s {
        "" => Ok(0),
        "+" => Ok(1),
        "-" => Ok(-1),
        _ => {
            if let Some(n) = s.strip_suffix('+') {
                magnitude(n).ok_or_else(invalid)
            } else if let Some(n) = s.strip_suffix('-') {
                magnitude(n).map(|n| -n).ok_or_else(invalid)
            } else {
                s.parse().map_err(|_| invalid())
            }
        }
    }
}

pub fn format_charge(charge: i32) -> String {
    match charge {
        0 => String::new(),
        1 => "+".to_owned(),
        -1 => "-".to_owned(),
        n if n > 1 => format!("{n}+"),
        n => format!("{}-", n.unsigned_abs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let cases = [
            ("", 0),
            ("+", 1),
            ("-", -1),
            ("2+", 2),
            ("3-", -3),
            ("-2", -2),
            ("4", 4),
            (" 1- ", -1),
        ];
        for (input, want) in cases {
            assert_eq!(parse_charge(input).unwrap(), want, "{input}");
        }
    }

    #[test]
    fn parse_invalid() {
        for input in ["++", "+2+", "x", "2+-", "-3-"] {
            assert!(
                matches!(parse_charge(input), Err(Error::InvalidCharge(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn format() {
        assert_eq!(format_charge(0), "");
        assert_eq!(format_charge(1), "+");
        assert_eq!(format_charge(-1), "-");
        assert_eq!(format_charge(3), "3+");
        assert_eq!(format_charge(-2), "2-");
        for c in -8..=8 {
            assert_eq!(parse_charge(&format_charge(c)).unwrap(), c);
        }
    }
}
