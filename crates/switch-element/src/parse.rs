//! Argument and control-value parsing helpers.
//!
//! Control values and configuration arguments arrive as free text from
//! operators. These helpers strip comment noise and parse integers with the
//! same grammar in both paths:
//!
//! - optional sign (`+` or `-`)
//! - decimal digits, `0x`/`0X` hex digits, or `0b`/`0B` binary digits
//!
//! Values that do not fit in an `i32` are rejected rather than wrapped.

/// Removes `//` line comments and `/* */` block comments, then trims
/// surrounding whitespace.
///
/// Comment markers inside single or double quotes are left alone.
/// An unterminated block comment swallows the rest of the input.
pub fn uncomment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                // Line comment: skip to newline, keep the newline as separator.
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out.trim().to_string()
}

/// Parses an integer using the shared argument grammar.
///
/// Returns `None` for empty input, stray characters, or overflow.
pub fn parse_integer(text: &str) -> Option<i32> {
    let (negative, rest) = match text.as_bytes().first().copied()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = if let Some(hex) = strip_radix_prefix(rest, 'x') {
        (16, hex)
    } else if let Some(bin) = strip_radix_prefix(rest, 'b') {
        (2, bin)
    } else {
        (10, rest)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

/// Strips a `0x`/`0X` style prefix for the given radix marker.
fn strip_radix_prefix(text: &str, marker: char) -> Option<&str> {
    let rest = text.strip_prefix('0')?;
    rest.strip_prefix(marker)
        .or_else(|| rest.strip_prefix(marker.to_ascii_uppercase()))
}

/// Uncomments `text` and parses it as an integer.
///
/// Returns the cleaned text on failure so callers can report it.
pub fn parse_control_integer(text: &str) -> std::result::Result<i32, String> {
    let cleaned = uncomment(text);
    parse_integer(&cleaned).ok_or(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_uncomment_trims_whitespace() {
        assert_eq!(uncomment("  7 \n"), "7");
        assert_eq!(uncomment("\t\t"), "");
    }

    #[test]
    fn test_uncomment_strips_line_and_block_comments() {
        assert_eq!(uncomment("2 // select second output"), "2");
        assert_eq!(uncomment("/* active */ 1"), "1");
        assert_eq!(uncomment("// only a comment"), "");
        assert_eq!(uncomment("3 /* unterminated"), "3");
    }

    #[test]
    fn test_uncomment_preserves_quoted_markers() {
        assert_eq!(uncomment("\"a // b\""), "\"a // b\"");
        assert_eq!(uncomment("'/* x */'"), "'/* x */'");
    }

    #[test]
    fn test_parse_integer_decimal() {
        assert_eq!(parse_integer("0"), Some(0));
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("+3"), Some(3));
        assert_eq!(parse_integer("-1"), Some(-1));
    }

    #[test]
    fn test_parse_integer_prefixed_radix() {
        assert_eq!(parse_integer("0x1f"), Some(31));
        assert_eq!(parse_integer("0XA"), Some(10));
        assert_eq!(parse_integer("0b101"), Some(5));
        assert_eq!(parse_integer("-0x10"), Some(-16));
    }

    #[test]
    fn test_parse_integer_rejects_garbage() {
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer("1.5"), None);
        assert_eq!(parse_integer("+-5"), None);
        assert_eq!(parse_integer("0x"), None);
        assert_eq!(parse_integer("12 3"), None);
    }

    #[test]
    fn test_parse_integer_range() {
        assert_eq!(parse_integer("2147483647"), Some(i32::MAX));
        assert_eq!(parse_integer("-2147483648"), Some(i32::MIN));
        assert_eq!(parse_integer("2147483648"), None);
        assert_eq!(parse_integer("99999999999999999999"), None);
    }

    #[test]
    fn test_parse_control_integer_reports_cleaned_text() {
        assert_eq!(parse_control_integer(" 7 // seven"), Ok(7));
        assert_eq!(parse_control_integer(" abc "), Err("abc".to_string()));
    }
}
