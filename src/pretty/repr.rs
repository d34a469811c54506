//! Python `repr` of JSON scalars and one-line rendering of whole values.

use std::fmt::Write;

use serde_json::{Number, Value};
use unicode_general_category::{get_general_category, GeneralCategory};

/// One-line rendering of a value, with mapping keys sorted.
pub fn repr_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(n) => out.push_str(&repr_number(n)),
        Value::String(s) => write_str(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in sorted_entries(map).into_iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_str(key, out);
                out.push_str(": ");
                write_value(item, out);
            }
            out.push('}');
        }
    }
}

/// Entries of a mapping ordered by key, compared code point by code point.
pub fn sorted_entries(map: &serde_json::Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

/// Integers keep their digits, whatever their size. Anything with a fraction or an
/// exponent is a float.
pub fn repr_number(n: &Number) -> String {
    let text = n.to_string();
    if text.contains(|c: char| c == '.' || c == 'e' || c == 'E') {
        match text.parse::<f64>() {
            Ok(f) => repr_float(f),
            Err(_) => text,
        }
    } else if text.trim_start_matches('-').bytes().all(|b| b == b'0') {
        "0".to_owned()
    } else {
        text
    }
}

/// Shortest round-trip rendering of a float: fixed notation when the decimal exponent
/// is between -4 and 16, scientific with a signed two-digit exponent otherwise.
///
/// Exact ties between two shortest candidates go to the one with an even last digit.
pub fn repr_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_owned();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0.0" } else { "0.0" }.to_owned();
    }

    let sign = if f < 0.0 { "-" } else { "" };
    let mut buf = ryu::Buffer::new();
    let (digits, point) = significant_digits(buf.format_finite(f.abs()));
    let ndigits = digits.len() as i32;

    let mut out = String::from(sign);
    if -4 < point && point <= 16 {
        if point <= 0 {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take((-point) as usize));
            out.push_str(&digits);
        } else if point >= ndigits {
            out.push_str(&digits);
            out.extend(std::iter::repeat('0').take((point - ndigits) as usize));
            out.push_str(".0");
        } else {
            out.push_str(&digits[..point as usize]);
            out.push('.');
            out.push_str(&digits[point as usize..]);
        }
    } else {
        out.push_str(&digits[..1]);
        if ndigits > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let exp = point - 1;
        let _ = write!(out, "e{}{:02}", if exp < 0 { '-' } else { '+' }, exp.abs());
    }
    out
}

/// Split a positive decimal such as `1.25e-7`, `0.0001` or `100.0` into its significant
/// digits and the position of the decimal point: the value is `0.DIGITS * 10^point`.
fn significant_digits(text: &str) -> (String, i32) {
    let (mantissa, exp) = match text.find(|c: char| c == 'e' || c == 'E') {
        Some(i) => (&text[..i], text[i + 1..].parse::<i32>().unwrap_or(0)),
        None => (text, 0),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let all: String = int.chars().chain(frac.chars()).collect();
    let trimmed = all.trim_start_matches('0');
    let point = int.len() as i32 - (all.len() - trimmed.len()) as i32 + exp;

    (trimmed.trim_end_matches('0').to_owned(), point)
}

/// Quoted string literal in the style of Python's `repr(str)`.
pub fn repr_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    write_str(s, &mut out);
    out
}

fn write_str(s: &str, out: &mut String) {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };

    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c < ' ' || c == '\x7f' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_ascii() || is_printable(c) => out.push(c),
            c => {
                let code = c as u32;
                let _ = if code <= 0xff {
                    write!(out, "\\x{:02x}", code)
                } else if code <= 0xffff {
                    write!(out, "\\u{:04x}", code)
                } else {
                    write!(out, "\\U{:08x}", code)
                };
            }
        }
    }
    out.push(quote);
}

/// Everything but the space is escaped among separators, as are control, format, surrogate,
/// private use and unassigned code points.
fn is_printable(c: char) -> bool {
    use GeneralCategory::*;

    c == ' '
        || !matches!(
            get_general_category(c),
            Control | Format | Surrogate | PrivateUse | Unassigned | LineSeparator | ParagraphSeparator | SpaceSeparator
        )
}
