//! Pretty printing of JSON values in the layout of Python's `pprint`.
//!
//! A value is written on one line when it fits in the remaining width. Otherwise mappings and
//! sequences put one entry per line, aligned one indent step past their opening bracket, and long
//! strings are split on whitespace into adjacent literals. Mapping keys are sorted.

use std::io::{self, Write};

use serde_json::Value;

mod repr;

pub use self::repr::{repr_float, repr_str, repr_value};
use self::repr::sorted_entries;

/// Columns available to a line when nothing else is configured.
pub const DEFAULT_WIDTH: usize = 80;

/// Lays out JSON values for humans.
#[derive(Debug, Clone, Copy)]
pub struct PrettyPrinter {
    indent: usize,
    width: usize,
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        PrettyPrinter {
            indent: 1,
            width: DEFAULT_WIDTH,
        }
    }
}

impl PrettyPrinter {
    /// Create a printer with an indent of 1 and a width of 80 columns.
    pub fn new() -> PrettyPrinter {
        PrettyPrinter::default()
    }

    /// Set the number of columns added per nesting level.
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set the number of columns the output tries to stay within.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Render `value` to a string, without a trailing newline.
    pub fn pformat(&self, value: &Value) -> String {
        let mut out = String::new();
        self.format(value, &mut out, 0, 0, 0);
        out
    }

    /// Write `value` followed by a newline.
    pub fn pprint<W>(&self, value: &Value, writer: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        writeln!(writer, "{}", self.pformat(value))
    }

    // `allowance` is the number of columns that closing brackets will take after the value.
    fn format(&self, value: &Value, out: &mut String, indent: usize, allowance: usize, level: usize) {
        let rep = repr_value(value);
        if width_of(&rep) as isize > self.width as isize - indent as isize - allowance as isize {
            match value {
                Value::Object(_) => return self.format_object(value, out, indent, allowance, level + 1),
                Value::Array(items) => return self.format_array(items, out, indent, allowance, level + 1),
                Value::String(s) => return self.format_str(s, out, indent, allowance, level + 1),
                _ => {}
            }
        }
        out.push_str(&rep);
    }

    fn format_object(&self, value: &Value, out: &mut String, indent: usize, allowance: usize, level: usize) {
        let map = match value {
            Value::Object(map) => map,
            _ => return,
        };

        out.push('{');
        push_spaces(out, self.indent.saturating_sub(1));

        let entries = sorted_entries(map);
        let indent = indent + self.indent;
        let allowance = allowance + 1;
        let last = entries.len().saturating_sub(1);

        for (i, (key, item)) in entries.into_iter().enumerate() {
            let key = repr_str(key);
            out.push_str(&key);
            out.push_str(": ");
            let item_allowance = if i == last { allowance } else { 1 };
            self.format(item, out, indent + width_of(&key) + 2, item_allowance, level);
            if i != last {
                out.push_str(",\n");
                push_spaces(out, indent);
            }
        }

        out.push('}');
    }

    fn format_array(&self, items: &[Value], out: &mut String, indent: usize, allowance: usize, level: usize) {
        out.push('[');

        let indent = indent + self.indent;
        let allowance = allowance + 1;
        push_spaces(out, self.indent.saturating_sub(1));

        let last = items.len().saturating_sub(1);
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(",\n");
                push_spaces(out, indent);
            }
            let item_allowance = if i == last { allowance } else { 1 };
            self.format(item, out, indent, item_allowance, level);
        }

        out.push(']');
    }

    // At the top level the pieces are wrapped in parentheses, which cost one column on each side.
    fn format_str(&self, s: &str, out: &mut String, indent: usize, allowance: usize, level: usize) {
        if s.is_empty() {
            out.push_str(&repr_str(s));
            return;
        }

        let top = level == 1;
        let (indent, allowance) = if top { (indent + 1, allowance + 1) } else { (indent, allowance) };
        let max_width = self.width as isize - indent as isize;

        let lines = split_lines(s);
        let last_line = lines.len() - 1;
        let mut chunks = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            let rep = repr_str(line);
            let mut line_width = max_width;
            if i == last_line {
                line_width -= allowance as isize;
            }

            if width_of(&rep) as isize <= line_width {
                chunks.push(rep);
                continue;
            }

            let parts = split_words(line);
            let last_part = parts.len() - 1;
            let mut part_width = max_width;
            let mut current = String::new();

            for (j, part) in parts.iter().enumerate() {
                let mut candidate = current.clone();
                candidate.push_str(part);
                if j == last_part && i == last_line {
                    part_width -= allowance as isize;
                }

                if width_of(&repr_str(&candidate)) as isize > part_width {
                    if !current.is_empty() {
                        chunks.push(repr_str(&current));
                    }
                    current = (*part).to_owned();
                } else {
                    current = candidate;
                }
            }

            if !current.is_empty() {
                chunks.push(repr_str(&current));
            }
        }

        if chunks.len() == 1 {
            out.push_str(&chunks[0]);
            return;
        }

        if top {
            out.push('(');
        }
        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
                push_spaces(out, indent);
            }
            out.push_str(chunk);
        }
        if top {
            out.push(')');
        }
    }
}

fn width_of(s: &str) -> usize {
    s.chars().count()
}

fn push_spaces(out: &mut String, count: usize) {
    out.extend(std::iter::repeat(' ').take(count));
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\x1c'..='\x1f')
}

/// Split after every line break, keeping the breaks. `\r\n` counts as one break.
fn split_lines(s: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = s.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                end = j + 1;
                chars.next();
            }
        }
        lines.push(&s[start..end]);
        start = end;
    }

    if start < s.len() {
        lines.push(&s[start..]);
    }
    lines
}

/// Split into runs of non-space characters, each followed by the spaces after it.
fn split_words(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_space = false;

    for (i, c) in s.char_indices() {
        let space = is_space(c);
        if in_space && !space {
            parts.push(&s[start..i]);
            start = i;
        }
        in_space = space;
    }

    if start < s.len() {
        parts.push(&s[start..]);
    }
    parts
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{split_lines, split_words, PrettyPrinter};

    #[test]
    fn test_short_value_on_one_line() {
        let out = PrettyPrinter::new().pformat(&json!({"value": [1, 2, 3]}));
        assert_eq!(out, "{'value': [1, 2, 3]}");
    }

    #[test]
    fn test_pprint_appends_newline() {
        let mut buf = Vec::new();
        PrettyPrinter::new().pprint(&json!([]), &mut buf).unwrap();
        assert_eq!(buf, b"[]\n");
    }

    #[test]
    fn test_mapping_breaks_one_entry_per_line() {
        let out = PrettyPrinter::new()
            .width(20)
            .pformat(&json!({"value": [1, 2, 3], "label": "abc"}));
        assert_eq!(out, "{'label': 'abc',\n 'value': [1, 2, 3]}");
    }

    #[test]
    fn test_nested_sequence_aligned_after_key() {
        let out = PrettyPrinter::new().width(10).pformat(&json!({"value": [1, 2, 3]}));
        assert_eq!(out, "{'value': [1,\n           2,\n           3]}");
    }

    #[test]
    fn test_sequence_of_mappings() {
        let value = json!([{"id": "B1GQ", "label": "Gross domestic product at market prices"}, {"id": "D21"}]);
        let out = PrettyPrinter::new().pformat(&value);
        assert_eq!(
            out,
            "[{'id': 'B1GQ', 'label': 'Gross domestic product at market prices'},\n {'id': 'D21'}]"
        );
    }

    #[test]
    fn test_wider_indent() {
        let out = PrettyPrinter::new().indent(4).width(10).pformat(&json!([1, 2, 3, 4]));
        assert_eq!(out, "[   1,\n    2,\n    3,\n    4]");
    }

    #[test]
    fn test_long_top_level_string_is_parenthesized() {
        let out = PrettyPrinter::new().width(20).pformat(&json!("hello world this is long"));
        assert_eq!(out, "('hello world this '\n 'is long')");
    }

    #[test]
    fn test_long_nested_string_is_split_without_parentheses() {
        let out = PrettyPrinter::new()
            .width(20)
            .pformat(&json!({"k": "aaaa bbbb cccc dddd"}));
        assert_eq!(out, "{'k': 'aaaa bbbb '\n      'cccc dddd'}");
    }

    #[test]
    fn test_multiline_string_split_on_breaks() {
        let out = PrettyPrinter::new().width(12).pformat(&json!(["one\ntwo\nthree"]));
        assert_eq!(out, "['one\\n'\n 'two\\n'\n 'three']");
    }

    #[test]
    fn test_empty_containers() {
        let out = PrettyPrinter::new().width(5).pformat(&json!({"a": {}, "b": []}));
        assert_eq!(out, "{'a': {},\n 'b': []}");
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), ["a\n", "b\r\n", "c\r", "d"]);
        assert_eq!(split_lines("x\n"), ["x\n"]);
        assert_eq!(split_lines("x\u{2028}y"), ["x\u{2028}", "y"]);
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("hello world  x"), ["hello ", "world  ", "x"]);
        assert_eq!(split_words("  lead"), ["  ", "lead"]);
        assert_eq!(split_words("trail "), ["trail "]);
    }
}
