//! Minimal RFC 4180 record codec.
//!
//! Fields are separated by `,`, records by `\n` or `\r\n`. A field wrapped in
//! double quotes may contain separators, newlines and `""` (an escaped quote).
//! A leading UTF-8 BOM is ignored.

use std::borrow::Cow;
use std::io::{self, Write};

use crate::error::TableError;

/// Parses a whole document into records. Blank lines are skipped.
pub fn parse(text: &str) -> Result<Vec<Vec<String>>, TableError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quote_line = 0;
    let mut line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                line += 1;
                end_record(&mut records, &mut record, &mut field);
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(TableError::UnterminatedQuote { line: quote_line });
    }
    end_record(&mut records, &mut record, &mut field);
    Ok(records)
}

fn end_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    if record.is_empty() && field.is_empty() {
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}

/// Quotes a field only when it needs it.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    let needs_quotes = field.contains([',', '"', '\n', '\r'])
        || field.starts_with(' ')
        || field.ends_with(' ');
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Writes one record terminated by `\n`.
pub fn write_record<W: Write, S: AsRef<str>>(out: &mut W, fields: &[S]) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        out.write_all(escape_field(field.as_ref()).as_bytes())?;
    }
    out.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_records() {
        let recs = parse("a,b\n1,2\r\n3,4\n").unwrap();
        assert_eq!(recs, vec![vec!["a", "b"], vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn test_quoted_fields() {
        let recs = parse("name,note\n\"FL US Equity\",\"says \"\"hi\"\", then\nleaves\"\n").unwrap();
        assert_eq!(recs[1][0], "FL US Equity");
        assert_eq!(recs[1][1], "says \"hi\", then\nleaves");
    }

    #[test]
    fn test_bom_blank_lines_and_empty_fields() {
        let recs = parse("\u{feff}x,y\n\n1,\n,2").unwrap();
        assert_eq!(recs, vec![vec!["x", "y"], vec!["1", ""], vec!["", "2"]]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(matches!(
            parse("a\n\"oops\n"),
            Err(TableError::UnterminatedQuote { line: 2 })
        ));
    }

    #[test]
    fn test_write_then_parse() {
        let fields = ["plain", "with,comma", "with \"quote\"", " padded "];
        let mut buf = Vec::new();
        write_record(&mut buf, &fields).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "plain,\"with,comma\",\"with \"\"quote\"\"\",\" padded \"\n");
        assert_eq!(parse(&text).unwrap(), vec![fields.to_vec()]);
    }
}
