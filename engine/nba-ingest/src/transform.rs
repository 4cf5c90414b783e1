//! Records → JSON Lines
//!
//! Each record becomes one line. Separators carry a trailing space
//! (`{"Name": "A", "Team": "GS"}`) and everything outside printable ASCII is
//! `\uXXXX`-escaped, matching the bytes existing readers of the raw zone
//! already see.

use crate::models::Record;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io::{self, Write};

/// Compact JSON with `": "` and `", "` separators and ASCII-only strings
#[derive(Debug, Default, Clone, Copy)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if c.is_ascii() && c != '\x7f' {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            // Astral code points become a surrogate pair
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units).iter() {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Serialize one record on a single line
pub fn record_to_line(record: &Record) -> Result<String, serde_json::Error> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    record.serialize(&mut ser)?;
    String::from_utf8(buf)
        .map_err(|e| <serde_json::Error as serde::ser::Error>::custom(e))
}

/// Serialize records one per line, joined by `\n`, no trailing newline
pub fn to_line_delimited_json(records: &[Record]) -> Result<String, serde_json::Error> {
    tracing::debug!("Converting {} records to JSON Lines", records.len());

    let lines = records.iter().map(record_to_line).collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(input: &str) -> Vec<Value> {
        serde_json::from_str(input).unwrap()
    }

    #[test]
    fn test_two_records_scenario() {
        let records = vec![json!({"Name": "A"}), json!({"Name": "B"})];
        let text = to_line_delimited_json(&records).unwrap();
        assert_eq!(text, "{\"Name\": \"A\"}\n{\"Name\": \"B\"}");
    }

    #[test]
    fn test_each_line_round_trips_to_its_record() {
        let records = vec![
            json!({"PlayerID": 20000439, "FirstName": "Stephen", "Jersey": 30, "Active": true}),
            json!({"PlayerID": 20000441, "Height": 81, "Salary": null, "Ratio": 0.5}),
            json!({"PlayerID": 1, "Injuries": [{"Part": "Knee"}, {"Part": "Ankle"}]}),
        ];

        let text = to_line_delimited_json(&records).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), records.len());

        for (line, record) in lines.iter().zip(&records) {
            let parsed: Value = serde_json::from_str(line).unwrap();
            assert_eq!(&parsed, record);
        }
    }

    #[test]
    fn test_key_order_is_preserved() {
        let records = parse(r#"[{"Zeta": 1, "Alpha": 2, "Mid": [1, 2]}]"#);
        let text = to_line_delimited_json(&records).unwrap();
        assert_eq!(text, r#"{"Zeta": 1, "Alpha": 2, "Mid": [1, 2]}"#);
    }

    #[test]
    fn test_deterministic_output() {
        let records = vec![json!({"Name": "A", "Team": "GS"}), json!([1, "two", null])];
        let first = to_line_delimited_json(&records).unwrap();
        let second = to_line_delimited_json(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_embedded_newlines_stay_escaped() {
        let records = vec![json!({"Note": "line one\nline two"}), json!({"Note": "ok"})];
        let text = to_line_delimited_json(&records).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with(r#"{"Note": "line one\nline two"}"#));
    }

    #[test]
    fn test_empty_input_yields_empty_string() {
        assert_eq!(to_line_delimited_json(&[]).unwrap(), "");
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let record = json!({"Name": "Nikola Joki\u{107}"});
        let line = record_to_line(&record).unwrap();
        assert_eq!(line, r#"{"Name": "Nikola Joki\u0107"}"#);
    }

    #[test]
    fn test_astral_chars_become_surrogate_pairs() {
        let record = json!({"Note": "\u{1f3c0} MVP"});
        let line = record_to_line(&record).unwrap();
        assert_eq!(line, r#"{"Note": "\ud83c\udfc0 MVP"}"#);

        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_escaped_keys_and_control_chars() {
        let record = json!({"Ciudad": "Bogot\u{e1}\t\u{7f}", "A\u{f1}o": 2024});
        let expected = r#"{"Ciudad": "Bogot\u00e1\t\u007f", "A\u00f1o": 2024}"#;

        assert_eq!(record_to_line(&record).unwrap(), expected);
    }

    #[test]
    fn test_large_integers_are_kept_exact() {
        let input = r#"[{"Id": 123456789012345678901234, "Salary": 48728845.5}]"#;
        let records = parse(input);

        let text = to_line_delimited_json(&records).unwrap();
        assert_eq!(text, &input[1..input.len() - 1]);
    }
}
