// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP literal encoding
//!
//! The inverse of the tokenizer rules: reals always carry a decimal point,
//! strings double their apostrophes and backslashes and escape everything
//! outside printable ASCII with the `\X\`, `\X2\` and `\X4\` directives.

use crate::record::{AttributeValue, Record};
use std::fmt::{self, Write};

/// Values closer to zero than this are written as `0.`
const ZERO_SNAP: f64 = 1e-12;

/// Format a real number for STEP: `0.`, `1.`, `-2.5`, `0.001`
pub fn format_real(value: f64) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_real(&mut out, value);
    out
}

fn write_real<W: Write>(out: &mut W, value: f64) -> fmt::Result {
    if value.abs() < ZERO_SNAP {
        return out.write_str("0.");
    }
    // f64 Display never switches to exponent notation
    let text = value.to_string();
    out.write_str(&text)?;
    if !text.contains('.') {
        out.write_char('.')?;
    }
    Ok(())
}

/// Escape string content (without the surrounding quotes)
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let _ = write_escaped(&mut out, s);
    out
}

fn write_escaped<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => out.write_str("''")?,
            '\\' => out.write_str("\\\\")?,
            ' '..='~' => out.write_char(c)?,
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                write!(out, "\\X\\{:02X}", c as u32)?;
            }
            c if (c as u32) > 0xFFFF => {
                // Run of supplementary-plane characters
                out.write_str("\\X4\\")?;
                write!(out, "{:08X}", c as u32)?;
                while let Some(&next) = chars.peek() {
                    if (next as u32) <= 0xFFFF {
                        break;
                    }
                    write!(out, "{:08X}", next as u32)?;
                    chars.next();
                }
                out.write_str("\\X0\\")?;
            }
            c => {
                // Run of BMP characters as UTF-16 code units
                out.write_str("\\X2\\")?;
                write!(out, "{:04X}", c as u32)?;
                while let Some(&next) = chars.peek() {
                    let code = next as u32;
                    if code < 0x80 || code > 0xFFFF {
                        break;
                    }
                    write!(out, "{:04X}", code)?;
                    chars.next();
                }
                out.write_str("\\X0\\")?;
            }
        }
    }

    Ok(())
}

/// Write a single attribute value
pub fn write_attribute<W: Write>(out: &mut W, value: &AttributeValue) -> fmt::Result {
    match value {
        AttributeValue::Null => out.write_char('$'),
        AttributeValue::String(s) => {
            out.write_char('\'')?;
            write_escaped(out, s)?;
            out.write_char('\'')
        }
        AttributeValue::Integer(i) => write!(out, "{}", i),
        AttributeValue::Real(f) => write_real(out, *f),
        AttributeValue::Enumeration(token) => out.write_str(token),
        AttributeValue::Reference(id) => write!(out, "#{}", id),
        AttributeValue::List(items) => {
            out.write_char('(')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write_attribute(out, item)?;
            }
            out.write_char(')')
        }
    }
}

/// Write a full record line without the trailing newline:
/// `#12=IFCDIRECTION((0.,0.,1.));`
pub fn write_record<W: Write>(out: &mut W, record: &Record) -> fmt::Result {
    write!(out, "#{}={}(", record.id, record.keyword)?;
    for (i, attr) in record.attributes.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write_attribute(out, attr)?;
    }
    out.write_str(");")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;

    fn encode(value: &AttributeValue) -> String {
        let mut out = String::new();
        write_attribute(&mut out, value).unwrap();
        out
    }

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(0.0), "0.");
        assert_eq!(format_real(-0.0), "0.");
        assert_eq!(format_real(1.0), "1.");
        assert_eq!(format_real(-200.0), "-200.");
        assert_eq!(format_real(3.14), "3.14");
        assert_eq!(format_real(-2.5), "-2.5");
        assert_eq!(format_real(0.00001), "0.00001");
        assert_eq!(format_real(6.123233995736766e-17), "0.");
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("hello"), "hello");
        assert_eq!(escape_string("it's"), "it''s");
        assert_eq!(escape_string("a\\b"), "a\\\\b");
        assert_eq!(escape_string("C1\u{00e4}"), "C1\\X2\\00E4\\X0\\");
        assert_eq!(escape_string("\u{67f1}\u{6881}"), "\\X2\\67F16881\\X0\\");
        assert_eq!(escape_string("a\u{1F600}b"), "a\\X4\\0001F600\\X0\\b");
        assert_eq!(escape_string("line\nbreak"), "line\\X\\0Abreak");
    }

    #[test]
    fn test_write_attributes() {
        assert_eq!(encode(&AttributeValue::Null), "$");
        assert_eq!(encode(&AttributeValue::Integer(3)), "3");
        assert_eq!(encode(&AttributeValue::Reference(RecordId(42))), "#42");
        assert_eq!(encode(&AttributeValue::enumeration("AREA")), ".AREA.");
        assert_eq!(
            encode(&AttributeValue::List(vec![
                AttributeValue::reals(&[0.0, 0.0, 1.0]),
                AttributeValue::String("O'Neil".to_string()),
            ])),
            "((0.,0.,1.),'O''Neil')"
        );
        assert_eq!(encode(&AttributeValue::List(vec![])), "()");
    }

    #[test]
    fn test_write_record() {
        let record = Record {
            id: RecordId(7),
            keyword: "IFCDIRECTION".to_string(),
            attributes: smallvec::smallvec![AttributeValue::reals(&[1.0, 0.0, 0.0])],
        };
        let mut out = String::new();
        write_record(&mut out, &record).unwrap();
        assert_eq!(out, "#7=IFCDIRECTION((1.,0.,0.));");
    }
}
