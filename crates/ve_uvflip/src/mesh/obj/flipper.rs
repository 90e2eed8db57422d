use std::num;

use log::debug;

use super::{float_text, meta::Layout, FlipError};

const TEXCOORD_MARKER: &str = "vt";
// index of the V component when splitting on single spaces
const V_FIELD: usize = 2;
// fixed columns of the `columns` layout
const PREFIX_COLUMNS: usize = 12;
const SUFFIX_COLUMN: usize = 19;
const V_WIDTH: usize = 7;
const DEFAULT_DECIMALS: usize = 6;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("Texture coordinate has no V component.")]
    MissingField,
    #[error("Failed to parse float.")]
    ParseFloat(#[from] num::ParseFloatError),
}

/// Summary of a single pass over a model
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlipReport {
    pub lines: usize,
    pub flipped: usize,
    /// Texture coordinates whose fields don't sit in the fixed columns
    pub misaligned: usize,
}

#[derive(Debug, PartialEq)]
pub(crate) struct FlippedLine {
    pub(crate) text: String,
    pub(crate) misaligned: bool,
}

/// Flips the V component of every texture coordinate in `text`.
/// Every other line is copied unchanged, terminators included.
pub fn flip_text(text: &str, layout: Layout) -> Result<(String, FlipReport), FlipError> {
    let mut output = String::with_capacity(text.len());
    let mut report = FlipReport::default();

    for (index, line) in split_lines(text).into_iter().enumerate() {
        report.lines += 1;

        let flipped = flip_line(line, layout).map_err(|source| FlipError::Record {
            line: index + 1,
            source,
        })?;

        match flipped {
            Some(flipped) => {
                debug!("Flipped: {:?} -> {:?}", line, flipped.text);
                report.flipped += 1;
                if flipped.misaligned {
                    report.misaligned += 1;
                }
                output.push_str(&flipped.text);
            }
            None => output.push_str(line),
        }
    }

    Ok((output, report))
}

// returns `None` for lines which are not texture coordinates
pub(crate) fn flip_line(line: &str, layout: Layout) -> Result<Option<FlippedLine>, RecordError> {
    if !line.starts_with(TEXCOORD_MARKER) {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(' ').collect();
    let v_text = fields.get(V_FIELD).ok_or(RecordError::MissingField)?;
    let v: f64 = v_text.trim().parse()?;

    let misaligned = is_misaligned(&fields);
    let text = match layout {
        Layout::Columns => flip_columns(line, v),
        Layout::Fields => flip_fields(line, v)?,
    };

    Ok(Some(FlippedLine { text, misaligned }))
}

fn flip_columns(line: &str, v: f64) -> String {
    let rendered: String = float_text::shortest_repr(1.0 - v)
        .chars()
        .take(V_WIDTH)
        .collect();
    let prefix = &line[..char_offset(line, PREFIX_COLUMNS)];
    let suffix = &line[char_offset(line, SUFFIX_COLUMN)..];

    format!("{}{}{}", prefix, rendered, suffix)
}

fn flip_fields(line: &str, v: f64) -> Result<String, RecordError> {
    let (body, terminator) = split_terminator(line);
    let mut fields: Vec<String> = body.split(' ').map(String::from).collect();
    let field = fields.get_mut(V_FIELD).ok_or(RecordError::MissingField)?;

    *field = match decimals(field) {
        Some(decimals) => format!("{:.*}", decimals, 1.0 - v),
        None => float_text::shortest_repr(1.0 - v),
    };

    Ok(format!("{}{}", fields.join(" "), terminator))
}

// number of decimal places to render the flipped value with;
// `None` for scientific notation and special values
fn decimals(field: &str) -> Option<usize> {
    let field = field.trim();
    if !field.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+')) {
        return None;
    }

    Some(match field.split_once('.') {
        Some((_, fraction)) => fraction.len(),
        None => DEFAULT_DECIMALS,
    })
}

// the fixed columns hold when marker and U take exactly 12 characters and V exactly 7
fn is_misaligned(fields: &[&str]) -> bool {
    let prefix_len: usize = fields[..V_FIELD].iter().map(|f| f.chars().count() + 1).sum();
    let v_len = split_terminator(fields[V_FIELD]).0.chars().count();

    prefix_len != PREFIX_COLUMNS || v_len != V_WIDTH
}

// lines end after `\n`, `\r\n` or a lone `\r`; terminators stay attached
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if byte == b'\n' || (byte == b'\r' && bytes.get(i + 1) != Some(&b'\n')) {
            lines.push(&text[start..=i]);
            start = i + 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

fn split_terminator(line: &str) -> (&str, &str) {
    let body = line.trim_end_matches(['\r', '\n']);
    line.split_at(body.len())
}

// byte offset of the n-th character, clamped to the end of the line
fn char_offset(line: &str, n: usize) -> usize {
    line.char_indices().nth(n).map_or(line.len(), |(i, _)| i)
}

#[cfg(test)]
mod test {
    use super::*;

    fn flip(line: &str, layout: Layout) -> Result<Option<String>, RecordError> {
        Ok(flip_line(line, layout)?.map(|flipped| flipped.text))
    }

    #[test]
    fn test_passthrough() -> Result<(), RecordError> {
        for line in [
            "v 1.0 2.0 3.0\n",
            "vn 0.000000 1.000000 0.000000\n",
            "f 1/1/1 2/2/1 3/3/1\n",
            "# vt 0.1 0.2\n",
            "\n",
            "",
            "usemtl Scene_-_Root\n",
        ] {
            assert_eq!(flip_line(line, Layout::Columns)?, None);
            assert_eq!(flip_line(line, Layout::Fields)?, None);
        }

        Ok(())
    }

    #[test]
    fn test_columns() -> Result<(), RecordError> {
        // V field wider than the fixed columns keeps its last character
        assert_eq!(
            flip("vt 0.250000 0.750000\n", Layout::Columns)?,
            Some("vt 0.250000 0.250\n".into())
        );
        assert_eq!(
            flip("vt 0.250000 0.75000\n", Layout::Columns)?,
            Some("vt 0.250000 0.25\n".into())
        );
        assert_eq!(
            flip("vt 0.500000 0.37500\n", Layout::Columns)?,
            Some("vt 0.500000 0.625\n".into())
        );
        assert_eq!(
            flip("vt 0.500000 0.80000\n", Layout::Columns)?,
            Some("vt 0.500000 0.19999\n".into())
        );
        assert_eq!(
            flip("vt 0.500000 0.00000\n", Layout::Columns)?,
            Some("vt 0.500000 1.0\n".into())
        );
        assert_eq!(
            flip("vt 0.500000 0.50000 0.0000\n", Layout::Columns)?,
            Some("vt 0.500000 0.5 0.0000\n".into())
        );

        Ok(())
    }

    #[test]
    fn test_columns_without_terminator() -> Result<(), RecordError> {
        assert_eq!(
            flip("vt 0.250000 0.75000", Layout::Columns)?,
            Some("vt 0.250000 0.25".into())
        );
        assert_eq!(
            flip("vt 0.250000 0.75000\r\n", Layout::Columns)?,
            Some("vt 0.250000 0.25\r\n".into())
        );

        Ok(())
    }

    #[test]
    fn test_columns_short_line() -> Result<(), RecordError> {
        // shorter than the prefix: the whole line is kept and the value appended
        assert_eq!(
            flip("vt 0.5 0.5\n", Layout::Columns)?,
            Some("vt 0.5 0.5\n0.5".into())
        );
        assert_eq!(
            flip("vt 0.5000 0.75", Layout::Columns)?,
            Some("vt 0.5000 0.0.25".into())
        );

        Ok(())
    }

    #[test]
    fn test_fields() -> Result<(), RecordError> {
        assert_eq!(
            flip("vt 0.250000 0.750000\n", Layout::Fields)?,
            Some("vt 0.250000 0.250000\n".into())
        );
        assert_eq!(
            flip("vt 0.5 0.8 0.0\n", Layout::Fields)?,
            Some("vt 0.5 0.2 0.0\n".into())
        );
        assert_eq!(
            flip("vt 0.1 1\r\n", Layout::Fields)?,
            Some("vt 0.1 0.000000\r\n".into())
        );
        assert_eq!(
            flip("vt -0.25 2.5e-1", Layout::Fields)?,
            Some("vt -0.25 0.75".into())
        );

        Ok(())
    }

    #[test]
    fn test_fields_double_flip() -> Result<(), RecordError> {
        let line = "vt 0.123456 0.654321\n";
        let once = flip(line, Layout::Fields)?.unwrap();
        assert_eq!(once, "vt 0.123456 0.345679\n");
        assert_eq!(flip(&once, Layout::Fields)?, Some(line.into()));

        Ok(())
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            flip("vt 0.5\n", Layout::Columns),
            Err(RecordError::MissingField)
        );
        assert_eq!(flip("vt\n", Layout::Fields), Err(RecordError::MissingField));
        assert!(matches!(
            flip("vt 0.5 abc\n", Layout::Columns),
            Err(RecordError::ParseFloat(_))
        ));
        assert!(matches!(
            flip("vt 0.5 \n", Layout::Fields),
            Err(RecordError::ParseFloat(_))
        ));
    }

    #[test]
    fn test_misaligned() -> Result<(), RecordError> {
        let aligned = flip_line("vt 0.250000 0.75000\n", Layout::Columns)?.unwrap();
        assert!(!aligned.misaligned);

        let wide = flip_line("vt 0.250000 0.750000\n", Layout::Columns)?.unwrap();
        assert!(wide.misaligned);

        let negative = flip_line("vt -0.250000 0.75000\n", Layout::Fields)?.unwrap();
        assert!(negative.misaligned);

        Ok(())
    }

    #[test]
    fn test_flip_text() -> Result<(), FlipError> {
        let input = "# model\nv 1.0 2.0 3.0\nvt 0.250000 0.75000\nvn 0.0 1.0 0.0\nvt 0.500000 0.37500";
        let (output, report) = flip_text(input, Layout::Columns)?;

        assert_eq!(
            output,
            "# model\nv 1.0 2.0 3.0\nvt 0.250000 0.25\nvn 0.0 1.0 0.0\nvt 0.500000 0.625"
        );
        assert_eq!(
            report,
            FlipReport {
                lines: 5,
                flipped: 2,
                misaligned: 0,
            }
        );

        Ok(())
    }

    #[test]
    fn test_flip_text_reports_line() {
        let input = "v 1.0 2.0 3.0\nvt 0.5\n";

        match flip_text(input, Layout::Columns) {
            Err(FlipError::Record { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(source, RecordError::MissingField);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a\n", "b\r\n", "c\r", "d"]);
        assert_eq!(split_lines("a\n\n"), vec!["a\n", "\n"]);
        assert_eq!(split_lines("\r"), vec!["\r"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_flip_text_carriage_returns() -> Result<(), FlipError> {
        let input = "v 1.0 2.0 3.0\rvt 0.250000 0.75000\rvt 0.500000 0.37500\r";
        let (output, report) = flip_text(input, Layout::Columns)?;

        assert_eq!(output, "v 1.0 2.0 3.0\rvt 0.250000 0.25\rvt 0.500000 0.625\r");
        assert_eq!(report.lines, 3);
        assert_eq!(report.flipped, 2);

        Ok(())
    }

    #[test]
    fn test_flip_text_empty() -> Result<(), FlipError> {
        assert_eq!(flip_text("", Layout::Columns)?, (String::new(), FlipReport::default()));
        Ok(())
    }
}
