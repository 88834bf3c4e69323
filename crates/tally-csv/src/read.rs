//! Reading uploaded CSV bytes into raw rows.
//!
//! Pipeline:
//!   raw bytes
//!     └─ decode()            → String (UTF-8, else Windows-1252)
//!          └─ detect_delimiter() → u8
//!               └─ csv reader     → Vec<Vec<String>>

use csv::ReaderBuilder;

use crate::Result;

/// Delimiters tried during detection, in tie-break order.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of leading lines inspected when detecting the delimiter.
const SAMPLE_LINES: usize = 20;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode upload bytes. Invalid UTF-8 is assumed to be Windows-1252, which
/// is what spreadsheet exports on Windows produce.
pub(crate) fn decode(input: &[u8]) -> String {
  let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
  match std::str::from_utf8(input) {
    Ok(text) => text.to_owned(),
    Err(_) => {
      let (text, _had_errors) =
        encoding_rs::WINDOWS_1252.decode_without_bom_handling(input);
      text.into_owned()
    }
  }
}

/// Pick the candidate delimiter whose most common field count (above one)
/// covers the most sample lines. Falls back to `,`.
pub fn detect_delimiter(text: &str) -> u8 {
  let sample: String = text
    .lines()
    .take(SAMPLE_LINES)
    .collect::<Vec<_>>()
    .join("\n");

  let mut best = (b',', 0usize);
  for delimiter in CANDIDATE_DELIMITERS {
    let score = consistency_score(&sample, delimiter);
    if score > best.1 {
      best = (delimiter, score);
    }
  }
  best.0
}

fn consistency_score(sample: &str, delimiter: u8) -> usize {
  let mut reader = ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .delimiter(delimiter)
    .from_reader(sample.as_bytes());

  let mut counts: Vec<(usize, usize)> = Vec::new();
  for record in reader.records() {
    // A sample cut mid-quote is not evidence against the delimiter.
    let Ok(record) = record else { break };
    let fields = record.len();
    if fields < 2 {
      continue;
    }
    match counts.iter_mut().find(|(n, _)| *n == fields) {
      Some((_, seen)) => *seen += 1,
      None => counts.push((fields, 1)),
    }
  }
  counts.into_iter().map(|(_, seen)| seen).max().unwrap_or(0)
}

/// Parse `input` into rows of cells. No row is treated as a header, rows may
/// differ in length, and rows with only blank cells are dropped.
pub fn read_rows(input: &[u8]) -> Result<Vec<Vec<String>>> {
  let text = decode(input);
  let delimiter = detect_delimiter(&text);
  tracing::debug!(delimiter = %char::from(delimiter).escape_default(), "detected CSV delimiter");

  let mut reader = ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .delimiter(delimiter)
    .from_reader(text.as_bytes());

  let mut rows = Vec::new();
  for record in reader.records() {
    let record = record?;
    if record.iter().all(|cell| cell.trim().is_empty()) {
      continue;
    }
    rows.push(record.iter().map(str::to_owned).collect());
  }
  Ok(rows)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_comma_separated_rows() {
    let rows = read_rows(b"Name,Email\nAcme,a@x.com\n").unwrap();
    assert_eq!(rows, vec![vec!["Name", "Email"], vec!["Acme", "a@x.com"]]);
  }

  #[test]
  fn detects_semicolons_and_tabs() {
    assert_eq!(detect_delimiter("Name;City\nAcme;Paris\nGlobex;Lyon"), b';');
    assert_eq!(detect_delimiter("Name\tCity\nAcme\tParis"), b'\t');
    assert_eq!(detect_delimiter("Name|City\nAcme|Paris"), b'|');
  }

  #[test]
  fn commas_inside_semicolon_rows_do_not_win() {
    let text = "Name;Address\nAcme;1 Main St, Suite 2\nGlobex;9 Elm St\n";
    assert_eq!(detect_delimiter(text), b';');
  }

  #[test]
  fn single_column_defaults_to_comma() {
    assert_eq!(detect_delimiter("Name\nAcme\nGlobex"), b',');
  }

  #[test]
  fn quoted_fields_keep_embedded_delimiters() {
    let rows = read_rows(b"Name,Notes\n\"Acme, Inc.\",\"line one\nline two\"\n").unwrap();
    assert_eq!(rows[1], vec!["Acme, Inc.", "line one\nline two"]);
  }

  #[test]
  fn ragged_rows_are_accepted() {
    let rows = read_rows(b"a,b,c\nd,e\nf,g,h,i\n").unwrap();
    assert_eq!(rows.iter().map(Vec::len).collect::<Vec<_>>(), [3, 2, 4]);
  }

  #[test]
  fn blank_rows_are_skipped() {
    let rows = read_rows(b"Name,City\n\n , \nAcme,Paris\n").unwrap();
    assert_eq!(rows.len(), 2);
  }

  #[test]
  fn bom_is_stripped() {
    let rows = read_rows(b"\xEF\xBB\xBFName,City\nAcme,Paris\n").unwrap();
    assert_eq!(rows[0][0], "Name");
  }

  #[test]
  fn windows_1252_falls_back() {
    // "Café" with 0xE9 for é.
    let rows = read_rows(b"Name,City\nCaf\xE9,Paris\n").unwrap();
    assert_eq!(rows[1][0], "Caf\u{e9}");
  }
}
