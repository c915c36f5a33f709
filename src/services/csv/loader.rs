use crate::error::AppError;

use super::types::{Cell, Table};

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Parse an uploaded CSV buffer into a [`Table`].
///
/// The separator is sniffed from the first line; when sniffing fails, or the
/// sniffed separator produces a parse error, the buffer is re-read once with
/// a plain comma. A second failure surfaces as [`AppError::CsvParse`].
pub fn load_table(data: &[u8]) -> Result<Table, AppError> {
    if let Some(delimiter) = detect_delimiter(data) {
        match parse_with_delimiter(data, delimiter) {
            Ok(table) => return Ok(table),
            Err(err) => {
                tracing::warn!(
                    "parse with detected delimiter {:?} failed, retrying with comma: {}",
                    delimiter as char,
                    err
                );
            }
        }
    }
    parse_with_delimiter(data, b',')
}

/// Pick the most frequent candidate separator on the first line. Comma wins
/// ties; no candidate at all means detection failed.
fn detect_delimiter(data: &[u8]) -> Option<u8> {
    let first_line = data.split(|&byte| byte == b'\n').next()?;

    let mut best: Option<(u8, usize)> = None;
    for candidate in DELIMITER_CANDIDATES {
        let count = first_line.iter().filter(|&&byte| byte == candidate).count();
        if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((candidate, count));
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn parse_with_delimiter(data: &[u8], delimiter: u8) -> Result<Table, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(data);

    let columns: Vec<String> = reader.headers()?.iter().map(|name| name.to_string()).collect();
    if columns.is_empty() {
        return Err(AppError::CsvParse("no columns found in file".to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::parse).collect());
    }

    Ok(Table { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_separated_file_parses() {
        let table = load_table(b"a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1], vec![Cell::Int(3), Cell::Int(4)]);
    }

    #[test]
    fn semicolon_delimiter_is_detected() {
        let table = load_table(b"name;score\nana;10\nluis;7.5\n").unwrap();
        assert_eq!(table.columns, vec!["name", "score"]);
        assert_eq!(table.rows[1], vec![Cell::Text("luis".to_string()), Cell::Float(7.5)]);
    }

    #[test]
    fn tab_delimiter_is_detected() {
        let table = load_table(b"a\tb\n1\t2\n").unwrap();
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.rows[0], vec![Cell::Int(1), Cell::Int(2)]);
    }

    #[test]
    fn single_column_file_falls_back_to_comma() {
        // No candidate separator on the header line, so detection fails and
        // the comma fallback handles it.
        let table = load_table(b"name\nana\nluis\n").unwrap();
        assert_eq!(table.columns, vec!["name"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn empty_fields_become_nulls() {
        let table = load_table(b"a,b\n,4\nNA,5\n").unwrap();
        assert!(table.rows[0][0].is_null());
        assert!(table.rows[1][0].is_null());
        assert_eq!(table.rows[0][1], Cell::Int(4));
    }

    #[test]
    fn ragged_rows_are_a_parse_error() {
        let result = load_table(b"a,b\n1\n1,2,3\n");
        assert!(matches!(result, Err(AppError::CsvParse(_))));
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        assert!(matches!(load_table(b""), Err(AppError::CsvParse(_))));
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters() {
        let table = load_table(b"a,b\n\"x,y\",2\n").unwrap();
        assert_eq!(table.rows[0][0], Cell::Text("x,y".to_string()));
    }
}
