//! Source position helpers shared by the extractor, rules and engine.
//!
//! sqlparser reports 1-based line/column locations counted in characters;
//! issues carry byte offsets into the SQL text. These helpers convert between
//! the two.

use crate::types::Span;

/// Calculates the byte offset for a 1-based line and column in SQL text.
pub fn line_col_to_offset(sql: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 || column == 0 {
        return None;
    }

    let bytes = sql.as_bytes();
    let mut current_line = 1;
    let mut offset = 0;

    while current_line < line {
        let remaining = bytes.get(offset..)?;
        let newline_pos = remaining.iter().position(|&b| b == b'\n')?;
        offset += newline_pos + 1;
        current_line += 1;
    }

    let line_start = offset;
    let remaining = bytes.get(line_start..)?;
    let line_len = remaining
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(remaining.len());
    let line_end = line_start + line_len;
    let line_slice = &sql[line_start..line_end];

    let mut current_column = 1;
    for (rel_offset, _) in line_slice.char_indices() {
        if current_column == column {
            return Some(line_start + rel_offset);
        }
        current_column += 1;
    }

    if column == current_column {
        return Some(line_end);
    }

    None
}

/// Converts a sqlparser token span into a byte range of `sql`.
///
/// Returns `None` for empty spans (sqlparser uses line 0 for "unknown").
pub fn token_span_to_offsets(sql: &str, span: &sqlparser::tokenizer::Span) -> Option<Span> {
    let start = line_col_to_offset(sql, span.start.line as usize, span.start.column as usize)?;
    let end = line_col_to_offset(sql, span.end.line as usize, span.end.column as usize)?;
    (end >= start).then(|| Span::new(start, end))
}

/// Returns the 1-based line containing `offset`.
pub fn offset_to_line(sql: &str, offset: usize) -> usize {
    1 + sql
        .as_bytes()
        .iter()
        .take(offset.min(sql.len()))
        .filter(|byte| **byte == b'\n')
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::tokenizer::{Location, Span as TokenSpan};

    #[test]
    fn line_col_to_offset_first_line() {
        assert_eq!(line_col_to_offset("SELECT a FROM foo", 1, 8), Some(7));
    }

    #[test]
    fn line_col_to_offset_later_line() {
        let sql = "SELECT\n  foo.a\nFROM foo";
        assert_eq!(line_col_to_offset(sql, 2, 3), Some(9));
    }

    #[test]
    fn line_col_to_offset_counts_characters_not_bytes() {
        let sql = "SELECT 'é', b FROM foo";
        // 'b' is the 13th character but the 14th byte.
        assert_eq!(line_col_to_offset(sql, 1, 13), Some(13));
    }

    #[test]
    fn line_col_to_offset_rejects_zero_and_out_of_range() {
        assert_eq!(line_col_to_offset("SELECT 1", 0, 1), None);
        assert_eq!(line_col_to_offset("SELECT 1", 3, 1), None);
    }

    #[test]
    fn token_span_to_offsets_empty_span_is_none() {
        let span = TokenSpan::empty();
        assert_eq!(token_span_to_offsets("SELECT 1", &span), None);
    }

    #[test]
    fn token_span_to_offsets_round_trips_identifier() {
        let sql = "SELECT foo.b FROM foo";
        let span = TokenSpan::new(Location::new(1, 8), Location::new(1, 13));
        let offsets = token_span_to_offsets(sql, &span).unwrap();
        assert_eq!(&sql[offsets.start..offsets.end], "foo.b");
    }

    #[test]
    fn offset_to_line_counts_newlines() {
        let sql = "SELECT a\nFROM foo\nWHERE b";
        assert_eq!(offset_to_line(sql, 0), 1);
        assert_eq!(offset_to_line(sql, 9), 2);
        assert_eq!(offset_to_line(sql, 18), 3);
    }
}
