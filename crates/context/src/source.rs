// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mapping of tokenizer locations back to byte offsets in the source text

use sqlparser::tokenizer::Location;

/// Converts 1-based (line, column) locations into byte offsets
///
/// Columns count characters, as the tokenizer does. Lookups are cheapest
/// when locations are requested in ascending order; an earlier location
/// rewinds to the start of the text.
pub(crate) struct SourceCursor<'a> {
    sql: &'a str,
    offset: usize,
    line: u64,
    column: u64,
}

impl<'a> SourceCursor<'a> {
    pub(crate) fn new(sql: &'a str) -> Self {
        Self {
            sql,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Byte offset of `location`, clamped to the end of the text
    pub(crate) fn offset(&mut self, location: Location) -> usize {
        // Line 0 marks an empty span
        if location.line == 0 {
            return self.offset;
        }
        let target = (location.line, location.column);
        if target < (self.line, self.column) {
            *self = Self::new(self.sql);
        }
        while (self.line, self.column) < target {
            let Some(ch) = self.sql[self.offset..].chars().next() else {
                break;
            };
            self.offset += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset
    }

    /// Source text between two locations
    pub(crate) fn slice(&mut self, start: Location, end: Location) -> &'a str {
        let from = self.offset(start);
        let to = self.offset(end).max(from);
        &self.sql[from..to]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_follow_lines_and_chars() {
        let sql = "SELECT 'é'\nFROM t;";
        let mut cursor = SourceCursor::new(sql);

        assert_eq!(cursor.offset(Location::new(1, 1)), 0);
        assert_eq!(cursor.offset(Location::new(1, 11)), "SELECT 'é'".len());
        assert_eq!(cursor.offset(Location::new(2, 1)), "SELECT 'é'\n".len());
        assert_eq!(cursor.slice(Location::new(2, 1), Location::new(2, 5)), "FROM");
        // Rewinds for an earlier location
        assert_eq!(cursor.slice(Location::new(1, 8), Location::new(1, 11)), "'é'");
        assert_eq!(cursor.offset(Location::new(9, 1)), sql.len());
    }
}
