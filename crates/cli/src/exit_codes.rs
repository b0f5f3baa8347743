//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, bad cell ref) |
//! | 3       | Universal        | I/O error (read/write input or output)   |
//! | 4       | Universal        | Input is not valid table JSON            |
//! | 10-19   | table            | Table operation codes                    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use vtable_engine::TableError;

// =============================================================================
// Universal (0-4)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Cannot read input or write output.
pub const EXIT_IO: u8 = 3;

/// Input is not table JSON.
pub const EXIT_PARSE: u8 = 4;

// =============================================================================
// Table (10-19)
// =============================================================================

/// Selection rejected (not a filled rectangle, crosses sections, too small).
pub const EXIT_TABLE_SELECTION: u8 = 10;

/// Row or column index outside the table.
pub const EXIT_TABLE_OUT_OF_RANGE: u8 = 11;

/// Cell reference does not name a cell of the table.
pub const EXIT_TABLE_CELL_NOT_FOUND: u8 = 12;

/// check-rectangle: the cells do not form a rectangle.
/// Like `diff(1)`, this is a result, not a failure; the report is still printed.
pub const EXIT_TABLE_NOT_RECTANGLE: u8 = 13;

/// Deleting the row would leave its section empty (rows.keepOneRow).
pub const EXIT_TABLE_LAST_ROW: u8 = 14;

/// Map a TableError to its exit code.
pub fn table_exit_code(err: &TableError) -> u8 {
    match err {
        TableError::InvalidSelection(_) => EXIT_TABLE_SELECTION,
        TableError::RowOutOfRange { .. } | TableError::ColumnOutOfRange { .. } => EXIT_TABLE_OUT_OF_RANGE,
        TableError::CellNotFound(_) => EXIT_TABLE_CELL_NOT_FOUND,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtable_engine::SectionName;

    #[test]
    fn test_table_codes_in_range() {
        let errors = [
            TableError::InvalidSelection("x".into()),
            TableError::RowOutOfRange { section: SectionName::Body, row: 3, rows: 2 },
            TableError::ColumnOutOfRange { col: 9, cols: 2 },
        ];
        for err in &errors {
            assert!((10..=19).contains(&table_exit_code(err)), "{err}");
        }
    }
}
