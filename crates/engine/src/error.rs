use std::fmt;

use crate::table::SectionName;
use crate::virtual_table::CellPosition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Selection cannot be merged (too few cells, several sections, holes).
    InvalidSelection(String),
    /// Row index past the end of a section.
    RowOutOfRange { section: SectionName, row: usize, rows: usize },
    /// Virtual column index past the widest section.
    ColumnOutOfRange { col: usize, cols: usize },
    /// No live cell at the given position.
    CellNotFound(CellPosition),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSelection(reason) => write!(f, "invalid selection: {reason}"),
            Self::RowOutOfRange { section, row, rows } => {
                write!(f, "row {row} out of range for {section} ({rows} row(s))")
            }
            Self::ColumnOutOfRange { col, cols } => {
                write!(f, "column {col} out of range ({cols} column(s))")
            }
            Self::CellNotFound(pos) => {
                write!(f, "no cell at {} row {}, column {}", pos.section, pos.row, pos.v_col)
            }
        }
    }
}

impl std::error::Error for TableError {}

pub type Result<T> = std::result::Result<T, TableError>;
