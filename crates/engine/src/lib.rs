//! `vtable-engine`: virtual table model for tables with spanning cells.
//!
//! Pure engine crate: converts the sparse, persisted [`Table`] into a dense
//! [`VirtualTable`] grid, applies structural edits (rows, columns, merges,
//! sections) and converts back. No I/O; every operation takes a table value
//! and returns a new one.

pub mod cell;
pub mod columns;
pub mod error;
pub mod merge;
pub mod rows;
pub mod section;
pub mod selection;
pub mod serialize;
pub mod table;
pub mod update;
pub mod virtual_table;

pub use cell::{Cell, CellScope, CellTag, MAX_COL_SPAN, MAX_ROW_SPAN};
pub use columns::{delete_column, insert_column, insert_column_at_cell};
pub use error::TableError;
pub use merge::{merge_cells, split_merged_cell, split_merged_cells, MergeContent};
pub use rows::{delete_row, insert_row, insert_row_at_cell, would_empty_section, Placement};
pub use section::toggle_section;
pub use selection::{
    get_virtual_range, has_merged_cells, is_multi_section_selected, is_rectangle_selected,
    select_column_cells, select_row_cells, to_rectangled_selected_cells, VirtualRange,
};
pub use serialize::to_table_attributes;
pub use table::{Row, SectionName, Table};
pub use update::{update_cells, CellPatch};
pub use virtual_table::{to_virtual_table, CellPosition, VCell, VRow, VirtualTable};
