//! Merging a rectangular selection into one spanning cell, and splitting
//! spanning cells back into 1×1 cells.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::selection::{get_virtual_range, is_multi_section_selected, is_rectangle_selected};
use crate::serialize::rebuild;
use crate::virtual_table::{CellPosition, VCell, VirtualTable};

/// Joins absorbed contents under [`MergeContent::KeepAll`]. Cell content is
/// rich-text markup, so a line break keeps each piece on its own line.
pub const MERGED_CONTENT_SEPARATOR: &str = "<br>";

/// What happens to the content of cells absorbed by a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeContent {
    /// The top-left cell keeps its own content; the rest is discarded.
    KeepFirst,
    /// Non-empty contents are concatenated in row-major order.
    KeepAll,
}

/// Merge a rectangular selection into its top-left cell.
///
/// The selection must hold at least two cells of one section that tile
/// their bounding rectangle. Spanning cells inside it are split first so
/// the new span is laid over plain 1×1 cells.
///
/// The result is not rebuilt: absorbed slots stay in the grid marked
/// `is_merged`, so a row swallowed whole keeps its place until the table
/// is serialized and a later split can refill it.
pub fn merge_cells(vtable: &VirtualTable, selected: &[VCell], content: MergeContent) -> Result<VirtualTable> {
    if !is_rectangle_selected(selected) {
        let reason = if selected.iter().filter(|c| c.is_live()).count() < 2 {
            "select at least two cells"
        } else if is_multi_section_selected(selected) {
            "cells from more than one section"
        } else {
            "selected cells do not form a filled rectangle"
        };
        return Err(TableError::InvalidSelection(reason.to_string()));
    }
    let range = get_virtual_range(selected)
        .ok_or_else(|| TableError::InvalidSelection("empty selection".to_string()))?;
    let section = selected[0].section_name;

    for cell in selected.iter().filter(|c| c.is_live()) {
        let current = vtable
            .cell_at(cell.position())
            .filter(|c| c.is_live())
            .ok_or(TableError::CellNotFound(cell.position()))?;
        if current.row_span != cell.row_span || current.col_span != cell.col_span {
            return Err(TableError::InvalidSelection(
                "selection no longer matches the table".to_string(),
            ));
        }
    }

    let mut next = vtable.clone();
    for cell in selected.iter().filter(|c| c.is_live()) {
        split_in_place(&mut next, cell.position())?;
    }

    let mut absorbed = Vec::new();
    for row in range.min_row..=range.max_row {
        for col in range.min_col..=range.max_col {
            if row == range.min_row && col == range.min_col {
                continue;
            }
            if let Some(cell) = next.cell_mut(CellPosition::new(section, row, col)) {
                absorbed.push(std::mem::take(&mut cell.content));
                cell.is_merged = true;
            }
        }
    }

    let anchor_pos = CellPosition::new(section, range.min_row, range.min_col);
    let anchor = next.cell_mut(anchor_pos).ok_or(TableError::CellNotFound(anchor_pos))?;
    anchor.row_span = range.row_count();
    anchor.col_span = range.col_count();
    if content == MergeContent::KeepAll {
        let pieces: Vec<String> = std::iter::once(std::mem::take(&mut anchor.content))
            .chain(absorbed)
            .filter(|s| !s.is_empty())
            .collect();
        anchor.content = pieces.join(MERGED_CONTENT_SEPARATOR);
    }

    log::debug!(
        "merged {section} rows {}..={} cols {}..={}",
        range.min_row,
        range.max_row,
        range.min_col,
        range.max_col
    );
    next.renumber_columns(section);
    Ok(next)
}

/// Reset a spanning cell to 1×1 and fill the slots it covered with empty
/// cells. A cell without a span comes back unchanged.
pub fn split_merged_cell(vtable: &VirtualTable, cell: &VCell) -> Result<VirtualTable> {
    let mut next = vtable.clone();
    split_in_place(&mut next, cell.position())?;
    Ok(rebuild(&next))
}

/// [`split_merged_cell`] for every spanning cell of a selection.
pub fn split_merged_cells(vtable: &VirtualTable, cells: &[VCell]) -> Result<VirtualTable> {
    let mut next = vtable.clone();
    for cell in cells.iter().filter(|c| c.is_live()) {
        split_in_place(&mut next, cell.position())?;
    }
    Ok(rebuild(&next))
}

/// Split on the dense grid without rebuilding. Only slots inside the span
/// change, so positions of every other cell stay valid.
pub(crate) fn split_in_place(vtable: &mut VirtualTable, pos: CellPosition) -> Result<()> {
    let anchor = vtable
        .cell_at(pos)
        .filter(|c| c.is_live())
        .cloned()
        .ok_or(TableError::CellNotFound(pos))?;
    if !anchor.has_span() {
        return Ok(());
    }

    for row in anchor.row_index..=anchor.last_row() {
        for col in anchor.v_col_index..=anchor.last_col() {
            let Some(slot) = vtable.cell_mut(CellPosition::new(pos.section, row, col)) else {
                continue;
            };
            if row == anchor.row_index && col == anchor.v_col_index {
                slot.row_span = 1;
                slot.col_span = 1;
            } else {
                *slot = split_fragment(&anchor, row, col);
            }
        }
    }
    log::debug!(
        "split {} cell at row {} col {} ({}x{})",
        pos.section,
        pos.row,
        pos.v_col,
        anchor.row_span,
        anchor.col_span
    );
    Ok(())
}

/// Empty cell left behind by a split. Presentation carries over from the
/// anchor; identity (`id`, `headers`, `scope`) does not.
fn split_fragment(anchor: &VCell, row: usize, v_col: usize) -> VCell {
    VCell {
        content: String::new(),
        styles: anchor.styles.clone(),
        class_name: anchor.class_name.clone(),
        ..VCell::empty(anchor.tag, anchor.section_name, row, v_col)
    }
}
