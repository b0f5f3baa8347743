//! Selection queries over the dense grid.
//!
//! Selected cells are always [`VCell`]s taken from a [`VirtualTable`]; their
//! extents include their own spans.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::table::SectionName;
use crate::virtual_table::{VCell, VirtualTable};

/// Inclusive bounding box in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualRange {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl VirtualRange {
    /// Area covered by a single cell, span included.
    pub fn of(cell: &VCell) -> Self {
        Self {
            min_row: cell.row_index,
            max_row: cell.last_row(),
            min_col: cell.v_col_index,
            max_col: cell.last_col(),
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min_row: self.min_row.min(other.min_row),
            max_row: self.max_row.max(other.max_row),
            min_col: self.min_col.min(other.min_col),
            max_col: self.max_col.max(other.max_col),
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.min_row && row <= self.max_row && col >= self.min_col && col <= self.max_col
    }

    /// True when the cell's span overlaps this range at all.
    pub fn intersects(&self, cell: &VCell) -> bool {
        cell.row_index <= self.max_row
            && cell.last_row() >= self.min_row
            && cell.v_col_index <= self.max_col
            && cell.last_col() >= self.min_col
    }

    pub fn row_count(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    pub fn col_count(&self) -> usize {
        self.max_col - self.min_col + 1
    }
}

/// Bounding box of a selection, accounting for each cell's span.
pub fn get_virtual_range(cells: &[VCell]) -> Option<VirtualRange> {
    cells.iter().map(VirtualRange::of).reduce(VirtualRange::union)
}

pub fn is_multi_section_selected(cells: &[VCell]) -> bool {
    let sections: BTreeSet<SectionName> = cells.iter().map(|c| c.section_name).collect();
    sections.len() > 1
}

/// Whether any selected cell already spans more than one slot.
pub fn has_merged_cells(cells: &[VCell]) -> bool {
    cells.iter().any(VCell::has_span)
}

/// True when the selection holds at least two cells of one section whose
/// spans tile their bounding rectangle with no holes.
pub fn is_rectangle_selected(cells: &[VCell]) -> bool {
    let mut seen = BTreeSet::new();
    let selected: Vec<VCell> = cells
        .iter()
        .filter(|c| c.is_live() && seen.insert(c.position()))
        .cloned()
        .collect();

    if selected.len() < 2 || is_multi_section_selected(&selected) {
        return false;
    }
    let Some(range) = get_virtual_range(&selected) else {
        return false;
    };

    let mut filled = vec![vec![false; range.col_count()]; range.row_count()];
    for cell in &selected {
        for r in cell.row_index..=cell.last_row() {
            for c in cell.v_col_index..=cell.last_col() {
                filled[r - range.min_row][c - range.min_col] = true;
            }
        }
    }
    filled.iter().all(|row| row.iter().all(|&slot| slot))
}

/// Round a drag selection up to a rectangle that never cuts through a span.
///
/// Starts from the box around both endpoints and keeps absorbing every cell
/// whose span overlaps the box until nothing changes. Each pass either grows
/// the box or stops, so the loop ends within `rows + cols` passes.
pub fn to_rectangled_selected_cells(vtable: &VirtualTable, from: &VCell, to: &VCell) -> Result<Vec<VCell>> {
    let section = from.section_name;
    if to.section_name != section {
        return Err(TableError::InvalidSelection(format!(
            "drag selection crosses sections ({} and {})",
            from.section_name, to.section_name
        )));
    }

    let cells: Vec<&VCell> = vtable.live_cells(section).collect();
    let mut range = VirtualRange::of(from).union(VirtualRange::of(to));
    let max_passes = vtable.row_count(section) + vtable.col_count(section) + 1;

    for _ in 0..max_passes {
        let grown = cells
            .iter()
            .filter(|cell| range.intersects(cell))
            .fold(range, |acc, cell| acc.union(VirtualRange::of(cell)));
        if grown == range {
            break;
        }
        range = grown;
    }

    Ok(cells
        .into_iter()
        .filter(|c| range.contains(c.row_index, c.v_col_index))
        .cloned()
        .collect())
}

/// Every live cell that occupies part of a row.
pub fn select_row_cells(vtable: &VirtualTable, section: SectionName, row: usize) -> Vec<VCell> {
    vtable
        .live_cells(section)
        .filter(|c| row >= c.row_index && row <= c.last_row())
        .cloned()
        .collect()
}

/// Every live cell, in every section, that occupies part of a virtual column.
pub fn select_column_cells(vtable: &VirtualTable, v_col: usize) -> Vec<VCell> {
    SectionName::ALL
        .iter()
        .flat_map(|&section| vtable.live_cells(section))
        .filter(|c| v_col >= c.v_col_index && v_col <= c.last_col())
        .cloned()
        .collect()
}
