//! Dense working representation of a table.
//!
//! Every slot of every section grid holds a [`VCell`]: either a real cell
//! (the span anchor) or a placeholder marked `is_delete` that stands in for a
//! slot covered by another cell's span.

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellScope, CellTag, MAX_COL_SPAN, MAX_ROW_SPAN};
use crate::table::{Row, SectionName, Table};

/// Address of a slot in the dense grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPosition {
    pub section: SectionName,
    pub row: usize,
    pub v_col: usize,
}

impl CellPosition {
    pub fn new(section: SectionName, row: usize, v_col: usize) -> Self {
        Self { section, row, v_col }
    }
}

/// A cell placed in the dense grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VCell {
    pub content: String,
    pub tag: CellTag,
    pub styles: Option<String>,
    pub class_name: Option<String>,
    pub id: Option<String>,
    pub headers: Option<String>,
    pub scope: Option<CellScope>,
    pub row_span: usize,
    pub col_span: usize,
    pub section_name: SectionName,
    pub row_index: usize,
    /// Position within the sparse row. Only meaningful for live cells.
    pub col_index: usize,
    pub v_col_index: usize,
    /// Slot is covered by another cell's span; never serialized.
    pub is_delete: bool,
    /// Slot was absorbed by a merge; never serialized.
    pub is_merged: bool,
}

impl VCell {
    pub fn from_cell(cell: &Cell, section: SectionName, row_index: usize, col_index: usize, v_col_index: usize) -> Self {
        Self {
            content: cell.content.clone(),
            tag: cell.tag,
            styles: cell.styles.clone(),
            class_name: cell.class_name.clone(),
            id: cell.id.clone(),
            headers: cell.headers.clone(),
            scope: cell.scope,
            row_span: cell.row_span(),
            col_span: cell.col_span(),
            section_name: section,
            row_index,
            col_index,
            v_col_index,
            is_delete: false,
            is_merged: false,
        }
    }

    /// An empty, live 1×1 cell.
    pub fn empty(tag: CellTag, section: SectionName, row_index: usize, v_col_index: usize) -> Self {
        Self::from_cell(&Cell::empty(tag), section, row_index, 0, v_col_index)
    }

    fn placeholder(anchor: &VCell, row_index: usize, v_col_index: usize) -> Self {
        Self {
            content: String::new(),
            tag: anchor.tag,
            styles: None,
            class_name: None,
            id: None,
            headers: None,
            scope: None,
            row_span: 1,
            col_span: 1,
            section_name: anchor.section_name,
            row_index,
            col_index: anchor.col_index,
            v_col_index,
            is_delete: true,
            is_merged: false,
        }
    }

    /// Back to the persisted shape (spans of 1 become absent).
    pub fn to_cell(&self) -> Cell {
        Cell {
            content: self.content.clone(),
            tag: self.tag,
            styles: self.styles.clone(),
            class_name: self.class_name.clone(),
            id: self.id.clone(),
            headers: self.headers.clone(),
            scope: self.scope,
            row_span: None,
            col_span: None,
        }
        .with_span(self.row_span, self.col_span)
    }

    pub fn position(&self) -> CellPosition {
        CellPosition::new(self.section_name, self.row_index, self.v_col_index)
    }

    /// Neither a span placeholder nor absorbed by a merge.
    pub fn is_live(&self) -> bool {
        !self.is_delete && !self.is_merged
    }

    pub fn has_span(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    /// Last grid row covered by this cell's span.
    pub fn last_row(&self) -> usize {
        self.row_index + self.row_span.max(1) - 1
    }

    /// Last grid column covered by this cell's span.
    pub fn last_col(&self) -> usize {
        self.v_col_index + self.col_span.max(1) - 1
    }

    pub fn covers(&self, row: usize, v_col: usize) -> bool {
        row >= self.row_index && row <= self.last_row() && v_col >= self.v_col_index && v_col <= self.last_col()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VRow {
    pub cells: Vec<VCell>,
}

impl VRow {
    /// Sum of `col_span` over the row's live cells.
    pub fn occupied_width(&self) -> usize {
        self.live_cells().map(|c| c.col_span).sum()
    }

    pub fn live_cells(&self) -> impl Iterator<Item = &VCell> {
        self.cells.iter().filter(|c| c.is_live())
    }
}

/// The dense working table. Built on demand, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualTable {
    pub head: Vec<VRow>,
    pub body: Vec<VRow>,
    pub foot: Vec<VRow>,
}

impl VirtualTable {
    pub fn section(&self, name: SectionName) -> &[VRow] {
        match name {
            SectionName::Head => &self.head,
            SectionName::Body => &self.body,
            SectionName::Foot => &self.foot,
        }
    }

    pub fn section_mut(&mut self, name: SectionName) -> &mut Vec<VRow> {
        match name {
            SectionName::Head => &mut self.head,
            SectionName::Body => &mut self.body,
            SectionName::Foot => &mut self.foot,
        }
    }

    pub fn row_count(&self, section: SectionName) -> usize {
        self.section(section).len()
    }

    /// Virtual column count of a section (0 when empty).
    pub fn col_count(&self, section: SectionName) -> usize {
        self.section(section).first().map_or(0, |row| row.cells.len())
    }

    /// Slot at a position; may be a placeholder.
    pub fn cell_at(&self, pos: CellPosition) -> Option<&VCell> {
        self.section(pos.section)
            .get(pos.row)
            .and_then(|row| row.cells.iter().find(|c| c.v_col_index == pos.v_col))
    }

    /// The live cell whose span covers a position.
    pub fn covering_cell(&self, pos: CellPosition) -> Option<&VCell> {
        self.live_cells(pos.section).find(|c| c.covers(pos.row, pos.v_col))
    }

    /// Live cells of a section in row-major order.
    pub fn live_cells(&self, section: SectionName) -> impl Iterator<Item = &VCell> {
        self.section(section).iter().flat_map(VRow::live_cells)
    }

    /// True when the section holds at least one live cell.
    pub fn has_cells(&self, section: SectionName) -> bool {
        self.live_cells(section).next().is_some()
    }

    /// Number of live cells across all sections.
    pub fn leaf_count(&self) -> usize {
        SectionName::ALL.iter().map(|&s| self.live_cells(s).count()).sum()
    }

    /// Recount `col_index` of the live cells of each row in a section.
    pub(crate) fn renumber_columns(&mut self, section: SectionName) {
        for row in self.section_mut(section) {
            for (col_index, cell) in row.cells.iter_mut().filter(|c| c.is_live()).enumerate() {
                cell.col_index = col_index;
            }
        }
    }

    pub(crate) fn cell_mut(&mut self, pos: CellPosition) -> Option<&mut VCell> {
        self.section_mut(pos.section)
            .get_mut(pos.row)
            .and_then(|row| row.cells.iter_mut().find(|c| c.v_col_index == pos.v_col))
    }
}

impl From<&Table> for VirtualTable {
    fn from(table: &Table) -> Self {
        to_virtual_table(table)
    }
}

/// Build the dense grid for every section of a sparse table.
///
/// Malformed span data is tolerated rather than rejected:
/// - slots no cell reaches are filled with empty cells of the section's tag
/// - a cell with no free slot left in its row is dropped
/// - spans above [`MAX_ROW_SPAN`] / [`MAX_COL_SPAN`] are capped
/// - spans running past the grid or into occupied slots are clipped
pub fn to_virtual_table(table: &Table) -> VirtualTable {
    let mut vtable = VirtualTable::default();
    for section in SectionName::ALL {
        *vtable.section_mut(section) = build_section(section, table.section(section));
    }
    vtable
}

fn build_section(section: SectionName, rows: &[Row]) -> Vec<VRow> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let row_count = rows.len();
    let col_count = first
        .cells
        .iter()
        .map(|cell| cell.col_span().min(MAX_COL_SPAN))
        .fold(0, usize::saturating_add);

    let mut grid: Vec<Vec<Option<VCell>>> = vec![vec![None; col_count]; row_count];

    for (row_index, row) in rows.iter().enumerate() {
        for (col_index, cell) in row.cells.iter().enumerate() {
            let Some(v_col) = grid[row_index].iter().position(Option::is_none) else {
                log::warn!(
                    "{section} row {row_index}: no free slot for cell {col_index}, dropping it"
                );
                continue;
            };

            let wanted_rows = cell.row_span().min(MAX_ROW_SPAN);
            let wanted_cols = cell.col_span().min(MAX_COL_SPAN);
            if wanted_rows != cell.row_span() || wanted_cols != cell.col_span() {
                log::warn!(
                    "{section} row {row_index}: span {}x{} capped at {wanted_rows}x{wanted_cols}",
                    cell.row_span(),
                    cell.col_span()
                );
            }

            let free_run = grid[row_index][v_col..].iter().take_while(|s| s.is_none()).count();
            let col_span = wanted_cols.min(free_run);
            let mut row_span = 1;
            while row_span < wanted_rows
                && row_index + row_span < row_count
                && grid[row_index + row_span][v_col..v_col + col_span].iter().all(Option::is_none)
            {
                row_span += 1;
            }
            if col_span != wanted_cols || row_span != wanted_rows {
                log::warn!(
                    "{section} row {row_index}: span {wanted_rows}x{wanted_cols} clipped to {row_span}x{col_span}"
                );
            }

            let mut anchor = VCell::from_cell(cell, section, row_index, col_index, v_col);
            anchor.row_span = row_span;
            anchor.col_span = col_span;

            for r in row_index..row_index + row_span {
                for c in v_col..v_col + col_span {
                    if r != row_index || c != v_col {
                        grid[r][c] = Some(VCell::placeholder(&anchor, r, c));
                    }
                }
            }
            grid[row_index][v_col] = Some(anchor);
        }
    }

    grid.into_iter()
        .enumerate()
        .map(|(row_index, slots)| {
            let mut next_col_index = 0;
            let cells = slots
                .into_iter()
                .enumerate()
                .map(|(v_col, slot)| {
                    let mut cell = slot.unwrap_or_else(|| {
                        log::warn!("{section} row {row_index}: slot {v_col} unfilled, adding empty cell");
                        VCell::empty(section.default_tag(), section, row_index, v_col)
                    });
                    if !cell.is_delete {
                        cell.col_index = next_col_index;
                        next_col_index += 1;
                    }
                    cell
                })
                .collect();
            VRow { cells }
        })
        .collect()
}

/// Maps every slot of a section to the position of the live cell covering it.
pub(crate) fn owner_grid(rows: &[VRow]) -> Vec<Vec<Option<(usize, usize)>>> {
    let col_count = rows.first().map_or(0, |r| r.cells.len());
    let mut owners = vec![vec![None; col_count]; rows.len()];
    for cell in rows.iter().flat_map(VRow::live_cells) {
        for r in cell.row_index..=cell.last_row().min(rows.len().saturating_sub(1)) {
            for c in cell.v_col_index..=cell.last_col().min(col_count.saturating_sub(1)) {
                owners[r][c] = Some((cell.row_index, cell.v_col_index));
            }
        }
    }
    owners
}
