use crate::error::{Result, TableError};
use crate::merge::split_in_place;
use crate::section::new_row_width;
use crate::serialize::rebuild;
use crate::table::SectionName;
use crate::virtual_table::{VCell, VRow, VirtualTable};

/// Which side of a reference cell a new row or column goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

/// Insert an empty row at `row_index` (clamped to the section length).
///
/// The new row is as wide as the row it displaces (or the first row when
/// appending), counting only cells that start in that row. Spans from rows
/// above that reach the insertion point grow by one to cover it.
pub fn insert_row(vtable: &VirtualTable, section: SectionName, row_index: usize) -> VirtualTable {
    let mut next = vtable.clone();
    let rows = next.section_mut(section);
    let at = row_index.min(rows.len());

    let width = match rows.get(row_index).or_else(|| rows.first()) {
        Some(template) => template.occupied_width(),
        None => new_row_width(vtable),
    };

    for (r, row) in rows.iter_mut().enumerate().take(at) {
        for cell in row.cells.iter_mut().filter(|c| c.is_live() && c.row_span > 1) {
            if r + cell.row_span > at {
                cell.row_span += 1;
            }
        }
    }

    let tag = section.default_tag();
    let cells = (0..width).map(|v_col| VCell::empty(tag, section, at, v_col)).collect();
    rows.insert(at, VRow { cells });

    log::debug!("inserted {section} row at {at} ({width} cell(s))");
    rebuild(&next)
}

/// Insert a row next to a cell, stepping past its row span when inserting after.
pub fn insert_row_at_cell(vtable: &VirtualTable, cell: &VCell, placement: Placement) -> VirtualTable {
    let row_index = match placement {
        Placement::Before => cell.row_index,
        Placement::After => cell.last_row() + 1,
    };
    insert_row(vtable, cell.section_name, row_index)
}

/// Remove a row.
///
/// Row-spanning cells that start in the row are split first so their other
/// rows keep a cell of their own. Spans reaching down through the row from
/// above shrink by one.
pub fn delete_row(vtable: &VirtualTable, section: SectionName, row_index: usize) -> Result<VirtualTable> {
    let rows = vtable.row_count(section);
    if row_index >= rows {
        return Err(TableError::RowOutOfRange { section, row: row_index, rows });
    }

    let mut next = vtable.clone();
    loop {
        let anchor = next.section(section)[row_index]
            .live_cells()
            .find(|c| c.row_span > 1)
            .map(VCell::position);
        let Some(pos) = anchor else { break };
        split_in_place(&mut next, pos)?;
    }

    let rows = next.section_mut(section);
    for (r, row) in rows.iter_mut().enumerate().take(row_index) {
        for cell in row.cells.iter_mut().filter(|c| c.is_live()) {
            if r + cell.row_span > row_index {
                cell.row_span -= 1;
            }
        }
    }
    rows.remove(row_index);

    log::debug!("deleted {section} row {row_index}");
    Ok(rebuild(&next))
}

/// Whether deleting a row would leave `section` empty while another
/// section still has rows. Hosts use this to ask before removing the last
/// row; the core never refuses on its own.
pub fn would_empty_section(vtable: &VirtualTable, section: SectionName) -> bool {
    vtable.row_count(section) == 1
        && SectionName::ALL
            .iter()
            .any(|&other| other != section && vtable.row_count(other) > 0)
}
