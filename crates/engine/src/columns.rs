use crate::error::{Result, TableError};
use crate::merge::split_in_place;
use crate::rows::Placement;
use crate::serialize::rebuild;
use crate::table::SectionName;
use crate::virtual_table::{owner_grid, CellPosition, VCell, VRow, VirtualTable};

/// Insert an empty column at `v_col_index` in every section.
///
/// A cell whose column span straddles the insertion point widens to cover
/// the new column. Every other row gets a new empty cell there, including
/// rows that are only covered at that column by a row span starting exactly
/// at `v_col_index`. Past the last column the new cells are appended.
pub fn insert_column(vtable: &VirtualTable, v_col_index: usize) -> VirtualTable {
    let mut next = vtable.clone();
    for section in SectionName::ALL {
        let rows = vtable.section(section);
        if rows.is_empty() {
            continue;
        }
        let col_count = vtable.col_count(section);
        let owners = owner_grid(rows);
        let tag = section.default_tag();

        let new_rows: Vec<VRow> = rows
            .iter()
            .enumerate()
            .map(|(r, row)| {
                let owner = owners.get(r).and_then(|o| o.get(v_col_index)).copied().flatten();
                let straddled = matches!(owner, Some((_, anchor_col)) if anchor_col < v_col_index);

                let mut cells: Vec<VCell> = row
                    .live_cells()
                    .cloned()
                    .map(|mut cell| {
                        if cell.v_col_index < v_col_index && v_col_index <= cell.last_col() {
                            cell.col_span += 1;
                        }
                        cell
                    })
                    .collect();
                if !straddled {
                    let at = cells
                        .iter()
                        .position(|c| c.v_col_index >= v_col_index)
                        .unwrap_or(cells.len());
                    cells.insert(at, VCell::empty(tag, section, r, v_col_index.min(col_count)));
                }
                VRow { cells }
            })
            .collect();
        *next.section_mut(section) = new_rows;
    }

    log::debug!("inserted column at {v_col_index}");
    rebuild(&next)
}

/// Insert a column next to a cell, stepping past its column span when
/// inserting after.
pub fn insert_column_at_cell(vtable: &VirtualTable, cell: &VCell, placement: Placement) -> VirtualTable {
    let v_col_index = match placement {
        Placement::Before => cell.v_col_index,
        Placement::After => cell.last_col() + 1,
    };
    insert_column(vtable, v_col_index)
}

/// Remove a virtual column from every section.
///
/// Column-spanning cells that cover it are split first, so the column can
/// be dropped slot by slot. A section that loses its only column becomes
/// empty.
pub fn delete_column(vtable: &VirtualTable, v_col_index: usize) -> Result<VirtualTable> {
    let cols = SectionName::ALL
        .iter()
        .map(|&s| vtable.col_count(s))
        .max()
        .unwrap_or(0);
    if v_col_index >= cols {
        return Err(TableError::ColumnOutOfRange { col: v_col_index, cols });
    }

    let mut next = vtable.clone();
    for section in SectionName::ALL {
        if v_col_index >= next.col_count(section) {
            continue;
        }
        let spanning: Vec<CellPosition> = next
            .live_cells(section)
            .filter(|c| c.col_span > 1 && c.v_col_index <= v_col_index && v_col_index <= c.last_col())
            .map(VCell::position)
            .collect();
        for pos in spanning {
            split_in_place(&mut next, pos)?;
        }

        for row in next.section_mut(section).iter_mut() {
            for cell in row.cells.iter_mut().filter(|c| c.v_col_index == v_col_index) {
                cell.is_delete = true;
            }
        }
    }

    log::debug!("deleted column {v_col_index}");
    Ok(rebuild(&next))
}
