// Shared helpers for engine integration tests.

#![allow(dead_code)]

use std::collections::HashSet;

use vtable_engine::{Cell, CellPosition, CellTag, Row, SectionName, Table, VCell, VirtualTable};

pub fn td(content: &str) -> Cell {
    Cell::text(CellTag::Td, content)
}

/// Body-only table whose cells are labelled "r-c".
pub fn numbered(rows: usize, cols: usize) -> Table {
    let body = (0..rows)
        .map(|r| Row::new((0..cols).map(|c| td(&format!("{r}-{c}"))).collect()))
        .collect();
    Table { body, ..Table::default() }
}

pub fn cell(vt: &VirtualTable, section: SectionName, row: usize, col: usize) -> VCell {
    vt.cell_at(CellPosition::new(section, row, col))
        .unwrap_or_else(|| panic!("no slot at {section} {row},{col}"))
        .clone()
}

pub fn body_cells(vt: &VirtualTable, coords: &[(usize, usize)]) -> Vec<VCell> {
    coords.iter().map(|&(r, c)| cell(vt, SectionName::Body, r, c)).collect()
}

/// Lay out a section independently of the engine and report each row's
/// width (slots covered by its own cells plus spans from above). Panics
/// when two cells claim the same slot.
pub fn row_widths(rows: &[Row]) -> Vec<usize> {
    let mut taken: HashSet<(usize, usize)> = HashSet::new();
    for (r, row) in rows.iter().enumerate() {
        let mut col = 0;
        for cell in &row.cells {
            while taken.contains(&(r, col)) {
                col += 1;
            }
            for dr in 0..cell.row_span() {
                for dc in 0..cell.col_span() {
                    assert!(taken.insert((r + dr, col + dc)), "slot {},{} claimed twice", r + dr, col + dc);
                }
            }
            col += cell.col_span();
        }
    }
    (0..rows.len())
        .map(|r| taken.iter().filter(|&&(row, _)| row == r).count())
        .collect()
}

/// Every section is a full rectangle: equal row widths, no span running
/// past the last row, no empty rows.
pub fn assert_well_formed(table: &Table) {
    for section in SectionName::ALL {
        let rows = table.section(section);
        let widths = row_widths(rows);
        if let Some(&first) = widths.first() {
            assert!(widths.iter().all(|&w| w == first), "{section} row widths differ: {widths:?}");
        }
        for (r, row) in rows.iter().enumerate() {
            assert!(!row.cells.is_empty(), "{section} row {r} is empty");
            for cell in &row.cells {
                assert!(r + cell.row_span() <= rows.len(), "{section} row {r}: span runs past last row");
            }
        }
    }
}

/// Sparse table from a rows×cols grid and per-slot span seeds. Each free
/// slot takes the next seed as a (row_span, col_span) wish, clipped to the
/// free area.
pub fn tiled(rows: usize, cols: usize, seeds: &[(usize, usize)]) -> Table {
    let mut taken = vec![vec![false; cols]; rows];
    let mut seeds = seeds.iter().cycle();
    let mut body = Vec::with_capacity(rows);
    for r in 0..rows {
        let mut cells = Vec::new();
        for c in 0..cols {
            if taken[r][c] {
                continue;
            }
            let &(rs_wish, cs_wish) = seeds.next().unwrap_or(&(1, 1));
            let free_run = (c..cols).take_while(|&cc| !taken[r][cc]).count();
            let col_span = cs_wish.clamp(1, free_run);
            let mut row_span = 1;
            while row_span < rs_wish && r + row_span < rows && (c..c + col_span).all(|cc| !taken[r + row_span][cc]) {
                row_span += 1;
            }
            for rr in r..r + row_span {
                for cc in c..c + col_span {
                    taken[rr][cc] = true;
                }
            }
            cells.push(td(&format!("{r}-{c}")).with_span(row_span, col_span));
        }
        body.push(Row::new(cells));
    }
    Table { body, ..Table::default() }
}
