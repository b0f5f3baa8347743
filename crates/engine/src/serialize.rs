use crate::table::{Row, SectionName, Table};
use crate::virtual_table::{to_virtual_table, VRow, VirtualTable};

/// Convert the dense grid back to the sparse, persisted shape.
///
/// Placeholders and merged-away cells are skipped, spans of 1 become absent
/// and rows left without cells are dropped. Spans that covered a dropped row
/// shrink by one so the output still describes a consistent grid.
pub fn to_table_attributes(vtable: &VirtualTable) -> Table {
    let mut table = Table::default();
    for section in SectionName::ALL {
        *table.section_mut(section) = serialize_section(vtable.section(section));
    }
    table
}

fn serialize_section(rows: &[VRow]) -> Vec<Row> {
    let kept: Vec<bool> = rows.iter().map(|row| row.live_cells().next().is_some()).collect();

    rows.iter()
        .enumerate()
        .filter(|&(row_index, _)| kept[row_index])
        .map(|(row_index, row)| {
            let cells = row
                .live_cells()
                .map(|vcell| {
                    let mut cell = vcell.to_cell();
                    let end = (row_index + vcell.row_span).min(rows.len());
                    let surviving = kept[row_index..end].iter().filter(|&&k| k).count();
                    if surviving != vcell.row_span {
                        cell = cell.with_span(surviving, vcell.col_span);
                    }
                    cell
                })
                .collect();
            Row::new(cells)
        })
        .collect()
}

/// Serialize and rebuild, so indices are current and transient flags are gone.
pub(crate) fn rebuild(vtable: &VirtualTable) -> VirtualTable {
    to_virtual_table(&to_table_attributes(vtable))
}

impl VirtualTable {
    pub fn to_table(&self) -> Table {
        to_table_attributes(self)
    }
}
