use crate::serialize::rebuild;
use crate::table::SectionName;
use crate::virtual_table::{VCell, VRow, VirtualTable};

/// Show or hide a section.
///
/// A section with any cells is cleared. An empty one gets a single row of
/// empty cells, as wide as the body's first row.
pub fn toggle_section(vtable: &VirtualTable, section: SectionName) -> VirtualTable {
    let mut next = vtable.clone();
    if vtable.has_cells(section) {
        next.section_mut(section).clear();
        log::debug!("cleared {section}");
    } else {
        let width = new_row_width(vtable);
        let tag = section.default_tag();
        let cells = (0..width).map(|v_col| VCell::empty(tag, section, 0, v_col)).collect();
        *next.section_mut(section) = vec![VRow { cells }];
        log::debug!("created {section} with {width} cell(s)");
    }
    rebuild(&next)
}

/// Width for a row created in an empty section: the body's first row,
/// else the widest other section, else a single cell.
pub(crate) fn new_row_width(vtable: &VirtualTable) -> usize {
    let first_row_width = |section: SectionName| vtable.section(section).first().map_or(0, VRow::occupied_width);
    let body = first_row_width(SectionName::Body);
    if body > 0 {
        return body;
    }
    SectionName::ALL
        .iter()
        .map(|&s| first_row_width(s))
        .max()
        .filter(|&w| w > 0)
        .unwrap_or(1)
}
