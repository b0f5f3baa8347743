use serde::{Deserialize, Serialize};

use crate::cell::{CellScope, CellTag};
use crate::error::{Result, TableError};
use crate::serialize::rebuild;
use crate::virtual_table::{VCell, VirtualTable};

/// Attribute changes applied to every cell of a selection. `None` leaves
/// the attribute alone; an empty `styles` or `class_name` removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellPatch {
    pub content: Option<String>,
    pub tag: Option<CellTag>,
    pub styles: Option<String>,
    pub class_name: Option<String>,
    pub scope: Option<CellScope>,
}

impl CellPatch {
    fn apply(&self, cell: &mut VCell) {
        if let Some(content) = &self.content {
            cell.content.clone_from(content);
        }
        if let Some(tag) = self.tag {
            cell.tag = tag;
        }
        if let Some(styles) = &self.styles {
            cell.styles = Some(styles.clone()).filter(|s| !s.is_empty());
        }
        if let Some(class_name) = &self.class_name {
            cell.class_name = Some(class_name.clone()).filter(|s| !s.is_empty());
        }
        if let Some(scope) = self.scope {
            cell.scope = Some(scope);
        }
    }
}

/// Apply a patch to each selected cell. Structure is left untouched.
pub fn update_cells(vtable: &VirtualTable, selected: &[VCell], patch: &CellPatch) -> Result<VirtualTable> {
    let mut next = vtable.clone();
    for pos in selected.iter().filter(|c| c.is_live()).map(VCell::position) {
        let cell = next
            .cell_mut(pos)
            .filter(|c| c.is_live())
            .ok_or(TableError::CellNotFound(pos))?;
        patch.apply(cell);
    }
    Ok(rebuild(&next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{SectionName, Table};
    use crate::virtual_table::{to_virtual_table, CellPosition};

    #[test]
    fn test_patch_tag_and_styles() {
        let vt = to_virtual_table(&Table::with_body(2, 2));
        let first_col: Vec<VCell> = vt.body.iter().map(|r| r.cells[0].clone()).collect();
        let patch = CellPatch {
            tag: Some(CellTag::Th),
            styles: Some("font-weight:bold;".into()),
            scope: Some(CellScope::Row),
            ..CellPatch::default()
        };
        let vt = update_cells(&vt, &first_col, &patch).unwrap();
        assert!(vt.body.iter().all(|r| r.cells[0].tag == CellTag::Th));
        assert_eq!(vt.body[1].cells[0].styles.as_deref(), Some("font-weight:bold;"));
        assert_eq!(vt.body[1].cells[1].tag, CellTag::Td);
    }

    #[test]
    fn test_empty_styles_removes() {
        let mut table = Table::with_body(1, 1);
        table.body[0].cells[0].styles = Some("color:red;".into());
        let vt = to_virtual_table(&table);
        let patch = CellPatch { styles: Some(String::new()), ..CellPatch::default() };
        let vt = update_cells(&vt, &[vt.body[0].cells[0].clone()], &patch).unwrap();
        assert_eq!(vt.body[0].cells[0].styles, None);
    }

    #[test]
    fn test_unknown_cell() {
        let vt = to_virtual_table(&Table::with_body(1, 1));
        let mut ghost = vt.body[0].cells[0].clone();
        ghost.row_index = 5;
        let err = update_cells(&vt, &[ghost], &CellPatch::default()).unwrap_err();
        assert_eq!(err, TableError::CellNotFound(CellPosition::new(SectionName::Body, 5, 0)));
    }
}
