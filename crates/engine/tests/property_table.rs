// Property-based tests for structural edits on spanned tables.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

mod common;

use common::*;
use proptest::prelude::*;
use vtable_engine::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Span wish: mostly 1×1, sometimes tall, wide or both.
fn arb_seed() -> impl Strategy<Value = (usize, usize)> {
    prop_oneof![
        4 => Just((1, 1)),
        1 => (2..=3usize, Just(1usize)),
        1 => (Just(1usize), 2..=3usize),
        1 => (2..=3usize, 2..=3usize),
    ]
}

/// Well-formed body: every row keeps at least one cell of its own.
fn arb_table() -> impl Strategy<Value = Table> {
    (1..=5usize, 1..=5usize, prop::collection::vec(arb_seed(), 1..12))
        .prop_map(|(rows, cols, seeds)| tiled(rows, cols, &seeds))
        .prop_filter("rows without cells are dropped on save", |t| {
            t.body.iter().all(|row| !row.cells.is_empty())
        })
}

#[derive(Debug, Clone)]
enum Op {
    InsertRow(usize),
    DeleteRow(usize),
    InsertColumn(usize),
    DeleteColumn(usize),
    Merge(usize, usize, usize, usize),
    Split(usize, usize),
    Toggle(SectionName),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..8usize).prop_map(Op::InsertRow),
        (0..8usize).prop_map(Op::DeleteRow),
        (0..8usize).prop_map(Op::InsertColumn),
        (0..8usize).prop_map(Op::DeleteColumn),
        (0..8usize, 0..8usize, 0..8usize, 0..8usize).prop_map(|(a, b, c, d)| Op::Merge(a, b, c, d)),
        (0..8usize, 0..8usize).prop_map(|(r, c)| Op::Split(r, c)),
        prop_oneof![Just(SectionName::Head), Just(SectionName::Foot)].prop_map(Op::Toggle),
    ]
}

/// Apply an op with its indices folded into the current body. Rejected
/// edits leave the table as it was.
fn apply(vt: &VirtualTable, op: &Op) -> VirtualTable {
    let rows = vt.row_count(SectionName::Body);
    let cols = vt.col_count(SectionName::Body);
    let body_cell = |r: usize, c: usize| {
        (rows > 0 && cols > 0).then(|| cell(vt, SectionName::Body, r % rows, c % cols))
    };
    match *op {
        Op::InsertRow(r) => insert_row(vt, SectionName::Body, r % (rows + 1)),
        Op::DeleteRow(r) if rows > 0 => delete_row(vt, SectionName::Body, r % rows).unwrap(),
        Op::InsertColumn(c) => insert_column(vt, c % (cols + 1)),
        Op::DeleteColumn(c) if cols > 0 => delete_column(vt, c % cols).unwrap(),
        Op::Merge(r0, c0, r1, c1) => {
            let (Some(from), Some(to)) = (body_cell(r0, c0), body_cell(r1, c1)) else {
                return vt.clone();
            };
            let selected = to_rectangled_selected_cells(vt, &from, &to).unwrap();
            merge_cells(vt, &selected, MergeContent::KeepAll).unwrap_or_else(|_| vt.clone())
        }
        Op::Split(r, c) => match body_cell(r, c).and_then(|slot| vt.covering_cell(slot.position()).cloned()) {
            Some(anchor) => split_merged_cell(vt, &anchor).unwrap(),
            None => vt.clone(),
        },
        Op::Toggle(section) => toggle_section(vt, section),
        _ => vt.clone(),
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    /// Sparse → dense → sparse is the identity on well-formed tables.
    #[test]
    fn roundtrip_is_identity(table in arb_table()) {
        let back = to_table_attributes(&to_virtual_table(&table));
        prop_assert_eq!(back, table);
    }

    /// Every dense row has the same number of slots.
    #[test]
    fn dense_rows_are_equal_width(table in arb_table()) {
        let vt = to_virtual_table(&table);
        let width = vt.col_count(SectionName::Body);
        prop_assert!(vt.body.iter().all(|row| row.cells.len() == width));
        prop_assert!(vt.body.iter().all(|row| row.occupied_width() <= width));
    }

    /// Any sequence of edits keeps every section a full rectangle.
    #[test]
    fn edits_keep_table_well_formed(
        table in arb_table(),
        ops in prop::collection::vec(arb_op(), 1..8),
    ) {
        let mut vt = to_virtual_table(&table);
        for op in &ops {
            vt = apply(&vt, op);
            assert_well_formed(&vt.to_table());
        }
    }

    /// Inserting a row and deleting it again restores the row count.
    #[test]
    fn insert_delete_row_symmetry(table in arb_table(), at in 0..6usize) {
        let vt = to_virtual_table(&table);
        let rows = vt.row_count(SectionName::Body);
        let at = at % (rows + 1);
        let grown = insert_row(&vt, SectionName::Body, at);
        prop_assert_eq!(grown.row_count(SectionName::Body), rows + 1);
        let back = delete_row(&grown, SectionName::Body, at).unwrap();
        prop_assert_eq!(back.row_count(SectionName::Body), rows);
    }

    /// Inserting a column and deleting it again restores the width.
    #[test]
    fn insert_delete_column_symmetry(table in arb_table(), at in 0..6usize) {
        let vt = to_virtual_table(&table);
        let cols = vt.col_count(SectionName::Body);
        let at = at % (cols + 1);
        let grown = insert_column(&vt, at);
        prop_assert_eq!(grown.col_count(SectionName::Body), cols + 1);
        let back = delete_column(&grown, at).unwrap();
        prop_assert_eq!(back.col_count(SectionName::Body), cols);
    }

    /// A drag selection always tiles its bounding rectangle.
    #[test]
    fn drag_selection_is_rectangular(
        table in arb_table(),
        a in (0..5usize, 0..5usize),
        b in (0..5usize, 0..5usize),
    ) {
        let vt = to_virtual_table(&table);
        let rows = vt.row_count(SectionName::Body);
        let cols = vt.col_count(SectionName::Body);
        let from = cell(&vt, SectionName::Body, a.0 % rows, a.1 % cols);
        let to = cell(&vt, SectionName::Body, b.0 % rows, b.1 % cols);
        let selected = to_rectangled_selected_cells(&vt, &from, &to).unwrap();
        prop_assert!(!selected.is_empty());
        if selected.len() >= 2 {
            prop_assert!(is_rectangle_selected(&selected));
        }
    }

    /// Merging a block of plain cells and splitting it restores the leaf
    /// count, including blocks that swallow whole rows.
    #[test]
    fn merge_split_leaf_symmetry(
        rows in 1..=5usize,
        cols in 2..=5usize,
        corner in (0..5usize, 0..5usize),
        size in (1..=5usize, 1..=5usize),
    ) {
        let r0 = corner.0 % rows;
        let c0 = corner.1 % cols;
        let r1 = (r0 + size.0 - 1).min(rows - 1);
        let c1 = (c0 + size.1 - 1).min(cols - 1);
        prop_assume!((r1 - r0 + 1) * (c1 - c0 + 1) >= 2);

        let vt = to_virtual_table(&numbered(rows, cols));
        let coords: Vec<(usize, usize)> = (r0..=r1)
            .flat_map(|r| (c0..=c1).map(move |c| (r, c)))
            .collect();
        let merged = merge_cells(&vt, &body_cells(&vt, &coords), MergeContent::KeepFirst).unwrap();
        prop_assert_eq!(merged.leaf_count(), rows * cols - coords.len() + 1);

        let anchor = cell(&merged, SectionName::Body, r0, c0);
        let split = split_merged_cell(&merged, &anchor).unwrap();
        prop_assert_eq!(split.leaf_count(), rows * cols);
        prop_assert_eq!(split.row_count(SectionName::Body), rows);
        assert_well_formed(&split.to_table());
    }
}
