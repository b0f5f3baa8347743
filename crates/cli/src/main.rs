// vtable CLI - structural edits on table JSON
//
// Reads a table ({head, body, foot}) from a file or stdin, applies one
// command, and writes the normalized table to stdout or -o FILE.

mod cell_ref;
mod exit_codes;

use std::collections::BTreeSet;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;

use vtable_config::Settings;
use vtable_engine::{
    delete_column, delete_row, get_virtual_range, has_merged_cells, insert_column, insert_column_at_cell,
    insert_row, insert_row_at_cell, is_rectangle_selected, merge_cells, split_merged_cells,
    to_rectangled_selected_cells, to_table_attributes, to_virtual_table, toggle_section, update_cells,
    would_empty_section, CellPatch, CellPosition, CellScope, CellTag, MergeContent, Placement, SectionName,
    Table, TableError, VCell, VirtualRange, VirtualTable,
};

use cell_ref::{format_cell_ref, parse_cell_list, parse_cell_ref};
use exit_codes::{
    table_exit_code, EXIT_ERROR, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_TABLE_CELL_NOT_FOUND, EXIT_TABLE_LAST_ROW,
    EXIT_TABLE_NOT_RECTANGLE, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "vtable")]
#[command(about = "Structural edits on HTML-style tables with spanning cells")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Settings file (default: <config dir>/vtable/settings.json)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Log to stderr (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Input/output shared by every editing command.
#[derive(Args)]
struct IoArgs {
    /// Input table JSON (omit to read from stdin)
    input: Option<PathBuf>,

    /// Output file (omit for stdout)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Single-line JSON (overrides output.pretty)
    #[arg(long)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild a table: pad short rows, clip bad spans, drop empty rows
    #[command(after_help = "\
Examples:
  vtable normalize table.json
  cat table.json | vtable normalize --compact")]
    Normalize {
        #[command(flatten)]
        io: IoArgs,
    },

    /// Summarize sections, sizes and spanning cells
    #[command(after_help = "\
Examples:
  vtable inspect table.json
  vtable inspect table.json --json")]
    Inspect {
        /// Input table JSON (omit to read from stdin)
        input: Option<PathBuf>,

        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Insert an empty row
    #[command(after_help = "\
Examples:
  vtable insert-row table.json --at 0
  vtable insert-row table.json --section head --at 1
  vtable insert-row table.json --cell 1:0 --after")]
    InsertRow {
        #[command(flatten)]
        io: IoArgs,

        /// Section to edit (head, body, foot)
        #[arg(long, default_value = "body")]
        section: SectionName,

        /// Row index the new row takes
        #[arg(long, conflicts_with = "cell", required_unless_present = "cell")]
        at: Option<usize>,

        /// Insert next to the cell covering this slot (row:col or B2)
        #[arg(long)]
        cell: Option<String>,

        /// With --cell: insert below the cell's last row instead of above
        #[arg(long, requires = "cell")]
        after: bool,
    },

    /// Delete a row
    #[command(after_help = "\
Examples:
  vtable delete-row table.json --row 2
  vtable delete-row table.json --section head --row 0 --force")]
    DeleteRow {
        #[command(flatten)]
        io: IoArgs,

        /// Section to edit (head, body, foot)
        #[arg(long, default_value = "body")]
        section: SectionName,

        /// Row index to delete
        #[arg(long)]
        row: usize,

        /// Delete even when it leaves the section empty
        #[arg(long)]
        force: bool,
    },

    /// Insert an empty column in every section
    #[command(after_help = "\
Examples:
  vtable insert-column table.json --at 1
  vtable insert-column table.json --cell 0:2 --after")]
    InsertColumn {
        #[command(flatten)]
        io: IoArgs,

        /// Virtual column index the new column takes
        #[arg(long, conflicts_with = "cell", required_unless_present = "cell")]
        at: Option<usize>,

        /// Section of --cell
        #[arg(long, default_value = "body")]
        section: SectionName,

        /// Insert next to the cell covering this slot (row:col or B2)
        #[arg(long)]
        cell: Option<String>,

        /// With --cell: insert right of the cell's last column
        #[arg(long, requires = "cell")]
        after: bool,
    },

    /// Delete a virtual column from every section
    DeleteColumn {
        #[command(flatten)]
        io: IoArgs,

        /// Virtual column index to delete
        #[arg(long)]
        col: usize,
    },

    /// Merge a rectangular selection into one cell
    #[command(after_help = "\
Examples:
  vtable merge table.json --cells 0:0,0:1
  vtable merge table.json --from A1 --to B3 --keep-all")]
    Merge {
        #[command(flatten)]
        io: IoArgs,

        /// Section to edit (head, body, foot)
        #[arg(long, default_value = "body")]
        section: SectionName,

        /// Comma-separated cells to merge
        #[arg(long, conflicts_with_all = ["from", "to"], required_unless_present = "from")]
        cells: Option<String>,

        /// Drag selection start; grown until no span is cut
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Drag selection end
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Keep every non-empty content (overrides merge.content)
        #[arg(long)]
        keep_all: bool,
    },

    /// Split spanning cells back into 1×1 cells
    #[command(after_help = "\
Examples:
  vtable split table.json --cells 0:0
  vtable split table.json --section head")]
    Split {
        #[command(flatten)]
        io: IoArgs,

        /// Section to edit (head, body, foot)
        #[arg(long, default_value = "body")]
        section: SectionName,

        /// Cells to split (omit to split every spanning cell of the section)
        #[arg(long)]
        cells: Option<String>,
    },

    /// Add the section if it is empty, remove it otherwise
    ToggleSection {
        #[command(flatten)]
        io: IoArgs,

        /// Section to toggle (head, body, foot)
        #[arg(long)]
        section: SectionName,
    },

    /// Change content or attributes of cells
    #[command(after_help = "\
Examples:
  vtable update table.json --cells 0:0,1:0 --tag th --scope row
  vtable update table.json --cells B2 --content 'Total' --class ''")]
    Update {
        #[command(flatten)]
        io: IoArgs,

        /// Section to edit (head, body, foot)
        #[arg(long, default_value = "body")]
        section: SectionName,

        /// Comma-separated cells to change
        #[arg(long)]
        cells: String,

        /// New content
        #[arg(long)]
        content: Option<String>,

        /// Cell tag (td or th)
        #[arg(long)]
        tag: Option<String>,

        /// Inline styles ('' removes them)
        #[arg(long)]
        styles: Option<String>,

        /// Class attribute ('' removes it)
        #[arg(long = "class")]
        class_name: Option<String>,

        /// Header scope (row, col, rowgroup, colgroup)
        #[arg(long)]
        scope: Option<String>,
    },

    /// Check whether cells form a filled rectangle (exit 13 when not)
    CheckRectangle {
        /// Input table JSON (omit to read from stdin)
        input: Option<PathBuf>,

        /// Section of the cells
        #[arg(long, default_value = "body")]
        section: SectionName,

        /// Comma-separated cells
        #[arg(long)]
        cells: String,

        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  vtable-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

/// Default warn, -v debug, -vv trace. RUST_LOG still wins when set.
fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

// stdout carries table JSON only; diagnostics go to stderr.
fn init_logging(verbose: u8) {
    let _ = env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.settings {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let result = match cli.command {
        None => {
            eprintln!("Usage: vtable <command> [options]");
            eprintln!("       vtable --help for more information");
            Ok(())
        }
        Some(Commands::Normalize { io }) => edit(&io, &settings, |vt| Ok(vt.clone())),
        Some(Commands::Inspect { input, json }) => cmd_inspect(input.as_deref(), json),
        Some(Commands::InsertRow { io, section, at, cell, after }) => {
            edit(&io, &settings, |vt| cmd_insert_row(vt, section, at, cell.as_deref(), after))
        }
        Some(Commands::DeleteRow { io, section, row, force }) => {
            let keep_one_row = settings.keep_one_row && !force;
            edit(&io, &settings, |vt| cmd_delete_row(vt, section, row, keep_one_row))
        }
        Some(Commands::InsertColumn { io, at, section, cell, after }) => {
            edit(&io, &settings, |vt| cmd_insert_column(vt, at, section, cell.as_deref(), after))
        }
        Some(Commands::DeleteColumn { io, col }) => {
            edit(&io, &settings, |vt| delete_column(vt, col).map_err(CliError::table))
        }
        Some(Commands::Merge { io, section, cells, from, to, keep_all }) => {
            let content = if keep_all { MergeContent::KeepAll } else { settings.merge_content };
            edit(&io, &settings, |vt| {
                cmd_merge(vt, section, cells.as_deref(), from.as_deref().zip(to.as_deref()), content)
            })
        }
        Some(Commands::Split { io, section, cells }) => {
            edit(&io, &settings, |vt| cmd_split(vt, section, cells.as_deref()))
        }
        Some(Commands::ToggleSection { io, section }) => edit(&io, &settings, |vt| Ok(toggle_section(vt, section))),
        Some(Commands::Update { io, section, cells, content, tag, styles, class_name, scope }) => {
            build_patch(content, tag, styles, class_name, scope).and_then(|patch| {
                edit(&io, &settings, |vt| {
                    let selected = resolve_cells(vt, section, &cells)?;
                    update_cells(vt, &selected, &patch).map_err(CliError::table)
                })
            })
        }
        Some(Commands::CheckRectangle { input, section, cells, json }) => {
            cmd_check_rectangle(input.as_deref(), section, &cells, json)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    /// Error with an exit code and no message, for commands that already
    /// printed their report.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Create error from a table operation failure with proper exit code.
    pub fn table(err: TableError) -> Self {
        let hint = match &err {
            TableError::InvalidSelection(_) => {
                Some("select two or more cells of one section that fill a rectangle".to_string())
            }
            TableError::RowOutOfRange { .. } | TableError::ColumnOutOfRange { .. } => {
                Some("indices are zero-based; see `vtable inspect`".to_string())
            }
            TableError::CellNotFound(_) => None,
        };
        Self { code: table_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// I/O
// ============================================================================

fn read_table(input: Option<&Path>) -> Result<Table, CliError> {
    let (content, source) = match input {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
            (content, path.display().to_string())
        }
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .map_err(|e| CliError::io(e.to_string()))?;
            if content.trim().is_empty() {
                return Err(CliError::parse("no input received on stdin")
                    .with_hint("cat table.json | vtable normalize"));
            }
            (content, "stdin".to_string())
        }
    };

    Table::from_json(&content).map_err(|e| {
        CliError::parse(format!("{}: not a table: {}", source, e))
            .with_hint("expected {\"head\": [...], \"body\": [...], \"foot\": [...]}")
    })
}

fn write_table(table: &Table, io_args: &IoArgs, settings: &Settings) -> Result<(), CliError> {
    let pretty = settings.pretty && !io_args.compact;
    let json = table.to_json(pretty).map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;

    match &io_args.output {
        Some(path) => std::fs::write(path, format!("{}\n", json))
            .map_err(|e| CliError::io(format!("{}: {}", path.display(), e))),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json).map_err(|e| CliError::io(e.to_string()))
        }
    }
}

/// Read, rebuild, apply one edit, write.
fn edit<F>(io_args: &IoArgs, settings: &Settings, op: F) -> Result<(), CliError>
where
    F: FnOnce(&VirtualTable) -> Result<VirtualTable, CliError>,
{
    let table = read_table(io_args.input.as_deref())?;
    let vtable = to_virtual_table(&table);
    let next = op(&vtable)?;
    write_table(&to_table_attributes(&next), io_args, settings)
}

// ============================================================================
// Cell selection
// ============================================================================

fn parse_ref(s: &str) -> Result<(usize, usize), CliError> {
    parse_cell_ref(s).ok_or_else(|| {
        CliError::args(format!("invalid cell reference: {}", s)).with_hint("use row:col (zero-based) or A1")
    })
}

/// The live cell whose span covers a slot.
fn covering(vtable: &VirtualTable, section: SectionName, (row, col): (usize, usize)) -> Result<VCell, CliError> {
    vtable
        .covering_cell(CellPosition::new(section, row, col))
        .cloned()
        .ok_or_else(|| CliError::new(
            EXIT_TABLE_CELL_NOT_FOUND,
            format!("no cell at {} {}", section, format_cell_ref(row, col)),
        ))
}

/// Resolve a comma-separated list to distinct live cells.
fn resolve_cells(vtable: &VirtualTable, section: SectionName, list: &str) -> Result<Vec<VCell>, CliError> {
    let refs = parse_cell_list(list)
        .map_err(|e| CliError::args(e).with_hint("use row:col (zero-based) or A1"))?;
    if refs.is_empty() {
        return Err(CliError::args("no cells given"));
    }

    let mut seen = BTreeSet::new();
    let mut cells = Vec::new();
    for slot in refs {
        let cell = covering(vtable, section, slot)?;
        if seen.insert(cell.position()) {
            cells.push(cell);
        }
    }
    Ok(cells)
}

fn placement(after: bool) -> Placement {
    if after {
        Placement::After
    } else {
        Placement::Before
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_insert_row(
    vtable: &VirtualTable,
    section: SectionName,
    at: Option<usize>,
    cell: Option<&str>,
    after: bool,
) -> Result<VirtualTable, CliError> {
    match (at, cell) {
        (Some(at), _) => Ok(insert_row(vtable, section, at)),
        (None, Some(cell)) => {
            let anchor = covering(vtable, section, parse_ref(cell)?)?;
            Ok(insert_row_at_cell(vtable, &anchor, placement(after)))
        }
        (None, None) => Err(CliError::args("insert-row needs --at or --cell")),
    }
}

fn cmd_delete_row(
    vtable: &VirtualTable,
    section: SectionName,
    row: usize,
    keep_one_row: bool,
) -> Result<VirtualTable, CliError> {
    if keep_one_row && would_empty_section(vtable, section) {
        return Err(CliError::new(EXIT_TABLE_LAST_ROW, format!("refusing to delete the last {} row", section))
            .with_hint("pass --force, or set \"rows.keepOneRow\": false in settings"));
    }
    delete_row(vtable, section, row).map_err(CliError::table)
}

fn cmd_insert_column(
    vtable: &VirtualTable,
    at: Option<usize>,
    section: SectionName,
    cell: Option<&str>,
    after: bool,
) -> Result<VirtualTable, CliError> {
    match (at, cell) {
        (Some(at), _) => Ok(insert_column(vtable, at)),
        (None, Some(cell)) => {
            let anchor = covering(vtable, section, parse_ref(cell)?)?;
            Ok(insert_column_at_cell(vtable, &anchor, placement(after)))
        }
        (None, None) => Err(CliError::args("insert-column needs --at or --cell")),
    }
}

fn cmd_merge(
    vtable: &VirtualTable,
    section: SectionName,
    cells: Option<&str>,
    drag: Option<(&str, &str)>,
    content: MergeContent,
) -> Result<VirtualTable, CliError> {
    let selected = match (cells, drag) {
        (Some(list), _) => resolve_cells(vtable, section, list)?,
        (None, Some((from, to))) => {
            let from = covering(vtable, section, parse_ref(from)?)?;
            let to = covering(vtable, section, parse_ref(to)?)?;
            to_rectangled_selected_cells(vtable, &from, &to).map_err(CliError::table)?
        }
        (None, None) => return Err(CliError::args("merge needs --cells or --from/--to")),
    };
    merge_cells(vtable, &selected, content).map_err(CliError::table)
}

fn cmd_split(vtable: &VirtualTable, section: SectionName, cells: Option<&str>) -> Result<VirtualTable, CliError> {
    let selected = match cells {
        Some(list) => resolve_cells(vtable, section, list)?,
        None => vtable.live_cells(section).filter(|c| c.has_span()).cloned().collect(),
    };
    split_merged_cells(vtable, &selected).map_err(CliError::table)
}

fn parse_enum<T: DeserializeOwned>(flag: &str, value: &str, expected: &str) -> Result<T, CliError> {
    serde_json::from_value(serde_json::Value::String(value.to_ascii_lowercase()))
        .map_err(|_| CliError::args(format!("invalid {}: {}", flag, value)).with_hint(format!("expected {}", expected)))
}

fn build_patch(
    content: Option<String>,
    tag: Option<String>,
    styles: Option<String>,
    class_name: Option<String>,
    scope: Option<String>,
) -> Result<CellPatch, CliError> {
    let tag = tag
        .map(|t| parse_enum::<CellTag>("--tag", &t, "td or th"))
        .transpose()?;
    let scope = scope
        .map(|s| parse_enum::<CellScope>("--scope", &s, "row, col, rowgroup or colgroup"))
        .transpose()?;
    Ok(CellPatch { content, tag, styles, class_name, scope })
}

// ============================================================================
// inspect
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectReport {
    sections: Vec<SectionReport>,
    cells: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionReport {
    section: SectionName,
    rows: usize,
    cols: usize,
    cells: usize,
    spanning: Vec<SpanReport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpanReport {
    cell: String,
    row_span: usize,
    col_span: usize,
}

fn inspect_report(vtable: &VirtualTable) -> InspectReport {
    let sections = SectionName::ALL
        .iter()
        .map(|&section| SectionReport {
            section,
            rows: vtable.row_count(section),
            cols: vtable.col_count(section),
            cells: vtable.live_cells(section).count(),
            spanning: vtable
                .live_cells(section)
                .filter(|c| c.has_span())
                .map(|c| SpanReport {
                    cell: format_cell_ref(c.row_index, c.v_col_index),
                    row_span: c.row_span,
                    col_span: c.col_span,
                })
                .collect(),
        })
        .collect();
    InspectReport { sections, cells: vtable.leaf_count() }
}

fn cmd_inspect(input: Option<&Path>, json: bool) -> Result<(), CliError> {
    let vtable = to_virtual_table(&read_table(input)?);
    let report = inspect_report(&vtable);

    if json {
        let output = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(e.to_string()))?;
        println!("{}", output);
        return Ok(());
    }

    for section in &report.sections {
        println!(
            "{:<5} {} row(s) x {} col(s), {} cell(s)",
            section.section.as_str(), section.rows, section.cols, section.cells
        );
        for span in &section.spanning {
            println!("      span {:<7} {}x{}", span.cell, span.row_span, span.col_span);
        }
    }
    Ok(())
}

// ============================================================================
// check-rectangle
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RectangleReport {
    rectangle: bool,
    range: Option<VirtualRange>,
    has_merged_cells: bool,
    cells: usize,
}

fn cmd_check_rectangle(input: Option<&Path>, section: SectionName, list: &str, json: bool) -> Result<(), CliError> {
    let vtable = to_virtual_table(&read_table(input)?);
    let selected = resolve_cells(&vtable, section, list)?;
    let report = RectangleReport {
        rectangle: is_rectangle_selected(&selected),
        range: get_virtual_range(&selected),
        has_merged_cells: has_merged_cells(&selected),
        cells: selected.len(),
    };

    if json {
        let output = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(e.to_string()))?;
        println!("{}", output);
    } else if let (true, Some(range)) = (report.rectangle, report.range) {
        println!(
            "rectangle {}..{} ({} cell(s))",
            format_cell_ref(range.min_row, range.min_col),
            format_cell_ref(range.max_row, range.max_col),
            report.cells
        );
    } else {
        println!("not a rectangle ({} cell(s))", report.cells);
    }

    if report.rectangle {
        Ok(())
    } else {
        Err(CliError::silent(EXIT_TABLE_NOT_RECTANGLE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(log_level(0), log::LevelFilter::Warn);
        assert_eq!(log_level(1), log::LevelFilter::Debug);
        assert_eq!(log_level(5), log::LevelFilter::Trace);
    }
}
