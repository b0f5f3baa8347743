use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Largest column span the grid builder honours (the HTML `colspan` limit).
pub const MAX_COL_SPAN: usize = 1000;

/// Largest row span the grid builder honours (the HTML `rowspan` limit).
pub const MAX_ROW_SPAN: usize = 65534;

/// Cell element kind
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CellTag {
    #[default]
    Td,
    Th,
}

impl fmt::Display for CellTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Td => write!(f, "td"),
            Self::Th => write!(f, "th"),
        }
    }
}

/// Header cell scope
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CellScope {
    Row,
    Col,
    Rowgroup,
    Colgroup,
}

/// A physically present cell in the sparse table.
///
/// Spans are optional: absent (or any value ≤ 1) means the cell covers a
/// single slot. On input a span may be a JSON integer or a numeric string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tag: CellTag,
    /// Inline style text, carried through unparsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<CellScope>,
    #[serde(default, deserialize_with = "deserialize_span", skip_serializing_if = "Option::is_none")]
    pub row_span: Option<usize>,
    #[serde(default, deserialize_with = "deserialize_span", skip_serializing_if = "Option::is_none")]
    pub col_span: Option<usize>,
}

impl Cell {
    /// An empty cell with the given tag.
    pub fn empty(tag: CellTag) -> Self {
        Self { tag, ..Self::default() }
    }

    /// A plain 1×1 cell with text content.
    pub fn text(tag: CellTag, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tag,
            ..Self::default()
        }
    }

    /// Builder-style span setter; values ≤ 1 are stored as absent.
    pub fn with_span(mut self, row_span: usize, col_span: usize) -> Self {
        self.row_span = normalize_span(row_span);
        self.col_span = normalize_span(col_span);
        self
    }

    /// Effective row span (absent = 1).
    pub fn row_span(&self) -> usize {
        self.row_span.unwrap_or(1).max(1)
    }

    /// Effective column span (absent = 1).
    pub fn col_span(&self) -> usize {
        self.col_span.unwrap_or(1).max(1)
    }
}

/// Store a span count in its persisted form: `None` for anything ≤ 1.
pub fn normalize_span(span: usize) -> Option<usize> {
    if span > 1 { Some(span) } else { None }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpan {
    Int(u64),
    Text(String),
    Other(IgnoredAny),
}

/// Accepts `2`, `"2"`, `null` or a missing key. Anything that isn't a
/// positive integer (negative, fractional, a bool) collapses to `None`.
fn deserialize_span<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawSpan> = Option::deserialize(deserializer)?;
    let value = match raw {
        Some(RawSpan::Int(n)) => usize::try_from(n).ok(),
        Some(RawSpan::Text(s)) => s.trim().parse::<usize>().ok(),
        Some(RawSpan::Other(_)) | None => None,
    };
    Ok(value.and_then(normalize_span))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_accepts_string_and_integer() {
        let cell: Cell = serde_json::from_str(
            r#"{"content":"a","tag":"td","rowSpan":"3","colSpan":2}"#,
        )
        .unwrap();
        assert_eq!(cell.row_span, Some(3));
        assert_eq!(cell.col_span, Some(2));
    }

    #[test]
    fn test_span_of_one_is_absent() {
        let cell: Cell = serde_json::from_str(
            r#"{"content":"a","tag":"th","rowSpan":"1","colSpan":1}"#,
        )
        .unwrap();
        assert_eq!(cell.row_span, None);
        assert_eq!(cell.col_span, None);
        assert_eq!(cell.row_span(), 1);

        let json = serde_json::to_string(&cell).unwrap();
        assert_eq!(json, r#"{"content":"a","tag":"th"}"#);
    }

    #[test]
    fn test_garbage_span_is_ignored() {
        let cell: Cell =
            serde_json::from_str(r#"{"content":"","tag":"td","rowSpan":"x","colSpan":-4}"#).unwrap();
        assert_eq!(cell.row_span(), 1);
        assert_eq!(cell.col_span(), 1);

        let cell: Cell =
            serde_json::from_str(r#"{"content":"","tag":"td","rowSpan":2.5,"colSpan":true}"#).unwrap();
        assert_eq!((cell.row_span, cell.col_span), (None, None));
    }

    #[test]
    fn test_huge_span_still_parses() {
        let cell: Cell =
            serde_json::from_str(r#"{"tag":"td","rowSpan":18446744073709551615,"colSpan":"18446744073709551615"}"#)
                .unwrap();
        assert_eq!(cell.col_span(), usize::MAX);
    }

    #[test]
    fn test_optional_attributes_roundtrip() {
        let json = r#"{"content":"Name","tag":"th","styles":"color:red;","className":"hd","id":"h1","scope":"col"}"#;
        let cell: Cell = serde_json::from_str(json).unwrap();
        assert_eq!(cell.class_name.as_deref(), Some("hd"));
        assert_eq!(cell.scope, Some(CellScope::Col));
        assert_eq!(serde_json::to_string(&cell).unwrap(), json);
    }
}
