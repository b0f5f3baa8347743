use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellTag};

/// One of the three independent table sections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SectionName {
    Head,
    Body,
    Foot,
}

impl SectionName {
    /// All sections in document order.
    pub const ALL: [SectionName; 3] = [SectionName::Head, SectionName::Body, SectionName::Foot];

    /// Tag used for cells created in this section.
    pub fn default_tag(self) -> CellTag {
        match self {
            Self::Head => CellTag::Th,
            Self::Body | Self::Foot => CellTag::Td,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
            Self::Foot => "foot",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "head" | "thead" => Ok(Self::Head),
            "body" | "tbody" => Ok(Self::Body),
            "foot" | "tfoot" => Ok(Self::Foot),
            other => Err(format!("unknown section '{other}' (expected head, body or foot)")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Row {
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

/// The sparse, persisted table: only cells that physically exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    #[serde(default)]
    pub head: Vec<Row>,
    #[serde(default)]
    pub body: Vec<Row>,
    #[serde(default)]
    pub foot: Vec<Row>,
}

impl Table {
    /// A `rows × cols` body of empty cells, no head or foot.
    pub fn with_body(rows: usize, cols: usize) -> Self {
        let body = (0..rows)
            .map(|_| Row::new((0..cols).map(|_| Cell::empty(CellTag::Td)).collect()))
            .collect();
        Self { body, ..Self::default() }
    }

    pub fn section(&self, name: SectionName) -> &[Row] {
        match name {
            SectionName::Head => &self.head,
            SectionName::Body => &self.body,
            SectionName::Foot => &self.foot,
        }
    }

    pub fn section_mut(&mut self, name: SectionName) -> &mut Vec<Row> {
        match name {
            SectionName::Head => &mut self.head,
            SectionName::Body => &mut self.body,
            SectionName::Foot => &mut self.foot,
        }
    }

    pub fn is_empty(&self) -> bool {
        SectionName::ALL.iter().all(|&s| self.section(s).is_empty())
    }

    /// Parse the host attribute JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
