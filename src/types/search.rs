use serde::{Deserialize, Serialize};

use super::CellCoord;

/// One search match, identified by sheet and matched text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub sheet_name: String,
    pub content: String,
}

impl SearchHit {
    #[must_use]
    pub fn new(sheet_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            content: content.into(),
        }
    }
}

/// A search hit that also carries the anchor coordinate it was found at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatedHit {
    #[serde(flatten)]
    pub hit: SearchHit,
    pub coord: CellCoord,
}

impl LocatedHit {
    #[must_use]
    pub fn sheet_name(&self) -> &str {
        &self.hit.sheet_name
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.hit.content
    }

    /// A1-style address of the anchor, e.g. "B3".
    #[must_use]
    pub fn address(&self) -> String {
        self.coord.address()
    }
}

/// Per-cell highlight instruction produced by every search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Highlight {
    /// The display cell matches the current query.
    Match,
    /// The display cell holds a value but does not match; reset any previous highlight.
    Normal,
    /// Empty cells and cells of hidden sheets never carry a highlight.
    NotApplicable,
}

/// Where the presentation layer should move to after a hit is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTarget {
    pub sheet_name: String,
    pub row: u32,
    pub col: u32,
}

impl NavigationTarget {
    #[must_use]
    pub fn new(sheet_name: impl Into<String>, coord: CellCoord) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            row: coord.row,
            col: coord.col,
        }
    }

    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        CellCoord::new(self.row, self.col)
    }
}
