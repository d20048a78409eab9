use serde::Serialize;

use super::CellCoord;

/// One slot of a rendered grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum GridSlot {
    /// An unmerged cell or a merge anchor; spans are 1 for unmerged cells.
    #[serde(rename_all = "camelCase")]
    Cell {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        row_span: u32,
        col_span: u32,
    },
    /// Part of a merge region other than its anchor; renders nothing of its own.
    Covered { anchor: CellCoord },
}

impl GridSlot {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Cell { text, .. } => text.as_deref(),
            Self::Covered { .. } => None,
        }
    }

    /// `(row_span, col_span)` for cells, `None` for covered slots.
    #[must_use]
    pub const fn span(&self) -> Option<(u32, u32)> {
        match self {
            Self::Cell {
                row_span, col_span, ..
            } => Some((*row_span, *col_span)),
            Self::Covered { .. } => None,
        }
    }
}

/// Dense, row-major rendering of one sheet for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayGrid {
    pub sheet_name: String,
    pub row_count: u32,
    pub col_count: u32,
    pub rows: Vec<Vec<GridSlot>>,
}

impl DisplayGrid {
    #[must_use]
    pub fn slot(&self, row: u32, col: u32) -> Option<&GridSlot> {
        self.rows.get(row as usize)?.get(col as usize)
    }
}
