use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cell_ref::format_cell_ref;

/// A 0-based cell coordinate. Ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1-style reference for this coordinate.
    #[must_use]
    pub fn address(self) -> String {
        format_cell_ref(self)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cell_ref(*self))
    }
}

/// Cell type: s=string, n=number, b=boolean, e=error, d=date
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    #[serde(rename = "s")]
    String,
    #[serde(rename = "n")]
    Number,
    #[serde(rename = "b")]
    Boolean,
    #[serde(rename = "e")]
    Error,
    #[serde(rename = "d")]
    Date,
}

/// A cell's value, already rendered to the text a reader sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellValue {
    pub text: String,
    pub kind: CellType,
}

impl CellValue {
    #[must_use]
    pub fn new(text: impl Into<String>, kind: CellType) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// A plain string value.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, CellType::String)
    }
}

/// A merged region: 0-based, inclusive bounds within one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRegion {
    pub min_row: u32,
    pub max_row: u32,
    pub min_col: u32,
    pub max_col: u32,
}

impl MergeRegion {
    #[must_use]
    pub const fn new(min_row: u32, max_row: u32, min_col: u32, max_col: u32) -> Self {
        Self {
            min_row,
            max_row,
            min_col,
            max_col,
        }
    }

    /// Build a region from two opposite corners in any order.
    #[must_use]
    pub fn from_corners(a: CellCoord, b: CellCoord) -> Self {
        Self {
            min_row: a.row.min(b.row),
            max_row: a.row.max(b.row),
            min_col: a.col.min(b.col),
            max_col: a.col.max(b.col),
        }
    }

    /// The coordinate that carries the region's value.
    #[must_use]
    pub const fn anchor(&self) -> CellCoord {
        CellCoord::new(self.min_row, self.min_col)
    }

    #[must_use]
    pub const fn row_span(&self) -> u32 {
        self.max_row - self.min_row + 1
    }

    #[must_use]
    pub const fn col_span(&self) -> u32 {
        self.max_col - self.min_col + 1
    }

    #[must_use]
    pub const fn contains(&self, coord: CellCoord) -> bool {
        coord.row >= self.min_row
            && coord.row <= self.max_row
            && coord.col >= self.min_col
            && coord.col <= self.max_col
    }

    /// Clamp to `[0, row_count) x [0, col_count)`.
    ///
    /// Returns `None` when nothing of the region lies inside the sheet.
    #[must_use]
    pub fn clamp(&self, row_count: u32, col_count: u32) -> Option<Self> {
        if row_count == 0 || col_count == 0 {
            return None;
        }
        if self.min_row >= row_count || self.min_col >= col_count {
            return None;
        }
        Some(Self {
            min_row: self.min_row,
            max_row: self.max_row.min(row_count - 1),
            min_col: self.min_col,
            max_col: self.max_col.min(col_count - 1),
        })
    }

    /// A region that covers a single cell merges nothing.
    #[must_use]
    pub const fn is_single_cell(&self) -> bool {
        self.min_row == self.max_row && self.min_col == self.max_col
    }
}

impl fmt::Display for MergeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            CellCoord::new(self.min_row, self.min_col),
            CellCoord::new(self.max_row, self.max_col)
        )
    }
}

/// The unit of interaction: an unmerged cell, or a merge anchor standing for its whole span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCell {
    pub anchor: CellCoord,
    pub row_span: u32,
    pub col_span: u32,
}

impl DisplayCell {
    #[must_use]
    pub const fn single(coord: CellCoord) -> Self {
        Self {
            anchor: coord,
            row_span: 1,
            col_span: 1,
        }
    }

    #[must_use]
    pub const fn from_region(region: &MergeRegion) -> Self {
        Self {
            anchor: region.anchor(),
            row_span: region.row_span(),
            col_span: region.col_span(),
        }
    }

    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    #[must_use]
    pub const fn contains(&self, coord: CellCoord) -> bool {
        coord.row >= self.anchor.row
            && coord.row < self.anchor.row + self.row_span
            && coord.col >= self.anchor.col
            && coord.col < self.anchor.col + self.col_span
    }
}
