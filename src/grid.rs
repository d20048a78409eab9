//! Resolved per-sheet grids, built once at load time.
//!
//! A [`SheetGrid`] pairs a sheet's [`MergeMap`] with its value-bearing display cells in
//! row-major order. Search and navigation both walk these entries.

use crate::error::Result;
use crate::merge::{self, MergeMap};
use crate::types::{
    CellCoord, DisplayCell, DisplayGrid, GridSlot, Sheet, SheetState, Workbook,
};

/// A value-bearing display cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridEntry {
    pub cell: DisplayCell,
    pub text: String,
    /// Lowercased `text`, for case-insensitive matching.
    folded: String,
}

impl GridEntry {
    fn new(cell: DisplayCell, text: String) -> Self {
        let folded = text.to_lowercase();
        Self { cell, text, folded }
    }

    #[must_use]
    pub const fn anchor(&self) -> CellCoord {
        self.cell.anchor
    }

    /// Case-insensitive substring test; `needle` must already be lowercased.
    #[must_use]
    pub fn contains_folded(&self, needle: &str) -> bool {
        self.folded.contains(needle)
    }
}

#[derive(Debug, Clone)]
pub struct SheetGrid {
    name: String,
    state: SheetState,
    merges: MergeMap,
    /// Sorted by anchor (row-major).
    entries: Vec<GridEntry>,
}

impl SheetGrid {
    pub fn build(sheet: &Sheet) -> Result<Self> {
        let merges = merge::resolve(sheet)?;
        let mut entries = Vec::with_capacity(sheet.cells.len());

        for (coord, value) in &sheet.cells {
            if merges.is_covered(*coord) {
                log::debug!(
                    "sheet '{}': ignoring value at {} under merge anchored at {}",
                    sheet.name,
                    coord,
                    merges.anchor_of(*coord)
                );
                continue;
            }
            if let Some(cell) = merges.display_cell(*coord) {
                entries.push(GridEntry::new(cell, value.text.clone()));
            }
        }

        Ok(Self {
            name: sheet.name.clone(),
            state: sheet.state,
            merges,
            entries,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn state(&self) -> SheetState {
        self.state
    }

    #[must_use]
    pub const fn merges(&self) -> &MergeMap {
        &self.merges
    }

    #[must_use]
    pub const fn row_count(&self) -> u32 {
        self.merges.row_count()
    }

    #[must_use]
    pub const fn col_count(&self) -> u32 {
        self.merges.col_count()
    }

    /// Value-bearing display cells in row-major order.
    #[must_use]
    pub fn entries(&self) -> &[GridEntry] {
        &self.entries
    }

    /// The entry of the display cell owning `coord`, if that cell holds a value.
    #[must_use]
    pub fn entry_at(&self, coord: CellCoord) -> Option<&GridEntry> {
        if !self.merges.in_bounds(coord) {
            return None;
        }
        let anchor = self.merges.anchor_of(coord);
        self.entries
            .binary_search_by_key(&anchor, GridEntry::anchor)
            .ok()
            .and_then(|idx| self.entries.get(idx))
    }

    /// Display text at `coord`, resolved through its anchor.
    #[must_use]
    pub fn text_at(&self, coord: CellCoord) -> Option<&str> {
        self.entry_at(coord).map(|e| e.text.as_str())
    }

    #[must_use]
    pub fn display_cell(&self, coord: CellCoord) -> Option<DisplayCell> {
        self.merges.display_cell(coord)
    }

    /// Dense rendering for the presentation layer.
    #[must_use]
    pub fn display_grid(&self) -> DisplayGrid {
        let rows = (0..self.row_count())
            .map(|row| {
                (0..self.col_count())
                    .map(|col| self.slot(CellCoord::new(row, col)))
                    .collect()
            })
            .collect();

        DisplayGrid {
            sheet_name: self.name.clone(),
            row_count: self.row_count(),
            col_count: self.col_count(),
            rows,
        }
    }

    fn slot(&self, coord: CellCoord) -> GridSlot {
        if self.merges.is_covered(coord) {
            return GridSlot::Covered {
                anchor: self.merges.anchor_of(coord),
            };
        }
        let cell = self
            .merges
            .display_cell(coord)
            .unwrap_or_else(|| DisplayCell::single(coord));
        GridSlot::Cell {
            text: self.text_at(coord).map(str::to_string),
            row_span: cell.row_span,
            col_span: cell.col_span,
        }
    }
}

/// Resolved grids for every sheet of a workbook, in workbook order.
#[derive(Debug, Clone)]
pub struct WorkbookGrid {
    sheets: Vec<SheetGrid>,
}

impl WorkbookGrid {
    /// Resolve every sheet; the first malformed sheet fails the whole workbook.
    pub fn build(workbook: &Workbook) -> Result<Self> {
        let sheets = workbook
            .sheets
            .iter()
            .map(SheetGrid::build)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { sheets })
    }

    #[must_use]
    pub fn sheets(&self) -> &[SheetGrid] {
        &self.sheets
    }

    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&SheetGrid> {
        self.sheets.iter().find(|s| s.name == name)
    }
}
