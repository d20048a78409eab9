use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{CellCoord, CellValue, MergeRegion};
use crate::error::{Result, XlfindError};

/// Sheet visibility state as recorded in the workbook
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SheetState {
    #[default]
    Visible,
    Hidden,
    VeryHidden,
}

/// A single worksheet: a sparse logical grid plus its merge regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    /// Unique within the workbook; the stable key for this sheet.
    pub name: String,
    pub state: SheetState,
    /// One past the highest used row index.
    pub row_count: u32,
    /// One past the highest used column index.
    pub col_count: u32,
    /// Only value-bearing coordinates have entries.
    pub cells: BTreeMap<CellCoord, CellValue>,
    /// Merge regions as read from the source (not yet clamped or validated).
    pub merges: Vec<MergeRegion>,
}

impl Sheet {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: SheetState::Visible,
            row_count: 0,
            col_count: 0,
            cells: BTreeMap::new(),
            merges: Vec::new(),
        }
    }

    /// Grow the sheet bounds so that `coord` is inside them.
    pub fn extend_bounds(&mut self, coord: CellCoord) {
        self.row_count = self.row_count.max(coord.row.saturating_add(1));
        self.col_count = self.col_count.max(coord.col.saturating_add(1));
    }

    /// Store a value; empty text is treated as an absent cell.
    pub fn insert_value(&mut self, coord: CellCoord, value: CellValue) {
        self.extend_bounds(coord);
        if value.text.is_empty() {
            self.cells.remove(&coord);
        } else {
            self.cells.insert(coord, value);
        }
    }

    pub fn add_merge(&mut self, region: MergeRegion) {
        self.merges.push(region);
    }

    /// Builder-style [`Sheet::insert_value`].
    #[must_use]
    pub fn with_cell(mut self, coord: CellCoord, value: CellValue) -> Self {
        self.insert_value(coord, value);
        self
    }

    /// Builder-style [`Sheet::add_merge`].
    #[must_use]
    pub fn with_merge(mut self, region: MergeRegion) -> Self {
        self.add_merge(region);
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: SheetState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn value_at(&self, coord: CellCoord) -> Option<&CellValue> {
        self.cells.get(&coord)
    }

    /// Remove values stored at merged coordinates other than the region's anchor.
    ///
    /// Returns how many values were removed.
    pub fn drop_covered_values(&mut self) -> usize {
        let mut covered = Vec::new();
        for region in self.merges.iter().filter_map(|m| m.clamp(self.row_count, self.col_count)) {
            let anchor = region.anchor();
            for row in region.min_row..=region.max_row {
                let lo = CellCoord::new(row, region.min_col);
                let hi = CellCoord::new(row, region.max_col);
                covered.extend(
                    self.cells
                        .range(lo..=hi)
                        .map(|(coord, _)| *coord)
                        .filter(|coord| *coord != anchor),
                );
            }
        }
        covered
            .iter()
            .filter(|coord| self.cells.remove(*coord).is_some())
            .count()
    }
}

/// A complete workbook: sheets in source order. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    /// Whether the workbook uses the 1904 date system (Mac default)
    pub date1904: bool,
}

impl Workbook {
    /// Assemble a workbook, rejecting duplicate sheet names.
    pub fn new(sheets: Vec<Sheet>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(sheets.len());
        for sheet in &sheets {
            if !seen.insert(sheet.name.as_str()) {
                return Err(XlfindError::Parse(format!(
                    "duplicate sheet name '{}'",
                    sheet.name
                )));
            }
        }
        Ok(Self {
            sheets,
            date1904: false,
        })
    }

    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }
}
