//! Merge resolution: maps every raw coordinate of a sheet to the display cell that owns it.
//!
//! Resolution runs once per sheet at load time. Regions are clamped to the sheet bounds first;
//! two regions claiming the same coordinate fail the resolution instead of picking a winner,
//! even when one of them covers a single cell.

use std::collections::HashMap;

use crate::error::{Result, XlfindError};
use crate::types::{CellCoord, DisplayCell, MergeRegion, Sheet};

/// Column intervals `(min_col, max_col, region index)` of one row, sorted and disjoint.
type RowSpans = Vec<(u32, u32, usize)>;

/// Index of the interval in `spans` that intersects `min_col..=max_col`, if any.
fn find_span(spans: &[(u32, u32, usize)], min_col: u32, max_col: u32) -> Option<usize> {
    // disjoint and sorted by start, so the last interval starting at or before `max_col`
    // also reaches furthest right
    let pos = spans.partition_point(|&(start, _, _)| start <= max_col);
    let &(_, end, idx) = spans.get(pos.checked_sub(1)?)?;
    (end >= min_col).then_some(idx)
}

fn insert_span(rows: &mut HashMap<u32, RowSpans>, region: &MergeRegion, idx: usize) {
    for row in region.min_row..=region.max_row {
        let spans = rows.entry(row).or_default();
        let pos = spans.partition_point(|&(start, _, _)| start < region.min_col);
        spans.insert(pos, (region.min_col, region.max_col, idx));
    }
}

/// Resolved merge layout of one sheet.
#[derive(Debug, Clone, Default)]
pub struct MergeMap {
    row_count: u32,
    col_count: u32,
    /// Clamped multi-cell regions, in source order.
    regions: Vec<MergeRegion>,
    /// Row -> column spans of the regions crossing it
    rows: HashMap<u32, RowSpans>,
}

/// Resolve a sheet's merge regions.
///
/// Fails with [`XlfindError::MalformedMerge`] when two regions overlap after clamping.
pub fn resolve(sheet: &Sheet) -> Result<MergeMap> {
    MergeMap::build(&sheet.name, sheet.row_count, sheet.col_count, &sheet.merges)
}

impl MergeMap {
    /// Clamp and validate `merges`. Single-cell regions take part in the overlap check
    /// but merge nothing.
    pub fn build(
        sheet_name: &str,
        row_count: u32,
        col_count: u32,
        merges: &[MergeRegion],
    ) -> Result<Self> {
        let mut clamped: Vec<MergeRegion> = Vec::with_capacity(merges.len());
        let mut claimed: HashMap<u32, RowSpans> = HashMap::new();

        for raw in merges {
            let Some(region) = raw.clamp(row_count, col_count) else {
                log::debug!("sheet '{sheet_name}': merge region {raw} lies outside the sheet");
                continue;
            };

            for row in region.min_row..=region.max_row {
                let existing = claimed
                    .get(&row)
                    .and_then(|spans| find_span(spans, region.min_col, region.max_col));
                if let Some(existing) = existing {
                    let first = clamped.get(existing).copied().unwrap_or(region);
                    return Err(XlfindError::MalformedMerge {
                        sheet: sheet_name.to_string(),
                        first,
                        second: region,
                    });
                }
            }
            insert_span(&mut claimed, &region, clamped.len());
            clamped.push(region);
        }

        let regions: Vec<MergeRegion> = clamped
            .into_iter()
            .filter(|region| !region.is_single_cell())
            .collect();
        let mut rows = HashMap::new();
        for (idx, region) in regions.iter().enumerate() {
            insert_span(&mut rows, region, idx);
        }

        Ok(Self {
            row_count,
            col_count,
            regions,
            rows,
        })
    }

    #[must_use]
    pub const fn row_count(&self) -> u32 {
        self.row_count
    }

    #[must_use]
    pub const fn col_count(&self) -> u32 {
        self.col_count
    }

    #[must_use]
    pub const fn in_bounds(&self, coord: CellCoord) -> bool {
        coord.row < self.row_count && coord.col < self.col_count
    }

    /// Clamped, validated regions in source order.
    #[must_use]
    pub fn regions(&self) -> &[MergeRegion] {
        &self.regions
    }

    fn region_at(&self, coord: CellCoord) -> Option<&MergeRegion> {
        self.rows
            .get(&coord.row)
            .and_then(|spans| find_span(spans, coord.col, coord.col))
            .and_then(|idx| self.regions.get(idx))
    }

    /// The display cell owning `coord`; `None` outside the sheet bounds.
    #[must_use]
    pub fn display_cell(&self, coord: CellCoord) -> Option<DisplayCell> {
        if !self.in_bounds(coord) {
            return None;
        }
        Some(
            self.region_at(coord)
                .map_or_else(|| DisplayCell::single(coord), DisplayCell::from_region),
        )
    }

    /// Anchor of the display cell owning `coord` (the coordinate itself when unmerged).
    #[must_use]
    pub fn anchor_of(&self, coord: CellCoord) -> CellCoord {
        self.region_at(coord).map_or(coord, MergeRegion::anchor)
    }

    /// Whether `coord` lies inside a merge region without being its anchor.
    #[must_use]
    pub fn is_covered(&self, coord: CellCoord) -> bool {
        self.region_at(coord)
            .is_some_and(|region| region.anchor() != coord)
    }

    /// Every display cell of the sheet in row-major order by anchor.
    pub fn display_cells(&self) -> impl Iterator<Item = DisplayCell> + '_ {
        (0..self.row_count)
            .flat_map(move |row| (0..self.col_count).map(move |col| CellCoord::new(row, col)))
            .filter(|coord| !self.is_covered(*coord))
            .filter_map(|coord| self.display_cell(coord))
    }
}
