//! Cross-sheet text search.
//!
//! Every query produces a fresh [`SearchResults`]: the ordered hit list plus the highlight
//! state of every display cell. Results are never diffed against a previous query.

use std::collections::{HashMap, HashSet};

use crate::grid::{SheetGrid, WorkbookGrid};
use crate::types::{CellCoord, Highlight, LocatedHit, SearchHit};

/// Outcome of one query over the visible sheets of a workbook.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    query: String,
    hits: Vec<LocatedHit>,
    /// Sheets that took part in the search (all visible sheets, even for a blank query)
    searched: HashSet<String>,
    /// Matched anchors per sheet
    matched: HashMap<String, HashSet<CellCoord>>,
}

impl SearchResults {
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Hits in workbook order, then row-major order within each sheet.
    #[must_use]
    pub fn hits(&self) -> &[LocatedHit] {
        &self.hits
    }

    /// The content-identified form of [`SearchResults::hits`].
    #[must_use]
    pub fn search_hits(&self) -> Vec<SearchHit> {
        self.hits.iter().map(|h| h.hit.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Highlight for the display cell owning `coord` on `sheet`.
    #[must_use]
    pub fn highlight(&self, sheet: &SheetGrid, coord: CellCoord) -> Highlight {
        if !self.searched.contains(sheet.name()) {
            return Highlight::NotApplicable;
        }
        let Some(entry) = sheet.entry_at(coord) else {
            return Highlight::NotApplicable;
        };
        let is_match = self
            .matched
            .get(sheet.name())
            .is_some_and(|anchors| anchors.contains(&entry.anchor()));
        if is_match {
            Highlight::Match
        } else {
            Highlight::Normal
        }
    }

    /// Highlight of every value-bearing display cell of `sheet`, by anchor in row-major order.
    ///
    /// Cells not listed are `NotApplicable`.
    #[must_use]
    pub fn highlights(&self, sheet: &SheetGrid) -> Vec<(CellCoord, Highlight)> {
        sheet
            .entries()
            .iter()
            .map(|e| (e.anchor(), self.highlight(sheet, e.anchor())))
            .collect()
    }
}

/// Whether `query` is blank and therefore matches nothing.
#[must_use]
pub fn is_blank_query(query: &str) -> bool {
    query.trim().is_empty()
}

fn search_sheet(sheet: &SheetGrid, needle: &str) -> Vec<LocatedHit> {
    sheet
        .entries()
        .iter()
        .filter(|entry| entry.contains_folded(needle))
        .map(|entry| LocatedHit {
            hit: SearchHit::new(sheet.name(), entry.text.clone()),
            coord: entry.anchor(),
        })
        .collect()
}

/// Case-insensitive substring search over every display cell of the visible sheets.
///
/// Sheets named in `hidden` are skipped entirely; their cells never match and never carry
/// a highlight. A blank query yields no hits and resets every highlight.
#[must_use]
pub fn search(grid: &WorkbookGrid, query: &str, hidden: &HashSet<String>) -> SearchResults {
    let visible: Vec<&SheetGrid> = grid
        .sheets()
        .iter()
        .filter(|s| !hidden.contains(s.name()))
        .collect();

    let searched = visible.iter().map(|s| s.name().to_string()).collect();

    if is_blank_query(query) {
        return SearchResults {
            query: query.to_string(),
            hits: Vec::new(),
            searched,
            matched: HashMap::new(),
        };
    }

    let needle = query.to_lowercase();

    #[cfg(feature = "parallel")]
    let per_sheet: Vec<Vec<LocatedHit>> = {
        use rayon::prelude::*;
        visible
            .par_iter()
            .map(|sheet| search_sheet(sheet, &needle))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let per_sheet: Vec<Vec<LocatedHit>> = visible
        .iter()
        .map(|sheet| search_sheet(sheet, &needle))
        .collect();

    let hits: Vec<LocatedHit> = per_sheet.into_iter().flatten().collect();

    let mut matched: HashMap<String, HashSet<CellCoord>> = HashMap::new();
    for hit in &hits {
        matched
            .entry(hit.hit.sheet_name.clone())
            .or_default()
            .insert(hit.coord);
    }

    log::debug!(
        "query {:?}: {} hit(s) across {} visible sheet(s)",
        query,
        hits.len(),
        visible.len()
    );

    SearchResults {
        query: query.to_string(),
        hits,
        searched,
        matched,
    }
}
