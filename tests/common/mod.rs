//! Common test utilities and assertion helpers.
//!
//! This module provides helper functions for testing xlfind end to end:
//! loading generated workbooks, building sessions, and checking grids and hits.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use xlfind::{
    CellCoord, Highlight, Session, SessionConfig, SheetGrid, Workbook, WorkbookGrid,
};

// Re-export fixtures for convenience
pub use super::fixtures::*;

// ============================================================================
// Loading Helpers
// ============================================================================

/// Parse XLSX bytes into a workbook.
///
/// This is a test helper that panics on parse failure.
#[must_use]
pub fn load_workbook(data: &[u8]) -> Workbook {
    xlfind::parse(data).expect("Failed to parse workbook")
}

/// Parse XLSX bytes and resolve every sheet grid.
#[must_use]
pub fn load_grid(data: &[u8]) -> WorkbookGrid {
    WorkbookGrid::build(&load_workbook(data)).expect("Failed to resolve merges")
}

/// A session with `data` loaded under `config`.
#[must_use]
pub fn session_with(data: &[u8], config: SessionConfig) -> Session {
    let mut session = Session::new(config);
    session
        .load_bytes(data.to_vec(), None)
        .expect("Failed to load workbook");
    session
}

/// A session with `data` loaded under the default configuration.
#[must_use]
pub fn session_for(data: &[u8]) -> Session {
    session_with(data, SessionConfig::default())
}

/// Config that hides the given sheets for every role.
#[must_use]
pub fn hiding(sheets: &[&str]) -> SessionConfig {
    SessionConfig {
        hidden_sheets: sheets.iter().map(ToString::to_string).collect(),
        ..SessionConfig::default()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Look up a sheet grid, panicking with the sheet name if absent.
pub fn sheet<'a>(grid: &'a WorkbookGrid, name: &str) -> &'a SheetGrid {
    grid.sheet(name)
        .unwrap_or_else(|| panic!("sheet '{name}' not found"))
}

/// Assert the display text at an A1 reference.
pub fn assert_text(grid: &SheetGrid, cell_ref: &str, expected: Option<&str>) {
    let coord = coord(cell_ref);
    assert_eq!(
        grid.text_at(coord),
        expected,
        "text at {cell_ref} on sheet '{}'",
        grid.name()
    );
}

/// Parse an A1 reference, panicking on malformed input.
#[must_use]
pub fn coord(cell_ref: &str) -> CellCoord {
    xlfind::cell_ref::parse_cell_ref(cell_ref)
        .unwrap_or_else(|| panic!("bad cell reference '{cell_ref}'"))
}

/// Hits as `(sheet, content, address)` triples, for compact comparisons.
#[must_use]
pub fn hit_triples(session: &Session) -> Vec<(String, String, String)> {
    session
        .results()
        .expect("session not loaded")
        .hits()
        .iter()
        .map(|h| {
            (
                h.sheet_name().to_string(),
                h.content().to_string(),
                h.address(),
            )
        })
        .collect()
}

/// Highlight of the display cell at an A1 reference.
#[must_use]
pub fn highlight_at(session: &Session, sheet: &str, cell_ref: &str) -> Highlight {
    let c = coord(cell_ref);
    session
        .highlight(sheet, c.row, c.col)
        .expect("highlight lookup failed")
}
