//! Resolving a selected search result back to a cell.
//!
//! Content mode ([`navigate`]) finds the first display cell, in row-major order, whose text
//! equals the hit's content exactly. Coordinate mode ([`navigate_located`]) trusts the carried
//! anchor, but only while the cell there still holds that content.

use crate::error::{Result, XlfindError};
use crate::grid::{SheetGrid, WorkbookGrid};
use crate::types::{LocatedHit, NavigationTarget, SearchHit};

fn sheet_for<'a>(grid: &'a WorkbookGrid, sheet_name: &str) -> Result<&'a SheetGrid> {
    grid.sheet(sheet_name)
        .ok_or_else(|| XlfindError::UnknownSheet(sheet_name.to_string()))
}

fn not_found(hit: &SearchHit) -> XlfindError {
    XlfindError::NavigationNotFound {
        sheet: hit.sheet_name.clone(),
        content: hit.content.clone(),
    }
}

/// First display cell on the hit's sheet whose text equals the hit content.
pub fn navigate(grid: &WorkbookGrid, hit: &SearchHit) -> Result<NavigationTarget> {
    let sheet = sheet_for(grid, &hit.sheet_name)?;
    sheet
        .entries()
        .iter()
        .find(|entry| entry.text == hit.content)
        .map(|entry| NavigationTarget::new(sheet.name(), entry.anchor()))
        .ok_or_else(|| not_found(hit))
}

/// Navigate to the coordinate a hit was found at.
pub fn navigate_located(grid: &WorkbookGrid, hit: &LocatedHit) -> Result<NavigationTarget> {
    let sheet = sheet_for(grid, hit.sheet_name())?;
    match sheet.entry_at(hit.coord) {
        Some(entry) if entry.text == hit.content() => {
            Ok(NavigationTarget::new(sheet.name(), entry.anchor()))
        }
        _ => Err(not_found(&hit.hit)),
    }
}
