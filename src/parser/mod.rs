//! Main XLSX parser
//!
//! Orchestrates the parsing of all components from the ZIP archive.

mod relationships;
mod values;
mod worksheet;

use serde::Serialize;
use std::io::Cursor;
use std::time::Instant;
use zip::ZipArchive;

use crate::error::Result;
use crate::numfmt::ValueFormat;
use crate::types::Workbook;

use relationships::{
    get_sheet_info, parse_shared_strings, parse_value_formats, parse_workbook_relationships,
};
use worksheet::parse_sheet;

/// Lookup tables shared by every worksheet of one workbook.
pub(crate) struct ValueContext<'a> {
    pub shared_strings: &'a [String],
    /// Value format per cell-format index (`s` attribute of `<c>`).
    pub formats: &'a [ValueFormat],
    pub date1904: bool,
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Timing and size metrics for one workbook parse.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseMetrics {
    pub parse_ms: f64,
    pub relationships_ms: f64,
    pub shared_strings_ms: f64,
    pub styles_ms: f64,
    pub workbook_info_ms: f64,
    pub sheets_ms: f64,
    pub sheets_count: u64,
    pub shared_strings_count: u64,
    pub total_cells: u64,
    pub total_values: u64,
    pub total_merges: u64,
    pub sheets: Vec<SheetParseMetrics>,
}

/// Per-sheet metrics.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetParseMetrics {
    pub name: String,
    pub parse_ms: f64,
    /// Every `<c>` element, with or without a value.
    pub cell_count: u64,
    pub value_count: u64,
    pub merge_count: u64,
    /// Values discarded because they sat under a merge region's non-anchor cells.
    pub dropped_covered: u64,
    pub row_count: u64,
    pub col_count: u64,
}

/// Parse an XLSX file from already-decrypted bytes.
pub fn parse(data: &[u8]) -> Result<Workbook> {
    parse_internal(data, None)
}

/// Parse an XLSX file from bytes and return detailed timing metrics.
pub fn parse_with_metrics(data: &[u8]) -> Result<(Workbook, ParseMetrics)> {
    let mut metrics = ParseMetrics::default();
    let workbook = parse_internal(data, Some(&mut metrics))?;
    Ok((workbook, metrics))
}

fn parse_internal(data: &[u8], mut metrics: Option<&mut ParseMetrics>) -> Result<Workbook> {
    let total_start = Instant::now();

    let cursor = Cursor::new(data);
    let mut archive = ZipArchive::new(cursor)?;

    // Parse workbook relationships first to get actual file paths
    let relationships_start = Instant::now();
    let relationships = parse_workbook_relationships(&mut archive)?;
    if let Some(m) = metrics.as_mut() {
        m.relationships_ms = elapsed_ms(relationships_start);
    }

    let shared_strings_start = Instant::now();
    let shared_strings =
        parse_shared_strings(&mut archive, relationships.shared_strings.as_deref())?;
    if let Some(m) = metrics.as_mut() {
        m.shared_strings_count = shared_strings.len() as u64;
        m.shared_strings_ms = elapsed_ms(shared_strings_start);
    }

    let styles_start = Instant::now();
    let formats = parse_value_formats(&mut archive, relationships.styles.as_deref())?;
    if let Some(m) = metrics.as_mut() {
        m.styles_ms = elapsed_ms(styles_start);
    }

    // Get sheet names, paths, states, and date1904 flag from workbook.xml
    let workbook_info_start = Instant::now();
    let (sheet_info, date1904) = get_sheet_info(&mut archive, &relationships.worksheets)?;
    if let Some(m) = metrics.as_mut() {
        m.sheets_count = sheet_info.len() as u64;
        m.workbook_info_ms = elapsed_ms(workbook_info_start);
    }

    let ctx = ValueContext {
        shared_strings: &shared_strings,
        formats: &formats,
        date1904,
    };

    let mut sheets = Vec::with_capacity(sheet_info.len());
    let sheets_start = Instant::now();
    for info in &sheet_info {
        let sheet_start = Instant::now();
        let (sheet, counts) = parse_sheet(&mut archive, info, &ctx)?;
        let sheet_ms = elapsed_ms(sheet_start);

        log::debug!(
            "parsed sheet '{}' in {:.2}ms: {} cells, {} values, {} merges, {}x{}",
            sheet.name,
            sheet_ms,
            counts.cells,
            counts.values,
            counts.merges,
            sheet.row_count,
            sheet.col_count
        );

        if let Some(m) = metrics.as_mut() {
            m.total_cells = m.total_cells.saturating_add(counts.cells);
            m.total_values = m.total_values.saturating_add(counts.values);
            m.total_merges = m.total_merges.saturating_add(counts.merges);
            m.sheets.push(SheetParseMetrics {
                name: sheet.name.clone(),
                parse_ms: sheet_ms,
                cell_count: counts.cells,
                value_count: counts.values,
                merge_count: counts.merges,
                dropped_covered: counts.dropped_covered,
                row_count: u64::from(sheet.row_count),
                col_count: u64::from(sheet.col_count),
            });
        }

        sheets.push(sheet);
    }
    if let Some(m) = metrics.as_mut() {
        m.sheets_ms = elapsed_ms(sheets_start);
    }

    let mut workbook = Workbook::new(sheets)?;
    workbook.date1904 = date1904;

    let parse_ms = elapsed_ms(total_start);
    if let Some(m) = metrics.as_mut() {
        m.parse_ms = parse_ms;
    }
    log::debug!(
        "parsed workbook in {:.2}ms: {} sheets, {} shared strings",
        parse_ms,
        workbook.sheets.len(),
        shared_strings.len()
    );

    Ok(workbook)
}
