//! Utilities for parsing and formatting Excel-style cell references and ranges.

use crate::types::CellCoord;

/// Largest 1-based column index Excel allows (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;
/// Largest 1-based row index Excel allows.
pub const MAX_ROW: u32 = 1_048_576;

/// Parse a cell reference from raw bytes (ASCII) into a 0-based coordinate.
///
/// Accepts `A1`, `ab12` and absolute forms like `$B$3`. Letters must come before digits,
/// and both parts must be present and within Excel's limits.
pub fn parse_cell_ref_bytes(ref_bytes: &[u8]) -> Option<CellCoord> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in ref_bytes {
        match b {
            b'$' => {}
            b'A'..=b'Z' | b'a'..=b'z' if !saw_row => {
                let upper = b.to_ascii_uppercase();
                col = col
                    .checked_mul(26)?
                    .checked_add(u32::from(upper - b'A') + 1)?;
                saw_col = true;
            }
            b'0'..=b'9' => {
                row = row.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
                saw_row = true;
            }
            _ => return None,
        }
    }

    if !saw_col || !saw_row || col == 0 || row == 0 || col > MAX_COLUMN || row > MAX_ROW {
        return None;
    }

    Some(CellCoord::new(row - 1, col - 1))
}

/// Parse a cell reference like "B3" into a 0-based coordinate.
pub fn parse_cell_ref(cell_ref: &str) -> Option<CellCoord> {
    parse_cell_ref_bytes(cell_ref.trim().as_bytes())
}

/// Parse a cell range like "A1:B10" (or a single cell "A1") into its two corners.
///
/// The corners are returned as written; callers normalize reversed ranges.
pub fn parse_cell_range(range: &str) -> Option<(CellCoord, CellCoord)> {
    if let Some((start, end)) = range.split_once(':') {
        Some((parse_cell_ref(start)?, parse_cell_ref(end)?))
    } else {
        let cell = parse_cell_ref(range)?;
        Some((cell, cell))
    }
}

/// Column letters for a 0-based column index (0 → "A", 26 → "AA").
pub fn column_letters(col: u32) -> String {
    let mut n = u64::from(col) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26, so the addition stays in ASCII range
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Render a 0-based coordinate as an A1 reference.
pub fn format_cell_ref(coord: CellCoord) -> String {
    format!("{}{}", column_letters(coord.col), u64::from(coord.row) + 1)
}
