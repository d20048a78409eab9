//! Value resolution - turns a raw `<c>` payload into the text a reader sees.

use crate::error::{Result, XlfindError};
use crate::numfmt::{format_date_value, format_general, ValueFormat};
use crate::types::{CellType, CellValue};

use super::worksheet::CellTypeTag;

/// Resolve a cell's display value. `None` means the cell holds no value.
pub(super) fn resolve_cell_value(
    raw_value: Option<&str>,
    cell_type: CellTypeTag,
    shared_strings: &[String],
    format: ValueFormat,
    date1904: bool,
) -> Result<Option<CellValue>> {
    let Some(v) = raw_value else {
        return Ok(None);
    };

    let value = match cell_type {
        CellTypeTag::Shared => {
            let text = v
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| shared_strings.get(idx))
                .ok_or_else(|| {
                    XlfindError::Parse(format!("shared string index '{v}' out of range"))
                })?;
            CellValue::new(text.clone(), CellType::String)
        }
        CellTypeTag::Str | CellTypeTag::Inline => CellValue::new(v, CellType::String),
        CellTypeTag::Bool => match v.trim() {
            "1" | "true" => CellValue::new("TRUE", CellType::Boolean),
            "0" | "false" => CellValue::new("FALSE", CellType::Boolean),
            other => CellValue::new(other, CellType::Boolean),
        },
        CellTypeTag::Error => CellValue::new(v, CellType::Error),
        // ISO 8601 value stored directly in the cell
        CellTypeTag::Date => CellValue::new(v.trim().replacen('T', " ", 1), CellType::Date),
        CellTypeTag::Default => match v.trim().parse::<f64>() {
            Ok(num) => match format_date_value(num, format, date1904) {
                Some(text) => CellValue::new(text, CellType::Date),
                None => CellValue::new(format_general(num), CellType::Number),
            },
            Err(_) => CellValue::new(v, CellType::String),
        },
    };

    Ok((!value.text.is_empty()).then_some(value))
}
