//! Worksheet parsing - parses individual sheet XML into Sheet structs.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{BufRead, BufReader, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::cell_ref::{parse_cell_range, parse_cell_ref_bytes};
use crate::error::{Result, XlfindError};
use crate::types::{CellCoord, MergeRegion, Sheet, SheetState};

use super::values::resolve_cell_value;
use super::ValueContext;

/// Sheet metadata from workbook.xml
pub(super) struct SheetInfo {
    pub name: String,
    pub path: String,
    pub state: SheetState,
}

/// Counters gathered while parsing one sheet.
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct SheetCounts {
    pub cells: u64,
    pub values: u64,
    pub merges: u64,
    pub dropped_covered: u64,
}

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Date,
    Default,
}

pub(super) fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"d" => CellTypeTag::Date,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Default,
    }
}

pub(super) fn parse_u32_bytes(value: &[u8]) -> Option<u32> {
    let mut num: u32 = 0;
    let mut seen = false;
    for &b in value {
        if !b.is_ascii_digit() {
            return None;
        }
        seen = true;
        num = num.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
    }
    seen.then_some(num)
}

/// Read the children of a `<c>` element up to its end tag.
///
/// Returns the cached `<v>` text, or the concatenated `<t>` runs of an inline `<is>` string.
/// Formula text in `<f>` is ignored.
fn read_cell_payload<B: BufRead>(xml: &mut Reader<B>, buf: &mut Vec<u8>) -> Result<Option<String>> {
    let mut value: Option<String> = None;
    let mut collecting = false;
    let mut in_inline = false;
    let mut in_phonetic = false;

    loop {
        buf.clear();
        match xml.read_event_into(buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"v" => {
                    collecting = true;
                    value.get_or_insert_with(String::new);
                }
                b"is" => {
                    in_inline = true;
                    value.get_or_insert_with(String::new);
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_inline && !in_phonetic => collecting = true,
                _ => {}
            },
            Event::Text(ref t) if collecting => {
                if let Some(v) = value.as_mut() {
                    v.push_str(&t.unescape()?);
                }
            }
            Event::CData(ref t) if collecting => {
                if let Some(v) = value.as_mut() {
                    v.push_str(&String::from_utf8_lossy(t));
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => collecting = false,
                b"rPh" => in_phonetic = false,
                b"is" => in_inline = false,
                b"c" => break,
                _ => {}
            },
            Event::Eof => {
                return Err(XlfindError::Parse(
                    "worksheet ended inside a cell".to_string(),
                ));
            }
            _ => {}
        }
    }

    Ok(value)
}

/// Parse a single worksheet
pub(super) fn parse_sheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    info: &SheetInfo,
    ctx: &ValueContext<'_>,
) -> Result<(Sheet, SheetCounts)> {
    let file = archive.by_name(&info.path).map_err(|e| match e {
        ZipError::FileNotFound => XlfindError::Parse(format!(
            "worksheet part '{}' for sheet '{}' is missing",
            info.path, info.name
        )),
        other => other.into(),
    })?;

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut sheet = Sheet::new(info.name.clone()).with_state(info.state);
    let mut counts = SheetCounts::default();

    let mut buf = Vec::new();
    let mut cell_buf = Vec::new();
    // 1-based row of the current <row>; cells without an `r` attribute follow on
    let mut current_row: u32 = 0;
    let mut next_col: u32 = 0;

    loop {
        match xml.read_event_into(&mut buf)? {
            ref event @ (Event::Start(ref e) | Event::Empty(ref e)) => {
                let is_start_event = matches!(event, Event::Start(_));

                match e.local_name().as_ref() {
                    b"row" => {
                        let explicit = e
                            .attributes()
                            .flatten()
                            .find(|a| a.key.as_ref() == b"r")
                            .and_then(|a| parse_u32_bytes(&a.value));
                        current_row = explicit.unwrap_or_else(|| current_row.saturating_add(1));
                        next_col = 0;
                    }

                    b"c" => {
                        let mut coord: Option<CellCoord> = None;
                        let mut cell_type = CellTypeTag::Default;
                        let mut style_idx: Option<u32> = None;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => {
                                    coord = Some(parse_cell_ref_bytes(&attr.value).ok_or_else(
                                        || {
                                            XlfindError::CellRef(format!(
                                                "'{}' on sheet '{}'",
                                                String::from_utf8_lossy(&attr.value),
                                                info.name
                                            ))
                                        },
                                    )?);
                                }
                                b"t" => cell_type = parse_cell_type_tag(&attr.value),
                                b"s" => style_idx = parse_u32_bytes(&attr.value),
                                _ => {}
                            }
                        }

                        let coord = coord.unwrap_or_else(|| {
                            CellCoord::new(current_row.saturating_sub(1), next_col)
                        });
                        next_col = coord.col.saturating_add(1);

                        // Empty/self-closing cells like <c r="A1"/> have no child elements
                        let raw = if is_start_event {
                            read_cell_payload(&mut xml, &mut cell_buf)?
                        } else {
                            None
                        };

                        let format = style_idx
                            .and_then(|idx| ctx.formats.get(idx as usize))
                            .copied()
                            .unwrap_or_default();

                        sheet.extend_bounds(coord);
                        counts.cells = counts.cells.saturating_add(1);

                        if let Some(value) = resolve_cell_value(
                            raw.as_deref(),
                            cell_type,
                            ctx.shared_strings,
                            format,
                            ctx.date1904,
                        )? {
                            sheet.insert_value(coord, value);
                            counts.values = counts.values.saturating_add(1);
                        }
                    }

                    b"mergeCell" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() != b"ref" {
                                continue;
                            }
                            let ref_str = String::from_utf8_lossy(&attr.value);
                            match parse_cell_range(&ref_str) {
                                Some((start, end)) => {
                                    sheet.add_merge(MergeRegion::from_corners(start, end));
                                    counts.merges = counts.merges.saturating_add(1);
                                }
                                None => log::warn!(
                                    "sheet '{}': ignoring unparseable merge ref '{}'",
                                    info.name,
                                    ref_str
                                ),
                            }
                        }
                    }

                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let dropped = sheet.drop_covered_values();
    if dropped > 0 {
        log::debug!(
            "sheet '{}': dropped {} value(s) stored under merged regions",
            info.name,
            dropped
        );
    }
    counts.dropped_covered = dropped as u64;
    counts.values = counts.values.saturating_sub(dropped as u64);

    Ok((sheet, counts))
}
