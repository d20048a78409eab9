//! Package-level parts: workbook relationships, sheet list, shared strings, and the
//! cell-format table from xl/styles.xml.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{Result, XlfindError};
use crate::numfmt::{resolve_value_format, ValueFormat};
use crate::types::SheetState;

use super::worksheet::SheetInfo;

/// Workbook relationships parsed from xl/_rels/workbook.xml.rels
///
/// Paths are resolved relative to the xl/ directory and stored as full paths.
#[derive(Default, Debug)]
pub(super) struct WorkbookRelationships {
    /// Map of rId -> full path for worksheet relationships
    /// e.g., "rId1" -> "xl/worksheets/sheet1.xml"
    pub worksheets: HashMap<String, String>,
    /// Path to shared strings file (e.g., "xl/sharedStrings.xml")
    pub shared_strings: Option<String>,
    /// Path to styles file (e.g., "xl/styles.xml")
    pub styles: Option<String>,
}

fn attr_string(value: &[u8]) -> String {
    String::from_utf8_lossy(value).into_owned()
}

/// Resolve a relationship target against the xl/ directory.
fn resolve_target(target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        stripped.to_string()
    } else if target.starts_with("xl/") {
        target.to_string()
    } else {
        format!("xl/{target}")
    }
}

/// Open an optional package part; a missing part is `Ok(None)`.
fn open_optional<'a, R: Read + Seek>(
    archive: &'a mut ZipArchive<R>,
    path: &str,
) -> Result<Option<zip::read::ZipFile<'a>>> {
    match archive.by_name(path) {
        Ok(file) => Ok(Some(file)),
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Parse workbook relationships from xl/_rels/workbook.xml.rels
pub(super) fn parse_workbook_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<WorkbookRelationships> {
    let mut rels = WorkbookRelationships::default();

    let Some(file) = open_optional(archive, "xl/_rels/workbook.xml.rels")? else {
        return Ok(rels); // Relationships file is optional
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut id = String::new();
                    let mut target = String::new();
                    let mut rel_type = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = attr_string(&attr.value),
                            b"Target" => target = attr_string(&attr.value),
                            b"Type" => rel_type = attr_string(&attr.value),
                            _ => {}
                        }
                    }

                    if !target.is_empty() {
                        let full_path = resolve_target(&target);
                        if rel_type.ends_with("/worksheet") && !id.is_empty() {
                            rels.worksheets.insert(id, full_path);
                        } else if rel_type.ends_with("/sharedStrings") {
                            rels.shared_strings = Some(full_path);
                        } else if rel_type.ends_with("/styles") {
                            rels.styles = Some(full_path);
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Get sheet names, paths, and states from xl/workbook.xml, plus the date1904 flag.
pub(super) fn get_sheet_info<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    relationships: &HashMap<String, String>,
) -> Result<(Vec<SheetInfo>, bool)> {
    let Some(file) = open_optional(archive, "xl/workbook.xml")? else {
        return Err(XlfindError::Parse(
            "not a workbook: xl/workbook.xml is missing".to_string(),
        ));
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);

    let mut sheets: Vec<SheetInfo> = Vec::new();
    let mut date1904 = false;
    // 1-based index of each <sheet> entry, named or not
    let mut position: usize = 0;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) => match e.local_name().as_ref() {
                b"workbookPr" => {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"date1904" {
                            let val = attr_string(&attr.value);
                            date1904 = val == "1" || val.eq_ignore_ascii_case("true");
                        }
                    }
                }
                b"sheet" => {
                    let mut name = String::new();
                    let mut r_id = String::new();
                    let mut state = SheetState::Visible;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = attr
                                    .unescape_value()
                                    .map(|v| v.into_owned())
                                    .unwrap_or_else(|_| attr_string(&attr.value));
                            }
                            b"state" => {
                                state = match attr.value.as_ref() {
                                    b"hidden" => SheetState::Hidden,
                                    b"veryHidden" => SheetState::VeryHidden,
                                    _ => SheetState::Visible,
                                };
                            }
                            // r:id attribute (namespace prefixed)
                            key if key.ends_with(b":id") || key == b"id" => {
                                r_id = attr_string(&attr.value);
                            }
                            _ => {}
                        }
                    }

                    position += 1;
                    if name.is_empty() {
                        log::warn!("skipping unnamed sheet entry {position} (r:id '{r_id}')");
                    } else if sheets.iter().any(|s| s.name == name) {
                        return Err(XlfindError::Parse(format!(
                            "duplicate sheet name '{name}'"
                        )));
                    } else {
                        // Fall back to the conventional part name when the rId is unresolved
                        let path = relationships
                            .get(&r_id)
                            .cloned()
                            .unwrap_or_else(|| format!("xl/worksheets/sheet{position}.xml"));
                        sheets.push(SheetInfo { name, path, state });
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((sheets, date1904))
}

/// Parse shared strings; rich-text runs are concatenated, phonetic runs are skipped.
pub(super) fn parse_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Result<Vec<String>> {
    let sst_path = path.unwrap_or("xl/sharedStrings.xml");
    let Some(file) = open_optional(archive, sst_path)? else {
        return Ok(Vec::new()); // SharedStrings is optional
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut in_phonetic = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_t = true,
                _ => {}
            },
            Event::Empty(ref e) => {
                // <si/> is an empty string entry and still takes an index
                if e.local_name().as_ref() == b"si" {
                    strings.push(String::new());
                }
            }
            Event::Text(ref e) if in_t => current.push_str(&e.unescape()?),
            Event::CData(ref e) if in_t => current.push_str(&String::from_utf8_lossy(e)),
            Event::End(ref e) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_si = false;
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// Read the value format of every cell format (`cellXfs/xf`), indexed by style id.
pub(super) fn parse_value_formats<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Result<Vec<ValueFormat>> {
    let styles_path = path.unwrap_or("xl/styles.xml");
    let Some(file) = open_optional(archive, styles_path)? else {
        return Ok(Vec::new());
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);

    let mut custom: HashMap<u32, String> = HashMap::new();
    let mut xf_format_ids: Vec<u32> = Vec::new();
    let mut in_num_fmts = false;
    let mut in_cell_xfs = false;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            ref event @ (Event::Start(ref e) | Event::Empty(ref e)) => {
                let is_start = matches!(event, Event::Start(_));
                match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = is_start,
                    b"cellXfs" => in_cell_xfs = is_start,
                    b"numFmt" if in_num_fmts => {
                        let mut id: Option<u32> = None;
                        let mut code = String::new();
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"numFmtId" => id = attr_string(&attr.value).parse().ok(),
                                b"formatCode" => {
                                    code = attr
                                        .unescape_value()
                                        .map(|v| v.into_owned())
                                        .unwrap_or_else(|_| attr_string(&attr.value));
                                }
                                _ => {}
                            }
                        }
                        if let Some(id) = id {
                            custom.insert(id, code);
                        }
                    }
                    b"xf" if in_cell_xfs => {
                        let id = e
                            .attributes()
                            .flatten()
                            .find(|a| a.key.as_ref() == b"numFmtId")
                            .and_then(|a| attr_string(&a.value).parse().ok())
                            .unwrap_or(0);
                        xf_format_ids.push(id);
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"numFmts" => in_num_fmts = false,
                b"cellXfs" => in_cell_xfs = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(xf_format_ids
        .into_iter()
        .map(|id| resolve_value_format(id, &custom))
        .collect())
}
