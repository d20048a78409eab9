//! Test fixtures for generating valid XLSX files in memory.
//!
//! This module provides builders for creating XLSX files programmatically,
//! useful for testing the xlfind parser with known inputs.
//!
//! # Example
//!
//! ```rust
//! use fixtures::{XlsxBuilder, SheetBuilder};
//!
//! let xlsx = XlsxBuilder::new()
//!     .sheet(
//!         SheetBuilder::new("Orders")
//!             .cell("A1", "Widget")
//!             .cell("B1", 42.0)
//!             .date_cell("C1", 45000.0, "yyyy-mm-dd")
//!             .merge("A3:B4"),
//!     )
//!     .build();
//!
//! let workbook = xlfind::parse(&xlsx).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

// ============================================================================
// Cell Value
// ============================================================================

/// Represents a cell value that can be added to a sheet.
#[derive(Debug, Clone)]
pub enum CellValue {
    /// A shared string value.
    String(String),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
    /// An error value (e.g., "#DIV/0!").
    Error(String),
    /// An inline string (not shared).
    InlineString(String),
    /// A formula with a cached string result (`t="str"`).
    Formula { formula: String, cached: String },
    /// A cell element with no value.
    Empty,
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

// ============================================================================
// Sheet Builder
// ============================================================================

/// A cell in the sheet.
#[derive(Debug, Clone)]
pub struct CellEntry {
    pub cell_ref: String,
    pub value: CellValue,
    /// Number format code applied through a cell style.
    pub number_format: Option<String>,
}

/// Builder for a single worksheet.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    pub name: String,
    /// `hidden` or `veryHidden`
    pub state: Option<String>,
    pub cells: Vec<CellEntry>,
    pub merges: Vec<String>,
    pub dimension: Option<String>,
    /// Replaces the generated worksheet XML entirely.
    pub raw_xml: Option<String>,
}

impl SheetBuilder {
    /// Create a new sheet builder with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Add a cell with a value.
    #[must_use]
    pub fn cell<V: Into<CellValue>>(mut self, cell_ref: &str, value: V) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: value.into(),
            number_format: None,
        });
        self
    }

    /// Add a numeric cell rendered through a number format (e.g. a date format).
    #[must_use]
    pub fn date_cell(mut self, cell_ref: &str, serial: f64, format: &str) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: CellValue::Number(serial),
            number_format: Some(format.to_string()),
        });
        self
    }

    /// Add an inline string cell.
    #[must_use]
    pub fn inline_cell(self, cell_ref: &str, text: &str) -> Self {
        self.cell(cell_ref, CellValue::InlineString(text.to_string()))
    }

    /// Add a formula cell with a cached string result.
    #[must_use]
    pub fn formula_cell(self, cell_ref: &str, formula: &str, cached: &str) -> Self {
        self.cell(
            cell_ref,
            CellValue::Formula {
                formula: formula.to_string(),
                cached: cached.to_string(),
            },
        )
    }

    /// Add a `<c>` element without a value.
    #[must_use]
    pub fn empty_cell(self, cell_ref: &str) -> Self {
        self.cell(cell_ref, CellValue::Empty)
    }

    /// Add a merge range (e.g., "A1:B2").
    #[must_use]
    pub fn merge(mut self, range: &str) -> Self {
        self.merges.push(range.to_string());
        self
    }

    /// Mark the sheet hidden in workbook.xml.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.state = Some("hidden".to_string());
        self
    }

    /// Mark the sheet very hidden in workbook.xml.
    #[must_use]
    pub fn very_hidden(mut self) -> Self {
        self.state = Some("veryHidden".to_string());
        self
    }

    /// Write a `<dimension ref="..."/>` element.
    #[must_use]
    pub fn dimension(mut self, range: &str) -> Self {
        self.dimension = Some(range.to_string());
        self
    }

    /// Use hand-written worksheet XML instead of the generated one.
    #[must_use]
    pub fn raw_xml(mut self, xml: &str) -> Self {
        self.raw_xml = Some(xml.to_string());
        self
    }
}

// ============================================================================
// XLSX Builder
// ============================================================================

/// Builder for creating complete XLSX files.
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetBuilder>,
    date1904: bool,
}

impl XlsxBuilder {
    /// Create a new XLSX builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet.
    #[must_use]
    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Use the 1904 date system.
    #[must_use]
    pub fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        // Collect number formats and shared strings
        let mut formats = FormatCollector::default();
        let mut shared_strings: Vec<String> = Vec::new();

        for sheet in &self.sheets {
            for cell in &sheet.cells {
                if let Some(ref code) = cell.number_format {
                    formats.add(code);
                }
                if let CellValue::String(ref s) = cell.value {
                    if !shared_strings.contains(s) {
                        shared_strings.push(s.clone());
                    }
                }
            }
        }

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(generate_content_types(self.sheets.len()).as_bytes())
            .unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(generate_rels().as_bytes()).unwrap();

        zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
        zip.write_all(generate_workbook_rels(self.sheets.len()).as_bytes())
            .unwrap();

        zip.start_file("xl/workbook.xml", options).unwrap();
        zip.write_all(generate_workbook(&self.sheets, self.date1904).as_bytes())
            .unwrap();

        zip.start_file("xl/styles.xml", options).unwrap();
        zip.write_all(formats.generate_styles_xml().as_bytes())
            .unwrap();

        if !shared_strings.is_empty() {
            zip.start_file("xl/sharedStrings.xml", options).unwrap();
            zip.write_all(generate_shared_strings(&shared_strings).as_bytes())
                .unwrap();
        }

        for (i, sheet) in self.sheets.iter().enumerate() {
            let path = format!("xl/worksheets/sheet{}.xml", i + 1);
            zip.start_file(&path, options).unwrap();
            let xml = sheet
                .raw_xml
                .clone()
                .unwrap_or_else(|| generate_sheet_xml(sheet, &shared_strings, &formats));
            zip.write_all(xml.as_bytes()).unwrap();
        }

        let cursor = zip.finish().expect("Failed to finish ZIP");
        cursor.into_inner()
    }
}

// ============================================================================
// Styles
// ============================================================================

/// Collects number formats; each distinct format gets its own `cellXfs` entry.
#[derive(Debug, Default)]
struct FormatCollector {
    /// Format codes in first-seen order; xf index = position + 1 (xf 0 is General).
    codes: Vec<String>,
}

impl FormatCollector {
    fn add(&mut self, code: &str) {
        if !self.codes.iter().any(|c| c == code) {
            self.codes.push(code.to_string());
        }
    }

    fn style_index(&self, code: &str) -> usize {
        self.codes.iter().position(|c| c == code).map_or(0, |i| i + 1)
    }

    fn num_fmt_id(&self, code: &str) -> u32 {
        get_builtin_format_id(code).unwrap_or_else(|| {
            let custom_idx = self
                .codes
                .iter()
                .filter(|c| get_builtin_format_id(c).is_none())
                .position(|c| c == code)
                .unwrap_or(0);
            164 + custom_idx as u32
        })
    }

    fn generate_styles_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        let custom: Vec<&String> = self
            .codes
            .iter()
            .filter(|c| get_builtin_format_id(c).is_none())
            .collect();
        if !custom.is_empty() {
            xml.push_str(&format!(r#"<numFmts count="{}">"#, custom.len()));
            for code in custom {
                xml.push_str(&format!(
                    r#"<numFmt numFmtId="{}" formatCode="{}"/>"#,
                    self.num_fmt_id(code),
                    escape_xml(code)
                ));
            }
            xml.push_str("</numFmts>");
        }

        xml.push_str(r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>"#);
        xml.push_str(r#"<fills count="1"><fill><patternFill patternType="none"/></fill></fills>"#);
        xml.push_str(r#"<borders count="1"><border/></borders>"#);
        xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

        xml.push_str(&format!(r#"<cellXfs count="{}">"#, self.codes.len() + 1));
        xml.push_str(r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#);
        for code in &self.codes {
            xml.push_str(&format!(
                r#"<xf numFmtId="{}" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#,
                self.num_fmt_id(code)
            ));
        }
        xml.push_str("</cellXfs>");

        xml.push_str("</styleSheet>");
        xml
    }
}

/// Get the builtin format ID for common format strings.
fn get_builtin_format_id(format: &str) -> Option<u32> {
    match format {
        "General" => Some(0),
        "0" => Some(1),
        "0.00" => Some(2),
        "#,##0" => Some(3),
        "#,##0.00" => Some(4),
        "0%" => Some(9),
        "0.00%" => Some(10),
        "mm-dd-yy" => Some(14),
        "d-mmm-yy" => Some(15),
        "h:mm" => Some(20),
        "h:mm:ss" => Some(21),
        "m/d/yy h:mm" => Some(22),
        _ => None,
    }
}

// ============================================================================
// Part Generators
// ============================================================================

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Generate [Content_Types].xml
fn generate_content_types(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#);

    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i
        ));
    }

    xml.push_str("</Types>");
    xml
}

/// Generate _rels/.rels
fn generate_rels() -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#);
    xml.push_str("</Relationships>");
    xml
}

/// Generate xl/_rels/workbook.xml.rels
fn generate_workbook_rels(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    let mut rid = 1;

    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            rid, i
        ));
        rid += 1;
    }

    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        rid
    ));
    rid += 1;

    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
        rid
    ));

    xml.push_str("</Relationships>");
    xml
}

/// Generate xl/workbook.xml
fn generate_workbook(sheets: &[SheetBuilder], date1904: bool) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    if date1904 {
        xml.push_str(r#"<workbookPr date1904="1"/>"#);
    }
    xml.push_str("<sheets>");

    for (i, sheet) in sheets.iter().enumerate() {
        let state = sheet
            .state
            .as_ref()
            .map(|s| format!(r#" state="{}""#, s))
            .unwrap_or_default();
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}"{} r:id="rId{}"/>"#,
            escape_xml(&sheet.name),
            i + 1,
            state,
            i + 1
        ));
    }

    xml.push_str("</sheets>");
    xml.push_str("</workbook>");
    xml
}

/// Generate xl/sharedStrings.xml
fn generate_shared_strings(strings: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(&format!(
        r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
        strings.len(),
        strings.len()
    ));

    for s in strings {
        xml.push_str(&format!(
            r#"<si><t xml:space="preserve">{}</t></si>"#,
            escape_xml(s)
        ));
    }

    xml.push_str("</sst>");
    xml
}

/// Generate a sheet XML file
fn generate_sheet_xml(
    sheet: &SheetBuilder,
    shared_strings: &[String],
    formats: &FormatCollector,
) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );

    if let Some(ref dim) = sheet.dimension {
        xml.push_str(&format!(r#"<dimension ref="{}"/>"#, dim));
    }

    xml.push_str("<sheetData>");

    // Group cells by row
    let mut rows: std::collections::BTreeMap<u32, Vec<&CellEntry>> =
        std::collections::BTreeMap::new();
    for cell in &sheet.cells {
        let (_, row) = parse_cell_ref(&cell.cell_ref);
        rows.entry(row).or_default().push(cell);
    }

    for (row_num, cells) in rows {
        xml.push_str(&format!(r#"<row r="{}">"#, row_num));

        for cell in cells {
            let mut cell_attrs = format!(r#"r="{}""#, cell.cell_ref);

            if let Some(ref code) = cell.number_format {
                let style_idx = formats.style_index(code);
                if style_idx > 0 {
                    cell_attrs.push_str(&format!(r#" s="{}""#, style_idx));
                }
            }

            match &cell.value {
                CellValue::String(s) => {
                    let idx = shared_strings.iter().position(|x| x == s).unwrap_or(0);
                    cell_attrs.push_str(r#" t="s""#);
                    xml.push_str(&format!(r#"<c {}><v>{}</v></c>"#, cell_attrs, idx));
                }
                CellValue::Number(n) => {
                    xml.push_str(&format!(r#"<c {}><v>{}</v></c>"#, cell_attrs, n));
                }
                CellValue::Boolean(b) => {
                    cell_attrs.push_str(r#" t="b""#);
                    let v = if *b { "1" } else { "0" };
                    xml.push_str(&format!(r#"<c {}><v>{}</v></c>"#, cell_attrs, v));
                }
                CellValue::Error(e) => {
                    cell_attrs.push_str(r#" t="e""#);
                    xml.push_str(&format!(
                        r#"<c {}><v>{}</v></c>"#,
                        cell_attrs,
                        escape_xml(e)
                    ));
                }
                CellValue::InlineString(s) => {
                    cell_attrs.push_str(r#" t="inlineStr""#);
                    xml.push_str(&format!(
                        r#"<c {}><is><t>{}</t></is></c>"#,
                        cell_attrs,
                        escape_xml(s)
                    ));
                }
                CellValue::Formula { formula, cached } => {
                    cell_attrs.push_str(r#" t="str""#);
                    xml.push_str(&format!(
                        r#"<c {}><f>{}</f><v>{}</v></c>"#,
                        cell_attrs,
                        escape_xml(formula),
                        escape_xml(cached)
                    ));
                }
                CellValue::Empty => {
                    xml.push_str(&format!(r#"<c {}/>"#, cell_attrs));
                }
            }
        }

        xml.push_str("</row>");
    }

    xml.push_str("</sheetData>");

    if !sheet.merges.is_empty() {
        xml.push_str(&format!(r#"<mergeCells count="{}">"#, sheet.merges.len()));
        for merge in &sheet.merges {
            xml.push_str(&format!(r#"<mergeCell ref="{}"/>"#, merge));
        }
        xml.push_str("</mergeCells>");
    }

    xml.push_str("</worksheet>");
    xml
}

/// Parse a cell reference like "A1" into (col, row) as 1-indexed.
fn parse_cell_ref(cell_ref: &str) -> (u32, u32) {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut in_letters = true;

    for c in cell_ref.chars() {
        if in_letters && c.is_ascii_alphabetic() {
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        } else {
            in_letters = false;
            if c.is_ascii_digit() {
                row = row * 10 + (c as u32 - '0' as u32);
            }
        }
    }

    (col, row)
}

/// Wrap `<sheetData>` content in a minimal worksheet document.
#[must_use]
pub fn worksheet_xml(sheet_data: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        sheet_data
    )
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// Create a minimal valid XLSX with a single empty sheet.
#[must_use]
pub fn minimal_xlsx() -> Vec<u8> {
    XlsxBuilder::new().sheet(SheetBuilder::new("Sheet1")).build()
}

/// Two sheets, `Orders` and `Returns`, both containing "Widget" at A1.
#[must_use]
pub fn orders_and_returns() -> Vec<u8> {
    XlsxBuilder::new()
        .sheet(
            SheetBuilder::new("Orders")
                .cell("A1", "Widget")
                .cell("B1", 42),
        )
        .sheet(SheetBuilder::new("Returns").cell("A1", "Widget"))
        .build()
}
