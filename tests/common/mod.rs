//! In-memory OOXML workbook fixtures built from hand-written XML parts.
#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Style index 1 in the fixture stylesheet is the built-in short date format (numFmtId 14)
const DATE_STYLE: u32 = 1;
/// Style index 2 is the built-in elapsed time format `[h]:mm:ss` (numFmtId 46)
const DURATION_STYLE: u32 = 2;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One sheet of a fixture workbook
#[derive(Debug, Clone)]
pub struct SheetSpec {
    name: String,
    state: Option<&'static str>,
    chart: bool,
    rows: Vec<(u32, Vec<String>)>,
    merges: Vec<String>,
}

impl SheetSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: None,
            chart: false,
            rows: Vec::new(),
            merges: Vec::new(),
        }
    }

    /// A chartsheet tab: listed in the workbook, but with no cell grid
    pub fn chart(name: &str) -> Self {
        Self {
            chart: true,
            ..Self::new(name)
        }
    }

    pub fn hidden(mut self) -> Self {
        self.state = Some("hidden");
        self
    }

    pub fn very_hidden(mut self) -> Self {
        self.state = Some("veryHidden");
        self
    }

    pub fn text(self, coord: &str, value: &str) -> Self {
        let xml = format!(
            r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
            coord,
            escape(value)
        );
        self.cell(coord, xml)
    }

    pub fn number(self, coord: &str, value: f64) -> Self {
        let xml = format!(r#"<c r="{}"><v>{}</v></c>"#, coord, value);
        self.cell(coord, xml)
    }

    pub fn boolean(self, coord: &str, value: bool) -> Self {
        let xml = format!(r#"<c r="{}" t="b"><v>{}</v></c>"#, coord, value as u8);
        self.cell(coord, xml)
    }

    /// A date-formatted serial number, e.g. 45366.0 for 2024-03-15
    pub fn date_serial(self, coord: &str, serial: f64) -> Self {
        let xml = format!(r#"<c r="{}" s="{}"><v>{}</v></c>"#, coord, DATE_STYLE, serial);
        self.cell(coord, xml)
    }

    /// An elapsed-time serial, e.g. 0.0625 for 01:30:00
    pub fn duration(self, coord: &str, serial: f64) -> Self {
        let xml = format!(r#"<c r="{}" s="{}"><v>{}</v></c>"#, coord, DURATION_STYLE, serial);
        self.cell(coord, xml)
    }

    /// A formula cell, with or without a cached numeric result
    pub fn formula(self, coord: &str, formula: &str, cached: Option<f64>) -> Self {
        let value = cached.map(|v| format!("<v>{}</v>", v)).unwrap_or_default();
        let xml = format!(r#"<c r="{}"><f>{}</f>{}</c>"#, coord, escape(formula), value);
        self.cell(coord, xml)
    }

    pub fn merge(mut self, range: &str) -> Self {
        self.merges.push(range.to_string());
        self
    }

    fn cell(mut self, coord: &str, xml: String) -> Self {
        let row: u32 = coord
            .trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .parse()
            .expect("fixture coordinate needs a row number");
        match self.rows.iter_mut().find(|(r, _)| *r == row) {
            Some((_, cells)) => cells.push(xml),
            None => {
                self.rows.push((row, vec![xml]));
                self.rows.sort_by_key(|(r, _)| *r);
            }
        }
        self
    }

    /// Folder and content type of the sheet part
    fn part_kind(&self) -> (&'static str, &'static str) {
        if self.chart {
            ("chartsheets", "chartsheet")
        } else {
            ("worksheets", "worksheet")
        }
    }

    fn part_xml(&self) -> String {
        if self.chart {
            return r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><chartsheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetPr/><sheetViews><sheetView workbookViewId="0"/></sheetViews></chartsheet>"#.to_string();
        }
        self.worksheet_xml()
    }

    fn worksheet_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (row, cells) in &self.rows {
            xml.push_str(&format!(r#"<row r="{}">{}</row>"#, row, cells.concat()));
        }
        xml.push_str("</sheetData>");
        if !self.merges.is_empty() {
            xml.push_str(&format!(r#"<mergeCells count="{}">"#, self.merges.len()));
            for range in &self.merges {
                xml.push_str(&format!(r#"<mergeCell ref="{}"/>"#, range));
            }
            xml.push_str("</mergeCells>");
        }
        xml.push_str("</worksheet>");
        xml
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Zip the sheets into an xlsx container
pub fn build_workbook(sheets: &[SheetSpec]) -> Vec<u8> {
    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    );
    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    for (idx, sheet) in sheets.iter().enumerate() {
        let n = idx + 1;
        let (folder, kind) = sheet.part_kind();
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/{}/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.{}+xml"/>"#,
            folder, n, kind
        ));
        let state = sheet
            .state
            .map(|s| format!(r#" state="{}""#, s))
            .unwrap_or_default();
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}"{} r:id="rId{}"/>"#,
            escape(&sheet.name),
            n,
            state,
            n
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/{}" Target="{}/sheet{}.xml"/>"#,
            n, kind, folder, n
        ));
    }

    content_types.push_str("</Types>");
    workbook.push_str("</sheets></workbook>");
    rels.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#,
        sheets.len() + 1
    ));

    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
    let styles = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/><xf numFmtId="46" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

    let mut parts = vec![
        ("[Content_Types].xml".to_string(), content_types),
        ("_rels/.rels".to_string(), root_rels.to_string()),
        ("xl/workbook.xml".to_string(), workbook),
        ("xl/_rels/workbook.xml.rels".to_string(), rels),
        ("xl/styles.xml".to_string(), styles.to_string()),
    ];
    for (idx, sheet) in sheets.iter().enumerate() {
        let (folder, _) = sheet.part_kind();
        parts.push((format!("xl/{}/sheet{}.xml", folder, idx + 1), sheet.part_xml()));
    }

    zip_parts(&parts)
}

/// Zip arbitrary parts, for containers that are valid zips but not workbooks
pub fn zip_parts(parts: &[(String, String)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in parts {
        zip.start_file(name.as_str(), SimpleFileOptions::default())
            .expect("start zip entry");
        zip.write_all(body.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finish zip").into_inner()
}
