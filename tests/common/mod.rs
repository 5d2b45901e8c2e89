//! In-memory XLSX fixtures for integration tests.
#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A cell to write into a fixture sheet.
#[derive(Debug, Clone)]
pub enum Fixture {
    /// Shared string
    Text(String),
    /// Inline string
    Inline(String),
    Number(f64),
    Bool(bool),
    /// Styled cell without value
    Blank,
    Error(String),
    /// Formula with its cached numeric value
    Formula(String, f64),
    /// No cell at this position
    Skip,
}

pub fn text(s: &str) -> Fixture {
    Fixture::Text(s.to_string())
}

pub fn num(n: f64) -> Fixture {
    Fixture::Number(n)
}

/// Builds a one-sheet (or more) workbook package.
#[derive(Debug, Default)]
pub struct WorkbookBuilder {
    sheets: Vec<(String, Vec<(u32, Vec<Fixture>)>)>,
}

fn column_letters(mut index: u32) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new sheet; following rows go to it.
    pub fn sheet(mut self, name: &str) -> Self {
        self.sheets.push((name.to_string(), Vec::new()));
        self
    }

    /// Append a row right after the previous one.
    pub fn row(self, cells: Vec<Fixture>) -> Self {
        let next = self
            .sheets
            .last()
            .and_then(|(_, rows)| rows.last())
            .map(|(index, _)| index + 1)
            .unwrap_or(0);
        self.row_at(next, cells)
    }

    /// Append a row at a zero-based physical index.
    pub fn row_at(mut self, index: u32, cells: Vec<Fixture>) -> Self {
        if self.sheets.is_empty() {
            self.sheets.push(("Sheet1".to_string(), Vec::new()));
        }
        if let Some((_, rows)) = self.sheets.last_mut() {
            rows.push((index, cells));
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut shared: Vec<String> = Vec::new();
        let mut sheet_xml = Vec::new();

        for (_, rows) in &self.sheets {
            let mut xml = String::from(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
            );
            for (index, cells) in rows {
                let r = index + 1;
                xml.push_str(&format!(r#"<row r="{}">"#, r));
                for (col, cell) in cells.iter().enumerate() {
                    let reference = format!("{}{}", column_letters(col as u32), r);
                    let cell_xml = match cell {
                        Fixture::Text(s) => {
                            let idx = match shared.iter().position(|x| x == s) {
                                Some(i) => i,
                                None => {
                                    shared.push(s.clone());
                                    shared.len() - 1
                                }
                            };
                            format!(r#"<c r="{}" t="s"><v>{}</v></c>"#, reference, idx)
                        }
                        Fixture::Inline(s) => format!(
                            r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                            reference,
                            escape(s)
                        ),
                        Fixture::Number(n) => format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n),
                        Fixture::Bool(b) => format!(
                            r#"<c r="{}" t="b"><v>{}</v></c>"#,
                            reference,
                            if *b { 1 } else { 0 }
                        ),
                        Fixture::Blank => format!(r#"<c r="{}" s="1"/>"#, reference),
                        Fixture::Error(e) => {
                            format!(r#"<c r="{}" t="e"><v>{}</v></c>"#, reference, escape(e))
                        }
                        Fixture::Formula(f, v) => format!(
                            r#"<c r="{}"><f>{}</f><v>{}</v></c>"#,
                            reference,
                            escape(f),
                            v
                        ),
                        Fixture::Skip => String::new(),
                    };
                    xml.push_str(&cell_xml);
                }
                xml.push_str("</row>");
            }
            xml.push_str("</sheetData></worksheet>");
            sheet_xml.push(xml);
        }

        let mut workbook = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
        );
        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (i, (name, _)) in self.sheets.iter().enumerate() {
            workbook.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(name),
                i + 1,
                i + 1
            ));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }
        workbook.push_str("</sheets></workbook>");
        rels.push_str("</Relationships>");

        let mut sst = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );
        for s in &shared {
            sst.push_str(&format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(s)));
        }
        sst.push_str("</sst>");

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        let part = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, content: &str| {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        };

        part(
            &mut zip,
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
</Types>"#,
        );
        part(
            &mut zip,
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
        );
        part(&mut zip, "xl/workbook.xml", &workbook);
        part(&mut zip, "xl/_rels/workbook.xml.rels", &rels);
        part(&mut zip, "xl/sharedStrings.xml", &sst);
        for (i, xml) in sheet_xml.iter().enumerate() {
            part(&mut zip, &format!("xl/worksheets/sheet{}.xml", i + 1), xml);
        }

        zip.finish().unwrap().into_inner()
    }
}
