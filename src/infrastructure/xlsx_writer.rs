//! Minimal single-sheet SpreadsheetML (.xlsx) package.
//!
//! Strings are written inline so no shared-string table is needed.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::errors::DomainError;
use crate::domain::export::ExportRequest;

use super::table::{self, Cell};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

const MAX_SHEET_NAME: usize = 31;

impl From<zip::result::ZipError> for DomainError {
    fn from(e: zip::result::ZipError) -> Self {
        DomainError::Export(e.to_string())
    }
}

pub fn write_xlsx(request: &ExportRequest) -> Result<Vec<u8>, DomainError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", workbook_xml(&request.title)),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(request)),
    ];

    for (name, body) in parts {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

fn workbook_xml(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape(sheet_name(title).as_str())
    )
}

/// Characters XML 1.0 does not allow in a document at all, even escaped.
fn is_xml_illegal(c: char) -> bool {
    (c < ' ' && !matches!(c, '\t' | '\n' | '\r')) || matches!(c, '\u{FFFE}' | '\u{FFFF}')
}

/// Escaped cell text with XML-illegal characters dropped.
fn xml_text(s: &str) -> String {
    let legal: String = s.chars().filter(|&c| !is_xml_illegal(c)).collect();
    escape(legal.as_str()).into_owned()
}

/// Excel rejects sheet names longer than 31 characters or containing any of
/// `[]:*?/\`.
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|&c| !c.is_control() && !is_xml_illegal(c))
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        "Order".to_string()
    } else {
        cleaned
    }
}

/// Zero-based column index to a letter reference (0 → A, 26 → AA).
fn column_ref(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn push_row(xml: &mut String, row_number: usize, cells: &[Cell]) {
    xml.push_str(&format!(r#"<row r="{}">"#, row_number));
    for (col, cell) in cells.iter().enumerate() {
        let reference = format!("{}{}", column_ref(col), row_number);
        match cell {
            Cell::Text(s) => xml.push_str(&format!(
                r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                reference,
                xml_text(s)
            )),
            Cell::Number(n) => {
                xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n))
            }
            Cell::Empty => {}
        }
    }
    xml.push_str("</row>");
}

fn sheet_xml(request: &ExportRequest) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    let headers: Vec<Cell> = table::headers(request.role)
        .into_iter()
        .map(|h| Cell::Text(h.to_string()))
        .collect();
    push_row(&mut xml, 1, &headers);

    for (i, row) in request.rows.iter().enumerate() {
        push_row(&mut xml, i + 2, &table::cells(row, request.role));
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}
