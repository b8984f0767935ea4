//! Workbook container decoding.
//!
//! Turns xlsx bytes into per-sheet grids of typed [`CellValue`]s, in the
//! workbook's declared sheet order, row-major, with no header stripping.
//! Cells and rows are placed at their true positions so downstream row
//! numbering reflects the source sheet; interior gaps become empty cells and
//! empty rows. Ragged row widths are passed through untouched.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use quick_xml::events::Event;

use crate::cell::{serial_to_datetime, CellValue};
use crate::error::SheetgrepError;

/// Maximum decompressed bytes to read from a single ZIP entry.
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// One decoded sheet: its name and its rows of typed cells.
#[derive(Debug, Clone)]
pub struct SheetData {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

type Archive<'a> = zip::ZipArchive<Cursor<&'a [u8]>>;

/// Decodes workbook bytes into sheets. Fails with
/// [`SheetgrepError::Parse`] when the bytes are not a recognizable workbook
/// container; no partial output is returned.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<SheetData>, SheetgrepError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| SheetgrepError::Parse(e.to_string()))?;

    let relationships = read_relationships(&mut archive)?;
    let (sheet_refs, is_1904) = read_workbook(&mut archive, &relationships)?;
    let shared_strings = read_shared_strings(&mut archive)?;
    let date_styles = read_date_styles(&mut archive)?;

    let mut sheets = Vec::with_capacity(sheet_refs.len());
    for (name, path) in sheet_refs {
        let xml = read_zip_entry(&mut archive, &path)?
            .ok_or_else(|| SheetgrepError::Parse(format!("worksheet {} not found", path)))?;
        let rows = read_sheet_rows(&xml, &shared_strings, &date_styles, is_1904)?;
        sheets.push(SheetData { name, rows });
    }

    Ok(sheets)
}

fn parse_err(e: impl std::fmt::Display) -> SheetgrepError {
    SheetgrepError::Parse(e.to_string())
}

/// Reads one ZIP entry fully, or `None` when the entry does not exist.
fn read_zip_entry(archive: &mut Archive, name: &str) -> Result<Option<Vec<u8>>, SheetgrepError> {
    let entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(parse_err(e)),
    };
    let mut out = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut out)
        .map_err(parse_err)?;
    if out.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(SheetgrepError::Parse(format!(
            "ZIP entry {} exceeds size limit ({} bytes)",
            name, MAX_XML_ENTRY_BYTES
        )));
    }
    Ok(Some(out))
}

fn attr_value(
    event: &quick_xml::events::BytesStart,
    name: &[u8],
) -> Result<Option<String>, SheetgrepError> {
    for attr in event.attributes() {
        let attr = attr.map_err(parse_err)?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value().map_err(parse_err)?.into_owned()));
        }
    }
    Ok(None)
}

/// Maps relationship ids to worksheet paths inside the archive.
fn read_relationships(archive: &mut Archive) -> Result<HashMap<String, String>, SheetgrepError> {
    let mut rels = HashMap::new();
    let xml = match read_zip_entry(archive, "xl/_rels/workbook.xml.rels")? {
        Some(xml) => xml,
        None => return Ok(rels),
    };

    let mut reader = quick_xml::Reader::from_reader(xml.as_slice());
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(parse_err)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let id = attr_value(&e, b"Id")?;
                let target = attr_value(&e, b"Target")?;
                if let (Some(id), Some(target)) = (id, target) {
                    let path = if let Some(absolute) = target.strip_prefix('/') {
                        absolute.to_string()
                    } else {
                        format!("xl/{}", target)
                    };
                    rels.insert(id, path);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(rels)
}

/// Reads sheet names in declared order plus the workbook date system.
fn read_workbook(
    archive: &mut Archive,
    relationships: &HashMap<String, String>,
) -> Result<(Vec<(String, String)>, bool), SheetgrepError> {
    let xml = read_zip_entry(archive, "xl/workbook.xml")?
        .ok_or_else(|| SheetgrepError::Parse("xl/workbook.xml not found".to_string()))?;

    let mut sheets = Vec::new();
    let mut is_1904 = false;

    let mut reader = quick_xml::Reader::from_reader(xml.as_slice());
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(parse_err)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let name = attr_value(&e, b"name")?.unwrap_or_default();
                // Sheets without a resolvable relationship fall back to the
                // conventional entry path for their position.
                let path = attr_value(&e, b"id")?
                    .and_then(|rid| relationships.get(&rid).cloned())
                    .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", sheets.len() + 1));
                sheets.push((name, path));
            }
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"workbookPr" => {
                is_1904 = attr_value(&e, b"date1904")?
                    .map(|v| v == "1" || v == "true")
                    .unwrap_or(false);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if sheets.is_empty() {
        return Err(SheetgrepError::Parse(
            "workbook declares no sheets".to_string(),
        ));
    }
    Ok((sheets, is_1904))
}

/// Loads the shared-string table, concatenating rich-text runs and skipping
/// phonetic annotations.
fn read_shared_strings(archive: &mut Archive) -> Result<Vec<String>, SheetgrepError> {
    let mut strings = Vec::new();
    let xml = match read_zip_entry(archive, "xl/sharedStrings.xml")? {
        Some(xml) => xml,
        None => return Ok(strings),
    };

    let mut reader = quick_xml::Reader::from_reader(xml.as_slice());
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_phonetic = false;
    let mut in_text = false;
    loop {
        match reader.read_event_into(&mut buf).map_err(parse_err)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_text = true,
                _ => {}
            },
            Event::Text(t) if in_text => {
                current.push_str(t.unescape().map_err(parse_err)?.as_ref());
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = false;
                    strings.push(std::mem::take(&mut current));
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

/// Builds a per-cell-style flag: does this style index render as a date?
///
/// Styles are the `cellXfs` entries of styles.xml; an entry is a date style
/// when its number format is one of the builtin date formats or a custom
/// format whose code contains date letters.
fn read_date_styles(archive: &mut Archive) -> Result<Vec<bool>, SheetgrepError> {
    let xml = match read_zip_entry(archive, "xl/styles.xml")? {
        Some(xml) => xml,
        None => return Ok(Vec::new()),
    };

    let mut custom_formats: HashMap<u32, String> = HashMap::new();
    let mut xf_format_ids: Vec<u32> = Vec::new();
    let mut in_cell_xfs = false;

    let mut reader = quick_xml::Reader::from_reader(xml.as_slice());
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(parse_err)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"numFmt" => {
                let id = attr_value(&e, b"numFmtId")?.and_then(|v| v.parse::<u32>().ok());
                let code = attr_value(&e, b"formatCode")?;
                if let (Some(id), Some(code)) = (id, code) {
                    custom_formats.insert(id, code);
                }
            }
            Event::Start(e) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = true,
            Event::End(e) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = false,
            Event::Start(e) | Event::Empty(e)
                if in_cell_xfs && e.local_name().as_ref() == b"xf" =>
            {
                let id = attr_value(&e, b"numFmtId")?
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(0);
                xf_format_ids.push(id);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(xf_format_ids
        .into_iter()
        .map(|id| {
            is_builtin_date_format(id)
                || custom_formats
                    .get(&id)
                    .map(|code| is_date_format_code(code))
                    .unwrap_or(false)
        })
        .collect())
}

/// Builtin number formats that carry a calendar date (14-17 date, 22
/// date+time). Time-only formats are left numeric.
fn is_builtin_date_format(id: u32) -> bool {
    matches!(id, 14..=17 | 22)
}

/// Scans a custom format code for date letters, ignoring quoted literals,
/// bracketed sections, and escaped characters.
fn is_date_format_code(code: &str) -> bool {
    let mut escaped = false;
    let mut in_literal = false;
    let mut in_bracket = false;
    for ch in code.chars() {
        match ch {
            _ if escaped => escaped = false,
            '\\' | '_' if !escaped => escaped = true,
            '"' if in_literal => in_literal = false,
            '"' if !in_bracket => in_literal = true,
            ']' if in_bracket => in_bracket = false,
            '[' if !in_literal => in_bracket = true,
            _ if in_literal || in_bracket => {}
            'y' | 'Y' | 'd' | 'D' => return true,
            _ => {}
        }
    }
    false
}

/// Converts an A1-style reference into (1-based row, 0-based column).
fn parse_cell_ref(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }
    let mut col = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    let row = digits.parse::<usize>().ok()?;
    if row == 0 {
        return None;
    }
    Some((row, col - 1))
}

#[derive(Clone, Copy, PartialEq)]
enum CellKind {
    Number,
    SharedString,
    InlineString,
    FormulaString,
    Boolean,
    IsoDate,
    ErrorLiteral,
}

fn decode_cell(
    kind: CellKind,
    raw: &str,
    is_date_style: bool,
    shared_strings: &[String],
    is_1904: bool,
) -> CellValue {
    match kind {
        CellKind::SharedString => match raw.trim().parse::<usize>() {
            Ok(i) if i < shared_strings.len() => CellValue::Text(shared_strings[i].clone()),
            _ => CellValue::Text(raw.to_string()),
        },
        CellKind::InlineString | CellKind::FormulaString | CellKind::ErrorLiteral => {
            CellValue::Text(raw.to_string())
        }
        CellKind::Boolean => {
            let v = raw.trim();
            CellValue::Boolean(v == "1" || v.eq_ignore_ascii_case("true"))
        }
        CellKind::IsoDate => {
            let v = raw.trim();
            chrono::NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .or_else(|| {
                    chrono::NaiveDate::parse_from_str(v, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
                .map(CellValue::Date)
                .unwrap_or_else(|| CellValue::Text(raw.to_string()))
        }
        CellKind::Number => match raw.trim().parse::<f64>() {
            Ok(n) if is_date_style => serial_to_datetime(n, is_1904)
                .map(CellValue::Date)
                .unwrap_or(CellValue::Number(n)),
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(raw.to_string()),
        },
    }
}

/// Decodes one worksheet XML document into rows of cells at their true
/// positions.
fn read_sheet_rows(
    xml: &[u8],
    shared_strings: &[String],
    date_styles: &[bool],
    is_1904: bool,
) -> Result<Vec<Vec<CellValue>>, SheetgrepError> {
    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    let mut current: Vec<CellValue> = Vec::new();

    let mut next_col = 0usize;
    let mut cell_col = 0usize;
    let mut cell_kind = CellKind::Number;
    let mut cell_is_date = false;
    let mut value = String::new();
    let mut has_value = false;
    let mut in_value = false;
    let mut in_inline = false;
    let mut in_inline_text = false;

    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(parse_err)? {
            Event::Start(e) if e.local_name().as_ref() == b"row" => {
                let target = attr_value(&e, b"r")?
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(rows.len() + 1);
                while rows.len() + 1 < target {
                    rows.push(Vec::new());
                }
                current.clear();
                next_col = 0;
            }
            // A self-closing row holds no cells but still occupies its
            // position.
            Event::Empty(e) if e.local_name().as_ref() == b"row" => {
                let target = attr_value(&e, b"r")?
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(rows.len() + 1);
                while rows.len() + 1 < target {
                    rows.push(Vec::new());
                }
                rows.push(Vec::new());
            }
            Event::End(e) if e.local_name().as_ref() == b"row" => {
                rows.push(std::mem::take(&mut current));
            }
            // A self-closing cell (style only, no value) occupies its column.
            Event::Empty(e) if e.local_name().as_ref() == b"c" => {
                let col = attr_value(&e, b"r")?
                    .as_deref()
                    .and_then(parse_cell_ref)
                    .map(|(_, col)| col)
                    .unwrap_or(next_col);
                while current.len() < col {
                    current.push(CellValue::Empty);
                }
                current.push(CellValue::Empty);
                next_col = col + 1;
            }
            Event::Start(e) if e.local_name().as_ref() == b"c" => {
                cell_col = attr_value(&e, b"r")?
                    .as_deref()
                    .and_then(parse_cell_ref)
                    .map(|(_, col)| col)
                    .unwrap_or(next_col);
                cell_kind = match attr_value(&e, b"t")?.as_deref() {
                    Some("s") => CellKind::SharedString,
                    Some("inlineStr") => CellKind::InlineString,
                    Some("str") => CellKind::FormulaString,
                    Some("b") => CellKind::Boolean,
                    Some("d") => CellKind::IsoDate,
                    Some("e") => CellKind::ErrorLiteral,
                    _ => CellKind::Number,
                };
                cell_is_date = cell_kind == CellKind::Number
                    && attr_value(&e, b"s")?
                        .and_then(|v| v.parse::<usize>().ok())
                        .and_then(|i| date_styles.get(i).copied())
                        .unwrap_or(false);
                value.clear();
                has_value = false;
            }
            Event::Start(e) if e.local_name().as_ref() == b"v" => in_value = true,
            Event::Start(e) if e.local_name().as_ref() == b"is" => in_inline = true,
            Event::Start(e) if in_inline && e.local_name().as_ref() == b"t" => {
                in_inline_text = true;
            }
            Event::Text(t) if in_value || in_inline_text => {
                value.push_str(t.unescape().map_err(parse_err)?.as_ref());
                has_value = true;
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"is" => in_inline = false,
                b"t" if in_inline => in_inline_text = false,
                b"c" => {
                    let decoded = if has_value {
                        decode_cell(cell_kind, &value, cell_is_date, shared_strings, is_1904)
                    } else {
                        CellValue::Empty
                    };
                    while current.len() < cell_col {
                        current.push(CellValue::Empty);
                    }
                    current.push(decoded);
                    next_col = cell_col + 1;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            for (name, body) in entries {
                zip.start_file(*name, zip::write::SimpleFileOptions::default())
                    .unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    const WORKBOOK_XML: &str = r#"<?xml version="1.0"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="People" sheetId="1" r:id="rId1"/>
    <sheet name="Notes" sheetId="2" r:id="rId2"/>
  </sheets>
</workbook>"#;

    const RELS_XML: &str = r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
</Relationships>"#;

    const SHARED_XML: &str = r#"<?xml version="1.0"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="2" uniqueCount="2">
  <si><t>Name</t></si>
  <si><r><t>Ada </t></r><r><t>Lovelace</t></r></si>
</sst>"#;

    #[test]
    fn parses_sheets_in_declared_order_with_typed_cells() {
        let sheet1 = r#"<?xml version="1.0"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1">
      <c r="A1" t="s"><v>0</v></c>
      <c r="B1" t="inlineStr"><is><t>Score</t></is></c>
    </row>
    <row r="2">
      <c r="A2" t="s"><v>1</v></c>
      <c r="B2"><v>42</v></c>
      <c r="C2" t="b"><v>1</v></c>
    </row>
  </sheetData>
</worksheet>"#;
        let sheet2 = r#"<?xml version="1.0"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="str"><v>ok</v></c></row>
  </sheetData>
</worksheet>"#;

        let bytes = build_archive(&[
            ("xl/workbook.xml", WORKBOOK_XML),
            ("xl/_rels/workbook.xml.rels", RELS_XML),
            ("xl/sharedStrings.xml", SHARED_XML),
            ("xl/worksheets/sheet1.xml", sheet1),
            ("xl/worksheets/sheet2.xml", sheet2),
        ]);

        let sheets = parse_workbook(&bytes).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "People");
        assert_eq!(sheets[1].name, "Notes");

        let rows = &sheets[0].rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], CellValue::Text("Name".to_string()));
        assert_eq!(rows[0][1], CellValue::Text("Score".to_string()));
        // Rich-text runs concatenate.
        assert_eq!(rows[1][0], CellValue::Text("Ada Lovelace".to_string()));
        assert_eq!(rows[1][1], CellValue::Number(42.0));
        assert_eq!(rows[1][2], CellValue::Boolean(true));

        assert_eq!(sheets[1].rows[0][0], CellValue::Text("ok".to_string()));
    }

    #[test]
    fn date_styled_numbers_decode_as_dates() {
        let styles = r#"<?xml version="1.0"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy-mm-dd"/></numFmts>
  <cellXfs count="3">
    <xf numFmtId="0"/>
    <xf numFmtId="14"/>
    <xf numFmtId="164"/>
  </cellXfs>
</styleSheet>"#;
        let sheet = r#"<?xml version="1.0"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1">
      <c r="A1" s="1"><v>44562</v></c>
      <c r="B1" s="2"><v>44563</v></c>
      <c r="C1" s="0"><v>44564</v></c>
    </row>
  </sheetData>
</worksheet>"#;

        let bytes = build_archive(&[
            ("xl/workbook.xml", WORKBOOK_XML),
            ("xl/_rels/workbook.xml.rels", RELS_XML),
            ("xl/styles.xml", styles),
            ("xl/worksheets/sheet1.xml", sheet),
            (
                "xl/worksheets/sheet2.xml",
                r#"<worksheet><sheetData/></worksheet>"#,
            ),
        ]);

        let sheets = parse_workbook(&bytes).unwrap();
        let row = &sheets[0].rows[0];
        let expect = |day| {
            CellValue::Date(
                chrono::NaiveDate::from_ymd_opt(2022, 1, day)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            )
        };
        assert_eq!(row[0], expect(1));
        assert_eq!(row[1], expect(2));
        // Style 0 is the general format: stays numeric.
        assert_eq!(row[2], CellValue::Number(44564.0));
    }

    #[test]
    fn row_and_column_gaps_are_padded() {
        let sheet = r#"<?xml version="1.0"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1"><v>1</v></c></row>
    <row r="3"><c r="C3"><v>3</v></c></row>
  </sheetData>
</worksheet>"#;

        let bytes = build_archive(&[
            ("xl/workbook.xml", WORKBOOK_XML),
            ("xl/_rels/workbook.xml.rels", RELS_XML),
            ("xl/worksheets/sheet1.xml", sheet),
            (
                "xl/worksheets/sheet2.xml",
                r#"<worksheet><sheetData/></worksheet>"#,
            ),
        ]);

        let sheets = parse_workbook(&bytes).unwrap();
        let rows = &sheets[0].rows;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![CellValue::Number(1.0)]);
        assert!(rows[1].is_empty());
        assert_eq!(
            rows[2],
            vec![CellValue::Empty, CellValue::Empty, CellValue::Number(3.0)]
        );
    }

    #[test]
    fn non_workbook_bytes_fail_to_parse() {
        let err = parse_workbook(b"this is not a zip archive").unwrap_err();
        assert!(matches!(err, SheetgrepError::Parse(_)));
    }

    #[test]
    fn zip_without_workbook_part_fails_to_parse() {
        let bytes = build_archive(&[("word/document.xml", "<w:document/>")]);
        let err = parse_workbook(&bytes).unwrap_err();
        assert!(matches!(err, SheetgrepError::Parse(_)));
    }

    #[test]
    fn cell_references_resolve_rows_and_columns() {
        assert_eq!(parse_cell_ref("A1"), Some((1, 0)));
        assert_eq!(parse_cell_ref("C3"), Some((3, 2)));
        assert_eq!(parse_cell_ref("AA10"), Some((10, 26)));
        assert_eq!(parse_cell_ref("10"), None);
        assert_eq!(parse_cell_ref("A0"), None);
    }

    #[test]
    fn date_format_codes_are_classified() {
        assert!(is_date_format_code("yyyy-mm-dd"));
        assert!(is_date_format_code("dd/mm"));
        assert!(!is_date_format_code("0.00"));
        assert!(!is_date_format_code("hh:mm:ss"));
        // Quoted literals and bracketed sections do not count.
        assert!(!is_date_format_code("\"day\" 0"));
        assert!(!is_date_format_code("[Red]0.0"));
    }
}
