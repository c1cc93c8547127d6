use std::fs;

use calamine::{DataType, Reader, open_workbook_auto};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::domain::TabularFormat;
use crate::error::AneelError;
use crate::table::{Cell, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub encoding: TextEncoding,
}

impl Default for CsvOptions {
    // The regulator's historical export format.
    fn default() -> Self {
        Self {
            delimiter: b';',
            encoding: TextEncoding::Latin1,
        }
    }
}

pub fn read_table(path: &Utf8Path, csv_options: &CsvOptions) -> Result<Table, AneelError> {
    match TabularFormat::from_path(path) {
        Some(TabularFormat::Csv) => read_csv(path, csv_options),
        Some(TabularFormat::Xls) | Some(TabularFormat::Xlsx) => read_spreadsheet(path),
        None => Err(decode_error(path, "unsupported file extension".to_string())),
    }
}

pub fn read_csv(path: &Utf8Path, options: &CsvOptions) -> Result<Table, AneelError> {
    let bytes = fs::read(path.as_std_path()).map_err(|err| decode_error(path, err.to_string()))?;
    let text = decode_text(&bytes, options.encoding).map_err(|message| decode_error(path, message))?;
    parse_csv(&text, options.delimiter).map_err(|message| decode_error(path, message))
}

pub fn read_spreadsheet(path: &Utf8Path) -> Result<Table, AneelError> {
    let mut workbook =
        open_workbook_auto(path.as_std_path()).map_err(|err| decode_error(path, err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| decode_error(path, "workbook has no sheets".to_string()))?
        .map_err(|err| decode_error(path, err.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| decode_error(path, "sheet is empty".to_string()))?;
    let columns = header.iter().map(header_text).collect();

    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(sheet_cell).collect())?;
    }
    Ok(table)
}

fn parse_csv(text: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(|err| err.to_string())?;
    if headers.is_empty() {
        return Err("no header row".to_string());
    }
    let columns: Vec<String> = headers.iter().map(|header| header.to_string()).collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record.map_err(|err| err.to_string())?;
        let row = record.iter().map(Cell::infer).collect();
        table.push_row(row).map_err(|err| err.to_string())?;
    }
    Ok(table)
}

fn decode_text(bytes: &[u8], encoding: TextEncoding) -> Result<String, String> {
    match encoding {
        TextEncoding::Utf8 => std::str::from_utf8(bytes)
            .map(|text| text.to_string())
            .map_err(|err| err.to_string()),
        TextEncoding::Latin1 => Ok(latin1_to_string(bytes)),
    }
}

// ISO-8859-1 maps every byte 1:1 onto the first 256 code points.
fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| byte as char).collect()
}

fn header_text(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.clone(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}

fn sheet_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Int(value) => Cell::Int(*value),
        DataType::Float(value) => Cell::Float(*value),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Empty => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

fn decode_error(path: &Utf8Path, message: String) -> AneelError {
    AneelError::Decode {
        path: path.to_string(),
        message,
    }
}
