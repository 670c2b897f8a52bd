//! Region vertex tables
//!
//! Region outlines arrive as a spreadsheet export with one row per polygon
//! vertex. [`convert_vertex_csv`] reshapes that export into the whitespace
//! delimited text table consumed by [`crate::polygons`]:
//!
//! ```text
//! Name Latitude Longitude Sea_ID Vertex_Index
//! Baltic_Sea 65.8000 22.4000 17 1
//! ```

use crate::errors::{RegionsError, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{debug, info};
use std::path::Path;

/// Header of the text vertex table
pub const TABLE_COLUMNS: [&str; 5] = ["Name", "Latitude", "Longitude", "Sea_ID", "Vertex_Index"];

/// Columns read from the spreadsheet export, in table column order
pub const CSV_COLUMNS: [&str; 5] = ["Region", "Lat", "Lon", "RegionNo", "VertexNo"];

/// One polygon vertex of a named region
#[derive(Debug, Clone, PartialEq)]
pub struct VertexRecord {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub sea_id: i64,
    pub vertex_index: i64,
}

impl VertexRecord {
    fn to_row(&self) -> [String; 5] {
        [
            self.name.clone(),
            format!("{:.4}", self.latitude),
            format!("{:.4}", self.longitude),
            self.sea_id.to_string(),
            self.vertex_index.to_string(),
        ]
    }
}

fn invalid(message: String) -> RegionsError {
    RegionsError::InvalidTable { message }
}

fn column_positions(headers: &StringRecord, wanted: &[&str; 5]) -> Result<[usize; 5]> {
    let mut positions = [0usize; 5];
    for (slot, name) in positions.iter_mut().zip(wanted) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == *name)
            .ok_or_else(|| invalid(format!("missing column '{}'", name)))?;
    }
    Ok(positions)
}

fn parse_float(value: &str, column: &str, row: usize) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| invalid(format!("row {}: '{}' is not a number in column {}", row, value, column)))
}

/// Integer coercion accepting `3` as well as `3.0`
fn parse_integer(value: &str, column: &str, row: usize) -> Result<i64> {
    let trimmed = value.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
        _ => Err(invalid(format!(
            "row {}: '{}' is not an integer in column {}",
            row, value, column
        ))),
    }
}

fn field<'r>(record: &'r StringRecord, position: usize, column: &str, row: usize) -> Result<&'r str> {
    record
        .get(position)
        .ok_or_else(|| invalid(format!("row {}: no value for column {}", row, column)))
}

fn parse_record(
    record: &StringRecord,
    positions: &[usize; 5],
    columns: &[&str; 5],
    row: usize,
) -> Result<VertexRecord> {
    let value = move |i: usize| field(record, positions[i], columns[i], row);
    Ok(VertexRecord {
        name: value(0)?.trim().replace(' ', "_"),
        latitude: parse_float(value(1)?, columns[1], row)?,
        longitude: parse_float(value(2)?, columns[2], row)?,
        sea_id: parse_integer(value(3)?, columns[3], row)?,
        vertex_index: parse_integer(value(4)?, columns[4], row)?,
    })
}

/// Reads the spreadsheet export, keeping only the vertex columns.
pub fn read_vertex_csv(path: &Path) -> Result<Vec<VertexRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let positions = column_positions(reader.headers()?, &CSV_COLUMNS)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        records.push(parse_record(&record, &positions, &CSV_COLUMNS, i + 1)?);
    }
    Ok(records)
}

/// Writes records as the space delimited text table.
pub fn write_vertex_table(records: &[VertexRecord], path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new().delimiter(b' ').from_path(path)?;
    writer.write_record(TABLE_COLUMNS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a whitespace delimited text table back into records.
pub fn read_vertex_table(path: &Path) -> Result<Vec<VertexRecord>> {
    let text = std::fs::read_to_string(path)?;
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header: StringRecord = lines
        .next()
        .ok_or_else(|| invalid(format!("{} is empty", path.display())))?
        .split_whitespace()
        .collect();
    let positions = column_positions(&header, &TABLE_COLUMNS)?;

    lines
        .enumerate()
        .map(|(i, line)| {
            let record: StringRecord = line.split_whitespace().collect();
            parse_record(&record, &positions, &TABLE_COLUMNS, i + 1)
        })
        .collect()
}

/// Names in order of first appearance
pub fn unique_names(records: &[VertexRecord]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for record in records {
        if !names.contains(&record.name.as_str()) {
            names.push(&record.name);
        }
    }
    names
}

/// Converts the spreadsheet export at `input` into the text table at `output`.
pub fn convert_vertex_csv(input: &Path, output: &Path) -> Result<Vec<VertexRecord>> {
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());

    let records = read_vertex_csv(input)?;
    debug!("Read {} vertices", records.len());
    info!("Unique regions: {:?}", unique_names(&records));

    write_vertex_table(&records, output)?;
    Ok(records)
}
