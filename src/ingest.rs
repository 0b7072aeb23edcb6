use crate::dto::{Cell, Frame};
use crate::error::Result;
use csv::Reader;
use std::io::Read;
use std::path::Path;

/// Reads delimited text from a file path into a [`Frame`].
pub fn read_csv_path<P: AsRef<Path>>(path: P) -> Result<Frame> {
    let reader = Reader::from_path(path)?;
    read_frame(reader)
}

/// Reads delimited text from an in-memory byte/character stream into a
/// [`Frame`]. The first row is the header; its field strings become the
/// column identities verbatim.
pub fn read_csv<R: Read>(input: R) -> Result<Frame> {
    read_frame(Reader::from_reader(input))
}

fn read_frame<R: Read>(mut reader: Reader<R>) -> Result<Frame> {
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(parse_cell).collect());
    }
    Ok(Frame::new(columns, rows))
}

/// An empty field is a null; anything that parses as a number is numeric;
/// everything else stays text.
fn parse_cell(field: &str) -> Cell {
    if field.is_empty() {
        return Cell::Null;
    }
    match field.trim().parse::<f64>() {
        Ok(n) => Cell::Number(n),
        Err(_) => Cell::Text(field.to_string()),
    }
}
