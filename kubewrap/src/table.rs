//! Column-aligned kubectl listings as structured tables.
//!
//! kubectl pads every column of `get` output to a common width, so the
//! header's cell offsets are also the column boundaries of every row.

use std::fmt;
use std::time::Duration;

use log::debug;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use thiserror::Error;

use crate::duration::{parse_compact, to_long_form};

/// Column whose cells are reinterpreted as durations.
pub const AGE_COLUMN: &str = "AGE";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("no output to parse")]
    Empty,
    #[error("first line is not a column header")]
    NotAHeader,
    #[error("header without rows")]
    NoRows,
    #[error("line {line} does not line up with the header")]
    Misaligned { line: usize },
    #[error("blank line {line} inside table")]
    BlankLine { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Duration(Duration),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Duration(d) => f.write_str(&to_long_form(*d)),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(text) => serializer.serialize_str(text),
            Cell::Duration(d) if d.subsec_nanos() == 0 => serializer.serialize_u64(d.as_secs()),
            Cell::Duration(d) => serializer.serialize_f64(d.as_secs_f64()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Outcome of trying to read command output as a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reinterpreted {
    Table(ResourceTable),
    Raw(String),
}

/// Parse `text` as a table, falling back to the text itself.
pub fn reinterpret(text: String) -> Reinterpreted {
    match ResourceTable::parse(&text) {
        Ok(table) => Reinterpreted::Table(table),
        Err(e) => {
            debug!("keeping raw output: {e}");
            Reinterpreted::Raw(text)
        }
    }
}

fn is_header_cell(cell: &str) -> bool {
    cell.chars().any(char::is_alphabetic) && !cell.chars().any(char::is_lowercase)
}

/// Start offsets (in chars) and names of header cells split on runs of two
/// or more spaces.
fn header_columns(line: &[char]) -> Vec<(usize, String)> {
    let mut columns = Vec::new();
    let mut i = 0;
    while i < line.len() {
        if line[i] == ' ' {
            i += 1;
            continue;
        }
        let start = i;
        while i < line.len() && !(line[i] == ' ' && line.get(i + 1).map_or(true, |c| *c == ' ')) {
            i += 1;
        }
        columns.push((start, line[start..i].iter().collect()));
    }
    columns
}

fn slice(line: &[char], from: usize, to: usize) -> String {
    let to = to.min(line.len());
    if from >= to {
        return String::new();
    }
    line[from..to].iter().collect::<String>().trim().to_string()
}

impl ResourceTable {
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let lines: Vec<&str> = text.trim_end().lines().collect();
        let header_idx = lines
            .iter()
            .position(|l| !l.trim().is_empty())
            .ok_or(TableError::Empty)?;

        let header: Vec<char> = lines[header_idx].trim_end().chars().collect();
        let columns = header_columns(&header);
        if columns.is_empty() || !columns.iter().all(|(_, name)| is_header_cell(name)) {
            return Err(TableError::NotAHeader);
        }

        let age = columns.iter().position(|(_, name)| name == AGE_COLUMN);
        let mut rows = Vec::new();
        for (idx, line) in lines.iter().enumerate().skip(header_idx + 1) {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                return Err(TableError::BlankLine { line: line_no });
            }
            let chars: Vec<char> = line.trim_end().chars().collect();

            let mut row = Vec::with_capacity(columns.len());
            for (col, (start, _)) in columns.iter().enumerate() {
                if *start > 0 && chars.get(start - 1).is_some_and(|c| *c != ' ') {
                    return Err(TableError::Misaligned { line: line_no });
                }
                let end = columns.get(col + 1).map_or(chars.len(), |(next, _)| *next);
                let text = slice(&chars, *start, end);
                let cell = match age {
                    Some(age) if age == col => {
                        parse_compact(&text).map_or(Cell::Text(text), Cell::Duration)
                    }
                    _ => Cell::Text(text),
                };
                row.push(cell);
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(TableError::NoRows);
        }

        Ok(Self {
            columns: columns.into_iter().map(|(_, name)| name).collect(),
            rows,
        })
    }
}

struct Record<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

/// Serializes as a sequence of records keyed by column name, in column order.
impl Serialize for ResourceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for cells in &self.rows {
            seq.serialize_element(&Record {
                columns: &self.columns,
                cells,
            })?;
        }
        seq.end()
    }
}
