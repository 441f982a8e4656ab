//! TSV reader for story files

use crate::core::error::StoryError;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;

/// Columns every story file must declare
pub const REQUIRED_COLUMNS: [&str; 4] = ["TYPE", "NAME", "COLOR", "SHORTNAME"];

/// One non-blank row of a story file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRow {
    /// 1-based line number in the input
    pub line: usize,
    /// Raw `TYPE` cell, trimmed
    pub kind: String,
    /// Raw `NAME` cell
    pub name: String,
    /// `COLOR` cell, `None` when blank
    pub color: Option<String>,
    /// Raw `SHORTNAME` cell
    pub short_name: String,
    /// Every other cell, in column order
    pub args: Vec<String>,
}

/// Positions of the required columns in the header
#[derive(Debug, Clone, Copy)]
struct Columns {
    kind: usize,
    name: usize,
    color: usize,
    short_name: usize,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, StoryError> {
        let find = |column: &str| {
            header
                .iter()
                .position(|cell| cell.trim().eq_ignore_ascii_case(column))
        };
        let positions: Vec<Option<usize>> = REQUIRED_COLUMNS.iter().copied().map(find).collect();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(&positions)
            .filter(|(_, position)| position.is_none())
            .map(|(column, _)| (*column).to_string())
            .collect();

        match positions.as_slice() {
            [Some(kind), Some(name), Some(color), Some(short_name)] => Ok(Self {
                kind: *kind,
                name: *name,
                color: *color,
                short_name: *short_name,
            }),
            _ => Err(StoryError::MissingColumns(missing)),
        }
    }

    fn is_required(self, index: usize) -> bool {
        index == self.kind || index == self.name || index == self.color || index == self.short_name
    }
}

/// Read every row of a tab-separated story
///
/// Rows with a blank `TYPE` are dropped; short rows read as empty cells.
///
/// # Errors
/// Returns an error if the header lacks a required column or the input is
/// not valid delimited text.
pub fn read_story_rows<R: Read>(reader: R) -> Result<Vec<StoryRow>, StoryError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(reader);
    let columns = Columns::from_header(reader.headers()?)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |index: usize| record.get(index).unwrap_or_default();

        let kind = cell(columns.kind).trim();
        if kind.is_empty() {
            continue;
        }
        let color = Some(cell(columns.color).trim())
            .filter(|color| !color.is_empty())
            .map(str::to_string);
        let args = record
            .iter()
            .enumerate()
            .filter(|(index, _)| !columns.is_required(*index))
            .map(|(_, value)| value.to_string())
            .collect();

        rows.push(StoryRow {
            line: record
                .position()
                .map_or(rows.len() + 2, |position| {
                    usize::try_from(position.line()).unwrap_or(usize::MAX)
                }),
            kind: kind.to_string(),
            name: cell(columns.name).to_string(),
            color,
            short_name: cell(columns.short_name).to_string(),
            args,
        });
    }
    Ok(rows)
}
