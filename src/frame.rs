use std::io::{Cursor, Write};

use polars::prelude::*;
use tracing::{debug, trace};

use crate::error::SurveyError;
use crate::record::Record;
use crate::schema::{survey, COLUMN_COUNT};

const CR: u8 = 0x0d;
const LF: u8 = 0x0a;

/// Bytes handed to the CSV reader after line-ending cleanup.
#[derive(Debug)]
pub struct Normalized {
    pub bytes: Vec<u8>,
    /// Number of CRs rewritten as LF.
    pub replaced: usize,
    /// Input offset of the first CR, if any.
    pub first_cr: Option<usize>,
}

/// Rewrite every CR as LF, then drop empty lines outside quoted fields.
pub fn normalize_line_endings(input: &[u8]) -> Normalized {
    let mut out = Vec::with_capacity(input.len());
    let mut replaced = 0;
    let mut first_cr = None;
    let mut in_quotes = false;

    for (offset, &b) in input.iter().enumerate() {
        let b = if b == CR {
            trace!(offset, "replaced 0x0d with 0x0a");
            first_cr.get_or_insert(offset);
            replaced += 1;
            LF
        } else {
            b
        };

        if b == b'"' {
            in_quotes = !in_quotes;
        }
        if b == LF && !in_quotes && out.last().map_or(true, |&last| last == LF) {
            continue;
        }
        out.push(b);
    }

    Normalized {
        bytes: out,
        replaced,
        first_cr,
    }
}

/// 1-based data row number of the first line with fewer than
/// `COLUMN_COUNT` fields. Expects blank lines already removed.
fn first_short_row(csv: &[u8]) -> Option<usize> {
    let mut in_quotes = false;
    let mut fields = 1;
    let mut line = 0; // header
    let mut pending = false;

    for &b in csv {
        match b {
            b'"' => in_quotes = !in_quotes,
            b',' if !in_quotes => fields += 1,
            LF if !in_quotes => {
                if line > 0 && fields < COLUMN_COUNT {
                    return Some(line);
                }
                line += 1;
                fields = 1;
                pending = false;
                continue;
            }
            _ => {}
        }
        pending = true;
    }

    (pending && line > 0 && fields < COLUMN_COUNT).then_some(line)
}

/// Parse survey CSV bytes into records.
///
/// Every column is read as text; the first ten header names must match
/// `survey::HEADER` exactly. Extra trailing columns are ignored.
pub fn read_survey_csv(bytes: &[u8]) -> Result<Vec<Record>, SurveyError> {
    let normalized = normalize_line_endings(bytes);
    if normalized.replaced > 0 {
        debug!(
            replaced = normalized.replaced,
            first_offset = normalized.first_cr,
            "replaced CR with LF in input"
        );
    }
    if normalized.bytes.is_empty() {
        return Err(SurveyError::BadHeader("input is empty".into()));
    }
    // The reader pads short rows with empty cells, so catch them first.
    if let Some(row) = first_short_row(&normalized.bytes) {
        return Err(SurveyError::ShortRow { row });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .map_parse_options(|opts| opts.with_missing_is_null(false))
        .into_reader_with_file_handle(Cursor::new(normalized.bytes))
        .finish()?;

    records_from_frame(&df)
}

/// Decode a frame whose first ten columns follow `survey::HEADER`.
pub fn records_from_frame(df: &DataFrame) -> Result<Vec<Record>, SurveyError> {
    check_header(&df.get_column_names_str())?;

    let columns: Vec<Column> = survey::HEADER
        .iter()
        .map(|name| df.column(name).and_then(|c| c.cast(&DataType::String)))
        .collect::<Result<Vec<_>, _>>()?;
    let cells: Vec<&StringChunked> = columns
        .iter()
        .map(|c| c.str())
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(df.height());
    let mut row = [""; COLUMN_COUNT];
    for i in 0..df.height() {
        let line = i + 1;
        for (cell, values) in row.iter_mut().zip(&cells) {
            // Frames built elsewhere may carry nulls for missing cells.
            *cell = values.get(i).ok_or(SurveyError::ShortRow { row: line })?;
        }
        records.push(Record::from_row(line, &row)?);
    }

    Ok(records)
}

/// Encode records as an all-String frame in `survey::HEADER` order.
pub fn records_to_frame(records: &[Record]) -> Result<DataFrame, SurveyError> {
    build_frame(records, Some)
}

/// Like [`records_to_frame`], but empty cells become null so the CSV writer
/// emits them as bare empty fields rather than `""`.
fn records_to_output_frame(records: &[Record]) -> Result<DataFrame, SurveyError> {
    build_frame(records, |cell| (!cell.is_empty()).then_some(cell))
}

fn build_frame(
    records: &[Record],
    encode: impl Fn(String) -> Option<String>,
) -> Result<DataFrame, SurveyError> {
    let mut values: Vec<Vec<Option<String>>> =
        vec![Vec::with_capacity(records.len()); survey::HEADER.len()];
    for record in records {
        for (column, cell) in values.iter_mut().zip(record.to_row()) {
            column.push(encode(cell));
        }
    }

    let columns = survey::HEADER
        .iter()
        .zip(values)
        .map(|(name, v)| Column::new((*name).into(), v))
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Write the header once, then one line per record.
pub fn write_survey_csv<W: Write>(writer: W, records: &[Record]) -> Result<(), SurveyError> {
    let mut df = records_to_output_frame(records)?;
    CsvWriter::new(writer)
        .include_header(true)
        .with_null_value(String::new())
        .finish(&mut df)?;
    Ok(())
}

fn check_header(names: &[&str]) -> Result<(), SurveyError> {
    if names.len() < survey::HEADER.len() {
        return Err(SurveyError::BadHeader(format!(
            "expected {} columns, input has {}",
            survey::HEADER.len(),
            names.len()
        )));
    }

    for (i, (got, want)) in names.iter().zip(survey::HEADER).enumerate() {
        if *got != want {
            return Err(SurveyError::BadHeader(format!(
                "column {i} labeled \"{got}\", expected \"{want}\""
            )));
        }
    }
    Ok(())
}
