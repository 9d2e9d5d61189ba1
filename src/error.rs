#[cfg(feature = "python")]
use pyo3::exceptions::PyRuntimeError;
#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

use crate::record::Occasion;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Data not loaded: {0}")]
    NotLoaded(String),

    #[error("Species list is empty")]
    EmptySpeciesList,

    #[error("Duplicate species {code}: listed at positions {first} and {second}")]
    DuplicateSpecies {
        code: i64,
        first: usize,
        second: usize,
    },

    #[error("Bad species {value:?} on line {line}")]
    BadSpecies { line: usize, value: String },

    #[error("Bad CSV header: {0}")]
    BadHeader(String),

    #[error("Row {row}: expected at least 10 columns")]
    ShortRow { row: usize },

    #[error("Row {row}: parsing {column}: {value:?} is not an integer")]
    BadInteger {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Input not sorted by (route, year, species) at record {position}")]
    Unsorted { position: usize },

    #[error(
        "Already seen {occasion} tuple at output offset {first_offset} \
         (seen again at output offset {output_offset}), bailing out"
    )]
    DuplicateOccasion {
        occasion: Occasion,
        first_offset: usize,
        output_offset: usize,
    },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "python")]
impl From<SurveyError> for PyErr {
    fn from(err: SurveyError) -> PyErr {
        PyRuntimeError::new_err(err.to_string())
    }
}
