use std::path::PathBuf;

use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::error::SurveyError;
use crate::expander::{DuplicatePolicy, ExpandConfig, OccasionExpander};
use crate::frame::{read_survey_csv, records_from_frame, records_to_frame};
use crate::record::sort_records;
use crate::schema::{survey, ZERO_COUNT};
use crate::species::SpeciesList;

#[pyclass(name = "SurveyModel")]
pub struct SurveyModel {
    base_path: PathBuf,
    species: Option<SpeciesList>,
}

#[pymethods]
impl SurveyModel {
    #[new]
    fn new(base_path: String) -> Self {
        Self {
            base_path: PathBuf::from(base_path),
            species: None,
        }
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load the canonical species list, one AOU code per line.
    /// Returns the codes in file order.
    #[pyo3(signature = (filename=None))]
    fn load_species(&mut self, filename: Option<&str>) -> PyResult<Vec<i64>> {
        let fname = filename.unwrap_or("species.txt");
        let list = SpeciesList::load(self.base_path.join(fname))?;
        let codes = list.codes().to_vec();
        self.species = Some(list);
        Ok(codes)
    }

    /// Load a survey CSV into a DataFrame with all columns as strings.
    fn load_survey(&self, filename: &str) -> PyResult<PyDataFrame> {
        let bytes = std::fs::read(self.base_path.join(filename)).map_err(SurveyError::from)?;
        let records = read_survey_csv(&bytes)?;
        Ok(PyDataFrame(records_to_frame(&records)?))
    }

    // ── Densification ───────────────────────────────────────────────────────

    /// Return a frame with one row per loaded species for every
    /// (Route, Year) in `df`, sorted by route and year.
    #[pyo3(signature = (df, allow_duplicate_occasions=false))]
    fn densify(&self, df: PyDataFrame, allow_duplicate_occasions: bool) -> PyResult<PyDataFrame> {
        let species = self
            .species
            .as_ref()
            .ok_or_else(|| SurveyError::NotLoaded("species".into()))?;

        let mut records = records_from_frame(&df.0)?;
        sort_records(&mut records);

        let config = ExpandConfig {
            policy: if allow_duplicate_occasions {
                DuplicatePolicy::Reprocess
            } else {
                DuplicatePolicy::Fail
            },
            ..Default::default()
        };
        let out = OccasionExpander::new(species, config).expand(records)?;
        Ok(PyDataFrame(records_to_frame(&out)?))
    }

    fn species_codes(&self) -> Option<Vec<i64>> {
        self.species.as_ref().map(|s| s.codes().to_vec())
    }
}

/// Export schema constants as a Python submodule
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let columns = PyModule::new(m.py(), "columns")?;
    columns.add("ROUTE", survey::ROUTE)?;
    columns.add("YEAR", survey::YEAR)?;
    columns.add("AOU", survey::AOU)?;
    columns.add("HEADER", survey::HEADER.to_vec())?;
    columns.add("AUX", survey::AUX.to_vec())?;
    columns.add("ZERO_COUNT", ZERO_COUNT)?;
    m.add_submodule(&columns)?;
    Ok(())
}

#[pymodule]
#[pyo3(name = "_core")]
fn core_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<SurveyModel>()?;
    add_schema_exports(m)?;
    Ok(())
}
