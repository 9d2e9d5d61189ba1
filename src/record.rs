use std::cmp::Ordering;
use std::fmt;

use crate::error::SurveyError;
use crate::schema::{survey, AUX_FIELD_COUNT, ZERO_COUNT};

/// Auxiliary count columns, carried verbatim.
pub type AuxFields = [String; AUX_FIELD_COUNT];

/// One (route, year) survey event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Occasion {
    pub route: i64,
    pub year: i64,
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{}}}", self.route, self.year)
    }
}

/// A single survey row: one species on one occasion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub route: i64,
    pub year: i64,
    pub species: i64,
    pub fields: AuxFields,
}

impl Record {
    pub fn new(route: i64, year: i64, species: i64, fields: AuxFields) -> Self {
        Self {
            route,
            year,
            species,
            fields,
        }
    }

    /// Synthesized row for a species that was not observed.
    pub fn zero(route: i64, year: i64, species: i64) -> Self {
        Self::new(
            route,
            year,
            species,
            std::array::from_fn(|_| ZERO_COUNT.to_string()),
        )
    }

    pub fn occasion(&self) -> Occasion {
        Occasion {
            route: self.route,
            year: self.year,
        }
    }

    /// Sort key: (route, year, species).
    pub fn key(&self) -> (i64, i64, i64) {
        (self.route, self.year, self.species)
    }

    pub fn cmp_key(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }

    /// Decode one data row. `row` is the 1-based data row number used in errors.
    /// Columns past the tenth are ignored.
    pub fn from_row(row: usize, cells: &[&str]) -> Result<Self, SurveyError> {
        if cells.len() < survey::HEADER.len() {
            return Err(SurveyError::ShortRow { row });
        }

        let parse = |idx: usize| -> Result<i64, SurveyError> {
            cells[idx]
                .parse::<i64>()
                .map_err(|_| SurveyError::BadInteger {
                    row,
                    column: survey::KEY[idx],
                    value: cells[idx].to_string(),
                })
        };

        let route = parse(0)?;
        let year = parse(1)?;
        let species = parse(2)?;
        let fields = std::array::from_fn(|i| cells[survey::KEY.len() + i].to_string());

        Ok(Self::new(route, year, species, fields))
    }

    /// Encode in `survey::HEADER` column order.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(survey::HEADER.len());
        row.push(self.route.to_string());
        row.push(self.year.to_string());
        row.push(self.species.to_string());
        row.extend(self.fields.iter().cloned());
        row
    }
}

/// Stable sort by (route, year, species).
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(Record::cmp_key);
}

/// Position of the first record that orders before its predecessor.
pub fn first_unsorted(records: &[Record]) -> Option<usize> {
    records
        .windows(2)
        .position(|w| w[0].cmp_key(&w[1]) == Ordering::Greater)
        .map(|i| i + 1)
}

#[cfg(test)]
impl Record {
    pub(crate) fn is_zero_filled(&self) -> bool {
        self.fields.iter().all(|f| f == ZERO_COUNT)
    }
}
