use std::collections::HashMap;
use std::path::Path;

use crate::error::SurveyError;

/// Canonical, ordered, duplicate-free species codes.
///
/// Defines both the set of species every occasion is expanded against and
/// the order they are emitted in.
#[derive(Debug, Clone)]
pub struct SpeciesList {
    codes: Vec<i64>,
    /// Map from species code → canonical slot.
    slots: HashMap<i64, usize>,
}

impl SpeciesList {
    pub fn new(codes: Vec<i64>) -> Result<Self, SurveyError> {
        if codes.is_empty() {
            return Err(SurveyError::EmptySpeciesList);
        }

        let mut slots = HashMap::with_capacity(codes.len());
        for (i, &code) in codes.iter().enumerate() {
            if let Some(first) = slots.insert(code, i) {
                return Err(SurveyError::DuplicateSpecies {
                    code,
                    first: first + 1,
                    second: i + 1,
                });
            }
        }

        Ok(Self { codes, slots })
    }

    /// Parse one base-10 code per line. Blank or non-numeric lines are fatal.
    pub fn parse(text: &str) -> Result<Self, SurveyError> {
        let codes = text
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let tok = line.trim();
                tok.parse::<i64>().map_err(|_| SurveyError::BadSpecies {
                    line: i + 1,
                    value: tok.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(codes)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SurveyError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn codes(&self) -> &[i64] {
        &self.codes
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.codes.iter().copied()
    }

    pub fn slot(&self, code: i64) -> Option<usize> {
        self.slots.get(&code).copied()
    }
}
