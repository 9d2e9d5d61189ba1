use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::error::SurveyError;
use crate::record::{first_unsorted, Occasion, Record};
use crate::species::SpeciesList;

/// What to do when a (route, year) block shows up after it was already emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Stop the run, leaving the rows emitted so far in the output.
    #[default]
    Fail,
    /// Emit another full block for the repeated occasion.
    Reprocess,
}

#[derive(Debug, Clone, Copy)]
pub struct ExpandConfig {
    pub policy: DuplicatePolicy,
    /// Reject input that is not ordered by (route, year, species).
    pub verify_sorted: bool,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            policy: DuplicatePolicy::Fail,
            verify_sorted: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionSummary {
    pub input_records: usize,
    pub output_records: usize,
    /// Distinct (route, year) tuples.
    pub occasions: usize,
    /// Zero rows inserted for species that were not observed.
    pub synthesized: usize,
    /// Input rows dropped because their species is not in the canonical list.
    pub skipped_unknown: usize,
}

/// Densifies a sorted record set against a canonical species list.
///
/// Every occasion in the input comes out as exactly one row per canonical
/// species, in canonical order. Observed rows pass through untouched; missing
/// species get a zero row. One expander covers one run: the seen-occasion map
/// lives as long as the expander does.
pub struct OccasionExpander<'a> {
    species: &'a SpeciesList,
    config: ExpandConfig,
    /// Map from occasion → output offset of its first block.
    seen: HashMap<Occasion, usize>,
}

impl<'a> OccasionExpander<'a> {
    pub fn new(species: &'a SpeciesList, config: ExpandConfig) -> Self {
        Self {
            species,
            config,
            seen: HashMap::new(),
        }
    }

    /// Expand into a fresh buffer. Partial output is discarded on error;
    /// use [`expand_into`](Self::expand_into) to keep it.
    pub fn expand(&mut self, records: Vec<Record>) -> Result<Vec<Record>, SurveyError> {
        let mut out = Vec::with_capacity(records.len().max(self.species.len()));
        self.expand_into(records, &mut out)?;
        Ok(out)
    }

    /// Expand `records` (sorted by route, year, species) and append the
    /// result to `out`.
    ///
    /// On a fatal duplicate occasion, every block emitted before it remains
    /// in `out` so the caller can flush it.
    pub fn expand_into(
        &mut self,
        records: Vec<Record>,
        out: &mut Vec<Record>,
    ) -> Result<ExpansionSummary, SurveyError> {
        if self.config.verify_sorted {
            if let Some(position) = first_unsorted(&records) {
                return Err(SurveyError::Unsorted { position });
            }
        }

        let start = out.len();
        let mut summary = ExpansionSummary {
            input_records: records.len(),
            ..Default::default()
        };

        let species = self.species;
        let mut slots: Vec<Option<Record>> = vec![None; species.len()];
        let mut input = records.into_iter().enumerate().peekable();

        while let Some((_, head)) = input.peek() {
            let occasion = head.occasion();
            let offset = out.len();

            match self.seen.entry(occasion) {
                Entry::Occupied(first) => match self.config.policy {
                    DuplicatePolicy::Fail => {
                        return Err(SurveyError::DuplicateOccasion {
                            occasion,
                            first_offset: *first.get(),
                            output_offset: offset,
                        });
                    }
                    DuplicatePolicy::Reprocess => {
                        warn!(
                            %occasion,
                            first_offset = *first.get(),
                            offset,
                            "occasion seen again, emitting another block"
                        );
                    }
                },
                Entry::Vacant(slot) => {
                    slot.insert(offset);
                    summary.occasions += 1;
                }
            }

            // Take this occasion's rows until one would land in an already
            // filled slot; that row opens the next block.
            while let Some((position, record)) = input.next_if(|(_, r)| {
                r.occasion() == occasion
                    && species.slot(r.species).map_or(true, |s| slots[s].is_none())
            }) {
                match species.slot(record.species) {
                    Some(s) => slots[s] = Some(record),
                    None => {
                        warn!(
                            species = record.species,
                            %occasion,
                            position,
                            "ignoring unknown species"
                        );
                        summary.skipped_unknown += 1;
                    }
                }
            }

            for (slot, code) in slots.iter_mut().zip(species.iter()) {
                match slot.take() {
                    Some(record) => out.push(record),
                    None => {
                        out.push(Record::zero(occasion.route, occasion.year, code));
                        summary.synthesized += 1;
                    }
                }
            }
            trace!(%occasion, offset, "occasion expanded");
        }

        summary.output_records = out.len() - start;
        debug!(
            occasions = summary.occasions,
            synthesized = summary.synthesized,
            "expansion pass complete"
        );
        Ok(summary)
    }
}
