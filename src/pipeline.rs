use std::io::Write;

use tracing::info;

use crate::error::SurveyError;
use crate::expander::{ExpandConfig, ExpansionSummary, OccasionExpander};
use crate::frame::{read_survey_csv, write_survey_csv};
use crate::record::sort_records;
use crate::species::SpeciesList;

/// Parse, sort, expand and write one survey table.
///
/// Whatever the expander produced is written before an expansion error is
/// returned, so a duplicate-occasion failure still leaves the completed
/// blocks in `output`.
pub fn densify_csv<W: Write>(
    species: &SpeciesList,
    input: &[u8],
    output: W,
    config: ExpandConfig,
) -> Result<ExpansionSummary, SurveyError> {
    let mut records = read_survey_csv(input)?;
    info!(records = records.len(), species = species.len(), "loaded survey");
    sort_records(&mut records);

    let mut out = Vec::with_capacity(records.len().max(species.len()));
    let result = OccasionExpander::new(species, config).expand_into(records, &mut out);
    write_survey_csv(output, &out)?;

    let summary = result?;
    info!(
        from = summary.input_records,
        to = summary.output_records,
        "expanded"
    );
    info!(
        tuples = summary.occasions,
        synthesized = summary.synthesized,
        skipped_unknown = summary.skipped_unknown,
        "unique {{route,year}} tuples"
    );
    Ok(summary)
}
