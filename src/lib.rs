pub mod config;
pub mod error;
pub mod expander;
pub mod frame;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod species;

#[cfg(feature = "python")]
mod python;

pub use error::SurveyError;
pub use expander::{DuplicatePolicy, ExpandConfig, ExpansionSummary, OccasionExpander};
pub use pipeline::densify_csv;
pub use record::{sort_records, Occasion, Record};
pub use species::SpeciesList;
