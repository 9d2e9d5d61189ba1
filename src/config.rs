use std::path::PathBuf;

use clap::Parser;

use crate::expander::{DuplicatePolicy, ExpandConfig};

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub species_path: PathBuf,
    /// `None` reads stdin.
    pub input: Option<PathBuf>,
    /// `None` writes stdout.
    pub output: Option<PathBuf>,
    pub expand: ExpandConfig,
    pub log_level: String,
}

#[derive(Parser, Debug)]
#[command(
    name = "survey-densify",
    about = "Ensure every {route, year} tuple has a row for each species",
    after_help = "Example:\n  survey-densify -s speciesList.txt < bcrnozeroes.csv > bcrwithzeroes.csv"
)]
pub struct Cli {
    /// File containing the full species list, one AOU code per line
    #[arg(short = 's', long = "species")]
    pub species: PathBuf,

    /// Survey CSV to read (defaults to stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where to write the densified CSV (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit another block for a repeated {route, year} tuple instead of failing
    #[arg(long)]
    pub allow_duplicate_occasions: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn run_config(self) -> RunConfig {
        let policy = if self.allow_duplicate_occasions {
            DuplicatePolicy::Reprocess
        } else {
            DuplicatePolicy::Fail
        };

        RunConfig {
            species_path: self.species,
            input: self.input,
            output: self.output,
            expand: ExpandConfig {
                policy,
                ..Default::default()
            },
            log_level: self.log_level,
        }
    }
}
