use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

use anyhow::Context;
use clap::Parser;
use survey_densify::config::Cli;
use survey_densify::{densify_csv, SpeciesList};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = Cli::parse().run_config();

    // stdout carries the table, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let species = SpeciesList::load(&config.species_path).with_context(|| {
        format!(
            "error loading species from {}",
            config.species_path.display()
        )
    })?;

    let mut input = Vec::new();
    match &config.input {
        Some(path) => {
            File::open(path)
                .and_then(|mut f| f.read_to_end(&mut input))
                .with_context(|| format!("error reading {}", path.display()))?;
        }
        None => {
            io::stdin()
                .lock()
                .read_to_end(&mut input)
                .context("error reading stdin")?;
        }
    }

    let mut output: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("error creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let result = densify_csv(&species, &input, &mut output, config.expand);
    output.flush().context("error writing CSV")?;
    result?;

    Ok(())
}
