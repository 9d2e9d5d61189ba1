use std::io::Write;

use survey_densify::frame::read_survey_csv;
use survey_densify::{
    densify_csv, DuplicatePolicy, ExpandConfig, Occasion, SpeciesList, SurveyError,
};

const HEADER_LINE: &str = "Route,Year,AOU,First,Second,Third,Fourth,Fifth,Stops,Count";

fn species_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create species file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write species file");
    file
}

fn csv(rows: &[&str]) -> String {
    let mut text = String::from(HEADER_LINE);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text
}

fn run(species: &SpeciesList, input: &str, config: ExpandConfig) -> (String, Result<usize, SurveyError>) {
    let mut out = Vec::new();
    let result = densify_csv(species, input.as_bytes(), &mut out, config);
    let text = String::from_utf8(out).expect("output should be UTF-8");
    (text, result.map(|s| s.output_records))
}

#[test]
fn test_single_observation_scenario() {
    let file = species_file("1\n2\n3\n");
    let species = SpeciesList::load(file.path()).unwrap();

    let (text, result) = run(
        &species,
        &csv(&["5,2000,2,1,0,0,0,0,3,4"]),
        ExpandConfig::default(),
    );

    assert_eq!(result.unwrap(), 3);
    assert_eq!(
        text,
        csv(&[
            "5,2000,1,0,0,0,0,0,0,0",
            "5,2000,2,1,0,0,0,0,3,4",
            "5,2000,3,0,0,0,0,0,0,0",
        ])
    );
}

#[test]
fn test_empty_cells_pass_through_unchanged() {
    let species = SpeciesList::new(vec![1, 2]).unwrap();
    let input = csv(&["5,2000,2,1,,0,0,0,3,4"]);

    let (text, result) = run(&species, &input, ExpandConfig::default());
    assert_eq!(result.unwrap(), 2);
    assert_eq!(
        text,
        csv(&["5,2000,1,0,0,0,0,0,0,0", "5,2000,2,1,,0,0,0,3,4"])
    );

    let (again, result) = run(&species, &text, ExpandConfig::default());
    result.unwrap();
    assert_eq!(again, text);
}

#[test]
fn test_short_row_is_fatal() {
    let species = SpeciesList::new(vec![1, 2]).unwrap();
    let mut out = Vec::new();
    let input = csv(&["5,2000,2,1,0,0,0,0,3,4", "5,2000,1,1,0"]);
    let result = densify_csv(&species, input.as_bytes(), &mut out, ExpandConfig::default());
    assert!(matches!(result, Err(SurveyError::ShortRow { row: 2 })));
    assert!(out.is_empty());
}

#[test]
fn test_unknown_species_scenario() {
    let species = SpeciesList::new(vec![1, 2]).unwrap();

    let (text, result) = run(
        &species,
        &csv(&["5,2000,99,9,9,9,9,9,9,9", "5,2000,1,2,0,1,0,0,2,3"]),
        ExpandConfig::default(),
    );

    assert_eq!(result.unwrap(), 2);
    assert_eq!(
        text,
        csv(&["5,2000,1,2,0,1,0,0,2,3", "5,2000,2,0,0,0,0,0,0,0"])
    );
    assert!(!text.contains(",99,"));
}

#[test]
fn test_duplicate_occasion_scenario_flushes_first_block() {
    let species = SpeciesList::new(vec![1, 2]).unwrap();

    let (text, result) = run(
        &species,
        &csv(&[
            "5,2000,1,1,1,1,1,1,1,1",
            "4,1999,2,3,3,3,3,3,3,3",
            "5,2000,1,2,2,2,2,2,2,2",
        ]),
        ExpandConfig::default(),
    );

    match result {
        Err(SurveyError::DuplicateOccasion {
            occasion,
            first_offset,
            ..
        }) => {
            assert_eq!(occasion, Occasion { route: 5, year: 2000 });
            assert_eq!(first_offset, 2);
        }
        other => panic!("unexpected: {other:?}"),
    }
    // The stable sort keeps the two (5,2000,1) rows in input order.
    assert_eq!(
        text,
        csv(&[
            "4,1999,1,0,0,0,0,0,0,0",
            "4,1999,2,3,3,3,3,3,3,3",
            "5,2000,1,1,1,1,1,1,1,1",
            "5,2000,2,0,0,0,0,0,0,0",
        ])
    );
}

#[test]
fn test_duplicate_occasion_reprocessed_when_allowed() {
    let species = SpeciesList::new(vec![1, 2]).unwrap();
    let config = ExpandConfig {
        policy: DuplicatePolicy::Reprocess,
        ..Default::default()
    };

    let (text, result) = run(
        &species,
        &csv(&["5,2000,1,1,1,1,1,1,1,1", "5,2000,1,2,2,2,2,2,2,2"]),
        config,
    );

    assert_eq!(result.unwrap(), 4);
    assert_eq!(
        text,
        csv(&[
            "5,2000,1,1,1,1,1,1,1,1",
            "5,2000,2,0,0,0,0,0,0,0",
            "5,2000,1,2,2,2,2,2,2,2",
            "5,2000,2,0,0,0,0,0,0,0",
        ])
    );
}

#[test]
fn test_unsorted_crlf_input_is_sorted_and_completed() {
    let species = SpeciesList::parse("3\r\n1\r\n2\r\n").unwrap();
    let input = format!(
        "{HEADER_LINE}\r\n\
         7,2001,1,1,0,0,0,0,1,1\r\n\
         2,2005,2,0,1,0,0,0,1,1\r\n\
         7,2001,3,0,0,2,0,0,1,2\r\n"
    );

    let (text, result) = run(&species, &input, ExpandConfig::default());

    assert_eq!(result.unwrap(), 6);
    assert_eq!(
        text,
        csv(&[
            "2,2005,3,0,0,0,0,0,0,0",
            "2,2005,1,0,0,0,0,0,0,0",
            "2,2005,2,0,1,0,0,0,1,1",
            "7,2001,3,0,0,2,0,0,1,2",
            "7,2001,1,1,0,0,0,0,1,1",
            "7,2001,2,0,0,0,0,0,0,0",
        ])
    );
}

#[test]
fn test_dense_output_is_a_fixed_point() {
    let species = SpeciesList::new(vec![10, 20, 30]).unwrap();
    let (first, result) = run(
        &species,
        &csv(&["1,2000,20,4,0,0,0,0,1,4", "2,2000,30,1,1,0,0,0,2,2"]),
        ExpandConfig::default(),
    );
    result.unwrap();

    let (second, result) = run(&species, &first, ExpandConfig::default());
    assert_eq!(result.unwrap(), 6);
    assert_eq!(second, first);
    assert_eq!(read_survey_csv(second.as_bytes()).unwrap().len(), 6);
}

#[test]
fn test_header_only_input_writes_header_only() {
    let species = SpeciesList::new(vec![1]).unwrap();
    let (text, result) = run(&species, &csv(&[]), ExpandConfig::default());
    assert_eq!(result.unwrap(), 0);
    assert_eq!(text, format!("{HEADER_LINE}\n"));
}

#[test]
fn test_bad_header_is_fatal() {
    let species = SpeciesList::new(vec![1]).unwrap();
    let mut out = Vec::new();
    let result = densify_csv(
        &species,
        b"route,year,aou,first,second,third,fourth,fifth,stops,count\n",
        &mut out,
        ExpandConfig::default(),
    );
    assert!(matches!(result, Err(SurveyError::BadHeader(_))));
    assert!(out.is_empty());
}

#[test]
fn test_species_file_errors() {
    let empty = species_file("");
    assert!(matches!(
        SpeciesList::load(empty.path()),
        Err(SurveyError::EmptySpeciesList)
    ));

    let dup = species_file("1\n2\n1\n");
    assert!(matches!(
        SpeciesList::load(dup.path()),
        Err(SurveyError::DuplicateSpecies { code: 1, .. })
    ));

    assert!(matches!(
        SpeciesList::load("/nonexistent/species.txt"),
        Err(SurveyError::Io(_))
    ));
}
