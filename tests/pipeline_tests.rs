// Integration tests for the offline pipeline: CSV -> validation -> prompt -> chart

use std::io::Write;
use survey_insight::analysis::{AnalysisType, PromptBuilder, NO_CONTEXT};
use survey_insight::charts::SupportChart;
use survey_insight::data::{
    survey_records, DataLoader, SchemaError, SurveySchema, NULL_CELL, PREVIEW_ROWS,
};
use survey_insight::stats::{compute_gender_gaps, DatasetSummary};

const SURVEY_CSV: &str = "\
Gender,Party,Support,Age Group,Region
Male,Labour,31,18-34,North
Female,Labour,38,18-34,North
Male,Conservative,27,35-54,South
Female,Conservative,24,35-54,South
Male,Reform,22,55+,East
Female,Reform,14,55+,East
Male,Labour,33,55+,West
";

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_survey_csv_to_prompt_and_chart() {
    let file = write_csv(SURVEY_CSV);
    let mut loader = DataLoader::new();
    loader.load_csv(file.path()).unwrap();

    assert_eq!(loader.get_row_count(), 7);
    assert_eq!(loader.preview_rows(PREVIEW_ROWS).len(), PREVIEW_ROWS);

    let columns = SurveySchema::detect(&loader.get_columns()).unwrap();
    assert_eq!(columns.demographics, vec!["Age Group", "Region"]);

    let df = loader.get_dataframe().unwrap();
    let summary = DatasetSummary::from_dataframe(df);
    let names: Vec<&str> = summary.numeric.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Support"]);
    assert_eq!(summary.numeric[0].mean, 27.0);

    let records = survey_records(df, &columns).unwrap();
    let gaps = compute_gender_gaps(&records);
    assert_eq!(gaps.len(), 3);

    let question = AnalysisType::GenderBased.question().unwrap();
    let prompt = PromptBuilder::new(&summary)
        .with_gender_gaps(&gaps)
        .build(question, Some("   "));
    assert!(prompt.contains("Columns: Gender, Party, Support, Age Group, Region"));
    assert!(prompt.contains("Total Rows: 7"));
    assert!(prompt.contains(&format!("Additional Context: {}", NO_CONTEXT)));
    assert!(prompt.contains(&format!("Question: {}", question)));

    let chart = SupportChart::from_columns(df, &columns).unwrap();
    assert_eq!(chart.parties, vec!["Labour", "Conservative", "Reform"]);
    // Two Male/Labour rows are averaged
    assert_eq!(chart.values[0][0], Some(32.0));
}

#[test]
fn test_missing_columns_are_named() {
    let file = write_csv("gender,Votes\nMale,10\n");
    let mut loader = DataLoader::new();
    loader.load_csv(file.path()).unwrap();

    let err = SurveySchema::detect(&loader.get_columns()).unwrap_err();
    let SchemaError::MissingColumns(missing) = &err;
    assert_eq!(missing, &vec!["Party".to_string(), "Support".to_string()]);
    assert_eq!(err.to_string(), "Missing required column(s): Party, Support");

    // Narrative analysis still works on such files; only the chart is refused
    assert!(SupportChart::from_dataframe(loader.get_dataframe().unwrap()).is_err());
}

#[test]
fn test_blank_cells_preview_as_nan() {
    let file = write_csv("Gender,Party,Support\nMale,,31\nFemale,Labour,\n");
    let mut loader = DataLoader::new();
    loader.load_csv(file.path()).unwrap();

    let preview = loader.preview_rows(PREVIEW_ROWS);
    assert_eq!(preview[0][1], NULL_CELL);
    assert_eq!(preview[1][2], NULL_CELL);
}
