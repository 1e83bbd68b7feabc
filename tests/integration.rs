use std::io::Write;

use response_quality::{
    score, score_with_config, ScoreError, ScorePercentages, ScoringConfig, WeightOverrides,
};

const STRUCTURED_ANSWER: &str = "\
## Why caching helps\n\
\n\
Caching keeps the results of expensive work close to the code that needs them. \
A cache hit skips the database round trip entirely. \
However, cached results can drift from the source of truth. \
Therefore every cache needs an invalidation plan.\n\
\n\
## Common strategies\n\
\n\
- Time-based expiry drops entries after a fixed interval.\n\
- Write-through caching updates the cache whenever the database changes.\n\
- Explicit invalidation removes entries when a related record is edited.\n\
\n\
Choosing between them depends on how stale the data may safely become. \
Dashboards tolerate minutes of delay, while account balances tolerate none. \
Finally, measure hit rates before and after rollout to confirm the benefit.";

#[test]
fn empty_response_scores_zero_length_and_vocabulary() {
    let result = score("", "Explain caching.", None);
    assert_eq!(result.length_score, 0.0);
    assert_eq!(result.vocabulary_richness_score, 0.0);
    assert_eq!(result.repetition_penalty, 1.0);
    assert_eq!(result.diagnostics.word_count, 0);
    assert_eq!(result.diagnostics.sentence_count, 0);
    assert!((0..=100).contains(&result.overall_score));
}

#[test]
fn short_response_is_exempt_from_repetition() {
    let result = score("yes yes yes yes yes", "", None);
    assert_eq!(result.repetition_penalty, 1.0);
}

#[test]
fn repeated_bigrams_saturate_the_penalty() {
    let result = score("the cat the cat the cat the cat", "", None);
    assert_eq!(result.repetition_penalty, 0.0);
}

#[test]
fn distinct_content_words_vocabulary_example() {
    let result = score(
        "apple banana cherry dragon eagle forest garden harbor island jungle",
        "",
        None,
    );
    assert!(
        (result.vocabulary_richness_score - 0.72).abs() < 0.01,
        "expected ~0.72, got {}",
        result.vocabulary_richness_score
    );
}

#[test]
fn hello_readability_example() {
    let result = score("Hello.", "", None);
    assert!((result.diagnostics.fk_grade - 8.4).abs() < 1e-9);
    assert!(
        (result.readability_score - 0.733).abs() < 0.01,
        "expected ~0.733, got {}",
        result.readability_score
    );
}

#[test]
fn coherence_only_weights_reproduce_coherence() {
    let overrides = WeightOverrides {
        coherence: Some(1.0),
        length: Some(0.0),
        vocab: Some(0.0),
        repetition: Some(0.0),
        readability: Some(0.0),
    };
    let result = score(STRUCTURED_ANSWER, "Explain caching.", Some(&overrides));
    assert_eq!(
        result.overall_score,
        (result.coherence_score * 100.0).round() as i32
    );
}

#[test]
fn requirement_count_is_capped_for_length_target() {
    let twenty: String = (1..=20).map(|i| format!("- point number {i}\n")).collect();
    let ten: String = (1..=10).map(|i| format!("- point number {i}\n")).collect();
    let response = "word ".repeat(650);

    let with_twenty = score(&response, &twenty, None);
    let with_ten = score(&response, &ten, None);

    assert_eq!(with_twenty.diagnostics.requirements.len(), 20);
    assert_eq!(with_ten.diagnostics.requirements.len(), 10);
    assert_eq!(with_twenty.length_score, with_ten.length_score);
}

#[test]
fn scoring_is_deterministic() {
    let overrides = WeightOverrides {
        vocab: Some(0.5),
        ..WeightOverrides::default()
    };
    let a = score(STRUCTURED_ANSWER, "Explain caching.", Some(&overrides));
    let b = score(STRUCTURED_ANSWER, "Explain caching.", Some(&overrides));
    assert_eq!(a, b);
}

#[test]
fn structured_answer_beats_repetitive_answer() {
    let repetitive = "caching is good. caching is good. caching is good. caching is good. \
                      caching is good. caching is good. caching is good. caching is good.";
    let good = score(STRUCTURED_ANSWER, "Explain caching.", None);
    let bad = score(repetitive, "Explain caching.", None);
    assert!(
        good.overall_score > bad.overall_score,
        "structured {} should beat repetitive {}",
        good.overall_score,
        bad.overall_score
    );
}

#[test]
fn json_output_uses_camel_case_keys() {
    let result = score(STRUCTURED_ANSWER, "Explain caching.", None);
    let json = serde_json::to_string_pretty(&result).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in [
        "coherenceScore",
        "lengthScore",
        "vocabularyRichnessScore",
        "repetitionPenalty",
        "readabilityScore",
        "overallScore",
    ] {
        assert!(parsed.get(key).is_some(), "missing {key}");
    }
    let diagnostics = &parsed["diagnostics"];
    assert!(diagnostics.get("sentenceCount").is_some());
    assert!(diagnostics.get("wordCount").is_some());
    assert!(diagnostics.get("fkGrade").is_some());
    assert_eq!(diagnostics["requirements"][0], "Explain caching.");
}

#[test]
fn stored_result_reads_back_unchanged() {
    let result = score(STRUCTURED_ANSWER, "Explain caching.", None);
    let json = serde_json::to_string(&result).unwrap();
    let restored: response_quality::MetricResult = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.overall_score, result.overall_score);
    assert_eq!(restored.diagnostics.requirements, result.diagnostics.requirements);
}

#[test]
fn partial_weight_json_ignores_unknown_keys() {
    let overrides =
        WeightOverrides::from_json_str(r#"{"coherence": 0.5, "style": 3.0}"#).unwrap();
    assert_eq!(overrides.coherence, Some(0.5));
    assert_eq!(overrides.length, None);
}

#[test]
fn config_file_overrides_readability_band() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"weights": {{"length": 0.0}}, "readability": {{"target_grade": 8.4}}}}"#
    )
    .unwrap();

    let config = ScoringConfig::from_path(file.path()).unwrap();
    assert_eq!(config.weights.length, 0.0);
    assert_eq!(config.weights.coherence, 0.3);
    assert_eq!(config.readability.span, 6.0);
    assert_eq!(config.length_target.requirement_cap, 10);

    let result = score_with_config("Hello.", "", &config);
    assert!(result.readability_score > 0.99);
}

#[test]
fn config_errors_are_reported() {
    let missing = ScoringConfig::from_path(std::path::Path::new("/nonexistent/config.json"));
    assert!(matches!(missing, Err(ScoreError::Io { .. })));

    let malformed = ScoringConfig::from_json_str("{not json");
    assert!(matches!(malformed, Err(ScoreError::Json(_))));
}

#[test]
fn percentages_export_as_csv_row() {
    let result = score("Hello.", "", None);
    let row = result.percentages();
    assert_eq!(row.readability, "73.3%");
    assert_eq!(row.repetition, "100.0%");
    assert_eq!(row.overall, result.overall_score.to_string());
    assert_eq!(row.to_csv_row().split(',').count(), 6);
    assert_eq!(
        ScorePercentages::csv_header(),
        "coherence,length,vocabulary,repetition,readability,overall"
    );
}
