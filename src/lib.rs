//! Heuristic quality scoring for LLM responses.
//!
//! A response (and the prompt that produced it) is reduced to five
//! independent sub-scores in `[0, 1]`:
//! - coherence: cohesion between adjacent sentences plus structure signals
//! - length fit: word count against a target derived from the prompt
//! - vocabulary richness: type-token ratio and hapax share of content words
//! - repetition penalty: repeated adjacent bigrams
//! - readability: Flesch-Kincaid grade against a target band
//!
//! The sub-scores are combined by a weighted sum into an overall score in
//! `[0, 100]`. Every function here is pure; nothing is cached between calls.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures at the edges of the engine (loading config and input files).
/// Scoring itself never fails.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScoreError>;

/// Read a UTF-8 text file, attaching the path to any I/O error.
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ScoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub sentence_count: usize,
    pub word_count: usize,
    pub requirements: Vec<String>,
    /// Raw Flesch-Kincaid grade, not clamped.
    pub fk_grade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResult {
    pub coherence_score: f64,
    pub length_score: f64,
    pub vocabulary_richness_score: f64,
    pub repetition_penalty: f64,
    pub readability_score: f64,
    pub overall_score: i32,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readability {
    pub score: f64,
    pub grade: f64,
}

/// Sub-scores rendered as percentage strings for reports and CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScorePercentages {
    pub coherence: String,
    pub length: String,
    pub vocabulary: String,
    pub repetition: String,
    pub readability: String,
    pub overall: String,
}

impl MetricResult {
    pub fn percentages(&self) -> ScorePercentages {
        ScorePercentages {
            coherence: percent(self.coherence_score),
            length: percent(self.length_score),
            vocabulary: percent(self.vocabulary_richness_score),
            repetition: percent(self.repetition_penalty),
            readability: percent(self.readability_score),
            overall: self.overall_score.to_string(),
        }
    }
}

impl ScorePercentages {
    pub fn csv_header() -> &'static str {
        "coherence,length,vocabulary,repetition,readability,overall"
    }

    pub fn to_csv_row(&self) -> String {
        [
            self.coherence.as_str(),
            self.length.as_str(),
            self.vocabulary.as_str(),
            self.repetition.as_str(),
            self.readability.as_str(),
            self.overall.as_str(),
        ]
        .join(",")
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Per-metric weights for the overall score. They are not normalized; the
/// overall score is the raw weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub coherence: f64,
    pub length: f64,
    pub vocab: f64,
    pub repetition: f64,
    pub readability: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            coherence: 0.3,
            length: 0.2,
            vocab: 0.25,
            repetition: 0.1,
            readability: 0.15,
        }
    }
}

impl Weights {
    /// Apply caller overrides key by key. `None` keeps the current weight.
    pub fn merged(&self, overrides: &WeightOverrides) -> Self {
        Self {
            coherence: overrides.coherence.unwrap_or(self.coherence),
            length: overrides.length.unwrap_or(self.length),
            vocab: overrides.vocab.unwrap_or(self.vocab),
            repetition: overrides.repetition.unwrap_or(self.repetition),
            readability: overrides.readability.unwrap_or(self.readability),
        }
    }
}

/// A partial weight map. Unknown keys in JSON input are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coherence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocab: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readability: Option<f64>,
}

impl WeightOverrides {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading weight overrides");
        Self::from_json_str(&read_text(path)?)
    }
}

/// Word-count target for the length-fit metric:
/// `base + per_requirement * min(requirement_cap, requirements)`, kept
/// within `[min_words, max_words]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthTarget {
    pub base: f64,
    pub per_requirement: f64,
    pub min_words: f64,
    pub max_words: f64,
    pub requirement_cap: usize,
}

impl Default for LengthTarget {
    fn default() -> Self {
        Self {
            base: 100.0,
            per_requirement: 60.0,
            min_words: 60.0,
            max_words: 1200.0,
            requirement_cap: 10,
        }
    }
}

impl LengthTarget {
    pub fn target_words(&self, requirement_count: usize) -> f64 {
        let reqs = requirement_count.max(1).min(self.requirement_cap.max(1));
        (self.base + self.per_requirement * reqs as f64)
            .max(self.min_words)
            .min(self.max_words)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadabilityBand {
    pub target_grade: f64,
    pub span: f64,
}

impl Default for ReadabilityBand {
    fn default() -> Self {
        Self {
            target_grade: 10.0,
            span: 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: Weights,
    pub length_target: LengthTarget,
    pub readability: ReadabilityBand,
}

impl ScoringConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading scoring config");
        Self::from_json_str(&read_text(path)?)
    }
}

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

struct Hyperparameters {
    content_word_min_chars: usize,
    short_text_long_tokens: usize,
    short_text_long_coherence: f64,
    short_text_coherence: f64,
    stability_variance_scale: f64,
    cohesion_similarity_weight: f64,
    cohesion_stability_weight: f64,
    cohesion_transition_weight: f64,
    heading_bonus: f64,
    list_line_bonus_step: f64,
    list_line_bonus_cap: f64,
    ideal_sentences_per_paragraph: f64,
    paragraph_balance_span: f64,
    paragraph_balance_weight: f64,
    wall_of_text_chars: usize,
    wall_of_text_penalty: f64,
    short_answer_words: usize,
    sigma_base: f64,
    sigma_per_word: f64,
    sigma_cap: f64,
    hard_min_ratio: f64,
    hard_max_ratio: f64,
    length_penalty_weight: f64,
    structure_sentences_per_paragraph: f64,
    structure_floor: f64,
    ttr_weight: f64,
    hapax_weight: f64,
    vocab_baseline: f64,
    vocab_damp_offset: f64,
    vocab_damp_divisor: f64,
    repetition_min_tokens: usize,
    repetition_tokens_per_repeat: f64,
    score_min: i32,
    score_max: i32,
}

static HP: Hyperparameters = Hyperparameters {
    content_word_min_chars: 3,
    short_text_long_tokens: 40,
    short_text_long_coherence: 0.6,
    short_text_coherence: 0.5,
    stability_variance_scale: 3.0,
    cohesion_similarity_weight: 0.6,
    cohesion_stability_weight: 0.2,
    cohesion_transition_weight: 0.1,
    heading_bonus: 0.12,
    list_line_bonus_step: 0.02,
    list_line_bonus_cap: 0.12,
    ideal_sentences_per_paragraph: 4.0,
    paragraph_balance_span: 6.0,
    paragraph_balance_weight: 0.1,
    wall_of_text_chars: 600,
    wall_of_text_penalty: 0.1,
    short_answer_words: 40,
    sigma_base: 0.28,
    sigma_per_word: 0.0004,
    sigma_cap: 0.9,
    hard_min_ratio: 0.5,
    hard_max_ratio: 1.8,
    length_penalty_weight: 0.6,
    structure_sentences_per_paragraph: 6.0,
    structure_floor: 0.9,
    ttr_weight: 0.7,
    hapax_weight: 0.3,
    vocab_baseline: 0.2,
    vocab_damp_offset: 10.0,
    vocab_damp_divisor: 2.0,
    repetition_min_tokens: 6,
    repetition_tokens_per_repeat: 12.0,
    score_min: 0,
    score_max: 100,
};

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());

// Group 1 is the terminator, which stays with the sentence it ends.
static SENTENCE_BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?])\s+|\n+").unwrap());

static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

static HEADING_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:#{1,6}\s|[0-9]+\.\s|[-*\u{2022}]\s)").unwrap());

static LIST_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*\u{2022}]|[0-9]+\.)\s").unwrap());

static BULLET_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*\u{2022}]|[0-9]+\.)\s+(.*)$").unwrap());

static IMPERATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    let verbs = [
        "write",
        "create",
        "explain",
        "compare",
        "list",
        "design",
        "implement",
        "show",
        "build",
        "summarize",
        "analyze",
        "evaluate",
        "provide",
        "outline",
        "generate",
    ];
    Regex::new(&format!(r"(?i)^(?:{})\b", verbs.join("|"))).unwrap()
});

static VOWEL_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[aeiouy]+").unwrap());

// ---------------------------------------------------------------------------
// Word lists
// ---------------------------------------------------------------------------

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "if", "then", "else", "when", "at", "by", "for",
        "with", "about", "into", "through", "during", "before", "after", "above", "below", "to",
        "from", "up", "down", "in", "out", "on", "off", "over", "under", "again", "once", "here",
        "there", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such",
        "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "can", "will",
        "just", "should", "now", "is", "are", "was", "were", "be", "been", "has", "have", "had",
        "do", "does", "did", "this", "that", "these", "those", "it", "its", "of", "as", "you",
        "we", "they",
    ]
    .into_iter()
    .collect()
});

// "in" and "conclusion" are separate entries, so a bare "in" counts as a
// transition. Default weights were calibrated with this lexicon.
static TRANSITIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "however",
        "therefore",
        "thus",
        "furthermore",
        "moreover",
        "additionally",
        "consequently",
        "meanwhile",
        "nevertheless",
        "hence",
        "similarly",
        "likewise",
        "first",
        "second",
        "third",
        "finally",
        "next",
        "then",
        "also",
        "in",
        "conclusion",
    ]
    .into_iter()
    .collect()
});

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

fn content_word_set(sentence: &str) -> HashSet<String> {
    tokenize_words(sentence)
        .into_iter()
        .filter(|t| is_content_word(t))
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count().max(1);
    intersection as f64 / union as f64
}

fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}

// ---------------------------------------------------------------------------
// Tokenization and segmentation
// ---------------------------------------------------------------------------

/// Lowercase word tokens. Anything outside `[a-z0-9]`, whitespace and `-`
/// becomes a separator, so hyphenated compounds stay whole.
pub fn tokenize_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_WORD_RE
        .replace_all(&lowered, " ")
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Split on `.`, `!` or `?` followed by whitespace, or on newline runs.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for caps in SENTENCE_BOUNDARY_RE.captures_iter(text) {
        let Some(boundary) = caps.get(0) else {
            continue;
        };
        let end = caps.get(1).map_or(boundary.start(), |m| m.end());
        push_trimmed(&mut sentences, &text[start..end]);
        start = boundary.end();
    }
    push_trimmed(&mut sentences, &text[start..]);

    if sentences.is_empty() {
        push_trimmed(&mut sentences, text);
    }
    sentences
}

pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    for piece in PARAGRAPH_BREAK_RE.split(text) {
        push_trimmed(&mut paragraphs, piece);
    }
    paragraphs
}

pub fn is_content_word(token: &str) -> bool {
    token.chars().count() >= HP.content_word_min_chars && !STOPWORDS.contains(token)
}

/// Tokens that are neither stopwords nor two characters or shorter.
pub fn content_words(tokens: &[String]) -> Vec<&str> {
    tokens
        .iter()
        .map(String::as_str)
        .filter(|t| is_content_word(t))
        .collect()
}

// ---------------------------------------------------------------------------
// Line predicates
// ---------------------------------------------------------------------------

/// Markdown heading, numbered line or bulleted line.
pub fn is_heading_line(line: &str) -> bool {
    HEADING_LINE_RE.is_match(line)
}

pub fn is_list_line(line: &str) -> bool {
    LIST_LINE_RE.is_match(line)
}

/// The text after a bullet (`-`, `*`, `•`) or `N.` marker, if the line has one.
pub fn bullet_item(line: &str) -> Option<&str> {
    BULLET_ITEM_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

pub fn starts_with_imperative(line: &str) -> bool {
    IMPERATIVE_RE.is_match(line)
}

pub fn is_transition_token(token: &str) -> bool {
    TRANSITIONS.contains(token)
}

// ---------------------------------------------------------------------------
// Requirement extraction
// ---------------------------------------------------------------------------

/// Discrete asks in a prompt: list items and lines opening with an
/// imperative verb. Falls back to the whole prompt when none are found.
pub fn extract_requirements(prompt: &str) -> Vec<String> {
    let mut requirements: Vec<String> = prompt
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match bullet_item(line) {
            Some(item) => Some(item.to_string()),
            None if starts_with_imperative(line) => Some(line.to_string()),
            None => None,
        })
        .collect();

    if requirements.is_empty() {
        push_trimmed(&mut requirements, prompt);
    }
    requirements
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

pub fn coherence_score(text: &str) -> f64 {
    let sentences = split_sentences(text);
    if sentences.len() <= 1 {
        return if tokenize_words(text).len() > HP.short_text_long_tokens {
            HP.short_text_long_coherence
        } else {
            HP.short_text_coherence
        };
    }

    let word_sets: Vec<HashSet<String>> = sentences.iter().map(|s| content_word_set(s)).collect();
    let similarities: Vec<f64> = word_sets
        .windows(2)
        .map(|pair| jaccard(&pair[0], &pair[1]))
        .collect();
    let (mean, variance) = mean_and_variance(&similarities);
    let stability = 1.0 - (variance * HP.stability_variance_scale).min(1.0);

    let has_headings = text.lines().any(is_heading_line);
    let list_lines = text.lines().filter(|line| is_list_line(line)).count();
    let paragraphs = split_paragraphs(text);
    let avg_sentences_per_paragraph = sentences.len() as f64 / paragraphs.len().max(1) as f64;

    let wall_of_text = paragraphs
        .iter()
        .any(|p| p.chars().count() > HP.wall_of_text_chars && !p.contains('\n'));
    let paragraph_penalty = if wall_of_text {
        HP.wall_of_text_penalty
    } else {
        0.0
    };

    let transition_sentences = sentences
        .iter()
        .filter(|s| tokenize_words(s).iter().any(|t| is_transition_token(t)))
        .count();
    let transition_score =
        (transition_sentences as f64 / (sentences.len() - 1).max(1) as f64).min(1.0);

    let heading_bonus = if has_headings { HP.heading_bonus } else { 0.0 };
    let list_bonus = (list_lines as f64 * HP.list_line_bonus_step).min(HP.list_line_bonus_cap);
    let balance = clamp01(
        1.0 - (avg_sentences_per_paragraph - HP.ideal_sentences_per_paragraph).abs()
            / HP.paragraph_balance_span,
    );
    let structure_bonus = heading_bonus + list_bonus + balance * HP.paragraph_balance_weight;

    let cohesion = clamp01(
        HP.cohesion_similarity_weight * mean
            + HP.cohesion_stability_weight * stability
            + HP.cohesion_transition_weight * transition_score
            + structure_bonus,
    );
    clamp01(cohesion - paragraph_penalty)
}

/// Gaussian fit of the response word count around a target derived from
/// the number of prompt requirements.
pub fn length_fit_score(response: &str, requirement_count: usize, target: &LengthTarget) -> f64 {
    let words = tokenize_words(response).len();
    if words == 0 {
        return 0.0;
    }

    let target_words = target.target_words(requirement_count);
    let ratio = words as f64 / target_words;
    let sigma = (HP.sigma_base + HP.sigma_per_word * target_words).min(HP.sigma_cap);
    let mut score = (-(ratio - 1.0).powi(2) / (2.0 * sigma * sigma)).exp();

    if words < HP.short_answer_words {
        score *= words as f64 / HP.short_answer_words as f64;
    }

    let hard_min = (target_words * HP.hard_min_ratio).floor();
    let hard_max = (target_words * HP.hard_max_ratio).ceil().max(1.0);
    let words_f = words as f64;
    let penalty = if words_f < hard_min {
        (hard_min - words_f) / hard_min
    } else if words_f > hard_max {
        (words_f - hard_max) / hard_max
    } else {
        0.0
    };

    let sentences = split_sentences(response).len();
    let paragraphs = split_paragraphs(response).len().max(1);
    let structure_bonus =
        clamp01(sentences as f64 / paragraphs as f64 / HP.structure_sentences_per_paragraph);

    clamp01(
        score
            * (1.0 - HP.length_penalty_weight * penalty)
            * (HP.structure_floor + (1.0 - HP.structure_floor) * structure_bonus),
    )
}

pub fn vocabulary_richness_score(text: &str) -> f64 {
    let tokens = tokenize_words(text);
    let words = content_words(&tokens);
    if words.is_empty() {
        return 0.0;
    }

    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    for &word in &words {
        *frequencies.entry(word).or_insert(0) += 1;
    }
    let n = words.len() as f64;
    let unique = frequencies.len();
    let hapax = frequencies.values().filter(|&&count| count == 1).count();

    let ttr = unique as f64 / n;
    let hapax_ratio = hapax as f64 / unique.max(1) as f64;
    let length_damp = ((n + HP.vocab_damp_offset).log10() / HP.vocab_damp_divisor).min(1.0);

    let base = clamp01(HP.ttr_weight * ttr + HP.hapax_weight * hapax_ratio);
    clamp01(base * length_damp + HP.vocab_baseline * (1.0 - length_damp))
}

/// 1.0 means no repeated bigrams; texts under six tokens are exempt.
pub fn repetition_penalty_score(text: &str) -> f64 {
    let tokens = tokenize_words(text);
    if tokens.len() < HP.repetition_min_tokens {
        return 1.0;
    }

    let mut bigrams: HashMap<(&str, &str), usize> = HashMap::new();
    for pair in tokens.windows(2) {
        *bigrams.entry((pair[0].as_str(), pair[1].as_str())).or_insert(0) += 1;
    }
    let repeats: usize = bigrams
        .values()
        .filter(|&&count| count > 1)
        .map(|count| count - 1)
        .sum();

    let allowance = (tokens.len() as f64 / HP.repetition_tokens_per_repeat).max(1.0);
    let penalty = (repeats as f64 / allowance).min(1.0);
    1.0 - penalty
}

/// Vowel-group syllable estimate. A trailing silent `e` is dropped first;
/// any word with letters has at least one syllable.
pub fn syllable_count(word: &str) -> usize {
    let letters: String = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if letters.is_empty() {
        return 0;
    }
    let stem = letters.strip_suffix('e').unwrap_or(&letters);
    VOWEL_RUN_RE.find_iter(stem).count().max(1)
}

pub fn readability(text: &str, band: &ReadabilityBand) -> Readability {
    let tokens = tokenize_words(text);
    let words = tokens.len().max(1) as f64;
    let sentences = split_sentences(text).len().max(1) as f64;
    let syllables: usize = tokens.iter().map(|t| syllable_count(t)).sum();

    let grade = 0.39 * (words / sentences) + 11.8 * (syllables as f64 / words) - 15.59;
    let distance = ((grade - band.target_grade).abs() / band.span).min(1.0);

    Readability {
        score: clamp01(1.0 - distance),
        grade,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score `response` against `prompt` with the default configuration and
/// optional weight overrides.
pub fn score(response: &str, prompt: &str, overrides: Option<&WeightOverrides>) -> MetricResult {
    let mut config = ScoringConfig::default();
    if let Some(overrides) = overrides {
        config.weights = config.weights.merged(overrides);
    }
    score_with_config(response, prompt, &config)
}

#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(response_len = response.len(), prompt_len = prompt.len())
)]
pub fn score_with_config(response: &str, prompt: &str, config: &ScoringConfig) -> MetricResult {
    let requirements = extract_requirements(prompt);
    let w = &config.weights;

    let coherence = clamp01(coherence_score(response));
    let length = clamp01(length_fit_score(
        response,
        requirements.len(),
        &config.length_target,
    ));
    let vocab = clamp01(vocabulary_richness_score(response));
    let repetition = clamp01(repetition_penalty_score(response));
    let read = readability(response, &config.readability);
    let readability_score = clamp01(read.score);

    let weighted_sum = coherence * w.coherence
        + length * w.length
        + vocab * w.vocab
        + repetition * w.repetition
        + readability_score * w.readability;
    let overall = ((weighted_sum * 100.0).round() as i32).clamp(HP.score_min, HP.score_max);

    debug!(
        coherence,
        length,
        vocab,
        repetition,
        readability = readability_score,
        overall,
        requirements = requirements.len(),
        "scored response"
    );

    MetricResult {
        coherence_score: coherence,
        length_score: length,
        vocabulary_richness_score: vocab,
        repetition_penalty: repetition,
        readability_score,
        overall_score: overall,
        diagnostics: Diagnostics {
            sentence_count: split_sentences(response).len(),
            word_count: tokenize_words(response).len(),
            requirements,
            fk_grade: read.grade,
        },
    }
}
