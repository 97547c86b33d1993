//! Unsupervised single-word keyword extraction (YAKE).
//!
//! Scores combine five statistical features of each candidate term; a lower score
//! means a more relevant keyword.

use super::lexicon::STOPWORDS;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    /// Lower is more relevant
    pub score: f64,
}

/// Co-occurrence window, in tokens, on each side of a term
const WINDOW: usize = 1;
const MIN_TERM_CHARS: usize = 3;

#[derive(Default)]
struct TermStats {
    tf: usize,
    /// Capitalized occurrences not at sentence start
    tf_upper: usize,
    /// All-caps occurrences
    tf_acronym: usize,
    sentences: Vec<usize>,
    left: HashMap<String, usize>,
    right: HashMap<String, usize>,
}

fn split_sentences(text: &str) -> Vec<&str> {
    text.split_inclusive(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn tokenize(sentence: &str) -> Vec<&str> {
    sentence
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|t| t.trim_matches(|c| c == '\'' || c == '-'))
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_candidate(lower: &str) -> bool {
    lower.chars().count() >= MIN_TERM_CHARS
        && !STOPWORDS.contains(&lower)
        && !lower.chars().all(|c| c.is_numeric() || c == '-' || c == '\'')
}

fn median(values: &[usize]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    if n == 0 {
        0.0
    } else if n % 2 == 1 {
        sorted[n / 2] as f64
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
    }
}

/// Extract the `top_n` most relevant single-word terms, sorted ascending by score.
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<Keyword> {
    let sentences = split_sentences(text);
    let mut stats: HashMap<String, TermStats> = HashMap::new();

    for (sentence_idx, sentence) in sentences.iter().enumerate() {
        let tokens = tokenize(sentence);
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        for (pos, token) in tokens.iter().enumerate() {
            let lower = &lowered[pos];
            if !is_candidate(lower) {
                continue;
            }

            let entry = stats.entry(lower.clone()).or_default();
            entry.tf += 1;
            entry.sentences.push(sentence_idx);

            let is_acronym =
                token.chars().count() > 1 && token.chars().all(|c| !c.is_lowercase());
            if is_acronym {
                entry.tf_acronym += 1;
            } else if pos > 0 && token.chars().next().is_some_and(char::is_uppercase) {
                entry.tf_upper += 1;
            }

            for offset in 1..=WINDOW {
                if pos >= offset {
                    let neighbour = &lowered[pos - offset];
                    if is_candidate(neighbour) {
                        *entry.left.entry(neighbour.clone()).or_default() += 1;
                    }
                }
                if let Some(neighbour) = lowered.get(pos + offset) {
                    if is_candidate(neighbour) {
                        *entry.right.entry(neighbour.clone()).or_default() += 1;
                    }
                }
            }
        }
    }

    if stats.is_empty() {
        return Vec::new();
    }

    let tfs: Vec<f64> = stats.values().map(|s| s.tf as f64).collect();
    let mean_tf = tfs.iter().sum::<f64>() / tfs.len() as f64;
    let std_tf =
        (tfs.iter().map(|tf| (tf - mean_tf).powi(2)).sum::<f64>() / tfs.len() as f64).sqrt();
    let max_tf = tfs.iter().copied().fold(1.0, f64::max);
    let sentence_count = sentences.len().max(1) as f64;

    let mut keywords: Vec<Keyword> = stats
        .iter()
        .map(|(term, s)| {
            let tf = s.tf as f64;

            let t_case = s.tf_upper.max(s.tf_acronym) as f64 / (1.0 + tf.ln());
            let t_pos = (3.0 + median(&s.sentences)).ln().ln();
            let t_freq = tf / (mean_tf + std_tf);

            let dl = diversity(&s.left);
            let dr = diversity(&s.right);
            let t_rel = 1.0 + (dl + dr) * (tf / max_tf);

            let distinct_sentences: HashSet<usize> = s.sentences.iter().copied().collect();
            let t_sent = distinct_sentences.len() as f64 / sentence_count;

            let score = (t_rel * t_pos) / (t_case + t_freq / t_rel + t_sent / t_rel);
            Keyword {
                term: term.clone(),
                score,
            }
        })
        .collect();

    keywords.sort_by(|a, b| a.score.total_cmp(&b.score).then_with(|| a.term.cmp(&b.term)));
    keywords.truncate(top_n);
    keywords
}

/// Distinct neighbours over total neighbour occurrences; 0 with no neighbours.
fn diversity(neighbours: &HashMap<String, usize>) -> f64 {
    let total: usize = neighbours.values().sum();
    if total == 0 {
        0.0
    } else {
        neighbours.len() as f64 / total as f64
    }
}
