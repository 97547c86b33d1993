use super::lexicon::{INTENSIFIERS, NEGATIONS, VALENCE};
use super::preprocess::{clean_text, words};
use super::{softmax, CLASSIFY_CONCURRENCY};
use crate::error::AnalysisError;
use crate::fetch::Comment;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    #[serde(flatten)]
    pub comment: Comment,
    pub label: Sentiment,
    /// Probability of `label`, in [0, 1]
    pub confidence: f64,
}

#[async_trait::async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify already-cleaned comment text
    async fn classify(&self, text: &str) -> Result<(Sentiment, f64), AnalysisError>;
}

/// Label every comment. Output order and length match the input.
pub async fn analyze_comments(
    classifier: Arc<dyn SentimentClassifier>,
    comments: Vec<Comment>,
) -> Result<Vec<SentimentResult>, AnalysisError> {
    stream::iter(comments)
        .map(|comment| {
            let classifier = classifier.clone();
            async move {
                let cleaned = clean_text(&comment.text);
                let (label, confidence) = classifier.classify(&cleaned).await?;
                Ok::<_, AnalysisError>(SentimentResult {
                    comment,
                    label,
                    confidence: confidence.clamp(0.0, 1.0),
                })
            }
        })
        .buffered(CLASSIFY_CONCURRENCY)
        .try_collect()
        .await
}

/// Offline valence-lexicon classifier with negation and intensifier handling.
pub struct LexiconSentiment {
    valence: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl LexiconSentiment {
    /// Logit given to "neutral"; scores must clear it to win
    const NEUTRAL_BIAS: f64 = 0.6;

    pub fn new() -> Self {
        Self {
            valence: VALENCE.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    /// Mean signed valence of the sentiment-bearing words, scaled to roughly [-3, 3]
    pub fn score(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut hits = 0usize;
        let mut negate_window = 0usize;
        let mut boost = 1.0;

        for word in words(text) {
            if NEGATIONS.contains(&word.as_str()) {
                negate_window = 3;
                continue;
            }
            if let Some(multiplier) = self.intensifiers.get(word.as_str()) {
                boost *= multiplier;
                continue;
            }
            if let Some(valence) = self.valence.get(word.as_str()) {
                let mut v = valence * boost;
                if negate_window > 0 {
                    v *= -0.75;
                }
                total += v;
                hits += 1;
            }
            boost = 1.0;
            negate_window = negate_window.saturating_sub(1);
        }

        if hits == 0 {
            0.0
        } else {
            total / (hits as f64).sqrt()
        }
    }
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SentimentClassifier for LexiconSentiment {
    async fn classify(&self, text: &str) -> Result<(Sentiment, f64), AnalysisError> {
        let score = self.score(text);
        let probs = softmax(&[-score, Self::NEUTRAL_BIAS, score]);
        let labels = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

        let (idx, confidence) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((1, 1.0));

        Ok((labels[idx], confidence))
    }
}
