use super::lexicon::{ANGER, DISGUST, FEAR, JOY, SADNESS, SURPRISE};
use super::preprocess::words;
use super::{softmax, CLASSIFY_CONCURRENCY};
use crate::error::AnalysisError;
use crate::fetch::TranscriptSegment;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Longest text handed to a classifier, in characters
pub const MAX_INPUT_CHARS: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Disgust,
    Fear,
    Joy,
    Neutral,
    Sadness,
    Surprise,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Anger,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Joy,
        Emotion::Neutral,
        Emotion::Sadness,
        Emotion::Surprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Joy => "joy",
            Emotion::Neutral => "neutral",
            Emotion::Sadness => "sadness",
            Emotion::Surprise => "surprise",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    #[serde(flatten)]
    pub segment: TranscriptSegment,
    pub label: Emotion,
    pub confidence: f64,
}

#[async_trait::async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<(Emotion, f64), AnalysisError>;
}

/// Truncate to `MAX_INPUT_CHARS` on a char boundary.
pub fn truncate_input(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Label every transcript segment, keeping chronological order.
pub async fn analyze_transcript(
    classifier: Arc<dyn EmotionClassifier>,
    segments: Vec<TranscriptSegment>,
) -> Result<Vec<EmotionResult>, AnalysisError> {
    stream::iter(segments)
        .map(|segment| {
            let classifier = classifier.clone();
            async move {
                let text = truncate_input(&segment.text);
                let (label, confidence) = classifier.classify(text).await?;
                Ok::<_, AnalysisError>(EmotionResult {
                    segment,
                    label,
                    confidence: confidence.clamp(0.0, 1.0),
                })
            }
        })
        .buffered(CLASSIFY_CONCURRENCY)
        .try_collect()
        .await
}

/// Offline classifier counting emotion-word hits per category.
#[derive(Default)]
pub struct LexiconEmotion;

impl LexiconEmotion {
    const NEUTRAL_BIAS: f64 = 0.5;

    pub fn new() -> Self {
        Self
    }

    fn hits(text: &str) -> [f64; 7] {
        let mut counts = [0.0; 7];
        for word in words(text) {
            let w = word.as_str();
            for (slot, list) in [
                (0, ANGER),
                (1, DISGUST),
                (2, FEAR),
                (3, JOY),
                (5, SADNESS),
                (6, SURPRISE),
            ] {
                if list.contains(&w) {
                    counts[slot] += 1.0;
                }
            }
        }
        counts[4] = Self::NEUTRAL_BIAS;
        counts
    }
}

#[async_trait::async_trait]
impl EmotionClassifier for LexiconEmotion {
    async fn classify(&self, text: &str) -> Result<(Emotion, f64), AnalysisError> {
        let probs = softmax(&Self::hits(text));
        let (idx, confidence) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((4, 1.0));
        Ok((Emotion::ALL[idx], confidence))
    }
}
