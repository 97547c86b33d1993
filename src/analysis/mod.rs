//! Analyzers: pure labeling functions over record sequences
//!
//! - Comment sentiment (positive / neutral / negative)
//! - Transcript emotion per segment
//! - YAKE keyword extraction over the full transcript text

pub mod emotion;
pub mod huggingface;
pub mod keywords;
pub mod lexicon;
pub mod preprocess;
pub mod sentiment;

pub use emotion::{analyze_transcript, Emotion, EmotionClassifier, EmotionResult, LexiconEmotion};
pub use huggingface::{HuggingFaceEmotion, HuggingFaceSentiment, InferenceClient};
pub use keywords::{extract_keywords, Keyword};
pub use sentiment::{
    analyze_comments, LexiconSentiment, Sentiment, SentimentClassifier, SentimentResult,
};

use crate::config::{AnalysisBackend, AnalysisConfig};
use crate::error::AnalysisError;
use std::sync::Arc;

/// In-flight classify calls per analyzer
pub const CLASSIFY_CONCURRENCY: usize = 8;

/// The classifier set a pipeline runs with
#[derive(Clone)]
pub struct Analyzers {
    pub sentiment: Arc<dyn SentimentClassifier>,
    pub emotion: Arc<dyn EmotionClassifier>,
    pub top_keywords: usize,
}

impl Analyzers {
    /// Offline word-list classifiers
    pub fn lexicon(top_keywords: usize) -> Self {
        Self {
            sentiment: Arc::new(LexiconSentiment::new()),
            emotion: Arc::new(LexiconEmotion::new()),
            top_keywords,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        match config.backend {
            AnalysisBackend::Lexicon => Ok(Self::lexicon(config.top_keywords)),
            AnalysisBackend::Huggingface => {
                let client = InferenceClient::new(
                    &config.huggingface_base,
                    config.huggingface_token.clone(),
                )?;
                Ok(Self {
                    sentiment: Arc::new(HuggingFaceSentiment::new(client.clone())),
                    emotion: Arc::new(HuggingFaceEmotion::new(client)),
                    top_keywords: config.top_keywords,
                })
            }
        }
    }
}

/// Numerically stable softmax
pub(crate) fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
