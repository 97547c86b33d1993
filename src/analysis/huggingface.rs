use super::emotion::{Emotion, EmotionClassifier};
use super::sentiment::{Sentiment, SentimentClassifier};
use crate::error::AnalysisError;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

pub const SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment";
pub const EMOTION_MODEL: &str = "j-hartmann/emotion-english-distilroberta-base";

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Minimal client for the hosted text-classification inference API.
#[derive(Clone)]
pub struct InferenceClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl InferenceClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, AnalysisError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Run `model` over `text` and return the highest scoring label.
    async fn top_label(&self, model: &str, text: &str) -> Result<(String, f64), AnalysisError> {
        let url = format!("{}/models/{}", self.base_url, model);
        let mut request = self.http.post(&url).json(&serde_json::json!({
            "inputs": text,
            "options": { "wait_for_model": true },
        }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Inference {
                reason: format!("{} returned {}: {}", model, status, body),
            });
        }

        let value: serde_json::Value = response.json().await?;
        parse_top_label(value)
    }
}

/// Accepts both `[[{label, score}, ...]]` and `[{label, score}, ...]` shapes.
fn parse_top_label(value: serde_json::Value) -> Result<(String, f64), AnalysisError> {
    let scores: Vec<LabelScore> = match serde_json::from_value::<Vec<Vec<LabelScore>>>(value.clone())
    {
        Ok(nested) => nested.into_iter().flatten().collect(),
        Err(_) => serde_json::from_value(value.clone())
            .map_err(|_| AnalysisError::Decode(value.to_string()))?,
    };

    scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|s| (s.label, s.score))
        .ok_or_else(|| AnalysisError::Decode("empty label list".to_string()))
}

pub struct HuggingFaceSentiment {
    client: InferenceClient,
}

impl HuggingFaceSentiment {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl SentimentClassifier for HuggingFaceSentiment {
    async fn classify(&self, text: &str) -> Result<(Sentiment, f64), AnalysisError> {
        if text.trim().is_empty() {
            return Ok((Sentiment::Neutral, 1.0));
        }

        let (label, score) = self.client.top_label(SENTIMENT_MODEL, text).await?;
        let sentiment = match label.to_ascii_lowercase().as_str() {
            "label_0" | "negative" => Sentiment::Negative,
            "label_1" | "neutral" => Sentiment::Neutral,
            "label_2" | "positive" => Sentiment::Positive,
            other => {
                return Err(AnalysisError::Inference {
                    reason: format!("unknown sentiment label {}", other),
                })
            }
        };
        Ok((sentiment, score))
    }
}

pub struct HuggingFaceEmotion {
    client: InferenceClient,
}

impl HuggingFaceEmotion {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl EmotionClassifier for HuggingFaceEmotion {
    async fn classify(&self, text: &str) -> Result<(Emotion, f64), AnalysisError> {
        if text.trim().is_empty() {
            return Ok((Emotion::Neutral, 1.0));
        }

        let (label, score) = self.client.top_label(EMOTION_MODEL, text).await?;
        match Emotion::from_label(&label) {
            Some(emotion) => Ok((emotion, score)),
            None => {
                warn!("Unknown emotion label {}, treating as neutral", label);
                Ok((Emotion::Neutral, score))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_payload_picks_highest_score() {
        let value = serde_json::json!([[
            {"label": "LABEL_0", "score": 0.1},
            {"label": "LABEL_2", "score": 0.7},
            {"label": "LABEL_1", "score": 0.2}
        ]]);
        assert_eq!(parse_top_label(value).unwrap(), ("LABEL_2".to_string(), 0.7));
    }

    #[test]
    fn flat_payload_is_accepted() {
        let value = serde_json::json!([{"label": "joy", "score": 0.9}]);
        assert_eq!(parse_top_label(value).unwrap().0, "joy");
    }

    #[test]
    fn error_objects_are_decode_failures() {
        let value = serde_json::json!({"error": "Model is loading"});
        assert!(matches!(parse_top_label(value), Err(AnalysisError::Decode(_))));
    }
}
