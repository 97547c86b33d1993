use crate::error::{FetchError, SubmitError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transcript languages accepted by the submit call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Te,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Te => "te",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = SubmitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "en" => Ok(Language::En),
            "hi" => Ok(Language::Hi),
            "te" => Ok(Language::Te),
            _ => Err(SubmitError::UnsupportedLanguage {
                code: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub channel_name: String,
}

/// One caption cue. Sequences of segments are kept in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Offset from the start of the video, in seconds
    pub start_time: f64,
    /// Cue duration in seconds
    pub duration: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub author: String,
    pub published_at: Option<String>,
    pub like_count: u64,
}

/// Provider of raw video data for the fetch stage.
///
/// Implementations are stateless request/response clients. A transcript that is
/// missing or empty in the requested language must be reported as
/// `FetchError::TranscriptUnavailable`, never as an empty `Vec`.
#[async_trait::async_trait]
pub trait VideoSource: Send + Sync {
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, FetchError>;

    async fn transcript(
        &self,
        video_id: &str,
        language: Language,
    ) -> Result<Vec<TranscriptSegment>, FetchError>;

    /// Top-level comments, at most `max` of them
    async fn comments(&self, video_id: &str, max: usize) -> Result<Vec<Comment>, FetchError>;
}
