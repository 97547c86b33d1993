use crate::error::SubmitError;
use crate::fetch::{extract_video_id, Language};
use serde::Deserialize;

/// Raw submit parameters, as posted by a form or JSON client
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub video_url: String,

    /// Transcript language code (en, hi, te). Missing or empty means en.
    #[serde(default)]
    pub language: Option<String>,
}

impl AnalysisRequest {
    pub fn new(video_url: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            language: Some(language.into()),
        }
    }

    pub fn validate(&self) -> Result<ValidatedRequest, SubmitError> {
        let video_id = extract_video_id(&self.video_url)?;
        let language = self.language.as_deref().unwrap_or_default().parse()?;
        Ok(ValidatedRequest { video_id, language })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub video_id: String,
    pub language: Language,
}
