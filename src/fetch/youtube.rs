use super::source::{Comment, Language, TranscriptSegment, VideoMetadata, VideoSource};
use crate::config::YouTubeConfig;
use crate::error::FetchError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

/// YouTube Data API page size ceiling
const PAGE_SIZE: usize = 100;

/// Hard cap on comments per job
pub const MAX_COMMENTS: usize = 300;

/// Client for the YouTube Data API v3 (metadata, comments) and the timedtext
/// caption endpoint (transcripts).
pub struct YouTubeClient {
    http: Client,
    api_key: String,
    api_base: String,
    timedtext_base: String,
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> Result<Self, FetchError> {
        let api_key = config.api_key.clone().ok_or(FetchError::MissingApiKey)?;

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            timedtext_base: config.timedtext_base.clone(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        video_id: &str,
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.api_base, endpoint);
        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| FetchError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_api_error(status, &body, video_id))
    }

    /// Fetch one caption track as json3. `None` means the track does not exist.
    async fn fetch_track(
        &self,
        video_id: &str,
        language: Language,
        auto_generated: bool,
    ) -> Result<Option<Vec<TranscriptSegment>>, FetchError> {
        let mut query = vec![("v", video_id), ("lang", language.code()), ("fmt", "json3")];
        if auto_generated {
            query.push(("kind", "asr"));
        }

        let response = self.http.get(&self.timedtext_base).query(&query).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited {
                reason: "timedtext endpoint returned 429".to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let segments = parse_json3(&body)?;
        Ok((!segments.is_empty()).then_some(segments))
    }
}

#[async_trait::async_trait]
impl VideoSource for YouTubeClient {
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, FetchError> {
        let list: VideoList = self
            .get_json("videos", &[("part", "snippet"), ("id", video_id)], video_id)
            .await?;

        let item = list
            .items
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::NotFound {
                video_id: video_id.to_string(),
            })?;

        info!("Video title: {}, channel: {}", item.snippet.title, item.snippet.channel_title);

        Ok(VideoMetadata {
            video_id: video_id.to_string(),
            title: item.snippet.title,
            channel_name: item.snippet.channel_title,
        })
    }

    async fn transcript(
        &self,
        video_id: &str,
        language: Language,
    ) -> Result<Vec<TranscriptSegment>, FetchError> {
        if let Some(segments) = self.fetch_track(video_id, language, false).await? {
            info!("Fetched transcript with {} segments", segments.len());
            return Ok(segments);
        }

        warn!(
            "No manual {} transcript for {}, trying auto-generated track",
            language, video_id
        );
        if let Some(segments) = self.fetch_track(video_id, language, true).await? {
            info!("Fetched auto-generated transcript with {} segments", segments.len());
            return Ok(segments);
        }

        Err(FetchError::TranscriptUnavailable {
            video_id: video_id.to_string(),
            language: language.to_string(),
        })
    }

    async fn comments(&self, video_id: &str, max: usize) -> Result<Vec<Comment>, FetchError> {
        let max = max.min(MAX_COMMENTS);
        let page_size = PAGE_SIZE.to_string();
        let mut comments = Vec::new();
        let mut page_token: Option<String> = None;

        while comments.len() < max {
            let mut query = vec![
                ("part", "snippet"),
                ("videoId", video_id),
                ("maxResults", page_size.as_str()),
                ("textFormat", "plainText"),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: CommentThreadList = self.get_json("commentThreads", &query, video_id).await?;

            comments.extend(page.items.into_iter().map(|item| {
                let top = item.snippet.top_level_comment.snippet;
                Comment {
                    text: top.text_display,
                    author: top.author_display_name,
                    published_at: top.published_at,
                    like_count: top.like_count,
                }
            }));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        comments.truncate(max);
        info!("Fetched {} comments", comments.len());
        Ok(comments)
    }
}

/// Map a non-2xx Data API response to the fetch error taxonomy.
fn classify_api_error(status: StatusCode, body: &str, video_id: &str) -> FetchError {
    let envelope = serde_json::from_str::<ApiErrorEnvelope>(body).ok();
    let reason = envelope
        .as_ref()
        .and_then(|e| e.error.errors.first())
        .map(|e| e.reason.clone())
        .unwrap_or_default();
    let message = envelope
        .map(|e| e.error.message)
        .unwrap_or_else(|| body.to_string());

    match (status, reason.as_str()) {
        (StatusCode::TOO_MANY_REQUESTS, _)
        | (_, "quotaExceeded")
        | (_, "rateLimitExceeded")
        | (_, "dailyLimitExceeded") => FetchError::RateLimited { reason: message },
        (_, "commentsDisabled") => FetchError::CommentsDisabled {
            video_id: video_id.to_string(),
        },
        (StatusCode::NOT_FOUND, _) | (_, "videoNotFound") => FetchError::NotFound {
            video_id: video_id.to_string(),
        },
        _ => FetchError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Parse a timedtext `fmt=json3` document into ordered segments.
pub fn parse_json3(body: &str) -> Result<Vec<TranscriptSegment>, FetchError> {
    let doc: Json3Document =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let mut segments: Vec<TranscriptSegment> = doc
        .events
        .into_iter()
        .filter_map(|event| {
            let text = event
                .segs?
                .into_iter()
                .map(|s| s.utf8)
                .collect::<String>()
                .replace('\n', " ");
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSegment {
                start_time: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms.unwrap_or(0) as f64 / 1000.0,
                text: text.to_string(),
            })
        })
        .collect();

    segments.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    Ok(segments)
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    channel_title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadList {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_display: String,
    author_display_name: String,
    published_at: Option<String>,
    #[serde(default)]
    like_count: u64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    d_duration_ms: Option<u64>,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}
