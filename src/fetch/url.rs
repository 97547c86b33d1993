use crate::error::SubmitError;
use regex::Regex;
use std::sync::LazyLock;

static WATCH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i:(?:https?://)?(?:(?:www|m|music)\.)?(?:youtube\.com/(?:watch\?(?:[^#\s]*&)?v=|shorts/|embed/|live/|v/)|youtu\.be/))([A-Za-z0-9_-]{1,64})(?:[?&#/]\S*)?$",
    )
    .expect("watch URL pattern is valid")
});

/// Extract the video id from a YouTube watch-style URL.
///
/// Accepts `watch?v=`, `youtu.be/`, `shorts/`, `embed/`, `live/` and `v/` shapes on the
/// youtube.com hosts, with or without a scheme. Anything else is `InvalidUrl`.
pub fn extract_video_id(url: &str) -> Result<String, SubmitError> {
    WATCH_URL
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| SubmitError::InvalidUrl {
            url: url.to_string(),
        })
}
