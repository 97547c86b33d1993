//! Fetchers for raw video data
//!
//! - `url` - watch-URL validation and video id extraction
//! - `source` - the `VideoSource` seam and the records it produces
//! - `youtube` - YouTube Data API v3 + timedtext implementation

pub mod source;
pub mod url;
pub mod youtube;

pub use source::{Comment, Language, TranscriptSegment, VideoMetadata, VideoSource};
pub use url::extract_video_id;
pub use youtube::YouTubeClient;
