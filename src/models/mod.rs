mod identifiers;

pub use identifiers::{CourseId, UserId, VideoId};

use serde::{Deserialize, Serialize};

/// A single course video as presented to the player.
///
/// Duration is intentionally absent: it is only known once the media host
/// has loaded metadata for the stream, and lives on the playback session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub course_id: CourseId,
    pub title: String,
    /// 1-based ordering of this video within its course.
    pub position: u32,
    pub stream_url: String,
}

impl Video {
    pub fn new(
        id: impl Into<VideoId>,
        course_id: impl Into<CourseId>,
        title: impl Into<String>,
        position: u32,
        stream_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            course_id: course_id.into(),
            title: title.into(),
            position,
            stream_url: stream_url.into(),
        }
    }
}
