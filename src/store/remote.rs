use anyhow::Result;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::debug;
use url::Url;

use super::{CourseProgressRecord, ProgressChange, ProgressStore, ProgressSubmission};
use crate::config::StoreConfig;
use crate::models::{CourseId, UserId, VideoId};
use crate::utils::errors::StoreError;

/// Capacity of the local change feed. Consumers re-fetch on notification,
/// so a lagged receiver loses nothing it cannot recover.
const CHANGE_FEED_CAPACITY: usize = 64;

/// HTTP client for the hosted progress store.
///
/// Records are keyed by `(user, course)`:
/// - `GET  users/{user}/courses/{course}/progress` — single record, 404 when absent
/// - `GET  users/{user}/progress` — all records for a user
/// - `PUT  users/{user}/courses/{course}/progress` — upsert, last write wins
///
/// Successful submissions are echoed onto the local change feed, standing in
/// for the backend's push channel so subscribed views can re-fetch.
#[derive(Debug)]
pub struct RemoteProgressStore {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    changes: broadcast::Sender<ProgressChange>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitBody<'a> {
    progress: u8,
    last_watched_video_id: &'a VideoId,
    completed: bool,
}

impl RemoteProgressStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(StoreError::Endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(StoreError::Network)?;
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            changes,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        Ok(self.base_url.join(path)?)
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn put(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self.client.put(url);
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait::async_trait]
impl ProgressStore for RemoteProgressStore {
    async fn get_course_progress(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<CourseProgressRecord>> {
        let url = self.endpoint(&format!(
            "users/{}/courses/{}/progress",
            user_id, course_id
        ))?;

        let response = self.get(url).send().await.map_err(StoreError::Network)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StoreError::Status {
                status: response.status(),
            }
            .into());
        }

        let record = response
            .json::<CourseProgressRecord>()
            .await
            .map_err(StoreError::Network)?;
        Ok(Some(record))
    }

    async fn list_course_progress(&self, user_id: &UserId) -> Result<Vec<CourseProgressRecord>> {
        let url = self.endpoint(&format!("users/{}/progress", user_id))?;

        let response = self.get(url).send().await.map_err(StoreError::Network)?;

        if !response.status().is_success() {
            return Err(StoreError::Status {
                status: response.status(),
            }
            .into());
        }

        let records = response
            .json::<Vec<CourseProgressRecord>>()
            .await
            .map_err(StoreError::Network)?;
        Ok(records)
    }

    async fn submit(&self, user_id: &UserId, submission: &ProgressSubmission) -> Result<()> {
        let url = self.endpoint(&format!(
            "users/{}/courses/{}/progress",
            user_id, submission.course_id
        ))?;

        debug!(
            "Submitting progress {}% for course {} (video {})",
            submission.progress, submission.course_id, submission.video_id
        );

        let body = SubmitBody {
            progress: submission.progress,
            last_watched_video_id: &submission.video_id,
            completed: submission.completed,
        };

        let response = self
            .put(url)
            .json(&body)
            .send()
            .await
            .map_err(StoreError::Network)?;

        if !response.status().is_success() {
            return Err(StoreError::Status {
                status: response.status(),
            }
            .into());
        }

        // Local echo of the backend's change feed; no subscribers is fine.
        let _ = self.changes.send(ProgressChange {
            user_id: user_id.clone(),
            course_id: submission.course_id.clone(),
        });

        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ProgressChange> {
        self.changes.subscribe()
    }
}
