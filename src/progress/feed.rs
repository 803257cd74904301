use anyhow::Result;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::UserId;
use crate::store::{CourseProgressRecord, ProgressStore};

/// Live view of a user's course progress for dashboard surfaces.
///
/// Follows the store's change feed and re-fetches the full record set on
/// every notification rather than applying deltas; the store offers no
/// ordering guarantee that would make deltas safe. A failed refresh keeps
/// the previous records.
pub struct ProgressFeed {
    records: watch::Receiver<Vec<CourseProgressRecord>>,
    task: JoinHandle<()>,
}

impl ProgressFeed {
    /// Start following `user_id`'s progress: one initial fetch, then a
    /// refresh per store change.
    pub async fn start(store: Arc<dyn ProgressStore>, user_id: UserId) -> Result<Self> {
        let initial = store.list_course_progress(&user_id).await?;
        let (tx, rx) = watch::channel(initial);
        let mut changes = store.subscribe();

        let task = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => {
                        if change.user_id != user_id {
                            continue;
                        }
                        debug!(
                            "Progress changed for course {}, re-fetching",
                            change.course_id
                        );
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Recoverable: the refresh below returns full state
                        warn!("Progress feed lagged, {} notifications skipped", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }

                match store.list_course_progress(&user_id).await {
                    Ok(records) => {
                        if tx.send(records).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Failed to refresh course progress: {:#}", e),
                }
            }
        });

        Ok(Self { records: rx, task })
    }

    /// Handle to the current records, updated in place as changes arrive.
    pub fn records(&self) -> watch::Receiver<Vec<CourseProgressRecord>> {
        self.records.clone()
    }

    /// Wait for the next refresh to land.
    pub async fn changed(&mut self) -> Result<()> {
        self.records.changed().await?;
        Ok(())
    }

    /// Latest snapshot of the followed records.
    pub fn current(&self) -> Vec<CourseProgressRecord> {
        self.records.borrow().clone()
    }
}

impl Drop for ProgressFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}
