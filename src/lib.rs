//! Playback progress tracking for course video content.
//!
//! The crate turns raw media-host events (metadata loaded, position
//! updates, stream ended) into persisted course completion state:
//!
//! - [`player::PlaybackSession`] owns the transient state of the one video
//!   a player view has loaded, as a state machine whose transitions return
//!   effects instead of performing I/O.
//! - [`player::MilestoneEvaluator`] decides, once per loaded video, when
//!   enough of it has been watched to count toward the course.
//! - [`progress::ProgressAggregator`] converts a video's watched
//!   percentage into the course-level value submitted to the store.
//! - [`progress::ProgressCoordinator`] executes the effects: fire-and-forget
//!   submissions to a [`store::ProgressStore`], events on the
//!   [`events::EventBus`], user-facing notices on failure.
//!
//! Persistence and change fan-out are delegated to a remote store behind
//! the [`store::ProgressStore`] trait; [`store::RemoteProgressStore`] is
//! the HTTP implementation.

pub mod config;
pub mod constants;
pub mod events;
pub mod models;
pub mod player;
pub mod progress;
pub mod store;
pub mod utils;
