// Progress tracking policy constants - all numeric policy in one place

// === Milestone policy ===
/// Watched percentage at which a video starts counting toward course progress.
pub const MILESTONE_PERCENT: u8 = 25;

/// Stored progress at or above which a course counts as completed.
pub const COURSE_COMPLETE_PERCENT: u8 = 100;

// === Player controls ===
/// Seconds of pointer inactivity before the playback controls hide.
pub const CONTROLS_HIDE_TIMEOUT_SECS: u64 = 3;

/// Step applied by the volume up/down shortcuts.
pub const VOLUME_STEP: f64 = 0.1;

// === Progress store ===
/// Request timeout for progress store calls.
pub const STORE_REQUEST_TIMEOUT_SECS: u64 = 10;
