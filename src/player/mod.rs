mod controls;
mod milestone;
mod session;
mod volume;

pub use controls::{ControlsState, ControlsVisibility};
pub use milestone::MilestoneEvaluator;
pub use session::{Effect, PlaybackSession, SubmitTrigger};
pub use volume::VolumeControl;
