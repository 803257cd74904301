/// Volume and mute sub-state of a playback session.
///
/// Setting the level to zero is equivalent to muting; unmuting restores the
/// last audible level.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeControl {
    volume: f64,
    muted: bool,
    /// Last non-zero level, restored on unmute.
    restore_volume: f64,
}

impl Default for VolumeControl {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
            restore_volume: 1.0,
        }
    }
}

impl VolumeControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current volume level (0.0 - 1.0)
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// The level the media host should actually apply.
    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Set volume level, clamped to 0.0 - 1.0. Zero mutes; any audible
    /// level unmutes.
    pub fn set_volume(&mut self, volume: f64) {
        let volume = if volume.is_finite() { volume } else { 0.0 };
        let clamped = volume.clamp(0.0, 1.0);

        if clamped == 0.0 {
            self.volume = 0.0;
            self.muted = true;
        } else {
            self.volume = clamped;
            self.restore_volume = clamped;
            self.muted = false;
        }
    }

    /// Flip the mute flag. Unmuting a session whose level was dragged to
    /// zero restores the last audible level.
    pub fn toggle_mute(&mut self) -> bool {
        if self.muted {
            self.muted = false;
            if self.volume == 0.0 {
                self.volume = self.restore_volume;
            }
        } else {
            self.muted = true;
        }
        self.muted
    }

    /// Increase volume by `step`, capped at 100%.
    pub fn volume_up(&mut self, step: f64) -> f64 {
        self.set_volume(self.volume + step);
        self.volume
    }

    /// Decrease volume by `step`, capped at 0%.
    pub fn volume_down(&mut self, step: f64) -> f64 {
        self.set_volume(self.volume - step);
        self.volume
    }
}
