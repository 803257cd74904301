use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::events::EventBus;

/// Control visibility state machine states
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlsState {
    /// Controls are hidden
    Hidden,
    /// Controls are visible with the inactivity timer running
    Visible,
    /// Controls are visible because the pointer is over them
    Hovering,
}

/// Auto-hide state machine for the player control overlay.
///
/// Pointer activity shows the controls and arms an inactivity timer;
/// hovering over the overlay suspends it. The timer is an abortable task,
/// cancelled when activity resumes or the player unloads.
#[derive(Debug)]
pub struct ControlsVisibility {
    state: Arc<Mutex<ControlsState>>,
    hide_after: Duration,
    events: Arc<EventBus>,
    timer: Option<JoinHandle<()>>,
}

impl ControlsVisibility {
    pub fn new(hide_after: Duration, events: Arc<EventBus>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ControlsState::Hidden)),
            hide_after,
            events,
            timer: None,
        }
    }

    /// Pointer activity: show the controls and re-arm the inactivity timer.
    pub fn show(&mut self) {
        self.cancel_timer();
        *self.state.lock().unwrap() = ControlsState::Visible;
        self.arm_timer();
    }

    /// Pointer entered the control overlay: stay visible, no timer.
    pub fn hover(&mut self) {
        self.cancel_timer();
        *self.state.lock().unwrap() = ControlsState::Hovering;
    }

    /// Hide immediately.
    pub fn hide(&mut self) {
        self.cancel_timer();
        *self.state.lock().unwrap() = ControlsState::Hidden;
    }

    /// Cancel the inactivity timer without touching visibility, for player
    /// teardown.
    pub fn cancel(&mut self) {
        self.cancel_timer();
    }

    pub fn state(&self) -> ControlsState {
        *self.state.lock().unwrap()
    }

    pub fn visible(&self) -> bool {
        self.state() != ControlsState::Hidden
    }

    fn arm_timer(&mut self) {
        let state = Arc::clone(&self.state);
        let events = Arc::clone(&self.events);
        let hide_after = self.hide_after;

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(hide_after).await;
            *state.lock().unwrap() = ControlsState::Hidden;
            debug!("Controls hidden after {:?} of inactivity", hide_after);
            let _ = events.emit_controls_hidden().await;
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for ControlsVisibility {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;

    const HIDE_AFTER: Duration = Duration::from_secs(3);

    async fn settle() {
        // Let the timer task observe the advanced clock
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hides_after_inactivity() {
        let events = Arc::new(EventBus::new(10));
        let mut subscriber = events.subscribe();
        let mut controls = ControlsVisibility::new(HIDE_AFTER, events);

        controls.show();
        assert_eq!(controls.state(), ControlsState::Visible);

        settle().await;
        tokio::time::advance(HIDE_AFTER + Duration::from_millis(1)).await;
        settle().await;

        assert_eq!(controls.state(), ControlsState::Hidden);
        let event = subscriber.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::ControlsHidden);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_rearms_timer() {
        let events = Arc::new(EventBus::new(10));
        let mut controls = ControlsVisibility::new(HIDE_AFTER, events);

        controls.show();
        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;

        controls.show();
        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;

        // 4s total elapsed, but never 3s without activity
        assert!(controls.visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hovering_suspends_timer() {
        let events = Arc::new(EventBus::new(10));
        let mut controls = ControlsVisibility::new(HIDE_AFTER, events);

        controls.show();
        controls.hover();

        tokio::time::advance(HIDE_AFTER * 10).await;
        settle().await;

        assert_eq!(controls.state(), ControlsState::Hovering);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_pending_hide() {
        let events = Arc::new(EventBus::new(10));
        let mut controls = ControlsVisibility::new(HIDE_AFTER, events);

        controls.show();
        controls.cancel();

        tokio::time::advance(HIDE_AFTER * 10).await;
        settle().await;

        // Timer was cancelled at teardown: no transition fired
        assert_eq!(controls.state(), ControlsState::Visible);
    }
}
