use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle to a countdown owned by a `Timers` scheduler.
    pub struct TimerId;
}

/// Remaining time at or below this counts as elapsed, so a countdown
/// advanced in several float steps still fires on the frame it is due.
const FIRE_EPSILON: f32 = 1e-5;

struct Timer {
    delay: f32,
    remaining: Option<f32>,
}

/// Restartable one-shot countdowns, advanced by the frame tick.
///
/// `restart` discards any running countdown and begins a fresh one;
/// each countdown fires exactly once.
#[derive(Default)]
pub struct Timers {
    timers: SlotMap<TimerId, Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle timer with the given delay in seconds.
    pub fn create(&mut self, delay: f32) -> TimerId {
        self.timers.insert(Timer {
            delay: delay.max(0.0),
            remaining: None,
        })
    }

    /// Change the delay used by the next `restart`. A running countdown
    /// keeps its current deadline.
    pub fn set_delay(&mut self, id: TimerId, delay: f32) {
        if let Some(timer) = self.timers.get_mut(id) {
            timer.delay = delay.max(0.0);
        }
    }

    pub fn delay(&self, id: TimerId) -> Option<f32> {
        self.timers.get(id).map(|t| t.delay)
    }

    pub fn restart(&mut self, id: TimerId) {
        if let Some(timer) = self.timers.get_mut(id) {
            timer.remaining = Some(timer.delay);
        }
    }

    pub fn cancel(&mut self, id: TimerId) {
        if let Some(timer) = self.timers.get_mut(id) {
            timer.remaining = None;
        }
    }

    pub fn remove(&mut self, id: TimerId) {
        self.timers.remove(id);
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.get(id).is_some_and(|t| t.remaining.is_some())
    }

    /// Advance every running countdown and return the ones that elapsed.
    pub fn advance(&mut self, delta_seconds: f32) -> Vec<TimerId> {
        let mut fired = Vec::new();
        for (id, timer) in &mut self.timers {
            let Some(remaining) = timer.remaining.as_mut() else {
                continue;
            };
            *remaining -= delta_seconds;
            if *remaining <= FIRE_EPSILON {
                timer.remaining = None;
                fired.push(id);
            }
        }
        fired
    }
}
