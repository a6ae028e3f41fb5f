use std::collections::HashMap;

use serde::Deserialize;

use super::theme::Theme;
use super::{WidgetId, WidgetTree};

/// Easing function for animations.
/// Minimal set: linear (constant speed), ease-out (decelerate),
/// ease-in-out (smooth start and end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Easing {
    /// Constant speed interpolation.
    Linear,
    /// Cubic ease-in-out: slow start, fast middle, slow end.
    EaseInOut,
    /// Cubic ease-out: fast start, slow end (deceleration).
    EaseOut,
}

/// A single active opacity tween.
struct Tween {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

/// Frame-driven opacity interpolation keyed by widget.
///
/// Starting a tween is fire-and-forget: callers never wait on it, and a
/// later visibility change does not cancel it. Advances only through
/// `update(dt)`, which writes the interpolated value into the tree.
pub struct Animator {
    tweens: HashMap<WidgetId, Tween>,
    duration: f32,
    easing: Easing,
}

impl Animator {
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            tweens: HashMap::new(),
            duration: duration.max(0.0),
            easing,
        }
    }

    pub fn from_theme(theme: &Theme) -> Self {
        Self::new(theme.fade_duration_secs, theme.fade_easing)
    }

    /// Start (or restart) a fade of `target` from its current opacity to
    /// `value`. Overwrites any running fade on the same widget.
    pub fn set_opacity(&mut self, tree: &WidgetTree, target: WidgetId, value: f32) {
        let from = tree.opacity(target);
        self.tweens.insert(
            target,
            Tween {
                from,
                to: value,
                elapsed: 0.0,
                duration: self.duration,
            },
        );
    }

    /// Advance all tweens by `delta_seconds`, apply them, and drop the
    /// finished ones. Tweens whose widget no longer exists are dropped too.
    pub fn update(&mut self, tree: &mut WidgetTree, delta_seconds: f32) {
        let easing = self.easing;
        self.tweens.retain(|&target, tween| {
            if !tree.contains(target) {
                return false;
            }
            tween.elapsed += delta_seconds;
            let done = tween.duration <= 0.0 || tween.elapsed >= tween.duration;
            let value = if done {
                tween.to
            } else {
                let eased = ease(tween.elapsed / tween.duration, easing);
                tween.from + (tween.to - tween.from) * eased
            };
            tree.set_opacity(target, value);
            !done
        });
    }

    /// Returns true if a fade on `target` has not yet completed.
    pub fn is_active(&self, target: WidgetId) -> bool {
        self.tweens.contains_key(&target)
    }

    /// The value a running fade is heading to.
    pub fn target(&self, target: WidgetId) -> Option<f32> {
        self.tweens.get(&target).map(|t| t.to)
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }
}

/// Apply an easing function to a linear progress value `t` in [0, 1].
fn ease(t: f32, easing: Easing) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match easing {
        Easing::Linear => t,
        Easing::EaseInOut => {
            // Cubic ease-in-out: 4t³ for t<0.5, 1-(-2t+2)³/2 for t>=0.5
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let f = -2.0 * t + 2.0;
                1.0 - f * f * f / 2.0
            }
        }
        Easing::EaseOut => {
            // Cubic ease-out: 1-(1-t)³
            let f = 1.0 - t;
            1.0 - f * f * f
        }
    }
}
