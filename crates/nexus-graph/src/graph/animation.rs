//! Fixed-duration tweens for camera moves
//!
//! Focus moves run for a fixed short duration on an ease-out curve, so the
//! camera decelerates into the target instead of overshooting it.
//!
//! # Frame model
//! - Animation state is UI-only (not server data)
//! - No callbacks - values are polled each frame via `value()`
//! - Call `tick(dt)` at start of update(), then render with `value()`

use std::time::Duration;

/// Easing curve applied to normalized progress `t` in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseOutCubic,
}

impl Easing {
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Duration + curve for one animated move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
}

impl AnimationSpec {
    pub fn ease_out(duration_ms: u64) -> Self {
        Self {
            duration: Duration::from_millis(duration_ms),
            easing: Easing::EaseOutCubic,
        }
    }

    /// Jump straight to the target
    pub fn instant() -> Self {
        Self {
            duration: Duration::ZERO,
            easing: Easing::Linear,
        }
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::ease_out(400)
    }
}

// =============================================================================
// TWEEN
// =============================================================================

/// Animated f32 value moving from `from` to `to` over a fixed duration
///
/// # Usage
/// ```ignore
/// let mut zoom = Tween::new(1.0);
/// zoom.start(2.0, AnimationSpec::ease_out(400));
///
/// // Each frame:
/// zoom.tick(dt);
/// let current = zoom.value();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    easing: Easing,
}

impl Tween {
    /// A tween at rest at `value`
    pub fn new(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            elapsed: 0.0,
            duration: 0.0,
            easing: Easing::Linear,
        }
    }

    /// Start moving from the current value toward `target`
    pub fn start(&mut self, target: f32, spec: AnimationSpec) {
        self.from = self.value();
        self.to = target;
        self.elapsed = 0.0;
        self.duration = spec.duration.as_secs_f32();
        self.easing = spec.easing;
    }

    /// Jump to `value` with no animation
    pub fn set_immediate(&mut self, value: f32) {
        *self = Self::new(value);
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if self.is_animating() {
            self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        }
    }

    /// Current value
    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = self.easing.apply(self.elapsed / self.duration);
        self.from + (self.to - self.from) * t
    }

    pub fn is_animating(&self) -> bool {
        self.duration > 0.0 && self.elapsed < self.duration
    }
}
