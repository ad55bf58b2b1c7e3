//! Camera2D
//!
//! The view is a world-space point pinned to the middle of the viewport,
//! scaled by the zoom factor. Pan and zoom both run through [`Tween`], so a
//! focus request animates and `update(dt)` advances it.

use egui::{Pos2, Rect};

use super::animation::{AnimationSpec, Tween};

const ZOOM_RANGE: (f32, f32) = (0.1, 5.0);

#[derive(Debug, Clone)]
pub struct Camera2D {
    pan_x: Tween,
    pan_y: Tween,
    scale: Tween,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            pan_x: Tween::new(0.0),
            pan_y: Tween::new(0.0),
            scale: Tween::new(1.0),
        }
    }
}

impl Camera2D {
    pub fn new() -> Self {
        Self::default()
    }

    /// World point currently under the viewport centre
    pub fn center(&self) -> Pos2 {
        Pos2::new(self.pan_x.value(), self.pan_y.value())
    }

    pub fn zoom(&self) -> f32 {
        self.scale.value()
    }

    pub fn update(&mut self, dt: f32) {
        for tween in [&mut self.pan_x, &mut self.pan_y, &mut self.scale] {
            tween.tick(dt);
        }
    }

    pub fn is_animating(&self) -> bool {
        [&self.pan_x, &self.pan_y, &self.scale]
            .iter()
            .any(|t| t.is_animating())
    }

    /// Pan so `target` ends up centred, zooming to `zoom` on the same curve
    pub fn fly_to(&mut self, target: Pos2, zoom: f32, spec: AnimationSpec) {
        self.pan_x.start(target.x, spec);
        self.pan_y.start(target.y, spec);
        self.zoom_to(zoom, spec);
    }

    pub fn zoom_to(&mut self, zoom: f32, spec: AnimationSpec) {
        self.scale.start(zoom.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1), spec);
    }

    /// Centre on `bounds` at the largest zoom that keeps it inside `viewport`
    /// shrunk by `margin` on every side. Applied without animation.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Rect, margin: f32) {
        let usable = viewport.shrink(margin);
        let scale = if bounds.width() >= 1.0 && bounds.height() >= 1.0 {
            (usable.width() / bounds.width()).min(usable.height() / bounds.height())
        } else {
            self.zoom()
        };
        self.pan_x.set_immediate(bounds.center().x);
        self.pan_y.set_immediate(bounds.center().y);
        self.scale.set_immediate(scale.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1));
    }

    /// Back to the origin at 1:1, no animation
    pub fn reset(&mut self) {
        self.pan_x.set_immediate(0.0);
        self.pan_y.set_immediate(0.0);
        self.scale.set_immediate(1.0);
    }

    pub fn world_to_screen(&self, world: Pos2, viewport: Rect) -> Pos2 {
        viewport.center() + (world - self.center()) * self.zoom()
    }

    pub fn screen_to_world(&self, screen: Pos2, viewport: Rect) -> Pos2 {
        self.center() + (screen - viewport.center()) / self.zoom()
    }
}
