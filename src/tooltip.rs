//! Floating tooltip overlay
//!
//! Positions are page coordinates: surface origin (viewport-relative) plus
//! page scroll plus the element anchor plus a fixed offset. A scroll,
//! pointer leave, or the document going hidden hides the tooltip, so a stale
//! one never outlives the element it described.

use egui::{Pos2, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipController {
    offset: Vec2,
    page_scroll: Vec2,
    visible: bool,
    text: String,
    position: Pos2,
}

impl Default for TooltipController {
    fn default() -> Self {
        Self::new(Vec2::new(12.0, 12.0))
    }
}

impl TooltipController {
    pub fn new(offset: Vec2) -> Self {
        Self {
            offset,
            page_scroll: Vec2::ZERO,
            visible: false,
            text: String::new(),
            position: Pos2::ZERO,
        }
    }

    /// Set `text` and show it next to `anchor` (relative to `origin`)
    pub fn show(&mut self, text: impl Into<String>, anchor: Pos2, origin: Pos2) {
        self.text = text.into();
        self.position = self.place(anchor, origin);
        self.visible = true;
    }

    /// Follow the pointer; text and visibility are unchanged
    pub fn reposition(&mut self, anchor: Pos2, origin: Pos2) {
        self.position = self.place(anchor, origin);
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn on_pointer_leave(&mut self) {
        self.hide();
    }

    /// Page scrolled to `scroll`
    pub fn on_page_scroll(&mut self, scroll: Vec2) {
        self.page_scroll = scroll;
        self.hide();
    }

    pub fn on_visibility_change(&mut self, hidden: bool) {
        if hidden {
            self.hide();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    fn place(&self, anchor: Pos2, origin: Pos2) -> Pos2 {
        origin + self.page_scroll + anchor.to_vec2() + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_applies_origin_and_offset() {
        let mut tooltip = TooltipController::default();
        tooltip.show("Acme", Pos2::new(100.0, 50.0), Pos2::new(20.0, 30.0));
        assert!(tooltip.is_visible());
        assert_eq!(tooltip.text(), "Acme");
        assert_eq!(tooltip.position(), Pos2::new(132.0, 92.0));
    }

    #[test]
    fn test_page_scroll_shifts_position_and_hides() {
        let mut tooltip = TooltipController::default();
        tooltip.show("Acme", Pos2::new(0.0, 0.0), Pos2::ZERO);
        tooltip.on_page_scroll(Vec2::new(0.0, 200.0));
        assert!(!tooltip.is_visible());

        tooltip.show("Acme", Pos2::new(0.0, 0.0), Pos2::ZERO);
        assert_eq!(tooltip.position(), Pos2::new(12.0, 212.0));
    }

    #[test]
    fn test_reposition_keeps_text_and_visibility() {
        let mut tooltip = TooltipController::default();
        tooltip.reposition(Pos2::new(5.0, 5.0), Pos2::ZERO);
        assert!(!tooltip.is_visible());

        tooltip.show("edge", Pos2::new(0.0, 0.0), Pos2::ZERO);
        tooltip.reposition(Pos2::new(40.0, 10.0), Pos2::ZERO);
        assert!(tooltip.is_visible());
        assert_eq!(tooltip.text(), "edge");
        assert_eq!(tooltip.position(), Pos2::new(52.0, 22.0));
    }

    #[test]
    fn test_hide_triggers_are_idempotent() {
        let mut tooltip = TooltipController::default();
        tooltip.show("x", Pos2::ZERO, Pos2::ZERO);
        tooltip.on_pointer_leave();
        tooltip.hide();
        assert!(!tooltip.is_visible());

        tooltip.show("x", Pos2::ZERO, Pos2::ZERO);
        tooltip.on_visibility_change(false);
        assert!(tooltip.is_visible());
        tooltip.on_visibility_change(true);
        assert!(!tooltip.is_visible());
    }
}
