//! Color palettes for the graph visualization
//!
//! Provides consistent colors for entity types and highlight markers.

use egui::Color32;
use nexus_types::EntityType;

use super::surface::HighlightClass;

// =============================================================================
// ENTITY TYPE COLORS
// =============================================================================

/// Get fill color for entity type
pub fn entity_type_fill(entity_type: &EntityType) -> Color32 {
    match entity_type {
        EntityType::Organization => Color32::from_rgb(96, 165, 250), // Blue-400
        EntityType::Geo => Color32::from_rgb(74, 222, 128),          // Green-400
        EntityType::Person => Color32::from_rgb(251, 191, 36),       // Amber-400
        EntityType::Event => Color32::from_rgb(244, 114, 182),       // Pink-400
        EntityType::Unknown => Color32::from_rgb(148, 163, 184),     // Slate-400
        EntityType::Other(_) => Color32::from_rgb(196, 181, 253),    // Violet-300
    }
}

/// Default edge stroke
pub const EDGE_COLOR: Color32 = Color32::from_rgb(100, 116, 139);

// =============================================================================
// HIGHLIGHT COLORS
// =============================================================================

/// Outline color for a highlighted element, `None` when not highlighted
pub fn highlight_stroke(classes: &[HighlightClass]) -> Option<Color32> {
    if classes.contains(&HighlightClass::Selected) {
        Some(Color32::from_rgb(250, 204, 21)) // Yellow-400
    } else if classes.contains(&HighlightClass::Neighbor) {
        Some(Color32::from_rgb(45, 212, 191)) // Teal-400
    } else {
        None
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into a color
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#0b0f1a"),
            Some(Color32::from_rgb(11, 15, 26))
        );
        assert_eq!(parse_hex_color("ffffff"), Some(Color32::WHITE));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
    }

    #[test]
    fn test_selected_wins_over_neighbor() {
        let both = [HighlightClass::Neighbor, HighlightClass::Selected];
        assert_eq!(
            highlight_stroke(&both),
            highlight_stroke(&[HighlightClass::Selected])
        );
        assert_eq!(highlight_stroke(&[]), None);
    }

    #[test]
    fn test_types_are_distinguishable() {
        assert_ne!(
            entity_type_fill(&EntityType::Organization),
            entity_type_fill(&EntityType::Unknown)
        );
    }
}
