//! Edge width mapping
//!
//! Relationship strength only drives visual emphasis: the stronger the
//! relationship (in either direction), the thicker the line.

/// Width used when strength is missing or not a finite number
pub const NEUTRAL_EDGE_WIDTH: f64 = 2.0;
pub const MIN_EDGE_WIDTH: f64 = 1.0;
pub const MAX_EDGE_WIDTH: f64 = 4.0;

/// Map a signed strength to a stroke width in `[1, 4]`.
///
/// Strength is clamped to `[-1, 1]` and only its magnitude matters:
/// `1 + 3|s|`. Missing, NaN or infinite strengths get the neutral width 2.
pub fn edge_width(strength: Option<f64>) -> f64 {
    match strength {
        Some(s) if s.is_finite() => {
            let magnitude = s.clamp(-1.0, 1.0).abs();
            MIN_EDGE_WIDTH + (MAX_EDGE_WIDTH - MIN_EDGE_WIDTH) * magnitude
        }
        _ => NEUTRAL_EDGE_WIDTH,
    }
}
