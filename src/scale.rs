//! Responsive scaler: fits the fixed authoring geometry into an arbitrary
//! viewport width without re-flowing content.
//!
//! The scale is cosmetic only. The capture path always operates on the
//! unscaled authoring geometry.

use crate::layout::{CARD_HEIGHT, CARD_WIDTH};

/// Horizontal breathing room around the card block (container padding).
pub const VIEWPORT_MARGIN: f32 = 24.0;

/// Vertical gap between stacked faces in the preview.
pub const FACE_GAP: f32 = 20.0;

/// Uniform scale factor for a given viewport width. Never upscales beyond
/// the authoring size.
pub fn fit_scale(viewport_width: f32) -> f32 {
    (viewport_width / (CARD_WIDTH + VIEWPORT_MARGIN)).min(1.0)
}

/// The post-scale footprint the container must be told explicitly: a pure
/// geometric transform does not affect layout flow sizing.
pub fn display_height(scale: f32, face_count: usize) -> f32 {
    let faces = face_count as f32;
    let gaps = face_count.saturating_sub(1) as f32;
    (CARD_HEIGHT * faces + FACE_GAP * gaps) * scale
}

/// Viewport-tracking scaler for the on-screen preview. Recomputed on
/// resize; recomputation is idempotent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponsiveScaler {
    viewport_width: f32,
}

impl ResponsiveScaler {
    pub fn new(viewport_width: f32) -> Self {
        ResponsiveScaler { viewport_width }
    }

    pub fn scale(&self) -> f32 {
        fit_scale(self.viewport_width)
    }

    pub fn display_height(&self, face_count: usize) -> f32 {
        display_height(self.scale(), face_count)
    }

    pub fn resize(&mut self, viewport_width: f32) {
        self.viewport_width = viewport_width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_viewport_never_upscales() {
        assert_eq!(fit_scale(5000.0), 1.0);
        assert_eq!(fit_scale(CARD_WIDTH + VIEWPORT_MARGIN), 1.0);
    }

    #[test]
    fn narrow_viewport_scales_down_proportionally() {
        let s = fit_scale(252.0);
        assert!((s - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn display_height_accounts_for_gap_and_scale() {
        // Two faces at full scale: 300 + 20 + 300.
        assert_eq!(display_height(1.0, 2), 620.0);
        assert_eq!(display_height(0.5, 2), 310.0);
        // Single face, no gap.
        assert_eq!(display_height(1.0, 1), 300.0);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let mut scaler = ResponsiveScaler::new(320.0);
        let first = scaler.scale();
        scaler.resize(320.0);
        assert_eq!(scaler.scale(), first);
        scaler.resize(1024.0);
        assert_eq!(scaler.scale(), 1.0);
    }
}
