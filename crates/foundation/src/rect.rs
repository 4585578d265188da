use crate::math::{Vec2, Vec3};

/// Axis-aligned pixel rectangle in page coordinates, as reported by layout.
///
/// Queried fresh each resize/frame: the render viewport and the overlay
/// container are laid out independently and may move relative to each other.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// True during layout thrash (zero or negative extent, or non-finite
    /// edges). Projection through a degenerate rect is skipped for the frame.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0)
            || !(self.height > 0.0)
            || !self.left.is_finite()
            || !self.top.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
    }

    /// Maps normalized device coordinates into this rect, in page pixels.
    /// NDC +Y is up; pixel +Y is down.
    pub fn ndc_to_page_px(&self, ndc: Vec3) -> Vec2 {
        Vec2::new(
            self.left + (ndc.x + 1.0) * 0.5 * self.width,
            self.top + (1.0 - ndc.y) * 0.5 * self.height,
        )
    }

    /// Re-expresses a page-pixel point relative to this rect's origin.
    pub fn to_local(&self, page_px: Vec2) -> Vec2 {
        Vec2::new(page_px.x - self.left, page_px.y - self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::PixelRect;
    use crate::math::{Vec2, Vec3};

    #[test]
    fn ndc_corners_map_to_rect_corners() {
        let rect = PixelRect::new(100.0, 50.0, 800.0, 600.0);

        let center = rect.ndc_to_page_px(Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(center, Vec2::new(500.0, 350.0));

        let top_left = rect.ndc_to_page_px(Vec3::new(-1.0, 1.0, 0.5));
        assert_eq!(top_left, Vec2::new(100.0, 50.0));

        let bottom_right = rect.ndc_to_page_px(Vec3::new(1.0, -1.0, 0.5));
        assert_eq!(bottom_right, Vec2::new(900.0, 650.0));
    }

    #[test]
    fn to_local_accounts_for_offset_overlay() {
        // Overlay container not pixel-aligned with the render viewport.
        let viewport = PixelRect::new(100.0, 50.0, 800.0, 600.0);
        let overlay = PixelRect::new(80.0, 40.0, 840.0, 620.0);

        let page = viewport.ndc_to_page_px(Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(overlay.to_local(page), Vec2::new(420.0, 310.0));
    }

    #[test]
    fn degenerate_rects_are_detected() {
        assert!(PixelRect::new(0.0, 0.0, 0.0, 100.0).is_degenerate());
        assert!(PixelRect::new(0.0, 0.0, 100.0, 0.0).is_degenerate());
        assert!(PixelRect::new(f64::NAN, 0.0, 100.0, 100.0).is_degenerate());
        assert!(!PixelRect::new(-5.0, -5.0, 1.0, 1.0).is_degenerate());
    }
}
