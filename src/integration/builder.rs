//! Builder for creating boxes from various input formats.

use crate::tracker::Rect;

/// Builder for creating [`Rect`] boxes from various input formats.
#[derive(Debug, Clone, Default)]
pub struct BoxBuilder {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl BoxBuilder {
    /// Create a new box builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Build the final box.
    pub fn build(self) -> Rect {
        Rect::from_tlbr(self.x1, self.y1, self.x2, self.y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Centroid;

    #[test]
    fn test_box_builder_formats() {
        let tlbr = BoxBuilder::new().tlbr(10.0, 20.0, 50.0, 80.0).build();
        let tlwh = BoxBuilder::new().tlwh(10.0, 20.0, 40.0, 60.0).build();
        let xywh = BoxBuilder::new().xywh(30.0, 50.0, 40.0, 60.0).build();

        assert_eq!(tlbr, tlwh);
        assert_eq!(tlbr, xywh);
        assert_eq!(tlbr.centroid(), Centroid::new(30, 50));
    }
}
