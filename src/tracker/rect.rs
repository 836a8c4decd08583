/// Axis-aligned detection box as emitted by a detector.
///
/// Stored in TLWH form (top-left x, top-left y, width, height) and
/// convertible to and from TLBR corners (x1, y1, x2, y2).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        let [x1, y1, x2, y2] = self.to_tlbr();
        ((x1 + x2) / 2.0, (y1 + y2) / 2.0)
    }

    /// Integer midpoint of the box corners, truncated toward zero.
    #[inline]
    pub fn centroid(&self) -> Centroid {
        let (cx, cy) = self.center();
        Centroid::new(cx as i32, cy as i32)
    }
}

/// Pixel position of a tracked object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Centroid {
    pub x: i32,
    pub y: i32,
}

impl Centroid {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Centroid) -> f64 {
        nalgebra::distance(&self.to_point(), &other.to_point())
    }

    fn to_point(self) -> nalgebra::Point2<f64> {
        nalgebra::Point2::new(self.x as f64, self.y as f64)
    }
}

impl From<(i32, i32)> for Centroid {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
