//! Trait for object detection inference backends.

use crate::integration::builder::BoxBuilder;
use crate::tracker::Rect;

/// Trait for object detection inference backends.
///
/// Implement this trait to feed any detector into a
/// [`CountingPipeline`](crate::integration::CountingPipeline). An `Err`
/// marks the frame as undecodable; the pipeline logs it and re-emits its
/// cached result.
///
/// # Example
///
/// ```ignore
/// use crowdtrack_rs::{DetectionSource, Rect};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Rect>, Self::Error> {
///         // Run inference and return person boxes
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for decode or detection failures.
    type Error: std::fmt::Display;

    /// Run inference on raw frame data and return detection boxes.
    ///
    /// # Arguments
    /// * `input` - Raw frame bytes (format depends on implementation)
    /// * `width` - Frame width in pixels
    /// * `height` - Frame height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Rect>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to boxes.
pub trait IntoDetections {
    /// Convert the output into a vector of boxes.
    fn into_detections(self) -> Vec<Rect>;
}

impl IntoDetections for Vec<Rect> {
    fn into_detections(self) -> Vec<Rect> {
        self
    }
}

/// Corner tuples `(x1, y1, x2, y2)`.
impl IntoDetections for Vec<[f32; 4]> {
    fn into_detections(self) -> Vec<Rect> {
        self.into_iter()
            .map(|[x1, y1, x2, y2]| BoxBuilder::new().tlbr(x1, y1, x2, y2).build())
            .collect()
    }
}

/// Layout of the four numbers describing each box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxFormat {
    /// `[x1, y1, x2, y2]`, as emitted by YOLO-style detectors
    #[default]
    Tlbr,
    /// `[x, y, w, h]`, as emitted by cascade classifiers
    Tlwh,
}

/// Decodes frames whose payload is a JSON array of boxes produced by an
/// upstream detector process.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBoxSource {
    format: BoxFormat,
}

impl JsonBoxSource {
    pub fn new(format: BoxFormat) -> Self {
        Self { format }
    }
}

impl DetectionSource for JsonBoxSource {
    type Error = serde_json::Error;

    fn detect(
        &mut self,
        input: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<Rect>, Self::Error> {
        let raw: Vec<[f32; 4]> = serde_json::from_slice(input)?;
        Ok(match self.format {
            BoxFormat::Tlbr => raw.into_detections(),
            BoxFormat::Tlwh => raw
                .into_iter()
                .map(|[x, y, w, h]| BoxBuilder::new().tlwh(x, y, w, h).build())
                .collect(),
        })
    }
}
