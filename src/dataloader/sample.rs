use ndarray::{Array2, Array3};

/// Decoded image, height x width x 3, raw channel values in `0.0..=255.0`.
pub type ImageArray = Array3<f32>;

/// Class-index mask, height x width, `-1` marks ignored pixels.
pub type MaskArray = Array2<i32>;

/// One item returned by a segmentation dataset.
#[derive(Clone, Debug, PartialEq)]
pub enum SegSample {
    Labeled { image: ImageArray, mask: MaskArray },
    /// Test mode: no mask is read, the image's base file name is returned instead.
    Unlabeled { image: ImageArray, file_name: String },
}

impl SegSample {
    pub fn image(&self) -> &ImageArray {
        match self {
            SegSample::Labeled { image, .. } | SegSample::Unlabeled { image, .. } => image,
        }
    }

    pub fn mask(&self) -> Option<&MaskArray> {
        match self {
            SegSample::Labeled { mask, .. } => Some(mask),
            SegSample::Unlabeled { .. } => None,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            SegSample::Labeled { .. } => None,
            SegSample::Unlabeled { file_name, .. } => Some(file_name),
        }
    }
}
