use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegDatasetError {
    // Construction
    #[error("Please prepare dataset: {} does not exist", .0.display())]
    DatasetNotPrepared(PathBuf),

    #[error("Found 0 images in subfolders of: {}", .0.display())]
    EmptyDataset(PathBuf),

    #[error("Invalid dataset config. Base size: {base_size}, crop size: {crop_size}")]
    InvalidConfig { base_size: u32, crop_size: u32 },

    #[error("Unknown mode: {0} (expected train, val, test or testval)")]
    InvalidMode(String),

    // Access
    #[error("Index {index} out of bounds for dataset of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Mask {} is {color:?}, expected 8-bit single channel", .path.display())]
    UnsupportedMask {
        path: PathBuf,
        color: image::ColorType,
    },

    #[error("Failed to acquire lock on RNG")]
    RngLockError,

    // IO and decoding
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Array shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),
}
