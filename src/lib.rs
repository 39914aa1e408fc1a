pub mod dataloader;

pub use dataloader::ade20k::{Ade20kSegDataset, NUM_CLASSES};
pub use dataloader::config::SegDatasetConfig;
pub use dataloader::dataloader::{Dataset, DatasetIter};
pub use dataloader::error::SegDatasetError;
pub use dataloader::layout::DatasetLayout;
pub use dataloader::mode::Mode;
pub use dataloader::sample::{ImageArray, MaskArray, SegSample};
pub use dataloader::transform::{JointTransform, PostTransform, StandardJointTransform};
