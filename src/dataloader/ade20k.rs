use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::{DynamicImage, GrayImage};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::config::SegDatasetConfig;
use super::dataloader::Dataset;
use super::error::SegDatasetError;
use super::info::log_dataset_info;
use super::layout::{DatasetLayout, IMAGE_EXTENSION};
use super::mode::Mode;
use super::sample::{ImageArray, MaskArray, SegSample};
use super::transform::{JointTransform, PostTransform, StandardJointTransform};

pub const NUM_CLASSES: usize = 150;

/// ADE20K scene-parsing dataset (`ADEChallengeData2016` release).
///
/// Images and masks are paired by file stem once at construction. Every `get`
/// decodes from disk again; nothing is cached.
pub struct Ade20kSegDataset {
    layout: DatasetLayout,
    split: String,
    mode: Mode,
    images: Vec<PathBuf>,
    masks: Vec<PathBuf>,
    missing_masks: Vec<PathBuf>,
    transform: Option<PostTransform>,
    joint_transform: Box<dyn JointTransform>,
    seed: u64,
    rng: Mutex<StdRng>,
}

impl Ade20kSegDataset {
    pub fn new(
        root: impl AsRef<Path>,
        split: &str,
        mode: Mode,
        transform: Option<PostTransform>,
        config: Option<SegDatasetConfig>,
    ) -> Result<Self, SegDatasetError> {
        let config = config.unwrap_or_default().build()?;
        let joint_transform = StandardJointTransform::new(config.base_size, config.crop_size);

        Self::with_joint_transform(
            root,
            split,
            mode,
            transform,
            Box::new(joint_transform),
            config,
        )
    }

    /// Like [`Ade20kSegDataset::new`] but with a caller supplied geometric pipeline.
    /// `config.base_size` and `config.crop_size` are ignored here.
    pub fn with_joint_transform(
        root: impl AsRef<Path>,
        split: &str,
        mode: Mode,
        transform: Option<PostTransform>,
        joint_transform: Box<dyn JointTransform>,
        mut config: SegDatasetConfig,
    ) -> Result<Self, SegDatasetError> {
        let layout = DatasetLayout::new(root, mode);
        if !layout.base_dir.exists() {
            return Err(SegDatasetError::DatasetNotPrepared(layout.base_dir));
        }

        if config.seed.is_none() {
            config.seed = Some(rand::thread_rng().gen());
        }
        let seed = config.seed.unwrap_or_default();

        let mut ds = Ade20kSegDataset {
            layout,
            split: split.to_string(),
            mode,
            images: Vec::new(),
            masks: Vec::new(),
            missing_masks: Vec::new(),
            transform,
            joint_transform,
            seed,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        };

        ds.load_dataset(config.sort_dataset)?;
        log_dataset_info(&ds);

        Ok(ds)
    }

    fn load_dataset(&mut self, sort_dataset: bool) -> Result<(), SegDatasetError> {
        let mut image_paths: Vec<PathBuf> = std::fs::read_dir(&self.layout.image_dir)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()?;
        image_paths.retain(|path| is_image_file(path));

        // read_dir order depends on the filesystem
        if sort_dataset {
            image_paths.sort_unstable();
        }

        for image_path in image_paths {
            let Some(mask_path) = self.layout.mask_path_for(&image_path) else {
                continue;
            };
            if mask_path.is_file() {
                self.images.push(image_path);
                self.masks.push(mask_path);
            } else {
                warn!("Cannot find the mask: {}", mask_path.display());
                self.missing_masks.push(mask_path);
            }
        }

        debug_assert_eq!(self.images.len(), self.masks.len());
        if self.images.is_empty() {
            return Err(SegDatasetError::EmptyDataset(self.layout.base_dir.clone()));
        }

        Ok(())
    }

    /// Decoded 8-bit mask to class indices: raw 0 (unlabeled) becomes -1,
    /// raw 1..=150 become 0..=149. Masks must be single-channel 8-bit, see
    /// `load_mask`.
    pub fn mask_transform(mask: &GrayImage) -> Result<MaskArray, SegDatasetError> {
        let (width, height) = mask.dimensions();
        let data = mask.as_raw().iter().map(|&v| i32::from(v) - 1).collect();
        Ok(Array2::from_shape_vec((height as usize, width as usize), data)?)
    }

    // Palette PNGs decode to RGB and 16-bit masks would need rescaling, so
    // anything but L8 is rejected rather than converted.
    fn load_mask(&self, index: usize) -> Result<GrayImage, SegDatasetError> {
        let path = &self.masks[index];
        match image::open(path)? {
            DynamicImage::ImageLuma8(mask) => Ok(mask),
            other => Err(SegDatasetError::UnsupportedMask {
                path: path.clone(),
                color: other.color(),
            }),
        }
    }

    fn next_rng(&self) -> Result<StdRng, SegDatasetError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| SegDatasetError::RngLockError)?;
        Ok(StdRng::seed_from_u64(rng.gen()))
    }

    fn apply_transform(&self, image: ImageArray) -> ImageArray {
        match &self.transform {
            Some(transform) => transform(image),
            None => image,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn split(&self) -> &str {
        &self.split
    }

    pub fn classes(&self) -> usize {
        NUM_CLASSES
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    pub fn image_path(&self, index: usize) -> Option<&Path> {
        self.images.get(index).map(PathBuf::as_path)
    }

    pub fn mask_path(&self, index: usize) -> Option<&Path> {
        self.masks.get(index).map(PathBuf::as_path)
    }

    /// Expected mask paths that did not exist during the scan.
    pub fn missing_masks(&self) -> &[PathBuf] {
        &self.missing_masks
    }
}

impl Dataset for Ade20kSegDataset {
    type Item = SegSample;

    fn get(&self, index: usize) -> Result<SegSample, SegDatasetError> {
        let image_path = self
            .images
            .get(index)
            .ok_or(SegDatasetError::IndexOutOfBounds {
                index,
                len: self.images.len(),
            })?;
        debug!(index, mode = %self.mode, path = %image_path.display(), "loading sample");

        let image = image::open(image_path)?.into_rgb8();

        let (image, mask) = match self.mode {
            Mode::Test => {
                let image = self.joint_transform.img_transform(image)?;
                return Ok(SegSample::Unlabeled {
                    image: self.apply_transform(image),
                    file_name: base_file_name(image_path),
                });
            }
            Mode::Train => {
                let mask = self.load_mask(index)?;
                let mut rng = self.next_rng()?;
                self.joint_transform.sync_transform(image, mask, &mut rng)
            }
            Mode::Val => {
                let mask = self.load_mask(index)?;
                self.joint_transform.val_sync_transform(image, mask)
            }
            Mode::TestVal => (image, self.load_mask(index)?),
        };

        let image = self.joint_transform.img_transform(image)?;
        let mask = Self::mask_transform(&mask)?;

        Ok(SegSample::Labeled {
            image: self.apply_transform(image),
            mask,
        })
    }

    fn len(&self) -> usize {
        self.images.len()
    }
}

fn is_image_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(&format!(".{IMAGE_EXTENSION}")))
        .unwrap_or(false)
}

fn base_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
