use std::path::{Path, PathBuf};

use super::mode::Mode;

pub const BASE_DIR_NAME: &str = "ADEChallengeData2016";
pub const IMAGE_EXTENSION: &str = "jpg";
pub const MASK_EXTENSION: &str = "png";

/// On-disk locations of one mode's images and masks under a dataset root.
#[derive(Clone, Debug)]
pub struct DatasetLayout {
    pub base_dir: PathBuf,
    pub image_dir: PathBuf,
    pub mask_dir: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl AsRef<Path>, mode: Mode) -> Self {
        let base_dir = root.as_ref().join(BASE_DIR_NAME);
        let image_dir = base_dir.join("images").join(mode.dir_name());
        let mask_dir = base_dir.join("annotations").join(mode.dir_name());

        DatasetLayout {
            base_dir,
            image_dir,
            mask_dir,
        }
    }

    /// Mask path paired with `image_path` by file stem, whether or not it exists.
    pub fn mask_path_for(&self, image_path: &Path) -> Option<PathBuf> {
        let stem = image_path.file_stem()?.to_str()?;
        Some(self.mask_dir.join(format!("{stem}.{MASK_EXTENSION}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn train_layout() {
        let layout = DatasetLayout::new("/data", Mode::Train);
        assert_eq!(layout.base_dir, PathBuf::from("/data/ADEChallengeData2016"));
        assert_eq!(
            layout.image_dir,
            PathBuf::from("/data/ADEChallengeData2016/images/training")
        );
        assert_eq!(
            layout.mask_dir,
            PathBuf::from("/data/ADEChallengeData2016/annotations/training")
        );
    }

    #[test]
    fn testval_shares_validation_dirs() {
        let val = DatasetLayout::new("/data", Mode::Val);
        let testval = DatasetLayout::new("/data", Mode::TestVal);
        assert_eq!(val.image_dir, testval.image_dir);
        assert_eq!(val.mask_dir, testval.mask_dir);
    }

    #[test]
    fn mask_path_keeps_stem() {
        let layout = DatasetLayout::new("/data", Mode::Val);
        let mask = layout
            .mask_path_for(&layout.image_dir.join("ADE_val_00000001.jpg"))
            .unwrap();
        assert_eq!(
            mask,
            PathBuf::from("/data/ADEChallengeData2016/annotations/validation/ADE_val_00000001.png")
        );

        let dotted = layout.mask_path_for(Path::new("a.b.jpg")).unwrap();
        assert_eq!(dotted.file_name().unwrap(), "a.b.png");
    }
}
