use super::error::SegDatasetError;

pub struct SegDatasetConfig {
    /// Reference edge length the random train-mode rescale is drawn around.
    pub base_size: u32,
    /// Side of the square crop produced by the train and val joint transforms.
    pub crop_size: u32,
    pub sort_dataset: bool,
    /// Seed for the train-mode RNG. A random one is drawn when `None`.
    pub seed: Option<u64>,
}

impl SegDatasetConfig {
    pub fn build(self) -> Result<Self, SegDatasetError> {
        check_sizes(self.base_size, self.crop_size)?;

        Ok(self)
    }
}

impl Default for SegDatasetConfig {
    fn default() -> Self {
        Self {
            base_size: 520,
            crop_size: 480,
            sort_dataset: false,
            seed: None,
        }
    }
}

fn check_sizes(base_size: u32, crop_size: u32) -> Result<(), SegDatasetError> {
    // base_size / 2 and base_size * 2 bound the random short edge
    if base_size < 2 || base_size > u32::MAX / 2 || crop_size == 0 {
        return Err(SegDatasetError::InvalidConfig {
            base_size,
            crop_size,
        });
    }
    Ok(())
}
