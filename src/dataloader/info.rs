use tracing::info;

use super::ade20k::Ade20kSegDataset;
use super::dataloader::Dataset;

pub fn log_dataset_info(ds: &Ade20kSegDataset) {
    info!(
        mode = %ds.mode(),
        split = ds.split(),
        dir = %ds.layout().image_dir.display(),
        samples = ds.len(),
        skipped = ds.missing_masks().len(),
        classes = ds.classes(),
        seed = ds.seed(),
        "ADE20K dataset ready"
    );
}
