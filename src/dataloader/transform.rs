use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Pixel, RgbImage};
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::Rng;

use super::error::SegDatasetError;
use super::sample::ImageArray;

/// Applied to the image array after the joint transform, in every mode.
pub type PostTransform = Box<dyn Fn(ImageArray) -> ImageArray + Send + Sync>;

/// Geometric transforms shared by segmentation datasets.
///
/// The joint methods keep image and mask aligned: whatever crop, flip or
/// rescale hits the image hits the mask too. Masks are always resampled with
/// nearest-neighbour so no new label values appear.
pub trait JointTransform: Send + Sync {
    /// Randomized train-time augmentation.
    fn sync_transform(
        &self,
        image: RgbImage,
        mask: GrayImage,
        rng: &mut StdRng,
    ) -> (RgbImage, GrayImage);

    /// Deterministic eval-time resize and crop.
    fn val_sync_transform(&self, image: RgbImage, mask: GrayImage) -> (RgbImage, GrayImage);

    fn img_transform(&self, image: RgbImage) -> Result<ImageArray, SegDatasetError> {
        image_to_array(image)
    }
}

pub fn image_to_array(image: RgbImage) -> Result<ImageArray, SegDatasetError> {
    let (width, height) = image.dimensions();
    let data = image.into_raw().into_iter().map(f32::from).collect();
    Ok(Array3::from_shape_vec((height as usize, width as usize, 3), data)?)
}

/// Flip, short-edge rescale, pad, crop and blur in the PSPNet style.
#[derive(Clone, Debug)]
pub struct StandardJointTransform {
    pub base_size: u32,
    pub crop_size: u32,
}

impl StandardJointTransform {
    pub fn new(base_size: u32, crop_size: u32) -> Self {
        Self {
            base_size,
            crop_size,
        }
    }
}

impl JointTransform for StandardJointTransform {
    fn sync_transform(
        &self,
        mut image: RgbImage,
        mut mask: GrayImage,
        rng: &mut StdRng,
    ) -> (RgbImage, GrayImage) {
        let crop = self.crop_size;

        if rng.gen::<f64>() < 0.5 {
            image = imageops::flip_horizontal(&image);
            mask = imageops::flip_horizontal(&mask);
        }

        let short_size = rng.gen_range(self.base_size / 2..=self.base_size * 2);
        let (ow, oh) = short_edge_size(image.width(), image.height(), short_size);
        image = imageops::resize(&image, ow, oh, FilterType::Triangle);
        mask = imageops::resize(&mask, ow, oh, FilterType::Nearest);

        if short_size < crop {
            let width = ow.max(crop);
            let height = oh.max(crop);
            image = pad_bottom_right(&image, width, height);
            mask = pad_bottom_right(&mask, width, height);
        }

        let x1 = rng.gen_range(0..=image.width() - crop);
        let y1 = rng.gen_range(0..=image.height() - crop);
        image = imageops::crop_imm(&image, x1, y1, crop, crop).to_image();
        mask = imageops::crop_imm(&mask, x1, y1, crop, crop).to_image();

        if rng.gen::<f64>() < 0.5 {
            let radius = rng.gen::<f32>();
            // sigma 0 is the identity
            if radius > 0.0 {
                image = imageops::blur(&image, radius);
            }
        }

        (image, mask)
    }

    fn val_sync_transform(&self, image: RgbImage, mask: GrayImage) -> (RgbImage, GrayImage) {
        let crop = self.crop_size;
        let (ow, oh) = short_edge_size(image.width(), image.height(), crop);
        let image = imageops::resize(&image, ow, oh, FilterType::Triangle);
        let mask = imageops::resize(&mask, ow, oh, FilterType::Nearest);

        let x1 = (0.5 * (ow - crop) as f64).round() as u32;
        let y1 = (0.5 * (oh - crop) as f64).round() as u32;
        let image = imageops::crop_imm(&image, x1, y1, crop, crop).to_image();
        let mask = imageops::crop_imm(&mask, x1, y1, crop, crop).to_image();

        (image, mask)
    }
}

/// Output size that scales the shorter edge of `width x height` to `short`,
/// keeping the aspect ratio (long edge truncated).
fn short_edge_size(width: u32, height: u32, short: u32) -> (u32, u32) {
    if height > width {
        let oh = (height as f64 * short as f64 / width as f64) as u32;
        (short, oh)
    } else {
        let ow = (width as f64 * short as f64 / height as f64) as u32;
        (ow, short)
    }
}

fn pad_bottom_right<P>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    width: u32,
    height: u32,
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel + 'static,
    P::Subpixel: 'static,
{
    let mut canvas = ImageBuffer::new(width, height);
    imageops::replace(&mut canvas, image, 0, 0);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};
    use rand::SeedableRng;

    fn striped_pair(width: u32, height: u32) -> (RgbImage, GrayImage) {
        let image = RgbImage::from_fn(width, height, |x, _| Rgb([(x % 256) as u8, 10, 20]));
        let mask = GrayImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Luma([3])
            } else {
                Luma([7])
            }
        });
        (image, mask)
    }

    #[test]
    fn short_edge_keeps_aspect() {
        assert_eq!(short_edge_size(100, 50, 32), (64, 32));
        assert_eq!(short_edge_size(50, 100, 32), (32, 64));
        assert_eq!(short_edge_size(40, 40, 16), (16, 16));
        assert_eq!(short_edge_size(3, 2, 5), (7, 5));
    }

    #[test]
    fn pad_fills_with_zero() {
        let mask = GrayImage::from_pixel(2, 3, Luma([9]));
        let padded = pad_bottom_right(&mask, 4, 5);
        assert_eq!(padded.dimensions(), (4, 5));
        assert_eq!(padded.get_pixel(1, 2).0, [9]);
        assert_eq!(padded.get_pixel(3, 2).0, [0]);
        assert_eq!(padded.get_pixel(0, 4).0, [0]);
    }

    #[test]
    fn val_transform_is_deterministic_center_crop() {
        let transform = StandardJointTransform::new(40, 32);
        let (image, mask) = striped_pair(100, 50);

        let (a_img, a_mask) = transform.val_sync_transform(image.clone(), mask.clone());
        let (b_img, b_mask) = transform.val_sync_transform(image, mask);

        assert_eq!(a_img.dimensions(), (32, 32));
        assert_eq!(a_mask.dimensions(), (32, 32));
        assert_eq!(a_img, b_img);
        assert_eq!(a_mask, b_mask);
        // 64 px wide after resize, centre crop spans the stripe boundary
        assert_eq!(a_mask.get_pixel(0, 0).0, [3]);
        assert_eq!(a_mask.get_pixel(31, 0).0, [7]);
    }

    #[test]
    fn train_transform_always_yields_crop_size() {
        let transform = StandardJointTransform::new(20, 16);
        let mut rng = StdRng::seed_from_u64(727);

        for (w, h) in [(30, 40), (40, 30), (8, 8), (100, 12)] {
            for _ in 0..10 {
                let (image, mask) = striped_pair(w, h);
                let (image, mask) = transform.sync_transform(image, mask, &mut rng);
                assert_eq!(image.dimensions(), (16, 16));
                assert_eq!(mask.dimensions(), (16, 16));
            }
        }
    }

    #[test]
    fn train_transform_never_invents_labels() {
        let transform = StandardJointTransform::new(20, 16);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..20 {
            let (image, mask) = striped_pair(24, 18);
            let (_, mask) = transform.sync_transform(image, mask, &mut rng);
            assert!(mask.pixels().all(|p| matches!(p.0[0], 0 | 3 | 7)));
        }
    }

    #[test]
    fn same_seed_same_augmentation() {
        let transform = StandardJointTransform::new(20, 16);
        let (image, mask) = striped_pair(30, 25);

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = transform.sync_transform(image.clone(), mask.clone(), &mut rng_a);
        let b = transform.sync_transform(image, mask, &mut rng_b);
        assert_eq!(a, b);
    }

    #[test]
    fn image_array_is_hwc() {
        let image = RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 255]));
        let array = image_to_array(image).unwrap();
        assert_eq!(array.shape(), &[2, 3, 3]);
        assert_eq!(array[[1, 2, 0]], 2.0);
        assert_eq!(array[[1, 2, 1]], 1.0);
        assert_eq!(array[[0, 0, 2]], 255.0);
    }
}
