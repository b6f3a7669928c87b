//! Five-crop × D4 test-time augmentation.
//!
//! Each validated image is expanded crop-major: the four corners and the
//! center, and for each crop the eight [`D4Transform`]s in [`D4Transform::ALL`]
//! order. With augmentation disabled a single center crop is emitted.

use super::d4::D4Transform;
use super::types::CropMode;
use super::utils::Crop;
use crate::core::batch::{AugmentedBatch, AugmentedView};
use crate::core::constants::{DEFAULT_CROP_SIZE, DEFAULT_IMAGE_SIZE, TTA_BATCH_SIZE};
use crate::core::errors::{ImageProcessError, TtaError};
use crate::domain::SourceImage;

/// Top-left `(x, y)` offsets of the five crops of side `size` in an image of
/// `height × width`, in [`CropMode::FIVE_CROPS`] order.
///
/// # Errors
///
/// `TtaError::CropSizeTooLarge` if `size` exceeds either dimension.
pub fn five_crop_positions(
    height: u32,
    width: u32,
    size: u32,
) -> Result<[(CropMode, (u32, u32)); 5], TtaError> {
    let mut positions = [(CropMode::TopLeft, (0, 0)); 5];
    for (slot, mode) in positions.iter_mut().zip(CropMode::FIVE_CROPS) {
        let offset = Crop::new(size, mode)
            .and_then(|crop| crop.offset(width, height))
            .map_err(|e| TtaError::from_crop_error(e, size, height, width))?;
        *slot = (mode, offset);
    }
    Ok(positions)
}

/// Turns a [`SourceImage`] into the batch of views scored by the predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtaAugmenter {
    image_size: u32,
    crop_size: u32,
    use_tta: bool,
}

impl TtaAugmenter {
    /// Creates an augmenter for `image_size × image_size` inputs.
    ///
    /// # Errors
    ///
    /// Rejects a zero crop size and a crop larger than the image.
    pub fn new(image_size: u32, crop_size: u32, use_tta: bool) -> Result<Self, TtaError> {
        Crop::new(crop_size, CropMode::Center)
            .map_err(|e| TtaError::from_crop_error(e, crop_size, image_size, image_size))?;
        if crop_size > image_size {
            return Err(TtaError::from_crop_error(
                ImageProcessError::CropSizeTooLarge,
                crop_size,
                image_size,
                image_size,
            ));
        }
        Ok(Self {
            image_size,
            crop_size,
            use_tta,
        })
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    pub fn crop_size(&self) -> u32 {
        self.crop_size
    }

    pub fn use_tta(&self) -> bool {
        self.use_tta
    }

    /// Number of views produced per image.
    pub fn views_per_image(&self) -> usize {
        if self.use_tta { TTA_BATCH_SIZE } else { 1 }
    }

    /// Produces the augmented views of one image.
    ///
    /// # Errors
    ///
    /// `TtaError::InvalidImageShape` if the image is not `image_size × image_size × 3`.
    pub fn augment(&self, source: &SourceImage) -> Result<AugmentedBatch, TtaError> {
        source.ensure_square(self.image_size)?;
        let (height, width, _) = source.shape();

        let views = if self.use_tta {
            let mut views = Vec::with_capacity(TTA_BATCH_SIZE);
            for (mode, _) in five_crop_positions(height, width, self.crop_size)? {
                let crop = self.crop(source, mode)?;
                views.extend(D4Transform::ALL.iter().map(|&transform| AugmentedView {
                    crop: mode,
                    transform,
                    image: transform.apply(&crop),
                }));
            }
            views
        } else {
            vec![AugmentedView {
                crop: CropMode::Center,
                transform: D4Transform::Identity,
                image: self.crop(source, CropMode::Center)?,
            }]
        };

        Ok(AugmentedBatch::new(&source.path, source.manipulated, views))
    }

    fn crop(&self, source: &SourceImage, mode: CropMode) -> Result<image::RgbImage, TtaError> {
        let (height, width, _) = source.shape();
        Crop::new(self.crop_size, mode)
            .and_then(|crop| crop.process(&source.image))
            .map_err(|e| TtaError::from_crop_error(e, self.crop_size, height, width))
    }
}

impl Default for TtaAugmenter {
    fn default() -> Self {
        Self {
            image_size: DEFAULT_IMAGE_SIZE,
            crop_size: DEFAULT_CROP_SIZE,
            use_tta: true,
        }
    }
}
