//! Utility functions for decoding images.
//!
//! Test images must already be 8-bit, 3-channel rasters; decoding never
//! silently drops an alpha channel or expands a grayscale image.

use crate::core::errors::TtaError;
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Opens and decodes an image file in whatever format the decoder reports.
///
/// # Errors
///
/// Returns `TtaError::ImageLoad` if the file cannot be read or decoded.
pub fn open_image(path: &Path) -> Result<DynamicImage, TtaError> {
    image::open(path).map_err(|source| TtaError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads an image and returns it as an RgbImage, rejecting anything that is not 3-channel.
///
/// # Errors
///
/// * `TtaError::ImageLoad` if decoding fails.
/// * `TtaError::InvalidImageShape` if the decoded image has a channel count other than 3.
pub fn load_image(path: &Path) -> Result<RgbImage, TtaError> {
    let img = open_image(path)?;
    let channels = img.color().channel_count();
    if channels != crate::core::constants::IMAGE_CHANNELS {
        let (width, height) = (img.width(), img.height());
        return Err(TtaError::InvalidImageShape {
            path: path.to_path_buf(),
            expected: (height, width, crate::core::constants::IMAGE_CHANNELS),
            actual: (height, width, channels),
        });
    }
    Ok(dynamic_to_rgb(img))
}
