//! Square cropping at a fixed position.

use super::image_utils;
use crate::core::errors::ImageProcessError;
use crate::processors::types::CropMode;
use image::RgbImage;

/// Cuts a `size × size` window out of an image at the position named by its [`CropMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    size: u32,
    mode: CropMode,
}

impl Crop {
    /// Creates a crop of side `size`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use d4_tta::processors::{Crop, CropMode};
    ///
    /// # fn main() -> Result<(), d4_tta::core::errors::ImageProcessError> {
    /// let crop = Crop::new(480, CropMode::TopRight)?;
    /// assert_eq!(crop.offset(512, 512)?, (32, 0));
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(size: u32, mode: CropMode) -> Result<Self, ImageProcessError> {
        image_utils::check_image_size(&[size, size])?;
        Ok(Self { size, mode })
    }

    /// Gets the side length of the crop.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Gets the crop mode.
    pub fn mode(&self) -> CropMode {
        self.mode
    }

    /// Computes the `(x, y)` offset of the window inside a `width × height` image.
    pub fn offset(&self, width: u32, height: u32) -> Result<(u32, u32), ImageProcessError> {
        let s = self.size;
        if s > width || s > height {
            return Err(ImageProcessError::CropSizeTooLarge);
        }

        let (x, y) = match self.mode {
            CropMode::TopLeft => (0, 0),
            CropMode::TopRight => (width - s, 0),
            CropMode::BottomLeft => (0, height - s),
            CropMode::BottomRight => (width - s, height - s),
            CropMode::Center => image_utils::calculate_center_crop_coords(width, height, s, s)?,
        };
        image_utils::validate_crop_bounds(width, height, x, y, s, s)?;
        Ok((x, y))
    }

    /// Crops the image.
    pub fn process(&self, img: &RgbImage) -> Result<RgbImage, ImageProcessError> {
        let (width, height) = img.dimensions();
        let (x, y) = self.offset(width, height)?;
        if (x, y) == (0, 0) && (width, height) == (self.size, self.size) {
            return Ok(img.clone());
        }
        image_utils::slice_image(img, (x, y, x + self.size, y + self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(
            Crop::new(0, CropMode::Center),
            Err(ImageProcessError::InvalidCropSize)
        );
    }

    #[test]
    fn test_corner_offsets() -> Result<(), ImageProcessError> {
        let offsets: Vec<_> = CropMode::FIVE_CROPS
            .iter()
            .map(|&mode| Crop::new(480, mode)?.offset(512, 512))
            .collect::<Result<_, _>>()?;
        assert_eq!(offsets, vec![(0, 0), (32, 0), (0, 32), (32, 32), (16, 16)]);
        Ok(())
    }

    #[test]
    fn test_crop_takes_pixels_from_offset() -> Result<(), ImageProcessError> {
        let img = gradient(200, 150);
        let cropped = Crop::new(100, CropMode::BottomRight)?.process(&img)?;
        assert_eq!(cropped.dimensions(), (100, 100));
        assert_eq!(cropped.get_pixel(0, 0), &Rgb([100, 50, 0]));
        Ok(())
    }

    #[test]
    fn test_crop_size_too_large() -> Result<(), ImageProcessError> {
        let crop = Crop::new(300, CropMode::Center)?;
        assert_eq!(
            crop.process(&gradient(200, 400)),
            Err(ImageProcessError::CropSizeTooLarge)
        );
        Ok(())
    }

    #[test]
    fn test_crop_same_size_is_whole_image() -> Result<(), ImageProcessError> {
        let img = gradient(64, 64);
        let cropped = Crop::new(64, CropMode::Center)?.process(&img)?;
        assert_eq!(cropped, img);
        Ok(())
    }
}
