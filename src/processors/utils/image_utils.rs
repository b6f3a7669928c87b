//! Utility functions for basic image operations.

use crate::core::errors::ImageProcessError;
use image::{RgbImage, imageops};

/// Checks if the given image size is valid (non-zero dimensions).
///
/// # Arguments
///
/// * `size` - A reference to an array containing width and height values.
///
/// # Returns
///
/// * `Ok(())` if both dimensions are greater than zero.
/// * `Err(ImageProcessError::InvalidCropSize)` if either dimension is zero.
pub fn check_image_size(size: &[u32; 2]) -> Result<(), ImageProcessError> {
    if size[0] == 0 || size[1] == 0 {
        return Err(ImageProcessError::InvalidCropSize);
    }
    Ok(())
}

/// Slices a region from an image buffer.
///
/// # Arguments
///
/// * `img` - Reference to the source image buffer.
/// * `coords` - Tuple containing (x1, y1, x2, y2) coordinates defining the crop region.
///   (x1, y1) is the top-left corner, (x2, y2) is the exclusive bottom-right corner.
///
/// # Examples
///
/// ```rust,no_run
/// use image::RgbImage;
/// use d4_tta::processors::utils::image_utils::slice_image;
///
/// let img = RgbImage::new(100, 100);
/// let cropped = slice_image(&img, (10, 10, 50, 50)).unwrap();
/// assert_eq!(cropped.dimensions(), (40, 40));
/// ```
pub fn slice_image(
    img: &RgbImage,
    coords: (u32, u32, u32, u32),
) -> Result<RgbImage, ImageProcessError> {
    let (x1, y1, x2, y2) = coords;
    let (img_width, img_height) = img.dimensions();

    if x1 >= x2 || y1 >= y2 {
        return Err(ImageProcessError::InvalidCropCoordinates);
    }
    if x2 > img_width || y2 > img_height {
        return Err(ImageProcessError::CropOutOfBounds);
    }

    Ok(imageops::crop_imm(img, x1, y1, x2 - x1, y2 - y1).to_image())
}

/// Rounds `value / 2` to the nearest integer, resolving ties toward the even neighbour.
pub fn half_round_even(value: u32) -> u32 {
    let half = value / 2;
    if value % 2 == 1 && half % 2 == 1 {
        half + 1
    } else {
        half
    }
}

/// Calculates the top-left offset of a centered crop.
///
/// Each offset is `(image_dim - crop_dim) / 2` rounded half to even, so a 3 pixel
/// margin yields an offset of 2 and a 1 pixel margin an offset of 0.
pub fn calculate_center_crop_coords(
    img_width: u32,
    img_height: u32,
    crop_width: u32,
    crop_height: u32,
) -> Result<(u32, u32), ImageProcessError> {
    if crop_width > img_width || crop_height > img_height {
        return Err(ImageProcessError::CropSizeTooLarge);
    }

    let x = half_round_even(img_width - crop_width);
    let y = half_round_even(img_height - crop_height);

    Ok((x, y))
}

/// Validates that crop coordinates are within image bounds.
pub fn validate_crop_bounds(
    img_width: u32,
    img_height: u32,
    x: u32,
    y: u32,
    crop_width: u32,
    crop_height: u32,
) -> Result<(), ImageProcessError> {
    if x + crop_width > img_width || y + crop_height > img_height {
        return Err(ImageProcessError::CropOutOfBounds);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_check_image_size() {
        assert!(check_image_size(&[100, 100]).is_ok());
        assert!(check_image_size(&[0, 100]).is_err());
        assert!(check_image_size(&[100, 0]).is_err());
    }

    #[test]
    fn test_slice_image() {
        let mut img = RgbImage::from_pixel(100, 100, Rgb([255, 0, 0]));
        img.put_pixel(10, 10, Rgb([1, 2, 3]));
        let cropped = slice_image(&img, (10, 10, 50, 50)).unwrap();
        assert_eq!(cropped.dimensions(), (40, 40));
        assert_eq!(cropped.get_pixel(0, 0), &Rgb([1, 2, 3]));

        assert_eq!(
            slice_image(&img, (50, 50, 10, 10)),
            Err(ImageProcessError::InvalidCropCoordinates)
        );
        assert_eq!(
            slice_image(&img, (10, 10, 200, 50)),
            Err(ImageProcessError::CropOutOfBounds)
        );
    }

    #[test]
    fn test_half_round_even() {
        assert_eq!(half_round_even(32), 16);
        assert_eq!(half_round_even(0), 0);
        assert_eq!(half_round_even(1), 0);
        assert_eq!(half_round_even(3), 2);
        assert_eq!(half_round_even(5), 2);
        assert_eq!(half_round_even(7), 4);
    }

    #[test]
    fn test_calculate_center_crop_coords() {
        assert_eq!(calculate_center_crop_coords(512, 512, 480, 480), Ok((16, 16)));
        assert_eq!(calculate_center_crop_coords(480, 480, 480, 480), Ok((0, 0)));
        assert_eq!(calculate_center_crop_coords(103, 101, 100, 100), Ok((2, 0)));
        assert!(calculate_center_crop_coords(100, 100, 200, 50).is_err());
    }

    #[test]
    fn test_validate_crop_bounds() {
        assert!(validate_crop_bounds(100, 100, 10, 10, 50, 50).is_ok());
        assert!(validate_crop_bounds(100, 100, 60, 60, 50, 50).is_err());
    }
}
