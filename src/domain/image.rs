//! Test images as they enter the pipeline.

use crate::core::constants::MANIPULATED_MARKER;
use crate::core::errors::TtaError;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Returns whether the file name marks a synthetically manipulated image.
pub fn is_manipulated(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().contains(MANIPULATED_MARKER))
        .unwrap_or(false)
}

/// A decoded 3-channel test image and the flag derived from its file name.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub image: RgbImage,
    pub manipulated: bool,
}

impl SourceImage {
    pub fn new(path: impl Into<PathBuf>, image: RgbImage) -> Self {
        let path = path.into();
        let manipulated = is_manipulated(&path);
        Self {
            path,
            image,
            manipulated,
        }
    }

    /// Decodes the file at `path`.
    pub fn load(path: &Path) -> Result<Self, TtaError> {
        let image = crate::utils::load_image(path)?;
        Ok(Self::new(path, image))
    }

    /// `(height, width, channels)` of the raster.
    pub fn shape(&self) -> (u32, u32, u8) {
        let (width, height) = self.image.dimensions();
        (height, width, crate::core::constants::IMAGE_CHANNELS)
    }

    /// Validates that the raster is `size × size × 3`.
    pub fn ensure_square(&self, size: u32) -> Result<(), TtaError> {
        let expected = (size, size, crate::core::constants::IMAGE_CHANNELS);
        let actual = self.shape();
        if actual != expected {
            return Err(TtaError::InvalidImageShape {
                path: self.path.clone(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manipulated_flag_comes_from_file_name() {
        assert!(is_manipulated(Path::new("test/img_0a1b_manip.tif")));
        assert!(!is_manipulated(Path::new("test/img_0a1b_unalt.tif")));
        assert!(!is_manipulated(Path::new("manip/img_0a1b_unalt.tif")));
    }

    #[test]
    fn ensure_square_reports_both_shapes() {
        let img = SourceImage::new("a.tif", RgbImage::new(512, 500));
        match img.ensure_square(512) {
            Err(TtaError::InvalidImageShape {
                expected, actual, ..
            }) => {
                assert_eq!(expected, (512, 512, 3));
                assert_eq!(actual, (500, 512, 3));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(
            SourceImage::new("b.tif", RgbImage::new(512, 512))
                .ensure_square(512)
                .is_ok()
        );
    }
}
