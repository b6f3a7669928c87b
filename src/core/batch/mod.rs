//! Batch containers for augmented views.
//!
//! Workers produce one [`AugmentedBatch`] per test image. The consumer packs it
//! into the image and auxiliary tensors expected by a
//! [`ProbabilityPredictor`](crate::core::traits::ProbabilityPredictor).

use crate::core::errors::TtaError;
use crate::processors::{CropMode, D4Transform};
use image::RgbImage;
use std::path::{Path, PathBuf};

/// A 2-dimensional tensor represented as a 2D array of f32 values.
pub type Tensor2D = ndarray::Array2<f32>;

/// A 4-dimensional tensor represented as a 4D array of f32 values.
pub type Tensor4D = ndarray::Array4<f32>;

/// One augmented view: a crop position, the symmetry applied to it and the pixels.
#[derive(Debug, Clone)]
pub struct AugmentedView {
    /// Where the crop was taken from.
    pub crop: CropMode,
    /// The symmetry applied to the crop.
    pub transform: D4Transform,
    /// The resulting pixels.
    pub image: RgbImage,
}

/// All augmented views of a single test image.
#[derive(Debug, Clone)]
pub struct AugmentedBatch {
    /// Path of the source image.
    pub path: PathBuf,
    /// File name of the source image, used as the row identifier in outputs.
    pub file_name: String,
    /// Whether the source image was synthetically manipulated.
    pub manipulated: bool,
    /// The augmented views in production order.
    pub views: Vec<AugmentedView>,
}

impl AugmentedBatch {
    /// Creates a batch for the image at `path`.
    pub fn new(path: &Path, manipulated: bool, views: Vec<AugmentedView>) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path: path.to_path_buf(),
            file_name,
            manipulated,
            views,
        }
    }

    /// Returns the number of views in the batch.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Checks if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Packs the views into an NHWC tensor of raw `0..=255` values.
    ///
    /// All views must share the same dimensions.
    pub fn images_tensor(&self) -> Result<Tensor4D, TtaError> {
        let first = self
            .views
            .first()
            .ok_or_else(|| TtaError::invalid_input(format!("no views for '{}'", self.file_name)))?;
        let (width, height) = first.image.dimensions();
        let (width, height) = (width as usize, height as usize);

        let mut data = Vec::with_capacity(self.views.len() * height * width * 3);
        for view in &self.views {
            let (w, h) = view.image.dimensions();
            if (w as usize, h as usize) != (width, height) {
                return Err(TtaError::tensor_shape_mismatch(
                    "packing augmented views",
                    &[height, width, 3],
                    &[h as usize, w as usize, 3],
                ));
            }
            data.extend(view.image.as_raw().iter().map(|&v| v as f32));
        }

        Ok(Tensor4D::from_shape_vec(
            (self.views.len(), height, width, 3),
            data,
        )?)
    }

    /// Builds the `[N, 1]` auxiliary tensor repeating the manipulated flag.
    pub fn manipulated_tensor(&self) -> Tensor2D {
        let flag = if self.manipulated { 1.0 } else { 0.0 };
        Tensor2D::from_elem((self.views.len(), 1), flag)
    }
}
