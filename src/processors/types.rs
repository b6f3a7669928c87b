//! Types used in image processing operations
//!
//! This module defines the enums that describe where crops are taken from and
//! how pixel tensors are laid out before they reach the model.
use std::fmt;

/// Specifies where a crop is positioned inside the source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropMode {
    /// Crop from the center of the image
    Center,
    /// Crop from the top-left corner of the image
    TopLeft,
    /// Crop from the top-right corner of the image
    TopRight,
    /// Crop from the bottom-left corner of the image
    BottomLeft,
    /// Crop from the bottom-right corner of the image
    BottomRight,
}

impl CropMode {
    /// The five-crop positions in emission order: the four corners, then the center.
    pub const FIVE_CROPS: [CropMode; 5] = [
        CropMode::TopLeft,
        CropMode::TopRight,
        CropMode::BottomLeft,
        CropMode::BottomRight,
        CropMode::Center,
    ];
}

impl fmt::Display for CropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropMode::Center => write!(f, "C"),
            CropMode::TopLeft => write!(f, "TL"),
            CropMode::TopRight => write!(f, "TR"),
            CropMode::BottomLeft => write!(f, "BL"),
            CropMode::BottomRight => write!(f, "BR"),
        }
    }
}

/// Specifies the order of channels in an image tensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ChannelOrder {
    /// Channel, Height, Width order (common in PyTorch)
    CHW,
    /// Height, Width, Channel order (common in TensorFlow)
    #[default]
    HWC,
}
