//! The dihedral group of the square acting on image rasters.
//!
//! Rotations are clockwise quarter turns. Mirrored elements apply the rotation
//! first and a horizontal flip second.

use image::{RgbImage, imageops};
use std::fmt;

/// One of the eight symmetries of a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum D4Transform {
    Identity,
    Rot90,
    Rot180,
    Rot270,
    FlipH,
    FlipHRot90,
    FlipHRot180,
    FlipHRot270,
}

impl D4Transform {
    /// All group elements in emission order.
    pub const ALL: [D4Transform; 8] = [
        D4Transform::Identity,
        D4Transform::Rot90,
        D4Transform::Rot180,
        D4Transform::Rot270,
        D4Transform::FlipH,
        D4Transform::FlipHRot90,
        D4Transform::FlipHRot180,
        D4Transform::FlipHRot270,
    ];

    /// Number of clockwise quarter turns applied before the optional flip.
    pub fn quarter_turns(self) -> u8 {
        match self {
            D4Transform::Identity | D4Transform::FlipH => 0,
            D4Transform::Rot90 | D4Transform::FlipHRot90 => 1,
            D4Transform::Rot180 | D4Transform::FlipHRot180 => 2,
            D4Transform::Rot270 | D4Transform::FlipHRot270 => 3,
        }
    }

    /// Whether the element reverses orientation.
    pub fn is_reflection(self) -> bool {
        matches!(
            self,
            D4Transform::FlipH
                | D4Transform::FlipHRot90
                | D4Transform::FlipHRot180
                | D4Transform::FlipHRot270
        )
    }

    /// Returns the element that undoes `self`.
    ///
    /// Reflections and the half turn are their own inverses.
    pub fn inverse(self) -> Self {
        match self {
            D4Transform::Rot90 => D4Transform::Rot270,
            D4Transform::Rot270 => D4Transform::Rot90,
            other => other,
        }
    }

    /// Applies the symmetry, returning a new raster.
    pub fn apply(self, img: &RgbImage) -> RgbImage {
        let rotated = match self.quarter_turns() {
            0 => img.clone(),
            1 => imageops::rotate90(img),
            2 => imageops::rotate180(img),
            _ => imageops::rotate270(img),
        };
        if self.is_reflection() {
            imageops::flip_horizontal(&rotated)
        } else {
            rotated
        }
    }
}

impl fmt::Display for D4Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            D4Transform::Identity => "identity",
            D4Transform::Rot90 => "rot90",
            D4Transform::Rot180 => "rot180",
            D4Transform::Rot270 => "rot270",
            D4Transform::FlipH => "flip",
            D4Transform::FlipHRot90 => "flip_rot90",
            D4Transform::FlipHRot180 => "flip_rot180",
            D4Transform::FlipHRot270 => "flip_rot270",
        };
        f.write_str(name)
    }
}
