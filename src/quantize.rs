use image::Rgba;

use crate::{
    canvas::Color,
    math::{Clamp, Float},
};

/// Convert a single linear channel to 8 bits: scale, clamp to `[0, 255]`, then truncate. NaN
/// becomes zero.
#[inline]
pub fn channel(value: Float) -> u8 {
    (value * 255.0).clamp_to(0.0, 255.0) as u8
}

/// Convert a linear color to an opaque 8-bit pixel. No gamma correction is applied.
pub fn to_rgba(color: &Color) -> Rgba<u8> {
    Rgba([channel(color.x), channel(color.y), channel(color.z), 255])
}

/// Luminance of a linear color, used for previews.
pub fn grayscale(color: &Color) -> Float {
    0.3 * color.x + 0.59 * color.y + 0.11 * color.z
}
