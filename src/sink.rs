use std::io::{Seek, Write};
use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use log::info;

use crate::{canvas::Canvas, quantize};

/// Quantize every pixel of `canvas`, keeping its orientation.
pub fn to_image(canvas: &Canvas) -> RgbaImage {
    RgbaImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        canvas
            .get(x, y)
            .map_or_else(|| image::Rgba([0, 0, 0, 255]), quantize::to_rgba)
    })
}

/// Encode `canvas` as a PNG into `out`.
pub fn write_png<W: Write + Seek>(canvas: &Canvas, out: &mut W) -> Result<()> {
    to_image(canvas)
        .write_to(out, ImageFormat::Png)
        .context("failed to encode png")
}

/// Encode `canvas` as a PNG, and write it to `path`.
pub fn save_png(canvas: &Canvas, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    to_image(canvas)
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    info!(
        "wrote {}x{} image to `{}`",
        canvas.width(),
        canvas.height(),
        path.display()
    );
    Ok(())
}
