use nalgebra::Vector3;

use crate::{
    math::{Clamp, Float},
    quantize,
};

/// Linear RGB, unbounded in both directions.
pub type Color = Vector3<Float>;

/// A buffer of linear color data, with the top-left being `(0,0)`. Pixels are stored row-major,
/// `x` selecting the column and `y` the row.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    buffer: Vec<Color>,
}

impl Canvas {
    /// Construct a new black [`Canvas`].
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            buffer: vec![Color::zeros(); size],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (self.width as usize) * (y as usize) + (x as usize)
    }

    /// Fetch a color in the [`Canvas`].
    pub fn get(&self, x: u32, y: u32) -> Option<&Color> {
        if x < self.width && y < self.height {
            Some(&self.buffer[self.index(x, y)])
        } else {
            None
        }
    }

    /// Mutate a color in the [`Canvas`].
    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut Color> {
        if x < self.width && y < self.height {
            let ix = self.index(x, y);
            Some(&mut self.buffer[ix])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> impl Iterator<Item = &Color> {
        self.buffer.iter()
    }

    /// Mutable access to the pixels, in row-major order.
    pub fn pixels_mut(&mut self) -> impl Iterator<Item = &mut Color> {
        self.buffer.iter_mut()
    }

    /// The rows of the image, from the top down.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.buffer.chunks(self.width.max(1) as usize)
    }

    /// Copy `chunk` into this canvas with its top-left corner at `(offset_x, offset_y)`. Anything
    /// that falls outside of this canvas is dropped.
    pub fn blit(&mut self, offset_x: u32, offset_y: u32, chunk: &Canvas) {
        if offset_x >= self.width || offset_y >= self.height {
            return;
        }

        let cols = chunk.width.min(self.width - offset_x) as usize;
        let rows = chunk.height.min(self.height - offset_y);

        for (row, src) in chunk.rows().take(rows as usize).enumerate() {
            let start = self.index(offset_x, offset_y + row as u32);
            self.buffer[start..start + cols].clone_from_slice(&src[..cols]);
        }
    }

    /// Return an ascii version of the [`Canvas`].
    pub fn to_ascii(&self) -> String {
        let mut buf = String::new();
        let palette = r#"$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\|()1{}[]?-_+~<>i!lI;:,"^`'. "#;
        let bytes = palette.as_bytes();
        let bound = (palette.len() - 1) as Float;

        for row in self.rows() {
            for col in row {
                let g = quantize::grayscale(col).clamp_to(0., 1.);
                let index = (g * bound) as usize;
                buf.push(bytes[index] as char);
            }
            buf.push('\n');
        }

        buf
    }
}
