use crossbeam::{channel, thread};
use log::{debug, info};
use nalgebra::{Point2, Vector3};

use crate::{
    canvas::{Canvas, Color},
    math::Float,
    scene::Scene,
};

const TILE_SIZE: u32 = 16;

/// What to compute for each pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Lit, colored surface.
    #[default]
    Shaded,

    /// The surface normal, mapped from `[-1, 1]` to `[0, 1]` per channel.
    Normals,
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    threads: usize,
    mode: Mode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            threads: num_cpus::get(),
            mode: Mode::default(),
        }
    }
}

impl RenderConfig {
    pub fn new(threads: usize) -> Self {
        RenderConfig {
            threads: threads.max(1),
            mode: Mode::default(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// An individual tile in the rendering target.
#[derive(Debug, Clone, PartialEq)]
struct Tile {
    offset_x: u32,
    offset_y: u32,
    width: u32,
    height: u32,
}

/// An iterator for tiles in a rendering target.
#[derive(Debug)]
struct Tiles {
    width: u32,
    height: u32,
    chunks_x: u32,
    chunks_y: u32,
    x: u32,
    y: u32,
}

impl Tiles {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            chunks_x: (width + TILE_SIZE - 1) / TILE_SIZE,
            chunks_y: (height + TILE_SIZE - 1) / TILE_SIZE,
            x: 0,
            y: 0,
        }
    }

    fn total(&self) -> u32 {
        self.chunks_x * self.chunks_y
    }
}

impl Iterator for Tiles {
    type Item = Tile;

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.chunks_x {
            self.x = 0;
            self.y += 1;
        }

        if self.y >= self.chunks_y {
            return None;
        }

        let offset_x = self.x * TILE_SIZE;
        let offset_y = self.y * TILE_SIZE;

        self.x += 1;

        Some(Tile {
            offset_x,
            offset_y,
            width: (self.width - offset_x).min(TILE_SIZE),
            height: (self.height - offset_y).min(TILE_SIZE),
        })
    }
}

/// The color of the pixel at surface coordinate `p`.
pub fn pixel(scene: &Scene, mode: Mode, p: &Point2<Float>) -> Color {
    match mode {
        Mode::Shaded => scene.shade(p),
        Mode::Normals => (scene.normal(p).into_inner() + Vector3::repeat(1.)) * 0.5,
    }
}

fn render_tile(scene: &Scene, mode: Mode, tile: &Tile) -> Canvas {
    let mut chunk = Canvas::new(tile.width, tile.height);
    for (ix, value) in chunk.pixels_mut().enumerate() {
        let col = ix as u32 % tile.width;
        let row = ix as u32 / tile.width;
        let p = Point2::new(
            (tile.offset_x + col) as Float,
            (tile.offset_y + row) as Float,
        );
        *value = pixel(scene, mode, &p);
    }
    chunk
}

/// Render every pixel of the scene's canvas. Pixels are independent, so the canvas is split into
/// tiles that are shaded by `config.threads()` workers; the result does not depend on the number
/// of workers.
pub fn render(scene: &Scene, config: &RenderConfig) -> Canvas {
    let mut canvas = Canvas::new(scene.width_px(), scene.height_px());

    let tiles = Tiles::new(canvas.width(), canvas.height());
    let expecting = tiles.total() as usize;

    info!(
        "rendering {}x{} canvas ({} tiles, {} threads, {:?})",
        canvas.width(),
        canvas.height(),
        expecting,
        config.threads,
        config.mode,
    );

    let (input, queue) = channel::unbounded::<Tile>();
    let (results, chunks) = channel::unbounded();

    let outcome = thread::scope(|s| {
        for worker in 0..config.threads {
            let queue = queue.clone();
            let results = results.clone();
            let mode = config.mode;
            s.spawn(move |_| {
                for tile in queue {
                    debug!(
                        "worker {} shading tile at ({}, {})",
                        worker, tile.offset_x, tile.offset_y
                    );
                    let chunk = render_tile(scene, mode, &tile);
                    if results.send((tile.offset_x, tile.offset_y, chunk)).is_err() {
                        break;
                    }
                }
            });
        }

        // the workers hold the only remaining senders, so a failed worker ends the loop below
        drop(results);

        s.spawn(move |_| {
            for tile in tiles {
                if input.send(tile).is_err() {
                    break;
                }
            }
        });

        for (offset_x, offset_y, chunk) in chunks.iter().take(expecting) {
            canvas.blit(offset_x, offset_y, &chunk);
        }
    });

    if let Err(panic) = outcome {
        std::panic::resume_unwind(panic);
    }

    canvas
}
