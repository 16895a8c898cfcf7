pub mod canvas;
pub mod error;
pub mod field;
pub mod lighting;
pub mod math;
pub mod quantize;
pub mod render;
pub mod scene;
pub mod sink;

pub use canvas::{Canvas, Color};
pub use error::{Error, Result};
pub use field::{NormalField, Region, Tiling};
pub use lighting::Light;
pub use render::{render, Mode, RenderConfig};
pub use scene::{Scene, SceneBuilder};
