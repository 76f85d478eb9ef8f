mod color;
mod grid;
mod pixelate;
mod shapes;

pub use color::Rgb;
pub use grid::{GridSize, PixelGrid};
pub use pixelate::pixelate_source;
pub use shapes::{CanvasDrawing, Shape, cell_size, project_grid, reduce_shapes};
