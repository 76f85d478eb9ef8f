pub mod enhance;
mod export;
mod filters;
mod load;
mod meta;
mod transform;

pub use export::encode_png;
pub use filters::{FilterKind, apply_filter};
pub use load::{ImageSource, decode_image_from_path};
pub use meta::{describe_aspect_ratio, human_readable_bytes};
pub use transform::{Rotation, flip_horizontal, flip_vertical, rotate};
