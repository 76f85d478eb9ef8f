use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use crate::error::{Error, Result};

/// Encode as PNG. Anything that is not already 8-bit RGB is converted to it
/// first, so alpha is dropped rather than written out.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let rgb;
    let image = if matches!(image, DynamicImage::ImageRgb8(_)) {
        image
    } else {
        rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        &rgb
    };
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|err| Error::processing(format!("PNG encoding failed: {err}")))?;
    Ok(buf.into_inner())
}
