use crate::config::ImageLimits;
use crate::error::{Error, Result};
use anyhow::Context as _;
use image::{DynamicImage, GenericImageView, ImageReader, Limits, RgbaImage};
use std::io::{BufRead, Cursor, Read, Seek};
use std::path::Path;

/// Image handed to a page: either still encoded (file, drop) or raw pixels
/// (clipboard).
#[derive(Debug, Clone)]
pub enum ImageSource {
    Encoded {
        name: Option<String>,
        bytes: Vec<u8>,
    },
    Pixels {
        name: Option<String>,
        image: RgbaImage,
    },
}

impl ImageSource {
    pub fn from_bytes(name: Option<&str>, bytes: Vec<u8>) -> Self {
        Self::Encoded {
            name: name.filter(|s| !s.is_empty()).map(ToOwned::to_owned),
            bytes,
        }
    }

    pub fn from_pixels(name: Option<&str>, image: RgbaImage) -> Self {
        Self::Pixels {
            name: name.filter(|s| !s.is_empty()).map(ToOwned::to_owned),
            image,
        }
    }

    pub fn display_name(&self) -> String {
        let name = match self {
            Self::Encoded { name, .. } | Self::Pixels { name, .. } => name.as_deref(),
        };
        name.map_or_else(|| "unnamed image".to_string(), str::to_owned)
    }

    pub fn byte_len(&self) -> usize {
        match self {
            Self::Encoded { bytes, .. } => bytes.len(),
            Self::Pixels { image, .. } => image.as_raw().len(),
        }
    }

    /// Decode with the configured limits. Raw pixels are checked against the
    /// same limits so a huge clipboard image is rejected like a huge file.
    pub fn decode(&self, limits: &ImageLimits) -> Result<DynamicImage> {
        match self {
            Self::Encoded { bytes, .. } => {
                decode_image_from_bytes(limits, bytes).map_err(|err| Error::decode(&err))
            }
            Self::Pixels { image, .. } => {
                check_total_pixels(limits, image.width(), image.height())
                    .map_err(|err| Error::decode(&err))?;
                Ok(DynamicImage::ImageRgba8(image.clone()))
            }
        }
    }
}

fn decode_reader<R>(limits: &ImageLimits, mut reader: ImageReader<R>) -> anyhow::Result<DynamicImage>
where
    R: Read + Seek + BufRead,
{
    let il = limits.sanitized();
    let mut decode_limits = Limits::default();
    decode_limits.max_image_width = Some(il.image_dim);
    decode_limits.max_image_height = Some(il.image_dim);
    decode_limits.max_alloc = Some(il.alloc_bytes);
    reader.limits(decode_limits);
    let img = reader.decode().context("Failed to decode image data")?;

    let (w, h) = img.dimensions();
    check_total_pixels(&il, w, h)?;
    Ok(img)
}

fn check_total_pixels(limits: &ImageLimits, width: u32, height: u32) -> anyhow::Result<()> {
    let il = limits.sanitized();
    let total_pixels = u64::from(width) * u64::from(height);
    if total_pixels > il.total_pixels {
        anyhow::bail!(
            "Image too large: {}x{} (~{} MP) exceeds limit (~{} MP)",
            width,
            height,
            total_pixels / 1_000_000,
            il.total_pixels / 1_000_000
        );
    }
    if width > il.image_dim || height > il.image_dim {
        anyhow::bail!(
            "Image too large: {width}x{height} exceeds the per-side limit ({} px)",
            il.image_dim
        );
    }
    Ok(())
}

/// Load and decode an image from a filesystem path using configured limits.
pub fn decode_image_from_path(limits: &ImageLimits, path: &Path) -> anyhow::Result<DynamicImage> {
    let reader = ImageReader::open(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .with_guessed_format()
        .context("Failed to detect image format")?;
    decode_reader(limits, reader)
}

/// Load and decode an image from raw bytes using configured limits.
pub fn decode_image_from_bytes(limits: &ImageLimits, bytes: &[u8]) -> anyhow::Result<DynamicImage> {
    let cursor = Cursor::new(bytes);
    let reader = ImageReader::new(cursor)
        .with_guessed_format()
        .context("Failed to detect image format")?;
    decode_reader(limits, reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::encode_png;
    use image::Rgba;

    #[test]
    fn decodes_png_bytes() {
        let img = RgbaImage::from_pixel(5, 3, Rgba([1, 2, 3, 255]));
        let bytes = encode_png(&DynamicImage::ImageRgba8(img)).expect("encode");
        let source = ImageSource::from_bytes(Some("tiny.png"), bytes);
        let decoded = source.decode(&ImageLimits::default()).expect("decode");
        assert_eq!(decoded.dimensions(), (5, 3));
        assert_eq!(source.display_name(), "tiny.png");
    }

    #[test]
    fn garbage_is_decode_error() {
        let source = ImageSource::from_bytes(None, vec![0, 1, 2, 3, 4, 5]);
        let err = source.decode(&ImageLimits::default()).unwrap_err();
        assert!(matches!(err, Error::ImageDecode { .. }));
        assert_eq!(source.display_name(), "unnamed image");
    }

    #[test]
    fn oversized_pixels_are_rejected() {
        let limits = ImageLimits {
            image_dim: 64,
            ..ImageLimits::default()
        };
        let source = ImageSource::from_pixels(Some("clip"), RgbaImage::new(65, 1));
        assert!(source.decode(&limits).is_err());
        let source = ImageSource::from_pixels(Some("clip"), RgbaImage::new(64, 64));
        assert!(source.decode(&limits).is_ok());
    }

    #[test]
    fn missing_path_reports_file() {
        let path = std::env::temp_dir().join("tofucat_definitely_missing.png");
        let err = decode_image_from_path(&ImageLimits::default(), &path).unwrap_err();
        assert!(format!("{err:#}").contains("tofucat_definitely_missing.png"));
    }
}
