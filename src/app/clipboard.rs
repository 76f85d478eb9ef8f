use super::TofuApp;
use crate::config::ImageLimits;
use crate::editor::EditorAction;
use crate::image::{ImageSource, human_readable_bytes};
use arboard::{Clipboard, Error as ClipboardError};
use egui::Context;
use image::RgbaImage;

const CLIPBOARD_NAME: &str = "clipboard image";

#[derive(Debug)]
struct ValidatedClipboardSize {
    width: u32,
    height: u32,
    expected_len: usize,
}

impl TofuApp {
    pub(crate) fn paste_image_from_clipboard(&mut self, ctx: &Context) {
        match capture_clipboard_image(&self.limits) {
            Ok(source) => {
                log::info!("Pasted {} bytes of RGBA from clipboard", source.byte_len());
                self.accept_source(ctx, source);
            }
            Err(err) => {
                log::warn!("{err}");
                self.set_status(err);
            }
        }
    }

    pub(crate) fn paste_canvas_json(&mut self) {
        let text = Clipboard::new().and_then(|mut clipboard| clipboard.get_text());
        match text {
            Ok(json) => self.dispatch_editor(EditorAction::CanvasJson {
                json,
                tool: self.editor_ui.tool,
            }),
            Err(ClipboardError::ContentNotAvailable) => {
                self.set_status("Paste failed: clipboard does not contain text.");
            }
            Err(err) => {
                let msg = format_clipboard_error(err);
                log::warn!("{msg}");
                self.set_status(msg);
            }
        }
    }
}

fn capture_clipboard_image(limits: &ImageLimits) -> Result<ImageSource, String> {
    let mut clipboard = Clipboard::new().map_err(format_clipboard_error)?;
    let data = clipboard.get_image().map_err(format_clipboard_error)?;
    let size = validate_clipboard_image(limits, data.width, data.height)?;
    let mut bytes = data.bytes.into_owned();
    if bytes.len() < size.expected_len {
        return Err("Paste failed: clipboard image data is truncated.".to_string());
    }
    bytes.truncate(size.expected_len);
    let image = RgbaImage::from_raw(size.width, size.height, bytes)
        .ok_or_else(|| "Paste failed: clipboard image has an unexpected layout.".to_string())?;
    Ok(ImageSource::from_pixels(Some(CLIPBOARD_NAME), image))
}

fn validate_clipboard_image(
    limits: &ImageLimits,
    width: usize,
    height: usize,
) -> Result<ValidatedClipboardSize, String> {
    if width == 0 || height == 0 {
        return Err("Paste failed: clipboard image is empty.".to_string());
    }
    let width_u32 = u32::try_from(width).unwrap_or(u32::MAX);
    let height_u32 = u32::try_from(height).unwrap_or(u32::MAX);
    if width_u32 > limits.image_dim || height_u32 > limits.image_dim {
        return Err(format!(
            "Paste failed: clipboard image {width}x{height} exceeds the per-side limit ({} px).",
            limits.image_dim
        ));
    }

    let total_pixels = u64::from(width_u32) * u64::from(height_u32);
    if total_pixels > limits.total_pixels {
        return Err(format!(
            "Paste failed: clipboard image too large: {width}x{height} (~{} MP) exceeds limit (~{} MP).",
            total_pixels / 1_000_000,
            limits.total_pixels / 1_000_000
        ));
    }

    let rgba_bytes = total_pixels * 4;
    if rgba_bytes > limits.alloc_bytes {
        return Err(format!(
            "Paste failed: clipboard image needs about {} of RGBA data, over the configured limit ({}).",
            human_readable_bytes(rgba_bytes),
            human_readable_bytes(limits.alloc_bytes)
        ));
    }

    let expected_len = usize::try_from(rgba_bytes).map_err(|_| {
        "Paste failed: clipboard image does not fit in available memory.".to_string()
    })?;

    Ok(ValidatedClipboardSize {
        width: width_u32,
        height: height_u32,
        expected_len,
    })
}

fn format_clipboard_error(err: ClipboardError) -> String {
    match err {
        ClipboardError::ContentNotAvailable => {
            "Paste failed: clipboard does not contain an image.".to_string()
        }
        ClipboardError::ClipboardNotSupported => {
            "Paste failed: clipboard access is not supported in this environment.".to_string()
        }
        ClipboardError::ClipboardOccupied => {
            "Paste failed: clipboard is busy; try again in a moment.".to_string()
        }
        ClipboardError::ConversionFailure => {
            "Paste failed: clipboard image could not be converted.".to_string()
        }
        ClipboardError::Unknown { description } => {
            format!("Paste failed: {description}")
        }
        _ => {
            format!("Paste failed: {err}")
        }
    }
}
