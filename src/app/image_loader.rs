use super::{Page, TofuApp};
use crate::image::{ImageSource, decode_image_from_path};
use anyhow::Context as _;
use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use image::RgbaImage;
use std::path::{Path, PathBuf};

impl TofuApp {
    pub(crate) fn upload_from_path(&mut self, ctx: &Context, path: PathBuf) {
        self.remember_image_dir_from_path(&path);
        match read_image_source(&path) {
            Ok(source) => self.dispatch_mixer(ctx, crate::mixer::MixerAction::Upload(source)),
            Err(err) => {
                log::warn!("{err:#}");
                self.set_status(format!("Failed to open {}: {err:#}", path.display()));
            }
        }
    }

    pub(crate) fn import_from_path(&mut self, path: PathBuf) {
        self.remember_image_dir_from_path(&path);
        match read_image_source(&path) {
            Ok(source) => {
                self.set_status(format!(
                    "Import image set to {}. Press Apply to pixelate it.",
                    source.display_name()
                ));
                self.editor_ui.import = Some(source);
            }
            Err(err) => {
                log::warn!("{err:#}");
                self.set_status(format!("Failed to open {}: {err:#}", path.display()));
            }
        }
    }

    pub(crate) fn handle_dropped_files(&mut self, ctx: &Context) {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(f) = dropped_files.first() else {
            return;
        };
        log::debug!("Dropped file name='{}' path={:?}", f.name, f.path);
        if let Some(path) = &f.path {
            match self.page {
                Page::Mixer => self.upload_from_path(ctx, path.clone()),
                Page::Editor => self.import_from_path(path.clone()),
            }
        } else if let Some(bytes) = &f.bytes {
            let source = ImageSource::from_bytes(Some(f.name.as_str()), bytes.to_vec());
            self.accept_source(ctx, source);
        } else {
            self.set_status("Drop failed: no readable bytes/path");
        }
    }

    /// Show the configured placeholder on the mixer page, or remember why not.
    pub(crate) fn load_placeholder(&mut self, ctx: &Context) {
        let Some(configured) = self.config.mixer.placeholder_image.clone() else {
            return;
        };
        let Some(path) = resolve_placeholder(&configured) else {
            let msg = format!(
                "Placeholder image {} not found. Upload an image to start.",
                configured.display()
            );
            log::warn!("{msg}");
            self.mixer_view.placeholder_warning = Some(msg);
            return;
        };
        match decode_image_from_path(&self.limits, &path) {
            Ok(img) => {
                let texture = load_texture(ctx, "mixer_placeholder", &img.to_rgba8());
                self.mixer_view.placeholder = Some(texture);
                log::debug!("Loaded placeholder {}", path.display());
            }
            Err(err) => {
                let msg = format!("Placeholder image could not be loaded: {err:#}");
                log::warn!("{msg}");
                self.mixer_view.placeholder_warning = Some(msg);
            }
        }
    }

    pub(crate) fn refresh_mixer_textures(&mut self, ctx: &Context) {
        self.mixer_view.original = self
            .mixer
            .original
            .as_ref()
            .map(|src| load_texture(ctx, "mixer_original", &src.image));
        self.mixer_view.edited = self
            .mixer
            .edited
            .as_ref()
            .map(|img| load_texture(ctx, "mixer_edited", img));
    }

    pub(crate) fn remember_image_dir_from_path(&mut self, path: &Path) {
        let dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        self.last_image_dir = Some(dir);
    }
}

pub(crate) fn read_image_source(path: &Path) -> anyhow::Result<ImageSource> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path.file_name().and_then(|s| s.to_str());
    Ok(ImageSource::from_bytes(name, bytes))
}

pub(crate) fn write_png(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

/// Relative placeholder paths are tried against the working directory, then
/// next to the executable.
fn resolve_placeholder(configured: &Path) -> Option<PathBuf> {
    if configured.is_file() {
        return Some(configured.to_path_buf());
    }
    if configured.is_relative() {
        let exe = std::env::current_exe().ok()?;
        let candidate = exe.parent()?.join(configured);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

fn to_color_image(image: &RgbaImage) -> ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

fn load_texture(ctx: &Context, name: &str, image: &RgbaImage) -> TextureHandle {
    ctx.load_texture(name, to_color_image(image), TextureOptions::LINEAR)
}
