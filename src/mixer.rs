//! Mixer page: filter, enhance and transform a single uploaded image.

use image::{DynamicImage, RgbaImage};

use crate::config::ImageLimits;
use crate::error::{Error, Result};
use crate::image::{
    FilterKind, ImageSource, Rotation, apply_filter, encode_png, enhance, flip_horizontal,
    flip_vertical, rotate,
};

/// Every control on the mixer page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerSettings {
    pub filter: FilterKind,
    pub brightness: f32,
    pub color: f32,
    pub contrast: f32,
    pub rotation: Rotation,
    pub mirror: bool,
    pub flip: bool,
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self {
            filter: FilterKind::None,
            brightness: 1.0,
            color: 1.0,
            contrast: 1.0,
            rotation: Rotation::None,
            mirror: false,
            flip: false,
        }
    }
}

impl MixerSettings {
    fn check_factor(name: &str, value: f32) -> Result<()> {
        if value.is_finite() && (enhance::MIN_FACTOR..=enhance::MAX_FACTOR).contains(&value) {
            Ok(())
        } else {
            Err(Error::processing(format!(
                "{name} factor {value} is outside {}..={}",
                enhance::MIN_FACTOR,
                enhance::MAX_FACTOR
            )))
        }
    }

    fn validate(&self) -> Result<()> {
        Self::check_factor("brightness", self.brightness)?;
        Self::check_factor("color", self.color)?;
        Self::check_factor("contrast", self.contrast)
    }
}

/// Run the full pipeline: filter, brightness, color, contrast, rotation,
/// mirror, flip. Stage order matters; nothing is returned on failure.
pub fn process_image(image: &RgbaImage, settings: &MixerSettings) -> Result<RgbaImage> {
    settings.validate()?;
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::processing("image has no pixels"));
    }
    let mut out = apply_filter(image, settings.filter);
    out = enhance::brightness(&out, settings.brightness);
    out = enhance::color(&out, settings.color);
    out = enhance::contrast(&out, settings.contrast);
    out = rotate(&out, settings.rotation);
    if settings.mirror {
        out = flip_horizontal(&out);
    }
    if settings.flip {
        out = flip_vertical(&out);
    }
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub name: String,
    pub byte_len: usize,
    pub image: RgbaImage,
}

#[derive(Debug, Clone)]
pub enum MixerAction {
    Upload(ImageSource),
    Settings(MixerSettings),
    Clear,
}

#[derive(Debug, Clone)]
pub struct MixerState {
    pub original: Option<LoadedSource>,
    pub edited: Option<RgbaImage>,
    pub settings: MixerSettings,
    pub message: String,
}

impl Default for MixerState {
    fn default() -> Self {
        Self {
            original: None,
            edited: None,
            settings: MixerSettings::default(),
            message: NO_UPLOAD_MESSAGE.to_string(),
        }
    }
}

pub const NO_UPLOAD_MESSAGE: &str =
    "Upload an image using the side panel to start mixing and matching!";

/// Result of one mixer interaction. On failure `state` is the previous state
/// with only its message replaced.
#[derive(Debug)]
pub struct MixerUpdate {
    pub state: MixerState,
    pub error: Option<Error>,
}

impl MixerState {
    pub fn handle(&self, action: MixerAction, limits: &ImageLimits) -> MixerUpdate {
        match self.try_handle(action, limits) {
            Ok(state) => MixerUpdate { state, error: None },
            Err(err) => {
                log::warn!("Mixer action failed: {err}");
                let mut state = self.clone();
                state.message =
                    format!("Whoops! Something went wrong while processing the image: {err}");
                MixerUpdate {
                    state,
                    error: Some(err),
                }
            }
        }
    }

    fn try_handle(&self, action: MixerAction, limits: &ImageLimits) -> Result<Self> {
        match action {
            MixerAction::Upload(source) => {
                let image = source.decode(limits)?.to_rgba8();
                let edited = process_image(&image, &self.settings)?;
                let name = source.display_name();
                log::info!("Mixer loaded {name} ({}x{})", image.width(), image.height());
                Ok(Self {
                    message: format!("Loaded {name}"),
                    original: Some(LoadedSource {
                        name,
                        byte_len: source.byte_len(),
                        image,
                    }),
                    edited: Some(edited),
                    settings: self.settings,
                })
            }
            MixerAction::Settings(settings) => {
                let edited = match &self.original {
                    Some(src) => Some(process_image(&src.image, &settings)?),
                    None => None,
                };
                log::debug!("Mixer settings changed: {settings:?}");
                Ok(Self {
                    original: self.original.clone(),
                    edited,
                    settings,
                    message: self.edited_label(settings),
                })
            }
            MixerAction::Clear => Ok(Self {
                settings: self.settings,
                ..Self::default()
            }),
        }
    }

    fn edited_label(&self, settings: MixerSettings) -> String {
        if self.original.is_some() {
            format!("Edited ({})", settings.filter.label())
        } else {
            NO_UPLOAD_MESSAGE.to_string()
        }
    }

    pub fn export_png(&self) -> Result<Vec<u8>> {
        let edited = self
            .edited
            .as_ref()
            .ok_or_else(|| Error::processing("nothing to export yet"))?;
        encode_png(&DynamicImage::ImageRgba8(edited.clone()))
    }
}
