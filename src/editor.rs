//! Pixel editor page.
//!
//! The editor owns one [`EditorState`]; every interaction is an
//! [`EditorAction`] fed to [`EditorState::handle`], which returns the next
//! state together with the canvas drawing to show for it.

use image::DynamicImage;

use crate::config::{AppConfig, ImageLimits};
use crate::error::{Error, Result};
use crate::image::{ImageSource, encode_png};
use crate::pixel::{
    CanvasDrawing, GridSize, PixelGrid, Rgb, Shape, pixelate_source, project_grid, reduce_shapes,
};

pub const WELCOME_MESSAGE: &str = "Welcome! Use the controls to start your pixel art.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Draw,
    Eraser,
}

impl Tool {
    pub const ALL: [Self; 2] = [Self::Draw, Self::Eraser];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Draw => "Draw",
            Self::Eraser => "Eraser",
        }
    }

    /// Color the canvas paints with for this tool.
    pub const fn brush(self, picked: Rgb) -> Rgb {
        match self {
            Self::Draw => picked,
            Self::Eraser => Rgb::WHITE,
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Draw => "Drew",
            Self::Eraser => "Erased",
        }
    }
}

/// Fixed parameters the editor handlers need from the configuration.
#[derive(Debug, Clone)]
pub struct EditorContext {
    pub display_size: f64,
    pub grid_stroke: Rgb,
    pub limits: ImageLimits,
}

impl EditorContext {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            display_size: f64::from(cfg.editor.display_size()),
            grid_stroke: cfg.editor.grid_stroke(),
            limits: cfg.effective_image_limits(),
        }
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

#[derive(Debug, Clone)]
pub enum EditorAction {
    /// Switch to `size`, pixelating `import` if given, else starting blank.
    ApplySize {
        size: GridSize,
        import: Option<ImageSource>,
    },
    Reset,
    /// The canvas reported its current rectangle list.
    CanvasEdited { objects: Vec<Shape>, tool: Tool },
    /// Same as `CanvasEdited`, with the drawing still in JSON form.
    CanvasJson { json: String, tool: Tool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    grid: PixelGrid,
    message: String,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(GridSize::default())
    }
}

/// Result of one editor interaction.
#[derive(Debug)]
pub struct EditorUpdate {
    pub state: EditorState,
    /// Canvas contents for `state`.
    pub drawing: CanvasDrawing,
    /// Whether the grid differs from the one before the action.
    pub changed: bool,
    /// Set when the action failed; `state` is then the prior state with the
    /// error as its message.
    pub error: Option<Error>,
}

impl EditorState {
    pub fn new(size: GridSize) -> Self {
        Self {
            grid: PixelGrid::blank(size),
            message: WELCOME_MESSAGE.to_string(),
        }
    }

    pub const fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub const fn size(&self) -> GridSize {
        self.grid.size()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn drawing(&self, ctx: &EditorContext) -> CanvasDrawing {
        project_grid(&self.grid, ctx.display_size, ctx.grid_stroke)
    }

    pub fn handle(&self, action: EditorAction, ctx: &EditorContext) -> EditorUpdate {
        match self.try_handle(action, ctx) {
            Ok(state) => {
                let changed = state.grid != self.grid;
                let drawing = state.drawing(ctx);
                EditorUpdate {
                    state,
                    drawing,
                    changed,
                    error: None,
                }
            }
            Err(err) => {
                log::warn!("Editor action failed: {err}");
                let state = Self {
                    grid: self.grid.clone(),
                    message: format!("Error: {err}"),
                };
                let drawing = state.drawing(ctx);
                EditorUpdate {
                    state,
                    drawing,
                    changed: false,
                    error: Some(err),
                }
            }
        }
    }

    fn try_handle(&self, action: EditorAction, ctx: &EditorContext) -> Result<Self> {
        match action {
            EditorAction::ApplySize { size, import } => {
                let n = size.get();
                if let Some(source) = import {
                    let grid = pixelate_source(&source, &ctx.limits, size)?;
                    log::info!("Imported {} as {n}x{n} grid", source.display_name());
                    Ok(Self {
                        grid,
                        message: format!("Image imported and pixelated to {n}x{n}."),
                    })
                } else {
                    log::info!("New blank {n}x{n} grid");
                    Ok(Self {
                        grid: PixelGrid::blank(size),
                        message: format!("Created a blank {n}x{n} canvas."),
                    })
                }
            }
            EditorAction::Reset => Ok(Self {
                grid: PixelGrid::blank(self.size()),
                message: "Canvas reset to white!".to_string(),
            }),
            EditorAction::CanvasEdited { objects, tool } => self.apply_canvas(&objects, tool, ctx),
            EditorAction::CanvasJson { json, tool } => {
                let drawing = CanvasDrawing::from_json(&json)?;
                self.apply_canvas(&drawing.objects, tool, ctx)
            }
        }
    }

    fn apply_canvas(&self, objects: &[Shape], tool: Tool, ctx: &EditorContext) -> Result<Self> {
        if objects.is_empty() {
            return Ok(self.clone());
        }
        let grid = reduce_shapes(objects, self.size(), ctx.display_size)?;
        if grid == self.grid {
            return Ok(self.clone());
        }
        log::debug!("Canvas edit with {} objects changed the grid", objects.len());
        Ok(Self {
            grid,
            message: format!("{} pixel(s) on the canvas.", tool.verb()),
        })
    }

    pub fn export_png(&self) -> Result<Vec<u8>> {
        encode_png(&DynamicImage::ImageRgb8(self.grid.to_rgb_image()))
    }

    pub fn export_file_name(&self) -> String {
        let n = self.size().get();
        format!("pixel_art_interactive_{n}x{n}.png")
    }
}
