//! Main egui/eframe application state and UI orchestration.

use crate::config::{AppConfig, ImageLimits};
use crate::editor::{EditorAction, EditorContext, EditorState, Tool};
use crate::image::ImageSource;
use crate::mixer::{MixerAction, MixerSettings, MixerState};
use crate::pixel::{CanvasDrawing, GridSize};
use egui::{Color32, Context, Key, TextureHandle};

use egui_file_dialog::{DialogState, FileDialog};
use std::path::{Path, PathBuf};

mod clipboard;
mod image_loader;
mod ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Mixer,
    Editor,
}

impl Page {
    const fn label(self) -> &'static str {
        match self {
            Self::Mixer => "Image Mixer",
            Self::Editor => "Pixel Editor",
        }
    }
}

#[derive(Debug)]
enum NativeDialog {
    OpenMixer(FileDialog),
    OpenImport(FileDialog),
    SavePng { dialog: FileDialog, bytes: Vec<u8> },
}

/// Textures for whatever the mixer page currently shows.
#[derive(Default)]
struct MixerView {
    original: Option<TextureHandle>,
    edited: Option<TextureHandle>,
    placeholder: Option<TextureHandle>,
    placeholder_warning: Option<String>,
}

/// Widget-side state of the editor page that is not part of [`EditorState`].
struct EditorUi {
    drawing: CanvasDrawing,
    brush: Color32,
    tool: Tool,
    pending_size: u32,
    import: Option<ImageSource>,
    last_painted: Option<(usize, usize)>,
}

/// Top-level application state for the TofuCat UI.
pub struct TofuApp {
    config: AppConfig,
    limits: ImageLimits,
    editor_ctx: EditorContext,
    page: Page,
    mixer: MixerState,
    mixer_view: MixerView,
    /// Rotation slider position; kept apart so 360 stays on the slider.
    rotation_degrees: u32,
    editor: EditorState,
    editor_ui: EditorUi,
    active_dialog: Option<NativeDialog>,
    last_image_dir: Option<PathBuf>,
    last_export_dir: Option<PathBuf>,
    last_status: Option<String>,
    side_open: bool,
}

impl TofuApp {
    pub fn new(ctx: &Context, config: AppConfig, initial_image: Option<&Path>) -> Self {
        let limits = config.effective_image_limits();
        let editor_ctx = EditorContext::from_config(&config);
        let editor = EditorState::new(config.editor.grid_size());
        let editor_ui = EditorUi {
            drawing: editor.drawing(&editor_ctx),
            brush: config.editor.brush_color32(),
            tool: Tool::Draw,
            pending_size: editor.size().get(),
            import: None,
            last_painted: None,
        };
        let mut app = Self {
            limits,
            editor_ctx,
            page: Page::Mixer,
            mixer: MixerState::default(),
            mixer_view: MixerView::default(),
            rotation_degrees: 0,
            editor,
            editor_ui,
            active_dialog: None,
            last_image_dir: None,
            last_export_dir: None,
            last_status: None,
            side_open: true,
            config,
        };
        app.load_placeholder(ctx);
        if let Some(path) = initial_image {
            app.upload_from_path(ctx, path.to_path_buf());
        }
        app
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.last_status = Some(msg.into());
    }

    fn page_message(&self) -> &str {
        match self.page {
            Page::Mixer => &self.mixer.message,
            Page::Editor => self.editor.message(),
        }
    }

    pub(crate) fn dispatch_mixer(&mut self, ctx: &Context, action: MixerAction) {
        let update = self.mixer.handle(action, &self.limits);
        self.mixer = update.state;
        if update.error.is_none() {
            self.refresh_mixer_textures(ctx);
        }
    }

    pub(crate) fn dispatch_editor(&mut self, action: EditorAction) {
        let update = self.editor.handle(action, &self.editor_ctx);
        if let Some(err) = &update.error
            && err.is_format()
        {
            self.set_status("Canvas left unchanged: the drawing could not be read.");
        }
        self.editor = update.state;
        self.editor_ui.drawing = update.drawing;
    }

    /// Apply the slider size, pixelating the chosen import if any. The slider
    /// follows the editor afterwards, so a rejected size does not linger.
    pub(crate) fn apply_pending_size(&mut self) {
        let size = GridSize::clamped(self.editor_ui.pending_size);
        let import = self.editor_ui.import.clone();
        self.dispatch_editor(EditorAction::ApplySize { size, import });
        self.editor_ui.pending_size = self.editor.size().get();
    }

    pub(crate) fn apply_mixer_settings(&mut self, ctx: &Context, settings: MixerSettings) {
        if settings != self.mixer.settings {
            self.dispatch_mixer(ctx, MixerAction::Settings(settings));
        }
    }

    /// Route an incoming image to whichever page is showing.
    pub(crate) fn accept_source(&mut self, ctx: &Context, source: ImageSource) {
        match self.page {
            Page::Mixer => self.dispatch_mixer(ctx, MixerAction::Upload(source)),
            Page::Editor => {
                self.set_status(format!(
                    "Import image set to {}. Press Apply to pixelate it.",
                    source.display_name()
                ));
                self.editor_ui.import = Some(source);
            }
        }
    }

    fn start_save_png(&mut self) {
        let (bytes, file_name) = match self.page {
            Page::Mixer => (
                self.mixer.export_png(),
                self.config.mixer.download_name().to_string(),
            ),
            Page::Editor => (self.editor.export_png(), self.editor.export_file_name()),
        };
        match bytes {
            Ok(bytes) => {
                let mut dialog = Self::make_save_dialog(
                    "Save PNG",
                    &file_name,
                    &["png"],
                    self.last_export_dir.as_deref(),
                );
                dialog.save_file();
                self.active_dialog = Some(NativeDialog::SavePng { dialog, bytes });
            }
            Err(err) => {
                log::warn!("PNG export failed: {err}");
                self.set_status(format!("Save failed: {err}"));
            }
        }
    }

    fn handle_hotkeys(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() || self.active_dialog.is_some() {
            return;
        }
        // Ctrl/Cmd + B: toggle side panel
        if ctx.input(|i| i.key_pressed(Key::B) && i.modifiers.command) {
            self.side_open = !self.side_open;
        }
        // Ctrl/Cmd + O: open image
        if ctx.input(|i| i.key_pressed(Key::O) && i.modifiers.command) {
            self.open_image_dialog();
        }
        // Ctrl/Cmd + V: paste image from clipboard
        if ctx.input(|i| i.key_pressed(Key::V) && i.modifiers.command) {
            self.paste_image_from_clipboard(ctx);
        }
        // Ctrl/Cmd + S: save current page as PNG
        if ctx.input(|i| i.key_pressed(Key::S) && i.modifiers.command) {
            self.start_save_png();
        }
    }

    fn update_dialog(&mut self, ctx: &Context) {
        let mut close_dialog = false;
        let mut picked_open: Option<(Page, PathBuf)> = None;
        let mut status: Option<String> = None;

        if let Some(dialog_state) = self.active_dialog.as_mut() {
            let (dialog, cancel_msg) = match dialog_state {
                NativeDialog::OpenMixer(dialog) | NativeDialog::OpenImport(dialog) => {
                    (dialog, "Open canceled.")
                }
                NativeDialog::SavePng { dialog, .. } => (dialog, "Save canceled."),
            };
            dialog.update(ctx);
            if let Some(path) = dialog.take_picked() {
                match dialog_state {
                    NativeDialog::OpenMixer(_) => picked_open = Some((Page::Mixer, path)),
                    NativeDialog::OpenImport(_) => picked_open = Some((Page::Editor, path)),
                    NativeDialog::SavePng { bytes, .. } => {
                        status = Some(match image_loader::write_png(&path, bytes) {
                            Ok(()) => {
                                log::info!("Saved PNG to {}", path.display());
                                self.last_export_dir = path.parent().map(Path::to_path_buf);
                                format!("Saved {}", path.display())
                            }
                            Err(err) => {
                                log::warn!("{err:#}");
                                format!("Save failed: {err:#}")
                            }
                        });
                    }
                }
                close_dialog = true;
            } else {
                match dialog.state() {
                    DialogState::Cancelled => {
                        status = Some(cancel_msg.to_string());
                        close_dialog = true;
                    }
                    DialogState::Closed => close_dialog = true,
                    _ => {}
                }
            }
        }

        if close_dialog {
            self.active_dialog = None;
        }
        if let Some(msg) = status {
            self.set_status(msg);
        }
        if let Some((page, path)) = picked_open {
            match page {
                Page::Mixer => self.upload_from_path(ctx, path),
                Page::Editor => self.import_from_path(path),
            }
        }
    }
}

impl eframe::App for TofuApp {
    // Required by eframe 0.34; all rendering happens in `update`, which the
    // framework still calls right before `ui` each frame.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_hotkeys(ctx);
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| self.ui_top(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.ui_status_bar(ui));
        egui::SidePanel::right("side")
            .resizable(true)
            .default_width(280.0)
            .show_animated(ctx, self.side_open, |ui| match self.page {
                Page::Mixer => self.ui_mixer_controls(ui),
                Page::Editor => self.ui_editor_controls(ui),
            });
        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Mixer => self.ui_mixer_view(ui),
            Page::Editor => self.ui_editor_canvas(ui),
        });

        self.update_dialog(ctx);
    }
}
