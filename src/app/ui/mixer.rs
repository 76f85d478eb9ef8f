//! Mixer page UI: pipeline controls and the side-by-side preview.

use super::super::TofuApp;
use super::icons;
use crate::image::{FilterKind, Rotation, describe_aspect_ratio, human_readable_bytes};
use crate::mixer::{MixerAction, MixerSettings};
use egui::{Color32, RichText, TextureHandle, Vec2};

/// Scale `size` down to fit `available`, keeping its aspect ratio.
fn fit_size(size: Vec2, available: Vec2) -> Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return size;
    }
    let scale = (available.x / size.x).min(available.y / size.y).min(1.0);
    size * scale.max(0.0)
}

fn show_texture(ui: &mut egui::Ui, title: &str, texture: &TextureHandle) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(title).strong());
        let size = fit_size(texture.size_vec2(), ui.available_size());
        ui.add(egui::Image::new((texture.id(), size)));
    });
}

impl TofuApp {
    pub(crate) fn ui_mixer_controls(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        ui.heading("Upload");
        ui.horizontal(|ui| {
            if ui
                .button(format!("{} Open…", icons::ICON_OPEN))
                .on_hover_text("Open an image (Ctrl+O)")
                .clicked()
            {
                self.open_image_dialog();
            }
            if ui
                .button(format!("{} Paste", icons::ICON_PASTE))
                .on_hover_text("Paste image from clipboard (Ctrl+V)")
                .clicked()
            {
                self.paste_image_from_clipboard(&ctx);
            }
            if ui
                .add_enabled(
                    self.mixer.original.is_some(),
                    egui::Button::new(format!("{} Clear", icons::ICON_CLEAR)),
                )
                .clicked()
            {
                self.dispatch_mixer(&ctx, MixerAction::Clear);
            }
        });
        if let Some(src) = &self.mixer.original {
            let (w, h) = src.image.dimensions();
            ui.label(RichText::new(src.name.as_str()).strong());
            ui.label(format!(
                "{w}×{h} ({})",
                describe_aspect_ratio(w, h).unwrap_or_default()
            ));
            ui.label(human_readable_bytes(
                u64::try_from(src.byte_len).unwrap_or(u64::MAX),
            ));
        }
        ui.separator();

        let mut settings = self.mixer.settings;

        ui.heading("Filter");
        egui::ComboBox::from_id_salt("mixer_filter_combo")
            .selected_text(settings.filter.label())
            .show_ui(ui, |ui| {
                for filter in FilterKind::ALL {
                    ui.selectable_value(&mut settings.filter, filter, filter.label());
                }
            });
        ui.add_space(4.0);

        ui.heading("Enhance");
        ui.spacing_mut().slider_width = 160.0;
        for (label, value) in [
            ("Brightness", &mut settings.brightness),
            ("Color", &mut settings.color),
            ("Contrast", &mut settings.contrast),
        ] {
            ui.add(
                egui::Slider::new(value, 0.0..=3.0)
                    .step_by(0.1)
                    .fixed_decimals(1)
                    .text(label),
            );
        }
        ui.add_space(4.0);

        ui.heading("Transform");
        ui.add(
            egui::Slider::new(&mut self.rotation_degrees, 0..=360)
                .step_by(90.0)
                .suffix("°")
                .text("Rotate"),
        )
        .on_hover_text("Counter-clockwise, canvas grows to fit");
        settings.rotation =
            Rotation::from_degrees(self.rotation_degrees).unwrap_or(settings.rotation);
        ui.checkbox(&mut settings.mirror, "Mirror");
        ui.checkbox(&mut settings.flip, "Flip");

        if ui.button(format!("{} Reset controls", icons::ICON_RESET)).clicked() {
            settings = MixerSettings::default();
            self.rotation_degrees = settings.rotation.degrees();
        }

        self.apply_mixer_settings(&ctx, settings);
        ui.separator();

        if ui
            .add_enabled(
                self.mixer.edited.is_some(),
                egui::Button::new(format!("{} Save PNG…", icons::ICON_SAVE)),
            )
            .on_hover_text(format!(
                "Save the edited image as {}",
                self.config.mixer.download_name()
            ))
            .clicked()
        {
            self.start_save_png();
        }
    }

    pub(crate) fn ui_mixer_view(&self, ui: &mut egui::Ui) {
        match (&self.mixer_view.original, &self.mixer_view.edited) {
            (Some(original), Some(edited)) => {
                ui.columns(2, |cols| {
                    show_texture(&mut cols[0], "Original", original);
                    show_texture(&mut cols[1], "Edited", edited);
                });
            }
            _ => {
                ui.vertical_centered(|ui| {
                    ui.add_space(12.0);
                    ui.label(self.mixer.message.as_str());
                    ui.add_space(8.0);
                    if let Some(placeholder) = &self.mixer_view.placeholder {
                        let size = fit_size(placeholder.size_vec2(), ui.available_size());
                        ui.add(egui::Image::new((placeholder.id(), size)));
                    } else if let Some(warning) = &self.mixer_view.placeholder_warning {
                        ui.label(
                            RichText::new(warning.as_str()).color(Color32::from_rgb(230, 180, 60)),
                        );
                    }
                });
            }
        }
    }
}
