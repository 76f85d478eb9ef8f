//! Pixel editor page UI: brush controls and the rectangle canvas.

use super::super::TofuApp;
use super::icons;
use crate::editor::{EditorAction, Tool};
use crate::image::ImageSource;
use crate::pixel::{GridSize, Rgb, Shape, cell_size};
use egui::{Color32, CornerRadius, Rect, Sense, Stroke, StrokeKind, Vec2};

fn shape_color(hex: Option<&str>) -> Color32 {
    hex.and_then(|hex| hex.parse().ok())
        .map_or(Color32::WHITE, Rgb::to_color32)
}

impl TofuApp {
    pub(crate) fn ui_editor_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Brush");
        ui.horizontal(|ui| {
            ui.label("Color:");
            ui.color_edit_button_srgba(&mut self.editor_ui.brush);
        });
        ui.horizontal(|ui| {
            for tool in Tool::ALL {
                ui.radio_value(&mut self.editor_ui.tool, tool, tool.label());
            }
        });
        ui.separator();

        ui.heading("Canvas");
        ui.add(
            egui::Slider::new(
                &mut self.editor_ui.pending_size,
                GridSize::MIN..=GridSize::MAX,
            )
            .step_by(f64::from(GridSize::STEP))
            .text("cells per side"),
        );

        ui.horizontal(|ui| {
            let import_label = self
                .editor_ui
                .import
                .as_ref()
                .map_or_else(|| "No image chosen".to_string(), ImageSource::display_name);
            ui.label(import_label);
            if ui
                .button(format!("{} Choose…", icons::ICON_OPEN))
                .on_hover_text("Pick an image to pixelate (Ctrl+O)")
                .clicked()
            {
                self.open_image_dialog();
            }
            if ui
                .add_enabled(
                    self.editor_ui.import.is_some(),
                    egui::Button::new(icons::ICON_CLEAR),
                )
                .on_hover_text("Forget the chosen image")
                .clicked()
            {
                self.editor_ui.import = None;
            }
        });

        if ui
            .button(format!("{} Apply Size / Import Image", icons::ICON_APPLY))
            .on_hover_text("Start a blank canvas, or pixelate the chosen image, at this size")
            .clicked()
        {
            self.apply_pending_size();
        }
        if ui
            .button(format!("{} Reset Canvas", icons::ICON_RESET))
            .clicked()
        {
            self.dispatch_editor(EditorAction::Reset);
        }
        ui.separator();

        if ui
            .button(format!("{} Save PNG…", icons::ICON_SAVE))
            .on_hover_text(format!("Save as {}", self.editor.export_file_name()))
            .clicked()
        {
            self.start_save_png();
        }

        ui.collapsing("Canvas JSON", |ui| {
            if ui
                .button("Copy drawing")
                .on_hover_text("Copy the canvas rectangles as JSON")
                .clicked()
            {
                match self.editor_ui.drawing.to_json() {
                    Ok(json) => {
                        ui.ctx().copy_text(json);
                        self.set_status("Canvas JSON copied to clipboard.");
                    }
                    Err(err) => self.set_status(format!("Copy failed: {err}")),
                }
            }
            if ui
                .button("Paste drawing")
                .on_hover_text("Replace the canvas with rectangles from clipboard JSON")
                .clicked()
            {
                self.paste_canvas_json();
            }
        });
    }

    pub(crate) fn ui_editor_canvas(&mut self, ui: &mut egui::Ui) {
        let display = self.editor_ctx.display_size;
        #[allow(clippy::cast_possible_truncation)]
        let side = display as f32;
        egui::ScrollArea::both().show(ui, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(Vec2::splat(side), Sense::click_and_drag());
            if ui.is_rect_visible(rect) {
                self.paint_drawing(ui, rect);
            }

            if response.clicked() || response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.paint_at(pos - rect.min);
                }
            } else {
                self.editor_ui.last_painted = None;
            }

            if let Some(pos) = response.hover_pos()
                && let Some(text) = self.describe_cell_at(pos - rect.min)
            {
                response.on_hover_text_at_pointer(text);
            }
        });
    }

    fn paint_drawing(&self, ui: &egui::Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, CornerRadius::ZERO, Color32::WHITE);
        for shape in self.editor_ui.drawing.objects.iter().filter(|s| s.is_rect()) {
            #[allow(clippy::cast_possible_truncation)]
            let cell = Rect::from_min_size(
                rect.min + Vec2::new(shape.left as f32, shape.top as f32),
                Vec2::new(shape.width as f32, shape.height as f32),
            );
            painter.rect_filled(cell, CornerRadius::ZERO, shape_color(shape.fill.as_deref()));
            if let Some(stroke) = shape.stroke.as_deref() {
                painter.rect_stroke(
                    cell,
                    CornerRadius::ZERO,
                    Stroke::new(1.0, shape_color(Some(stroke))),
                    StrokeKind::Inside,
                );
            }
        }
    }

    fn describe_cell_at(&self, local: Vec2) -> Option<String> {
        let size = self.editor.size();
        let display = self.editor_ctx.display_size;
        let probe = Shape::brush_rect(
            f64::from(local.x),
            f64::from(local.y),
            cell_size(size, display),
            Rgb::WHITE,
        );
        let (row, col) = probe.cell(size, display)?;
        let color = self.editor.grid().get(row, col)?;
        Some(format!("row {row}, col {col}: {color}"))
    }

    /// Drop one brush rectangle at `local` and hand the canvas to the editor.
    fn paint_at(&mut self, local: Vec2) {
        let size = self.editor.size();
        let display = self.editor_ctx.display_size;
        let brush = self
            .editor_ui
            .tool
            .brush(Rgb::from_color32(self.editor_ui.brush));
        let shape = Shape::brush_rect(
            f64::from(local.x),
            f64::from(local.y),
            cell_size(size, display),
            brush,
        );
        let Some(cell) = shape.cell(size, display) else {
            return;
        };
        if self.editor_ui.last_painted == Some(cell) {
            return;
        }
        self.editor_ui.last_painted = Some(cell);

        let mut objects = self.editor_ui.drawing.objects.clone();
        objects.push(shape);
        self.dispatch_editor(EditorAction::CanvasEdited {
            objects,
            tool: self.editor_ui.tool,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_fill_paints_white() {
        assert_eq!(shape_color(Some("#ff0000")), Color32::from_rgb(255, 0, 0));
        assert_eq!(shape_color(Some("red")), Color32::WHITE);
        assert_eq!(shape_color(None), Color32::WHITE);
    }
}
