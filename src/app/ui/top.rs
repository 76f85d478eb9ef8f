use super::super::{Page, TofuApp};
use super::icons;

impl TofuApp {
    pub(crate) fn ui_top(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            // Use egui's built-in theme toggle so icon matches current mode.
            egui::widgets::global_theme_preference_switch(ui);
            ui.separator();

            self.ui_file_menu(ui);
            ui.separator();

            for page in [Page::Mixer, Page::Editor] {
                ui.selectable_value(&mut self.page, page, page.label());
            }
            ui.separator();

            let side_label = if self.side_open {
                "Hide side"
            } else {
                "Show side"
            };
            if ui
                .add(
                    egui::Button::new(format!("{} {side_label}", icons::ICON_SIDE_TOGGLE))
                        .shortcut_text("Ctrl+B"),
                )
                .on_hover_text("Toggle the controls panel (Ctrl+B)")
                .clicked()
            {
                self.side_open = !self.side_open;
            }
        });
    }

    fn ui_file_menu(&mut self, ui: &mut egui::Ui) {
        let open_hint = match self.page {
            Page::Mixer => "Open an image to mix (Ctrl+O). You can also drag & drop it.",
            Page::Editor => "Choose an image to pixelate (Ctrl+O). You can also drag & drop it.",
        };
        ui.menu_button(format!("{} File", icons::ICON_MENU), |ui| {
            if ui
                .add(egui::Button::new("Open image…").shortcut_text("Ctrl+O"))
                .on_hover_text(open_hint)
                .clicked()
            {
                self.open_image_dialog();
                ui.close();
            }

            if ui
                .add(egui::Button::new("Paste image").shortcut_text("Ctrl+V"))
                .on_hover_text("Paste image from clipboard (Ctrl+V)")
                .clicked()
            {
                self.paste_image_from_clipboard(ui.ctx());
                ui.close();
            }

            ui.separator();

            if ui
                .add(egui::Button::new("Save PNG…").shortcut_text("Ctrl+S"))
                .on_hover_text("Save the current page as a PNG (Ctrl+S)")
                .clicked()
            {
                self.start_save_png();
                ui.close();
            }
        });
    }
}
