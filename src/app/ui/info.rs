use super::super::TofuApp;
use egui::{Color32, RichText};

impl TofuApp {
    pub(crate) fn ui_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(self.page.label())
                    .small()
                    .color(Color32::from_gray(180)),
            );
            ui.separator();
            ui.label(
                RichText::new(self.page_message())
                    .small()
                    .color(Color32::from_gray(200)),
            );
            if let Some(msg) = &self.last_status {
                ui.separator();
                ui.label(
                    RichText::new(msg.as_str())
                        .small()
                        .color(Color32::from_gray(160)),
                );
            }
        });
    }
}
