use eframe::egui;

use crate::gui::{
    modal::Modal,
    theme::Theme,
};

pub struct AboutModal {
    modal: Modal<()>,
}

impl AboutModal {
    pub fn new() -> Self {
        Self { modal: Modal::new("About") }
    }

    pub fn open(&mut self) {
        self.modal.open_with("About FloraFind", ());
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) {
        self.modal.show(ctx, |ui, _| {
            ui.label(theme.heading(ui.ctx(), concat!("FloraFind ", env!("CARGO_PKG_VERSION"))));
            ui.add_space(6.0);
            ui.label(
                "Browse natural resources associated with each clinical stage, check whether \
                 they occur in a country and rate the ones you have tried.",
            );
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("Occurrence data and images:");
                ui.hyperlink_to("GBIF", "https://www.gbif.org");
            });
            ui.small("Cached lookups expire after five minutes.");
            ui.add_space(8.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| ui.button("Close").clicked())
                .inner
        });
    }
}

impl Default for AboutModal {
    fn default() -> Self {
        Self::new()
    }
}
