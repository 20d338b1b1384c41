use eframe::egui;

use crate::{
    core::structure::{
        structure_url,
        StructureSummary,
    },
    gui::{
        modal::Modal,
        theme::Theme,
    },
};

#[derive(Debug, Clone, Default)]
pub enum StructureState {
    #[default]
    Loading,
    Loaded(StructureSummary),
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct StructureView {
    pub file_name: String,
    pub url: String,
    pub state: StructureState,
}

pub struct StructureModal {
    modal: Modal<StructureView>,
}

impl StructureModal {
    pub fn new() -> Self {
        Self { modal: Modal::new("Structure") }
    }

    pub fn open_loading(&mut self, asset_url: &str, file_name: &str) {
        let view = StructureView {
            file_name: file_name.to_string(),
            url: structure_url(asset_url, file_name),
            state: StructureState::Loading,
        };
        self.modal.open_with(format!("Structure · {file_name}"), view);
    }

    pub fn set_result(&mut self, file_name: &str, result: Result<StructureSummary, String>) {
        let view = self.modal.data_mut();
        if view.file_name != file_name {
            return;
        }
        view.state = match result {
            Ok(summary) => StructureState::Loaded(summary),
            Err(message) => StructureState::Failed(message),
        };
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) {
        self.modal.show(ctx, |ui, view| {
            match &view.state {
                StructureState::Loading => {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new());
                        ui.label("Loading structure...");
                    });
                }
                StructureState::Failed(message) => {
                    ui.colored_label(theme.error(ui.ctx()), "Structure file unavailable");
                    ui.small(message.as_str());
                }
                StructureState::Loaded(summary) => {
                    if let Some(title) = &summary.title {
                        ui.label(theme.heading(ui.ctx(), title));
                    }
                    egui::Grid::new("structure_summary").num_columns(2).striped(true).show(ui, |ui| {
                        ui.label("Atoms");
                        ui.label(summary.atoms.to_string());
                        ui.end_row();
                        ui.label("Hetero atoms");
                        ui.label(summary.hetero_atoms.to_string());
                        ui.end_row();
                        ui.label("Connectivity");
                        ui.label(if summary.has_connect { "yes" } else { "no" });
                        ui.end_row();
                        ui.label("Size");
                        ui.label(format!("{:.1} KB", summary.size as f64 / 1024.0));
                        ui.end_row();
                    });
                }
            }

            ui.add_space(8.0);
            ui.hyperlink_to("Open PDB file", view.url.as_str());
            ui.add_space(8.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| ui.button("Close").clicked())
                .inner
        });
    }
}

impl Default for StructureModal {
    fn default() -> Self {
        Self::new()
    }
}
