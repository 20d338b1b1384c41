use eframe::egui;

use crate::{
    core::{
        countries,
        models::Stage,
    },
    gui::world_map::MapHandle,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopBarAction {
    SelectStage(Option<String>),
    SelectCountry(Option<String>),
    FindResources,
    ReloadStages,
    ShowAbout,
}

pub struct TopBar;

impl TopBar {
    pub fn show(
        ctx: &egui::Context,
        stages: &[Stage],
        selected_stage: Option<&str>,
        map: &MapHandle,
        busy: bool,
    ) -> Option<TopBarAction> {
        let mut action = None;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                egui::widgets::global_theme_preference_switch(ui);

                ui.menu_button("File", |ui| {
                    if ui.button("Reload Stages").clicked() {
                        action = Some(TopBarAction::ReloadStages);
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                if ui.button("About").clicked() {
                    action = Some(TopBarAction::ShowAbout);
                }

                ui.separator();

                if let Some(stage) = Self::stage_combo(ui, stages, selected_stage) {
                    action = Some(TopBarAction::SelectStage(stage));
                }

                if let Some(country) = Self::country_combo(ui, map) {
                    action = Some(TopBarAction::SelectCountry(country));
                }

                let can_search = selected_stage.is_some() && !busy;
                if ui
                    .add_enabled(can_search, egui::Button::new("Find Resources"))
                    .on_disabled_hover_text("Select a stage first")
                    .clicked()
                {
                    action = Some(TopBarAction::FindResources);
                }

                if busy {
                    ui.add(egui::Spinner::new());
                }
            });
        });

        action
    }

    /// Outer `Some` means the selection changed.
    fn stage_combo(ui: &mut egui::Ui, stages: &[Stage], selected: Option<&str>) -> Option<Option<String>> {
        let mut changed = None;
        let selected_text = selected
            .and_then(|id| stages.iter().find(|s| s.stage_id == id))
            .map(|s| s.stage_name.as_str())
            .unwrap_or("Select stage");

        egui::ComboBox::from_id_salt("stage_select").selected_text(selected_text).width(180.0).show_ui(ui, |ui| {
            if ui.selectable_label(selected.is_none(), "Select stage").clicked() && selected.is_some() {
                changed = Some(None);
            }
            for stage in stages {
                let is_selected = selected == Some(stage.stage_id.as_str());
                if ui.selectable_label(is_selected, &stage.stage_name).clicked() && !is_selected {
                    changed = Some(Some(stage.stage_id.clone()));
                }
            }
        });

        changed
    }

    fn country_combo(ui: &mut egui::Ui, map: &MapHandle) -> Option<Option<String>> {
        let mut changed = None;
        let selected = map.selected();
        let selected_text = selected.map(|c| c.name).unwrap_or("Any country");

        egui::ComboBox::from_id_salt("country_select").selected_text(selected_text).width(180.0).show_ui(ui, |ui| {
            if ui.selectable_label(selected.is_none(), "Any country").clicked() && selected.is_some() {
                changed = Some(None);
            }

            let mut all: Vec<_> = countries::all().iter().collect();
            all.sort_by_key(|c| c.name);
            for country in all {
                let is_selected = selected.map(|c| c.code) == Some(country.code);
                if ui.selectable_label(is_selected, country.name).clicked() && !is_selected {
                    changed = Some(Some(country.code.to_string()));
                }
            }
        });

        changed
    }
}
