//! Country picker grouped by continent, standing in for the interactive map.
//!
//! The app owns a [`MapHandle`]; the top bar and the panel both go through it,
//! so a selection made in one place is reflected in the other.

use eframe::egui;

use crate::{
    core::countries::{
        self,
        Country,
    },
    gui::theme::Theme,
};

#[derive(Debug, Default)]
pub struct MapHandle {
    selected: Option<&'static Country>,
    pending_focus: bool,
}

impl MapHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&'static Country> {
        self.selected
    }

    pub fn selected_code(&self) -> Option<String> {
        self.selected.map(|c| c.code.to_string())
    }

    /// Selects `code` and scrolls the panel to it on the next frame.
    /// Unknown codes leave the current selection alone.
    pub fn focus(&mut self, code: &str) -> bool {
        match countries::find(code) {
            Some(country) => {
                self.selected = Some(country);
                self.pending_focus = true;
                true
            }
            None => {
                tracing::warn!(code, "Ignoring unknown country code");
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.pending_focus = false;
    }

    fn take_focus(&mut self) -> bool {
        std::mem::take(&mut self.pending_focus)
    }
}

pub struct WorldMap;

impl WorldMap {
    /// Returns the newly picked country code, if the user clicked one.
    pub fn show(ctx: &egui::Context, map: &mut MapHandle, theme: &Theme) -> Option<String> {
        let mut picked = None;
        let scroll_to = map.take_focus();
        let selected_code = map.selected().map(|c| c.code);

        egui::SidePanel::left("world_map").resizable(true).default_width(220.0).show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(theme.heading(ui.ctx(), "Countries"));
            match map.selected() {
                Some(country) => ui.small(format!("{} · {}", country.name, country.continent)),
                None => ui.small("Pick a country to check local occurrence"),
            };
            ui.separator();

            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                for (continent, members) in countries::by_continent() {
                    let contains_selected = members.iter().any(|c| Some(c.code) == selected_code);

                    egui::CollapsingHeader::new(continent)
                        .id_salt(("continent", continent))
                        .open(if scroll_to && contains_selected { Some(true) } else { None })
                        .show(ui, |ui| {
                            for country in members {
                                let is_selected = Some(country.code) == selected_code;
                                let label = ui.selectable_label(is_selected, country.name);
                                if is_selected && scroll_to {
                                    label.scroll_to_me(Some(egui::Align::Center));
                                }
                                if label.clicked() && !is_selected {
                                    picked = Some(country.code.to_string());
                                }
                            }
                        });
                }
            });
        });

        if let Some(code) = &picked {
            map.focus(code);
        }
        picked
    }
}
