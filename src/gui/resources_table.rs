use eframe::egui;
use egui_extras::{
    Column,
    TableBuilder,
};

use crate::{
    controller::{
        ListStatus,
        ListView,
    },
    core::{
        countries,
        models::EnrichedOrganism,
    },
    gui::{
        stars::star_row,
        theme::Theme,
    },
    rating::{
        RatingTarget,
        StarRating,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceAction {
    Rate(RatingTarget),
    Reviews { organism_id: u64, organism_name: String },
    Structure(String),
    Page(u32),
    Retry,
}

const LINE_HEIGHT: f32 = 22.0;

pub fn resources_panel(ctx: &egui::Context, view: ListView<'_>, theme: &Theme) -> Option<ResourceAction> {
    let mut action = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.label(theme.heading(ui.ctx(), "Resources"));
        ui.add_space(4.0);

        if view.stage.is_none() {
            ui.label("Select a clinical stage and press Find Resources.");
            return;
        }

        match &view.status {
            ListStatus::Idle => {
                ui.label("Press Find Resources to load organisms for this stage.");
                return;
            }
            ListStatus::Loading => {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Loading resources...");
                });
            }
            ListStatus::Failed(message) => {
                ui.horizontal(|ui| {
                    ui.colored_label(theme.error(ui.ctx()), format!("⚠ {message}"));
                    if ui.button("Retry").clicked() {
                        action = Some(ResourceAction::Retry);
                    }
                });
            }
            ListStatus::Ready => {}
        }

        if view.records.is_empty() {
            if view.status == ListStatus::Ready {
                ui.label("No resources found for this stage.");
            }
            return;
        }

        if let Some(page_action) = pagination_bar(ui, &view) {
            action = Some(page_action);
        }
        ui.separator();

        let country_name = view.country.and_then(countries::find).map(|c| c.name);
        if let Some(row_action) = resource_table(ui, view.records, country_name, theme) {
            action = Some(row_action);
        }
    });

    action
}

fn pagination_bar(ui: &mut egui::Ui, view: &ListView<'_>) -> Option<ResourceAction> {
    let pagination = view.pagination;
    let enabled = view.status != ListStatus::Loading;
    let mut action = None;

    ui.horizontal(|ui| {
        if let Some((start, end)) = pagination.showing_range() {
            ui.label(format!("Showing {start}-{end} of {}", pagination.total));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.add_enabled(enabled && pagination.has_next(), egui::Button::new("Next ▶")).clicked() {
                action = Some(ResourceAction::Page(pagination.page + 1));
            }
            ui.label(format!("Page {} of {}", pagination.page, pagination.total_pages.max(1)));
            if ui.add_enabled(enabled && pagination.has_previous(), egui::Button::new("◀ Previous")).clicked() {
                action = Some(ResourceAction::Page(pagination.page - 1));
            }
        });
    });

    action
}

fn row_height(record: &EnrichedOrganism) -> f32 {
    let compound_lines = record.organism.compound_protein_model.len().max(1);
    let lines = compound_lines.max(record.enrichment.images.len()).max(4);
    lines as f32 * LINE_HEIGHT + 8.0
}

fn resource_table(
    ui: &mut egui::Ui,
    records: &[EnrichedOrganism],
    country_name: Option<&str>,
    theme: &Theme,
) -> Option<ResourceAction> {
    let mut action = None;

    egui::ScrollArea::horizontal().show(ui, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::top_down(egui::Align::Min))
            .column(Column::auto().at_least(200.0))
            .column(Column::auto().at_least(160.0))
            .column(Column::auto().at_least(260.0))
            .column(Column::remainder().at_least(200.0))
            .header(24.0, |mut header| {
                for title in ["Organism", "Images", "Compounds / Proteins", "Rating"] {
                    header.col(|ui| {
                        ui.label(theme.heading(ui.ctx(), title));
                    });
                }
            })
            .body(|mut body| {
                for record in records {
                    body.row(row_height(record), |mut row| {
                        row.col(|ui| organism_cell(ui, record, country_name, theme));
                        row.col(|ui| images_cell(ui, record, theme));
                        row.col(|ui| {
                            if let Some(file) = compounds_cell(ui, record, theme) {
                                action = Some(ResourceAction::Structure(file));
                            }
                        });
                        row.col(|ui| {
                            if let Some(rating_action) = rating_cell(ui, record, theme) {
                                action = Some(rating_action);
                            }
                        });
                    });
                }
            });
    });

    action
}

fn organism_cell(ui: &mut egui::Ui, record: &EnrichedOrganism, country_name: Option<&str>, theme: &Theme) {
    ui.strong(record.name());
    ui.small(&record.enrichment.kingdom);

    if record.enrichment.common_names.is_empty() {
        ui.colored_label(theme.muted(ui.ctx()), "No common names found");
    } else {
        ui.label(record.enrichment.common_names.join(", "));
    }

    match country_name {
        Some(country) if record.enrichment.found => {
            ui.colored_label(theme.found(ui.ctx()), format!("✔ Found in {country}"));
        }
        Some(country) => {
            ui.colored_label(theme.not_found(ui.ctx()), format!("✖ Not recorded in {country}"));
        }
        None => {
            ui.small("Select a country to check occurrence");
        }
    }

    if !record.organism.food.trim().is_empty() {
        ui.small(format!("Food: {}", record.organism.food));
    }
}

fn images_cell(ui: &mut egui::Ui, record: &EnrichedOrganism, theme: &Theme) {
    if record.enrichment.images.is_empty() {
        ui.colored_label(theme.muted(ui.ctx()), "No images found");
        return;
    }

    for (index, url) in record.enrichment.images.iter().enumerate() {
        ui.hyperlink_to(format!("🖼 Image {}", index + 1), url);
    }
}

fn compounds_cell(ui: &mut egui::Ui, record: &EnrichedOrganism, theme: &Theme) -> Option<String> {
    let models = &record.organism.compound_protein_model;
    if models.is_empty() {
        ui.colored_label(theme.muted(ui.ctx()), "No compound data");
        return None;
    }

    let mut picked = None;
    for model in models {
        ui.horizontal(|ui| {
            ui.label(format!("{} → {}", model.compound, model.protein));
            if !model.pubchem_id.trim().is_empty() {
                ui.hyperlink_to(
                    "PubChem",
                    format!("https://pubchem.ncbi.nlm.nih.gov/compound/{}", model.pubchem_id.trim()),
                );
            }
            if model.has_structure() && ui.small_button("View structure").clicked() {
                picked = Some(model.model.clone());
            }
        });
    }
    picked
}

fn rating_cell(ui: &mut egui::Ui, record: &EnrichedOrganism, theme: &Theme) -> Option<ResourceAction> {
    let mut action = None;
    let stars = StarRating::display(record.enrichment.rating.as_ref());
    star_row(ui, &stars, theme, 16.0);

    ui.horizontal(|ui| {
        if ui.small_button("Rate").clicked() {
            action = Some(ResourceAction::Rate(RatingTarget {
                organism_id: record.id(),
                organism_name: record.name().to_string(),
            }));
        }
        if ui.small_button("Reviews").clicked() {
            action = Some(ResourceAction::Reviews {
                organism_id: record.id(),
                organism_name: record.name().to_string(),
            });
        }
    });

    action
}
