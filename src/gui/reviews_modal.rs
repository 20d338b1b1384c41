use eframe::egui;

use crate::{
    core::models::{
        RatingSummary,
        ReviewsData,
    },
    gui::{
        modal::{
            Modal,
            ModalConfig,
        },
        stars::star_row,
        theme::Theme,
    },
    rating::StarRating,
};

#[derive(Debug, Clone, Default)]
pub enum ReviewsView {
    #[default]
    Loading,
    Loaded(ReviewsData),
    Failed(String),
}

pub struct ReviewsModal {
    modal: Modal<ReviewsView>,
    organism_name: Option<String>,
}

impl ReviewsModal {
    pub fn new() -> Self {
        let config = ModalConfig { resizable: true, max_height: Some(480.0), ..ModalConfig::default() };
        Self { modal: Modal::new("Reviews").with_config(config), organism_name: None }
    }

    pub fn open_loading(&mut self, organism_name: &str) {
        self.organism_name = Some(organism_name.to_string());
        self.modal.open_with(format!("Reviews · {organism_name}"), ReviewsView::Loading);
    }

    /// Results for an organism the user has since moved away from are ignored.
    pub fn set_result(&mut self, organism_name: &str, result: Result<ReviewsData, String>) {
        if !self.modal.is_open() || self.organism_name.as_deref() != Some(organism_name) {
            return;
        }
        *self.modal.data_mut() = match result {
            Ok(data) => ReviewsView::Loaded(data),
            Err(message) => ReviewsView::Failed(message),
        };
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) {
        self.modal.show(ctx, |ui, view| {
            match view {
                ReviewsView::Loading => {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new());
                        ui.label("Loading reviews...");
                    });
                }
                ReviewsView::Failed(message) => {
                    ui.colored_label(theme.error(ui.ctx()), message.as_str());
                }
                ReviewsView::Loaded(data) => Self::reviews(ui, data, theme),
            }

            ui.add_space(8.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| ui.button("Close").clicked())
                .inner
        });
    }

    fn reviews(ui: &mut egui::Ui, data: &ReviewsData, theme: &Theme) {
        if data.reviews.is_empty() {
            ui.label("No reviews yet.");
            return;
        }

        let summary = RatingSummary {
            average_rating: Some(data.average_rating),
            review_count: data.review_count,
            reviews_with_text: data.reviews.len() as u32,
        };
        star_row(ui, &StarRating::display(Some(&summary)), theme, 18.0);
        ui.separator();

        egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
            for review in &data.reviews {
                ui.horizontal(|ui| {
                    ui.strong(review.reviewer());
                    if let Some(date) = review.created_date() {
                        ui.small(date);
                    }
                });
                star_row(ui, &StarRating::single(review.rating), theme, 14.0);
                if let Some(text) = review.review.as_deref().filter(|t| !t.trim().is_empty()) {
                    ui.label(text);
                }
                ui.separator();
            }
        });
    }
}

impl Default for ReviewsModal {
    fn default() -> Self {
        Self::new()
    }
}
