use eframe::egui;

use crate::{
    gui::{
        stars::star_row,
        theme::Theme,
    },
    rating::{
        RatingFlow,
        RatingPhase,
        StarRating,
        MAX_REVIEW_CHARS,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingModalAction {
    Submit,
    Cancel,
}

/// Form for the organism the flow is open on; all state lives in [`RatingFlow`].
#[derive(Default)]
pub struct RatingModal {
    hover: u8,
}

impl RatingModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ctx: &egui::Context, flow: &mut RatingFlow, theme: &Theme) -> Option<RatingModalAction> {
        let title = flow.target()?.organism_name.clone();
        let submitting = flow.phase() == RatingPhase::Submitting;
        let mut action = None;

        let modal = egui::Modal::new(egui::Id::new("rating_modal")).show(ctx, |ui| {
            ui.set_width(420.0);
            ui.label(theme.heading(ui.ctx(), &format!("Rate {title}")));
            ui.add_space(8.0);

            ui.add_enabled_ui(!submitting, |ui| {
                let stars = StarRating::interactive(flow.draft().rating).hover(self.hover);
                let response = star_row(ui, &stars, theme, 26.0);
                self.hover = response.hovered.unwrap_or(0);
                if let Some(value) = response.clicked {
                    flow.set_rating(value);
                }

                ui.add_space(8.0);
                ui.label("Review (optional)");
                let draft = flow.draft_mut();
                ui.add(
                    egui::TextEdit::multiline(&mut draft.review)
                        .desired_width(f32::INFINITY)
                        .desired_rows(4)
                        .char_limit(MAX_REVIEW_CHARS)
                        .hint_text("Share your experience with this resource"),
                );
                ui.small(format!("{}/{}", draft.review.chars().count(), MAX_REVIEW_CHARS));

                ui.add_space(4.0);
                egui::Grid::new("rating_contact").num_columns(2).show(ui, |ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut draft.user_name);
                    ui.end_row();
                    ui.label("Email");
                    ui.text_edit_singleline(&mut draft.user_email);
                    ui.end_row();
                });
            });

            if let Some(notice) = flow.notice() {
                ui.add_space(6.0);
                ui.colored_label(theme.error(ui.ctx()), notice);
            }

            ui.add_space(12.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if submitting {
                    ui.add(egui::Spinner::new());
                    ui.label("Submitting...");
                    return;
                }
                if ui.button("Submit Rating").clicked() {
                    action = Some(RatingModalAction::Submit);
                }
                if ui.button("Cancel").clicked() {
                    action = Some(RatingModalAction::Cancel);
                }
            });
        });

        if action.is_none() && !submitting && modal.should_close() {
            action = Some(RatingModalAction::Cancel);
        }
        if action == Some(RatingModalAction::Cancel) {
            self.hover = 0;
        }

        action
    }
}
