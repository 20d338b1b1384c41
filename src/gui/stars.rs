use eframe::egui;

use crate::{
    gui::theme::Theme,
    rating::StarRating,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct StarResponse {
    pub clicked: Option<u8>,
    pub hovered: Option<u8>,
}

/// Draws a row of stars. Only interactive ratings report clicks and hovers.
pub fn star_row(ui: &mut egui::Ui, stars: &StarRating, theme: &Theme, size: f32) -> StarResponse {
    let mut response = StarResponse::default();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 1.0;

        if !stars.is_unrated() {
            for (index, filled) in stars.filled().into_iter().enumerate() {
                let color = if filled { theme.star(ui.ctx()) } else { theme.star_empty(ui.ctx()) };
                let glyph = egui::RichText::new(if filled { "★" } else { "☆" }).size(size).color(color);

                if stars.is_interactive() {
                    let star = ui.add(egui::Label::new(glyph).sense(egui::Sense::click()));
                    let value = index as u8 + 1;
                    if star.hovered() {
                        response.hovered = Some(value);
                    }
                    if star.clicked() {
                        response.clicked = Some(value);
                    }
                } else {
                    ui.label(glyph);
                }
            }
        }

        if let Some(caption) = stars.caption() {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(caption).small().color(theme.muted(ui.ctx())));
        }
    });

    response
}
