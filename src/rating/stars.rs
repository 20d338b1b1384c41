use crate::core::models::RatingSummary;

use super::MAX_RATING;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Display { average: f32, review_count: u32 },
    Interactive { value: u8, hover: u8 },
}

/// What a row of stars should show. Built once per render, then drawn by the GUI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRating {
    mode: Mode,
    max_rating: u8,
}

impl StarRating {
    pub fn display(summary: Option<&RatingSummary>) -> Self {
        let (average, review_count) = summary.map(|s| (s.average(), s.review_count)).unwrap_or((0.0, 0));
        Self { mode: Mode::Display { average, review_count }, max_rating: MAX_RATING }
    }

    /// One reviewer's score, shown without a review count.
    pub fn single(rating: u8) -> Self {
        Self { mode: Mode::Display { average: rating as f32, review_count: 0 }, max_rating: MAX_RATING }
    }

    pub fn interactive(value: u8) -> Self {
        Self { mode: Mode::Interactive { value, hover: 0 }, max_rating: MAX_RATING }
    }

    pub fn max_rating(mut self, max_rating: u8) -> Self {
        self.max_rating = max_rating.max(1);
        self
    }

    /// Star under the pointer; 0 clears the preview.
    pub fn hover(mut self, star: u8) -> Self {
        if let Mode::Interactive { value, .. } = self.mode {
            self.mode = Mode::Interactive { value, hover: star.min(self.max_rating) };
        }
        self
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.mode, Mode::Interactive { .. })
    }

    pub fn max(&self) -> u8 {
        self.max_rating
    }

    /// Nothing to draw but the "No ratings yet" text.
    pub fn is_unrated(&self) -> bool {
        matches!(self.mode, Mode::Display { average, .. } if average <= 0.0)
    }

    pub fn filled(&self) -> Vec<bool> {
        (1..=self.max_rating)
            .map(|star| match self.mode {
                Mode::Display { average, .. } => average >= star as f32,
                Mode::Interactive { value, hover } => {
                    let shown = if hover > 0 { hover } else { value };
                    shown >= star
                }
            })
            .collect()
    }

    pub fn caption(&self) -> Option<String> {
        match self.mode {
            Mode::Display { average, .. } if average <= 0.0 => Some("No ratings yet".to_string()),
            Mode::Display { average, review_count } => {
                let mut caption = format!("({:.1}/{})", average, self.max_rating);
                if review_count > 0 {
                    let plural = if review_count == 1 { "" } else { "s" };
                    caption.push_str(&format!(" • {review_count} review{plural}"));
                }
                Some(caption)
            }
            Mode::Interactive { value: 0, .. } => None,
            Mode::Interactive { value, .. } => {
                let plural = if value == 1 { "" } else { "s" };
                Some(format!("You selected: {value} star{plural}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(average: f32, count: u32) -> RatingSummary {
        RatingSummary { average_rating: Some(average), review_count: count, reviews_with_text: 0 }
    }

    #[test]
    fn display_without_ratings() {
        let stars = StarRating::display(None);
        assert!(stars.is_unrated());
        assert_eq!(stars.caption().as_deref(), Some("No ratings yet"));
    }

    #[test]
    fn display_captions_and_fill() {
        let stars = StarRating::display(Some(&summary(4.3, 3)));
        assert_eq!(stars.caption().as_deref(), Some("(4.3/5) • 3 reviews"));
        assert_eq!(stars.filled(), vec![true, true, true, true, false]);

        let single = StarRating::display(Some(&summary(5.0, 1)));
        assert_eq!(single.caption().as_deref(), Some("(5.0/5) • 1 review"));
    }

    #[test]
    fn single_review_has_no_count() {
        let stars = StarRating::single(3);
        assert_eq!(stars.caption().as_deref(), Some("(3.0/5)"));
        assert_eq!(stars.filled(), vec![true, true, true, false, false]);
    }

    #[test]
    fn interactive_prefers_hover() {
        let stars = StarRating::interactive(2).hover(4);
        assert!(stars.is_interactive());
        assert_eq!(stars.filled(), vec![true, true, true, true, false]);
        assert_eq!(stars.caption().as_deref(), Some("You selected: 2 stars"));

        assert_eq!(StarRating::interactive(0).caption(), None);
        assert_eq!(StarRating::interactive(1).caption().as_deref(), Some("You selected: 1 star"));
    }

    #[test]
    fn custom_scale() {
        let stars = StarRating::display(Some(&summary(2.0, 4))).max_rating(3);
        assert_eq!(stars.filled(), vec![true, true, false]);
        assert_eq!(stars.caption().as_deref(), Some("(2.0/3) • 4 reviews"));
    }
}
