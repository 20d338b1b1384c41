use crate::gui::{
    about_modal::AboutModal,
    error_modal::ErrorModal,
    rating_modal::RatingModal,
    reviews_modal::ReviewsModal,
    structure_modal::StructureModal,
};

pub struct Modals {
    pub error: ErrorModal,
    pub rating: RatingModal,
    pub reviews: ReviewsModal,
    pub structure: StructureModal,
    pub about: AboutModal,
}

impl Default for Modals {
    fn default() -> Self {
        Self {
            error: ErrorModal::new(),
            rating: RatingModal::new(),
            reviews: ReviewsModal::new(),
            structure: StructureModal::new(),
            about: AboutModal::new(),
        }
    }
}
