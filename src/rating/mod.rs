mod stars;

pub use stars::StarRating;

use crate::core::{
    models::RatingSubmission,
    FloraError,
};

pub const MAX_RATING: u8 = 5;
pub const MAX_REVIEW_CHARS: usize = 1000;

pub const MISSING_RATING_PROMPT: &str = "Please select a rating before submitting.";
pub const SUBMIT_FAILED_NOTICE: &str = "Failed to submit rating. Please try again.";
pub const SUBMIT_OK_NOTICE: &str = "Rating submitted successfully!";

#[allow(async_fn_in_trait)]
pub trait RatingSink {
    async fn submit_rating(&self, organism_id: u64, submission: &RatingSubmission) -> Result<(), FloraError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingTarget {
    pub organism_id: u64,
    pub organism_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingDraft {
    pub rating: u8,
    pub review: String,
    pub user_name: String,
    pub user_email: String,
}

impl RatingDraft {
    fn to_submission(&self) -> RatingSubmission {
        RatingSubmission {
            rating: self.rating,
            review: self.review.trim().to_string(),
            user_name: self.user_name.trim().to_string(),
            user_email: self.user_email.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingPhase {
    Idle,
    Editing,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored; the current page should be reloaded.
    Reload,
    /// The backend refused or was unreachable; the draft is kept for another try.
    Retry,
    /// Blocked before any request was made.
    Rejected,
}

pub struct RatingFlow {
    phase: RatingPhase,
    target: Option<RatingTarget>,
    draft: RatingDraft,
    notice: Option<String>,
}

impl RatingFlow {
    pub fn new() -> Self {
        Self { phase: RatingPhase::Idle, target: None, draft: RatingDraft::default(), notice: None }
    }

    pub fn phase(&self) -> RatingPhase {
        self.phase
    }

    pub fn target(&self) -> Option<&RatingTarget> {
        self.target.as_ref()
    }

    pub fn draft(&self) -> &RatingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut RatingDraft {
        &mut self.draft
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn is_open(&self) -> bool {
        self.phase != RatingPhase::Idle
    }

    pub fn open(&mut self, target: RatingTarget) {
        self.phase = RatingPhase::Editing;
        self.target = Some(target);
        self.draft = RatingDraft::default();
        self.notice = None;
    }

    pub fn cancel(&mut self) {
        if self.phase == RatingPhase::Submitting {
            return;
        }
        self.phase = RatingPhase::Idle;
        self.target = None;
        self.draft = RatingDraft::default();
        self.notice = None;
    }

    pub fn set_rating(&mut self, rating: u8) {
        if self.phase == RatingPhase::Editing && rating <= MAX_RATING {
            self.draft.rating = rating;
        }
    }

    pub fn set_review(&mut self, review: impl Into<String>) {
        if self.phase == RatingPhase::Editing {
            self.draft.review = review.into();
        }
    }

    pub fn can_submit(&self) -> bool {
        self.phase == RatingPhase::Editing && (1..=MAX_RATING).contains(&self.draft.rating)
    }

    /// Validates the draft and moves to `Submitting`. On error nothing changes
    /// except the notice, and no request must be sent.
    pub fn begin_submit(&mut self) -> Result<(u64, RatingSubmission), FloraError> {
        let Some(target) = self.target.as_ref().filter(|_| self.phase == RatingPhase::Editing) else {
            return Err(FloraError::Validation("No rating form is open".to_string()));
        };

        if !(1..=MAX_RATING).contains(&self.draft.rating) {
            self.notice = Some(MISSING_RATING_PROMPT.to_string());
            return Err(FloraError::Validation(MISSING_RATING_PROMPT.to_string()));
        }

        if self.draft.review.chars().count() > MAX_REVIEW_CHARS {
            let message = format!("Review must be less than {MAX_REVIEW_CHARS} characters");
            self.notice = Some(message.clone());
            return Err(FloraError::Validation(message));
        }

        let organism_id = target.organism_id;
        self.phase = RatingPhase::Submitting;
        self.notice = None;
        Ok((organism_id, self.draft.to_submission()))
    }

    pub fn finish<E: std::fmt::Display>(&mut self, result: Result<(), E>) -> SubmitOutcome {
        if self.phase != RatingPhase::Submitting {
            return SubmitOutcome::Rejected;
        }

        match result {
            Ok(()) => {
                self.phase = RatingPhase::Idle;
                self.target = None;
                self.draft = RatingDraft::default();
                self.notice = Some(SUBMIT_OK_NOTICE.to_string());
                SubmitOutcome::Reload
            }
            Err(e) => {
                tracing::warn!("Error submitting rating: {}", e);
                self.phase = RatingPhase::Editing;
                self.notice = Some(SUBMIT_FAILED_NOTICE.to_string());
                SubmitOutcome::Retry
            }
        }
    }

    pub async fn submit<S: RatingSink>(&mut self, sink: &S) -> SubmitOutcome {
        let (organism_id, submission) = match self.begin_submit() {
            Ok(request) => request,
            Err(_) => return SubmitOutcome::Rejected,
        };
        let result = sink.submit_rating(organism_id, &submission).await;
        self.finish(result)
    }
}

impl Default for RatingFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };

    use super::*;

    struct CountingSink {
        calls: AtomicUsize,
        fail: bool,
    }

    impl RatingSink for CountingSink {
        async fn submit_rating(&self, _organism_id: u64, _submission: &RatingSubmission) -> Result<(), FloraError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(FloraError::Http { status: 500, url: "/api/organisms/1/rating".to_string() })
            } else {
                Ok(())
            }
        }
    }

    fn open_flow() -> RatingFlow {
        let mut flow = RatingFlow::new();
        flow.open(RatingTarget { organism_id: 1, organism_name: "Curcuma longa".to_string() });
        flow
    }

    #[tokio::test]
    async fn unset_rating_never_reaches_the_backend() {
        let sink = CountingSink { calls: AtomicUsize::new(0), fail: false };
        let mut flow = open_flow();
        flow.draft_mut().review = "No stars yet".to_string();

        assert!(!flow.can_submit());
        assert_eq!(flow.submit(&sink).await, SubmitOutcome::Rejected);
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
        assert_eq!(flow.phase(), RatingPhase::Editing);
        assert_eq!(flow.notice(), Some(MISSING_RATING_PROMPT));
        assert_eq!(flow.draft().review, "No stars yet");
    }

    #[tokio::test]
    async fn success_clears_and_closes() {
        let sink = CountingSink { calls: AtomicUsize::new(0), fail: false };
        let mut flow = open_flow();
        flow.set_rating(4);
        flow.draft_mut().review = "Helped with stiffness".to_string();

        assert_eq!(flow.submit(&sink).await, SubmitOutcome::Reload);
        assert_eq!(flow.phase(), RatingPhase::Idle);
        assert_eq!(flow.draft(), &RatingDraft::default());
        assert!(flow.target().is_none());
        assert_eq!(flow.take_notice().as_deref(), Some(SUBMIT_OK_NOTICE));
    }

    #[tokio::test]
    async fn failure_returns_to_editing_with_input_kept() {
        let sink = CountingSink { calls: AtomicUsize::new(0), fail: true };
        let mut flow = open_flow();
        flow.set_rating(2);
        flow.draft_mut().user_name = "Ana".to_string();

        assert_eq!(flow.submit(&sink).await, SubmitOutcome::Retry);
        assert_eq!(flow.phase(), RatingPhase::Editing);
        assert_eq!(flow.draft().rating, 2);
        assert_eq!(flow.draft().user_name, "Ana");
        assert_eq!(flow.notice(), Some(SUBMIT_FAILED_NOTICE));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn submitting_locks_the_form() {
        let mut flow = open_flow();
        flow.set_rating(5);
        let (organism_id, submission) = flow.begin_submit().unwrap();
        assert_eq!((organism_id, submission.rating), (1, 5));
        assert_eq!(flow.phase(), RatingPhase::Submitting);

        flow.set_rating(1);
        flow.cancel();
        assert_eq!(flow.phase(), RatingPhase::Submitting);
        assert_eq!(flow.draft().rating, 5);
        assert!(flow.begin_submit().is_err());
    }

    #[test]
    fn out_of_range_and_long_reviews_are_refused() {
        let mut flow = open_flow();
        flow.set_rating(6);
        assert_eq!(flow.draft().rating, 0);

        flow.set_rating(3);
        flow.draft_mut().review = "x".repeat(MAX_REVIEW_CHARS + 1);
        assert!(matches!(flow.begin_submit(), Err(FloraError::Validation(_))));
        assert_eq!(flow.phase(), RatingPhase::Editing);
    }

    #[test]
    fn cancel_discards_the_draft() {
        let mut flow = open_flow();
        flow.set_rating(3);
        flow.cancel();
        assert!(!flow.is_open());
        assert_eq!(flow.draft().rating, 0);
        assert_eq!(flow.begin_submit().unwrap_err().to_string(), "No rating form is open");
    }
}
