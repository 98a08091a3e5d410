use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{Review, ReviewCreate, ReviewStatus};

const MIN_COMMENT: usize = 10;
const MAX_COMMENT: usize = 2000;

#[derive(Debug, Clone)]
pub enum ReviewAction {
    /// Approve or reject. Moving a review back to pending is not allowed.
    Moderate(ReviewStatus),
}

impl Entity for Review {
    type Id = String;
    type CreateParams = ReviewCreate;
    type Patch = ();
    type Action = ReviewAction;
    type ActionResult = Review;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: ReviewCreate) -> Result<Self, String> {
        if !(1..=5).contains(&params.rating) {
            return Err(format!("Rating must be between 1 and 5, got {}", params.rating));
        }
        let comment = params.comment.trim().to_string();
        let length = comment.chars().count();
        if !(MIN_COMMENT..=MAX_COMMENT).contains(&length) {
            return Err(format!(
                "Comment must be {MIN_COMMENT} to {MAX_COMMENT} characters, got {length}"
            ));
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            hotel_id: params.hotel_id,
            rating: params.rating,
            comment,
            status: ReviewStatus::Pending,
            created_at: Utc::now(),
        })
    }

    fn conflicts_with(&self, existing: &Self) -> Option<String> {
        (existing.user_id == self.user_id && existing.hotel_id == self.hotel_id)
            .then(|| format!("user {} already reviewed hotel {}", self.user_id, self.hotel_id))
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, action: ReviewAction) -> Result<Review, String> {
        match action {
            ReviewAction::Moderate(ReviewStatus::Pending) => {
                Err("A review can only be approved or rejected".to_string())
            }
            ReviewAction::Moderate(status) => {
                self.status = status;
                Ok(self.clone())
            }
        }
    }
}
