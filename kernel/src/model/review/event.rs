use crate::model::id::{ReviewId, RoomId, UserId};
use derive_new::new;

#[derive(new)]
pub struct CreateReview {
    pub room_id: RoomId,
    pub reviewed_by: UserId,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(new)]
pub struct UpdateReview {
    pub review_id: ReviewId,
    pub requested_by: UserId,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(new)]
pub struct DeleteReview {
    pub review_id: ReviewId,
    pub requested_by: UserId,
    pub is_admin: bool,
}
