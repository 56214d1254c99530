use crate::model::id::{ReviewId, RoomId, UserId};
use chrono::{DateTime, Utc};
pub mod event;

#[derive(Debug)]
pub struct Review {
    pub review_id: ReviewId,
    pub room_id: RoomId,
    pub room_name: String,
    pub user_id: UserId,
    pub user_display_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
