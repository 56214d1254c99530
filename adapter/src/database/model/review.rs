use kernel::model::{
    id::{ReviewId, RoomId, UserId},
    review::Review,
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct ReviewRow {
    pub review_id: ReviewId,
    pub room_id: RoomId,
    pub room_name: String,
    pub user_id: UserId,
    pub user_display_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(value: ReviewRow) -> Self {
        let ReviewRow {
            review_id,
            room_id,
            room_name,
            user_id,
            user_display_name,
            rating,
            comment,
            created_at,
        } = value;
        Review {
            review_id,
            room_id,
            room_name,
            user_id,
            user_display_name,
            rating,
            comment,
            created_at,
        }
    }
}

// 所有者チェックに使う最小限の型
#[derive(sqlx::FromRow)]
pub struct ReviewStateRow {
    pub review_id: ReviewId,
    pub user_id: UserId,
}
