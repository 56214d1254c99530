use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{ReviewId, RoomId, UserId},
    review::Review,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[garde(skip)]
    pub room_id: RoomId,
    #[garde(range(min = 1, max = 5))]
    pub rating: i32,
    #[garde(skip)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[garde(range(min = 1, max = 5))]
    pub rating: i32,
    #[garde(skip)]
    pub comment: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsResponse {
    pub items: Vec<ReviewResponse>,
}

impl ReviewsResponse {
    pub fn from_reviews(reviews: Vec<Review>, current_user_id: UserId) -> Self {
        Self {
            items: reviews
                .into_iter()
                .map(|r| ReviewResponse::from_review(r, current_user_id))
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub review_id: ReviewId,
    pub room_id: RoomId,
    pub room_name: String,
    pub user_id: UserId,
    pub user_display_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    // 一覧画面で自分のレビューだけ編集ボタンを出すためのフラグ
    pub is_my_review: bool,
}

impl ReviewResponse {
    pub fn from_review(value: Review, current_user_id: UserId) -> Self {
        let Review {
            review_id,
            room_id,
            room_name,
            user_id,
            user_display_name,
            rating,
            comment,
            created_at,
        } = value;
        Self {
            review_id,
            room_id,
            room_name,
            user_id,
            user_display_name,
            rating,
            comment,
            created_at,
            is_my_review: user_id == current_user_id,
        }
    }
}
