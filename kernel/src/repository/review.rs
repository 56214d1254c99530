use crate::model::{
    id::{ReviewId, RoomId, UserId},
    review::{
        event::{CreateReview, DeleteReview, UpdateReview},
        Review,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    // 過去に利用実績のある会議室にのみ、1 人 1 件まで投稿できる
    async fn create(&self, event: CreateReview) -> AppResult<ReviewId>;
    async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<Review>>;
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Review>>;
    async fn update(&self, event: UpdateReview) -> AppResult<()>;
    async fn delete(&self, event: DeleteReview) -> AppResult<()>;
}
