use crate::model::{
    id::UserId,
    user::{event::CreateUser, User},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, event: CreateUser) -> AppResult<UserId>;
    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>>;
    // カレンダー連携用のアクセストークン。未連携のユーザーは None
    async fn find_calendar_token(&self, user_id: UserId) -> AppResult<Option<String>>;
}
