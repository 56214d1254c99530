use crate::model::{
    id::RoomId,
    room::{
        event::{CreateRoom, UpdateRoom},
        Room,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, event: CreateRoom) -> AppResult<RoomId>;
    // include_inactive が false のときは利用停止中の会議室を除く
    async fn find_all(&self, include_inactive: bool) -> AppResult<Vec<Room>>;
    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>>;
    async fn update(&self, event: UpdateRoom) -> AppResult<()>;
    // 物理削除はしない。is_active を落とすだけ
    async fn deactivate(&self, room_id: RoomId) -> AppResult<()>;
}
