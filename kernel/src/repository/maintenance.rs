use crate::model::{
    id::{MaintenanceWindowId, RoomId},
    maintenance::{event::CreateMaintenanceWindow, MaintenanceWindow},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    async fn create(&self, event: CreateMaintenanceWindow) -> AppResult<MaintenanceWindowId>;
    async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<MaintenanceWindow>>;
    // 過去の枠も履歴として残すため、無効化のみ
    async fn deactivate(&self, window_id: MaintenanceWindowId) -> AppResult<()>;
}
