use kernel::model::{
    id::{MaintenanceWindowId, RoomId},
    maintenance::MaintenanceWindow,
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct MaintenanceWindowRow {
    pub window_id: MaintenanceWindowId,
    pub room_id: RoomId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
    pub is_active: bool,
}

impl From<MaintenanceWindowRow> for MaintenanceWindow {
    fn from(value: MaintenanceWindowRow) -> Self {
        let MaintenanceWindowRow {
            window_id,
            room_id,
            start_time,
            end_time,
            reason,
            is_active,
        } = value;
        MaintenanceWindow {
            window_id,
            room_id,
            start_time,
            end_time,
            reason,
            is_active,
        }
    }
}
