use crate::model::id::{MaintenanceWindowId, RoomId};
use chrono::{DateTime, Utc};
pub mod event;

#[derive(Debug)]
pub struct MaintenanceWindow {
    pub window_id: MaintenanceWindowId,
    pub room_id: RoomId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
    pub is_active: bool,
}
