use crate::model::id::{MaintenanceWindowId, RoomId};
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(new)]
pub struct CreateMaintenanceWindow {
    pub room_id: RoomId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(new)]
pub struct DeactivateMaintenanceWindow {
    pub window_id: MaintenanceWindowId,
}
