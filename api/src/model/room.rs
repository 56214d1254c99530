use crate::model::equipment::EquipmentResponse;
use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    equipment::Equipment,
    id::{MaintenanceWindowId, RoomId},
    maintenance::MaintenanceWindow,
    room::{event::CreateRoom, Room},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[garde(skip)]
    pub equipment_description: Option<String>,
}

impl From<CreateRoomRequest> for CreateRoom {
    fn from(value: CreateRoomRequest) -> Self {
        let CreateRoomRequest {
            name,
            capacity,
            equipment_description,
        } = value;
        CreateRoom {
            name,
            capacity,
            equipment_description,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
    #[garde(skip)]
    pub name: Option<String>,
    #[garde(inner(range(min = 1)))]
    pub capacity: Option<i32>,
    #[garde(skip)]
    pub equipment_description: Option<String>,
    #[garde(skip)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomListQuery {
    // 管理画面では利用停止中の会議室も一覧に含める
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsResponse {
    pub items: Vec<RoomResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub equipment_description: Option<String>,
    pub is_active: bool,
    pub equipments: Vec<EquipmentResponse>,
}

impl RoomResponse {
    pub fn from_room(room: Room, equipments: Vec<Equipment>) -> Self {
        let Room {
            room_id,
            name,
            capacity,
            equipment_description,
            is_active,
        } = room;
        Self {
            room_id,
            name,
            capacity,
            equipment_description,
            is_active,
            equipments: equipments
                .into_iter()
                .map(EquipmentResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceWindowRequest {
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    #[garde(skip)]
    pub reason: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindowsResponse {
    pub items: Vec<MaintenanceWindowResponse>,
}

impl From<Vec<MaintenanceWindow>> for MaintenanceWindowsResponse {
    fn from(value: Vec<MaintenanceWindow>) -> Self {
        Self {
            items: value
                .into_iter()
                .map(MaintenanceWindowResponse::from)
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindowResponse {
    pub window_id: MaintenanceWindowId,
    pub room_id: RoomId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
    pub is_active: bool,
}

impl From<MaintenanceWindow> for MaintenanceWindowResponse {
    fn from(value: MaintenanceWindow) -> Self {
        let MaintenanceWindow {
            window_id,
            room_id,
            start_time,
            end_time,
            reason,
            is_active,
        } = value;
        Self {
            window_id,
            room_id,
            start_time,
            end_time,
            reason,
            is_active,
        }
    }
}
