use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{EquipmentId, ReservationId, RoomId, UserId},
    reservation::Reservation,
};
use serde::{Deserialize, Serialize};

// 備品のみの予約で表示に使う会議室名の代わり
const EQUIPMENT_ONLY_LABEL: &str = "Equipment rental";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub room_id: Option<RoomId>,
    #[garde(skip)]
    #[serde(default)]
    pub equipment_ids: Vec<EquipmentId>,
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    #[garde(length(chars, min = 5, max = 200))]
    pub purpose: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RejectReservationRequest {
    #[garde(skip)]
    pub reason: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub room_id: Option<RoomId>,
    pub room_name: String,
    pub user_id: UserId,
    pub approved_by: Option<UserId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            reservation_id,
            room,
            reserved_by,
            approved_by,
            start_time,
            end_time,
            purpose,
            status,
            rejection_reason,
            created_at,
        } = value;
        let (room_id, room_name) = match room {
            Some(room) => (Some(room.room_id), room.room_name),
            None => (None, EQUIPMENT_ONLY_LABEL.to_string()),
        };
        Self {
            reservation_id,
            room_id,
            room_name,
            user_id: reserved_by,
            approved_by,
            start_time,
            end_time,
            purpose,
            status: status.as_ref().to_string(),
            rejection_reason,
            created_at,
        }
    }
}
