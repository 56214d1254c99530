use garde::Validate;
use kernel::model::{
    equipment::{event::CreateEquipment, Equipment},
    id::{EquipmentId, RoomId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipmentRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(skip)]
    pub room_id: RoomId,
}

impl From<CreateEquipmentRequest> for CreateEquipment {
    fn from(value: CreateEquipmentRequest) -> Self {
        let CreateEquipmentRequest { name, room_id } = value;
        CreateEquipment { name, room_id }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipmentRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(skip)]
    pub room_id: RoomId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentsResponse {
    pub items: Vec<EquipmentResponse>,
}

impl From<Vec<Equipment>> for EquipmentsResponse {
    fn from(value: Vec<Equipment>) -> Self {
        Self {
            items: value.into_iter().map(EquipmentResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentResponse {
    pub equipment_id: EquipmentId,
    pub name: String,
    pub room_id: RoomId,
    pub room_name: String,
}

impl From<Equipment> for EquipmentResponse {
    fn from(value: Equipment) -> Self {
        let Equipment {
            equipment_id,
            name,
            room_id,
            room_name,
        } = value;
        Self {
            equipment_id,
            name,
            room_id,
            room_name,
        }
    }
}
