use crate::model::id::{EquipmentId, RoomId};

pub struct CreateEquipment {
    pub name: String,
    pub room_id: RoomId,
}

#[derive(Debug)]
pub struct UpdateEquipment {
    pub equipment_id: EquipmentId,
    pub name: String,
    pub room_id: RoomId,
}
