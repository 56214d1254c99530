use crate::model::id::{EquipmentId, RoomId};
pub mod event;

// 備品は必ずいずれかの会議室に属するが、
// 予約は部屋とは独立に備品だけを対象にできる
#[derive(Debug)]
pub struct Equipment {
    pub equipment_id: EquipmentId,
    pub name: String,
    pub room_id: RoomId,
    pub room_name: String,
}
