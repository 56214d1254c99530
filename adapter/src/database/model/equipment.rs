use kernel::model::{
    equipment::Equipment,
    id::{EquipmentId, RoomId},
};

#[derive(sqlx::FromRow)]
pub struct EquipmentRow {
    pub equipment_id: EquipmentId,
    pub name: String,
    pub room_id: RoomId,
    pub room_name: String,
}

impl From<EquipmentRow> for Equipment {
    fn from(value: EquipmentRow) -> Self {
        let EquipmentRow {
            equipment_id,
            name,
            room_id,
            room_name,
        } = value;
        Equipment {
            equipment_id,
            name,
            room_id,
            room_name,
        }
    }
}
