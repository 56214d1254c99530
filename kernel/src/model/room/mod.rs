use crate::model::id::RoomId;
pub mod event;

#[derive(Debug)]
pub struct Room {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub equipment_description: Option<String>,
    pub is_active: bool,
}
