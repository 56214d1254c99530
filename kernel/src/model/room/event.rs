use crate::model::id::RoomId;

pub struct CreateRoom {
    pub name: String,
    pub capacity: i32,
    pub equipment_description: Option<String>,
}

#[derive(Debug)]
pub struct UpdateRoom {
    pub room_id: RoomId,
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub equipment_description: Option<String>,
    pub is_active: Option<bool>,
}
