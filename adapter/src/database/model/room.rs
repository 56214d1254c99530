use kernel::model::{id::RoomId, room::Room};

#[derive(sqlx::FromRow)]
pub struct RoomRow {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub equipment_description: Option<String>,
    pub is_active: bool,
}

impl From<RoomRow> for Room {
    fn from(value: RoomRow) -> Self {
        let RoomRow {
            room_id,
            name,
            capacity,
            equipment_description,
            is_active,
        } = value;
        Room {
            room_id,
            name,
            capacity,
            equipment_description,
            is_active,
        }
    }
}

// 予約作成時の事前チェックに使う型
#[derive(sqlx::FromRow)]
pub struct RoomStateRow {
    pub room_id: RoomId,
    pub is_active: bool,
}
