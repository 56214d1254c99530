use crate::database::{map_query_error, model::room::RoomRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::RoomId,
    room::{
        event::{CreateRoom, UpdateRoom},
        Room,
    },
};
use kernel::repository::room::RoomRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct RoomRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn create(&self, event: CreateRoom) -> AppResult<RoomId> {
        if event.capacity < 1 {
            return Err(AppError::ValidationFailed {
                field: "capacity",
                detail: "収容人数は 1 以上を指定してください。".into(),
            });
        }

        sqlx::query_scalar::<_, RoomId>(
            r#"
            INSERT INTO rooms (name, capacity, equipment_description)
            VALUES ($1, $2, $3)
            RETURNING room_id
            "#,
        )
        .bind(&event.name)
        .bind(event.capacity)
        .bind(&event.equipment_description)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(map_query_error)
    }

    async fn find_all(&self, include_inactive: bool) -> AppResult<Vec<Room>> {
        // 利用停止中の会議室は通常の一覧には出さない
        let rows = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT room_id, name, capacity, equipment_description, is_active
            FROM rooms
            WHERE is_active OR $1
            ORDER BY room_id ASC
            "#,
        )
        .bind(include_inactive)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>> {
        let row = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT room_id, name, capacity, equipment_description, is_active
            FROM rooms
            WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Room::from))
    }

    async fn update(&self, event: UpdateRoom) -> AppResult<()> {
        // 指定のなかった項目は現状の値を保つ
        let res = sqlx::query(
            r#"
            UPDATE rooms
            SET
                name = COALESCE($2, name),
                capacity = COALESCE($3, capacity),
                equipment_description = COALESCE($4, equipment_description),
                is_active = COALESCE($5, is_active)
            WHERE room_id = $1
            "#,
        )
        .bind(event.room_id)
        .bind(&event.name)
        .bind(event.capacity)
        .bind(&event.equipment_description)
        .bind(event.is_active)
        .execute(self.db.inner_ref())
        .await
        .map_err(map_query_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "会議室（{}）が見つかりませんでした。",
                event.room_id
            )));
        }

        Ok(())
    }

    async fn deactivate(&self, room_id: RoomId) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE rooms SET is_active = FALSE WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(map_query_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "会議室（{}）が見つかりませんでした。",
                room_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../migrations")]
    async fn register_and_find_room(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool));

        let room_id = repo
            .create(CreateRoom {
                name: "第 3 会議室".into(),
                capacity: 6,
                equipment_description: Some("ホワイトボードのみ".into()),
            })
            .await?;

        let room = repo.find_by_id(room_id).await?.unwrap();
        assert_eq!(room.name, "第 3 会議室");
        assert_eq!(room.capacity, 6);
        assert!(room.is_active);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn zero_capacity_is_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool));

        let res = repo
            .create(CreateRoom {
                name: "物置".into(),
                capacity: 0,
                equipment_description: None,
            })
            .await;
        assert!(matches!(res, Err(AppError::ValidationFailed { .. })));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn deactivated_room_disappears_from_default_listing(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool));

        // シードの会議室 2 を利用停止にする
        repo.deactivate(RoomId::new(2)).await?;

        let active = repo.find_all(false).await?;
        assert!(active.iter().all(|r| r.room_id != RoomId::new(2)));

        let all = repo.find_all(true).await?;
        assert!(all.iter().any(|r| r.room_id == RoomId::new(2) && !r.is_active));

        Ok(())
    }
}
