use crate::database::{map_query_error, model::equipment::EquipmentRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    equipment::{
        event::{CreateEquipment, UpdateEquipment},
        Equipment,
    },
    id::{EquipmentId, RoomId},
};
use kernel::repository::equipment::EquipmentRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct EquipmentRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EquipmentRepository for EquipmentRepositoryImpl {
    async fn create(&self, event: CreateEquipment) -> AppResult<EquipmentId> {
        // 所属先の会議室が存在しなければ外部キー違反になり、
        // map_query_error が NotFound に読み替える
        sqlx::query_scalar::<_, EquipmentId>(
            r#"
            INSERT INTO equipments (name, room_id)
            VALUES ($1, $2)
            RETURNING equipment_id
            "#,
        )
        .bind(&event.name)
        .bind(event.room_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(map_query_error)
    }

    async fn find_all(&self) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, EquipmentRow>(
            r#"
            SELECT
                e.equipment_id,
                e.name,
                e.room_id,
                r.name AS room_name
            FROM equipments AS e
            INNER JOIN rooms AS r ON e.room_id = r.room_id
            ORDER BY e.equipment_id ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Equipment::from).collect())
    }

    async fn find_by_id(&self, equipment_id: EquipmentId) -> AppResult<Option<Equipment>> {
        let row = sqlx::query_as::<_, EquipmentRow>(
            r#"
            SELECT
                e.equipment_id,
                e.name,
                e.room_id,
                r.name AS room_name
            FROM equipments AS e
            INNER JOIN rooms AS r ON e.room_id = r.room_id
            WHERE e.equipment_id = $1
            "#,
        )
        .bind(equipment_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Equipment::from))
    }

    async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, EquipmentRow>(
            r#"
            SELECT
                e.equipment_id,
                e.name,
                e.room_id,
                r.name AS room_name
            FROM equipments AS e
            INNER JOIN rooms AS r ON e.room_id = r.room_id
            WHERE e.room_id = $1
            ORDER BY e.equipment_id ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Equipment::from).collect())
    }

    async fn update(&self, event: UpdateEquipment) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE equipments
            SET name = $2, room_id = $3
            WHERE equipment_id = $1
            "#,
        )
        .bind(event.equipment_id)
        .bind(&event.name)
        .bind(event.room_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(map_query_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "備品（{}）が見つかりませんでした。",
                event.equipment_id
            )));
        }

        Ok(())
    }

    async fn delete(&self, equipment_id: EquipmentId) -> AppResult<()> {
        // 予約との紐づけが残っている備品は外部キー制約で消せない
        let res = sqlx::query(
            r#"
            DELETE FROM equipments WHERE equipment_id = $1
            "#,
        )
        .bind(equipment_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23503") => {
                AppError::UnprocessableEntity(
                    "予約で使用されている備品は削除できません。".into(),
                )
            }
            e => map_query_error(e),
        })?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "備品（{}）が見つかりませんでした。",
                equipment_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../migrations")]
    async fn register_and_list_equipment(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = EquipmentRepositoryImpl::new(ConnectionPool::new(pool));

        let equipment_id = repo
            .create(CreateEquipment {
                name: "会議用マイクセット".into(),
                room_id: RoomId::new(1),
            })
            .await?;

        let equipment = repo.find_by_id(equipment_id).await?.unwrap();
        assert_eq!(equipment.name, "会議用マイクセット");
        assert_eq!(equipment.room_id, RoomId::new(1));
        assert!(!equipment.room_name.is_empty());

        let in_room = repo.find_by_room_id(RoomId::new(1)).await?;
        assert!(in_room.iter().any(|e| e.equipment_id == equipment_id));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn create_with_unknown_room_is_not_found(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = EquipmentRepositoryImpl::new(ConnectionPool::new(pool));

        let res = repo
            .create(CreateEquipment {
                name: "延長コード".into(),
                room_id: RoomId::new(9999),
            })
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        Ok(())
    }
}
