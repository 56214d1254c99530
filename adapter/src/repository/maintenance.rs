use crate::database::{map_query_error, model::maintenance::MaintenanceWindowRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{MaintenanceWindowId, RoomId},
    maintenance::{event::CreateMaintenanceWindow, MaintenanceWindow},
};
use kernel::repository::maintenance::MaintenanceRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct MaintenanceRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl MaintenanceRepository for MaintenanceRepositoryImpl {
    async fn create(&self, event: CreateMaintenanceWindow) -> AppResult<MaintenanceWindowId> {
        if event.end_time <= event.start_time {
            return Err(AppError::ValidationFailed {
                field: "endTime",
                detail: "終了時刻は開始時刻より後を指定してください。".into(),
            });
        }

        sqlx::query_scalar::<_, MaintenanceWindowId>(
            r#"
            INSERT INTO maintenance_windows (room_id, start_time, end_time, reason)
            VALUES ($1, $2, $3, $4)
            RETURNING window_id
            "#,
        )
        .bind(event.room_id)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.reason)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(map_query_error)
    }

    async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<MaintenanceWindow>> {
        let rows = sqlx::query_as::<_, MaintenanceWindowRow>(
            r#"
            SELECT window_id, room_id, start_time, end_time, reason, is_active
            FROM maintenance_windows
            WHERE room_id = $1
            ORDER BY start_time DESC
            "#,
        )
        .bind(room_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(MaintenanceWindow::from).collect())
    }

    async fn deactivate(&self, window_id: MaintenanceWindowId) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE maintenance_windows SET is_active = FALSE WHERE window_id = $1
            "#,
        )
        .bind(window_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(map_query_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "メンテナンス枠（{}）が見つかりませんでした。",
                window_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[sqlx::test(migrations = "../migrations")]
    async fn register_and_deactivate_window(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = MaintenanceRepositoryImpl::new(ConnectionPool::new(pool));

        let start = Utc.with_ymd_and_hms(2030, 2, 1, 14, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 2, 1, 15, 0, 0).unwrap();
        let window_id = repo
            .create(CreateMaintenanceWindow::new(
                RoomId::new(2),
                start,
                end,
                Some("プロジェクターの交換".into()),
            ))
            .await?;

        let windows = repo.find_by_room_id(RoomId::new(2)).await?;
        assert!(windows.iter().any(|w| w.window_id == window_id && w.is_active));

        repo.deactivate(window_id).await?;
        let windows = repo.find_by_room_id(RoomId::new(2)).await?;
        assert!(windows.iter().any(|w| w.window_id == window_id && !w.is_active));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn inverted_range_is_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = MaintenanceRepositoryImpl::new(ConnectionPool::new(pool));

        let start = Utc.with_ymd_and_hms(2030, 2, 1, 15, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 2, 1, 14, 0, 0).unwrap();
        let res = repo
            .create(CreateMaintenanceWindow::new(RoomId::new(2), start, end, None))
            .await;
        assert!(matches!(res, Err(AppError::ValidationFailed { .. })));

        Ok(())
    }
}
