use crate::database::{map_query_error, model::review::{ReviewRow, ReviewStateRow}, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::clock::Clock;
use kernel::model::{
    id::{ReviewId, RoomId, UserId},
    review::{
        event::{CreateReview, DeleteReview, UpdateReview},
        Review,
    },
};
use kernel::repository::review::ReviewRepository;
use shared::error::{AppError, AppResult};
use std::sync::Arc;

#[derive(new)]
pub struct ReviewRepositoryImpl {
    db: ConnectionPool,
    clock: Arc<dyn Clock>,
}

#[async_trait]
impl ReviewRepository for ReviewRepositoryImpl {
    async fn create(&self, event: CreateReview) -> AppResult<ReviewId> {
        if !(1..=5).contains(&event.rating) {
            return Err(AppError::ValidationFailed {
                field: "rating",
                detail: "評価は 1〜5 で指定してください。".into(),
            });
        }

        // ① 同じ会議室には 1 人 1 件まで
        let already: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT review_id FROM reviews
            WHERE room_id = $1 AND user_id = $2
            LIMIT 1
            "#,
        )
        .bind(event.room_id)
        .bind(event.reviewed_by)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if already.is_some() {
            return Err(AppError::UnprocessableEntity(
                "この会議室のレビューはすでに投稿済みです。既存のレビューを編集してください。"
                    .into(),
            ));
        }

        // ② 利用実績の確認。終了済みで、取り消し・却下でない予約があること
        let used: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT reservation_id FROM reservations
            WHERE room_id = $1
              AND user_id = $2
              AND end_time < $3
              AND status NOT IN ('Cancelled', 'Rejected')
            LIMIT 1
            "#,
        )
        .bind(event.room_id)
        .bind(event.reviewed_by)
        .bind(self.clock.now())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if used.is_none() {
            return Err(AppError::UnprocessableEntity(
                "利用したことのある会議室のみレビューを投稿できます。".into(),
            ));
        }

        sqlx::query_scalar::<_, ReviewId>(
            r#"
            INSERT INTO reviews (room_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING review_id
            "#,
        )
        .bind(event.room_id)
        .bind(event.reviewed_by)
        .bind(event.rating)
        .bind(&event.comment)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(map_query_error)
    }

    async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT
                rv.review_id,
                rv.room_id,
                ro.name AS room_name,
                rv.user_id,
                u.display_name AS user_display_name,
                rv.rating,
                rv.comment,
                rv.created_at
            FROM reviews AS rv
            INNER JOIN rooms AS ro ON rv.room_id = ro.room_id
            INNER JOIN users AS u ON rv.user_id = u.user_id
            WHERE rv.room_id = $1
            ORDER BY rv.created_at DESC
            "#,
        )
        .bind(room_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT
                rv.review_id,
                rv.room_id,
                ro.name AS room_name,
                rv.user_id,
                u.display_name AS user_display_name,
                rv.rating,
                rv.comment,
                rv.created_at
            FROM reviews AS rv
            INNER JOIN rooms AS ro ON rv.room_id = ro.room_id
            INNER JOIN users AS u ON rv.user_id = u.user_id
            WHERE rv.user_id = $1
            ORDER BY rv.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn update(&self, event: UpdateReview) -> AppResult<()> {
        if !(1..=5).contains(&event.rating) {
            return Err(AppError::ValidationFailed {
                field: "rating",
                detail: "評価は 1〜5 で指定してください。".into(),
            });
        }

        let state = self.load_state(event.review_id).await?;
        // 他人のレビューは編集できない
        if state.user_id != event.requested_by {
            return Err(AppError::ForbiddenOperation);
        }

        sqlx::query(
            r#"
            UPDATE reviews
            SET rating = $2, comment = $3, created_at = now()
            WHERE review_id = $1
            "#,
        )
        .bind(event.review_id)
        .bind(event.rating)
        .bind(&event.comment)
        .execute(self.db.inner_ref())
        .await
        .map_err(map_query_error)?;

        Ok(())
    }

    async fn delete(&self, event: DeleteReview) -> AppResult<()> {
        let state = self.load_state(event.review_id).await?;
        // 削除できるのは投稿者本人か管理者
        if state.user_id != event.requested_by && !event.is_admin {
            return Err(AppError::ForbiddenOperation);
        }

        sqlx::query(
            r#"
            DELETE FROM reviews WHERE review_id = $1
            "#,
        )
        .bind(event.review_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(map_query_error)?;

        Ok(())
    }
}

impl ReviewRepositoryImpl {
    async fn load_state(&self, review_id: ReviewId) -> AppResult<ReviewStateRow> {
        let row = sqlx::query_as::<_, ReviewStateRow>(
            r#"
            SELECT review_id, user_id FROM reviews WHERE review_id = $1
            "#,
        )
        .bind(review_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.ok_or_else(|| {
            AppError::EntityNotFound(format!(
                "レビュー（{}）が見つかりませんでした。",
                review_id
            ))
        })
    }
}
