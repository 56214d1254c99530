use crate::database::{
    map_commit_error, map_query_error,
    model::reservation::{ReservationRow, ReservationStateRow},
    model::room::RoomStateRow,
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::clock::Clock;
use kernel::model::audit::AuditAction;
use kernel::model::id::{EquipmentId, ReservationId, RoomId, UserId};
use kernel::model::reservation::{
    availability::{precheck, BookingCandidate, Conflict},
    event::{ApproveReservation, CancelReservation, CreateReservation, RejectReservation},
    Reservation, ReservationStatus,
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult, ConflictKind};
use std::sync::Arc;

const ENTITY_TYPE: &str = "Reservation";

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
    clock: Arc<dyn Clock>,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    // 予約操作を行う
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        // 形の検証（目的の文字数・予約時間の長さ）は書き込みより前に終わらせる
        event.validate()?;

        // 同じ備品が重複して指定されていても 1 つとして扱う
        let mut equipment_ids = event.equipment_ids.clone();
        equipment_ids.sort();
        equipment_ids.dedup();

        let candidate = BookingCandidate::new(
            event.room_id,
            equipment_ids.clone(),
            event.start_time,
            event.end_time,
            None,
        );

        // SQL なしで決着がつく検査（範囲・過去時刻・選択なし）
        if let Some(conflict) = precheck(&candidate, self.clock.now()) {
            return Err(AppError::ReservationConflict(conflict.kind));
        }

        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する。
        // これにより、ここで読んだ空き状況がコミット時まで保たれる
        // （保てない場合はコミットが 40001 で失敗する）
        self.set_transaction_serializable(&mut tx).await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定の会議室が存在し、利用可能（is_active）か
        // - 指定の備品がすべて存在するか
        // - 希望の時間帯が既存予約・メンテナンス枠と重なっていないか
        //
        // 上記をすべて通過した場合のみ、このブロック以降の処理に進む
        {
            //
            // ① 会議室の存在確認 ＋ is_active チェック
            //
            if let Some(room_id) = event.room_id {
                let room_row = sqlx::query_as::<_, RoomStateRow>(
                    r#"
                    SELECT room_id, is_active
                    FROM rooms
                    WHERE room_id = $1
                    "#,
                )
                .bind(room_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

                let room = match room_row {
                    None => {
                        return Err(AppError::EntityNotFound(format!(
                            "会議室（{}）が見つかりませんでした。",
                            room_id
                        )))
                    }
                    Some(r) => r,
                };

                if !room.is_active {
                    return Err(AppError::UnprocessableEntity(format!(
                        "会議室（{}）は現在利用できません。",
                        room_id
                    )));
                }
            }

            //
            // ② 備品の存在確認
            //
            if !equipment_ids.is_empty() {
                let ids: Vec<i64> = equipment_ids.iter().map(|e| e.raw()).collect();
                let found: i64 = sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*)
                    FROM equipments
                    WHERE equipment_id = ANY($1)
                    "#,
                )
                .bind(&ids)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

                if found != ids.len() as i64 {
                    return Err(AppError::EntityNotFound(
                        "指定された備品が見つかりませんでした。".into(),
                    ));
                }
            }

            //
            // ③ 希望の時間帯が空いているか確認
            //
            if let Some(conflict) = find_conflict(&mut tx, &candidate).await? {
                return Err(AppError::ReservationConflict(conflict.kind));
            }
        }

        // 予約処理を行う。ステータスは Pending で作成する
        let reservation_id = sqlx::query_scalar::<_, ReservationId>(
            r#"
            INSERT INTO reservations
            (room_id, user_id, start_time, end_time, purpose)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING reservation_id
            "#,
        )
        .bind(event.room_id)
        .bind(event.reserved_by)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.purpose.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_query_error)?;

        // 備品とのリンクを張る
        for equipment_id in &equipment_ids {
            sqlx::query(
                r#"
                INSERT INTO reservation_equipments (reservation_id, equipment_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(reservation_id)
            .bind(equipment_id)
            .execute(&mut *tx)
            .await
            .map_err(map_query_error)?;
        }

        let details = match event.room_id {
            Some(room_id) => format!(
                "会議室 {} の新規予約（{} 〜 {}）",
                room_id,
                event.start_time.format("%Y-%m-%d %H:%M"),
                event.end_time.format("%Y-%m-%d %H:%M"),
            ),
            None => format!(
                "備品のみの新規予約（{} 〜 {}）",
                event.start_time.format("%Y-%m-%d %H:%M"),
                event.end_time.format("%Y-%m-%d %H:%M"),
            ),
        };
        append_audit(
            &mut tx,
            Some(event.reserved_by),
            reservation_id,
            AuditAction::Create,
            &details,
        )
        .await?;

        tx.commit().await.map_err(map_commit_error)?;

        Ok(reservation_id)
    }

    // 予約を承認する。Pending 以外からは遷移できない
    async fn approve(&self, event: ApproveReservation) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let state = self.load_state(&mut tx, event.reservation_id).await?;
        let status = state.status()?;
        if !status.can_transition(ReservationStatus::Approved) {
            return Err(AppError::InvalidTransition {
                from: status.as_ref().into(),
                to: ReservationStatus::Approved.as_ref().into(),
            });
        }

        let res = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'Approved', approved_by = $2
            WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .bind(event.approved_by)
        .execute(&mut *tx)
        .await
        .map_err(map_query_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        append_audit(
            &mut tx,
            Some(event.approved_by),
            event.reservation_id,
            AuditAction::Approve,
            "予約を承認しました。",
        )
        .await?;

        tx.commit().await.map_err(map_commit_error)?;

        Ok(())
    }

    // 予約を却下する。却下理由は任意
    async fn reject(&self, event: RejectReservation) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let state = self.load_state(&mut tx, event.reservation_id).await?;
        let status = state.status()?;
        if !status.can_transition(ReservationStatus::Rejected) {
            return Err(AppError::InvalidTransition {
                from: status.as_ref().into(),
                to: ReservationStatus::Rejected.as_ref().into(),
            });
        }

        let res = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'Rejected', approved_by = $2, rejection_reason = $3
            WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .bind(event.rejected_by)
        .bind(&event.reason)
        .execute(&mut *tx)
        .await
        .map_err(map_query_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        let details = match &event.reason {
            Some(reason) => format!("予約を却下しました。理由: {}", reason),
            None => "予約を却下しました。".to_string(),
        };
        append_audit(
            &mut tx,
            Some(event.rejected_by),
            event.reservation_id,
            AuditAction::Reject,
            &details,
        )
        .await?;

        tx.commit().await.map_err(map_commit_error)?;

        Ok(())
    }

    // 予約を取り消す。すでに取り消し済みなら何もせず成功を返す
    async fn cancel(&self, event: CancelReservation) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let state = self.load_state(&mut tx, event.reservation_id).await?;
        let status = state.status()?;

        // 冪等にするため、例外を握りつぶすのではなく
        // 現在のステータスで分岐する。監査ログも残さない
        if status == ReservationStatus::Cancelled {
            return Ok(());
        }

        // 取り消せるのは予約の所有者か管理者だけ
        if state.user_id != event.requested_by && !event.is_admin {
            return Err(AppError::ForbiddenOperation);
        }

        if !status.can_transition(ReservationStatus::Cancelled) {
            return Err(AppError::InvalidTransition {
                from: status.as_ref().into(),
                to: ReservationStatus::Cancelled.as_ref().into(),
            });
        }

        let res = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'Cancelled'
            WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .execute(&mut *tx)
        .await
        .map_err(map_query_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        append_audit(
            &mut tx,
            Some(event.requested_by),
            event.reservation_id,
            AuditAction::Cancel,
            "予約を取り消しました。",
        )
        .await?;

        tx.commit().await.map_err(map_commit_error)?;

        Ok(())
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT
                r.reservation_id,
                r.room_id,
                ro.name AS room_name,
                r.user_id,
                r.approved_by,
                r.start_time,
                r.end_time,
                r.purpose,
                r.status,
                r.rejection_reason,
                r.created_at
            FROM reservations AS r
            LEFT OUTER JOIN rooms AS ro ON r.room_id = ro.room_id
            WHERE r.reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            Some(row) => Reservation::try_from(row),
            None => Err(AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                reservation_id
            ))),
        }
    }

    // 会議室 ID に紐づく予約一覧を取得する
    async fn find_for_room(&self, room_id: RoomId) -> AppResult<Vec<Reservation>> {
        // 出力するレコードは、開始時刻の新しい順に並べる
        sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT
                r.reservation_id,
                r.room_id,
                ro.name AS room_name,
                r.user_id,
                r.approved_by,
                r.start_time,
                r.end_time,
                r.purpose,
                r.status,
                r.rejection_reason,
                r.created_at
            FROM reservations AS r
            INNER JOIN rooms AS ro ON r.room_id = ro.room_id
            WHERE r.room_id = $1
            ORDER BY r.start_time DESC
            "#,
        )
        .bind(room_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Reservation::try_from)
        .collect()
    }

    // 備品 ID に紐づく予約一覧を取得する
    async fn find_for_equipment(&self, equipment_id: EquipmentId) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT
                r.reservation_id,
                r.room_id,
                ro.name AS room_name,
                r.user_id,
                r.approved_by,
                r.start_time,
                r.end_time,
                r.purpose,
                r.status,
                r.rejection_reason,
                r.created_at
            FROM reservations AS r
            INNER JOIN reservation_equipments AS re
                ON re.reservation_id = r.reservation_id
            LEFT OUTER JOIN rooms AS ro ON r.room_id = ro.room_id
            WHERE re.equipment_id = $1
            ORDER BY r.start_time DESC
            "#,
        )
        .bind(equipment_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Reservation::try_from)
        .collect()
    }
}

impl ReservationRepositoryImpl {
    // 状態を変更するトランザクションの分離レベルを SERIALIZABLE にするために
    // 内部的に使うメソッド
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    // 遷移判定のため、トランザクション内で現在のステータスを読む
    async fn load_state(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        reservation_id: ReservationId,
    ) -> AppResult<ReservationStateRow> {
        let row = sqlx::query_as::<_, ReservationStateRow>(
            r#"
            SELECT reservation_id, user_id, status
            FROM reservations
            WHERE reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.ok_or_else(|| {
            AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                reservation_id
            ))
        })
    }
}

/// 空き判定の SQL 側。判定順は
/// 会議室の重複 → メンテナンス枠 → 備品の重複 で、
/// 最初に見つかった衝突で打ち切る。
/// 呼び出し元のトランザクション上で実行すること
pub(crate) async fn find_conflict(
    conn: &mut sqlx::PgConnection,
    candidate: &BookingCandidate,
) -> AppResult<Option<Conflict>> {
    // 編集時には自分自身を衝突対象から外す。-1 はどの ID とも一致しない
    let excluded = candidate.excluded.map(|id| id.raw()).unwrap_or(-1);

    if let Some(room_id) = candidate.room_id {
        //
        // ④ 会議室の重複予約
        //    重複条件：existing.start < new.end AND new.start < existing.end
        //    Cancelled / Rejected は衝突しない
        //
        let busy: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT reservation_id
            FROM reservations
            WHERE room_id = $1
              AND reservation_id <> $4
              AND status NOT IN ('Cancelled', 'Rejected')
              AND start_time < $3
              AND $2 < end_time
            LIMIT 1
            "#,
        )
        .bind(room_id)
        .bind(candidate.start_time)
        .bind(candidate.end_time)
        .bind(excluded)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if let Some(id) = busy {
            return Ok(Some(Conflict {
                kind: ConflictKind::RoomBusy,
                offending: Some(id),
            }));
        }

        //
        // ⑤ メンテナンス枠との重なり
        //
        let blocked: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT window_id
            FROM maintenance_windows
            WHERE room_id = $1
              AND is_active
              AND start_time < $3
              AND $2 < end_time
            LIMIT 1
            "#,
        )
        .bind(room_id)
        .bind(candidate.start_time)
        .bind(candidate.end_time)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if let Some(id) = blocked {
            return Ok(Some(Conflict {
                kind: ConflictKind::Maintenance,
                offending: Some(id),
            }));
        }
    }

    if !candidate.equipment_ids.is_empty() {
        //
        // ⑥ 備品の重複予約。部屋をまたいで備品だけ借りる予約とも衝突しうる
        //
        let ids: Vec<i64> = candidate.equipment_ids.iter().map(|e| e.raw()).collect();
        let busy: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT r.reservation_id
            FROM reservations AS r
            INNER JOIN reservation_equipments AS re
                ON re.reservation_id = r.reservation_id
            WHERE re.equipment_id = ANY($1)
              AND r.reservation_id <> $4
              AND r.status NOT IN ('Cancelled', 'Rejected')
              AND r.start_time < $3
              AND $2 < r.end_time
            LIMIT 1
            "#,
        )
        .bind(&ids)
        .bind(candidate.start_time)
        .bind(candidate.end_time)
        .bind(excluded)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if let Some(id) = busy {
            return Ok(Some(Conflict {
                kind: ConflictKind::EquipmentBusy,
                offending: Some(id),
            }));
        }
    }

    Ok(None)
}

// 監査ログを追記する。予約の変更と同じトランザクションで
// コミットされるため、片方だけが残ることはない
async fn append_audit(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    actor: Option<UserId>,
    reservation_id: ReservationId,
    action: AuditAction,
    details: &str,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (user_id, entity_type, entity_id, action, details)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(actor)
    .bind(ENTITY_TYPE)
    .bind(reservation_id.raw())
    .bind(action.as_ref())
    .bind(details)
    .execute(&mut **tx)
    .await
    .map_err(map_query_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use kernel::clock::FixedClock;

    // シードデータ（会議室 1・2、備品 1〜3、ユーザー 1・2）が
    // 存在する前提で、予約時刻はすべて 2030 年に置く
    fn test_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn repo(pool: sqlx::PgPool) -> ReservationRepositoryImpl {
        ReservationRepositoryImpl::new(ConnectionPool::new(pool), test_clock())
    }

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, hour, min, 0).unwrap()
    }

    async fn insert_user(pool: &sqlx::PgPool, user_id: i64, email: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, email, hashed_password, display_name, role)
            VALUES ($1, $2, 'test-hash', 'テストユーザー', 'User')
            "#,
        )
        .bind(user_id)
        .bind(email)
        .execute(pool)
        .await?;
        Ok(())
    }

    fn room_event(
        room_id: i64,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CreateReservation {
        CreateReservation::new(
            Some(RoomId::new(room_id)),
            vec![],
            UserId::new(user_id),
            start,
            end,
            "チーム定例ミーティング".into(),
        )
    }

    async fn count(pool: &sqlx::PgPool, sql: &str) -> anyhow::Result<i64> {
        Ok(sqlx::query_scalar(sql).fetch_one(pool).await?)
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn create_persists_pending_reservation_with_one_audit_row(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        let repo = repo(pool.clone());

        let id = repo
            .create(room_event(1, 7, at(10, 0), at(11, 0)))
            .await?;

        let reservation = repo.find_by_id(id).await?;
        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.reserved_by, UserId::new(7));
        assert!(reservation.approved_by.is_none());
        assert_eq!(reservation.room.as_ref().unwrap().room_id, RoomId::new(1));

        assert_eq!(count(&pool, "SELECT COUNT(*) FROM reservations").await?, 1);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM audit_logs").await?, 1);

        let (action, actor): (String, Option<i64>) = sqlx::query_as(
            "SELECT action, user_id FROM audit_logs WHERE entity_id = $1",
        )
        .bind(id.raw())
        .fetch_one(&pool)
        .await?;
        assert_eq!(action, "Create");
        assert_eq!(actor, Some(7));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn approve_sets_status_and_actor(pool: sqlx::PgPool) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        let repo = repo(pool.clone());

        let id = repo
            .create(room_event(1, 7, at(10, 0), at(11, 0)))
            .await?;
        repo.approve(ApproveReservation::new(id, UserId::new(1)))
            .await?;

        let reservation = repo.find_by_id(id).await?;
        assert_eq!(reservation.status, ReservationStatus::Approved);
        assert_eq!(reservation.approved_by, Some(UserId::new(1)));
        assert_eq!(
            count(&pool, "SELECT COUNT(*) FROM audit_logs WHERE action = 'Approve'").await?,
            1
        );

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn overlapping_room_reservation_is_rejected_without_writes(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        insert_user(&pool, 8, "bob@example.com").await?;
        let repo = repo(pool.clone());

        let id = repo
            .create(room_event(1, 7, at(10, 0), at(11, 0)))
            .await?;
        repo.approve(ApproveReservation::new(id, UserId::new(1)))
            .await?;

        let res = repo.create(room_event(1, 8, at(10, 30), at(11, 30))).await;
        assert!(matches!(
            res,
            Err(AppError::ReservationConflict(ConflictKind::RoomBusy))
        ));

        // 失敗した create は行数を一切変えない
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM reservations").await?, 1);
        assert_eq!(
            count(&pool, "SELECT COUNT(*) FROM audit_logs WHERE action = 'Create'").await?,
            1
        );

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn abutting_reservation_is_accepted(pool: sqlx::PgPool) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        insert_user(&pool, 8, "bob@example.com").await?;
        let repo = repo(pool.clone());

        let id = repo
            .create(room_event(1, 7, at(10, 0), at(11, 0)))
            .await?;
        repo.approve(ApproveReservation::new(id, UserId::new(1)))
            .await?;

        // 既存の終了時刻ちょうどから始まる予約は重ならない（半開区間）
        let abutting = repo
            .create(room_event(1, 8, at(11, 0), at(12, 0)))
            .await?;
        let reservation = repo.find_by_id(abutting).await?;
        assert_eq!(reservation.status, ReservationStatus::Pending);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn cancel_is_idempotent_and_audits_once(pool: sqlx::PgPool) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        let repo = repo(pool.clone());

        let id = repo
            .create(room_event(1, 7, at(10, 0), at(11, 0)))
            .await?;
        repo.cancel(CancelReservation::new(id, UserId::new(7), false))
            .await?;

        let reservation = repo.find_by_id(id).await?;
        assert_eq!(reservation.status, ReservationStatus::Cancelled);

        // 2 回目の取り消しは成功を返すが、監査ログは増えない
        repo.cancel(CancelReservation::new(id, UserId::new(7), false))
            .await?;
        assert_eq!(
            count(&pool, "SELECT COUNT(*) FROM audit_logs WHERE action = 'Cancel'").await?,
            1
        );

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn cancel_requires_owner_or_admin(pool: sqlx::PgPool) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        insert_user(&pool, 8, "bob@example.com").await?;
        let repo = repo(pool.clone());

        let id = repo
            .create(room_event(1, 7, at(10, 0), at(11, 0)))
            .await?;

        // 他人の予約は取り消せない
        let res = repo
            .cancel(CancelReservation::new(id, UserId::new(8), false))
            .await;
        assert!(matches!(res, Err(AppError::ForbiddenOperation)));

        // 管理者なら取り消せる（承認済みでも同様）
        repo.approve(ApproveReservation::new(id, UserId::new(1)))
            .await?;
        repo.cancel(CancelReservation::new(id, UserId::new(1), true))
            .await?;
        let reservation = repo.find_by_id(id).await?;
        assert_eq!(reservation.status, ReservationStatus::Cancelled);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn approve_after_decision_is_invalid_transition(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        let repo = repo(pool.clone());

        let id = repo
            .create(room_event(1, 7, at(10, 0), at(11, 0)))
            .await?;
        repo.reject(RejectReservation::new(
            id,
            UserId::new(1),
            Some("別件と重複しているため".into()),
        ))
        .await?;

        let res = repo
            .approve(ApproveReservation::new(id, UserId::new(1)))
            .await;
        assert!(matches!(res, Err(AppError::InvalidTransition { .. })));

        let reservation = repo.find_by_id(id).await?;
        assert_eq!(reservation.status, ReservationStatus::Rejected);
        assert_eq!(
            reservation.rejection_reason.as_deref(),
            Some("別件と重複しているため")
        );

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn rejected_reservation_does_not_block_the_slot(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        insert_user(&pool, 8, "bob@example.com").await?;
        let repo = repo(pool.clone());

        let id = repo
            .create(room_event(1, 7, at(10, 0), at(11, 0)))
            .await?;
        repo.reject(RejectReservation::new(id, UserId::new(1), None))
            .await?;

        // 却下済みは衝突しないので、同じ枠をもう一度予約できる
        let retry = repo
            .create(room_event(1, 8, at(10, 0), at(11, 0)))
            .await?;
        assert_ne!(retry, id);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn maintenance_window_blocks_overlapping_reservations(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        sqlx::query(
            r#"
            INSERT INTO maintenance_windows (room_id, start_time, end_time, reason)
            VALUES (2, $1, $2, '空調設備の点検')
            "#,
        )
        .bind(at(14, 0))
        .bind(at(15, 0))
        .execute(&pool)
        .await?;
        let repo = repo(pool.clone());

        let res = repo.create(room_event(2, 7, at(14, 30), at(15, 30))).await;
        assert!(matches!(
            res,
            Err(AppError::ReservationConflict(ConflictKind::Maintenance))
        ));

        // 枠の終了時刻ちょうどからなら予約できる
        let id = repo
            .create(room_event(2, 7, at(15, 0), at(16, 0)))
            .await?;
        let reservation = repo.find_by_id(id).await?;
        assert_eq!(reservation.status, ReservationStatus::Pending);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn shared_equipment_conflicts_across_rooms(pool: sqlx::PgPool) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        insert_user(&pool, 8, "bob@example.com").await?;
        let repo = repo(pool.clone());

        // 備品のみの予約。部屋は選ばない
        let equipment_only = CreateReservation::new(
            None,
            vec![EquipmentId::new(1)],
            UserId::new(7),
            at(10, 0),
            at(11, 0),
            "撮影機材の持ち出し".into(),
        );
        let id = repo.create(equipment_only).await?;

        let reservation = repo.find_by_id(id).await?;
        assert!(reservation.room.is_none());

        // 別の部屋の予約でも、同じ備品を含んでいれば衝突する
        let with_same_equipment = CreateReservation::new(
            Some(RoomId::new(2)),
            vec![EquipmentId::new(1), EquipmentId::new(3)],
            UserId::new(8),
            at(10, 30),
            at(11, 30),
            "営業部との打ち合わせ".into(),
        );
        let res = repo.create(with_same_equipment).await;
        assert!(matches!(
            res,
            Err(AppError::ReservationConflict(ConflictKind::EquipmentBusy))
        ));

        // 時間帯がずれていれば同じ備品でも予約できる
        let later = CreateReservation::new(
            Some(RoomId::new(2)),
            vec![EquipmentId::new(1)],
            UserId::new(8),
            at(11, 0),
            at(12, 0),
            "営業部との打ち合わせ".into(),
        );
        assert!(repo.create(later).await.is_ok());

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn start_time_within_margin_is_past_time(pool: sqlx::PgPool) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        let repo = repo(pool.clone());

        // 固定時計は 2030-01-01T00:00:00Z。30 秒後の開始は弾かれる
        let res = repo
            .create(room_event(
                1,
                7,
                Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 30).unwrap(),
                at(1, 0),
            ))
            .await;
        assert!(matches!(
            res,
            Err(AppError::ReservationConflict(ConflictKind::PastTime))
        ));

        // 2 分後なら通る
        let id = repo
            .create(room_event(
                1,
                7,
                Utc.with_ymd_and_hms(2030, 1, 1, 0, 2, 0).unwrap(),
                at(1, 0),
            ))
            .await?;
        assert!(repo.find_by_id(id).await.is_ok());

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn projections_are_ordered_by_start_time_descending(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        let repo = repo(pool.clone());

        repo.create(room_event(1, 7, at(9, 0), at(10, 0))).await?;
        repo.create(room_event(1, 7, at(13, 0), at(14, 0))).await?;
        repo.create(room_event(1, 7, at(11, 0), at(12, 0))).await?;

        let reservations = repo.find_for_room(RoomId::new(1)).await?;
        assert_eq!(reservations.len(), 3);
        let starts: Vec<_> = reservations.iter().map(|r| r.start_time).collect();
        assert_eq!(starts, vec![at(13, 0), at(11, 0), at(9, 0)]);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn find_for_equipment_lists_reservations_descending(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        let repo = repo(pool.clone());

        let first = CreateReservation::new(
            None,
            vec![EquipmentId::new(2)],
            UserId::new(7),
            at(9, 0),
            at(10, 0),
            "社内イベントの音響".into(),
        );
        let second = CreateReservation::new(
            Some(RoomId::new(1)),
            vec![EquipmentId::new(2)],
            UserId::new(7),
            at(13, 0),
            at(14, 0),
            "全体会議の音響確認".into(),
        );
        repo.create(first).await?;
        repo.create(second).await?;

        let reservations = repo.find_for_equipment(EquipmentId::new(2)).await?;
        assert_eq!(reservations.len(), 2);
        assert_eq!(reservations[0].start_time, at(13, 0));
        assert_eq!(reservations[1].start_time, at(9, 0));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn audit_logs_cannot_be_updated_or_deleted(pool: sqlx::PgPool) -> anyhow::Result<()> {
        insert_user(&pool, 7, "alice@example.com").await?;
        let repo = repo(pool.clone());

        let id = repo
            .create(room_event(1, 7, at(10, 0), at(11, 0)))
            .await?;

        let update = sqlx::query("UPDATE audit_logs SET action = 'Approve' WHERE entity_id = $1")
            .bind(id.raw())
            .execute(&pool)
            .await;
        assert!(update.is_err());

        let delete = sqlx::query("DELETE FROM audit_logs WHERE entity_id = $1")
            .bind(id.raw())
            .execute(&pool)
            .await;
        assert!(delete.is_err());

        Ok(())
    }
}
