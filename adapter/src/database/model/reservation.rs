use anyhow::anyhow;
use kernel::model::{
    id::{ReservationId, RoomId, UserId},
    reservation::{Reservation, ReservationRoom, ReservationStatus},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};
use std::str::FromStr;

/// 状態遷移の判定に使う最小限の型。
/// 予約が存在すればこの型にはまるレコードが 1 件見つかる
#[derive(sqlx::FromRow)]
pub struct ReservationStateRow {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub status: String,
}

impl ReservationStateRow {
    // データベース上の文字列をドメインの列挙型に引き上げる
    pub fn status(&self) -> Result<ReservationStatus, AppError> {
        ReservationStatus::from_str(&self.status).map_err(|_| {
            AppError::ConversionEntityError(anyhow!(
                "不明な予約ステータスです: {}",
                self.status
            ))
        })
    }
}

// 予約の一覧・詳細を取得する際に使う型。
// 備品のみの予約では room_id / room_name が NULL になる
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub room_id: Option<RoomId>,
    pub room_name: Option<String>,
    pub user_id: UserId,
    pub approved_by: Option<UserId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            reservation_id,
            room_id,
            room_name,
            user_id,
            approved_by,
            start_time,
            end_time,
            purpose,
            status,
            rejection_reason,
            created_at,
        } = value;

        let status = ReservationStatus::from_str(&status).map_err(|_| {
            AppError::ConversionEntityError(anyhow!("不明な予約ステータスです: {}", status))
        })?;

        // LEFT JOIN の結果、会議室付きの予約なら両方が Some になる
        let room = match (room_id, room_name) {
            (Some(room_id), Some(room_name)) => Some(ReservationRoom { room_id, room_name }),
            _ => None,
        };

        Ok(Reservation {
            reservation_id,
            room,
            reserved_by: user_id,
            approved_by,
            start_time,
            end_time,
            purpose,
            status,
            rejection_reason,
            created_at,
        })
    }
}
