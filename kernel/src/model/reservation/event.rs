use crate::model::id::{EquipmentId, ReservationId, RoomId, UserId};
use chrono::{DateTime, Duration, Utc};
use derive_new::new;
use shared::error::{AppError, AppResult};

// 1 回の予約で認める最長の長さ
const MAX_RESERVATION_HOURS: i64 = 8;

#[derive(new)]
pub struct CreateReservation {
    pub room_id: Option<RoomId>,
    pub equipment_ids: Vec<EquipmentId>,
    pub reserved_by: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: String,
}

impl CreateReservation {
    /// 形の検証のみを行う。時間帯の衝突や過去時刻の判定は
    /// availability モジュール側の責務
    pub fn validate(&self) -> AppResult<()> {
        let purpose = self.purpose.trim();
        if !(5..=200).contains(&purpose.chars().count()) {
            return Err(AppError::ValidationFailed {
                field: "purpose",
                detail: "利用目的は 5〜200 文字で入力してください。".into(),
            });
        }

        // ちょうど 8 時間は許可する
        if self.end_time - self.start_time > Duration::hours(MAX_RESERVATION_HOURS) {
            return Err(AppError::ValidationFailed {
                field: "endTime",
                detail: format!(
                    "予約は {} 時間以内にしてください。",
                    MAX_RESERVATION_HOURS
                ),
            });
        }

        Ok(())
    }
}

#[derive(new)]
pub struct ApproveReservation {
    pub reservation_id: ReservationId,
    pub approved_by: UserId,
}

#[derive(new)]
pub struct RejectReservation {
    pub reservation_id: ReservationId,
    pub rejected_by: UserId,
    pub reason: Option<String>,
}

#[derive(new)]
pub struct CancelReservation {
    pub reservation_id: ReservationId,
    pub requested_by: UserId,
    // 管理者かどうかは呼び出し側が判定して渡す
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(start: DateTime<Utc>, end: DateTime<Utc>, purpose: &str) -> CreateReservation {
        CreateReservation::new(
            Some(RoomId::new(1)),
            vec![],
            UserId::new(7),
            start,
            end,
            purpose.into(),
        )
    }

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, hour, min, sec).unwrap()
    }

    #[test]
    fn purpose_is_trimmed_before_length_check() {
        let e = event(at(10, 0, 0), at(11, 0, 0), "   四文字分   ");
        assert!(matches!(
            e.validate(),
            Err(AppError::ValidationFailed { field: "purpose", .. })
        ));

        let e = event(at(10, 0, 0), at(11, 0, 0), "  週次定例会  ");
        assert!(e.validate().is_ok());
    }

    #[test]
    fn purpose_longer_than_200_chars_is_rejected() {
        let e = event(at(10, 0, 0), at(11, 0, 0), &"あ".repeat(201));
        assert!(matches!(
            e.validate(),
            Err(AppError::ValidationFailed { field: "purpose", .. })
        ));

        let e = event(at(10, 0, 0), at(11, 0, 0), &"あ".repeat(200));
        assert!(e.validate().is_ok());
    }

    #[test]
    fn exactly_eight_hours_passes_but_one_second_more_fails() {
        let e = event(at(9, 0, 0), at(17, 0, 0), "終日ワークショップ");
        assert!(e.validate().is_ok());

        let e = event(at(9, 0, 0), at(17, 0, 1), "終日ワークショップ");
        assert!(matches!(
            e.validate(),
            Err(AppError::ValidationFailed { field: "endTime", .. })
        ));
    }
}
