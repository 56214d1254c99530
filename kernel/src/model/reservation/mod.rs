use crate::model::id::{ReservationId, RoomId, UserId};
use chrono::{DateTime, Utc};
use strum::{AsRefStr, EnumString};

pub mod availability;
pub mod event;

/// 予約のライフサイクル。遷移は
///
/// ```text
///            ┌─（管理者が承認）─▶ Approved ─（所有者/管理者が取消）─▶ Cancelled
///  Pending ──┤
///            ├─（管理者が却下）─▶ Rejected   （終端）
///            └─（所有者が取消）─▶ Cancelled  （終端）
/// ```
///
/// に限られる。文字列比較を散らばらせず、必ず can_transition を通すこと。
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ReservationStatus {
    pub fn can_transition(self, to: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, to),
            (Pending, Approved) | (Pending, Rejected) | (Pending, Cancelled) | (Approved, Cancelled)
        )
    }

    // Cancelled / Rejected は他の予約と衝突しない
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReservationStatus::Rejected | ReservationStatus::Cancelled
        )
    }
}

#[derive(Debug)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub room: Option<ReservationRoom>,
    pub reserved_by: UserId,
    pub approved_by: Option<UserId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: String,
    pub status: ReservationStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

// 備品のみの予約では room が None になる
#[derive(Debug)]
pub struct ReservationRoom {
    pub room_id: RoomId,
    pub room_name: String,
}

#[cfg(test)]
mod tests {
    use super::ReservationStatus::*;

    #[test]
    fn pending_can_move_to_every_decision() {
        assert!(Pending.can_transition(Approved));
        assert!(Pending.can_transition(Rejected));
        assert!(Pending.can_transition(Cancelled));
    }

    #[test]
    fn approved_can_only_be_cancelled() {
        assert!(Approved.can_transition(Cancelled));
        assert!(!Approved.can_transition(Rejected));
        assert!(!Approved.can_transition(Pending));
        assert!(!Approved.can_transition(Approved));
    }

    #[test]
    fn terminal_states_admit_nothing() {
        for terminal in [Rejected, Cancelled] {
            for to in [Pending, Approved, Rejected, Cancelled] {
                assert!(!terminal.can_transition(to));
            }
        }
    }

    #[test]
    fn terminal_statuses_are_exactly_rejected_and_cancelled() {
        assert!(!Pending.is_terminal());
        assert!(!Approved.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(Cancelled.is_terminal());
    }
}
