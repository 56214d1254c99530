use crate::model::id::{EquipmentId, ReservationId, RoomId};
use chrono::{DateTime, Duration, Utc};
use derive_new::new;
use shared::error::ConflictKind;

/// 空き判定にかける予約候補。excluded は編集時に自分自身を
/// 衝突対象から外すためのもので、新規作成では None を渡す
#[derive(Debug, new)]
pub struct BookingCandidate {
    pub room_id: Option<RoomId>,
    pub equipment_ids: Vec<EquipmentId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub excluded: Option<ReservationId>,
}

/// 衝突の内容。offending には衝突相手（予約またはメンテナンス枠）の
/// ID が入る。入力そのものの問題（InvalidRange など）では None
#[derive(Debug)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub offending: Option<i64>,
}

impl Conflict {
    pub fn of(kind: ConflictKind) -> Self {
        Self {
            kind,
            offending: None,
        }
    }
}

/// 半開区間 [a_start, a_end) と [b_start, b_end) の重なり判定。
/// 端がちょうど接する場合（a_end == b_start）は重ならない扱い
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// SQL を発行する前に決着がつく検査。違反を見つけた時点で打ち切る。
/// 判定順は InvalidRange → PastTime → NothingSelected
pub fn precheck(candidate: &BookingCandidate, now: DateTime<Utc>) -> Option<Conflict> {
    if candidate.end_time <= candidate.start_time {
        return Some(Conflict::of(ConflictKind::InvalidRange));
    }

    // 開始時刻には 1 分の余裕を要求する
    if candidate.start_time <= now + Duration::minutes(1) {
        return Some(Conflict::of(ConflictKind::PastTime));
    }

    if candidate.room_id.is_none() && candidate.equipment_ids.is_empty() {
        return Some(Conflict::of(ConflictKind::NothingSelected));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, hour, min, sec).unwrap()
    }

    fn candidate(start: DateTime<Utc>, end: DateTime<Utc>) -> BookingCandidate {
        BookingCandidate::new(Some(RoomId::new(1)), vec![], start, end, None)
    }

    #[test]
    fn abutting_intervals_do_not_overlap() {
        // 既存 [10:00, 11:00) に対して [11:00, 12:00) はちょうど接する
        assert!(!overlaps(at(11, 0, 0), at(12, 0, 0), at(10, 0, 0), at(11, 0, 0)));
        assert!(!overlaps(at(9, 0, 0), at(10, 0, 0), at(10, 0, 0), at(11, 0, 0)));
    }

    #[test]
    fn partial_and_containing_intervals_overlap() {
        assert!(overlaps(at(10, 30, 0), at(11, 30, 0), at(10, 0, 0), at(11, 0, 0)));
        assert!(overlaps(at(9, 0, 0), at(12, 0, 0), at(10, 0, 0), at(11, 0, 0)));
        assert!(overlaps(at(10, 15, 0), at(10, 45, 0), at(10, 0, 0), at(11, 0, 0)));
    }

    #[test]
    fn zero_length_interval_is_invalid_range() {
        let now = at(8, 0, 0);
        let c = candidate(at(10, 0, 0), at(10, 0, 0));
        assert!(matches!(
            precheck(&c, now).map(|c| c.kind),
            Some(ConflictKind::InvalidRange)
        ));
    }

    #[test]
    fn start_within_one_minute_margin_is_past_time() {
        let now = at(10, 0, 0);

        // now + 30 秒は余裕が足りない
        let c = candidate(at(10, 0, 30), at(11, 0, 0));
        assert!(matches!(
            precheck(&c, now).map(|c| c.kind),
            Some(ConflictKind::PastTime)
        ));

        // ちょうど 1 分もまだ足りない（margin は超えなければならない）
        let c = candidate(at(10, 1, 0), at(11, 0, 0));
        assert!(matches!(
            precheck(&c, now).map(|c| c.kind),
            Some(ConflictKind::PastTime)
        ));

        // now + 2 分は通る
        let c = candidate(at(10, 2, 0), at(11, 0, 0));
        assert!(precheck(&c, now).is_none());
    }

    #[test]
    fn empty_selection_is_reported_last() {
        let now = at(8, 0, 0);
        let c = BookingCandidate::new(None, vec![], at(10, 0, 0), at(11, 0, 0), None);
        assert!(matches!(
            precheck(&c, now).map(|c| c.kind),
            Some(ConflictKind::NothingSelected)
        ));

        // 範囲が壊れていれば NothingSelected より先に InvalidRange
        let c = BookingCandidate::new(None, vec![], at(11, 0, 0), at(10, 0, 0), None);
        assert!(matches!(
            precheck(&c, now).map(|c| c.kind),
            Some(ConflictKind::InvalidRange)
        ));
    }

    #[test]
    fn equipment_only_selection_passes_precheck() {
        let now = at(8, 0, 0);
        let c = BookingCandidate::new(
            None,
            vec![EquipmentId::new(3)],
            at(10, 0, 0),
            at(11, 0, 0),
            None,
        );
        assert!(precheck(&c, now).is_none());
    }
}
