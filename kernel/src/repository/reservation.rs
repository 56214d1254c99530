use crate::model::{
    id::{EquipmentId, ReservationId, RoomId},
    reservation::{
        event::{ApproveReservation, CancelReservation, CreateReservation, RejectReservation},
        Reservation,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // 予約を申請する。成立すると Pending で保存される
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId>;
    // 管理者が予約を承認する
    async fn approve(&self, event: ApproveReservation) -> AppResult<()>;
    // 管理者が予約を却下する
    async fn reject(&self, event: RejectReservation) -> AppResult<()>;
    // 所有者または管理者が予約を取り消す。取り消し済みなら何もしない
    async fn cancel(&self, event: CancelReservation) -> AppResult<()>;
    // 予約 ID から予約情報を取得する
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation>;
    // 会議室 ID に紐づく予約一覧を開始時刻の新しい順に取得する
    async fn find_for_room(&self, room_id: RoomId) -> AppResult<Vec<Reservation>>;
    // 備品 ID に紐づく予約一覧を開始時刻の新しい順に取得する
    async fn find_for_equipment(&self, equipment_id: EquipmentId) -> AppResult<Vec<Reservation>>;
}
