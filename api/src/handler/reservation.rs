use crate::{
    extractor::AuthorizedUser,
    model::reservation::{
        CreateReservationRequest, RejectReservationRequest, ReservationResponse,
        ReservationsResponse,
    },
};
use adapter::calendar::CalendarEvent;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{EquipmentId, ReservationId, RoomId},
    reservation::{
        event::{ApproveReservation, CancelReservation, CreateReservation, RejectReservation},
        Reservation,
    },
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn create_reservation(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate(&())?;

    let event = CreateReservation::new(
        req.room_id,
        req.equipment_ids,
        user.id(),
        req.start_time,
        req.end_time,
        req.purpose,
    );

    // -------------------------
    // ① 予約作成（衝突があればここで Err になる）
    // -------------------------
    let reservation_id = registry.reservation_repository().create(event).await?;

    // -------------------------
    // ② 確定した予約を読み直してカレンダーへ反映
    // -------------------------
    let reservation = registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await?;
    emit_calendar_mirror(&registry, &reservation).await;

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse::from(reservation)),
    ))
}

pub async fn approve_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    // 承認できるのは管理者のみ。判定はここで行い、コアには結果だけを渡す
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .reservation_repository()
        .approve(ApproveReservation::new(reservation_id, user.id()))
        .await?;

    // 承認済みになった予約もカレンダーへ反映する
    let reservation = registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await?;
    emit_calendar_mirror(&registry, &reservation).await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn reject_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<RejectReservationRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .reservation_repository()
        .reject(RejectReservation::new(reservation_id, user.id(), req.reason))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn cancel_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    // 所有者かどうかの判定はコア側で行う。ここでは管理者フラグだけ渡す
    registry
        .reservation_repository()
        .cancel(CancelReservation::new(
            reservation_id,
            user.id(),
            user.is_admin(),
        ))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn show_reservation(
    _user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn show_reservations_for_room(
    _user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_for_room(room_id)
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_reservations_for_equipment(
    _user: AuthorizedUser,
    Path(equipment_id): Path<EquipmentId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_for_equipment(equipment_id)
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

// ----------------------------------------------
// カレンダー反映処理
// ----------------------------------------------
// 所有者のアクセストークンと会議室名をここで解決し、
// 送信だけをディスパッチャに流す。失敗しても予約操作は失敗させない
async fn emit_calendar_mirror(registry: &AppRegistry, reservation: &Reservation) {
    let token = match registry
        .user_repository()
        .find_calendar_token(reservation.reserved_by)
        .await
    {
        Ok(Some(token)) => token,
        // カレンダー未連携のユーザーは何もしない
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(
                error.message = %e,
                "カレンダー連携トークンの取得に失敗しました"
            );
            return;
        }
    };

    let room_name = reservation
        .room
        .as_ref()
        .map(|room| room.room_name.clone());

    registry.calendar_dispatcher().dispatch(CalendarEvent {
        access_token: token,
        summary: format!(
            "予約: {}",
            room_name.as_deref().unwrap_or("備品レンタル")
        ),
        description: format!("目的: {}", reservation.purpose),
        location: room_name,
        start_time: reservation.start_time,
        end_time: reservation.end_time,
    });
}
