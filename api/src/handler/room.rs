use crate::{
    extractor::AuthorizedUser,
    model::room::{
        CreateMaintenanceWindowRequest, CreateRoomRequest, MaintenanceWindowsResponse,
        RoomListQuery, RoomResponse, RoomsResponse, UpdateRoomRequest,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{MaintenanceWindowId, RoomId},
    maintenance::event::CreateMaintenanceWindow,
    room::event::UpdateRoom,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_room(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<StatusCode, AppError> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry.room_repository().create(req.into()).await?;

    Ok(StatusCode::CREATED)
}

pub async fn show_room_list(
    _user: AuthorizedUser,
    Query(query): Query<RoomListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomsResponse>> {
    let rooms = registry
        .room_repository()
        .find_all(query.include_inactive)
        .await?;

    // 各会議室の備品一覧も合わせて返す
    let mut items = Vec::with_capacity(rooms.len());
    for room in rooms {
        let equipments = registry
            .equipment_repository()
            .find_by_room_id(room.room_id)
            .await?;
        items.push(RoomResponse::from_room(room, equipments));
    }

    Ok(Json(RoomsResponse { items }))
}

pub async fn show_room(
    _user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomResponse>> {
    let room = registry
        .room_repository()
        .find_by_id(room_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("会議室（{}）が見つかりませんでした。", room_id))
        })?;
    let equipments = registry
        .equipment_repository()
        .find_by_room_id(room_id)
        .await?;

    Ok(Json(RoomResponse::from_room(room, equipments)))
}

pub async fn update_room(
    user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateRoomRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    let UpdateRoomRequest {
        name,
        capacity,
        equipment_description,
        is_active,
    } = req;
    registry
        .room_repository()
        .update(UpdateRoom {
            room_id,
            name,
            capacity,
            equipment_description,
            is_active,
        })
        .await?;

    Ok(StatusCode::OK)
}

// 会議室は物理削除せず、予約できない状態にする
pub async fn deactivate_room(
    user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry.room_repository().deactivate(room_id).await?;

    Ok(StatusCode::OK)
}

pub async fn register_maintenance_window(
    user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateMaintenanceWindowRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry
        .maintenance_repository()
        .create(CreateMaintenanceWindow::new(
            room_id,
            req.start_time,
            req.end_time,
            req.reason,
        ))
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn show_maintenance_windows(
    user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MaintenanceWindowsResponse>> {
    // メンテナンス予定は管理者だけが見られる
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .maintenance_repository()
        .find_by_room_id(room_id)
        .await
        .map(MaintenanceWindowsResponse::from)
        .map(Json)
}

pub async fn deactivate_maintenance_window(
    user: AuthorizedUser,
    Path((_room_id, window_id)): Path<(RoomId, MaintenanceWindowId)>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .maintenance_repository()
        .deactivate(window_id)
        .await?;

    Ok(StatusCode::OK)
}
