use crate::{
    extractor::AuthorizedUser,
    model::equipment::{
        CreateEquipmentRequest, EquipmentResponse, EquipmentsResponse, UpdateEquipmentRequest,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{equipment::event::UpdateEquipment, id::EquipmentId};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_equipment(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateEquipmentRequest>,
) -> Result<StatusCode, AppError> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry.equipment_repository().create(req.into()).await?;

    Ok(StatusCode::CREATED)
}

pub async fn show_equipment_list(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EquipmentsResponse>> {
    registry
        .equipment_repository()
        .find_all()
        .await
        .map(EquipmentsResponse::from)
        .map(Json)
}

pub async fn show_equipment(
    _user: AuthorizedUser,
    Path(equipment_id): Path<EquipmentId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EquipmentResponse>> {
    registry
        .equipment_repository()
        .find_by_id(equipment_id)
        .await
        .and_then(|equipment| match equipment {
            Some(equipment) => Ok(Json(equipment.into())),
            None => Err(AppError::EntityNotFound(format!(
                "備品（{}）が見つかりませんでした。",
                equipment_id
            ))),
        })
}

pub async fn update_equipment(
    user: AuthorizedUser,
    Path(equipment_id): Path<EquipmentId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateEquipmentRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    let UpdateEquipmentRequest { name, room_id } = req;
    registry
        .equipment_repository()
        .update(UpdateEquipment {
            equipment_id,
            name,
            room_id,
        })
        .await?;

    Ok(StatusCode::OK)
}

pub async fn delete_equipment(
    user: AuthorizedUser,
    Path(equipment_id): Path<EquipmentId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry.equipment_repository().delete(equipment_id).await?;

    Ok(StatusCode::OK)
}
