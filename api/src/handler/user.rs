use crate::{
    extractor::AuthorizedUser,
    model::user::{CreateUserRequest, UserResponse},
};
use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_user(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateUserRequest>,
) -> Result<StatusCode, AppError> {
    req.validate(&())?;

    registry.user_repository().create(req.into()).await?;

    Ok(StatusCode::CREATED)
}

pub async fn get_current_user(user: AuthorizedUser) -> AppResult<Json<UserResponse>> {
    Ok(Json(UserResponse::from(user.user)))
}
