use crate::{
    extractor::AuthorizedUser,
    model::review::{CreateReviewRequest, ReviewsResponse, UpdateReviewRequest},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{ReviewId, RoomId},
    review::event::{CreateReview, DeleteReview, UpdateReview},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn post_review(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<StatusCode, AppError> {
    req.validate(&())?;

    registry
        .review_repository()
        .create(CreateReview::new(
            req.room_id,
            user.id(),
            req.rating,
            req.comment,
        ))
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn show_reviews_for_room(
    user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReviewsResponse>> {
    let reviews = registry.review_repository().find_by_room_id(room_id).await?;
    Ok(Json(ReviewsResponse::from_reviews(reviews, user.id())))
}

pub async fn show_my_reviews(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReviewsResponse>> {
    let reviews = registry
        .review_repository()
        .find_by_user_id(user.id())
        .await?;
    Ok(Json(ReviewsResponse::from_reviews(reviews, user.id())))
}

pub async fn update_review(
    user: AuthorizedUser,
    Path(review_id): Path<ReviewId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateReviewRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    registry
        .review_repository()
        .update(UpdateReview::new(
            review_id,
            user.id(),
            req.rating,
            req.comment,
        ))
        .await?;

    Ok(StatusCode::OK)
}

pub async fn delete_review(
    user: AuthorizedUser,
    Path(review_id): Path<ReviewId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .review_repository()
        .delete(DeleteReview::new(review_id, user.id(), user.is_admin()))
        .await?;

    Ok(StatusCode::OK)
}
