use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::review::{
    delete_review, post_review, show_my_reviews, show_reviews_for_room, update_review,
};

pub fn build_review_routers() -> Router<AppRegistry> {
    let review_routers = Router::new()
        .route("/", post(post_review))
        .route("/me", get(show_my_reviews))
        .route("/room/:room_id", get(show_reviews_for_room))
        .route("/:review_id", put(update_review))
        .route("/:review_id", delete(delete_review));

    Router::new().nest("/reviews", review_routers)
}
