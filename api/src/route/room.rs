use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::room::{
    deactivate_maintenance_window, deactivate_room, register_maintenance_window, register_room,
    show_maintenance_windows, show_room, show_room_list, update_room,
};

pub fn build_room_routers() -> Router<AppRegistry> {
    let room_routers = Router::new()
        .route("/", post(register_room))
        .route("/", get(show_room_list))
        .route("/:room_id", get(show_room))
        .route("/:room_id", put(update_room))
        .route("/:room_id", delete(deactivate_room))
        .route(
            "/:room_id/maintenance-windows",
            post(register_maintenance_window),
        )
        .route(
            "/:room_id/maintenance-windows",
            get(show_maintenance_windows),
        )
        .route(
            "/:room_id/maintenance-windows/:window_id",
            delete(deactivate_maintenance_window),
        );

    Router::new().nest("/rooms", room_routers)
}
