use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    approve_reservation, cancel_reservation, create_reservation, reject_reservation,
    show_reservation, show_reservations_for_equipment, show_reservations_for_room,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservation_routers = Router::new()
        .route("/", post(create_reservation))
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id/approve", post(approve_reservation))
        .route("/:reservation_id/reject", post(reject_reservation))
        .route("/:reservation_id/cancel", post(cancel_reservation))
        .route("/room/:room_id", get(show_reservations_for_room))
        .route(
            "/equipment/:equipment_id",
            get(show_reservations_for_equipment),
        );

    Router::new().nest("/reservations", reservation_routers)
}
