use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::equipment::{
    delete_equipment, register_equipment, show_equipment, show_equipment_list, update_equipment,
};

pub fn build_equipment_routers() -> Router<AppRegistry> {
    let equipment_routers = Router::new()
        .route("/", post(register_equipment))
        .route("/", get(show_equipment_list))
        .route("/:equipment_id", get(show_equipment))
        .route("/:equipment_id", put(update_equipment))
        .route("/:equipment_id", delete(delete_equipment));

    Router::new().nest("/equipments", equipment_routers)
}
