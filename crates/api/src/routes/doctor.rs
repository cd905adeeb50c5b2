use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/doctors",
            get(handlers::doctor::list_doctors).post(handlers::doctor::create_doctor),
        )
        .route(
            "/api/doctors/:id",
            get(handlers::doctor::get_doctor)
                .put(handlers::doctor::update_doctor)
                .delete(handlers::doctor::delete_doctor),
        )
        .route(
            "/api/doctors/:id/appointments",
            get(handlers::appointment::list_doctor_appointments),
        )
}
