use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        auth::auth_handler,
        bookings::{admin_bookings_handler, booking_handler},
        payments::{payment_callback_handler, payment_handler},
        properties::{admin_properties_handler, property_handler, public_property_handler},
        users::{admin_users_handler, users_handler},
    },
    middleware::{auth, role_check},
    models::usermodel::UserRole,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let property_routes = Router::new()
        .merge(property_handler().layer(middleware::from_fn(auth)))
        .merge(public_property_handler());

    let payment_routes = Router::new()
        .merge(payment_handler().layer(middleware::from_fn(auth)))
        .merge(payment_callback_handler());

    // Everything under /admin goes through auth and then the admin gate.
    let admin_routes = Router::new()
        .nest("/users", admin_users_handler())
        .nest("/properties", admin_properties_handler())
        .nest("/bookings", admin_bookings_handler())
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
        .layer(middleware::from_fn(auth));

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest("/properties", property_routes)
        .nest("/bookings", booking_handler().layer(middleware::from_fn(auth)))
        .nest("/payments", payment_routes)
        .nest("/admin", admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
