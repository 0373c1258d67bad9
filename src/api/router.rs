use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::api::handlers::{activity, auth, booking, health};
use crate::state::AppState;
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))

        // Activities (public reads, admin writes)
        .route("/activities", get(activity::list_activities).post(activity::create_activity))
        .route("/activities/{id}", get(activity::get_activity).put(activity::update_activity).delete(activity::delete_activity))
        .route("/activities/{id}/timeslots/{date}", get(activity::get_timeslots))

        // Bookings
        .route("/bookings", post(booking::create_booking))
        .route("/bookings/my-bookings", get(booking::my_bookings))
        .route("/bookings/admin/all", get(booking::list_all_bookings))
        .route("/bookings/admin/activity/{activity_id}", get(booking::list_activity_bookings))
        .route("/bookings/{id}", get(booking::get_booking))
        .route("/bookings/{id}/cancel", put(booking::cancel_booking))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
