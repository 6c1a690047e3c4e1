//! Axum REST API: handlers and the router.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use nova_core::dashboard::StatusTab;
use nova_core::{
    CardDesign, CustomTemplate, EventStatus, PaymentDetails, PaymentStatus, RsvpStatus,
    TemplateType,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::errors::Result;
use crate::service::{
    ContributeRequest, MappingIndices, NewEvent, NewGuest, NewUser, ProfileUpdate, Registry,
};
use crate::uploads::{BackgroundUploads, PUBLIC_PREFIX};

pub struct ApiState {
    pub registry: Registry,
    pub uploads: BackgroundUploads,
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Deserialize)]
pub struct EventStatusBody {
    pub status: EventStatus,
}

#[derive(Deserialize)]
pub struct PreviewQuery {
    pub width: f64,
    pub height: f64,
}

#[derive(Deserialize)]
pub struct UploadBody {
    pub data_url: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Deserialize)]
pub struct PaymentsBody {
    #[serde(flatten)]
    pub details: PaymentDetails,
    #[serde(default)]
    pub save_as_default: bool,
}

#[derive(Deserialize)]
pub struct TemplatesBody {
    pub templates: Vec<CustomTemplate>,
}

#[derive(Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub tab: StatusTab,
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
pub struct GuestsBody {
    pub guests: Vec<NewGuest>,
}

#[derive(Deserialize)]
pub struct ImportBody {
    pub csv: String,
    pub mapping: MappingIndices,
}

#[derive(Deserialize)]
pub struct CsvBody {
    pub csv: String,
}

#[derive(Deserialize)]
pub struct PaymentStatusBody {
    pub status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

#[derive(Deserialize)]
pub struct RsvpBody {
    pub rsvp_status: RsvpStatus,
}

type AppState = State<Arc<ApiState>>;

// ─────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────

pub fn router(state: Arc<ApiState>) -> Router {
    // Room for a base64 data URL of the largest accepted image.
    let body_limit = state.uploads.max_bytes() / 3 * 4 + 64 * 1024;
    let files = ServeDir::new(state.uploads.dir());

    Router::new()
        .route("/health", get(health))
        // Organizers
        .route("/users", post(register_user))
        .route("/users/:id", get(get_user).patch(update_profile))
        .route("/users/:id/payment-defaults", put(set_payment_defaults))
        .route("/users/:id/events", get(list_events))
        // Events
        .route("/events", post(create_event))
        .route("/events/:id", get(get_event).delete(delete_event))
        .route("/events/:id/status", put(set_event_status))
        .route("/events/:id/card", put(save_card_design))
        .route("/events/:id/card/preview", get(card_preview))
        .route("/events/:id/payments", get(payment_prefill).put(configure_payments))
        .route("/events/:id/templates", get(templates).put(save_templates))
        .route("/backgrounds", post(upload_background))
        // Guests
        .route("/events/:id/guests", get(dashboard).post(add_guests))
        .route("/events/:id/guests/import", post(import_guests))
        .route("/guests/import/preview", post(preview_csv))
        .route("/guests/:id", delete(delete_guest))
        .route("/guests/:id/status", put(set_payment_status))
        .route("/guests/:id/rsvp", put(set_rsvp))
        .route("/guests/:id/check-in", post(check_in))
        .route("/guests/:id/messages/:template_type", get(render_message))
        // Guest-facing
        .route("/contribute/:token", get(contribution_page).post(contribute))
        .route("/contribute/:token/qr.svg", get(guest_qr))
        .nest_service(PUBLIC_PREFIX, files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /users`
pub async fn register_user(
    State(state): AppState,
    Json(body): Json<NewUser>,
) -> Result<impl IntoResponse> {
    let user = state.registry.register_user(body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/:id`
pub async fn get_user(State(state): AppState, Path(id): Path<String>) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.get_user(&id).await?))
}

/// `PATCH /users/:id`
pub async fn update_profile(
    State(state): AppState,
    Path(id): Path<String>,
    Json(body): Json<ProfileUpdate>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.update_profile(&id, body).await?))
}

/// `PUT /users/:id/payment-defaults`
pub async fn set_payment_defaults(
    State(state): AppState,
    Path(id): Path<String>,
    Json(body): Json<PaymentDetails>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.set_payment_defaults(&id, body).await?))
}

/// `GET /users/:id/events`
pub async fn list_events(
    State(state): AppState,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.list_events(&id).await?))
}

/// `POST /events`
pub async fn create_event(
    State(state): AppState,
    Json(body): Json<NewEvent>,
) -> Result<impl IntoResponse> {
    let event = state.registry.create_event(body).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /events/:id`
pub async fn get_event(State(state): AppState, Path(id): Path<String>) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.get_event(&id).await?))
}

/// `DELETE /events/:id`
pub async fn delete_event(
    State(state): AppState,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.registry.delete_event(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /events/:id/status`
pub async fn set_event_status(
    State(state): AppState,
    Path(id): Path<String>,
    Json(body): Json<EventStatusBody>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.set_event_status(&id, body.status).await?))
}

/// `PUT /events/:id/card`
pub async fn save_card_design(
    State(state): AppState,
    Path(id): Path<String>,
    Json(design): Json<CardDesign>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.save_card_design(&id, design).await?))
}

/// `GET /events/:id/card/preview?width=&height=`
pub async fn card_preview(
    State(state): AppState,
    Path(id): Path<String>,
    Query(q): Query<PreviewQuery>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.card_preview(&id, q.width, q.height).await?))
}

/// `POST /backgrounds`
pub async fn upload_background(
    State(state): AppState,
    Json(body): Json<UploadBody>,
) -> Result<impl IntoResponse> {
    let url = state.uploads.save_data_url(&body.data_url).await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}

/// `GET /events/:id/payments`
pub async fn payment_prefill(
    State(state): AppState,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.payment_prefill(&id).await?))
}

/// `PUT /events/:id/payments`
pub async fn configure_payments(
    State(state): AppState,
    Path(id): Path<String>,
    Json(body): Json<PaymentsBody>,
) -> Result<impl IntoResponse> {
    let details = state
        .registry
        .configure_payments(&id, body.details, body.save_as_default)
        .await?;
    Ok(Json(details))
}

/// `GET /events/:id/templates`
pub async fn templates(State(state): AppState, Path(id): Path<String>) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.templates(&id).await?))
}

/// `PUT /events/:id/templates`
pub async fn save_templates(
    State(state): AppState,
    Path(id): Path<String>,
    Json(body): Json<TemplatesBody>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.save_templates(&id, body.templates).await?))
}

/// `GET /events/:id/guests?tab=&q=`
pub async fn dashboard(
    State(state): AppState,
    Path(id): Path<String>,
    Query(q): Query<DashboardQuery>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.dashboard(&id, q.tab, &q.q).await?))
}

/// `POST /events/:id/guests`
pub async fn add_guests(
    State(state): AppState,
    Path(id): Path<String>,
    Json(body): Json<GuestsBody>,
) -> Result<impl IntoResponse> {
    let guests = state.registry.add_guests(&id, body.guests).await?;
    Ok((StatusCode::CREATED, Json(guests)))
}

/// `POST /events/:id/guests/import`
pub async fn import_guests(
    State(state): AppState,
    Path(id): Path<String>,
    Json(body): Json<ImportBody>,
) -> Result<impl IntoResponse> {
    let report = state
        .registry
        .import_guests(&id, &body.csv, body.mapping.into())
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// `POST /guests/import/preview`
pub async fn preview_csv(
    State(state): AppState,
    Json(body): Json<CsvBody>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.preview_csv(&body.csv)?))
}

/// `DELETE /guests/:id`
pub async fn delete_guest(
    State(state): AppState,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.registry.delete_guest(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /guests/:id/status`
pub async fn set_payment_status(
    State(state): AppState,
    Path(id): Path<String>,
    Json(body): Json<PaymentStatusBody>,
) -> Result<impl IntoResponse> {
    let guest = state
        .registry
        .set_payment_status(&id, body.status, body.transaction_id)
        .await?;
    Ok(Json(guest))
}

/// `PUT /guests/:id/rsvp`
pub async fn set_rsvp(
    State(state): AppState,
    Path(id): Path<String>,
    Json(body): Json<RsvpBody>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.set_rsvp(&id, body.rsvp_status).await?))
}

/// `POST /guests/:id/check-in`
pub async fn check_in(State(state): AppState, Path(id): Path<String>) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.check_in(&id).await?))
}

/// `GET /guests/:id/messages/:template_type`
pub async fn render_message(
    State(state): AppState,
    Path((id, template_type)): Path<(String, TemplateType)>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.render_message(&id, template_type).await?))
}

/// `GET /contribute/:token`
pub async fn contribution_page(
    State(state): AppState,
    Path(token): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.contribution_page(&token).await?))
}

/// `POST /contribute/:token`
pub async fn contribute(
    State(state): AppState,
    Path(token): Path<String>,
    Json(body): Json<ContributeRequest>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.registry.contribute(&token, body).await?))
}

/// `GET /contribute/:token/qr.svg`
pub async fn guest_qr(
    State(state): AppState,
    Path(token): Path<String>,
) -> Result<impl IntoResponse> {
    let svg = state.registry.guest_qr_svg(&token).await?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
