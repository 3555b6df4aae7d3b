// Credit Request - API Server
// JSON endpoints over the mask engine, the identifier validator and the schema

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use credit_request::{
    format, format_cents, init_logging, is_valid_identifier, unformat, CreditRequest,
    FieldDefinition, FieldRegistry, FormSession, IdentifierKind, MaskKind, Settings,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
struct AppState {
    registry: Arc<FieldRegistry>,
}

/// API Response wrapper
#[derive(Serialize, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

#[derive(Deserialize)]
struct MaskRequest {
    kind: MaskKind,
    value: String,
}

#[derive(Serialize, Deserialize)]
struct MaskResponse {
    kind: MaskKind,
    raw: String,
    display: String,
}

#[derive(Serialize, Deserialize)]
struct IdentifierResponse {
    digits: String,
    display: String,
    kind: Option<IdentifierKind>,
    valid: bool,
}

#[derive(Serialize, Deserialize)]
struct CentsResponse {
    raw: String,
    display: String,
}

#[derive(Serialize, Deserialize)]
struct ValidateResponse {
    valid: bool,
    errors: Vec<ValidationError>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/fields - Form fields with labels, masks and rules
async fn get_fields(State(state): State<AppState>) -> impl IntoResponse {
    let fields: Vec<FieldDefinition> = state.registry.all().into_iter().cloned().collect();
    Json(ApiResponse::ok(fields))
}

/// POST /api/mask - Raw digits and display string for one keystroke state
async fn mask_value(Json(body): Json<MaskRequest>) -> impl IntoResponse {
    let raw = credit_request::mask::to_raw(&body.value, body.kind);
    let display = format(&raw, body.kind);

    Json(ApiResponse::ok(MaskResponse {
        kind: body.kind,
        raw,
        display,
    }))
}

/// GET /api/identifier/:value - CPF / CNPJ check
async fn check_identifier(Path(value): Path<String>) -> impl IntoResponse {
    let digits = unformat(&value);

    Json(ApiResponse::ok(IdentifierResponse {
        display: format(&digits, MaskKind::Identifier),
        kind: IdentifierKind::detect(&digits),
        valid: is_valid_identifier(&digits),
        digits,
    }))
}

/// GET /api/cents/:raw - pt-BR amount display
async fn format_amount(Path(raw): Path<String>) -> impl IntoResponse {
    Json(ApiResponse::ok(CentsResponse {
        display: format_cents(&raw),
        raw: unformat(&raw),
    }))
}

/// POST /api/validate - Validate a full credit request
async fn validate_request(Json(request): Json<CreditRequest>) -> impl IntoResponse {
    let session = FormSession::from_request(&request);
    let errors: Vec<ValidationError> = session.errors().into_iter().cloned().collect();

    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    tracing::info!(valid = errors.is_empty(), failed = errors.len(), "validated credit request");

    (
        status,
        Json(ApiResponse::ok(ValidateResponse {
            valid: errors.is_empty(),
            errors,
        })),
    )
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/fields", get(get_fields))
        .route("/mask", post(mask_value))
        .route("/identifier/:value", get(check_identifier))
        .route("/cents/:raw", get(format_amount))
        .route("/validate", post(validate_request))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    init_logging(&settings);

    let state = AppState {
        registry: Arc::new(FieldRegistry::new()),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(settings.server_addr).await?;
    tracing::info!(addr = %settings.server_addr, "credit request API listening");

    axum::serve(listener, app).await?;
    Ok(())
}
