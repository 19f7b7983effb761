use crate::db::{
    DbDuplicate, DbMediaItem, DbVaultFile, DuplicateSummary, NewMediaItem, NewVaultFile,
};
use crate::library::{LibraryError, SharedLibraryManager};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// API server state
#[derive(Clone)]
pub struct ApiState {
    pub library_manager: SharedLibraryManager,
}

/// Error body returned with every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScanResponse {
    pub count: usize,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnlockRequest {
    pub pin: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnlockResponse {
    pub unlocked: bool,
}

/// A failed request: a fixed client-facing message plus the cause, which is
/// only logged
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
    source: LibraryError,
}

impl ApiError {
    fn wrap(message: &'static str) -> impl FnOnce(LibraryError) -> ApiError {
        move |source| ApiError { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("{}: {}", self.message, self.source);
        let body = ErrorResponse {
            error: self.message.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn success() -> Json<SuccessResponse> {
    Json(SuccessResponse { success: true })
}

/// Create the API router
pub fn create_router(library_manager: SharedLibraryManager) -> Router {
    let state = ApiState { library_manager };
    Router::new()
        .route("/api/duplicates", get(get_duplicates))
        .route("/api/duplicates/summary", get(get_duplicate_summary))
        .route("/api/duplicates/scan", post(scan_duplicates))
        .route("/api/duplicates/:id", delete(delete_duplicate))
        .route("/api/duplicates/:id/ignore", patch(ignore_duplicate))
        .route("/api/media", get(get_media).post(add_media))
        .route("/api/vault/files", get(get_vault_files).post(add_vault_file))
        .route("/api/vault/files/:id", delete(delete_vault_file))
        .route("/api/vault/unlock", post(unlock_vault))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_duplicates(State(state): State<ApiState>) -> ApiResult<Vec<DbDuplicate>> {
    state
        .library_manager
        .get()
        .get_duplicates()
        .await
        .map(Json)
        .map_err(ApiError::wrap("Failed to fetch duplicates"))
}

async fn get_duplicate_summary(State(state): State<ApiState>) -> ApiResult<DuplicateSummary> {
    state
        .library_manager
        .get()
        .get_duplicate_summary()
        .await
        .map(Json)
        .map_err(ApiError::wrap("Failed to fetch duplicates"))
}

async fn scan_duplicates(State(state): State<ApiState>) -> ApiResult<ScanResponse> {
    let count = state
        .library_manager
        .get()
        .scan_for_duplicates()
        .await
        .map_err(ApiError::wrap("Failed to scan for duplicates"))?;

    Ok(Json(ScanResponse {
        count,
        message: format!("Found {} duplicates", count),
    }))
}

async fn delete_duplicate(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<SuccessResponse> {
    state
        .library_manager
        .get()
        .delete_duplicate(&id)
        .await
        .map_err(ApiError::wrap("Failed to delete duplicate"))?;
    Ok(success())
}

async fn ignore_duplicate(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<SuccessResponse> {
    state
        .library_manager
        .get()
        .ignore_duplicate(&id)
        .await
        .map_err(ApiError::wrap("Failed to ignore duplicate"))?;
    Ok(success())
}

async fn get_media(State(state): State<ApiState>) -> ApiResult<Vec<DbMediaItem>> {
    state
        .library_manager
        .get()
        .get_media()
        .await
        .map(Json)
        .map_err(ApiError::wrap("Failed to fetch media items"))
}

async fn add_media(
    State(state): State<ApiState>,
    Json(item): Json<NewMediaItem>,
) -> ApiResult<DbMediaItem> {
    state
        .library_manager
        .get()
        .add_media(item)
        .await
        .map(Json)
        .map_err(ApiError::wrap("Failed to add media item"))
}

async fn get_vault_files(State(state): State<ApiState>) -> ApiResult<Vec<DbVaultFile>> {
    state
        .library_manager
        .get()
        .get_vault_files()
        .await
        .map(Json)
        .map_err(ApiError::wrap("Failed to fetch vault files"))
}

async fn add_vault_file(
    State(state): State<ApiState>,
    Json(file): Json<NewVaultFile>,
) -> ApiResult<DbVaultFile> {
    state
        .library_manager
        .get()
        .add_vault_file(file)
        .await
        .map(Json)
        .map_err(ApiError::wrap("Failed to add vault file"))
}

async fn delete_vault_file(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<SuccessResponse> {
    state
        .library_manager
        .get()
        .delete_vault_file(&id)
        .await
        .map_err(ApiError::wrap("Failed to delete vault file"))?;
    Ok(success())
}

async fn unlock_vault(
    State(state): State<ApiState>,
    Json(request): Json<UnlockRequest>,
) -> Json<UnlockResponse> {
    let unlocked = state.library_manager.get().check_vault_pin(&request.pin);
    Json(UnlockResponse { unlocked })
}
