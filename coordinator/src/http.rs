//! Axum surface: one route per round operation.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use protocol::{Contract, ErrorBody, JoinRequest, SyncRequest, UploadAck, UploadRequest, ValidCodes};

use crate::{coordinator::RoundCoordinator, error::CoordErr};

/// Builds the application router over a shared coordinator.
pub fn router(coordinator: Arc<RoundCoordinator>) -> Router {
    Router::new()
        .route("/join", post(join_handler))
        .route("/sync", post(sync_handler))
        .route("/upload", post(upload_handler))
        .route("/codes", get(codes_handler))
        .with_state(coordinator)
}

/// Boundary conversion: every coordinator error becomes a structured
/// `{"error": ...}` body with its own status code.
impl IntoResponse for CoordErr {
    fn into_response(self) -> Response {
        let status = match self {
            CoordErr::InvalidJoinCode => StatusCode::BAD_REQUEST,
            CoordErr::RoundNotStarted => StatusCode::CONFLICT,
            CoordErr::LengthMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };

        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

async fn join_handler(
    State(coordinator): State<Arc<RoundCoordinator>>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<Contract>, CoordErr> {
    let contract = coordinator.join(&request.join_code, &request.client_identity)?;
    Ok(Json(contract))
}

async fn sync_handler(
    State(coordinator): State<Arc<RoundCoordinator>>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<Contract>, CoordErr> {
    let contract = coordinator.sync(&request.join_code)?;
    Ok(Json(contract))
}

async fn upload_handler(
    State(coordinator): State<Arc<RoundCoordinator>>,
    Json(request): Json<UploadRequest>,
) -> Result<Json<UploadAck>, CoordErr> {
    let ack = coordinator.upload(request)?;
    Ok(Json(ack))
}

async fn codes_handler(State(coordinator): State<Arc<RoundCoordinator>>) -> Json<ValidCodes> {
    Json(ValidCodes {
        valid_codes: coordinator.valid_codes(),
    })
}
