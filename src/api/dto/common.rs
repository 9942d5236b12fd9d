//! Common API DTOs and error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Error body for every non-200 response.
///
/// The message is one of the fixed taxonomy strings; backing-store
/// detail goes to the log, never to the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// `invalid bounds` | `area too large` | `query timed out` | `internal error`
    pub error: String,
}

/// Domain error carried out of a handler, mapped onto the HTTP taxonomy.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::InvalidBounds(detail) => {
                warn!("Rejected request: {}", detail);
                (StatusCode::BAD_REQUEST, "invalid bounds")
            }
            DomainError::AreaTooLarge { area, max } => {
                warn!("Rejected request: bbox area {:.4} > max {:.4}", area, max);
                (StatusCode::BAD_REQUEST, "area too large")
            }
            DomainError::QueryTimeout => {
                warn!("Bounding-box query exceeded its statement budget");
                (StatusCode::GATEWAY_TIMEOUT, "query timed out")
            }
            DomainError::Database(detail) => {
                error!("Backing-store failure: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        };
        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
