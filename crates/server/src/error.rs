use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use teamroster_api::ServiceError;

/// Unified handler error.
///
/// Renders as a status code with a plain-text body; there is no structured
/// error payload.
#[derive(Debug)]
pub struct ApiErr {
    status: StatusCode,
    message: String,
}

impl ApiErr {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl From<ServiceError> for ApiErr {
    fn from(err: ServiceError) -> Self {
        if let ServiceError::Internal(detail) = &err {
            tracing::error!("{detail}");
            return Self::internal("internal server error");
        }
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            message: err.message().to_string(),
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}
