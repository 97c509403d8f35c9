use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storefront_types::domain::errors::{CartError, DomainError};
use storefront_types::ports::repository::RepoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound { .. } => AppError::NotFound(e.to_string()),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(m) => AppError::BadRequest(m),
            DomainError::InvalidTransition { .. } => AppError::Conflict(e.to_string()),
            DomainError::Cart(c) => c.into(),
        }
    }
}

impl From<CartError> for AppError {
    fn from(e: CartError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, msg) = match &self {
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            AppError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        };

        let body = serde_json::to_string(&ErrorBody { error: msg })
            .unwrap_or_else(|_| "{\"error\":\"internal serialization\"}".into());
        (code, [("content-type", "application/json")], body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_types::domain::order::OrderStatus;
    use storefront_types::domain::role::Role;

    #[test]
    fn maps_lower_layer_errors() {
        let nf: AppError = RepoError::NotFound {
            kind: "order",
            id: 9,
        }
        .into();
        assert!(matches!(nf, AppError::NotFound(ref m) if m == "order 9 not found"));

        let bad: AppError = DomainError::Validation("cart is empty".into()).into();
        assert!(matches!(bad, AppError::BadRequest(_)));

        let conflict: AppError = DomainError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Cancelled,
            role: Role::Merchant,
        }
        .into();
        assert!(matches!(conflict, AppError::Conflict(_)));

        let qty: AppError = CartError::InvalidQuantity(0).into();
        assert!(matches!(qty, AppError::BadRequest(_)));

        let overflow: AppError = DomainError::Cart(CartError::AmountOverflow).into();
        assert!(matches!(overflow, AppError::BadRequest(ref m) if m == "amount overflow"));
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
