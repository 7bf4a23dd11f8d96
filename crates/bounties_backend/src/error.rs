use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bounties_registry::BountyError;
use serde_json::json;

#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    /// Registry rejected the operation
    Bounty(BountyError),
    /// Mutating request without a caller identity
    MissingCaller,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Bounty(err) => match err {
                BountyError::InvalidAmount | BountyError::InvalidDeadline => {
                    StatusCode::BAD_REQUEST
                }
                BountyError::BountyNotFound | BountyError::FulfillmentNotFound => {
                    StatusCode::NOT_FOUND
                }
                BountyError::NotIssuer | BountyError::IssuerCannotFulfillOwnBounty => {
                    StatusCode::FORBIDDEN
                }
                BountyError::BountyNotOpen => StatusCode::CONFLICT,
            },
            ApiError::MissingCaller => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Bounty(err) => err.code(),
            ApiError::MissingCaller => "MissingCaller",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Bounty(err) => err.to_string(),
            ApiError::MissingCaller => "Missing caller identity header".into(),
        }
    }
}

impl From<BountyError> for ApiError {
    fn from(err: BountyError) -> Self {
        ApiError::Bounty(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.code(),
            "message": self.message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use bounties_registry::BountyError;

    use super::ApiError;

    #[test]
    fn error_kinds_map_to_status() {
        let cases = [
            (BountyError::InvalidAmount, StatusCode::BAD_REQUEST),
            (BountyError::InvalidDeadline, StatusCode::BAD_REQUEST),
            (BountyError::BountyNotFound, StatusCode::NOT_FOUND),
            (BountyError::FulfillmentNotFound, StatusCode::NOT_FOUND),
            (BountyError::NotIssuer, StatusCode::FORBIDDEN),
            (BountyError::IssuerCannotFulfillOwnBounty, StatusCode::FORBIDDEN),
            (BountyError::BountyNotOpen, StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
        assert_eq!(
            ApiError::MissingCaller.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
