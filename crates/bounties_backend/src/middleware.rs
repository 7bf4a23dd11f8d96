use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use bounties_registry::Identity;

use crate::error::ApiError;

/// Header carrying the identity of the account making the call
pub const CALLER_HEADER: &str = "x-caller";

/// Identity of the account calling a mutating route
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::MissingCaller)?;

        Ok(Caller(Identity::new(caller)))
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::FromRequestParts, http::Request};

    use super::{Caller, CALLER_HEADER};
    use crate::error::ApiError;

    #[tokio::test]
    async fn caller_from_header() {
        let (mut parts, _) = Request::builder()
            .header(CALLER_HEADER, " 0xf17f52151EbEF6C7334FAD080c5704D77216b732 ")
            .body(())
            .unwrap()
            .into_parts();

        let Caller(caller) = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(caller.as_str(), "0xf17f52151EbEF6C7334FAD080c5704D77216b732");
    }

    #[tokio::test]
    async fn missing_caller_is_rejected() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let res = Caller::from_request_parts(&mut parts, &()).await;
        assert_eq!(res.unwrap_err(), ApiError::MissingCaller);

        let (mut parts, _) = Request::builder()
            .header(CALLER_HEADER, "   ")
            .body(())
            .unwrap()
            .into_parts();
        let res = Caller::from_request_parts(&mut parts, &()).await;
        assert_eq!(res.unwrap_err(), ApiError::MissingCaller);
    }
}
