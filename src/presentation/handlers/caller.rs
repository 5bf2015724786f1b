use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::UserId;

/// Header set by the authenticating gateway in front of this service.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The identity of the caller, if the gateway supplied one.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<UserId>);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(UserId::new);
        Ok(Caller(user_id))
    }
}
