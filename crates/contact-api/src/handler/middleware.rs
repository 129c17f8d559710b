//! Request middleware
//!
//! Guards the message listing with a static operator bearer token. Contact
//! submissions stay public.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use constant_time_eq::constant_time_eq;
use secrecy::ExposeSecret;

use super::{ApiError, AppState};

/// Reject requests that do not carry `Authorization: Bearer <operator token>`
pub async fn require_operator_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorized = bearer_token(request.headers())
        .map(|token| {
            constant_time_eq(
                token.as_bytes(),
                state.operator_token.expose_secret().as_bytes(),
            )
        })
        .unwrap_or(false);

    if !authorized {
        tracing::warn!(
            path = %request.uri().path(),
            "Rejected request without valid operator token"
        );
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(
            bearer_token(&headers("Bearer 0123456789abcdef")),
            Some("0123456789abcdef")
        );
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
    }

    #[test]
    fn test_other_schemes_ignored() {
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
