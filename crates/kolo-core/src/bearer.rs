//! Bearer-token extraction from the `Authorization` header.

use axum::{
    Json,
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};

use crate::envelope;

/// The opaque token plaintext taken from `Authorization: Bearer <token>`.
///
/// Extract as `Option<BearerToken>` on routes that also accept anonymous
/// callers: a missing header yields `None`, a malformed one still rejects.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    fn parse(parts: &Parts) -> Result<Self, Response> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(invalid_token)?;

        let token = value.strip_prefix("Bearer ").ok_or_else(invalid_token)?;
        if token.is_empty() {
            return Err(invalid_token());
        }

        Ok(Self(token.to_owned()))
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::parse(parts)
    }
}

impl<S> OptionalFromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(None);
        }

        Self::parse(parts).map(Some)
    }
}

fn invalid_token() -> Response {
    let body = envelope::error(
        "63",
        "InvalidToken",
        "invalid or missing authentication token",
        "invalid or missing authentication token",
    );

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
