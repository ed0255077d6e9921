//! Caller identity extraction.
//!
//! The gateway sits behind an authenticating proxy that forwards the
//! verified account id in the [`OWNER_HEADER`] header. Handlers take an
//! [`Owner`] argument and never see requests without one.
//!
//! Operator endpoints take an [`Admin`] argument instead: the request must
//! carry `Authorization: Bearer <key>` matching the configured [`AdminKey`].

use std::fmt;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::domain::OwnerId;
use crate::error::GatewayError;

/// Header carrying the caller's account UUID.
pub const OWNER_HEADER: &str = "x-owner-id";

/// The authenticated owner of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub OwnerId);

impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(OWNER_HEADER)
            .ok_or_else(|| GatewayError::Unauthorized("missing X-Owner-Id header".to_string()))?;

        value
            .to_str()
            .ok()
            .and_then(|v| v.parse::<OwnerId>().ok())
            .map(Owner)
            .ok_or_else(|| GatewayError::Unauthorized("malformed X-Owner-Id header".to_string()))
    }
}

/// Shared secret for operator endpoints. Unset means every admin request
/// is refused.
#[derive(Clone, Default)]
pub struct AdminKey(Option<Arc<str>>);

impl AdminKey {
    /// Wraps the configured key. Blank keys count as unset.
    #[must_use]
    pub fn new(key: Option<String>) -> Self {
        Self(
            key.filter(|k| !k.trim().is_empty())
                .map(|k| Arc::from(k.trim())),
        )
    }

    /// Returns `true` if a key is configured.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Compares `token` with the key without short-circuiting on the first
    /// differing byte.
    fn accepts(&self, token: &str) -> bool {
        let Some(key) = &self.0 else {
            return false;
        };
        let (expected, given) = (key.as_bytes(), token.as_bytes());
        expected.len() == given.len()
            && expected
                .iter()
                .zip(given)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.is_set() { "<redacted>" } else { "<unset>" };
        f.debug_tuple("AdminKey").field(&shown).finish()
    }
}

/// An operator request carrying the admin bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admin;

impl<S> FromRequestParts<S> for Admin
where
    AdminKey: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| GatewayError::Unauthorized("missing bearer token".to_string()))?;

        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                GatewayError::Unauthorized("malformed Authorization header".to_string())
            })?;

        if AdminKey::from_ref(state).accepts(token) {
            Ok(Admin)
        } else {
            tracing::warn!(path = %parts.uri.path(), "admin request with a rejected token");
            Err(GatewayError::Forbidden("admin access required".to_string()))
        }
    }
}
