//! Axum extractors for sessions
//!
//! Generic over any state `S` where `SessionResolver: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::resolver::SessionResolver;
use crate::session::Session;

/// Optional session extractor.
///
/// Never rejects: unauthenticated requests extract `MaybeSession(None)` and the
/// handler decides how to answer.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl<S> FromRequestParts<S> for MaybeSession
where
    SessionResolver: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let resolver = SessionResolver::from_ref(state);

        Ok(MaybeSession(resolver.resolve(&parts.headers)))
    }
}
