//! Route definitions for Teams domain API

use axum::{routing::get, Router};

use super::handlers::teams;
use super::middleware::TeamsState;

/// Single-team resource: GET, PUT and DELETE, anything else answers 405.
///
/// HEAD is routed explicitly since `get` would otherwise serve it.
fn team_routes() -> Router<TeamsState> {
    Router::new().route(
        "/api/teams/{slug}",
        get(teams::get_team)
            .head(teams::method_not_allowed)
            .put(teams::update_team)
            .delete(teams::delete_team)
            .fallback(teams::method_not_allowed),
    )
}

/// Create all Teams domain API routes
pub fn routes() -> Router<TeamsState> {
    Router::new().merge(team_routes())
}
