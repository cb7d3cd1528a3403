//! Team resource API handlers
//!
//! One resource, `/api/teams/{slug}`, with three verbs:
//! - GET: any member may read the team
//! - PUT: owners may rename the team, change its slug or domain
//! - DELETE: owners may delete the team
//!
//! Mutations are recorded in the audit log after they succeed.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use teamdesk_audit::{AuditActor, AuditEvent, AuditTeam, Crud};
use teamdesk_auth::{MaybeSession, Session};
use teamdesk_common::{BareError, Envelope, Error};

use crate::api::middleware::TeamsState;
use crate::domain::entities::{nullable_field, Team, TeamChanges};

/// Methods the team resource answers
pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::PUT, Method::DELETE];

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized.";
pub const NOT_MEMBER_MESSAGE: &str = "Bad request.";
pub const PERMISSION_DENIED_MESSAGE: &str = "You don't have permission to do this action.";

pub const TEAM_UPDATE_ACTION: &str = "team.update";
pub const TEAM_DELETE_ACTION: &str = "team.delete";

/// Errors produced by the team resource.
///
/// The status and body shape of each branch is part of the API contract:
/// `Unauthenticated` omits the `data` key, and a non-owner DELETE answers
/// 200 with an error envelope.
#[derive(Debug)]
pub enum TeamsApiError {
    /// No session on a mutating request
    Unauthenticated,
    /// Caller is not a member of the team
    NotMember,
    /// Caller is not an owner of the team
    PermissionDenied { status: StatusCode },
    /// Verb outside `ALLOWED_METHODS`
    MethodNotAllowed(Method),
    /// Collaborator failure, propagated as-is
    Upstream(Error),
}

impl From<Error> for TeamsApiError {
    fn from(err: Error) -> Self {
        TeamsApiError::Upstream(err)
    }
}

impl IntoResponse for TeamsApiError {
    fn into_response(self) -> Response {
        match self {
            TeamsApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(BareError::new(UNAUTHORIZED_MESSAGE)),
            )
                .into_response(),
            TeamsApiError::NotMember => (
                StatusCode::BAD_REQUEST,
                Json(Envelope::<()>::error(NOT_MEMBER_MESSAGE)),
            )
                .into_response(),
            TeamsApiError::PermissionDenied { status } => (
                status,
                Json(Envelope::<()>::error(PERMISSION_DENIED_MESSAGE)),
            )
                .into_response(),
            TeamsApiError::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, allow_header_value())],
                Json(Envelope::<()>::error(format!(
                    "Method {} Not Allowed",
                    method
                ))),
            )
                .into_response(),
            TeamsApiError::Upstream(err) => err.into_response(),
        }
    }
}

/// `Allow` header listing the supported verbs
pub fn allow_header_value() -> String {
    ALLOWED_METHODS
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Body accepted by PUT. Only these three fields are forwarded to the store.
///
/// `"domain": null` clears the domain; an absent key leaves it alone.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "nullable_field")]
    pub domain: Option<Option<String>>,
}

impl UpdateTeamRequest {
    /// Parse the request body; an empty body is an empty update
    pub fn from_body(body: &[u8]) -> Result<Self, Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body)
            .map_err(|e| Error::Validation(format!("Invalid JSON body: {}", e)))
    }
}

impl From<UpdateTeamRequest> for TeamChanges {
    fn from(request: UpdateTeamRequest) -> Self {
        TeamChanges {
            name: request.name,
            slug: request.slug,
            domain: request.domain,
        }
    }
}

/// Resolve the team or fail upstream; an unknown slug is not mapped to 404
async fn fetch_team(state: &TeamsState, slug: &str) -> Result<Team, TeamsApiError> {
    let team = state
        .store
        .get_by_slug(slug)
        .await?
        .ok_or_else(|| Error::Internal(format!("Team '{}' not found", slug)))?;

    Ok(team)
}

/// Build the audit record for a mutation, using the team as it was before
fn audit_event(action: &str, crud: Crud, session: &Session, team: &Team) -> AuditEvent {
    AuditEvent::new(
        action,
        crud,
        AuditActor {
            id: session.user.id,
            name: session.user.name.clone(),
            email: session.user.email.clone(),
        },
        AuditTeam {
            id: team.id,
            name: team.name.clone(),
            slug: team.slug.clone(),
        },
    )
}

/// Get a team by slug
///
/// **GET /api/teams/{slug}**
///
/// A missing session is not rejected up front; it simply never counts as a member.
pub async fn get_team(
    MaybeSession(session): MaybeSession,
    State(state): State<TeamsState>,
    Path(slug): Path<String>,
) -> Result<Json<Envelope<Team>>, TeamsApiError> {
    let team = fetch_team(&state, &slug).await?;

    let is_member = match &session {
        Some(session) => state.store.is_member(session.user_id(), team.id).await?,
        None => false,
    };

    if !is_member {
        tracing::debug!(team_slug = %slug, "Team read denied: not a member");
        return Err(TeamsApiError::NotMember);
    }

    Ok(Json(Envelope::data(team)))
}

/// Update a team
///
/// **PUT /api/teams/{slug}**
///
/// Owner only. `name`, `slug` and `domain` are passed through to the store.
pub async fn update_team(
    MaybeSession(session): MaybeSession,
    State(state): State<TeamsState>,
    Path(slug): Path<String>,
    body: Bytes,
) -> Result<Json<Envelope<Team>>, TeamsApiError> {
    let session = session.ok_or(TeamsApiError::Unauthenticated)?;

    let team = fetch_team(&state, &slug).await?;

    if !state.store.is_owner(session.user_id(), team.id).await? {
        tracing::debug!(team_slug = %slug, user_id = %session.user_id(), "Team update denied: not an owner");
        return Err(TeamsApiError::PermissionDenied {
            status: StatusCode::BAD_REQUEST,
        });
    }

    let request = UpdateTeamRequest::from_body(&body)?;
    let updated = state.store.update_by_slug(&slug, request.into()).await?;

    state.audit.submit(audit_event(
        TEAM_UPDATE_ACTION,
        Crud::Update,
        &session,
        &team,
    ));

    tracing::info!(team_id = %team.id, user_id = %session.user_id(), "Team updated");

    Ok(Json(Envelope::data(updated)))
}

/// Delete a team
///
/// **DELETE /api/teams/{slug}**
///
/// Owner only. A non-owner gets status 200 with an error envelope.
pub async fn delete_team(
    MaybeSession(session): MaybeSession,
    State(state): State<TeamsState>,
    Path(slug): Path<String>,
) -> Result<Json<Envelope<serde_json::Map<String, serde_json::Value>>>, TeamsApiError> {
    let session = session.ok_or(TeamsApiError::Unauthenticated)?;

    let team = fetch_team(&state, &slug).await?;

    if !state.store.is_owner(session.user_id(), team.id).await? {
        tracing::debug!(team_slug = %slug, user_id = %session.user_id(), "Team delete denied: not an owner");
        return Err(TeamsApiError::PermissionDenied {
            status: StatusCode::OK,
        });
    }

    state.store.delete_by_slug(&slug).await?;

    state.audit.submit(audit_event(
        TEAM_DELETE_ACTION,
        Crud::Delete,
        &session,
        &team,
    ));

    tracing::info!(team_id = %team.id, user_id = %session.user_id(), "Team deleted");

    Ok(Json(Envelope::data(serde_json::Map::new())))
}

/// Fallback for verbs the resource does not support
pub async fn method_not_allowed(method: Method) -> TeamsApiError {
    TeamsApiError::MethodNotAllowed(method)
}
