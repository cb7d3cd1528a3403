//! Teams domain: team resource, memberships, owner-only mutations

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
// Re-export repository types
pub use repository::{
    InMemoryTeamStore, MembershipRepository, TeamRepository, TeamStore, TeamsRepositories,
    MIGRATOR,
};

// Re-export API types
pub use api::routes;
pub use api::TeamsState;

// Re-export session types used by the handlers
pub use teamdesk_auth::{AuthConfig, MaybeSession, Session, SessionResolver, SessionUser};
