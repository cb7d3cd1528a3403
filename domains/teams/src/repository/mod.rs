//! Repository implementations for the Teams domain
//!
//! Handlers depend on the [`TeamStore`] trait. `TeamsRepositories` backs it
//! with Postgres; `InMemoryTeamStore` backs it with process memory for tests
//! and database-less local runs.

pub mod memberships;
pub mod memory;
pub mod teams;

use sqlx::migrate::Migrator;
use sqlx::PgPool;
use teamdesk_common::Result;
use uuid::Uuid;

use crate::domain::entities::{Team, TeamChanges};

pub use memberships::MembershipRepository;
pub use memory::InMemoryTeamStore;
pub use teams::TeamRepository;

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Team data-access operations consumed by the team resource endpoint
#[async_trait::async_trait]
pub trait TeamStore: Send + Sync {
    /// Find a team by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Team>>;

    /// Whether the user holds any role in the team
    async fn is_member(&self, user_id: Uuid, team_id: Uuid) -> Result<bool>;

    /// Whether the user is an owner of the team
    async fn is_owner(&self, user_id: Uuid, team_id: Uuid) -> Result<bool>;

    /// Validate and apply a partial update, returning the updated team
    async fn update_by_slug(&self, slug: &str, changes: TeamChanges) -> Result<Team>;

    /// Delete a team; fails when no team has this slug
    async fn delete_by_slug(&self, slug: &str) -> Result<()>;
}

/// Combined Postgres repository access for the Teams domain
#[derive(Clone)]
pub struct TeamsRepositories {
    pool: PgPool,
    pub teams: TeamRepository,
    pub memberships: MembershipRepository,
}

impl TeamsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            teams: TeamRepository::new(pool.clone()),
            memberships: MembershipRepository::new(pool.clone()),
            pool,
        }
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.pool).await
    }
}

#[async_trait::async_trait]
impl TeamStore for TeamsRepositories {
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Team>> {
        self.teams.get_by_slug(slug).await
    }

    async fn is_member(&self, user_id: Uuid, team_id: Uuid) -> Result<bool> {
        Ok(self
            .memberships
            .get_role(team_id, user_id)
            .await?
            .is_some())
    }

    async fn is_owner(&self, user_id: Uuid, team_id: Uuid) -> Result<bool> {
        Ok(self
            .memberships
            .get_role(team_id, user_id)
            .await?
            .is_some_and(|role| role.is_owner()))
    }

    async fn update_by_slug(&self, slug: &str, changes: TeamChanges) -> Result<Team> {
        changes.check()?;
        self.teams.update_by_slug(slug, &changes).await
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<()> {
        self.teams.delete_by_slug(slug).await
    }
}
