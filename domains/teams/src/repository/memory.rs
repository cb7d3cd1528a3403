//! In-memory team store
//!
//! Mirrors the Postgres schema constraints: unique slug, unique domain,
//! one membership per (team, user), memberships removed with their team.

use std::collections::HashMap;
use std::sync::Arc;

use teamdesk_common::{Error, RepositoryError, Result};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::TeamStore;
use crate::domain::entities::{Team, TeamChanges, TeamMember, TeamRole};

#[derive(Debug, Default)]
struct Tables {
    teams: HashMap<Uuid, Team>,
    members: Vec<TeamMember>,
}

impl Tables {
    fn find_by_slug(&self, slug: &str) -> Option<&Team> {
        self.teams.values().find(|t| t.slug == slug)
    }

    fn role_of(&self, user_id: Uuid, team_id: Uuid) -> Option<TeamRole> {
        self.members
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
            .map(|m| m.role)
    }

    /// Check unique columns against every team except `except`
    fn ensure_unique(&self, slug: &str, domain: Option<&str>, except: Option<Uuid>) -> Result<()> {
        let clash = self.teams.values().any(|t| {
            Some(t.id) != except
                && (t.slug == slug || (domain.is_some() && t.domain.as_deref() == domain))
        });

        if clash {
            return Err(Error::Conflict(format!(
                "Team slug or domain for '{}' already exists",
                slug
            )));
        }
        Ok(())
    }
}

/// Team store backed by process memory.
///
/// Clones share the same underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryTeamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a team
    pub async fn insert_team(&self, team: Team) -> Result<Team> {
        let mut tables = self.tables.write().await;
        tables.ensure_unique(&team.slug, team.domain.as_deref(), None)?;
        tables.teams.insert(team.id, team.clone());
        Ok(team)
    }

    /// Grant `user_id` a role in `team_id`
    pub async fn add_member(&self, team_id: Uuid, user_id: Uuid, role: TeamRole) -> Result<TeamMember> {
        let mut tables = self.tables.write().await;

        if !tables.teams.contains_key(&team_id) {
            return Err(Error::NotFound(format!("Team {} not found", team_id)));
        }
        if tables.role_of(user_id, team_id).is_some() {
            return Err(Error::Conflict(
                "User is already a member of this team".to_string(),
            ));
        }

        let member = TeamMember::new(team_id, user_id, role);
        tables.members.push(member.clone());
        Ok(member)
    }

    /// Number of memberships held in `team_id`
    pub async fn member_count(&self, team_id: Uuid) -> usize {
        self.tables
            .read()
            .await
            .members
            .iter()
            .filter(|m| m.team_id == team_id)
            .count()
    }
}

#[async_trait::async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Team>> {
        Ok(self.tables.read().await.find_by_slug(slug).cloned())
    }

    async fn is_member(&self, user_id: Uuid, team_id: Uuid) -> Result<bool> {
        Ok(self.tables.read().await.role_of(user_id, team_id).is_some())
    }

    async fn is_owner(&self, user_id: Uuid, team_id: Uuid) -> Result<bool> {
        Ok(self
            .tables
            .read()
            .await
            .role_of(user_id, team_id)
            .is_some_and(|role| role.is_owner()))
    }

    async fn update_by_slug(&self, slug: &str, changes: TeamChanges) -> Result<Team> {
        changes.check()?;

        let mut tables = self.tables.write().await;

        let current = tables
            .find_by_slug(slug)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Team '{}' not found", slug)))?;

        let next_slug = changes.slug.as_deref().unwrap_or(&current.slug);
        tables.ensure_unique(next_slug, changes.new_domain(), Some(current.id))?;

        let mut updated = current;
        updated.apply(changes);
        tables.teams.insert(updated.id, updated.clone());

        Ok(updated)
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<()> {
        let mut tables = self.tables.write().await;

        let team_id = tables
            .find_by_slug(slug)
            .map(|t| t.id)
            .ok_or(RepositoryError::NotFound)?;

        tables.teams.remove(&team_id);
        tables.members.retain(|m| m.team_id != team_id);

        Ok(())
    }
}
