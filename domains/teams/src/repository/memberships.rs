//! Membership repository

use crate::domain::entities::{TeamMember, TeamRole};
use sqlx::PgPool;
use teamdesk_common::{Error, RepositoryError, Result};
use uuid::Uuid;

#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the role a user holds in a team, if any
    pub async fn get_role(&self, team_id: Uuid, user_id: Uuid) -> Result<Option<TeamRole>> {
        let role: Option<TeamRole> = sqlx::query_scalar(
            r#"
            SELECT role
            FROM team_members
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    /// Insert a membership
    pub async fn create(&self, member: &TeamMember) -> Result<TeamMember> {
        let created: TeamMember = sqlx::query_as(
            r#"
            INSERT INTO team_members (id, team_id, user_id, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, team_id, user_id, role, created_at
            "#,
        )
        .bind(member.id)
        .bind(member.team_id)
        .bind(member.user_id)
        .bind(member.role)
        .bind(member.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match RepositoryError::from_sqlx(e) {
            RepositoryError::AlreadyExists => {
                Error::Conflict("User is already a member of this team".to_string())
            }
            other => other.into(),
        })?;

        Ok(created)
    }
}
