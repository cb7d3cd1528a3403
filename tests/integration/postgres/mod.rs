//! Postgres-backed team store tests
//!
//! Run only when `TEST_DATABASE_URL` points at a disposable database;
//! otherwise each test returns early. Slugs are randomized so runs do not
//! collide with leftovers.

use serial_test::serial;
use sqlx::PgPool;
use teamdesk_common::Error;
use teamdesk_teams::{Team, TeamChanges, TeamMember, TeamRole, TeamStore, TeamsRepositories};
use uuid::Uuid;

use crate::common::TestConfig;

async fn repos() -> Option<TeamsRepositories> {
    let url = TestConfig::from_env().database_url?;
    let pool = PgPool::connect(&url).await.expect("test database connection");
    let repos = TeamsRepositories::new(pool);
    repos.migrate().await.expect("migrations");
    Some(repos)
}

fn unique_slug(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

/// Team with one owner and one member
async fn seed(repos: &TeamsRepositories) -> (Team, Uuid, Uuid) {
    let team = Team::new("Acme".to_string(), unique_slug("acme")).unwrap();
    let team = repos.teams.create(&team).await.unwrap();

    let owner = Uuid::new_v4();
    let member = Uuid::new_v4();
    repos
        .memberships
        .create(&TeamMember::new(team.id, owner, TeamRole::Owner))
        .await
        .unwrap();
    repos
        .memberships
        .create(&TeamMember::new(team.id, member, TeamRole::Member))
        .await
        .unwrap();

    (team, owner, member)
}

#[tokio::test]
#[serial]
async fn test_membership_and_ownership_lookups() {
    let Some(repos) = repos().await else { return };
    let (team, owner, member) = seed(&repos).await;

    assert!(repos.is_member(owner, team.id).await.unwrap());
    assert!(repos.is_member(member, team.id).await.unwrap());
    assert!(!repos.is_member(Uuid::new_v4(), team.id).await.unwrap());

    assert!(repos.is_owner(owner, team.id).await.unwrap());
    assert!(!repos.is_owner(member, team.id).await.unwrap());
}

#[tokio::test]
#[serial]
async fn test_partial_update_keeps_untouched_fields() {
    let Some(repos) = repos().await else { return };
    let (team, _, _) = seed(&repos).await;

    let updated = repos
        .update_by_slug(
            &team.slug,
            TeamChanges {
                name: Some("Acme Co".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, team.id);
    assert_eq!(updated.name, "Acme Co");
    assert_eq!(updated.slug, team.slug);
    assert!(updated.domain.is_none());

    let fetched = repos.get_by_slug(&team.slug).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Acme Co");
}

#[tokio::test]
#[serial]
async fn test_domain_null_clears_column() {
    let Some(repos) = repos().await else { return };
    let (team, _, _) = seed(&repos).await;
    let domain = format!("{}.test", team.slug);

    let set = repos
        .update_by_slug(
            &team.slug,
            TeamChanges {
                domain: Some(Some(domain.clone())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(set.domain.as_deref(), Some(domain.as_str()));

    let renamed = repos
        .update_by_slug(
            &team.slug,
            TeamChanges {
                name: Some("Acme Co".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.domain.as_deref(), Some(domain.as_str()));

    let cleared = repos
        .update_by_slug(
            &team.slug,
            TeamChanges {
                domain: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.domain.is_none());
    assert_eq!(cleared.name, "Acme Co");
}

#[tokio::test]
#[serial]
async fn test_update_rejects_invalid_and_conflicting_values() {
    let Some(repos) = repos().await else { return };
    let (first, _, _) = seed(&repos).await;
    let (second, _, _) = seed(&repos).await;

    let invalid = repos
        .update_by_slug(
            &first.slug,
            TeamChanges {
                slug: Some("Not A Slug".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(invalid, Err(Error::Validation(_))));

    let conflict = repos
        .update_by_slug(
            &first.slug,
            TeamChanges {
                slug: Some(second.slug.clone()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(conflict, Err(Error::Conflict(_))));
}

#[tokio::test]
#[serial]
async fn test_delete_cascades_and_second_delete_fails() {
    let Some(repos) = repos().await else { return };
    let (team, owner, _) = seed(&repos).await;

    repos.delete_by_slug(&team.slug).await.unwrap();

    assert!(repos.get_by_slug(&team.slug).await.unwrap().is_none());
    assert!(!repos.is_member(owner, team.id).await.unwrap());
    assert!(matches!(
        repos.delete_by_slug(&team.slug).await,
        Err(Error::NotFound(_))
    ));
}
