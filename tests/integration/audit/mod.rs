//! Audit delivery integration tests
//!
//! Events are emitted only after a successful mutation, carry the team as it
//! was before the change, and a failing sink never affects the response.

use axum::http::{Method, StatusCode};
use teamdesk_audit::{Crud, MockAuditService};
use teamdesk_teams::TeamRole;

use crate::common::{TestApp, UserFixture};

#[tokio::test]
async fn test_update_event_carries_pre_update_snapshot() {
    let app = TestApp::new();
    let owner = UserFixture::new("owner");
    let team = app.create_team("Acme", "acme", &owner).await.unwrap();

    let response = app
        .request(
            Method::PUT,
            "/api/teams/acme",
            Some(&owner),
            Some(r#"{"name":"Acme Co","slug":"acme-co"}"#),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let events = app.settled_audit_events(1).await;
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event.action, "team.update");
    assert_eq!(event.crud, Crud::Update);
    assert_eq!(event.team.id, team.id);
    assert_eq!(event.team.name, "Acme");
    assert_eq!(event.team.slug, "acme");
    assert_eq!(event.user.id, owner.id);
    assert_eq!(event.user.email.as_deref(), Some(owner.email.as_str()));
}

#[tokio::test]
async fn test_delete_event_emitted_once() {
    let app = TestApp::new();
    let owner = UserFixture::new("owner");
    let team = app.create_team("Acme", "acme", &owner).await.unwrap();

    let response = app
        .request(Method::DELETE, "/api/teams/acme", Some(&owner), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let events = app.settled_audit_events(1).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, "team.delete");
    assert_eq!(events[0].crud, Crud::Delete);
    assert_eq!(events[0].team.id, team.id);
}

#[tokio::test]
async fn test_reads_and_denials_are_not_audited() {
    let app = TestApp::new();
    let owner = UserFixture::new("owner");
    let member = UserFixture::new("member");
    let team = app.create_team("Acme", "acme", &owner).await.unwrap();
    app.add_member(&team, &member, TeamRole::Member).await.unwrap();

    app.request(Method::GET, "/api/teams/acme", Some(&owner), None)
        .await;
    app.request(
        Method::PUT,
        "/api/teams/acme",
        Some(&member),
        Some(r#"{"name":"Hijacked"}"#),
    )
    .await;
    app.request(Method::DELETE, "/api/teams/acme", Some(&member), None)
        .await;
    app.request(Method::DELETE, "/api/teams/acme", None, None)
        .await;

    assert!(app.audit_events(1).await.is_empty());
}

#[tokio::test]
async fn test_failing_sink_does_not_affect_response() {
    let app = TestApp::with_audit(MockAuditService::failing());
    let owner = UserFixture::new("owner");
    app.create_team("Acme", "acme", &owner).await.unwrap();

    let updated = app
        .request(
            Method::PUT,
            "/api/teams/acme",
            Some(&owner),
            Some(r#"{"name":"Acme Co"}"#),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["name"], "Acme Co");

    let deleted = app
        .request(Method::DELETE, "/api/teams/acme", Some(&owner), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(deleted.body["error"].is_null());
}
