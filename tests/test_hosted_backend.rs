//! Hosted backend against a local HTTP server.

mod common;

use jobsite_kiosk::core::{auth, remote::HostedClient, sites::load_sites};
use serde_json::json;
use tempfile::TempDir;
use time::Duration;

use common::*;

const ANON_KEY: &str = "anon-key";

fn token_body(user: &User, access_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "refresh_token": "refresh-next",
        "expires_in": 3600,
        "user": { "id": user.id, "email": user.email },
    })
}

/// A client on a fresh database, optionally with `session` already persisted.
async fn connect(
    server: &StubServer,
    session: Option<&Session>,
) -> (HostedClient, LocalDb, TempDir) {
    let (db, dir) = create_test_db().await;
    if let Some(session) = session {
        db.save_session(session).await.unwrap();
    }
    let client = HostedClient::connect(&server.url, ANON_KEY, db.clone())
        .await
        .unwrap();
    (client, db, dir)
}

async fn sign_in_error(response: StubResponse) -> KioskError {
    let server = StubServer::start(move |_| response.clone()).await;
    let (client, db, _dir) = connect(&server, None).await;
    let err = auth::sign_in(&client, "pm@example.com", "hunter2")
        .await
        .unwrap_err();
    assert_eq!(db.load_session().await.unwrap(), None);
    db.close().await.unwrap();
    err
}

#[tokio::test]
async fn test_sign_in_persists_session() {
    let user = make_user("pm@example.com");
    let token = token_body(&user, "access-new");
    let server = StubServer::start(move |_| StubResponse::json(200, token.clone())).await;
    let (client, db, _dir) = connect(&server, None).await;
    let mut events = client.subscribe();

    let session = auth::sign_in(&client, "pm@example.com", "hunter2")
        .await
        .unwrap();
    assert_eq!(session.access_token, "access-new");
    assert_eq!(session.user, user);
    assert_eq!(events.changed().await, Some(SessionEvent::SignedIn(session.clone())));
    assert_eq!(db.load_session().await.unwrap(), Some(session));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/auth/v1/token");
    assert_eq!(request.query, "grant_type=password");
    assert_eq!(request.header("apikey"), Some(ANON_KEY));
    assert!(request.body.contains(r#""email":"pm@example.com""#));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_rejected_credentials_are_auth_failure() {
    let err = sign_in_error(StubResponse::json(
        400,
        json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" }),
    ))
    .await;
    match err {
        KioskError::AuthFailure { message } => assert_eq!(message, "Invalid login credentials"),
        other => panic!("expected an auth failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_status_is_data_fetch() {
    let responses = [
        StubResponse::html(404, "<html><body>Not Found</body></html>"),
        StubResponse::json(429, json!({ "message": "Too many requests" })),
        StubResponse::json(500, json!({ "msg": "internal" })),
        // A credential status without a recognisable auth body.
        StubResponse::html(401, "<html>Unauthorized</html>"),
    ];
    for response in responses {
        let status = response.status;
        let err = sign_in_error(response).await;
        assert!(
            matches!(err, KioskError::DataFetch(_)),
            "status {status} gave {err:?}"
        );
    }
}

#[tokio::test]
async fn test_valid_session_needs_no_request() {
    let user = make_user("pm@example.com");
    let session = make_session(&user, Duration::hours(1));
    let server = StubServer::start(|_| StubResponse::json(500, json!({}))).await;
    let (client, db, _dir) = connect(&server, Some(&session)).await;

    assert_eq!(client.current_session().await.unwrap(), Some(session));
    assert!(server.requests().is_empty());
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_expired_session_is_refreshed() {
    let user = make_user("pm@example.com");
    let expired = make_session(&user, Duration::minutes(-5));
    let token = token_body(&user, "access-refreshed");
    let server = StubServer::start(move |_| StubResponse::json(200, token.clone())).await;
    let (client, db, _dir) = connect(&server, Some(&expired)).await;
    let mut events = client.subscribe();

    let refreshed = client.current_session().await.unwrap().unwrap();
    assert_eq!(refreshed.access_token, "access-refreshed");
    assert!(!refreshed.is_expired());
    assert_eq!(events.changed().await, Some(SessionEvent::Refreshed(refreshed.clone())));
    assert_eq!(db.load_session().await.unwrap(), Some(refreshed));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, "grant_type=refresh_token");
    assert!(requests[0].body.contains(&expired.refresh_token));
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_failed_refresh_expires_session() {
    let user = make_user("pm@example.com");
    let expired = make_session(&user, Duration::minutes(-5));
    let server = StubServer::start(|_| {
        StubResponse::json(
            400,
            json!({ "error": "invalid_grant", "error_description": "Invalid Refresh Token" }),
        )
    })
    .await;
    let (client, db, _dir) = connect(&server, Some(&expired)).await;
    let mut events = client.subscribe();

    assert_eq!(client.current_session().await.unwrap(), None);
    assert_eq!(events.changed().await, Some(SessionEvent::Expired));
    assert_eq!(db.load_session().await.unwrap(), None);

    // Nothing left to refresh.
    assert_eq!(client.current_session().await.unwrap(), None);
    assert_eq!(server.requests().len(), 1);
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_sign_out_clears_session_when_logout_is_rejected() {
    for status in [401, 500] {
        let user = make_user("pm@example.com");
        let session = make_session(&user, Duration::hours(1));
        let server = StubServer::start(move |_| {
            StubResponse::json(status, json!({ "msg": "token is no longer valid" }))
        })
        .await;
        let (client, db, _dir) = connect(&server, Some(&session)).await;
        let mut events = client.subscribe();

        client.sign_out().await.unwrap();
        assert_eq!(events.changed().await, Some(SessionEvent::SignedOut));
        assert_eq!(db.load_session().await.unwrap(), None);
        assert_eq!(client.current_session().await.unwrap(), None);

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/auth/v1/logout");
        let bearer = format!("Bearer {}", session.access_token);
        assert_eq!(requests[0].header("authorization"), Some(bearer.as_str()));
        db.close().await.unwrap();
    }
}

#[tokio::test]
async fn test_site_queries_carry_key_and_token() {
    let user = make_user("pm@example.com");
    let session = make_session(&user, Duration::hours(1));
    let site = make_site("Harbor View", Some("J-101"), Some("active"));
    let row = json!({
        "id": site.id,
        "site_name": site.name,
        "job_number": site.job_number,
        "address": null,
        "status": site.status,
    });
    let server = StubServer::start(move |request| match request.path.as_str() {
        "/rest/v1/profiles" => StubResponse::json(200, json!([{ "role": "foreman" }])),
        "/rest/v1/user_job_sites" => {
            StubResponse::json(200, json!([{ "job_sites": row.clone() }, { "job_sites": null }]))
        }
        _ => StubResponse::json(404, json!({})),
    })
    .await;
    let (client, db, _dir) = connect(&server, Some(&session)).await;

    let listing = load_sites(&client, &user).await.unwrap();
    assert_eq!(listing.role, Role::Member("foreman".to_string()));
    assert_eq!(listing.sites, vec![site]);

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    let bearer = format!("Bearer {}", session.access_token);
    for request in &requests {
        assert_eq!(request.method, "GET");
        assert_eq!(request.header("apikey"), Some(ANON_KEY));
        assert_eq!(request.header("authorization"), Some(bearer.as_str()));
    }
    assert!(requests[0].query.contains(&format!("id=eq.{}", user.id)));
    assert!(requests[1].query.contains(&format!("user_id=eq.{}", user.id)));
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_site_query_failure_is_data_fetch() {
    let user = make_user("pm@example.com");
    let session = make_session(&user, Duration::hours(1));
    let server = StubServer::start(|_| StubResponse::html(503, "<html>down</html>")).await;
    let (client, db, _dir) = connect(&server, Some(&session)).await;

    let err = load_sites(&client, &user).await.unwrap_err();
    assert!(matches!(err, KioskError::DataFetch(_)));
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_site_queries_need_a_session() {
    let server = StubServer::start(|_| StubResponse::json(200, json!([]))).await;
    let (client, db, _dir) = connect(&server, None).await;

    assert!(client.active_sites().await.is_err());
    assert!(server.requests().is_empty());
    db.close().await.unwrap();
}
