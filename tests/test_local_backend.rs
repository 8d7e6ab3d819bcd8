//! Integration tests for the on-device SQLite backend.
//!
//! Tests cover:
//! - Local accounts and sign-in
//! - Session persistence across reopening the database
//! - Seed import and the role-scoped site queries

mod common;

use jobsite_kiosk::core::{auth, sites::load_sites};
use time::Duration;
use uuid::Uuid;

use common::*;

fn seed_for(user_id: Uuid, role: &str, sites: Vec<Site>, assigned: &[(usize, bool)]) -> SeedData {
    let assignments = assigned
        .iter()
        .map(|&(index, archived)| SeedAssignment {
            user_id,
            job_site_id: sites[index].id,
            archived,
        })
        .collect();
    SeedData {
        profiles: vec![SeedProfile {
            id: user_id,
            role: role.to_string(),
        }],
        sites,
        assignments,
        accounts: Vec::new(),
    }
}

#[tokio::test]
async fn test_sign_in_with_local_account() -> anyhow::Result<()> {
    let (db, _temp_dir) = create_test_db().await;
    let user = db
        .add_account(&NewAccount {
            user_id: None,
            email: "foreman@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .await?;

    let mut events = db.subscribe();
    let session = auth::sign_in(&db, "  foreman@example.com ", "hunter2").await?;
    assert_eq!(session.user, user);
    assert!(!session.is_expired());

    assert_eq!(events.changed().await, Some(SessionEvent::SignedIn(session.clone())));
    assert_eq!(db.current_session().await?, Some(session));

    db.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_wrong_password_is_auth_failure() -> anyhow::Result<()> {
    let (db, _temp_dir) = create_test_db().await;
    db.add_account(&NewAccount {
        user_id: None,
        email: "foreman@example.com".to_string(),
        password: "hunter2".to_string(),
    })
    .await?;

    let err = auth::sign_in(&db, "foreman@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, KioskError::AuthFailure { .. }), "got {err:?}");

    let err = auth::sign_in(&db, "nobody@example.com", "hunter2")
        .await
        .unwrap_err();
    assert!(matches!(err, KioskError::AuthFailure { .. }), "got {err:?}");
    assert_eq!(db.current_session().await?, None);

    db.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_email_lookup_ignores_case() -> anyhow::Result<()> {
    let (db, _temp_dir) = create_test_db().await;
    db.add_account(&NewAccount {
        user_id: None,
        email: "Foreman@Example.com".to_string(),
        password: "hunter2".to_string(),
    })
    .await?;

    let credentials = Credentials::validate("foreman@example.com", "hunter2")?;
    assert!(db.verify_credentials(&credentials).await?.is_some());

    db.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_session_survives_reopen() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("kiosk.db");
    let user = make_user("crew@example.com");
    let session = make_session(&user, Duration::hours(2));

    let db = LocalDb::open(&path).await?;
    db.save_session(&session).await?;
    db.close().await?;

    let reopened = LocalDb::open(&path).await?;
    let restored = reopened.current_session().await?.expect("session restored");
    assert_eq!(restored.user, user);
    assert_eq!(restored.access_token, session.access_token);
    assert_eq!(restored.expires_at.unix_timestamp(), session.expires_at.unix_timestamp());

    reopened.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_expired_session_is_dropped() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("kiosk.db");
    let user = make_user("crew@example.com");

    let db = LocalDb::open(&path).await?;
    db.save_session(&make_session(&user, Duration::minutes(-5))).await?;
    db.close().await?;

    let reopened = LocalDb::open(&path).await?;
    let mut events = reopened.subscribe();
    assert_eq!(reopened.current_session().await?, None);
    assert_eq!(events.changed().await, Some(SessionEvent::Expired));
    assert_eq!(reopened.load_session().await?, None);

    reopened.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_sign_out_clears_session() -> anyhow::Result<()> {
    let (db, _temp_dir) = create_test_db().await;
    let user = make_user("crew@example.com");
    db.save_session(&make_session(&user, Duration::hours(1))).await?;

    let mut events = db.subscribe();
    db.sign_out().await?;

    assert_eq!(events.changed().await, Some(SessionEvent::SignedOut));
    assert_eq!(db.load_session().await?, None);
    assert_eq!(db.current_session().await?, None);

    db.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_import_and_admin_listing() -> anyhow::Result<()> {
    let (db, _temp_dir) = create_test_db().await;
    let admin = make_user("admin@example.com");
    let sites = vec![
        make_site("harbor view", Some("J-102"), Some("active")),
        make_site("Archived Annex", Some("J-099"), Some("archived")),
        make_site("Bayside Tower", Some("J-101"), None),
    ];
    let summary = db.import(&seed_for(admin.id, "admin", sites, &[])).await?;
    assert_eq!(summary.profiles, 1);
    assert_eq!(summary.sites, 3);

    let listing = load_sites(&db, &admin).await?;
    assert_eq!(listing.role, Role::Admin);
    let names: Vec<&str> = listing.sites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Bayside Tower", "harbor view"]);

    db.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_member_sees_only_active_assignments() -> anyhow::Result<()> {
    let (db, _temp_dir) = create_test_db().await;
    let member = make_user("crew@example.com");
    let sites = vec![
        make_site("Site B", None, None),
        make_site("Site A", None, Some("active")),
        make_site("Site C", None, Some("archived")),
        make_site("Site D", None, None),
        make_site("Unassigned", None, None),
    ];
    let seed = seed_for(
        member.id,
        "foreman",
        sites,
        &[(0, false), (1, false), (2, false), (3, true)],
    );
    db.import(&seed).await?;

    let listing = load_sites(&db, &member).await?;
    assert_eq!(listing.role, Role::Member("foreman".to_string()));
    let names: Vec<&str> = listing.sites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Site A", "Site B"]);

    db.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_user_without_profile_is_admin() -> anyhow::Result<()> {
    let (db, _temp_dir) = create_test_db().await;
    let stranger = make_user("new@example.com");
    db.import(&SeedData {
        sites: vec![make_site("Only Site", None, None)],
        ..SeedData::default()
    })
    .await?;

    assert_eq!(db.profile_role(stranger.id).await?, None);
    let listing = load_sites(&db, &stranger).await?;
    assert_eq!(listing.role, Role::Admin);
    assert_eq!(listing.sites.len(), 1);

    db.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_import_is_idempotent() -> anyhow::Result<()> {
    let (db, _temp_dir) = create_test_db().await;
    let user_id = Uuid::new_v4();
    let mut site = make_site("Harbor View", None, None);
    let seed = SeedData {
        sites: vec![site.clone()],
        accounts: vec![SeedAccount {
            id: Some(user_id),
            email: "crew@example.com".to_string(),
            password: "first".to_string(),
        }],
        ..SeedData::default()
    };
    db.import(&seed).await?;

    site.status = Some("archived".to_string());
    db.import(&SeedData {
        sites: vec![site],
        accounts: vec![SeedAccount {
            id: Some(user_id),
            email: "crew@example.com".to_string(),
            password: "second".to_string(),
        }],
        ..SeedData::default()
    })
    .await?;

    assert!(db.active_sites().await?.is_empty());
    let old = Credentials::validate("crew@example.com", "first")?;
    let new = Credentials::validate("crew@example.com", "second")?;
    assert_eq!(db.verify_credentials(&old).await?, None);
    assert_eq!(
        db.verify_credentials(&new).await?.map(|user| user.id),
        Some(user_id)
    );

    db.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_seed_file_parsing() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("seed.json");
    let site_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    std::fs::write(
        &path,
        serde_json::json!({
            "profiles": [{ "id": user_id, "role": "foreman" }],
            "sites": [{ "id": site_id, "site_name": "Harbor View", "job_number": "J-101" }],
            "assignments": [{ "user_id": user_id, "job_site_id": site_id }],
        })
        .to_string(),
    )?;

    let seed = SeedData::from_file(&path)?;
    assert_eq!(seed.sites[0].name, "Harbor View");
    assert_eq!(seed.sites[0].status, None);
    assert!(!seed.assignments[0].archived);
    assert!(seed.accounts.is_empty());

    assert!(SeedData::from_file(dir.path().join("missing.json")).is_err());
    Ok(())
}
