//! Credential store and session token properties
//! Run: cargo test -p sweep-server --test auth_flow

use sweep_server::JwtService;
use sweep_server::auth::JwtConfig;
use sweep_server::db;
use sweep_server::db::models::{ROLE_REPORTER, UserCreate};
use sweep_server::db::repository::{RepoError, UserRepository};

async fn test_repo() -> (tempfile::TempDir, UserRepository) {
    let tmp = tempfile::tempdir().unwrap();
    let database = db::connect(tmp.path().to_str().unwrap()).await.unwrap();
    (tmp, UserRepository::new(database))
}

fn alice() -> UserCreate {
    UserCreate {
        username: "alice".to_string(),
        password: "pw123".to_string(),
        role: ROLE_REPORTER.to_string(),
    }
}

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-which-is-long-enough".to_string(),
        expiration_minutes: 720,
        issuer: "sweep-server".to_string(),
        audience: "sweep-clients".to_string(),
    }
}

#[tokio::test]
async fn register_hashes_and_verifies_credentials() {
    let (_tmp, repo) = test_repo().await;
    let user = repo.create(alice()).await.unwrap();

    // Password is stored only as a salted one-way hash
    assert_ne!(user.hash_pass, "pw123");
    assert!(user.hash_pass.starts_with("$argon2"));

    let stored = repo.find_by_username("alice").await.unwrap().unwrap();
    assert!(stored.verify_password("pw123").unwrap());
    assert!(!stored.verify_password("wrong").unwrap());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let (_tmp, repo) = test_repo().await;
    repo.create(alice()).await.unwrap();

    let err = repo.create(alice()).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");
}

#[tokio::test]
async fn login_round_trip_produces_valid_token() {
    let (_tmp, repo) = test_repo().await;
    let user = repo.create(alice()).await.unwrap();

    let jwt = JwtService::with_config(jwt_config());
    let token = jwt
        .generate_token(&user.id_string(), &user.username, &user.role)
        .unwrap();

    // Validation is pure: signature + expiry, no store lookup
    let claims = jwt.validate_token(&token).unwrap();
    assert_eq!(claims.sub, user.id_string());
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.role, ROLE_REPORTER);
    assert!(jwt.get_expiration_seconds(&claims) > 0);
}

#[tokio::test]
async fn user_lookup_by_id_strips_nothing_at_repo_level() {
    let (_tmp, repo) = test_repo().await;
    let created = repo.create(alice()).await.unwrap();

    let fetched = repo.find_by_id(&created.id_string()).await.unwrap().unwrap();
    assert_eq!(fetched.username, "alice");

    // Serialized form must not leak the hash
    let json = serde_json::to_value(&fetched).unwrap();
    assert!(json.get("hash_pass").is_none());
}
