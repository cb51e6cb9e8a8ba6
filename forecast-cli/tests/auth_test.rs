use anyhow::Result;
use mockito::Matcher;
use serde_json::json;
use student_forecast::api::{ApiClient, ApiError, LOGIN_FAILED_MESSAGE, NETWORK_ERROR_MESSAGE};
use student_forecast::config::{ApiConfig, EmailMatching};
use student_forecast::session::{AuthError, SessionState, UserDirectory};
use student_forecast::storage::{Storage, AUTH_TOKEN_KEY, CURRENT_USER_KEY};
use tempfile::{tempdir, TempDir};

fn setup_client(base_url: &str) -> Result<(ApiClient, Storage, TempDir)> {
    let dir = tempdir()?;
    let storage = Storage::open(dir.path())?;
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: None,
    };
    let client = ApiClient::new(&config, storage.local()?)?;
    Ok((client, storage, dir))
}

#[tokio::test]
async fn test_login_stores_token() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/auth/login")
        .match_body(Matcher::Json(json!({
            "email": "ada@uni.edu",
            "password": "pw"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token":"abc123"}"#)
        .create_async()
        .await;

    let (client, storage, _dir) = setup_client(&format!("{}/api", server.url()))?;

    let token = client.login("ada@uni.edu", "pw").await?;
    assert_eq!(token, "abc123");
    assert_eq!(storage.local()?.get(AUTH_TOKEN_KEY)?, Some("abc123".to_string()));
    assert!(client.is_authenticated()?);

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_login_rejection_uses_server_message() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/auth/login")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Invalid email or password"}"#)
        .create_async()
        .await;

    let (client, _storage, _dir) = setup_client(&format!("{}/api", server.url()))?;

    let err = client.login("ada@uni.edu", "bad").await.unwrap_err();
    assert!(matches!(err, ApiError::AuthenticationFailed(_)));
    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(!client.is_authenticated()?);
    Ok(())
}

#[tokio::test]
async fn test_login_rejection_without_message() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/auth/login")
        .with_status(500)
        .with_body("<html>oops</html>")
        .create_async()
        .await;

    let (client, _storage, _dir) = setup_client(&format!("{}/api", server.url()))?;

    let err = client.login("ada@uni.edu", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), LOGIN_FAILED_MESSAGE);
    Ok(())
}

#[tokio::test]
async fn test_login_success_without_token_fails() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let (client, _storage, _dir) = setup_client(&format!("{}/api", server.url()))?;

    let err = client.login("ada@uni.edu", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), LOGIN_FAILED_MESSAGE);
    assert!(!client.is_authenticated()?);
    Ok(())
}

#[tokio::test]
async fn test_login_network_failure() -> Result<()> {
    // Nothing listens on port 1
    let (client, _storage, _dir) = setup_client("http://127.0.0.1:1/api")?;

    let err = client.login("ada@uni.edu", "pw").await.unwrap_err();
    assert!(matches!(err, ApiError::NetworkError));
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
    Ok(())
}

#[tokio::test]
async fn test_logout_clears_token() -> Result<()> {
    let (client, storage, _dir) = setup_client("http://127.0.0.1:1/api")?;
    storage.local()?.put(AUTH_TOKEN_KEY, "abc")?;
    assert!(client.is_authenticated()?);

    client.logout()?;
    client.logout()?;
    assert!(!client.is_authenticated()?);
    Ok(())
}

#[test]
fn test_session_flow_across_restarts() -> Result<()> {
    let dir = tempdir()?;

    let user = {
        let storage = Storage::open(dir.path())?;
        let mut session = SessionState::hydrate(storage.local()?, EmailMatching::Exact)?;
        session.signup("Grace Hopper", "grace@uni.edu", "cobol")?
    };

    let storage = Storage::open(dir.path())?;
    let mut session = SessionState::hydrate(storage.local()?, EmailMatching::Exact)?;
    assert_eq!(session.current_user(), Some(&user));

    session.logout()?;
    assert!(!session.is_authenticated());
    assert_eq!(storage.local()?.get(CURRENT_USER_KEY)?, None);

    let err = session.signup("Someone", "grace@uni.edu", "x").unwrap_err();
    assert!(matches!(err, AuthError::AlreadyExists(_)));
    assert!(!session.is_authenticated());

    let directory = UserDirectory::load(&storage.local()?)?;
    assert_eq!(directory.len(), 1);
    assert_eq!(directory.iter().next().map(|c| c.password.as_str()), Some("cobol"));

    let again = session.login("grace@uni.edu", "cobol")?;
    assert_eq!(again, user);
    Ok(())
}
