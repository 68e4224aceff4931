/// API integration tests
/// Tests complete HTTP request/response cycles with real database
mod common;

use axum::http::StatusCode;
use common::{fixtures, TestApp};
use serde_json::{json, Value};

/// Create a poll through the API and return its id
async fn create_poll(app: &TestApp, token: &str, options: &[&str]) -> i64 {
    let (status, body) = app
        .post(
            "/api/polls",
            Some(token),
            json!({
                "title": "Best language?",
                "description": "Pick one",
                "options": options,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "ok");
}

#[tokio::test]
async fn test_registration_success() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "login": "newuser",
                "password": "password",
                "email": "new@example.com",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["login"], "newuser");
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["is_admin"], false);
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_registration_duplicate_login() {
    let app = TestApp::new().await;
    app.create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "login": fixtures::TEST_LOGIN,
                "password": "password",
                "email": "other@example.com",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Login already exists"));
}

#[tokio::test]
async fn test_registration_duplicate_email() {
    let app = TestApp::new().await;
    app.create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "login": "someoneelse",
                "password": "password",
                "email": format!("{}@test.com", fixtures::TEST_LOGIN),
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_registration_blank_login_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "login": "  ", "password": "password", "email": "x@example.com" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failure() {
    let app = TestApp::new().await;
    app.create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;

    let (status, wrong_password) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "login": fixtures::TEST_LOGIN, "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "login": "nobody", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Callers cannot tell which half was wrong
    assert_eq!(wrong_password, unknown_user);
}

/// Test login flow and token usage
#[tokio::test]
async fn test_login_flow() {
    let app = TestApp::new().await;
    app.create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;

    let (status, login_response) = app
        .post(
            "/api/auth/login",
            None,
            json!({
                "login": fixtures::TEST_LOGIN,
                "password": fixtures::TEST_PASSWORD,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(login_response["access_token"].is_string());
    assert!(login_response["refresh_token"].is_string());
    assert_eq!(login_response["user"]["login"], fixtures::TEST_LOGIN);

    // Use access token on a protected route
    let access_token = login_response["access_token"].as_str().unwrap();
    create_poll(&app, access_token, &["A", "B"]).await;

    // Exchange the refresh token for a new access token
    let (status, refreshed) = app
        .post(
            "/api/auth/refresh",
            None,
            json!({ "refresh_token": login_response["refresh_token"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(refreshed["access_token"].is_string());
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::new().await;
    let user = app
        .create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;
    let token = app.token_for(&user);

    let (status, _) = app
        .post("/api/auth/refresh", None, json!({ "refresh_token": token }))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post(
            "/api/polls",
            None,
            json!({ "title": "t", "options": ["A", "B"] }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/polls",
            Some("not-a-jwt"),
            json!({ "title": "t", "options": ["A", "B"] }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_route_denied_for_regular_user() {
    let app = TestApp::new().await;
    let user = app
        .create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;
    let token = app.token_for(&user);

    let (status, _) = app.get("/api/admin/polls", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/admin/users", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_route_granted_for_admin() {
    let app = TestApp::new().await;
    let admin = app
        .create_user(fixtures::ADMIN_LOGIN, fixtures::ADMIN_PASSWORD, true)
        .await;
    let token = app.token_for(&admin);

    let (status, polls) = app.get("/api/admin/polls", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(polls, json!([]));

    let (status, users) = app.get("/api/admin/users", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users[0]["login"], fixtures::ADMIN_LOGIN);
}

#[tokio::test]
async fn test_create_poll() {
    let app = TestApp::new().await;
    let user = app
        .create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;
    let token = app.token_for(&user);

    let poll_id = create_poll(&app, &token, &["Rust", " ", "Go "]).await;

    let (status, polls) = app.get("/api/polls", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(polls[0]["id"], poll_id);
    assert_eq!(polls[0]["creator_id"], user.id);
    assert_eq!(polls[0]["options"], json!(["Rust", "Go"]));
    assert_eq!(polls[0]["is_active"], true);
}

#[tokio::test]
async fn test_create_poll_needs_two_options() {
    let app = TestApp::new().await;
    let user = app
        .create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;
    let token = app.token_for(&user);

    let (status, body) = app
        .post(
            "/api/polls",
            Some(&token),
            json!({ "title": "Lonely", "options": ["Only", ""] }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("minimum two options"));
}

#[tokio::test]
async fn test_vote() {
    let app = TestApp::new().await;
    let user = app
        .create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;
    let token = app.token_for(&user);
    let poll_id = create_poll(&app, &token, &["A", "B"]).await;

    let (status, ballot) = app
        .post(
            &format!("/api/polls/{}/vote", poll_id),
            Some(&token),
            json!({ "option": "1" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ballot["option_index"], 1);

    let (status, detail) = app
        .get(&format!("/api/polls/{}", poll_id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["has_voted"], true);
    assert_eq!(detail["results"]["total_ballots"], 1);
    assert_eq!(detail["results"]["options"][1]["count"], 1);
    assert_eq!(detail["results"]["options"][1]["percentage"], 100.0);
}

#[tokio::test]
async fn test_double_vote_rejected() {
    let app = TestApp::new().await;
    let user = app
        .create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;
    let token = app.token_for(&user);
    let poll_id = create_poll(&app, &token, &["A", "B"]).await;
    let uri = format!("/api/polls/{}/vote", poll_id);

    let (status, _) = app.post(&uri, Some(&token), json!({ "option": 0 })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post(&uri, Some(&token), json!({ "option": 1 })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already voted"));

    // First ballot stands
    let (_, results) = app
        .get(&format!("/api/polls/{}/results", poll_id), None)
        .await;
    assert_eq!(results["total_ballots"], 1);
    assert_eq!(results["options"][0]["count"], 1);
}

#[tokio::test]
async fn test_vote_option_validation() {
    let app = TestApp::new().await;
    let user = app
        .create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;
    let token = app.token_for(&user);
    let poll_id = create_poll(&app, &token, &["A", "B"]).await;
    let uri = format!("/api/polls/{}/vote", poll_id);

    for body in [json!({}), json!({ "option": "abc" }), json!({ "option": 2 }), json!({ "option": -1 })] {
        let (status, _) = app.post(&uri, Some(&token), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, results) = app
        .get(&format!("/api/polls/{}/results", poll_id), None)
        .await;
    assert_eq!(results["total_ballots"], 0);
}

#[tokio::test]
async fn test_vote_on_missing_poll() {
    let app = TestApp::new().await;
    let user = app
        .create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;
    let token = app.token_for(&user);

    let (status, _) = app
        .post("/api/polls/999/vote", Some(&token), json!({ "option": 0 }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_anonymous_poll_view() {
    let app = TestApp::new().await;
    let user = app
        .create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;
    let token = app.token_for(&user);
    let poll_id = create_poll(&app, &token, &["A", "B"]).await;

    let (status, detail) = app.get(&format!("/api/polls/{}", poll_id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["poll"]["title"], "Best language?");
    assert!(detail.get("has_voted").is_none());
    assert_eq!(detail["results"]["options"][0]["percentage"], 0.0);
}

#[tokio::test]
async fn test_admin_close_and_delete_poll() {
    let app = TestApp::new().await;
    let user = app
        .create_user(fixtures::TEST_LOGIN, fixtures::TEST_PASSWORD, false)
        .await;
    let admin = app
        .create_user(fixtures::ADMIN_LOGIN, fixtures::ADMIN_PASSWORD, true)
        .await;
    let user_token = app.token_for(&user);
    let admin_token = app.token_for(&admin);
    let poll_id = create_poll(&app, &user_token, &["A", "B"]).await;

    // Regular users cannot close
    let (status, _) = app
        .post(
            &format!("/api/admin/polls/{}/close", poll_id),
            Some(&user_token),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            &format!("/api/admin/polls/{}/close", poll_id),
            Some(&admin_token),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Closed polls leave the public list and stop accepting ballots
    let (_, polls) = app.get("/api/polls", None).await;
    assert_eq!(polls, json!([]));

    let (status, _) = app
        .post(
            &format!("/api/polls/{}/vote", poll_id),
            Some(&user_token),
            json!({ "option": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Still visible to admins
    let (_, all) = app.get("/api/admin/polls", Some(&admin_token)).await;
    assert_eq!(all[0]["is_active"], false);

    let (status, _) = app
        .delete(&format!("/api/admin/polls/{}", poll_id), Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .get(&format!("/api/polls/{}/results", poll_id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .delete(&format!("/api/admin/polls/{}", poll_id), Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
