use crate::helpers::{spawn_app, PASSWORD};
use rstest::rstest;
use serde_json::{json, Value};

#[tokio::test]
async fn register_returns_201_with_patient_and_token() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/auth/register",
            None,
            &json!({ "email": "New@Example.com", "password": PASSWORD, "name": "New Patient", "phone": "555-0100" }),
        )
        .await;

    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["role"], "PATIENT");
    assert_eq!(body["user"]["email"], "new@example.com");
    assert!(body["user"].get("password").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn register_with_taken_email_returns_409() {
    let app = spawn_app().await;
    app.register_patient("twice@example.com").await;

    let response = app
        .post(
            "/auth/register",
            None,
            &json!({ "email": "twice@example.com", "password": PASSWORD, "name": "Again" }),
        )
        .await;

    assert_eq!(409, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 409);
}

#[rstest]
#[case(json!({ "email": "not-an-email", "password": "password123", "name": "X" }))]
#[case(json!({ "email": "short@example.com", "password": "12345", "name": "X" }))]
#[case(json!({ "email": "admin@example.com", "password": "password123", "name": "X", "role": "ADMIN" }))]
#[case(json!({ "email": "doc@example.com", "password": "password123", "name": "X", "role": "DOCTOR" }))]
#[tokio::test]
async fn register_rejects_invalid_payloads_with_400(#[case] body: Value) {
    let app = spawn_app().await;

    let response = app.post("/auth/register", None, &body).await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn login_returns_token_for_valid_credentials() {
    let app = spawn_app().await;
    app.register_patient("login@example.com").await;

    let token = app.login("login@example.com").await;

    let response = app.get("/user/profile", Some(&token)).await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], "login@example.com");
}

#[rstest]
#[case("login@example.com", "wrong-password")]
#[case("nobody@example.com", "password123")]
#[tokio::test]
async fn login_with_bad_credentials_returns_401(#[case] email: &str, #[case] password: &str) {
    let app = spawn_app().await;
    app.register_patient("login@example.com").await;

    let response = app
        .post(
            "/auth/login",
            None,
            &json!({ "email": email, "password": password }),
        )
        .await;

    assert_eq!(401, response.status().as_u16());
}

#[rstest]
#[case(None)]
#[case(Some("not.a.jwt"))]
#[tokio::test]
async fn protected_route_without_valid_token_returns_401(#[case] token: Option<&str>) {
    let app = spawn_app().await;

    let response = app.get("/user/profile", token).await;

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn profile_update_changes_only_given_fields() {
    let app = spawn_app().await;
    let (_, token) = app.register_patient("profile@example.com").await;

    let response = app
        .put(
            "/user/profile",
            Some(&token),
            &json!({ "addressLine1": "1 Main St", "gender": "FEMALE", "dateOfBirth": "1990-04-12" }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Pat Patient");
    assert_eq!(body["address"]["line1"], "1 Main St");
    assert_eq!(body["gender"], "FEMALE");
    assert_eq!(body["dateOfBirth"], "1990-04-12");
}
