use api_lib::config::Config;
use api_lib::web::{auth::hash_password, build_router, AppState};
use booking_core::testing::{new_doctor, new_user, InMemoryDatabase};
use booking_core::{DatabaseService, DoctorProfile, NewUser, Role};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub address: String,
    pub db: Arc<InMemoryDatabase>,
    pub client: reqwest::Client,
}

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: String::new(),
        database_max_connections: 1,
        log_level: Level::INFO,
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expires_in_hours: 1,
        allowed_origins: vec!["http://localhost:3000".to_string()],
    }
}

/// Serves the real router on an ephemeral port, backed by the in-memory store.
pub async fn spawn_app() -> TestApp {
    let db = Arc::new(InMemoryDatabase::new());
    let state = Arc::new(AppState::new(db.clone(), Arc::new(test_config())));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}/api", port),
        db,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req.send().await.expect("Failed to execute request.")
    }

    pub async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> reqwest::Response {
        let mut req = self.client.request(method, self.url(path)).json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req.send().await.expect("Failed to execute request.")
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: &Value) -> reqwest::Response {
        self.send_json(reqwest::Method::POST, path, token, body).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: &Value) -> reqwest::Response {
        self.send_json(reqwest::Method::PUT, path, token, body).await
    }

    pub async fn login(&self, email: &str) -> String {
        let response = self
            .post(
                "/auth/login",
                None,
                &json!({ "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(200, response.status().as_u16(), "login failed for {}", email);
        let body: Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    /// Registers a patient through the API and returns `(user id, token)`.
    pub async fn register_patient(&self, email: &str) -> (Uuid, String) {
        let response = self
            .post(
                "/auth/register",
                None,
                &json!({ "email": email, "password": PASSWORD, "name": "Pat Patient" }),
            )
            .await;
        assert_eq!(201, response.status().as_u16());
        let body: Value = response.json().await.unwrap();
        let id = body["user"]["id"].as_str().unwrap().parse().unwrap();
        (id, body["token"].as_str().unwrap().to_string())
    }

    /// Admins cannot self-register, so they are written straight to the store.
    pub async fn create_admin(&self, email: &str) -> String {
        self.db
            .create_user(NewUser {
                hashed_password: hash_password(PASSWORD).unwrap(),
                ..new_user(email, Role::Admin)
            })
            .await
            .unwrap();
        self.login(email).await
    }

    /// An approved, available doctor with the given fee, plus its token.
    pub async fn create_doctor(&self, email: &str, fees: f64) -> (DoctorProfile, String) {
        let profile = self
            .db
            .create_doctor_with_user(
                NewUser {
                    hashed_password: hash_password(PASSWORD).unwrap(),
                    ..new_user(email, Role::Doctor)
                },
                new_doctor(fees),
            )
            .await
            .unwrap();
        let token = self.login(email).await;
        (profile, token)
    }

    pub async fn book(&self, token: &str, doctor_id: Uuid, date: &str, slot: &str) -> reqwest::Response {
        self.post(
            "/appointments/book",
            Some(token),
            &json!({ "doctorId": doctor_id, "appointmentDate": date, "timeSlot": slot }),
        )
        .await
    }
}
