use crate::helpers::{spawn_app, PASSWORD};
use serde_json::{json, Value};
use uuid::Uuid;

fn signup(email: &str) -> Value {
    json!({
        "email": email,
        "password": PASSWORD,
        "name": "Dr. Grey",
        "speciality": "Neurologist",
        "degree": "MBBS",
        "experience": "4 Years",
        "about": "Headaches and more.",
        "fees": 80.0,
        "addressLine1": "2 Clinic Rd"
    })
}

#[tokio::test]
async fn self_registered_doctor_is_hidden_until_approved() {
    let app = spawn_app().await;
    let admin = app.create_admin("admin@example.com").await;

    let response = app.post("/doctors/register", None, &signup("grey@example.com")).await;
    assert_eq!(201, response.status().as_u16());
    let doctor: Value = response.json().await.unwrap();
    assert_eq!(doctor["isApproved"], false);
    let doc_id = doctor["id"].as_str().unwrap().to_string();

    let listed: Vec<Value> = app.get("/doctors", None).await.json().await.unwrap();
    assert!(listed.is_empty());

    let response = app
        .post("/admin/change-approval", Some(&admin), &json!({ "docId": doc_id }))
        .await;
    assert_eq!(200, response.status().as_u16());

    let listed: Vec<Value> = app.get("/doctors", None).await.json().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["user"]["name"], "Dr. Grey");
}

#[tokio::test]
async fn listing_filters_by_speciality() {
    let app = spawn_app().await;
    app.create_doctor("gp@example.com", 50.0).await;

    let all: Vec<Value> = app.get("/doctors?speciality=all", None).await.json().await.unwrap();
    assert_eq!(all.len(), 1);

    let gps: Vec<Value> = app
        .get("/doctors/speciality/General_physician", None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(gps.len(), 1);

    let neuro: Vec<Value> = app
        .get("/doctors?speciality=Neurologist", None)
        .await
        .json()
        .await
        .unwrap();
    assert!(neuro.is_empty());

    let response = app.get("/doctors?speciality=Astrologist", None).await;
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn unknown_doctor_returns_404() {
    let app = spawn_app().await;

    let response = app.get(&format!("/doctors/{}", Uuid::new_v4()), None).await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn future_day_offers_every_slot_except_booked_ones() {
    let app = spawn_app().await;
    let (doctor, _) = app.create_doctor("slots@example.com", 50.0).await;
    let (_, patient) = app.register_patient("pat@example.com").await;
    let path = format!("/doctors/{}/slots?date=2999-01-02", doctor.doctor.id);

    let slots: Vec<Value> = app.get(&path, None).await.json().await.unwrap();
    assert_eq!(slots.len(), 22);
    assert_eq!(slots[0]["time"], "10:00 AM");
    assert_eq!(slots[21]["time"], "08:30 PM");

    let response = app.book(&patient, doctor.doctor.id, "2999-01-02", "01:30 PM").await;
    assert_eq!(201, response.status().as_u16());

    let slots: Vec<Value> = app.get(&path, None).await.json().await.unwrap();
    assert_eq!(slots.len(), 21);
    assert!(slots.iter().all(|s| s["time"] != "01:30 PM"));
}

#[tokio::test]
async fn unavailable_doctor_has_no_slots() {
    let app = spawn_app().await;
    let (doctor, token) = app.create_doctor("away@example.com", 50.0).await;

    let response = app
        .put("/doctors/profile", Some(&token), &json!({ "available": false }))
        .await;
    assert_eq!(200, response.status().as_u16());

    let path = format!("/doctors/{}/slots?date=2999-01-02", doctor.doctor.id);
    let slots: Vec<Value> = app.get(&path, None).await.json().await.unwrap();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn doctor_cannot_change_own_approval_or_speciality() {
    let app = spawn_app().await;
    let (_, token) = app.create_doctor("self@example.com", 50.0).await;

    let response = app
        .put(
            "/doctors/profile",
            Some(&token),
            &json!({ "fees": 75.0, "speciality": "Neurologist", "isApproved": false }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["fees"], 75.0);
    assert_eq!(body["speciality"], "General_physician");
    assert_eq!(body["isApproved"], true);
}

#[tokio::test]
async fn dashboard_counts_paid_earnings_and_distinct_patients() {
    let app = spawn_app().await;
    let admin = app.create_admin("admin@example.com").await;
    let (doctor, token) = app.create_doctor("dash@example.com", 40.0).await;
    let (_, pat) = app.register_patient("pat@example.com").await;

    for slot in ["10:00 AM", "10:30 AM"] {
        let response = app.book(&pat, doctor.doctor.id, "2999-01-02", slot).await;
        assert_eq!(201, response.status().as_u16());
    }
    let mine: Vec<Value> = app.get("/doctors/my/appointments", Some(&token)).await.json().await.unwrap();
    let id = mine[0]["id"].as_str().unwrap();
    let response = app
        .post(&format!("/admin/appointments/{}/confirm-payment", id), Some(&admin), &json!({}))
        .await;
    assert_eq!(200, response.status().as_u16());

    let dash: Value = app.get("/doctors/dashboard", Some(&token)).await.json().await.unwrap();
    assert_eq!(dash["appointments"], 2);
    assert_eq!(dash["patients"], 1);
    assert_eq!(dash["earnings"], 40.0);
    assert_eq!(dash["latestAppointments"].as_array().unwrap().len(), 2);
    assert_eq!(dash["latestAppointments"][0]["patient"]["email"], "pat@example.com");
    assert_eq!(mine[0]["patient"]["name"], "Pat Patient");
}
