use crate::helpers::{spawn_app, PASSWORD};
use serde_json::{json, Value};

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let app = spawn_app().await;
    let (_, patient) = app.register_patient("pat@example.com").await;

    let response = app.get("/admin/stats", None).await;
    assert_eq!(401, response.status().as_u16());

    let response = app.get("/admin/stats", Some(&patient)).await;
    assert_eq!(403, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 403);
}

#[tokio::test]
async fn stats_revenue_counts_only_paid_appointments() {
    let app = spawn_app().await;
    let admin = app.create_admin("admin@example.com").await;
    let (doctor, _) = app.create_doctor("doc@example.com", 50.0).await;
    let (_, token) = app.register_patient("pat@example.com").await;

    let stats: Value = app.get("/admin/stats", Some(&admin)).await.json().await.unwrap();
    assert_eq!(stats["totalRevenue"], 0.0);

    let mut ids = Vec::new();
    for slot in ["10:00 AM", "10:30 AM", "11:00 AM"] {
        let booked: Value = app
            .book(&token, doctor.doctor.id, "2025-01-02", slot)
            .await
            .json()
            .await
            .unwrap();
        ids.push(booked["id"].as_str().unwrap().to_string());
    }
    for id in &ids[..2] {
        let response = app
            .post(&format!("/admin/appointments/{}/confirm-payment", id), Some(&admin), &json!({}))
            .await;
        assert_eq!(200, response.status().as_u16());
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["paymentStatus"], "PAID");
        assert_eq!(body["status"], "CONFIRMED");
    }

    let stats: Value = app.get("/admin/stats", Some(&admin)).await.json().await.unwrap();
    assert_eq!(stats["totalRevenue"], 100.0);
    assert_eq!(stats["totalAppointments"], 3);
    assert_eq!(stats["pendingAppointments"], 1);
    assert_eq!(stats["totalUsers"], 3);
    assert_eq!(stats["totalDoctors"], 1);
    assert_eq!(stats["totalPatients"], 1);
}

#[tokio::test]
async fn paying_twice_returns_400() {
    let app = spawn_app().await;
    let admin = app.create_admin("admin@example.com").await;
    let (doctor, _) = app.create_doctor("doc@example.com", 50.0).await;
    let (_, token) = app.register_patient("pat@example.com").await;
    let booked: Value = app
        .book(&token, doctor.doctor.id, "2025-01-02", "10:00 AM")
        .await
        .json()
        .await
        .unwrap();
    let path = format!("/admin/appointments/{}/confirm-payment", booked["id"].as_str().unwrap());

    assert_eq!(200, app.post(&path, Some(&admin), &json!({})).await.status().as_u16());
    assert_eq!(400, app.post(&path, Some(&admin), &json!({})).await.status().as_u16());
}

#[tokio::test]
async fn users_are_paginated_and_filtered_by_role() {
    let app = spawn_app().await;
    let admin = app.create_admin("admin@example.com").await;
    for i in 0..5 {
        app.register_patient(&format!("pat{}@example.com", i)).await;
    }

    let page: Value = app
        .get("/admin/users?page=2&limit=2&role=PATIENT", Some(&admin))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 5);
    assert_eq!(page["page"], 2);
    assert_eq!(page["totalPages"], 3);
    let users = page["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["email"], "pat2@example.com");

    let response = app.get("/admin/users?role=ROBOT", Some(&admin)).await;
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn admin_adds_updates_and_deletes_a_doctor() {
    let app = spawn_app().await;
    let admin = app.create_admin("admin@example.com").await;

    let response = app
        .post(
            "/admin/add-doctor",
            Some(&admin),
            &json!({
                "email": "added@example.com",
                "password": PASSWORD,
                "name": "Dr. Added",
                "speciality": "Dermatologist",
                "degree": "MD",
                "experience": "10 Years",
                "fees": 120.0
            }),
        )
        .await;
    assert_eq!(201, response.status().as_u16());
    let doctor: Value = response.json().await.unwrap();
    assert_eq!(doctor["isApproved"], true);
    let id = doctor["id"].as_str().unwrap().to_string();

    let response = app
        .put(&format!("/admin/doctors/{}", id), Some(&admin), &json!({ "fees": 90.0, "isApproved": false }))
        .await;
    assert_eq!(200, response.status().as_u16());
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["fees"], 90.0);
    assert_eq!(updated["isApproved"], false);

    let all: Vec<Value> = app.get("/admin/all-doctors", Some(&admin)).await.json().await.unwrap();
    assert_eq!(all.len(), 1);

    let response = app
        .post("/admin/delete-doctor", Some(&admin), &json!({ "docId": id }))
        .await;
    assert_eq!(200, response.status().as_u16());
    let all: Vec<Value> = app.get("/admin/all-doctors", Some(&admin)).await.json().await.unwrap();
    assert!(all.is_empty());

    let response = app
        .post("/auth/login", None, &json!({ "email": "added@example.com", "password": PASSWORD }))
        .await;
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn admin_lists_and_deletes_appointments() {
    let app = spawn_app().await;
    let admin = app.create_admin("admin@example.com").await;
    let (doctor, _) = app.create_doctor("doc@example.com", 50.0).await;
    let (_, token) = app.register_patient("pat@example.com").await;
    let booked: Value = app
        .book(&token, doctor.doctor.id, "2025-01-02", "10:00 AM")
        .await
        .json()
        .await
        .unwrap();
    let id = booked["id"].as_str().unwrap();

    let page: Value = app
        .get("/admin/appointments?status=PENDING", Some(&admin))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["appointments"][0]["doctor"]["name"], "doc");
    assert_eq!(page["appointments"][0]["patient"]["email"], "pat@example.com");

    let response = app.get("/admin/appointments?page=abc", Some(&admin)).await;
    assert_eq!(400, response.status().as_u16());

    let response = app
        .client
        .delete(app.url(&format!("/admin/appointments/{}", id)))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());

    let page: Value = app.get("/admin/appointments", Some(&admin)).await.json().await.unwrap();
    assert_eq!(page["total"], 0);
}
