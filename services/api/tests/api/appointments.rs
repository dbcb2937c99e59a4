use crate::helpers::spawn_app;
use serde_json::{json, Value};

#[tokio::test]
async fn booking_returns_pending_appointment_priced_at_doctor_fee() {
    let app = spawn_app().await;
    let (doctor, _) = app.create_doctor("doc@example.com", 65.0).await;
    let (patient_id, token) = app.register_patient("pat@example.com").await;

    let response = app.book(&token, doctor.doctor.id, "2025-01-02", "10:00 AM").await;

    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["paymentStatus"], "PENDING");
    assert_eq!(body["paymentAmount"], 65.0);
    assert_eq!(body["timeSlot"], "10:00 AM");
    assert_eq!(body["appointmentDate"], "2025-01-02");
    assert_eq!(body["patientId"], patient_id.to_string());
}

#[tokio::test]
async fn booking_a_taken_slot_returns_409() {
    let app = spawn_app().await;
    let (doctor, _) = app.create_doctor("doc@example.com", 65.0).await;
    let (_, first) = app.register_patient("first@example.com").await;
    let (_, second) = app.register_patient("second@example.com").await;

    let response = app.book(&first, doctor.doctor.id, "2025-01-02", "10:00 AM").await;
    assert_eq!(201, response.status().as_u16());

    let response = app.book(&second, doctor.doctor.id, "2025-01-02", "10:00 AM").await;
    assert_eq!(409, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "This time slot is already booked");
}

#[tokio::test]
async fn cancelled_slot_can_be_booked_again() {
    let app = spawn_app().await;
    let (doctor, _) = app.create_doctor("doc@example.com", 65.0).await;
    let (_, token) = app.register_patient("pat@example.com").await;

    let booked: Value = app
        .book(&token, doctor.doctor.id, "2025-01-02", "11:00 AM")
        .await
        .json()
        .await
        .unwrap();
    let id = booked["id"].as_str().unwrap();
    let response = app
        .put(&format!("/appointments/{}/cancel", id), Some(&token), &json!({ "reason": "Travel" }))
        .await;
    assert_eq!(200, response.status().as_u16());
    let cancelled: Value = response.json().await.unwrap();
    assert_eq!(cancelled["status"], "CANCELLED");
    assert_eq!(cancelled["cancellationReason"], "Travel");

    let response = app.book(&token, doctor.doctor.id, "2025-01-02", "11:00 AM").await;
    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn booking_outside_the_window_returns_400() {
    let app = spawn_app().await;
    let (doctor, _) = app.create_doctor("doc@example.com", 65.0).await;
    let (_, token) = app.register_patient("pat@example.com").await;

    let response = app.book(&token, doctor.doctor.id, "2025-01-02", "09:30 PM").await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn only_patients_may_book() {
    let app = spawn_app().await;
    let (doctor, doctor_token) = app.create_doctor("doc@example.com", 65.0).await;

    let response = app.book(&doctor_token, doctor.doctor.id, "2025-01-02", "10:00 AM").await;

    assert_eq!(403, response.status().as_u16());
}

#[tokio::test]
async fn cancel_by_another_patient_returns_403() {
    let app = spawn_app().await;
    let (doctor, _) = app.create_doctor("doc@example.com", 65.0).await;
    let (_, owner) = app.register_patient("owner@example.com").await;
    let (_, stranger) = app.register_patient("stranger@example.com").await;

    let booked: Value = app
        .book(&owner, doctor.doctor.id, "2025-01-02", "10:00 AM")
        .await
        .json()
        .await
        .unwrap();
    let path = format!("/appointments/{}/cancel", booked["id"].as_str().unwrap());

    let response = app.put(&path, Some(&stranger), &json!({})).await;

    assert_eq!(403, response.status().as_u16());
}

#[tokio::test]
async fn cancel_twice_or_after_completion_returns_400() {
    let app = spawn_app().await;
    let (doctor, doctor_token) = app.create_doctor("doc@example.com", 65.0).await;
    let (_, token) = app.register_patient("pat@example.com").await;

    let first: Value = app
        .book(&token, doctor.doctor.id, "2025-01-02", "10:00 AM")
        .await
        .json()
        .await
        .unwrap();
    let second: Value = app
        .book(&token, doctor.doctor.id, "2025-01-02", "10:30 AM")
        .await
        .json()
        .await
        .unwrap();
    let first_id = first["id"].as_str().unwrap();
    let second_id = second["id"].as_str().unwrap();

    let cancel = |id: &str| format!("/appointments/{}/cancel", id);
    assert_eq!(200, app.put(&cancel(first_id), Some(&token), &json!({})).await.status().as_u16());
    let response = app.put(&cancel(first_id), Some(&token), &json!({})).await;
    assert_eq!(400, response.status().as_u16());

    let response = app
        .put(&format!("/appointments/{}/complete", second_id), Some(&doctor_token), &json!({}))
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "COMPLETED");

    let response = app.put(&cancel(second_id), Some(&token), &json!({})).await;
    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Cannot cancel completed appointment");
}

#[tokio::test]
async fn doctor_cannot_touch_another_doctors_appointment() {
    let app = spawn_app().await;
    let (doctor, doctor_token) = app.create_doctor("doc@example.com", 65.0).await;
    let (_, other_token) = app.create_doctor("other@example.com", 30.0).await;
    let (_, token) = app.register_patient("pat@example.com").await;

    let booked: Value = app
        .book(&token, doctor.doctor.id, "2025-01-02", "10:00 AM")
        .await
        .json()
        .await
        .unwrap();
    let id = booked["id"].as_str().unwrap();

    let response = app
        .put(&format!("/appointments/{}/complete", id), Some(&other_token), &json!({}))
        .await;
    assert_eq!(403, response.status().as_u16());

    let response = app
        .put(&format!("/appointments/{}/cancel", id), Some(&other_token), &json!({}))
        .await;
    assert_eq!(403, response.status().as_u16());

    let response = app
        .put(
            &format!("/appointments/{}/status", id),
            Some(&doctor_token),
            &json!({ "status": "CONFIRMED" }),
        )
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "CONFIRMED");
}

#[tokio::test]
async fn patient_lists_own_appointments_on_both_routes() {
    let app = spawn_app().await;
    let (doctor, _) = app.create_doctor("doc@example.com", 65.0).await;
    let (_, token) = app.register_patient("pat@example.com").await;
    let (_, other) = app.register_patient("other@example.com").await;
    app.book(&token, doctor.doctor.id, "2025-01-02", "10:00 AM").await;
    app.book(&other, doctor.doctor.id, "2025-01-02", "10:30 AM").await;

    for path in ["/appointments/user", "/user/appointments"] {
        let mine: Vec<Value> = app.get(path, Some(&token)).await.json().await.unwrap();
        assert_eq!(mine.len(), 1, "{}", path);
        assert_eq!(mine[0]["timeSlot"], "10:00 AM");
        assert_eq!(mine[0]["doctor"]["name"], "doc", "{}", path);
        assert_eq!(mine[0]["doctor"]["email"], "doc@example.com");
        assert_eq!(mine[0]["doctor"]["speciality"], "General_physician");
        assert_eq!(mine[0]["doctor"]["id"], doctor.doctor.id.to_string());
        assert_eq!(mine[0]["patient"]["name"], "Pat Patient");
    }
}

#[tokio::test]
async fn complete_succeeds_whatever_the_current_status() {
    let app = spawn_app().await;
    let (doctor, doctor_token) = app.create_doctor("doc@example.com", 65.0).await;
    let (_, token) = app.register_patient("pat@example.com").await;
    let booked: Value = app
        .book(&token, doctor.doctor.id, "2025-01-02", "10:00 AM")
        .await
        .json()
        .await
        .unwrap();
    let id = booked["id"].as_str().unwrap();
    let complete = format!("/appointments/{}/complete", id);

    let response = app.put(&complete, Some(&doctor_token), &json!({})).await;
    assert_eq!(200, response.status().as_u16());
    let response = app.put(&complete, Some(&doctor_token), &json!({})).await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "COMPLETED");
}

#[tokio::test]
async fn reviving_a_cancelled_booking_into_a_rebooked_slot_returns_409() {
    let app = spawn_app().await;
    let (doctor, doctor_token) = app.create_doctor("doc@example.com", 65.0).await;
    let (_, first) = app.register_patient("first@example.com").await;
    let (_, second) = app.register_patient("second@example.com").await;

    let booked: Value = app
        .book(&first, doctor.doctor.id, "2025-01-02", "10:00 AM")
        .await
        .json()
        .await
        .unwrap();
    let id = booked["id"].as_str().unwrap();
    let response = app
        .put(&format!("/appointments/{}/cancel", id), Some(&first), &json!({}))
        .await;
    assert_eq!(200, response.status().as_u16());
    let response = app.book(&second, doctor.doctor.id, "2025-01-02", "10:00 AM").await;
    assert_eq!(201, response.status().as_u16());

    let response = app
        .put(
            &format!("/appointments/{}/status", id),
            Some(&doctor_token),
            &json!({ "status": "PENDING" }),
        )
        .await;
    assert_eq!(409, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "This time slot is already booked");
}

#[tokio::test]
async fn malformed_input_returns_400_with_json_message() {
    let app = spawn_app().await;
    let (doctor, _) = app.create_doctor("doc@example.com", 65.0).await;
    let (_, token) = app.register_patient("pat@example.com").await;

    // Missing doctorId.
    let response = app
        .post(
            "/appointments/book",
            Some(&token),
            &json!({ "appointmentDate": "2025-01-02", "timeSlot": "10:00 AM" }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 400);
    assert!(body["message"].as_str().unwrap().contains("doctorId"));

    // Not JSON at all.
    let response = app
        .client
        .post(app.url("/appointments/book"))
        .bearer_auth(&token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].is_string());

    let response = app.get("/doctors/not-a-uuid", None).await;
    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].is_string());

    let response = app
        .put("/appointments/not-a-uuid/cancel", Some(&token), &json!({}))
        .await;
    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].is_string());

    let response = app.book(&token, doctor.doctor.id, "2025-01-02", "10:00 AM").await;
    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn cancel_without_a_body_is_accepted() {
    let app = spawn_app().await;
    let (doctor, _) = app.create_doctor("doc@example.com", 65.0).await;
    let (_, token) = app.register_patient("pat@example.com").await;
    let booked: Value = app
        .book(&token, doctor.doctor.id, "2025-01-02", "10:00 AM")
        .await
        .json()
        .await
        .unwrap();

    let response = app
        .client
        .put(app.url(&format!("/appointments/{}/cancel", booked["id"].as_str().unwrap())))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "CANCELLED");
}
