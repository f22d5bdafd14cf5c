//! End-to-end flows against a real Postgres.
//!
//! Ignored by default; run with `DATABASE_URL` set and `--ignored`.
//! `sqlx::test` creates a fresh database per test and applies the migrations.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with_mailer, get_authed, post_json,
    post_json_authed,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use venuebook_mail::{MailErrorCode, MailException, Mailer, OutgoingMail};

/// Rejects every mail the way an SMTP provider would.
struct RejectingMailer;

#[async_trait]
impl Mailer for RejectingMailer {
    async fn send(&self, _mail: &OutgoingMail) -> Result<(), MailException> {
        Err(MailException::with_detail(
            MailErrorCode::ProviderRejected,
            json!({ "smtp": "550 mailbox unavailable" }),
        ))
    }
}

async fn register(app: axum::Router, name: &str, email: &str, role: &str) -> Value {
    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({
            "name": name,
            "email": email,
            "password": "correct-horse-battery",
            "phone": "0912345678",
            "role": role,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn login(app: axum::Router, email: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": "correct-horse-battery" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["data"]["access_token"].as_str().unwrap().to_string()
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn registration_normalizes_phone_and_advances_on_sent(pool: PgPool) {
    let user = register(build_test_app(pool), "Lan", "lan@example.com", "customer").await;

    assert_eq!(user["phone"], "+84912345678");
    assert_eq!(user["registration_type"], "PENDING_VERIFY");
    assert!(user.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn rejected_mail_is_recorded_and_registration_succeeds(pool: PgPool) {
    let app = build_test_app_with_mailer(pool.clone(), Arc::new(RejectingMailer));
    let user = register(app, "Lan", "lan@example.com", "customer").await;

    assert_eq!(user["registration_type"], "NEW_REGISTER");

    let (status, code): (String, Option<String>) =
        sqlx::query_as("SELECT status, error_code FROM mail_logs WHERE user_id = $1")
            .bind(user["id"].as_i64().unwrap())
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status, "FAILED");
    assert_eq!(code.as_deref(), Some("PROVIDER_REJECTED"));
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_email_is_conflict(pool: PgPool) {
    register(build_test_app(pool.clone()), "Lan", "lan@example.com", "customer").await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/auth/register",
        json!({
            "name": "Lan Again",
            "email": "LAN@example.com",
            "password": "correct-horse-battery",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn booking_lifecycle(pool: PgPool) {
    let app = || build_test_app(pool.clone());

    register(app(), "Minh", "minh@example.com", "manager").await;
    let customer = register(app(), "Lan", "lan@example.com", "customer").await;
    let manager_token = login(app(), "minh@example.com").await;
    let customer_token = login(app(), "lan@example.com").await;

    // Venue and space.
    let response = post_json_authed(
        app(),
        "/api/v1/venues",
        json!({ "name": "Riverside", "address": "1 River Rd", "phone": "0281234567" }),
        &manager_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let venue = body_json(response).await["data"].clone();
    assert_eq!(venue["phone"], "+84281234567");

    let response = post_json_authed(
        app(),
        &format!("/api/v1/venues/{}/spaces", venue["id"]),
        json!({ "name": "Court A", "capacity": 4 }),
        &manager_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let space = body_json(response).await["data"].clone();

    // Customer books.
    let booking_body = json!({
        "space_id": space["id"],
        "start_time": "2026-05-01T09:00:00Z",
        "end_time": "2026-05-01T10:00:00Z",
    });
    let response = post_json_authed(
        app(),
        "/api/v1/bookings",
        booking_body.clone(),
        &customer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let summary = body_json(response).await["data"].clone();
    assert_eq!(summary["user"], json!({ "id": customer["id"], "name": "Lan" }));
    assert_eq!(summary["space"]["name"], "Court A");
    assert_eq!(summary["space"]["venue"]["name"], "Riverside");

    // Same slot again conflicts.
    let response = post_json_authed(app(), "/api/v1/bookings", booking_body, &customer_token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Walk-in guest booking by the manager in a free slot.
    let response = post_json_authed(
        app(),
        "/api/v1/bookings",
        json!({
            "space_id": space["id"],
            "start_time": "2026-05-01T11:00:00Z",
            "end_time": "2026-05-01T12:00:00Z",
            "guest_name": "Walk-in",
            "guest_phone": "0987654321",
        }),
        &manager_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let guest = body_json(response).await["data"].clone();
    assert!(guest["user"].is_null());
    assert_eq!(guest["guest_phone"], "+84987654321");

    // Customer lists only their own booking, filtered by date.
    let response = get_authed(
        app(),
        "/api/v1/bookings?from=2026-05-01T00:00:00Z&sort=start_time:desc",
        &customer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], summary["id"]);

    // Cancel, then the confirmation and cancellation mails are both logged.
    let id = summary["id"].as_i64().unwrap();
    let response = post_json_authed(
        app(),
        &format!("/api/v1/bookings/{id}/cancel"),
        json!({}),
        &customer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "cancelled");

    let response = get_authed(
        app(),
        &format!("/api/v1/bookings/{id}/mail-logs"),
        &manager_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let logs = body_json(response).await["data"].clone();
    assert_eq!(logs.as_array().map(Vec::len), Some(2));
    assert!(logs.as_array().unwrap().iter().all(|l| l["status"] == "SENT"));
}

/// A manager with one venue and one space, plus a registered customer.
struct Court {
    space_id: i64,
    manager_token: String,
    customer_token: String,
}

async fn court(pool: &PgPool) -> Court {
    let app = || build_test_app(pool.clone());

    register(app(), "Minh", "minh@example.com", "manager").await;
    register(app(), "Lan", "lan@example.com", "customer").await;
    let manager_token = login(app(), "minh@example.com").await;
    let customer_token = login(app(), "lan@example.com").await;

    let response = post_json_authed(
        app(),
        "/api/v1/venues",
        json!({ "name": "Riverside", "address": "1 River Rd" }),
        &manager_token,
    )
    .await;
    let venue = body_json(response).await["data"].clone();

    let response = post_json_authed(
        app(),
        &format!("/api/v1/venues/{}/spaces", venue["id"]),
        json!({ "name": "Court A", "capacity": 4 }),
        &manager_token,
    )
    .await;
    let space = body_json(response).await["data"].clone();

    Court {
        space_id: space["id"].as_i64().unwrap(),
        manager_token,
        customer_token,
    }
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_creates_for_one_slot_book_it_once(pool: PgPool) {
    let court = court(&pool).await;
    let body = json!({
        "space_id": court.space_id,
        "start_time": "2026-05-01T09:00:00Z",
        "end_time": "2026-05-01T10:00:00Z",
    });

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let app = build_test_app(pool.clone());
            let body = body.clone();
            let token = court.customer_token.clone();
            tokio::spawn(async move {
                post_json_authed(app, "/api/v1/bookings", body, &token)
                    .await
                    .status()
            })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for task in tasks {
        match task.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM bookings WHERE space_id = $1 AND status <> 'cancelled'",
    )
    .bind(court.space_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(active, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn back_to_back_and_cancelled_slots_can_be_booked(pool: PgPool) {
    let court = court(&pool).await;
    let app = || build_test_app(pool.clone());
    let slot = |start: &str, end: &str| {
        json!({ "space_id": court.space_id, "start_time": start, "end_time": end })
    };

    let response = post_json_authed(
        app(),
        "/api/v1/bookings",
        slot("2026-05-01T09:00:00Z", "2026-05-01T10:00:00Z"),
        &court.customer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_authed(
        app(),
        "/api/v1/bookings",
        slot("2026-05-01T10:00:00Z", "2026-05-01T11:00:00Z"),
        &court.customer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_authed(
        app(),
        &format!("/api/v1/bookings/{id}/cancel"),
        json!({}),
        &court.customer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_authed(
        app(),
        "/api/v1/bookings",
        slot("2026-05-01T09:00:00Z", "2026-05-01T10:00:00Z"),
        &court.customer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_cancels_cancel_once(pool: PgPool) {
    let court = court(&pool).await;
    let response = post_json_authed(
        build_test_app(pool.clone()),
        "/api/v1/bookings",
        json!({
            "space_id": court.space_id,
            "start_time": "2026-05-01T09:00:00Z",
            "end_time": "2026-05-01T10:00:00Z",
        }),
        &court.customer_token,
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let tasks: Vec<_> = [court.customer_token.clone(), court.manager_token.clone()]
        .into_iter()
        .map(|token| {
            let app = build_test_app(pool.clone());
            tokio::spawn(async move {
                post_json_authed(app, &format!("/api/v1/bookings/{id}/cancel"), json!({}), &token)
                    .await
                    .status()
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for task in tasks {
        statuses.push(task.await.unwrap());
    }
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);

    let cancellation_mails: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM mail_logs WHERE booking_id = $1 AND template = 'booking_cancelled'",
    )
    .bind(id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(cancellation_mails, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn registration_succeeds_when_status_update_fails(pool: PgPool) {
    sqlx::query(
        "CREATE FUNCTION reject_user_update() RETURNS trigger LANGUAGE plpgsql AS $$ \
         BEGIN RAISE EXCEPTION 'users are read-only'; END $$",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER users_read_only BEFORE UPDATE ON users \
         FOR EACH ROW EXECUTE FUNCTION reject_user_update()",
    )
    .execute(&pool)
    .await
    .unwrap();

    let user = register(build_test_app(pool.clone()), "Lan", "lan@example.com", "customer").await;
    assert_eq!(user["registration_type"], "NEW_REGISTER");

    let stored: String = sqlx::query_scalar("SELECT registration_type FROM users WHERE id = $1")
        .bind(user["id"].as_i64().unwrap())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, "NEW_REGISTER");
}
