//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `techsprint_test`)
//!   `TEST_DB_PASSWORD` (default: `techsprint_test`)
//!   `TEST_DB_NAME` (default: `techsprint_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use sea_orm::Set;
use techsprint_db::entities::{qr_code, registrant, registrant::RegistrationStatus};
use techsprint_db::repositories::{QrCodeRepository, RegistrantRepository};
use techsprint_db::test_utils::{TestDatabase, TestDbConfig};

fn qr_model(id: &str, usage: i32, active: bool) -> qr_code::ActiveModel {
    qr_code::ActiveModel {
        id: Set(id.to_string()),
        upi_id: Set(format!("{id}@upi")),
        qr_image_url: Set(format!("https://cdn.example.com/{id}.png")),
        daily_limit: Set(100),
        today_usage: Set(usage),
        active: Set(active),
        created_at: Set(Utc::now().into()),
    }
}

fn registrant_model(id: &str, qr_id: &str) -> registrant::ActiveModel {
    registrant::ActiveModel {
        id: Set(id.to_string()),
        reg_no: Set(format!("REG-{id}")),
        name: Set("Test Registrant".to_string()),
        email: Set("registrant@example.com".to_string()),
        phone: Set("9876543210".to_string()),
        college: Set("RGM College".to_string()),
        branch: Set(Some("CSE".to_string())),
        transaction_id: Set("UTR123456".to_string()),
        screenshot_url: Set("/files/proof.jpg".to_string()),
        assigned_qr_id: Set(qr_id.to_string()),
        status: Set(RegistrationStatus::Pending),
        verified_by: Set(None),
        created_at: Set(Utc::now().into()),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_least_used_active_qr_selection() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let repo = QrCodeRepository::new(db.conn.clone());

    repo.create(qr_model("qr_a", 5, true)).await.unwrap();
    repo.create(qr_model("qr_b", 2, true)).await.unwrap();
    repo.create(qr_model("qr_c", 0, false)).await.unwrap();

    let selected = repo.find_least_used_active().await.unwrap().unwrap();
    assert_eq!(selected.id, "qr_b");

    db.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_increment_usage_is_atomic_single_update() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let repo = QrCodeRepository::new(db.conn.clone());

    repo.create(qr_model("qr_inc", 0, true)).await.unwrap();
    repo.increment_usage("qr_inc").await.unwrap();
    repo.increment_usage("qr_inc").await.unwrap();

    let qr = repo.get_by_id("qr_inc").await.unwrap();
    assert_eq!(qr.today_usage, 2);

    db.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_claim_verifying_rejects_second_claim() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let conn = db.conn.clone();
    let qr_repo = QrCodeRepository::new(Arc::clone(&conn));
    let reg_repo = RegistrantRepository::new(conn);

    qr_repo.create(qr_model("qr_claim", 0, true)).await.unwrap();
    reg_repo
        .create(registrant_model("reg_claim", "qr_claim"))
        .await
        .unwrap();

    let first = reg_repo.claim_verifying("reg_claim", "admin_a").await.unwrap();
    assert_eq!(first, 1);

    // Second claim must fail: the row is no longer PENDING/unclaimed
    let second = reg_repo.claim_verifying("reg_claim", "admin_b").await.unwrap();
    assert_eq!(second, 0);

    let row = reg_repo.get_by_id("reg_claim").await.unwrap();
    assert_eq!(row.status, RegistrationStatus::Verifying);
    assert_eq!(row.verified_by.as_deref(), Some("admin_a"));

    db.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_finalize_is_idempotent() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let conn = db.conn.clone();
    let qr_repo = QrCodeRepository::new(Arc::clone(&conn));
    let reg_repo = RegistrantRepository::new(conn);

    qr_repo.create(qr_model("qr_fin", 0, true)).await.unwrap();
    reg_repo
        .create(registrant_model("reg_fin", "qr_fin"))
        .await
        .unwrap();

    let first = reg_repo
        .finalize_status("reg_fin", RegistrationStatus::Approved)
        .await
        .unwrap();
    assert_eq!(first, 1);

    // Already approved: prior status no longer matches PENDING/VERIFYING
    let second = reg_repo
        .finalize_status("reg_fin", RegistrationStatus::Approved)
        .await
        .unwrap();
    assert_eq!(second, 0);

    let row = reg_repo.get_by_id("reg_fin").await.unwrap();
    assert_eq!(row.status, RegistrationStatus::Approved);
    assert!(row.verified_by.is_none());

    db.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_finalize_clears_claim_from_verifying() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let conn = db.conn.clone();
    let qr_repo = QrCodeRepository::new(Arc::clone(&conn));
    let reg_repo = RegistrantRepository::new(conn);

    qr_repo.create(qr_model("qr_vf", 0, true)).await.unwrap();
    reg_repo
        .create(registrant_model("reg_vf", "qr_vf"))
        .await
        .unwrap();

    assert_eq!(reg_repo.claim_verifying("reg_vf", "admin_a").await.unwrap(), 1);
    assert_eq!(
        reg_repo
            .finalize_status("reg_vf", RegistrationStatus::Approved)
            .await
            .unwrap(),
        1
    );

    let row = reg_repo.get_by_id("reg_vf").await.unwrap();
    assert_eq!(row.status, RegistrationStatus::Approved);
    assert!(row.verified_by.is_none());

    db.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_delete_by_id_removes_row() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let conn = db.conn.clone();
    let qr_repo = QrCodeRepository::new(Arc::clone(&conn));
    let reg_repo = RegistrantRepository::new(conn);

    qr_repo.create(qr_model("qr_del", 0, true)).await.unwrap();
    reg_repo
        .create(registrant_model("reg_del", "qr_del"))
        .await
        .unwrap();

    assert_eq!(reg_repo.delete_by_id("reg_del").await.unwrap(), 1);
    assert!(reg_repo.find_by_id("reg_del").await.unwrap().is_none());

    db.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_action_log_survives_registrant_delete() {
    use techsprint_db::entities::action_log;
    use techsprint_db::repositories::ActionLogRepository;

    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let conn = db.conn.clone();
    let qr_repo = QrCodeRepository::new(Arc::clone(&conn));
    let reg_repo = RegistrantRepository::new(Arc::clone(&conn));
    let log_repo = ActionLogRepository::new(conn);

    qr_repo.create(qr_model("qr_log", 0, true)).await.unwrap();
    reg_repo
        .create(registrant_model("reg_log", "qr_log"))
        .await
        .unwrap();

    reg_repo
        .finalize_status("reg_log", RegistrationStatus::Rejected)
        .await
        .unwrap();
    log_repo
        .create(action_log::ActiveModel {
            id: Set("log_1".to_string()),
            registrant_id: Set(Some("reg_log".to_string())),
            admin_id: Set("admin_a".to_string()),
            action: Set("REJECT_PAYMENT".to_string()),
            created_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();
    reg_repo.delete_by_id("reg_log").await.unwrap();

    // The registrant is gone; exactly one log entry still references it
    assert!(reg_repo.find_by_id("reg_log").await.unwrap().is_none());
    let entries = log_repo.find_by_registrant("reg_log").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "REJECT_PAYMENT");

    db.cleanup().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}
