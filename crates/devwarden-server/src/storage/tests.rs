//! Storage layer tests for Devwarden.

use super::DeviceDatabase;
use super::models::{NewDevice, StatusFilter};

async fn test_db() -> DeviceDatabase {
    DeviceDatabase::open_in_memory().await.unwrap()
}

fn laptop<'a>(hostname: &'a str, uuid: Option<&'a str>, mac: Option<&'a str>) -> NewDevice<'a> {
    NewDevice {
        hostname,
        os: Some("linux"),
        arch: Some("x86_64"),
        system_uuid: uuid,
        mac_address: mac,
        ..Default::default()
    }
}

// === Device tests ===

#[tokio::test]
async fn insert_and_get_device() {
    let db = test_db().await;
    let device = db
        .insert_device(&laptop("box1", Some("u1"), None), 1_000)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(device.id, 1);
    assert_eq!(device.hostname, "box1");
    assert_eq!(device.os.as_deref(), Some("linux"));
    assert!(device.cpu.is_none());
    assert!(!device.is_blocked);
    assert_eq!(device.created_at, 1_000);
    assert_eq!(device.last_signin, 1_000);

    assert_eq!(db.get_device(1).await.unwrap(), Some(device));
    assert!(db.get_device(99).await.unwrap().is_none());
}

#[tokio::test]
async fn find_by_identity_keys() {
    let db = test_db().await;
    db.insert_device(&laptop("box1", Some("u1"), Some("aa:bb")), 1_000)
        .await
        .unwrap();

    let by_uuid = db.find_device_by_system_uuid("u1").await.unwrap().unwrap();
    let by_mac = db.find_device_by_mac("aa:bb").await.unwrap().unwrap();
    assert_eq!(by_uuid.id, by_mac.id);

    assert!(db.find_device_by_system_uuid("u2").await.unwrap().is_none());
    assert!(db.find_device_by_mac("cc:dd").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_system_uuid_is_swallowed() {
    let db = test_db().await;
    db.insert_device(&laptop("box1", Some("u1"), None), 1_000)
        .await
        .unwrap();

    let second = db
        .insert_device(&laptop("box2", Some("u1"), None), 2_000)
        .await
        .unwrap();
    assert!(second.is_none());
    assert_eq!(db.list_devices(None, StatusFilter::All).await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_mac_is_swallowed() {
    let db = test_db().await;
    db.insert_device(&laptop("box1", None, Some("aa:bb")), 1_000)
        .await
        .unwrap();

    let second = db
        .insert_device(&laptop("box2", None, Some("aa:bb")), 2_000)
        .await
        .unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn devices_without_identity_keys_coexist() {
    let db = test_db().await;
    db.insert_device(&laptop("box", None, None), 1_000)
        .await
        .unwrap()
        .unwrap();
    db.insert_device(&laptop("box", None, None), 1_000)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(db.device_stats().await.unwrap().total, 2);
}

#[tokio::test]
async fn touch_updates_last_signin_only() {
    let db = test_db().await;
    let device = db
        .insert_device(&laptop("box1", Some("u1"), None), 1_000)
        .await
        .unwrap()
        .unwrap();

    db.touch_device_signin(device.id, 5_000).await.unwrap();

    let reloaded = db.get_device(device.id).await.unwrap().unwrap();
    assert_eq!(reloaded.created_at, 1_000);
    assert_eq!(reloaded.last_signin, 5_000);
}

#[tokio::test]
async fn set_blocked_reports_missing_rows() {
    let db = test_db().await;
    let device = db
        .insert_device(&laptop("box1", Some("u1"), None), 1_000)
        .await
        .unwrap()
        .unwrap();

    assert!(db.set_device_blocked(device.id, true).await.unwrap());
    assert!(db.set_device_blocked(device.id, true).await.unwrap());
    assert!(db.get_device(device.id).await.unwrap().unwrap().is_blocked);

    assert!(!db.set_device_blocked(42, true).await.unwrap());
}

#[tokio::test]
async fn list_orders_newest_first() {
    let db = test_db().await;
    db.insert_device(&laptop("old", Some("u1"), None), 1_000)
        .await
        .unwrap();
    db.insert_device(&laptop("new", Some("u2"), None), 3_000)
        .await
        .unwrap();
    db.insert_device(&laptop("mid", Some("u3"), None), 2_000)
        .await
        .unwrap();

    let names: Vec<String> = db
        .list_devices(None, StatusFilter::All)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.hostname)
        .collect();
    assert_eq!(names, ["new", "mid", "old"]);
}

#[tokio::test]
async fn list_with_search_and_status() {
    let db = test_db().await;
    db.insert_device(&laptop("Build-Server", Some("u1"), Some("AA:BB:CC")), 1_000)
        .await
        .unwrap();
    let kiosk = db
        .insert_device(
            &NewDevice {
                hostname: "kiosk",
                os: Some("Windows"),
                system_uuid: Some("u2"),
                ..Default::default()
            },
            2_000,
        )
        .await
        .unwrap()
        .unwrap();
    db.set_device_blocked(kiosk.id, true).await.unwrap();

    let by_host = db
        .list_devices(Some("build"), StatusFilter::All)
        .await
        .unwrap();
    assert_eq!(by_host.len(), 1);
    assert_eq!(by_host[0].hostname, "Build-Server");

    let by_mac = db
        .list_devices(Some("aa:bb"), StatusFilter::All)
        .await
        .unwrap();
    assert_eq!(by_mac.len(), 1);

    let by_os = db
        .list_devices(Some("windows"), StatusFilter::All)
        .await
        .unwrap();
    assert_eq!(by_os[0].id, kiosk.id);

    let blocked = db.list_devices(None, StatusFilter::Blocked).await.unwrap();
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0].id, kiosk.id);

    let active = db.list_devices(Some("  "), StatusFilter::Active).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].hostname, "Build-Server");

    assert!(
        db.list_devices(Some("kiosk"), StatusFilter::Active)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
    let db = test_db().await;
    db.insert_device(&laptop("ÉCOLE-PC", Some("u1"), None), 1_000)
        .await
        .unwrap();
    db.insert_device(&laptop("office", Some("u2"), None), 2_000)
        .await
        .unwrap();

    for needle in ["ÉCOLE", "école", "École-pc"] {
        let found = db
            .list_devices(Some(needle), StatusFilter::All)
            .await
            .unwrap();
        assert_eq!(found.len(), 1, "search {needle:?}");
        assert_eq!(found[0].hostname, "ÉCOLE-PC");
    }
    assert!(
        db.list_devices(Some("ecole"), StatusFilter::All)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn stats_count_block_state() {
    let db = test_db().await;
    assert_eq!(db.device_stats().await.unwrap().total, 0);

    for (i, uuid) in ["u1", "u2", "u3"].into_iter().enumerate() {
        let device = db
            .insert_device(&laptop("box", Some(uuid), None), 1_000)
            .await
            .unwrap()
            .unwrap();
        if i == 0 {
            db.set_device_blocked(device.id, true).await.unwrap();
        }
    }

    let stats = db.device_stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.active, 2);
    assert_eq!(stats.blocked, 1);
}

// === Admin session tests ===

#[tokio::test]
async fn live_session_lookup_respects_expiry() {
    let db = test_db().await;
    db.create_admin_session("tok", 1_000, 2_000).await.unwrap();

    assert!(db.get_live_admin_session("tok", 1_999).await.unwrap().is_some());
    assert!(db.get_live_admin_session("tok", 2_000).await.unwrap().is_none());
    assert!(db.get_live_admin_session("tok", 2_001).await.unwrap().is_none());
    assert!(db.get_live_admin_session("other", 1_500).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_session_token_is_rejected() {
    let db = test_db().await;
    db.create_admin_session("tok", 1_000, 2_000).await.unwrap();
    assert!(db.create_admin_session("tok", 1_000, 2_000).await.is_err());
}
