// tests/device_traits.rs
use std::fs;
use std::path::{Path, PathBuf};

use apple_specs::config::consts::DEVICE_TRAITS_REL;
use apple_specs::config::options::FamilyOptions;
use apple_specs::specs::device_traits::{self, LookupRow};
use rusqlite::Connection;

fn make_db(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE DeviceTraits (DeviceTraitSetID INTEGER PRIMARY KEY, DevicePerformanceMemoryClass INTEGER);
         CREATE TABLE Devices (ProductDescription TEXT, ProductType TEXT, Target TEXT, Platform TEXT, DeviceTraitSet INTEGER);
         INSERT INTO DeviceTraits VALUES (1, 8), (2, 16);
         INSERT INTO Devices VALUES
            ('iPad Air 11-inch (M2)', 'iPad14,8', 'j507ap', 'iPhoneOS', 1),
            ('iPad Pro 13-inch (M4)', 'iPad16,5', 'j720ap', 'iPhoneOS', 2),
            ('iPhone 16', 'iPhone17,3', 'd47ap', 'iPhoneOS', 1),
            ('MacBook Air (M2, 2022)', 'Mac14,2', 'j413ap', 'macOS', 99);",
    )
    .unwrap();
}

fn install(root: &Path, bundle: &str) -> PathBuf {
    let db = root.join(bundle).join(DEVICE_TRAITS_REL);
    make_db(&db);
    db
}

#[test]
fn query_filters_by_prefix_and_orders_descending() {
    let dir = tempfile::tempdir().unwrap();
    let db = install(dir.path(), "Xcode.app");

    let rows = device_traits::query(&db, &FamilyOptions::ipad()).unwrap();
    assert_eq!(
        rows,
        vec![
            LookupRow {
                name: "iPad Pro 13-inch (M4)".into(),
                product_type: "iPad16,5".into(),
                board_code: "j720ap".into(),
                platform: "iPhoneOS".into(),
                memory_class: Some(16),
            },
            LookupRow {
                name: "iPad Air 11-inch (M2)".into(),
                product_type: "iPad14,8".into(),
                board_code: "j507ap".into(),
                platform: "iPhoneOS".into(),
                memory_class: Some(8),
            },
        ]
    );
}

#[test]
fn mac_query_does_not_need_the_traits_join() {
    let dir = tempfile::tempdir().unwrap();
    let db = install(dir.path(), "Xcode.app");

    let rows = device_traits::query(&db, &FamilyOptions::mac()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "MacBook Air (M2, 2022)");
    assert_eq!(rows[0].memory_class, None);
}

#[test]
fn missing_database_gives_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    let rows = device_traits::query(&dir.path().join("nope.db"), &FamilyOptions::iphone()).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn discovery_labels_and_selects_installs() {
    let dir = tempfile::tempdir().unwrap();
    install(dir.path(), "Xcode.app");
    install(dir.path(), "Xcode-16.4.app");
    let beta = install(dir.path(), "Xcode-26.0.app");
    // bundle without the database is ignored
    fs::create_dir_all(dir.path().join("Xcode-15.0.app")).unwrap();
    fs::create_dir_all(dir.path().join("Safari.app")).unwrap();

    let found = device_traits::discover(dir.path());
    let labels: Vec<_> = found.iter().map(|x| x.label.as_str()).collect();
    assert_eq!(labels, ["Xcode", "Xcode-16.4", "Xcode-26.0"]);

    let pick = device_traits::select(&found).unwrap();
    assert_eq!(pick.db, beta);
    // no xcodebuild in the fake bundle, so the label stands in
    assert_eq!(device_traits::version_label(pick), "Xcode-26.0");
}

#[test]
fn discovery_of_missing_root_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(device_traits::discover(&dir.path().join("Applications")).is_empty());
}
