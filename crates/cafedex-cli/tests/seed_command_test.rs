//! Integration tests for the seed subcommand, the only stage that
//! needs no provider credentials.

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

fn cafedex_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove 'deps' directory
    path.push("cafedex");
    path
}

const FEED: &str = r#"[
  {
    "id": "cn-1",
    "name": "好咖啡",
    "city": "taipei",
    "address": "台北市中山區南京東路100號",
    "latitude": "25.05",
    "longitude": "121.52",
    "url": "",
    "mrt": "中山",
    "limited_time": "no",
    "socket": "yes",
    "wifi": 4.0,
    "seat": 3.5,
    "quiet": 4.0
  },
  {
    "id": "cn-2",
    "name": "倒了咖啡（已歇業）",
    "address": "台北市信義區",
    "latitude": "25.04",
    "longitude": "121.56"
  },
  {
    "id": "cn-3",
    "name": "空殼咖啡",
    "address": "",
    "latitude": "25.05",
    "longitude": "121.52"
  }
]"#;

#[test]
fn seed_filters_the_feed_and_writes_the_checkpoint() {
    let dir = TempDir::new().unwrap();
    let feed_path = dir.path().join("feed.json");
    std::fs::write(&feed_path, FEED).unwrap();
    let data_dir = dir.path().join("data");

    let output = Command::new(cafedex_bin())
        .env("CAFEDEX_DATA_DIR", &data_dir)
        .args(["seed", feed_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "seed should succeed: {:?}", output);

    let checkpoint = std::fs::read_to_string(data_dir.join("seed.json")).unwrap();
    let venues: serde_json::Value = serde_json::from_str(&checkpoint).unwrap();
    let venues = venues.as_array().unwrap();

    // Closed and shell entries filtered; one survivor.
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0]["seed_id"], "cn-1");
    assert_eq!(venues[0]["latitude"], 25.05);
}

#[test]
fn seed_fails_cleanly_on_a_missing_feed() {
    let dir = TempDir::new().unwrap();

    let output = Command::new(cafedex_bin())
        .env("CAFEDEX_DATA_DIR", dir.path().join("data"))
        .args(["seed", "/nonexistent/feed.json"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read seed feed"));
}
