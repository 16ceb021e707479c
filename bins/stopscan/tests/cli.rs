//! End-to-end checks of the commands that need no network.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn stopscan(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stopscan").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_heading_json() {
    let dir = TempDir::new().unwrap();
    stopscan(&dir)
        .args(["--json", "heading", "33.8386,-84.368854", "33.8387,-84.368854"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"heading\": 0.0"));
}

#[test]
fn test_heading_rejects_bad_coordinate() {
    let dir = TempDir::new().unwrap();
    stopscan(&dir)
        .args(["heading", "north", "33.8,-84.3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lat,lon"));
}

#[test]
fn test_invalid_config_exit_code() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("stopscan.toml"), "[capture]\nfov = 200\n").unwrap();
    stopscan(&dir)
        .args(["heading", "33.8,-84.3", "33.9,-84.3"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("fov"));
}

#[test]
fn test_json_failure_prints_error_report() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("stopscan.toml"), "[capture]\nfov = 200\n").unwrap();
    stopscan(&dir)
        .args(["--json", "heading", "33.8,-84.3", "33.9,-84.3"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("\"code_str\": \"E3003\""))
        .stdout(predicate::str::contains("\"category\": \"Configuration\""));
}

#[test]
fn test_assess_scores_labels() {
    let dir = TempDir::new().unwrap();
    let pics = dir.path().join("pics");
    let labels = dir.path().join("labels");
    std::fs::create_dir_all(&labels).unwrap();
    std::fs::create_dir_all(&pics).unwrap();

    std::fs::write(
        pics.join("log.json"),
        r#"{"907": {"lat": 33.8, "lon": -84.4, "og_lat": null, "og_lon": null, "fov": 45,
            "place_id": null, "place_name": null, "errors": [],
            "pictures": [{"pic_number": 1, "pic_lat": 33.8, "pic_lon": -84.4001,
                          "heading": 90.0, "date": null, "pano_id": "p"}]}}"#,
    )
    .unwrap();
    image::RgbImage::new(100, 100).save(pics.join("907_1.jpg")).unwrap();
    std::fs::write(labels.join("907_1.txt"), "1 0.5 0.5 0.2 0.2 0.9\n").unwrap();

    stopscan(&dir)
        .args(["--json", "assess", "pics/log.json", "--labels", "labels"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"completeness\": 0.25"))
        .stdout(predicate::str::contains("Shelter"));
}
