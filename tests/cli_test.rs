//! Integration test: command-line surface
//!
//! Drives the local commands through `parse_async` and the built binary, and
//! one remote command end to end with the endpoint taken from the environment.

mod common;

use std::{fs, process::Command};

use assert_cmd::prelude::*;
use serial_test::serial;
use tempfile::tempdir;
use weather_aug::{cli::parse_async, error::WeatherError};

#[tokio::test]
async fn test_flatten_videos_command() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("day1")).unwrap();
    fs::write(dir.path().join("day1/ride.mp4"), b"clip").unwrap();

    let path = dir.path().to_str().unwrap();
    parse_async(Some(&["weather-aug", "flatten-videos", path]))
        .await
        .unwrap();

    assert_eq!(fs::read(dir.path().join("1.mp4")).unwrap(), b"clip");
    assert!(!dir.path().join("day1").exists());
}

#[tokio::test]
async fn test_collect_refs_command() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("shifan");
    fs::create_dir_all(source.join("12")).unwrap();
    fs::write(source.join("12/0000.png"), b"a").unwrap();
    fs::write(source.join("12/0008.png"), b"b").unwrap();
    let dest = dir.path().join("imgsource");

    parse_async(Some(&[
        "weather-aug",
        "collect-refs",
        source.to_str().unwrap(),
        dest.to_str().unwrap(),
    ]))
    .await
    .unwrap();

    assert!(dest.join("12/0000.png").is_file());
    assert!(dest.join("12/0008.png").is_file());
}

#[tokio::test]
async fn test_unknown_flag_is_invalid_argument() {
    let err = parse_async(Some(&["weather-aug", "augment", "--layout", "diagonal"]))
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::InvalidArgument(_)));
}

#[tokio::test]
#[serial]
async fn test_augment_command_uses_environment() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("input/1")).unwrap();
    fs::write(root.join("input/1/0000.png"), common::png(4, 4)).unwrap();
    fs::write(root.join("night_rain.yaml"), "positive: Night rain.\nnegative: Sun.\n").unwrap();
    let config = root.join("gemini_weather.yaml");
    fs::write(
        &config,
        "output_width: 8\noutput_height: 4\nvariants:\n  - name: night_rain\n    prompt_file: night_rain.yaml\n",
    )
    .unwrap();

    let server = common::start(common::MockState::default()).await;
    // SAFETY: serialized with the other tests that touch the environment.
    unsafe {
        std::env::set_var("GEMINI_API_KEY", common::API_KEY);
        std::env::set_var("GEMINI_BASE_URL", &server.base_url);
    }

    let result = parse_async(Some(&[
        "weather-aug",
        "augment",
        config.to_str().unwrap(),
        "--rate-limit",
        "100",
    ]))
    .await;

    unsafe {
        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("GEMINI_BASE_URL");
    }
    result.unwrap();

    let out = root.join("outputimg/1/night_rain/0000_night_rain.png");
    let img = image::open(out).unwrap();
    assert_eq!((img.width(), img.height()), (8, 4));
}

#[tokio::test]
#[serial]
async fn test_missing_api_key() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("gemini_weather.yaml");
    fs::write(&config, "variants: []\n").unwrap();
    unsafe {
        std::env::remove_var("GEMINI_API_KEY");
    }

    let err = parse_async(Some(&["weather-aug", "augment", config.to_str().unwrap()]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

#[test]
fn test_binary_reports_missing_sample_image() {
    let dir = tempdir().unwrap();

    let output = Command::new(assert_cmd::cargo::cargo_bin!("weather-aug"))
        .current_dir(dir.path())
        .args(["sample", "--image", "nope.png"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Image not found: nope.png"), "{stderr}");
}

#[test]
fn test_binary_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("weather-aug"))
        .arg("--help")
        .assert()
        .success();
}
