//! Integration tests for the `sunny` command line

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = include_str!("fixtures/sunny_morning.json");

/// Config path that does not exist, so only defaults and the environment apply
fn missing_config(dir: &TempDir) -> PathBuf {
    dir.path().join("config.toml")
}

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = missing_config(&dir);
    Command::new(env!("CARGO_BIN_EXE_sunny"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .envs(envs.iter().copied())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute sunny")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"], &[]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sunny"), "Help should mention sunny");
    assert!(stdout.contains("forecast"), "Help should list the forecast command");
    assert!(stdout.contains("--location"), "Help should mention --location");
}

#[test]
fn test_invalid_location_prints_error_and_exits() {
    let output = run_cli(&["--location", "somewhere", "morning"], &[]);
    assert!(!output.status.success(), "Expected invalid location to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid location"),
        "Should explain the location format: {}",
        stderr
    );
}

#[test]
fn test_location_outside_germany_is_rejected() {
    let output = run_cli(&["--location", "48.8566,2.3522", "morning"], &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please choose location in Germany."), "{}", stderr);
}

#[test]
fn test_missing_location_is_rejected() {
    let output = run_cli(&["hourly"], &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No location given"), "{}", stderr);
}

#[test]
fn test_unknown_day_is_explained_without_network() {
    let output = run_cli(&["--location", "52.52,13.41", "forecast", "someday"], &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("I can't understand which date you want forecast when you say 'someday'."),
        "{}",
        stdout
    );
    assert!(stdout.contains("between yesterday (-1) to 3 days from now"));
}

#[test]
fn test_location_from_environment_defaults() {
    let output = run_cli(
        &["forecast", "7"],
        &[
            ("SUNNY_DEFAULTS__LATITUDE", "52.52"),
            ("SUNNY_DEFAULTS__LONGITUDE", "13.41"),
        ],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("'7'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forecast_against_mock_provider() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/dwd-icon"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXTURE, "application/json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/v1/dwd-icon", mock_server.uri());
    let output = tokio::task::spawn_blocking(move || {
        run_cli(
            &["--location", "52.52,13.41", "forecast"],
            &[("SUNNY_WEATHER__BASE_URL", base_url.as_str())],
        )
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Expect sunny times at:"), "{}", stdout);
    assert!(stdout.contains("09:30 -> 10:00"));
    assert!(stdout.contains("12:15 -> 12:45"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_provider_failure_prints_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/dwd-icon"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/v1/dwd-icon", mock_server.uri());
    let output = tokio::task::spawn_blocking(move || {
        run_cli(
            &["--location", "52.52,13.41", "morning"],
            &[
                ("SUNNY_WEATHER__BASE_URL", base_url.as_str()),
                ("SUNNY_WEATHER__MAX_RETRIES", "0"),
            ],
        )
    })
    .await
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Get weather failed due to network error."), "{}", stderr);
}
