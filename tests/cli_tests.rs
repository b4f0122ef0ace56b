use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sharpline() -> Command {
    let mut cmd = Command::cargo_bin("sharpline").expect("binary built");
    cmd.env_remove("ODDS_API_KEY");
    cmd
}

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

/// Point the CLI at a throwaway database and a config file that does not exist.
fn isolated(dir: &TempDir) -> Command {
    let mut cmd = sharpline();
    cmd.arg("--db")
        .arg(dir.path().join("cli.db"))
        .arg("--config")
        .arg(dir.path().join("missing.toml"));
    cmd
}

fn json_line(stdout: &[u8]) -> serde_json::Value {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .find(|l| l.contains("\"command\""))
        .unwrap_or_else(|| panic!("no command output in:\n{text}"));
    serde_json::from_str(line).expect("valid json")
}

#[test]
fn clv_reports_percentage() {
    sharpline()
        .args(["clv", "2.10", "1.90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.5263"));
}

#[test]
fn clv_json_output() {
    let output = sharpline()
        .args(["--json", "clv", "1.80", "2.10"])
        .output()
        .expect("run sharpline");
    assert!(output.status.success());

    let value = json_line(&output.stdout);
    assert_eq!(value["command"], "clv");
    let clv: f64 = value["clv_pct"].as_str().unwrap().parse().unwrap();
    assert!(clv < 0.0);
}

#[test]
fn clv_rejects_non_numeric_prices() {
    sharpline().args(["clv", "abc", "1.90"]).assert().failure();
}

#[test]
fn config_validate_accepts_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        concat!(
            "database = \"odds.db\"\n",
            "\n",
            "[analysis]\n",
            "min_profit_pct = 1.0\n",
            "min_edge_pct = 2.5\n",
            "sharp_books = [\"pinnacle\"]\n",
            "\n",
            "[scheduler]\n",
            "interval_secs = 120\n",
        ),
    );

    sharpline()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn config_validate_rejects_negative_threshold() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[analysis]\nmin_profit_pct = -1\n");

    sharpline()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_profit_pct"));
}

#[test]
fn config_validate_rejects_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[analysis\nmin_profit_pct = 1\n");

    sharpline()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn config_validate_requires_the_file() {
    let dir = TempDir::new().unwrap();

    sharpline()
        .args(["config", "validate", "--config"])
        .arg(dir.path().join("nope.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn analyze_on_empty_database() {
    let dir = TempDir::new().unwrap();

    let output = isolated(&dir)
        .args(["--json", "analyze", "--dry-run"])
        .output()
        .expect("run sharpline");
    assert!(output.status.success());

    let value = json_line(&output.stdout);
    assert_eq!(value["command"], "analyze");
    assert_eq!(value["dry_run"], true);
    assert_eq!(value["report"]["events_scanned"], 0);
    assert!(dir.path().join("cli.db").exists());
}

#[test]
fn alerts_list_on_empty_database() {
    let dir = TempDir::new().unwrap();

    isolated(&dir)
        .args(["alerts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No alerts"));
}

#[test]
fn events_on_empty_database() {
    let dir = TempDir::new().unwrap();

    let output = isolated(&dir)
        .args(["--json", "events"])
        .output()
        .expect("run sharpline");
    assert!(output.status.success());
    assert_eq!(json_line(&output.stdout)["events"], serde_json::json!([]));
}

#[test]
fn unknown_alert_cannot_be_marked_read() {
    let dir = TempDir::new().unwrap();

    isolated(&dir)
        .args(["alerts", "read", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("alert not found: missing"));
}

#[test]
fn odds_history_for_unknown_event_fails() {
    let dir = TempDir::new().unwrap();

    isolated(&dir)
        .args(["odds", "history", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("event not found: missing"));
}

#[test]
fn scrape_requires_api_key() {
    let dir = TempDir::new().unwrap();

    isolated(&dir)
        .arg("scrape")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ODDS_API_KEY"));
}

#[test]
fn scrape_fails_when_every_sport_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        concat!(
            "[feed]\n",
            "api_url = \"http://127.0.0.1:9\"\n",
            "sports = [\"basketball_nba\", \"icehockey_nhl\"]\n",
            "\n",
            "[feed.http]\n",
            "timeout_ms = 2000\n",
            "connect_timeout_ms = 500\n",
            "retry_max_attempts = 1\n",
            "retry_backoff_ms = 0\n",
        ),
    );

    let output = sharpline()
        .env("ODDS_API_KEY", "test-key")
        .arg("--db")
        .arg(dir.path().join("cli.db"))
        .arg("--config")
        .arg(&path)
        .args(["--json", "scrape"])
        .output()
        .expect("run sharpline");

    assert!(!output.status.success());
    let value = json_line(&output.stdout);
    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.get("error").is_some()));
    assert!(String::from_utf8_lossy(&output.stderr).contains("every requested sport"));
}

#[test]
fn config_validate_rejects_american_odds() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[feed]\nodds_format = \"american\"\n");

    sharpline()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("odds_format"));
}

#[test]
fn sports_on_empty_database() {
    let dir = TempDir::new().unwrap();

    isolated(&dir)
        .args(["sports", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sports"));
}

#[test]
fn events_show_unknown_event_fails() {
    let dir = TempDir::new().unwrap();

    isolated(&dir)
        .args(["events", "show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("event not found: missing"));
}

#[test]
fn events_sport_filter_on_empty_database() {
    let dir = TempDir::new().unwrap();

    let output = isolated(&dir)
        .args(["--json", "events", "--sport", "basketball_nba"])
        .output()
        .expect("run sharpline");
    assert!(output.status.success());
    assert_eq!(json_line(&output.stdout)["events"], serde_json::json!([]));
}

#[test]
fn odds_list_on_empty_database() {
    let dir = TempDir::new().unwrap();

    let output = isolated(&dir)
        .args(["--json", "odds", "list", "--bookmaker", "fanduel", "--limit", "5"])
        .output()
        .expect("run sharpline");
    assert!(output.status.success());

    let value = json_line(&output.stdout);
    assert_eq!(value["command"], "odds.list");
    assert_eq!(value["odds"], serde_json::json!([]));
}
