//! Command line behavior of the `hopcrawl` binary.

use std::io::Write;

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn hopcrawl() -> Command {
    let mut cmd = Command::cargo_bin("hopcrawl").unwrap();
    cmd.env_remove("HOPCRAWL_BASE_URL")
        .env_remove("HOPCRAWL_MAX_WORKERS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_missing_arguments_exit_one() {
    hopcrawl()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
    hopcrawl().arg("Kevin Bacon").assert().code(1);
}

#[test]
fn test_extra_argument_exits_one() {
    hopcrawl()
        .args(["Kevin Bacon", "2", "extra"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_bad_depth_exits_one() {
    for depth in ["two", "-1", "1.5", ""] {
        hopcrawl().args(["Kevin Bacon", depth]).assert().code(1);
    }
}

#[test]
fn test_help_exits_zero() {
    hopcrawl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("START_NODE"))
        .stdout(predicate::str::contains("DEPTH"));
}

#[test]
fn test_invalid_config_exits_one() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_workers = 0").unwrap();

    hopcrawl()
        .arg("--config")
        .arg(file.path())
        .args(["A", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("max_workers"));
}

#[test]
fn test_invalid_base_url_exits_one() {
    hopcrawl()
        .env("HOPCRAWL_BASE_URL", "ftp://example.org/")
        .args(["A", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid base URL"));
}

async fn mock_service() -> MockServer {
    let server = MockServer::start().await;
    for (encoded, neighbors) in [
        ("A", vec!["B", "C"]),
        ("B", vec!["A", "D"]),
        ("C", vec!["D"]),
        ("D", vec![]),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/neighbors/{encoded}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "node": encoded,
                "neighbors": neighbors,
            })))
            .mount(&server)
            .await;
    }
    server
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_crawl_prints_levels_and_time() {
    let server = mock_service().await;
    let base_url = format!("{}/neighbors/", server.uri());

    let output = tokio::task::spawn_blocking(move || {
        hopcrawl()
            .env("HOPCRAWL_BASE_URL", base_url)
            .args(["A", "2"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Parallel BFS Traversal:"))
        .stdout(predicate::str::contains("Level 0 (1 nodes):\n- A\n"))
        .stdout(predicate::str::contains("Level 1 (2 nodes):"))
        .stdout(predicate::str::contains("Level 2 (1 nodes):\n- D\n"))
        .stdout(predicate::str::contains("Time for parallel crawl:"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_compare_mode_agrees() {
    let server = mock_service().await;
    let base_url = format!("{}/neighbors/", server.uri());

    let output = tokio::task::spawn_blocking(move || {
        hopcrawl()
            .env("HOPCRAWL_BASE_URL", base_url)
            .args(["--engine", "compare", "A", "3"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Time for sequential crawl:"))
        .stdout(predicate::str::contains("Time for parallel crawl:"))
        .stdout(predicate::str::contains("Per-level membership: identical"));
}
