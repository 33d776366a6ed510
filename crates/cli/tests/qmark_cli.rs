// Integration tests for the `qmark` binary.
// Run with: cargo test -p qmark-cli --test qmark_cli

use std::path::Path;
use std::process::{Command, Output};

use httpmock::prelude::*;

fn qmark(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_qmark"));
    cmd.current_dir(dir);
    // Clear env so a real token or host never leaks into tests
    cmd.env_remove("QMARK_TOKEN");
    cmd.env_remove("QMARK_BASE_URL");
    cmd.env_remove("QMARK_LOG");
    cmd
}

/// Temp dir with `.token` and `qmark-files.txt`.
fn workspace(listing: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".token"), "  secret-token \n").unwrap();
    std::fs::write(dir.path().join("qmark-files.txt"), listing).unwrap();
    dir
}

fn item(status: &str, files: &[&str]) -> serde_json::Value {
    let attachments: Vec<_> = files
        .iter()
        .map(|f| serde_json::json!({ "type": "file", "filename": f }))
        .collect();
    serde_json::json!({
        "status": status,
        "links": { "view": format!("https://vault.example/items/{}/", files.len()) },
        "attachments": attachments,
    })
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout).lines().map(String::from).collect()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn renames_across_items() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/api/item/uuid1/3")
            .query_param("info", "attachment,detail")
            .header("x-authorization", "access_token=secret-token");
        then.status(200).json_body(item("live", &["report.pdf", "notes.txt"]));
    });
    let second = server.mock(|when, then| {
        when.method(GET).path("/api/item/uuid2/1");
        then.status(200).json_body(item("live", &["café.jpg"]));
    });

    let dir = workspace("abc/uuid1/3/repo?t.pdf\nabc/uuid1/3/not?s.txt\ndef/uuid2/1/caf?.jpg\n");
    let output = qmark(dir.path())
        .args(["--base-url", &server.base_url()])
        .output()
        .expect("failed to run qmark");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    first.assert_calls(1);
    second.assert_calls(1);

    let lines = stdout_lines(&output);
    assert_eq!(lines[0], "#!/usr/bin/env bash");
    let mut commands = lines[1..].to_vec();
    commands.sort();
    assert_eq!(
        commands,
        vec![
            r#"mv -v "abc/uuid1/3/not?s.txt" "abc/uuid1/3/notes.txt""#,
            r#"mv -v "abc/uuid1/3/repo?t.pdf" "abc/uuid1/3/report.pdf""#,
            r#"mv -v "def/uuid2/1/caf?.jpg" "def/uuid2/1/café.jpg""#,
        ]
    );
    assert!(stderr(&output).is_empty(), "stderr: {}", stderr(&output));
}

#[test]
fn non_live_item_is_silent() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/item/u1/1");
        then.status(200).json_body(item("draft", &["report.pdf"]));
    });

    let dir = workspace("h/u1/1/repo?t.pdf\nh/u1/1/nothing?.txt\n");
    let output = qmark(dir.path())
        .args(["qmark-files.txt", "--base-url", &server.base_url()])
        .output()
        .expect("failed to run qmark");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_lines(&output), vec!["#!/usr/bin/env bash"]);
    assert!(stderr(&output).is_empty(), "stderr: {}", stderr(&output));
}

#[test]
fn diagnostics_go_to_stderr() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/item/u1/1");
        then.status(200)
            .json_body(item("live", &["why?.txt", "report1.doc", "report2.doc"]));
    });

    let dir = workspace("h/u1/1/why?.txt\nh/u1/1/report?.doc\nh/u1/1/gone?.png\n");
    let output = qmark(dir.path())
        .args(["--base-url", &server.base_url()])
        .output()
        .expect("failed to run qmark");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_lines(&output), vec!["#!/usr/bin/env bash"]);
    let err = stderr(&output);
    assert!(err.contains("note: exact match for filename \"why?.txt\""), "{}", err);
    assert!(err.contains("warning: multiple matches for mangled filename \"report?.doc\""), "{}", err);
    assert!(err.contains("\n  - report1.doc\n  - report2.doc\n"), "{}", err);
    assert!(err.contains("warning: no matches for mangled filename \"gone?.png\""), "{}", err);
}

#[test]
fn two_level_prefix_depth() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/item/uuid9/4");
        then.status(200).json_body(item("live", &["plan.pdf"]));
    });

    let dir = workspace("Attachments/8f/uuid9/4/pl?n.pdf\n");
    let output = qmark(dir.path())
        .args(["--prefix-depth", "2", "--base-url", &server.base_url()])
        .output()
        .expect("failed to run qmark");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    mock.assert();
    assert_eq!(
        stdout_lines(&output)[1],
        r#"mv -v "Attachments/8f/uuid9/4/pl?n.pdf" "Attachments/8f/uuid9/4/plan.pdf""#
    );
}

#[test]
fn fetch_failure_exits_5_and_keeps_other_items() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/item/good/1");
        then.status(200).json_body(item("live", &["report.pdf"]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/item/bad/1");
        then.status(401).json_body(serde_json::json!({
            "code": 401,
            "error": "Unauthorized",
            "error_description": "Token expired"
        }));
    });

    let dir = workspace("h/bad/1/x?.pdf\nh/good/1/repo?t.pdf\n");
    let output = qmark(dir.path())
        .args(["--base-url", &server.base_url()])
        .output()
        .expect("failed to run qmark");

    assert_eq!(
        output.status.code(),
        Some(5),
        "expected exit 5, got {:?}\nstderr: {}",
        output.status.code(),
        stderr(&output),
    );
    assert_eq!(
        stdout_lines(&output),
        vec!["#!/usr/bin/env bash", r#"mv -v "h/good/1/repo?t.pdf" "h/good/1/report.pdf""#]
    );
    let err = stderr(&output);
    assert!(err.contains("error: cannot fetch item bad/1: HTTP 401: Token expired"), "{}", err);
    assert!(err.contains("1 of 2 items could not be fetched"), "{}", err);
}

#[test]
fn token_from_env_overrides_file() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/item/u1/1")
            .header("x-authorization", "access_token=env-token");
        then.status(200).json_body(item("live", &["a.txt"]));
    });

    let dir = workspace("h/u1/1/?.txt\n");
    let output = qmark(dir.path())
        .env("QMARK_TOKEN", "env-token")
        .args(["--base-url", &server.base_url()])
        .output()
        .expect("failed to run qmark");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    mock.assert();
}

#[test]
fn malformed_line_exits_3() {
    let dir = workspace("h/u1/1/ok?.txt\nnot-a-path\n");
    let output = qmark(dir.path())
        .args(["--base-url", "http://127.0.0.1:9"])
        .output()
        .expect("failed to run qmark");

    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("line 2"), "{}", stderr(&output));
}

#[test]
fn missing_input_exits_3() {
    let dir = workspace("");
    let output = qmark(dir.path())
        .args(["does-not-exist.txt"])
        .output()
        .expect("failed to run qmark");

    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("does-not-exist.txt"));
}

#[test]
fn missing_token_exits_4() {
    let dir = workspace("h/u1/1/a?.txt\n");
    std::fs::remove_file(dir.path().join(".token")).unwrap();
    let output = qmark(dir.path()).output().expect("failed to run qmark");

    assert_eq!(output.status.code(), Some(4), "stderr: {}", stderr(&output));
    assert!(output.stdout.is_empty());
}

#[test]
fn empty_listing_prints_only_header() {
    let dir = workspace("\n");
    let output = qmark(dir.path())
        .args(["--base-url", "http://127.0.0.1:9"])
        .output()
        .expect("failed to run qmark");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout_lines(&output), vec!["#!/usr/bin/env bash"]);
}
