//! Binary-level tests: argument handling, output, and exit codes

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread::JoinHandle;
use tempfile::TempDir;

const ENV_OVERRIDES: &[&str] = &[
    "FEEDBACKKIT_CONFIG",
    "FEEDBACK_PROVIDER",
    "JIRA_BASE_URL",
    "JIRA_EMAIL",
    "JIRA_API_TOKEN",
    "JIRA_PROJECT_KEY",
    "WEBHOOK_URL",
    "WEBHOOK_TOKEN",
    "AI_PROVIDER",
    "AI_MODEL",
    "OPENAI_API_KEY",
    "ANTHROPIC_API_KEY",
];

/// `feedbackkit` running in `dir`, isolated from the caller's environment
fn feedbackkit(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("feedbackkit"));
    cmd.current_dir(dir);
    for key in ENV_OVERRIDES {
        cmd.env_remove(key);
    }
    cmd
}

/// Isolated working directory; `.git` stops config discovery from escaping it
fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join(".git")).unwrap();
    temp
}

/// Answer one HTTP request and hand back its raw text
fn serve_once(body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut data = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .to_ascii_lowercase()
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:").map(|v| v.trim().to_string()))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(0);
                if data.len() >= end + 4 + length {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 201 Created\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        String::from_utf8_lossy(&data).into_owned()
    });

    (base_url, handle)
}

#[test]
fn test_submit_with_noop_provider_prints_json() {
    let temp = workspace();

    feedbackkit(temp.path())
        .args(["submit", "--provider", "noop", "--title", "Crash", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""provider":"NoOp""#))
        .stdout(predicate::str::contains(r#""identifier":"NOOP-"#));
}

#[test]
fn test_submit_reads_message_from_stdin_and_attaches_files() {
    let temp = workspace();
    let (base_url, server) = serve_once(r#"{"id":"FB-1","url":"https://fb.test/FB-1"}"#);
    std::fs::write(temp.path().join("app.log"), "panic at login\n").unwrap();

    feedbackkit(temp.path())
        .env("FEEDBACK_PROVIDER", "webhook")
        .env("WEBHOOK_URL", format!("{base_url}/feedback"))
        .args(["submit", "-t", "Login crash", "-m", "-", "--attach", "app.log"])
        .write_stdin("Crashes right after tapping Sign in")
        .assert()
        .success()
        .stdout(predicate::str::contains("Submitted FB-1 via Webhook"))
        .stdout(predicate::str::contains("https://fb.test/FB-1"));

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /feedback "));
    assert!(request.contains("Crashes right after tapping Sign in"));
    assert!(request.contains(r#""filename":"app.log""#));
    assert!(request.contains("text/plain"));
}

#[test]
fn test_config_reports_explicit_file_with_masked_secrets() {
    let temp = workspace();
    let path = temp.path().join("custom.toml");
    std::fs::write(
        &path,
        "[provider]\nkind = \"webhook\"\n\n[webhook]\nurl = \"https://hooks.test/fb\"\ntoken = \"super-secret-token\"\n",
    )
    .unwrap();

    feedbackkit(temp.path())
        .arg("--config")
        .arg(&path)
        .args(["config", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://hooks.test/fb"))
        .stdout(predicate::str::contains("super-secret-token").not());
}

#[test]
fn test_missing_backend_settings_exit_with_configuration_code() {
    let temp = workspace();

    feedbackkit(temp.path())
        .env("FEEDBACK_PROVIDER", "jira")
        .args(["submit", "--title", "Crash"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("JIRA_BASE_URL"));
}

#[test]
fn test_enhance_without_ai_settings_is_a_configuration_error() {
    let temp = workspace();

    feedbackkit(temp.path())
        .args(["submit", "--provider", "noop", "--title", "Crash", "-m", "x", "--enhance"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--enhance"));
}

#[test]
fn test_unreachable_backend_exits_with_network_code() {
    let temp = workspace();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    feedbackkit(temp.path())
        .env("FEEDBACK_PROVIDER", "webhook")
        .env("WEBHOOK_URL", format!("http://{addr}/feedback"))
        .args(["submit", "--title", "Offline", "-m", "no route"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("webhook request failed"));
}

#[test]
fn test_oversized_attachment_exits_with_attachment_code() {
    let temp = workspace();
    std::fs::write(temp.path().join("dump.bin"), vec![0u8; 2048]).unwrap();
    std::fs::write(
        temp.path().join("feedbackkit.toml"),
        "[provider]\nkind = \"webhook\"\n\n[webhook]\nurl = \"http://127.0.0.1:9/fb\"\nmax_attachment_bytes = 1024\n",
    )
    .unwrap();

    feedbackkit(temp.path())
        .args(["submit", "--title", "Big", "--attach", "dump.bin"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("1024"));
}
