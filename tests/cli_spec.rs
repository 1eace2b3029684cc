//! End-to-end tests of the `texify` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::post;
use axum::Router;
use texify::config::Config;

const SCRIPT: &str = r#"
# a diagonal, a tap, then submit
{"kind": "pointer_down", "x": 10, "y": 10, "t": 1000}
{"kind": "pointer_move", "x": 20, "y": 30, "t": 1016}
{"kind": "pointer_up"}
{"kind": "pointer_down", "x": 15, "y": 20, "t": 2000}
{"kind": "pointer_up"}
{"kind": "commit_requested"}

{"kind": "pointer_down", "x": 1, "y": 1}
{"kind": "cancel_requested"}
{"kind": "commit_requested"}
{"kind": "close_requested"}
{"kind": "commit_requested"}
"#;

const FIRST_PAYLOAD: &str = "strokes=%5B%5B%7B%22x%22%3A28%2C%22y%22%3A28%2C%22t%22%3A1000%7D%2C\
                             %7B%22x%22%3A252%2C%22y%22%3A252%2C%22t%22%3A1016%7D%5D%2C\
                             %5B%7B%22x%22%3A140%2C%22y%22%3A140%2C%22t%22%3A2000%7D%5D%5D";

const GUESSES: &str = r#"[{"id":"latex2e-OT1-_alpha","score":0.12}]"#;

/// Nothing listens on the discard port.
const DEAD_URL: &str = "http://127.0.0.1:9/api/classify";

/// Run `texify` with an isolated config directory, feeding `stdin`.
fn texify(args: &[&str], stdin: &str) -> Output {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    texify_in(home.path(), args, stdin, &[])
}

/// Run `texify` with `home` as its config directory and extra environment.
fn texify_in(home: &Path, args: &[&str], stdin: &str, envs: &[(&str, &str)]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_texify"))
        .args(args)
        .env("XDG_CONFIG_HOME", home)
        .env("HOME", home) // For macOS directories crate
        .env_remove("TEXIFY_CLASSIFIER_URL")
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn texify");

    child
        .stdin
        .take()
        .expect("Failed to get stdin")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for texify")
}

/// Run `texify` on a blocking thread so a mock server on the test runtime can answer it.
async fn texify_async(
    args: Vec<String>,
    stdin: &'static str,
    envs: Vec<(String, String)>,
) -> Output {
    tokio::task::spawn_blocking(move || {
        let home = tempfile::tempdir().expect("Failed to create temp dir");
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let envs: Vec<(&str, &str)> = envs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        texify_in(home.path(), &args, stdin, &envs)
    })
    .await
    .expect("texify thread panicked")
}

/// Bodies posted to the mock classifier.
type Received = Arc<Mutex<Vec<String>>>;

async fn record_handler(State(received): State<Received>, body: String) -> &'static str {
    received.lock().unwrap().push(body);
    GUESSES
}

/// Start a mock classifier answering [`GUESSES`] and return its URL.
async fn spawn_classifier() -> (String, Received) {
    let received = Received::default();
    let app = Router::new()
        .route("/api/classify", post(record_handler))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock classifier");
    let addr = listener.local_addr().expect("Failed to read address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock classifier failed");
    });

    (format!("http://{}/api/classify", addr), received)
}

mod replay {
    use super::*;

    #[test]
    fn dry_run_prints_one_payload_per_commit() {
        let output = texify(&["replay", "--dry-run"], SCRIPT);

        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).expect("utf-8");
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(
            lines,
            vec![FIRST_PAYLOAD, "strokes=%5B%5D"]
        );
    }

    #[test]
    fn reads_a_script_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("events.jsonl");
        std::fs::write(&path, SCRIPT).expect("Failed to write script");

        let output = texify(
            &["replay", "--dry-run", path.to_str().expect("utf-8 path")],
            "",
        );

        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 2);
    }

    #[test]
    fn rejects_malformed_events() {
        let output = texify(&["replay", "--dry-run"], "{\"kind\": \"wiggle\"}\n");

        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Invalid event on line 1"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sends_each_commit_and_prints_the_answers() {
        let (url, received) = spawn_classifier().await;

        let output = texify_async(vec!["replay".into(), "--url".into(), url], SCRIPT, vec![]).await;

        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).expect("utf-8");
        assert_eq!(stdout.lines().collect::<Vec<_>>(), vec![GUESSES, GUESSES]);
        let mut received = received.lock().unwrap().clone();
        received.sort();
        assert_eq!(received, vec![FIRST_PAYLOAD.to_string(), "strokes=%5B%5D".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sends_to_the_url_from_the_environment() {
        let (url, received) = spawn_classifier().await;

        let output = texify_async(
            vec!["replay".into()],
            SCRIPT,
            vec![("TEXIFY_CLASSIFIER_URL".into(), url)],
        )
        .await;

        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 2);
        assert_eq!(received.lock().unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn url_flag_wins_over_the_environment() {
        let (url, received) = spawn_classifier().await;

        let output = texify_async(
            vec!["replay".into(), "--url".into(), url],
            SCRIPT,
            vec![("TEXIFY_CLASSIFIER_URL".into(), DEAD_URL.into())],
        )
        .await;

        assert!(output.status.success());
        assert_eq!(received.lock().unwrap().len(), 2);
    }

    #[test]
    fn logs_failed_submissions_without_printing_them() {
        let output = texify(&["replay", "--url", DEAD_URL], SCRIPT);

        assert!(output.status.success());
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Classification failed"));
    }
}

mod config {
    use super::*;

    #[test]
    fn prints_the_defaults() {
        let output = texify(&["config"], "");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("http://detexify.kirelabs.org/api/classify"));
        assert!(stdout.contains("\"width\": 280"));
    }

    #[test]
    fn environment_overrides_the_classifier_url() {
        let home = tempfile::tempdir().expect("Failed to create temp dir");

        let output = texify_in(
            home.path(),
            &["config"],
            "",
            &[("TEXIFY_CLASSIFIER_URL", "http://env.example/api")],
        );

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("\"classifier_url\": \"http://env.example/api\""));
    }

    #[test]
    fn reads_the_file_named_by_the_config_flag() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("custom.json");
        std::fs::write(
            &path,
            r#"{"classifier_url": "http://file.example/api", "canvas": {"width": 560}}"#,
        )
        .expect("Failed to write config");

        let output = texify(&["--config", path.to_str().expect("utf-8 path"), "config"], "");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with(&format!("# {}", path.display())));
        assert!(stdout.contains("http://file.example/api"));
        assert!(stdout.contains("\"width\": 560"));
        assert!(stdout.contains("\"height\": 280"));
    }

    #[test]
    fn rejects_an_invalid_config_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{"canvas": {"padding": 0.5}}"#).expect("Failed to write config");

        let output = texify(&["--config", path.to_str().expect("utf-8 path"), "config"], "");

        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid canvas configuration"));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn init_writes_the_defaults_to_the_config_directory() {
        let home = tempfile::tempdir().expect("Failed to create temp dir");
        let path = home.path().join("texify").join("config.json");

        let output = texify_in(home.path(), &["config", "--init"], "", &[]);

        assert!(output.status.success());
        let written = std::fs::read_to_string(&path).expect("config file written");
        let config: Config = serde_json::from_str(&written).expect("valid config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn init_leaves_an_existing_file_alone() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        let custom = r#"{"classifier_url": "http://file.example/api"}"#;
        std::fs::write(&path, custom).expect("Failed to write config");

        let output = texify(
            &["--config", path.to_str().expect("utf-8 path"), "config", "--init"],
            "",
        );

        assert!(output.status.success());
        assert_eq!(std::fs::read_to_string(&path).expect("read"), custom);
    }

    #[test]
    fn init_creates_the_file_named_by_the_config_flag() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let output = texify(
            &["--config", path.to_str().expect("utf-8 path"), "config", "--init"],
            "",
        );

        assert!(output.status.success());
        assert!(path.exists());
    }
}
