//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated config directory and
//! verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

const VALID_TOKEN: &str =
    "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiI3IiwiZXhwIjo0MTAyNDQ0ODAwfQ.sig";
const EXPIRED_TOKEN: &str =
    "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiI3IiwiZXhwIjoxMDAwMDAwMDAwfQ.sig";

const QUESTIONS: &str = r#"[
    {"pregunta_id": 1, "plantilla": "mood-grid", "texto_pregunta": "¿Cómo te sientes?",
     "respuestas": [{"respuesta_posible_id": 1, "nombre": "Muy mal"},
                    {"respuesta_posible_id": 2, "nombre": "Bien"},
                    {"respuesta_posible_id": 3, "nombre": "Normal"}]},
    {"pregunta_id": 2, "plantilla": "activity-grid", "texto_pregunta": "¿Qué hiciste?",
     "respuestas": [{"respuesta_posible_id": 7, "nombre": "Deporte"},
                    {"respuesta_posible_id": 8, "nombre": "Leer"}]},
    {"pregunta_id": 3, "plantilla": "free-text", "texto_pregunta": "¿Algo más?"}
]"#;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(config_dir: &Path, args: &[&str], stdin: Option<&str>) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_almaia-cli"))
        .args(args)
        .env("ALMAIA_CONFIG_DIR", config_dir)
        .env_remove("ALMAIA_TOKEN")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    {
        let mut pipe = child.stdin.take().expect("stdin is piped");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).unwrap();
        }
    }

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_config_get_set_reset() {
    let dir = TempDir::new().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "alerts.min_length"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "10");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "locale.default_locale", "en"], None);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "locale.default_locale"], None);
    assert_eq!(stdout.trim(), "en");

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"], None);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "list"], None);
    assert_eq!(parse_json(&stdout)["locale"]["default_locale"], "es");
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "api.nope"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: unknown key"));

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "api.nope", "x"], None);
    assert_eq!(code, 1);
}

#[test]
fn test_wizard_run_with_answer_flags() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "questions.json", QUESTIONS);

    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &[
            "wizard", "run", "--file", &file, "--answer", "2", "--answer", "8,7", "--answer",
            "todo bien",
        ],
        None,
    );
    assert_eq!(code, 0, "stderr: {stderr}");

    let json = parse_json(&stdout);
    assert_eq!(json["answers"]["1"], serde_json::json!({"kind": "option", "value": 2}));
    assert_eq!(json["answers"]["2"], serde_json::json!({"kind": "options", "value": [8, 7]}));
    assert_eq!(json["answers"]["3"], serde_json::json!({"kind": "text", "value": "todo bien"}));
}

#[test]
fn test_wizard_run_reads_stdin() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "questions.json", QUESTIONS);

    let (stdout, _, code) = run_cli(
        dir.path(),
        &["wizard", "run", "--file", &file],
        Some("3\n7\nnada\n"),
    );
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout)["answers"]["1"]["value"], 3);
}

#[test]
fn test_wizard_run_incomplete_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "questions.json", QUESTIONS);

    let (_, stderr, code) = run_cli(dir.path(), &["wizard", "run", "--file", &file, "--answer", "1"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("1 of 3"));
}

#[test]
fn test_wizard_options() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "questions.json", QUESTIONS);

    let (stdout, _, code) = run_cli(dir.path(), &["wizard", "options", "--file", &file, "--index", "0"], None);
    assert_eq!(code, 0);
    let json = parse_json(&stdout);
    assert_eq!(json["template"], "mood-grid");
    assert_eq!(json["options"][2]["iconClass"], "neutral");

    let (_, stderr, code) = run_cli(dir.path(), &["wizard", "options", "--file", &file, "--index", "3"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("out of range"));
}

#[test]
fn test_wizard_icons_lists_disagreements() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["wizard", "icons"], None);
    assert_eq!(code, 0);
    let ids: Vec<i64> = parse_json(&stdout)
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["optionId"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 4, 5]);
}

#[test]
fn test_group_answers() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        &dir,
        "rows.json",
        r#"[
            {"pregunta_id": 5, "respuesta_posible_id": 1, "alumno_id": 3,
             "preguntas": {"grupo_preguntas": "animo", "texto_pregunta": "¿Cómo estás?"},
             "respuestas_posibles": {"nombre": "Mal"}},
            {"pregunta_id": 6, "respuesta_posible_id": 2, "alumno_id": 3},
            {"pregunta_id": 5, "respuesta_posible_id": 4, "alumno_id": 4,
             "respuestas_posibles": {"nombre": "Bien"}}
        ]"#,
    );

    let (stdout, _, code) = run_cli(dir.path(), &["group", "answers", "--file", &file], None);
    assert_eq!(code, 0);
    let json = parse_json(&stdout);
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["questionId"], 5);
    assert_eq!(json[0]["answers"].as_array().unwrap().len(), 2);
    assert_eq!(json[1]["promptText"], "");
}

#[test]
fn test_group_tasks_locale() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        &dir,
        "tasks.json",
        r##"[
            {"id": 1, "materia": "Ciencias", "fecha_entrega": "2025-03-10", "color": "#2196F3"},
            {"id": 2, "materia": "Arte", "fecha_entrega": "2025-04-01", "color": "#E91E63"},
            {"id": 3, "materia": "Ciencias", "fecha_entrega": "2025-03-20", "color": "#2196F3"}
        ]"##,
    );

    let (stdout, _, code) = run_cli(dir.path(), &["group", "tasks", "--file", &file], None);
    assert_eq!(code, 0);
    let json = parse_json(&stdout);
    assert_eq!(json[0]["monthLabel"], "Marzo");
    assert_eq!(json[1]["monthLabel"], "Abril");
    assert_eq!(json[0]["items"][1]["id"], 3);

    let (stdout, _, _) = run_cli(dir.path(), &["group", "tasks", "--file", &file, "--locale", "en"], None);
    assert_eq!(parse_json(&stdout)[0]["monthLabel"], "March");
}

#[test]
fn test_alert_send_validation() {
    let dir = TempDir::new().unwrap();

    let (stdout, _, code) = run_cli(
        dir.path(),
        &["alert", "send", "--student-id", "7", "--message", "  necesito hablar  ", "--dry-run"],
        None,
    );
    assert_eq!(code, 0);
    assert_eq!(
        parse_json(&stdout),
        serde_json::json!({"alumno_id": 7, "mensaje": "necesito hablar"})
    );

    let (_, stderr, code) = run_cli(
        dir.path(),
        &["alert", "send", "--student-id", "7", "--message", "ayuda", "--dry-run"],
        None,
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("at least 10"));
}

#[test]
fn test_alert_send_without_token_fails_before_request() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), &["config", "set", "api.base_url", "http://127.0.0.1:9/api/v1"], None);

    let (_, stderr, code) = run_cli(
        dir.path(),
        &["alert", "send", "--student-id", "7", "--message", "necesito hablar con alguien"],
        None,
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("No authentication token"));
}

#[test]
fn test_token_check() {
    let dir = TempDir::new().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["token", "check", VALID_TOKEN], None);
    assert_eq!(code, 0);
    let json = parse_json(&stdout);
    assert_eq!(json["valid"], true);
    assert_eq!(json["expiresAt"], "2100-01-01T00:00:00+00:00");

    let (stdout, _, _) = run_cli(dir.path(), &["token", "check", EXPIRED_TOKEN], None);
    assert_eq!(parse_json(&stdout)["valid"], false);

    let (_, stderr, code) = run_cli(dir.path(), &["token", "check", "not-a-token"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("not a JWT"));
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["completions", "bash"], None);
    assert_eq!(code, 0);
    assert!(stdout.contains("almaia-cli"));
}
