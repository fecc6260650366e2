use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn ctxc_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("ctxc");
    path
}

const RESULTS: &str = r#"[
  {"page_content": "Los datos se conservan cinco años.", "metadata": {"dp": "dp1"}},
  {"page_content": "Los datos se conservan cinco años.", "metadata": {"dp": "dp1"}},
  {"page_content": "Se recomienda revisar el protocolo.", "metadata": {"dp": "dp2"}}
]"#;

fn setup_test_env() -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    // Two provider directories
    let dp1 = root.join("providers/dp1");
    let dp2 = root.join("providers/dp2");
    fs::create_dir_all(&dp1).unwrap();
    fs::create_dir_all(&dp2).unwrap();
    fs::write(dp1.join("a.txt"), "El estudio recoge muestras biológicas.").unwrap();
    fs::write(dp1.join("b.txt"), "El estudio recoge muestras biológicas.").unwrap();
    fs::write(dp1.join("notes.md"), "Not included by the glob.").unwrap();
    fs::write(dp2.join("policy.txt"), "El investigador debe informar al comité.").unwrap();

    let config_content = format!(
        r#"[compose]
strategy = "semantic"
provenance_key = "dp"

[corpus]
providers = ["{}", "{}"]
include_globs = ["**/*.txt"]

[experiment]
preview_chars = 200
output = "{}/results/log.json"
"#,
        dp1.display(),
        dp2.display(),
        root.display()
    );
    let config_path = config_dir.join("ctxc.toml");
    fs::write(&config_path, config_content).unwrap();

    let results_path = root.join("results.json");
    fs::write(&results_path, RESULTS).unwrap();

    (tmp, config_path, results_path)
}

fn run_ctxc(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = ctxc_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run ctxc binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_compose_semantic_from_results_file() {
    let (_tmp, config_path, results) = setup_test_env();

    let (stdout, stderr, success) =
        run_ctxc(&config_path, &["compose", "--input", results.to_str().unwrap()]);
    assert!(success, "compose failed: stdout={}, stderr={}", stdout, stderr);
    assert_eq!(
        stdout,
        "=== Contexto común (integrado) ===\n\
         Los datos se conservan cinco años.\n\n\
         Los datos se conservan cinco años.\n\n\
         === dp2 (orientative) ===\n\
         Se recomienda revisar el protocolo.\n"
    );
}

#[test]
fn test_compose_strategy_flag_overrides_config() {
    let (_tmp, config_path, results) = setup_test_env();
    let input = results.to_str().unwrap();

    let (flat, _, success) =
        run_ctxc(&config_path, &["compose", "--input", input, "--strategy", "flat"]);
    assert!(success);
    assert!(flat.starts_with("[dp1] Los datos se conservan cinco años."));
    assert!(flat.contains("[dp2] Se recomienda revisar el protocolo."));

    let (grouped, _, success) =
        run_ctxc(&config_path, &["compose", "--input", input, "--strategy", "grouped"]);
    assert!(success);
    assert!(grouped.contains("=== Fragments from dp1 ==="));
    assert!(grouped.contains("=== Fragments from dp2 ==="));
    assert!(!grouped.contains("integrado"));
}

#[test]
fn test_compose_unknown_strategy_fails() {
    let (_tmp, config_path, results) = setup_test_env();

    let (_, _, success) = run_ctxc(
        &config_path,
        &["compose", "--input", results.to_str().unwrap(), "--strategy", "fuzzy"],
    );
    assert!(!success);
}

#[test]
fn test_compose_with_query_renders_prompt() {
    let (_tmp, config_path, results) = setup_test_env();

    let (stdout, _, success) = run_ctxc(
        &config_path,
        &[
            "compose",
            "--input",
            results.to_str().unwrap(),
            "--query",
            "¿Cuánto se conservan los datos?",
        ],
    );
    assert!(success);
    assert!(stdout.contains("Context:\n=== Contexto común (integrado) ==="));
    assert!(stdout.contains("Question: ¿Cuánto se conservan los datos?"));
}

#[test]
fn test_compose_from_provider_directories() {
    let (_tmp, config_path, _) = setup_test_env();

    let (stdout, stderr, success) = run_ctxc(&config_path, &["compose"]);
    assert!(success, "compose failed: stdout={}, stderr={}", stdout, stderr);

    // The dp2 normative document conflicts with both dp1 documents, so
    // nothing is integrated.
    assert!(!stdout.contains("integrado"), "got: {}", stdout);
    assert!(stdout.contains("=== dp1 (descriptive) ==="));
    assert!(stdout.contains("=== dp2 (normative) ==="));
    assert!(!stdout.contains("Not included by the glob."));
}

#[test]
fn test_missing_text_is_an_error() {
    let (tmp, config_path, _) = setup_test_env();
    let bad = tmp.path().join("bad.json");
    fs::write(&bad, r#"[{"metadata": {"dp": "dp1"}}]"#).unwrap();

    let (_, stderr, success) =
        run_ctxc(&config_path, &["compose", "--input", bad.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("retrieved record 0 has no text payload"), "stderr: {}", stderr);
}

#[test]
fn test_explain_json() {
    let (_tmp, config_path, results) = setup_test_env();

    let (stdout, stderr, success) = run_ctxc(
        &config_path,
        &["explain", "--input", results.to_str().unwrap(), "--json"],
    );
    assert!(success, "explain failed: {}", stderr);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["integrated"], 2);
    assert_eq!(parsed["groups"], 1);
    assert_eq!(parsed["conflicts"].as_array().unwrap().len(), 0);
    assert_eq!(parsed["fragments"][0]["recurrence"], 2);
    assert_eq!(parsed["fragments"][2]["roles"][0], "orientative");
}

#[test]
fn test_explain_text() {
    let (_tmp, config_path, results) = setup_test_env();

    let (stdout, _, success) =
        run_ctxc(&config_path, &["explain", "--input", results.to_str().unwrap()]);
    assert!(success);
    assert!(stdout.contains("Fragments:"));
    assert!(stdout.contains("integrated: 2  groups: 1"));
}

#[test]
fn test_roles_command() {
    let (_tmp, config_path, _) = setup_test_env();

    let (stdout, _, success) = run_ctxc(
        &config_path,
        &["roles", "Debe cumplir, excepto si existe consentimiento."],
    );
    assert!(success);
    assert_eq!(stdout.trim(), "alternative, normative");

    let (stdout, _, _) = run_ctxc(&config_path, &["roles", "Texto sin marcas."]);
    assert_eq!(stdout.trim(), "descriptive");
}

#[test]
fn test_cue_override_from_config() {
    let (tmp, _, _) = setup_test_env();
    let config_path = tmp.path().join("config/english.toml");
    fs::write(&config_path, "[cues]\nnormative = [\"must\"]\n").unwrap();

    let (stdout, _, success) = run_ctxc(&config_path, &["roles", "You MUST comply."]);
    assert!(success);
    assert_eq!(stdout.trim(), "normative");

    let (stdout, _, _) = run_ctxc(&config_path, &["roles", "Debe cumplir."]);
    assert_eq!(stdout.trim(), "descriptive");
}

#[test]
fn test_invalid_config_fails() {
    let (tmp, _, _) = setup_test_env();
    let config_path = tmp.path().join("config/bad.toml");
    fs::write(&config_path, "[compose]\nstrategy = \"magic\"\n").unwrap();

    let (_, _, success) = run_ctxc(&config_path, &["roles", "texto"]);
    assert!(!success);
}

#[test]
fn test_experiment_writes_log() {
    let (tmp, config_path, _) = setup_test_env();
    let batch = tmp.path().join("batch.json");
    fs::write(
        &batch,
        format!(
            r#"[{{"query": "¿Cuánto se conservan los datos?", "results": {}}}]"#,
            RESULTS
        ),
    )
    .unwrap();

    let (stdout, stderr, success) =
        run_ctxc(&config_path, &["experiment", "--batch", batch.to_str().unwrap()]);
    assert!(success, "experiment failed: {}", stderr);
    assert!(stdout.contains("1 queries"));

    let log_path = tmp.path().join("results/log.json");
    let log: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&log_path).unwrap()).unwrap();
    let entry = &log["entries"][0];
    assert_eq!(entry["query_index"], 1);
    assert_eq!(entry["retrieved_fragments"], 3);
    for label in ["S1_base", "S2_hard", "S3_semantic"] {
        assert_eq!(
            entry["context_digest"][label].as_str().unwrap().len(),
            64,
            "missing digest for {}",
            label
        );
    }
}

#[test]
fn test_experiment_output_flag() {
    let (tmp, config_path, _) = setup_test_env();
    let batch = tmp.path().join("batch.json");
    fs::write(&batch, r#"[{"query": "q", "results": []}]"#).unwrap();
    let out = tmp.path().join("elsewhere/out.json");

    let (_, _, success) = run_ctxc(
        &config_path,
        &[
            "experiment",
            "--batch",
            batch.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ],
    );
    assert!(success);
    assert!(out.exists());
}
