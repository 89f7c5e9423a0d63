use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn tmem_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tmem");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    let files_dir = root.join("files");
    fs::create_dir_all(&files_dir).unwrap();
    fs::write(
        files_dir.join("symbols.txt"),
        "!!! ??? ...",
    )
    .unwrap();
    fs::write(
        files_dir.join("report.md"),
        "Hello world. This is a test.\nNew line here.",
    )
    .unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/tmem.sqlite"

[reuse]
segment_threshold = 0.9
reuse_cutoff = 0.95
document_threshold = 0.8

[translator]
provider = "disabled"
"#,
        root.display()
    );

    let config_path = config_dir.join("tmem.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_tmem(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = tmem_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run tmem binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_tmem(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data").join("tmem.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_tmem(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_tmem(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_text_degrades_when_backend_disabled() {
    let (_tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    // Ad-hoc translation swallows backend failure and echoes the source.
    let (stdout, stderr, success) =
        run_tmem(&config_path, &["text", "Hello world from here", "--pair", "fr-en"]);
    assert!(success, "text should degrade, not fail: {}", stderr);
    assert!(stdout.contains("Hello world from here"));
    assert!(stderr.contains("unchanged"));
}

#[test]
fn test_text_passthrough_symbolic_input() {
    let (_tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let (stdout, stderr, success) = run_tmem(&config_path, &["text", "!!!", "--pair", "fr-en"]);
    assert!(success);
    assert!(stdout.contains("!!!"));
    assert!(stderr.contains("nothing to translate"));
}

#[test]
fn test_text_unsupported_pair_fails_fast() {
    let (_tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let (_, stderr, success) = run_tmem(&config_path, &["text", "Hello", "--pair", "de-en"]);
    assert!(!success, "Unsupported pair must fail");
    assert!(
        stderr.contains("Unsupported language pair"),
        "Should name the failure, got: {}",
        stderr
    );
}

#[test]
fn test_translate_document_fails_when_backend_disabled() {
    let (tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let report = tmp.path().join("files").join("report.md");
    // Document translation propagates backend failure.
    let (_, stderr, success) = run_tmem(
        &config_path,
        &["translate", report.to_str().unwrap(), "--pair", "fr-en", "--progress", "off"],
    );
    assert!(!success, "document translation must fail without a backend");
    assert!(
        stderr.contains("disabled"),
        "Should mention the disabled backend, got: {}",
        stderr
    );
}

#[test]
fn test_translate_symbolic_document_needs_no_backend() {
    let (tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let symbols = tmp.path().join("files").join("symbols.txt");
    let (stdout, stderr, success) = run_tmem(
        &config_path,
        &["translate", symbols.to_str().unwrap(), "--pair", "fr-en", "--progress", "off"],
    );
    assert!(success, "passthrough-only document failed: {}", stderr);
    assert!(stdout.contains("!!! ??? ..."));
}

#[test]
fn test_translate_output_file() {
    let (tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let symbols = tmp.path().join("files").join("symbols.txt");
    let out = tmp.path().join("out.txt");
    let (stdout, _, success) = run_tmem(
        &config_path,
        &[
            "translate",
            symbols.to_str().unwrap(),
            "--pair",
            "fr-en",
            "--output",
            out.to_str().unwrap(),
            "--progress",
            "off",
        ],
    );
    assert!(success);
    assert!(stdout.contains("translated"));
    assert_eq!(fs::read_to_string(&out).unwrap(), "!!! ??? ...");
}

#[test]
fn test_translate_unknown_progress_mode_errors() {
    let (tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let symbols = tmp.path().join("files").join("symbols.txt");
    let (_, stderr, success) = run_tmem(
        &config_path,
        &["translate", symbols.to_str().unwrap(), "--pair", "fr-en", "--progress", "loud"],
    );
    assert!(!success);
    assert!(stderr.contains("Unknown progress mode"));
}

#[test]
fn test_history_after_translation() {
    let (tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let symbols = tmp.path().join("files").join("symbols.txt");
    run_tmem(
        &config_path,
        &["translate", symbols.to_str().unwrap(), "--pair", "fr-en", "--progress", "off"],
    );

    let (stdout, _, success) = run_tmem(&config_path, &["history"]);
    assert!(success);
    assert!(stdout.contains("symbols.txt"));
    assert!(stdout.contains("fr-en"));
    assert!(stdout.contains("not revised"));
}

#[test]
fn test_history_empty() {
    let (_tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let (stdout, _, success) = run_tmem(&config_path, &["history"]);
    assert!(success);
    assert!(stdout.contains("No translations yet."));
}

#[test]
fn test_stats_empty_database() {
    let (_tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let (stdout, _, success) = run_tmem(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Documents:     0"));
    assert!(stdout.contains("Translations:  0"));
    assert!(stdout.contains("Reuse rate:    0.0%"));
}

#[test]
fn test_stats_after_translation() {
    let (tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let symbols = tmp.path().join("files").join("symbols.txt");
    run_tmem(
        &config_path,
        &["translate", symbols.to_str().unwrap(), "--pair", "fr-en", "--progress", "off"],
    );

    let (stdout, _, success) = run_tmem(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Documents:     1"));
    assert!(stdout.contains("Translations:  1"));
}

#[test]
fn test_similar_finds_registered_document() {
    let (tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let symbols = tmp.path().join("files").join("symbols.txt");
    run_tmem(
        &config_path,
        &["translate", symbols.to_str().unwrap(), "--pair", "fr-en", "--progress", "off"],
    );

    let (stdout, _, success) =
        run_tmem(&config_path, &["similar", symbols.to_str().unwrap()]);
    assert!(success);
    assert!(
        stdout.contains("symbols.txt"),
        "Expected the stored document in results, got: {}",
        stdout
    );
}

#[test]
fn test_similar_no_results() {
    let (tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let report = tmp.path().join("files").join("report.md");
    let (stdout, _, success) = run_tmem(&config_path, &["similar", report.to_str().unwrap()]);
    assert!(success);
    assert!(stdout.contains("No similar documents."));
}

#[test]
fn test_get_document_info() {
    let (tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let symbols = tmp.path().join("files").join("symbols.txt");
    run_tmem(
        &config_path,
        &["translate", symbols.to_str().unwrap(), "--pair", "fr-en", "--progress", "off"],
    );

    let (stdout, _, success) = run_tmem(&config_path, &["get", "1"]);
    assert!(success);
    assert!(stdout.contains("symbols.txt"));
    assert!(stdout.contains("translated"));
}

#[test]
fn test_get_missing_document() {
    let (_tmp, config_path) = setup_test_env();

    run_tmem(&config_path, &["init"]);
    let (_, stderr, success) = run_tmem(&config_path, &["get", "999"]);
    assert!(!success, "get with missing id should fail");
    assert!(
        stderr.contains("not found"),
        "Should report not found, got: {}",
        stderr
    );
}

#[test]
fn test_missing_config_fails() {
    let (tmp, _config_path) = setup_test_env();

    let bogus = tmp.path().join("missing.toml");
    let binary = tmem_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(bogus.to_str().unwrap())
        .arg("stats")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read config file"));
}
