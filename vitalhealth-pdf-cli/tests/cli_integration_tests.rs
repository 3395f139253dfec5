//! Integration tests for the vitalhealth-pdf CLI
//!
//! Runs the built binary against payload files in a temporary directory.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Test helper to get the CLI binary path
fn get_cli_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    if path.ends_with("deps") {
        path.pop(); // Remove "deps" directory
    }
    path.push("vitalhealth-pdf");
    #[cfg(windows)]
    path.set_extension("exe");
    path
}

fn setup_temp_dir() -> TempDir {
    tempdir().expect("Failed to create temp directory")
}

fn run_cli_command(args: &[&str]) -> Result<std::process::Output> {
    let output = Command::new(get_cli_path()).args(args).output()?;
    Ok(output)
}

fn assert_pdf_exists_and_valid(path: &Path) {
    assert!(path.exists(), "PDF file should exist: {}", path.display());
    let content = fs::read(path).expect("Failed to read PDF file");
    assert!(
        content.starts_with(b"%PDF-"),
        "File should start with PDF header"
    );
    assert!(content.ends_with(b"%%EOF\n"));
}

fn write_payload(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("payload.json");
    fs::write(&path, json).expect("Failed to write payload");
    path
}

const PAYLOAD: &str = r#"{
    "paciente_nombre": "Jorge Iván Mejía",
    "fecha_analisis": "10/06/2024",
    "secciones": {
        "estado_general": "Bueno",
        "lo_bueno": "Energía estable",
        "vigilar": "Presión arterial",
        "alterado": "",
        "como_se_siente": "Bien",
        "proyeccion": "Favorable",
        "seguimiento": "Control mensual",
        "plan_30d": {"habitos": ["Dormir 8 horas"], "suplementos": []}
    },
    "branding": {"logo_url": "http://127.0.0.1:9/logo.png"}
}"#;

#[test]
fn test_cli_render_to_explicit_path() {
    let temp_dir = setup_temp_dir();
    let payload = write_payload(temp_dir.path(), PAYLOAD);
    let output_path = temp_dir.path().join("report.pdf");

    let output = run_cli_command(&[
        "render",
        payload.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
        "--offline",
    ])
    .expect("CLI command should succeed");

    assert!(output.status.success(), "Command should succeed");
    assert_pdf_exists_and_valid(&output_path);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(1 page)"), "unexpected output: {stdout}");
}

#[test]
fn test_cli_render_uses_suggested_file_name() {
    let temp_dir = setup_temp_dir();
    let payload = write_payload(temp_dir.path(), PAYLOAD);

    let output = run_cli_command(&[
        "render",
        payload.to_str().unwrap(),
        "--output-dir",
        temp_dir.path().to_str().unwrap(),
        "--offline",
    ])
    .expect("CLI command should succeed");

    assert!(output.status.success());
    assert_pdf_exists_and_valid(
        &temp_dir
            .path()
            .join("Informe_Cuantico_Jorge_Iván_Mejía_10-06-2024.pdf"),
    );
}

#[test]
fn test_cli_render_rejects_invalid_payload() {
    let temp_dir = setup_temp_dir();
    let payload = write_payload(temp_dir.path(), r#"{"paciente_nombre": "  "}"#);
    let output_path = temp_dir.path().join("report.pdf");

    let output = run_cli_command(&[
        "render",
        payload.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
        "--offline",
    ])
    .expect("CLI should run");

    assert!(!output.status.success());
    assert!(!output_path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("paciente_nombre is empty"));
}

#[test]
fn test_cli_validate_lists_fields() {
    let temp_dir = setup_temp_dir();
    let payload = write_payload(temp_dir.path(), r#"{"secciones": {"lo_bueno": "x"}}"#);

    let output = run_cli_command(&["validate", payload.to_str().unwrap()]).expect("CLI should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("paciente_nombre is missing"));
    assert!(stderr.contains("secciones.estado_general is missing"));
    assert!(stderr.contains("secciones.plan_30d is missing"));
    assert!(!stderr.contains("secciones.lo_bueno"));
}

#[test]
fn test_cli_validate_accepts_payload() {
    let temp_dir = setup_temp_dir();
    let payload = write_payload(temp_dir.path(), PAYLOAD);

    let output = run_cli_command(&["validate", payload.to_str().unwrap()]).expect("CLI should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Jorge Iván Mejía (10/06/2024)"));
}

#[test]
fn test_cli_sample_renders() {
    let temp_dir = setup_temp_dir();
    let payload = temp_dir.path().join("sample.json");
    let output_path = temp_dir.path().join("sample.pdf");

    let output = run_cli_command(&["sample", "-o", payload.to_str().unwrap()])
        .expect("CLI should run");
    assert!(output.status.success());

    let output = run_cli_command(&[
        "render",
        payload.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
        "--offline",
    ])
    .expect("CLI should run");
    assert!(output.status.success());
    assert_pdf_exists_and_valid(&output_path);
}

#[test]
fn test_cli_render_with_config() {
    let temp_dir = setup_temp_dir();
    let payload = write_payload(temp_dir.path(), PAYLOAD);
    let config = temp_dir.path().join("config.json");
    fs::write(&config, r#"{"filename_prefix": "Reporte"}"#).unwrap();

    let output = run_cli_command(&[
        "render",
        payload.to_str().unwrap(),
        "-d",
        temp_dir.path().to_str().unwrap(),
        "-c",
        config.to_str().unwrap(),
        "--offline",
    ])
    .expect("CLI should run");

    assert!(output.status.success());
    assert_pdf_exists_and_valid(&temp_dir.path().join("Reporte_Jorge_Iván_Mejía_10-06-2024.pdf"));
}

#[test]
fn test_cli_missing_input_file() {
    let output = run_cli_command(&["render", "/nonexistent/payload.json", "--offline"])
        .expect("CLI should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn test_cli_validate_names_mistyped_field() {
    let temp_dir = setup_temp_dir();
    let payload = write_payload(
        temp_dir.path(),
        r#"{"paciente_nombre": "Ana", "secciones": {"plan_30d": {"habitos": "caminar"}}}"#,
    );

    let output = run_cli_command(&["validate", payload.to_str().unwrap()]).expect("CLI should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("secciones.plan_30d.habitos has an invalid type"));
}
