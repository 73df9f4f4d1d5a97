use idcard_pdf::capture::CaptureEngine;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const TINY_PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_idcard-pdf"))
}

fn output_dir() -> &'static Path {
    Path::new("tests/output")
}

fn setup() {
    fs::create_dir_all(output_dir()).expect("Failed to create output directory");
}

fn cleanup_file(name: &str) {
    let path = output_dir().join(name);
    if path.exists() {
        fs::remove_file(&path).ok();
    }
}

fn have_font() -> bool {
    CaptureEngine::find_system_font().is_some()
}

fn complete_record_json() -> String {
    format!(
        r#"{{
            "firstName": "Ravi",
            "lastName": "Kumar",
            "bloodGroup": "O+",
            "department": "Agriculture Department",
            "designation": "Agriculture Officer",
            "officeLocation": "Joint Director of Agriculture\nSPSR Nellore Dt.",
            "cfmsId": "123456",
            "hrmsId": "654321",
            "address": "12-3-45, Main Road, Nellore, 524001",
            "mobileNumber": "9876543210",
            "aadhaarNumber": "1234 5678 9012",
            "photo": "{uri}",
            "signature": "{uri}"
        }}"#,
        uri = TINY_PNG_DATA_URI
    )
}

fn write_record(name: &str, content: &str) -> PathBuf {
    setup();
    let path = output_dir().join(name);
    fs::write(&path, content).expect("Failed to write record fixture");
    path
}

#[test]
fn test_basic_export() {
    if !have_font() {
        return;
    }
    let input = write_record("record-basic.json", &complete_record_json());
    let output_file = "test-basic-card.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-i", input.to_str().unwrap(),
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);

    let path = output_dir().join(output_file);
    assert!(path.exists(), "PDF file was not created");

    let metadata = fs::metadata(&path).expect("Failed to get file metadata");
    assert!(metadata.len() > 1000, "PDF file is too small, likely empty or corrupt");
}

#[test]
fn test_incomplete_record_refused() {
    let input = write_record(
        "record-incomplete.json",
        r#"{"firstName": "Ravi", "lastName": "Kumar"}"#,
    );

    let output = cargo_bin()
        .args([
            "-i", input.to_str().unwrap(),
            "-o", "tests/output/should-not-exist.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for incomplete record");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing fields"), "stderr should list missing fields: {}", stderr);
}

#[test]
fn test_incomplete_record_with_override() {
    if !have_font() {
        return;
    }
    let input = write_record(
        "record-override.json",
        &format!(
            r#"{{"firstName": "Ravi", "photo": "{uri}", "signature": "{uri}"}}"#,
            uri = TINY_PNG_DATA_URI
        ),
    );
    let output_file = "test-incomplete-card.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-i", input.to_str().unwrap(),
            "--allow-incomplete",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_dir().join(output_file).exists(), "PDF file was not created");
}

#[test]
fn test_invalid_record_json() {
    let input = write_record("record-corrupt.json", "{not valid json");

    let output = cargo_bin()
        .args([
            "-i", input.to_str().unwrap(),
            "-o", "tests/output/should-not-exist.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for corrupt JSON");
}

#[test]
fn test_missing_record_file() {
    let output = cargo_bin()
        .args([
            "-i", "nonexistent-record.json",
            "-o", "tests/output/should-not-exist.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing record file");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No employee data found"),
        "stderr should point back to the form: {}",
        stderr
    );
}

#[test]
fn test_bad_photo_asset_path() {
    let input = write_record("record-bad-asset.json", &complete_record_json());

    let output = cargo_bin()
        .args([
            "-i", input.to_str().unwrap(),
            "--photo", "nonexistent-photo.png",
            "-o", "tests/output/should-not-exist.pdf",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for a missing photo file");
}

#[test]
fn test_viewport_report() {
    if !have_font() {
        return;
    }
    let input = write_record("record-viewport.json", &complete_record_json());
    let output_file = "test-viewport-card.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "-i", input.to_str().unwrap(),
            "--viewport", "252",
            "-o", &format!("tests/output/{}", output_file),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    // 252 px viewport with a 24 px margin halves the 480 px card.
    assert!(stdout.contains("scale 0.5000"), "unexpected preview report: {}", stdout);
}
