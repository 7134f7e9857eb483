//! Integration tests for the mat5tool CLI.

use assert_cmd::Command;
use mat5_rs::{write_mat, MatFile, MatWriter, Matrix, SparseMatrix};
use mat5_rs::ndarray::array;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get the mat5tool command.
fn mat5tool() -> Command {
    Command::cargo_bin("mat5tool").unwrap()
}

/// Write a fixture holding a dense `W`, a sparse `S` and a complex `Z`.
fn fixture(dir: &TempDir) -> PathBuf {
    let w: Matrix = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].into();
    let s: Matrix = SparseMatrix::from_real_triplets(100, 100, [(0, 0, 1.0), (99, 42, -2.0)])
        .unwrap()
        .into();
    let z: Matrix = mat5_rs::DenseMatrix::from_complex(array![[1.0]], array![[-1.0]])
        .unwrap()
        .into();

    let path = dir.path().join("fixture.mat");
    MatWriter::new()
        .save(&path, [("W", &w), ("S", &s), ("Z", &z)])
        .unwrap();
    path
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_help() {
    mat5tool()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("MAT-files"))
        .stdout(predicate::str::contains("--list"))
        .stdout(predicate::str::contains("--names"))
        .stdout(predicate::str::contains("EXAMPLES"));
}

#[test]
fn test_version() {
    mat5tool()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mat5tool"));
}

#[test]
fn test_missing_input() {
    mat5tool()
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_nonexistent_input() {
    mat5tool()
        .arg("/nonexistent/file.mat")
        .arg("--list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_output_required() {
    let temp = TempDir::new().unwrap();
    let input = fixture(&temp);

    mat5tool()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output file is required"));
}

// ============================================================================
// List Mode Tests
// ============================================================================

#[test]
fn test_list() {
    let temp = TempDir::new().unwrap();
    let input = fixture(&temp);

    mat5tool()
        .arg("--list")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("W"))
        .stdout(predicate::str::contains("2×3"))
        .stdout(predicate::str::contains("sparse"))
        .stdout(predicate::str::contains("complex double"))
        .stdout(predicate::str::contains("3 matrices found"));
}

#[test]
fn test_list_sparse_column_aligned_with_color() {
    let temp = TempDir::new().unwrap();
    let input = fixture(&temp);

    // Padding sits inside the color codes, so the next column starts
    // where it does on uncolored rows.
    mat5tool()
        .arg("--list")
        .arg(&input)
        .env("CLICOLOR_FORCE", "1")
        .env_remove("NO_COLOR")
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}[36msparse \u{1b}[0m  "))
        .stdout(predicate::str::contains("dense    "));
}

#[test]
fn test_list_with_names() {
    let temp = TempDir::new().unwrap();
    let input = fixture(&temp);

    mat5tool()
        .args(["--list", "--names", "S"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("100×100"))
        .stdout(predicate::str::contains("1 matrices found"));
}

#[test]
fn test_list_invalid_file() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("bad.mat");
    fs::write(&input, "not a mat file").unwrap();

    mat5tool()
        .arg("--list")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read MAT-file"));
}

// ============================================================================
// Check Mode Tests
// ============================================================================

#[test]
fn test_check_passes() {
    let temp = TempDir::new().unwrap();
    let input = fixture(&temp);

    mat5tool()
        .arg("--check")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 matrices decoded"));
}

#[test]
fn test_check_detects_corruption() {
    let temp = TempDir::new().unwrap();
    let input = fixture(&temp);
    let mut bytes = fs::read(&input).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&input, bytes).unwrap();

    mat5tool()
        .arg("--check")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Checksum mismatch"));

    // --list honours --no-verify
    mat5tool()
        .args(["--list", "--no-verify"])
        .arg(&input)
        .assert()
        .success();
}

#[test]
fn test_lenient_skips_unknown_elements() {
    let temp = TempDir::new().unwrap();
    let input = fixture(&temp);
    let mut bytes = fs::read(&input).unwrap();
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&8u32.to_le_bytes());
    bytes.extend_from_slice(b"trailing");
    fs::write(&input, bytes).unwrap();

    mat5tool()
        .arg("--list")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported element type 16"));

    mat5tool()
        .args(["--list", "--lenient"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 matrices found"));
}

// ============================================================================
// Conversion Tests
// ============================================================================

#[test]
fn test_convert_subset() {
    let temp = TempDir::new().unwrap();
    let input = fixture(&temp);
    let output = temp.path().join("subset.mat");

    mat5tool()
        .arg(&input)
        .arg(&output)
        .args(["--names", "W,S"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 matrices"));

    let original = MatFile::open(&input).unwrap();
    let subset = MatFile::open(&output).unwrap();
    assert_eq!(subset.names().collect::<Vec<_>>(), vec!["S", "W"]);
    assert_eq!(subset.require("S").unwrap(), original.require("S").unwrap());
}

#[test]
fn test_convert_uncompressed() {
    let temp = TempDir::new().unwrap();
    let input = fixture(&temp);
    let output = temp.path().join("plain.mat");

    mat5tool()
        .arg(&input)
        .arg(&output)
        .arg("--uncompressed")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[128..132], &14u32.to_le_bytes());
    assert_eq!(MatFile::open(&output).unwrap().len(), 3);
}

#[test]
fn test_convert_missing_name() {
    let temp = TempDir::new().unwrap();
    let input = fixture(&temp);
    let output = temp.path().join("out.mat");

    mat5tool()
        .arg(&input)
        .arg(&output)
        .args(["--names", "W,nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));

    assert!(!output.exists());
}

#[test]
fn test_convert_refuses_overwrite() {
    let temp = TempDir::new().unwrap();
    let input = fixture(&temp);
    let output = temp.path().join("exists.mat");
    fs::write(&output, "existing").unwrap();

    mat5tool()
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    mat5tool()
        .arg(&input)
        .arg(&output)
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn test_convert_to_single() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("real.mat");
    let a: Matrix = array![[0.1, 0.2]].into();
    let mut bytes = Vec::new();
    write_mat(&mut bytes, [("a", &a)]).unwrap();
    fs::write(&input, bytes).unwrap();
    let output = temp.path().join("single.mat");

    mat5tool()
        .arg(&input)
        .arg(&output)
        .args(["--kind", "single"])
        .assert()
        .success();

    let back = MatFile::open(&output).unwrap();
    assert_eq!(back.require("a").unwrap().kind(), mat5_rs::ElementKind::Real32);
}

#[test]
fn test_real_kind_for_complex_fails() {
    let temp = TempDir::new().unwrap();
    let input = fixture(&temp);

    mat5tool()
        .args(["--list", "--kind", "double"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Type mismatch"));
}
