//! Parser behaviour on hand-built and damaged files.

use mat5_rs::{write_mat, ElementKind, Error, MatFile, Matrix, ParseOptions};
use ndarray::array;

// ============================================================================
// Byte-level builders
// ============================================================================

fn header_only() -> Vec<u8> {
    let mut out = Vec::new();
    write_mat::<_, _, &str>(&mut out, []).unwrap();
    out
}

fn push_element(out: &mut Vec<u8>, code: u32, payload: &[u8]) {
    out.extend_from_slice(&code.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out.resize(out.len() + (8 - payload.len() % 8) % 8, 0);
}

fn flags(class: u8) -> Vec<u8> {
    let mut out = Vec::new();
    let mut payload = u32::from(class).to_le_bytes().to_vec();
    payload.extend_from_slice(&0u32.to_le_bytes());
    push_element(&mut out, 6, &payload);
    out
}

fn dims(values: &[i32]) -> Vec<u8> {
    let mut out = Vec::new();
    let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    push_element(&mut out, 5, &payload);
    out
}

fn name(text: &str) -> Vec<u8> {
    let mut out = Vec::new();
    push_element(&mut out, 1, text.as_bytes());
    out
}

/// A file with one uncompressed matrix element built from raw sub-elements.
fn raw_file(parts: &[Vec<u8>]) -> Vec<u8> {
    let mut out = header_only();
    let body: Vec<u8> = parts.concat();
    push_element(&mut out, 14, &body);
    out
}

fn sample_file() -> Vec<u8> {
    let a: Matrix = array![[1.0, 2.0], [3.0, 4.0]].into();
    let mut out = Vec::new();
    write_mat(&mut out, [("A", &a)]).unwrap();
    out
}

// ============================================================================
// Header
// ============================================================================

#[test]
fn test_big_endian_indicator_rejected() {
    let mut bytes = sample_file();
    bytes[126] = b'M';
    bytes[127] = b'I';

    let err = MatFile::parse(&bytes[..]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedEndianness { .. }));
}

#[test]
fn test_unknown_version_rejected() {
    let mut bytes = sample_file();
    bytes[125] = 0x02;

    let err = MatFile::parse(&bytes[..]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedVersion { version: 0x0200 }));
}

#[test]
fn test_short_file() {
    let err = MatFile::parse(&sample_file()[..100]).unwrap_err();
    assert!(err.is_truncation());
}

// ============================================================================
// Array headers
// ============================================================================

#[test]
fn test_three_dimensions_rejected() {
    let bytes = raw_file(&[flags(6), dims(&[2, 2, 2]), name("cube")]);
    let err = MatFile::parse(&bytes[..]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedDimensionality { dims: 3 }));
}

#[test]
fn test_integer_class_rejected() {
    let bytes = raw_file(&[flags(12), dims(&[1, 1]), name("i")]);
    let err = MatFile::parse(&bytes[..]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedArrayClass { .. }));
}

#[test]
fn test_int16_data_decoded_as_double() {
    let mut data = Vec::new();
    let values: Vec<u8> = [1i16, -2, 300].iter().flat_map(|v| v.to_le_bytes()).collect();
    push_element(&mut data, 3, &values);

    let bytes = raw_file(&[flags(6), dims(&[1, 3]), name("w"), data]);
    let file = MatFile::parse(&bytes[..]).unwrap();
    let w = file.require("w").unwrap();

    assert_eq!(w.kind(), ElementKind::Real64);
    assert_eq!(w.as_dense().unwrap().real(), &array![[1.0, -2.0, 300.0]]);
}

#[test]
fn test_sparse_repeated_row_index_rejected() {
    let int32s = |values: &[i32]| {
        let mut out = Vec::new();
        let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        push_element(&mut out, 5, &payload);
        out
    };
    let mut pr = Vec::new();
    let values: Vec<u8> = [1.0f64, 5.0].iter().flat_map(|v| v.to_le_bytes()).collect();
    push_element(&mut pr, 9, &values);

    let bytes = raw_file(&[
        flags(5),
        dims(&[2, 1]),
        name("S"),
        int32s(&[0, 0]),
        int32s(&[0, 2]),
        pr,
    ]);
    let err = MatFile::parse(&bytes[..]).unwrap_err();
    assert!(matches!(err, Error::MalformedSparseLayout { .. }));
}

#[test]
fn test_filtered_matrix_is_not_decoded() {
    // Text where numeric data belongs: decoding this element would fail.
    let mut data = Vec::new();
    push_element(&mut data, 16, b"not numbers");
    let mut bytes = raw_file(&[flags(6), dims(&[1, 1]), name("junk"), data]);

    let good: Matrix = array![[9.0]].into();
    let mut tail = Vec::new();
    write_mat(&mut tail, [("good", &good)]).unwrap();
    bytes.extend_from_slice(&tail[128..]);

    assert!(MatFile::parse(&bytes[..]).is_err());

    let file = MatFile::parse_with(&bytes[..], &ParseOptions::new().names(["good"])).unwrap();
    assert_eq!(file.names().collect::<Vec<_>>(), vec!["good"]);
}

// ============================================================================
// Top-level elements
// ============================================================================

#[test]
fn test_checksum_mismatch_and_lenient_mode() {
    let mut bytes = sample_file();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x5A;

    let err = MatFile::parse(&bytes[..]).unwrap_err();
    assert!(matches!(err, Error::ChecksumMismatch { .. }));

    let lenient = ParseOptions::new().verify_checksum(false);
    let file = MatFile::parse_with(&bytes[..], &lenient).unwrap();
    assert!(file.get("A").is_some());
}

#[test]
fn test_unknown_element_strict_by_default() {
    let mut bytes = sample_file();
    push_element(&mut bytes, 16, b"free text");

    let err = MatFile::parse(&bytes[..]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedElementType { code: 16 }));
}

#[test]
fn test_unknown_element_skipped_when_configured() {
    let mut bytes = header_only();
    push_element(&mut bytes, 99, &[1, 2, 3, 4, 5]);
    bytes.extend_from_slice(&sample_file()[128..]);

    let options = ParseOptions::new().skip_unknown_elements(true);
    let file = MatFile::parse_with(&bytes[..], &options).unwrap();
    assert_eq!(file.len(), 1);
    assert_eq!(file.first_name(), Some("A"));
}

#[test]
fn test_truncated_element_body() {
    let bytes = sample_file();
    let err = MatFile::parse(&bytes[..bytes.len() - 10]).unwrap_err();
    assert!(err.is_truncation());
}

#[test]
fn test_partial_tag_is_truncation() {
    let mut bytes = sample_file();
    bytes.extend_from_slice(&[14, 0]);

    let err = MatFile::parse(&bytes[..]).unwrap_err();
    assert!(err.is_truncation());
}

#[test]
fn test_real_kind_for_complex_matrix() {
    use mat5_rs::DenseMatrix;

    let z: Matrix = DenseMatrix::from_complex(array![[1.0]], array![[2.0]]).unwrap().into();
    let mut bytes = Vec::new();
    write_mat(&mut bytes, [("z", &z)]).unwrap();

    let options = ParseOptions::new().kind(ElementKind::Real64);
    let err = MatFile::parse_with(&bytes[..], &options).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn test_open_missing_file() {
    let err = MatFile::open("/nonexistent/file.mat").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
