// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn build_filter_accepts_bare_level() {
    let filter = build_filter("info", None);
    assert_eq!(filter.to_string(), "info");
}

#[test]
fn build_filter_layers_extra_directive_after_level() {
    let filter = build_filter("info", Some("mtx_engine=debug"));
    assert_eq!(filter.to_string(), "info,mtx_engine=debug");
}

#[test]
fn build_filter_falls_back_to_info_on_garbage_directive() {
    let filter = build_filter("\0not a directive\0", None);
    assert_eq!(filter.to_string(), "info");
}

#[test]
fn compress_log_is_a_noop_when_no_plain_log_exists() {
    let dir = tempfile::tempdir().unwrap();
    compress_log(dir.path(), "matrix").unwrap();
    assert!(!dir.path().join("matrix.log.gz").exists());
}

#[test]
fn compress_log_replaces_plain_file_with_gz() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("matrix.log"), b"hello world\n").unwrap();

    compress_log(dir.path(), "matrix").unwrap();

    assert!(!dir.path().join("matrix.log").exists());
    assert!(dir.path().join("matrix.log.gz").exists());

    use flate2::read::GzDecoder;
    use std::io::Read;
    let mut decoder = GzDecoder::new(std::fs::File::open(dir.path().join("matrix.log.gz")).unwrap());
    let mut out = String::new();
    decoder.read_to_string(&mut out).unwrap();
    assert_eq!(out, "hello world\n");
}
