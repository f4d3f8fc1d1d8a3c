//! Configuration loading tests
//!
//! Tests that reader configuration loads from disk and falls back to
//! defaults when the file or a value is missing

use dictator::speech::Backend;
use dictator::state::config::Config;
use dictator::text::OffsetUnit;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_config_loads_from_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(
        file,
        "[speech]\nbackend = silent\nvoice = Samantha\nrate = 1.5\npitch = 0.8\nvolume = 0.5\n\n\
         [highlight]\noffset_unit = utf16\nvalidate = false"
    )
    .unwrap();

    let config = Config::load_from(file.path()).expect("Failed to load config");

    assert_eq!(config.path(), file.path());
    assert_eq!(config.backend().unwrap(), Backend::Silent);
    assert_eq!(config.voice(), Some("Samantha".to_string()));
    assert_eq!(config.rate(), 1.5);
    assert_eq!(config.pitch(), 0.8);
    assert_eq!(config.volume(), 0.5);
    assert_eq!(config.offset_unit(), OffsetUnit::Utf16);
    assert!(!config.validate_offsets());
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.cfg");

    let config = Config::load_from(&path).expect("Missing config should not fail");

    assert_eq!(config.rate(), 1.0);
    assert_eq!(config.offset_unit(), OffsetUnit::Chars);
    // Defaults are not written back
    assert!(!path.exists());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[speech]\nrate = 2").unwrap();

    let config = Config::load_from(file.path()).unwrap();

    assert_eq!(config.rate(), 2.0);
    assert_eq!(config.pitch(), 1.0);
    assert_eq!(config.backend().unwrap(), Backend::Native);
    assert!(config.validate_offsets());
}
