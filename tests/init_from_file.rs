//! Initialization from a TOML file. Own binary: initializes the
//! process-wide logger.

use std::io::Write;

use corrlog::{ConfigError, Level};

#[test]
fn test_init_from_file() {
    let mut bad = tempfile::NamedTempFile::new().unwrap();
    writeln!(bad, "level = \"loud\"").unwrap();

    let err = corrlog::init_from_file(bad.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(!corrlog::is_initialized());

    let mut good = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        good,
        r#"
development = true
level = "warn"

[tracing_bridge]
enabled = false
"#
    )
    .unwrap();

    corrlog::init_from_file(good.path()).unwrap();
    assert!(corrlog::is_initialized());
    assert_eq!(corrlog::level().level(), Level::Warn);
}
